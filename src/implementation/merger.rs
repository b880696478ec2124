// Copyright 2020 Xavier Gillard
//
// Permission is hereby granted, free of charge, to any person obtaining a copy of
// this software and associated documentation files (the "Software"), to deal in
// the Software without restriction, including without limitation the rights to
// use, copy, modify, merge, publish, distribute, sublicense, and/or sell copies of
// the Software, and to permit persons to whom the Software is furnished to do so,
// subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS
// FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR
// COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER
// IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN
// CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! This module provides the implementation of the default merger.

use compare::{Compare, Extract};

use crate::{Merger, State};

/// This merger implements a restriction: it keeps the `width` least cost
/// states and permanently discards all the others.
///
/// # Note:
/// Because it forgets about states, this is a lossy operation. It is what
/// makes a layer (and all subsequent layers of its diagram) inexact.
#[derive(Debug, Default, Copy, Clone)]
pub struct MaxCostMerger;

impl <S: State> Merger<S> for MaxCostMerger {
    fn merge(&self, mut states: Vec<S>, width: usize) -> Vec<S> {
        let by_cost = Extract::new(|s: &S| s.cost());
        states.sort_by(|a, b| by_cost.compare(a, b));
        states.truncate(width);
        states
    }
}
