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

//! This module defines the `Progress` callback trait.

use crate::{Bound, State, Statistics};

/// This trait basically defines a callback which the solver invokes (on the
/// coordinating thread) whenever the incumbent improves, and one last time
/// when the incumbent is proved optimal.
pub trait Progress<S: State> {
    /// Reports the bound that produced the new incumbent along with the
    /// current solver statistics.
    fn report(&mut self, bound: &Bound<S>, stats: &Statistics);
}
/// The simplest and most natural callback implementation is to simply use
/// a closure.
impl <S: State, X: FnMut(&Bound<S>, &Statistics)> Progress<S> for X {
    fn report(&mut self, bound: &Bound<S>, stats: &Statistics) {
        self(bound, stats)
    }
}

/// A progress callback that silently ignores all reports.
#[derive(Debug, Default, Copy, Clone)]
pub struct NoProgress;
impl <S: State> Progress<S> for NoProgress {
    fn report(&mut self, _: &Bound<S>, _: &Statistics) {}
}
