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

//! This module provides the implementation of a decision diagram which is
//! compiled one layer at a time.

use std::rc::Rc;

use crate::{Layer, Merger, Mergers, State};

/// A decision diagram owns exactly one live layer at a time: the older
/// layers are dropped as soon as the next one has been built.
///
/// # Example
/// ```
/// # use dd_bnb::*;
/// # #[derive(Debug, Clone)]
/// # struct Count(i64);
/// # impl State for Count {
/// #     type Dual = Count;
/// #     fn cost(&self) -> i64 { self.0 }
/// #     fn is_solved(&self) -> bool { self.0 >= 3 }
/// #     fn expand(&self, _: Option<&Count>, _: Option<i64>) -> Vec<Count> {
/// #         if self.is_solved() { vec![] } else { vec![Count(self.0 + 1), Count(self.0 + 2)] }
/// #     }
/// #     fn infer_diagram(&self) -> Option<Diagram<Count>> { None }
/// #     fn relax_diagram(&self) -> Option<Diagram<Count>> { None }
/// #     fn restrict_diagram(&self) -> Option<Diagram<Count>> {
/// #         Some(Diagram::new(self.clone(), vec![Box::new(MaxCostMerger)], 1))
/// #     }
/// # }
/// let mut dd = Diagram::new(Count(0), vec![Box::new(MaxCostMerger)], 1);
/// while !dd.is_done() {
///     dd.advance(None, None);
/// }
/// assert!(!dd.layer().is_exact());
/// ```
pub struct Diagram<S> {
    /// The current layer
    layer: Layer<S>,
    /// The mergers used to enforce the maximum width of the layers
    mergers: Mergers<S>,
    /// The maximum width of the layers (0 = unbounded)
    width: usize,
}

impl <S: State> Diagram<S> {
    /// Creates a diagram rooted in the given state.
    pub fn new(root: S, mergers: Vec<Box<dyn Merger<S>>>, width: usize) -> Self {
        let mergers: Mergers<S> = Rc::from(mergers);
        Diagram {
            layer: Layer::root(root, Rc::clone(&mergers), width),
            mergers,
            width,
        }
    }
    /// The current layer of the diagram
    pub fn layer(&self) -> &Layer<S> {
        &self.layer
    }
    /// The maximum width of the diagram (0 = unbounded)
    pub fn width(&self) -> usize {
        self.width
    }
    /// The mergers of this diagram
    pub fn mergers(&self) -> &[Box<dyn Merger<S>>] {
        &self.mergers
    }
    /// Replaces the current layer with the next one, and returns it.
    pub fn advance(&mut self, inference_dual: Option<&S::Dual>, incumbent: Option<i64>) -> &Layer<S> {
        self.layer = self.layer.expand(inference_dual, incumbent);
        &self.layer
    }
    /// Returns true iff the diagram is exhausted (its current layer is empty)
    pub fn is_done(&self) -> bool {
        self.layer.is_empty()
    }
}
