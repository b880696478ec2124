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

//! This module defines the `State` trait: the contract a problem formulation
//! must fulfill in order to be solved by the branch-and-bound engine.

use crate::Diagram;

/// This trait defines the "contract" of a node of some problem specific
/// search tree. The solver wraps states into search nodes, and the diagrams
/// it compiles to bound these nodes are layers of states.
///
/// # Copy on write
/// States are immutable from the outside. They may share (possibly large)
/// sub-objects, for instance an auxiliary dual solver. In that case, these
/// sub-objects must be shared behind an `Arc` and a new state must clone
/// them before changing anything: any two states produced by `expand` must
/// be independently usable by different threads without affecting each
/// other nor their parent.
///
/// # Costs
/// Costs must be non-negative and non-decreasing along any expansion chain.
pub trait State: Clone + Send + Sync {
    /// The type of the states composing the inference diagram of this state.
    /// The best state of that diagram (the inference dual) is passed on to
    /// `expand` as a hint. A formulation that has no inference dual simply
    /// uses `Self` and returns `None` from `infer_diagram`.
    type Dual: State<Dual = Self::Dual>;

    /// The accumulated cost of this state.
    fn cost(&self) -> i64;
    /// Returns true iff this state is a complete candidate solution.
    fn is_solved(&self) -> bool;
    /// Yields the states that are reachable in one search step from this
    /// state. The `incumbent` hint is the cost of the best known solution
    /// (if any); successors that cannot possibly improve on it may be pruned.
    ///
    /// # Note:
    /// A solved state must yield no successor.
    fn expand(&self, inference_dual: Option<&Self::Dual>, incumbent: Option<i64>) -> Vec<Self>;
    /// Creates the inference diagram of this state (if any).
    fn infer_diagram(&self) -> Option<Diagram<Self::Dual>>;
    /// Creates the relaxation diagram of this state (if any).
    fn relax_diagram(&self) -> Option<Diagram<Self>>;
    /// Creates the restriction diagram of this state. A restriction is
    /// mandatory: the search cannot terminate without it.
    fn restrict_diagram(&self) -> Option<Diagram<Self>>;
}
