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

//! This module defines the most basic data types that are used throughout all
//! the code of our library (both at the abstraction and implementation levels).
//! These are also the types your client library is likely to work with.

// ----------------------------------------------------------------------------
// --- LABEL ------------------------------------------------------------------
// ----------------------------------------------------------------------------
/// The classification of the outcome of a bound computation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Label {
    /// The primal bound matches the dual bound: the subtree rooted in the
    /// node has been solved to optimality.
    Exact,
    /// The node can be fathomed: either it is infeasible or its bounds prove
    /// it cannot improve on the incumbent.
    Failed,
    /// There remains a gap between the dual and primal bounds. The node must
    /// be branched on.
    Relaxed,
}

// ----------------------------------------------------------------------------
// --- STATISTICS -------------------------------------------------------------
// ----------------------------------------------------------------------------
/// A snapshot of the solver progress. It is handed to the progress callback
/// each time the incumbent improves, and once more when optimality is proved.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Statistics {
    /// Wall clock time elapsed since the solver was created (in seconds)
    pub clock_seconds: f64,
    /// Processor time consumed since the solver was created (in seconds)
    pub cpu_seconds: f64,
    /// Has the incumbent been proved optimal ?
    pub optimal: bool,
    /// Number of search nodes that were fathomed
    pub fails: u64,
    /// Number of search nodes that were not fathomed
    pub nodes: u64,
}

// ----------------------------------------------------------------------------
// --- NODE -------------------------------------------------------------------
// ----------------------------------------------------------------------------
/// A pending search node: a state waiting on the queue along with the dual
/// bound of the node it was branched from and its own (primal) cost.
///
/// # Note:
/// Nodes are ordered by increasing `(dual, primal)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node<S> {
    /// The state to explore
    pub state: S,
    /// The dual bound inherited from the parent node
    pub dual: i64,
    /// The cost of the state itself
    pub primal: i64,
}
impl <S> Node<S> {
    /// Creates the node wrapping the root of the search. Its bounds are zero.
    pub fn root(state: S) -> Self {
        Node { state, dual: 0, primal: 0 }
    }
}

// ############################################################################
// #### TESTS #################################################################
// ############################################################################
