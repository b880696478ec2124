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

//! # DD-BNB
//! DD-BNB is a generic engine to find provably optimal solutions to
//! combinatorial minimization problems. It runs a parallel branch-and-bound
//! search where each search node is bounded by compiling up to three decision
//! diagrams in lockstep:
//!
//! * an optional *inference* diagram, whose nodes are those of an auxiliary
//!   relaxation of the problem (for instance, an assignment problem);
//! * an optional *relaxation* diagram, which over approximates the feasible
//!   region of the node and yields a dual (lower) bound;
//! * a mandatory *restriction* diagram, which under approximates the feasible
//!   region (by truncating its layers) and yields a primal solution.
//!
//! Each bound is labelled `Exact` (the subtree is solved), `Failed` (the
//! subtree can be fathomed) or `Relaxed` (the node must be branched on).
//!
//! ## Quick Example
//! The only thing you need to provide is an implementation of the `State`
//! trait. The following example finds the least number of coins summing up
//! to a given amount.
//!
//! ```
//! # use dd_bnb::*;
//! #
//! #[derive(Debug, Clone)]
//! struct Change {
//!     remaining: usize,
//!     coins    : i64,
//! }
//! impl State for Change {
//!     type Dual = Change;
//!
//!     fn cost(&self) -> i64 {
//!         self.coins
//!     }
//!     fn is_solved(&self) -> bool {
//!         self.remaining == 0
//!     }
//!     fn expand(&self, _: Option<&Change>, incumbent: Option<i64>) -> Vec<Change> {
//!         if incumbent.map_or(false, |best| self.coins + 1 >= best) {
//!             return vec![];
//!         }
//!         [1, 3, 4].iter()
//!             .filter(|coin| **coin <= self.remaining)
//!             .map(|coin| Change { remaining: self.remaining - coin, coins: self.coins + 1 })
//!             .collect()
//!     }
//!     fn infer_diagram(&self) -> Option<Diagram<Change>> {
//!         None
//!     }
//!     fn relax_diagram(&self) -> Option<Diagram<Change>> {
//!         None
//!     }
//!     fn restrict_diagram(&self) -> Option<Diagram<Change>> {
//!         Some(Diagram::new(self.clone(), vec![Box::new(MaxCostMerger)], 2))
//!     }
//! }
//!
//! let root       = Change { remaining: 7, coins: 0 };
//! let mut solver = ParallelSolver::new(root, NoProgress);
//! let best       = solver.minimize();
//!
//! assert_eq!(Some(2), best.map(|s| s.cost()));
//! assert!(solver.statistics().optimal);
//! ```
//!
//! ## Going further
//! Have a look at `demos/tsppd` which implements a complete solver for the
//! traveling salesman problem with pickup and delivery on top of this engine,
//! including an assignment problem inference dual and a merging relaxation.

mod common;
mod abstraction;
mod implementation;

pub use common::*;
pub use abstraction::*;
pub use implementation::*;

#[cfg(test)]
mod test_utils;
