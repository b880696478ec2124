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

//! This module defines the `Solver` trait.

use crate::{State, Statistics};

/// This is the solver abstraction. It is implemented by a structure that
/// implements the branch-and-bound with decision diagrams paradigm to find
/// the best possible (least cost) solution to a given problem.
pub trait Solver<S: State> {
    /// This method orders the solver to search for the optimal solution.
    /// It returns the best solution that was found, if any. Whether that
    /// solution was proved optimal or the search was cut off is told by the
    /// `optimal` flag of the `statistics()`.
    ///
    /// Four cases are thus to be distinguished:
    ///
    /// * `optimal` is true and a solution is returned: it is the optimum.
    /// * `optimal` is false and a solution is returned: it is the best
    ///   solution known at the time of the cutoff.
    /// * no solution is returned and the search queue was exhausted: the
    ///   problem admits no feasible solution.
    /// * no solution is returned and the search was cut off: no feasible
    ///   solution has been found before the cutoff occurred.
    ///
    /// A search whose budget is exhausted by its very last round is still
    /// considered cut off: it never claims optimality.
    fn minimize(&mut self) -> Option<S>;
    /// Returns the best solution identified so far.
    fn incumbent(&self) -> Option<&S>;
    /// Returns the current statistics of the search.
    fn statistics(&self) -> Statistics;
}
