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

//! This module provides the configuration of the parallel solver.

use derive_builder::Builder;

/// The tuning parameters of a `ParallelSolver`.
///
/// # Example
/// ```
/// # use dd_bnb::SolverConfigBuilder;
/// let config = SolverConfigBuilder::default()
///     .workers(4)
///     .max_nodes(10_000)
///     .build()
///     .unwrap();
/// assert_eq!(1, config.batch_size);
/// assert_eq!(0, config.max_millis);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Builder)]
#[builder(default)]
pub struct SolverConfig {
    /// The number of nodes each worker bounds per round
    pub batch_size: usize,
    /// The number of workers that bound nodes in parallel during a round
    pub workers: usize,
    /// The maximum wall clock duration of the search (0 = unlimited)
    pub max_millis: u64,
    /// The maximum number of nodes (including the failed ones) that may be
    /// explored (0 = unlimited)
    pub max_nodes: u64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            batch_size: 1,
            workers   : num_cpus::get(),
            max_millis: 0,
            max_nodes : 0,
        }
    }
}

impl SolverConfig {
    /// Returns a copy of this configuration where the batch size and the
    /// number of workers are at least one.
    pub fn normalized(self) -> Self {
        SolverConfig {
            batch_size: self.batch_size.max(1),
            workers   : self.workers.max(1),
            ..self
        }
    }
}
