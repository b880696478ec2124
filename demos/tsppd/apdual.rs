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

//! This module provides the assignment problem relaxation of the routing
//! problem. Its optimal value is a lower bound on the cost of any route, and
//! its reduced costs tell which arcs cannot belong to an improving route.

use std::sync::Arc;

use dd_bnb::{Diagram, State};

use crate::problem::Problem;

/// The cost of an arc that may not be used
pub const BIG: i64 = 10_000_000;

/// A (square) linear assignment problem solved with the Hungarian algorithm.
/// Along with an optimal assignment, it maintains an optimal dual solution.
#[derive(Debug, Clone)]
pub struct Assignment {
    costs: Vec<Vec<i64>>,
    /// The dual value of each row
    u: Vec<i64>,
    /// The dual value of each column
    v: Vec<i64>,
    /// The column assigned to each row
    succ: Vec<usize>,
    /// The objective value
    z: i64,
}

impl Assignment {
    /// Creates and solves the assignment problem with the given costs
    pub fn new(costs: Vec<Vec<i64>>) -> Self {
        let n = costs.len();
        let mut ap = Assignment { costs, u: vec![0; n], v: vec![0; n], succ: vec![0; n], z: 0 };
        ap.solve();
        ap
    }
    pub fn z(&self) -> i64 {
        self.z
    }
    /// The column assigned to row `i`
    pub fn successor(&self, i: usize) -> usize {
        self.succ[i]
    }
    /// The reduced cost of the arc (i, j): the least increase of the objective
    /// if that arc were to be forced in the assignment.
    pub fn reduced_cost(&self, i: usize, j: usize) -> i64 {
        self.costs[i][j] - self.u[i] - self.v[j]
    }
    /// Forbids the arc (i, j)
    pub fn remove(&mut self, i: usize, j: usize) {
        self.costs[i][j] = BIG;
    }
    /// (Re)computes an optimal assignment along with optimal duals.
    pub fn solve(&mut self) {
        let n = self.costs.len();
        // 1-based: row 0 and column 0 are sentinels
        let mut u   = vec![0_i64; n + 1];
        let mut v   = vec![0_i64; n + 1];
        let mut p   = vec![0_usize; n + 1];
        let mut way = vec![0_usize; n + 1];

        for i in 1..=n {
            p[0] = i;
            let mut j0   = 0;
            let mut minv = vec![i64::MAX; n + 1];
            let mut used = vec![false; n + 1];
            loop {
                used[j0] = true;
                let i0 = p[j0];
                let mut delta = i64::MAX;
                let mut j1 = 0;
                for j in 1..=n {
                    if used[j] {
                        continue;
                    }
                    let cur = self.costs[i0 - 1][j - 1] - u[i0] - v[j];
                    if cur < minv[j] {
                        minv[j] = cur;
                        way[j]  = j0;
                    }
                    if minv[j] < delta {
                        delta = minv[j];
                        j1    = j;
                    }
                }
                for j in 0..=n {
                    if used[j] {
                        u[p[j]] += delta;
                        v[j]    -= delta;
                    } else {
                        minv[j] -= delta;
                    }
                }
                j0 = j1;
                if p[j0] == 0 {
                    break;
                }
            }
            // augment along the alternating path
            loop {
                let j1 = way[j0];
                p[j0] = p[j1];
                j0 = j1;
                if j0 == 0 {
                    break;
                }
            }
        }

        for j in 1..=n {
            self.succ[p[j] - 1] = j - 1;
        }
        self.u = u[1..].to_vec();
        self.v = v[1..].to_vec();
        self.z = (0..n).map(|i| self.costs[i][self.succ[i]]).sum();
    }
}

/// The inference dual of the routing problem: an assignment relaxation where
/// the arcs of the partial route are forced. The arc `-0 -> +0` is allowed so
/// that a route is a feasible assignment.
#[derive(Debug, Clone)]
pub struct ApDual {
    problem: Arc<Problem>,
    ap: Arc<Assignment>,
}

impl ApDual {
    pub fn new(problem: Arc<Problem>) -> Self {
        let n = problem.nb_nodes();
        let mut costs = vec![vec![BIG; n]; n];
        for (i, row) in costs.iter_mut().enumerate() {
            for (j, cost) in row.iter_mut().enumerate() {
                let closing = i == problem.end() && j == problem.start();
                if closing || problem.is_feasible(i, j) {
                    *cost = problem.cost(i, j);
                }
            }
        }
        ApDual { ap: Arc::new(Assignment::new(costs)), problem }
    }
    pub fn assignment(&self) -> &Assignment {
        &self.ap
    }
    /// Returns a new relaxation where the arc `from -> to` is forced
    pub fn set(&self, from: usize, to: usize) -> Self {
        let n = self.problem.nb_nodes();
        self.without((0..n).filter(|i| *i != from).map(|i| (i, to)))
    }
    /// Returns a new relaxation where none of the given arcs may be used
    pub fn without<I: IntoIterator<Item = (usize, usize)>>(&self, arcs: I) -> Self {
        let mut ap = self.ap.as_ref().clone();
        for (i, j) in arcs {
            ap.remove(i, j);
        }
        ap.solve();
        ApDual { problem: Arc::clone(&self.problem), ap: Arc::new(ap) }
    }
    /// Returns true if the arc `from -> to` cannot belong to a route that is
    /// cheaper than the incumbent.
    pub fn filter(&self, from: usize, to: usize, incumbent: Option<i64>) -> bool {
        incumbent.map_or(false, |best| self.ap.z() + self.ap.reduced_cost(from, to) >= best)
    }
}

impl State for ApDual {
    type Dual = ApDual;

    fn cost(&self) -> i64 {
        self.ap.z()
    }
    /// The relaxation is never a route by itself
    fn is_solved(&self) -> bool {
        false
    }
    /// The relaxation does not change when the diagram goes one layer deeper
    fn expand(&self, _: Option<&ApDual>, _: Option<i64>) -> Vec<ApDual> {
        vec![self.clone()]
    }
    fn infer_diagram(&self) -> Option<Diagram<ApDual>> {
        Some(Diagram::new(self.clone(), vec![], 0))
    }
    fn relax_diagram(&self) -> Option<Diagram<ApDual>> {
        Some(Diagram::new(self.clone(), vec![], 0))
    }
    fn restrict_diagram(&self) -> Option<Diagram<ApDual>> {
        Some(Diagram::new(self.clone(), vec![], 0))
    }
}
