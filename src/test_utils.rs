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

//! This module provides the test domain which is used throughout the unit
//! tests of this crate: the search for a least cost Hamiltonian path (starting
//! in node 0) over a small weighted digraph.
#![cfg(test)]

use std::sync::Arc;

use crate::{Diagram, MaxCostMerger, State};

/// A weighted digraph. `arcs[i][j]` is the weight of the arc i -> j (if any).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Graph {
    pub arcs: Vec<Vec<Option<i64>>>,
}
impl Graph {
    /// Creates a complete digraph from the given weights matrix. The diagonal
    /// is ignored.
    pub fn complete(weights: &[&[i64]]) -> Self {
        let arcs = weights.iter().enumerate()
            .map(|(i, row)| row.iter().enumerate()
                .map(|(j, w)| if i == j { None } else { Some(*w) })
                .collect())
            .collect();
        Graph { arcs }
    }
    pub fn nb_nodes(&self) -> usize {
        self.arcs.len()
    }
}

/// A partial Hamiltonian path starting in node 0. Its restriction diagram
/// truncates layers down to `width` states (0 = unbounded) and, when `relax`
/// is set, its relaxation diagram is an unbounded (hence exact) diagram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tour {
    graph: Arc<Graph>,
    path : Vec<usize>,
    cost : i64,
    width: usize,
    relax: bool,
}
impl Tour {
    pub fn new(graph: Arc<Graph>, width: usize) -> Self {
        Tour { graph, path: vec![0], cost: 0, width, relax: false }
    }
    pub fn with_relaxation(mut self) -> Self {
        self.relax = true;
        self
    }
    pub fn with_cost(mut self, cost: i64) -> Self {
        self.cost = cost;
        self
    }
    pub fn path(&self) -> &[usize] {
        &self.path
    }
}
impl State for Tour {
    type Dual = Tour;

    fn cost(&self) -> i64 {
        self.cost
    }
    fn is_solved(&self) -> bool {
        self.path.len() == self.graph.nb_nodes()
    }
    fn expand(&self, _: Option<&Tour>, incumbent: Option<i64>) -> Vec<Tour> {
        if self.is_solved() {
            return vec![];
        }
        let last = self.path[self.path.len() - 1];
        let mut out = vec![];
        for j in 0..self.graph.nb_nodes() {
            if self.path.contains(&j) {
                continue;
            }
            if let Some(w) = self.graph.arcs[last][j] {
                let cost = self.cost + w;
                if incumbent.map_or(false, |best| cost >= best) {
                    continue;
                }
                let mut path = self.path.clone();
                path.push(j);
                out.push(Tour { path, cost, ..self.clone() });
            }
        }
        out
    }
    fn infer_diagram(&self) -> Option<Diagram<Tour>> {
        None
    }
    fn relax_diagram(&self) -> Option<Diagram<Tour>> {
        if self.relax {
            Some(Diagram::new(self.clone(), vec![], 0))
        } else {
            None
        }
    }
    fn restrict_diagram(&self) -> Option<Diagram<Tour>> {
        Some(Diagram::new(self.clone(), vec![Box::new(MaxCostMerger)], self.width))
    }
}

/// The optimal path is 0 1 2 3 with cost 6.
pub fn four_nodes() -> Graph {
    Graph::complete(&[
        &[0, 1, 4, 7],
        &[2, 0, 2, 9],
        &[6, 8, 0, 3],
        &[5, 6, 3, 0],
    ])
}
/// The (unique) optimal path is 0 4 1 3 2 with cost 16.
pub fn five_nodes() -> Graph {
    Graph::complete(&[
        &[ 0, 14,  2, 19,  4],
        &[ 8,  0, 19,  2, 19],
        &[19, 13,  0,  2,  8],
        &[ 2, 18,  5,  0, 10],
        &[14,  5, 18,  4,  0],
    ])
}
/// There is no Hamiltonian path starting in 0: node 3 can only be reached
/// from node 0 and nothing leaves node 3.
pub fn dead_end() -> Graph {
    Graph {
        arcs: vec![
            vec![None,    Some(1), Some(2), Some(9)],
            vec![Some(1), None,    Some(1), None   ],
            vec![Some(2), Some(1), None,    None   ],
            vec![None,    None,    None,    None   ],
        ]
    }
}
