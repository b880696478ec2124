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

//! This module provides the sequential (path based) formulation of the
//! routing problem: a state is a partial route starting in `+0`.

use std::{collections::BTreeSet, fmt, sync::Arc};

use dd_bnb::{Diagram, MaxCostMerger, State};

use crate::{apdual::ApDual, problem::{Problem, Route}};

#[derive(Debug, Clone)]
pub struct Sequential {
    problem: Arc<Problem>,
    /// The previous state of the route (none for the root)
    parent: Option<Arc<Sequential>>,
    /// The last node of the route
    node: usize,
    /// The nodes that may be visited next
    feasible: Vec<usize>,
    /// The cost of the route so far
    cost: i64,
    /// The assignment relaxation inherited from the parent
    ap: Option<ApDual>,
    /// The maximum width of the diagrams (0 = unbounded)
    width: usize,
    /// Shall the node be bounded with a relaxation diagram ?
    relax: bool,
    /// 2 means that every expanded state is printed
    verbosity: u8,
}

impl Sequential {
    /// Creates the root state of the search: the route that only comprises
    /// the start depot.
    pub fn root(problem: Arc<Problem>, infer: bool, relax: bool, width: usize, verbosity: u8) -> Self {
        let ap = if infer { Some(ApDual::new(Arc::clone(&problem))) } else { None };
        Sequential {
            parent  : None,
            node    : problem.start(),
            feasible: problem.pickups().collect(),
            cost    : 0,
            ap,
            width,
            relax,
            verbosity,
            problem,
        }
    }
    pub fn node(&self) -> usize {
        self.node
    }
    pub fn feasible(&self) -> &[usize] {
        &self.feasible
    }
    /// The nodes that may be visited after `next`: those of the current set
    /// without `next`, plus the delivery of `next` if it is a pickup. Once
    /// the last delivery is visited, only the end depot remains.
    fn next_feasible(&self, next: usize) -> Vec<usize> {
        if self.feasible.len() == 1 && self.problem.is_delivery(self.feasible[0]) {
            return vec![self.problem.end()];
        }
        let mut feasible = self.feasible.iter().copied()
            .filter(|n| *n != next)
            .collect::<Vec<_>>();
        if let Some(delivery) = self.problem.delivery_of(next) {
            feasible.push(delivery);
        }
        feasible
    }
}

impl Route for Sequential {
    fn problem(&self) -> &Problem {
        &self.problem
    }
    fn route(&self) -> Vec<usize> {
        let mut route = vec![self.node];
        let mut current = self.parent.as_deref();
        while let Some(state) = current {
            route.push(state.node);
            current = state.parent.as_deref();
        }
        route.reverse();
        route
    }
}

impl fmt::Display for Sequential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cost={:05} path=[{}]", self.cost, self.labels().join(" "))
    }
}

impl State for Sequential {
    type Dual = ApDual;

    fn cost(&self) -> i64 {
        self.cost
    }
    fn is_solved(&self) -> bool {
        self.feasible.is_empty()
    }
    fn expand(&self, inference_dual: Option<&ApDual>, incumbent: Option<i64>) -> Vec<Sequential> {
        let parent = Arc::new(self.clone());
        let ap     = inference_dual.cloned().or_else(|| self.ap.clone());

        let mut states = Vec::with_capacity(self.feasible.len());
        for next in self.feasible.iter().copied() {
            let cost = self.cost + self.problem.cost(self.node, next);
            if incumbent.map_or(false, |best| cost >= best) {
                continue;
            }
            // reduced cost based filtering
            if inference_dual.map_or(false, |dual| dual.filter(self.node, next, incumbent)) {
                continue;
            }
            states.push(Sequential {
                parent  : Some(Arc::clone(&parent)),
                node    : next,
                feasible: self.next_feasible(next),
                cost,
                ap      : ap.clone(),
                ..self.clone()
            });
        }

        if self.verbosity == 2 {
            for state in states.iter() {
                println!("{state}");
            }
        }
        states
    }
    fn infer_diagram(&self) -> Option<Diagram<ApDual>> {
        let ap = self.ap.as_ref()?;
        let ap = match self.parent.as_ref() {
            Some(parent) => ap.set(parent.node, self.node),
            None         => ap.clone(),
        };
        Some(Diagram::new(ap, vec![], self.width))
    }
    fn relax_diagram(&self) -> Option<Diagram<Sequential>> {
        if self.relax {
            Some(Diagram::new(self.clone(), vec![Box::new(relaxation_merger)], self.width))
        } else {
            None
        }
    }
    fn restrict_diagram(&self) -> Option<Diagram<Sequential>> {
        Some(Diagram::new(self.clone(), vec![Box::new(MaxCostMerger)], self.width))
    }
}

/// Keeps the `width - 1` cheapest states as they are and folds all the other
/// ones into the cheapest of them. The folded state may visit next any node
/// that one of the folded states could visit next.
pub fn relaxation_merger(mut states: Vec<Sequential>, width: usize) -> Vec<Sequential> {
    if width == 0 || states.len() <= width {
        return states;
    }
    states.sort_by_key(|s| s.cost);

    let folded   = states.split_off(width - 1);
    let feasible = folded.iter()
        .flat_map(|s| s.feasible.iter().copied())
        .collect::<BTreeSet<_>>();

    if let Some(first) = folded.into_iter().next() {
        states.push(Sequential { feasible: feasible.into_iter().collect(), ..first });
    }
    states
}
