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

//! This module provides the successor formulation of the routing problem.
//! Each layer of a diagram assigns the successor of one more node, in a
//! fixed decision order. A state is thus a set of disjoint partial routes
//! (chains) along with the precedences that these chains imply.

use std::{cmp::Reverse, fmt, sync::Arc};

use bitset_fixed::BitSet;
use clap::ValueEnum;
use dd_bnb::{Diagram, MaxCostMerger, State};

use crate::{apdual::ApDual, problem::{Kind, Problem, Route}};

/// The order in which the nodes get their successor assigned
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Order {
    /// Least cost outgoing arc first
    Greedy,
    /// The order of the instance file
    Input,
    /// Largest gap between the two cheapest outgoing arcs first
    Regret,
}
impl Order {
    pub fn name(self) -> &'static str {
        match self {
            Order::Greedy => "greedy",
            Order::Input  => "input",
            Order::Regret => "regret",
        }
    }
}

#[derive(Clone)]
pub struct Successor {
    problem: Arc<Problem>,
    /// The cost of all assigned arcs
    cost: i64,
    /// The nodes that are nobody's successor yet
    domain: Vec<usize>,
    /// The nodes of the chain of each node. All the nodes of a chain share
    /// the very same set.
    partial: Vec<Arc<BitSet>>,
    prev: Vec<Option<usize>>,
    next: Vec<Option<usize>>,
    /// The nodes that must come before each node
    pred: Vec<Arc<BitSet>>,
    /// The nodes that must come after each node
    succ: Vec<Arc<BitSet>>,
    /// The decision order
    ordering: Arc<[usize]>,
    /// The number of assigned successors
    depth: usize,
    /// The assignment relaxation inherited from the parent
    ap: Option<ApDual>,
    /// The maximum width of the diagrams (0 = unbounded)
    width: usize,
    /// 2 means that every expanded state is printed
    verbosity: u8,
}

impl Successor {
    /// Creates the root state of the search: no successor is assigned yet
    pub fn root(problem: Arc<Problem>, infer: bool, order: Order, width: usize, verbosity: u8) -> Self {
        let n = problem.nb_nodes();

        let mut pred = Vec::with_capacity(n);
        let mut succ = Vec::with_capacity(n);
        for a in 0..n {
            let mut before = BitSet::new(n);
            let mut after  = BitSet::new(n);
            for b in (0..n).filter(|b| *b != a) {
                match problem.kind(a) {
                    Kind::Start    => after.set(b, true),
                    Kind::End      => before.set(b, true),
                    Kind::Pickup   => {
                        if problem.precedes(a, b) || b == problem.end() {
                            after.set(b, true);
                        }
                        if b == problem.start() {
                            before.set(b, true);
                        }
                    },
                    Kind::Delivery => {
                        if problem.precedes(b, a) || b == problem.start() {
                            before.set(b, true);
                        }
                        if b == problem.end() {
                            after.set(b, true);
                        }
                    },
                }
            }
            pred.push(Arc::new(before));
            succ.push(Arc::new(after));
        }

        let partial = (0..n)
            .map(|a| {
                let mut chain = BitSet::new(n);
                chain.set(a, true);
                Arc::new(chain)
            })
            .collect();

        let mut root = Successor {
            cost    : 0,
            domain  : (0..n).filter(|a| *a != problem.start()).collect(),
            partial,
            prev    : vec![None; n],
            next    : vec![None; n],
            pred,
            succ,
            ordering: Arc::from(Vec::new()),
            depth   : 0,
            ap      : if infer { Some(ApDual::new(Arc::clone(&problem))) } else { None },
            width,
            verbosity,
            problem,
        };
        root.ordering = Arc::from(root.decision_order(order));
        root
    }
    /// The nodes in the order their successor is assigned
    pub fn ordering(&self) -> &[usize] {
        &self.ordering
    }
    /// The successor assigned to `node` (if any)
    pub fn successor(&self, node: usize) -> Option<usize> {
        self.next[node]
    }
    /// The nodes known to come before `node` in any completion of this state
    pub fn must_precede(&self, node: usize) -> Vec<usize> {
        members(&self.pred[node], self.problem.nb_nodes())
    }
    /// The nodes known to come after `node` in any completion of this state
    pub fn must_follow(&self, node: usize) -> Vec<usize> {
        members(&self.succ[node], self.problem.nb_nodes())
    }
    /// The nodes that may be assigned as successor of `from`
    pub fn candidates(&self, from: usize) -> Vec<usize> {
        let chain  = &self.partial[from];
        let before = &self.pred[from];
        let after  = &self.succ[from];
        self.domain.iter().copied()
            // closing a cycle
            .filter(|to| !Arc::ptr_eq(chain, &self.partial[*to]))
            .filter(|to| !intersects(chain, &self.succ[*to]) && !intersects(before, &self.partial[*to]))
            .filter(|to| !intersects(before, &self.succ[*to]) && !intersects(after, &self.pred[*to]))
            .collect()
    }
    /// The chains comprising at least one arc, each one from its first node
    pub fn chains(&self) -> Vec<Vec<usize>> {
        let mut chains = vec![];
        for head in (0..self.next.len()).filter(|n| self.prev[*n].is_none()) {
            let chain = self.follow(head);
            if chain.len() > 1 {
                chains.push(chain);
            }
        }
        chains
    }

    fn follow(&self, head: usize) -> Vec<usize> {
        let mut chain = vec![head];
        let mut current = head;
        while let Some(next) = self.next[current] {
            chain.push(next);
            current = next;
        }
        chain
    }
    fn decision_order(&self, order: Order) -> Vec<usize> {
        let end   = self.problem.end();
        let nodes = (0..self.problem.nb_nodes()).filter(|n| *n != end);
        match order {
            Order::Input  => nodes.collect(),
            Order::Greedy => {
                let mut keyed = nodes.map(|n| (n, self.two_cheapest(n).0)).collect::<Vec<_>>();
                keyed.sort_by_key(|(_, cost)| *cost);
                keyed.into_iter().map(|(n, _)| n).collect()
            },
            Order::Regret => {
                let mut keyed = nodes
                    .map(|n| {
                        let (first, second) = self.two_cheapest(n);
                        (n, second.saturating_sub(first))
                    })
                    .collect::<Vec<_>>();
                keyed.sort_by_key(|(_, regret)| Reverse(*regret));
                keyed.into_iter().map(|(n, _)| n).collect()
            },
        }
    }
    /// The two least costs of an arc leaving `from` (`i64::MAX` if missing)
    fn two_cheapest(&self, from: usize) -> (i64, i64) {
        let mut first  = i64::MAX;
        let mut second = i64::MAX;
        for to in self.candidates(from) {
            let cost = self.problem.cost(from, to);
            if cost < first {
                second = first;
                first  = cost;
            } else if cost < second {
                second = cost;
            }
        }
        (first, second)
    }
    /// Creates the state where `to` is the successor of `from`
    fn assign(&self, from: usize, to: usize, ap: Option<ApDual>) -> Successor {
        let n = self.problem.nb_nodes();

        let chain  = union(&self.partial[from], &self.partial[to], n);
        let before = Arc::new(union_minus(&self.pred[from], &self.pred[to], &chain, n));
        let after  = Arc::new(union_minus(&self.succ[from], &self.succ[to], &chain, n));
        let nodes  = members(&chain, n);
        let chain  = Arc::new(chain);

        let mut partial = self.partial.clone();
        let mut pred    = self.pred.clone();
        let mut succ    = self.succ.clone();
        for node in nodes {
            partial[node] = Arc::clone(&chain);
            pred[node]    = Arc::clone(&before);
            succ[node]    = Arc::clone(&after);
        }
        let mut prev = self.prev.clone();
        let mut next = self.next.clone();
        prev[to]   = Some(from);
        next[from] = Some(to);

        let mut state = Successor {
            problem : Arc::clone(&self.problem),
            cost    : self.cost + self.problem.cost(from, to),
            domain  : self.domain.iter().copied().filter(|n| *n != to).collect(),
            partial,
            prev,
            next,
            pred,
            succ,
            ordering: Arc::clone(&self.ordering),
            depth   : self.depth + 1,
            ap,
            width   : self.width,
            verbosity: self.verbosity,
        };
        state.propagate(from);
        state
    }
    /// Whatever precedes the chain of `node` also precedes what must follow
    /// that chain, and conversely.
    fn propagate(&mut self, node: usize) {
        let n = self.problem.nb_nodes();

        let before = union(&self.pred[node], &self.partial[node], n);
        for later in members(&self.succ[node], n) {
            self.pred[later] = Arc::new(union_minus(&before, &self.pred[later], &self.partial[later], n));
        }
        let after = union(&self.succ[node], &self.partial[node], n);
        for earlier in members(&self.pred[node], n) {
            self.succ[earlier] = Arc::new(union_minus(&after, &self.succ[earlier], &self.partial[earlier], n));
        }
    }
}

fn members(set: &BitSet, n: usize) -> Vec<usize> {
    (0..n).filter(|i| set[*i]).collect()
}
fn intersects(a: &BitSet, b: &BitSet) -> bool {
    a.buffer().iter().zip(b.buffer()).any(|(x, y)| x & y != 0)
}
fn union(a: &BitSet, b: &BitSet, n: usize) -> BitSet {
    let mut u = BitSet::new(n);
    for i in (0..n).filter(|i| a[*i] || b[*i]) {
        u.set(i, true);
    }
    u
}
/// The union of `a` and `b`, without the elements of `out`
fn union_minus(a: &BitSet, b: &BitSet, out: &BitSet, n: usize) -> BitSet {
    let mut u = BitSet::new(n);
    for i in (0..n).filter(|i| !out[*i] && (a[*i] || b[*i])) {
        u.set(i, true);
    }
    u
}

impl Route for Successor {
    fn problem(&self) -> &Problem {
        &self.problem
    }
    fn route(&self) -> Vec<usize> {
        self.follow(self.problem.start())
    }
}

impl fmt::Display for Successor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label  = |n: &usize| self.problem.label(*n).to_string();
        let domain = self.domain.iter().map(label).collect::<Vec<_>>();
        let chains = self.chains().into_iter()
            .map(|c| format!("[{}]", c.iter().map(label).collect::<Vec<_>>().join(" ")))
            .collect::<Vec<_>>();
        write!(f, "cost={:05} domain=[{}] partials=[{}]", self.cost, domain.join(" "), chains.join(" "))
    }
}

impl State for Successor {
    type Dual = ApDual;

    fn cost(&self) -> i64 {
        self.cost
    }
    fn is_solved(&self) -> bool {
        self.domain.is_empty()
    }
    fn expand(&self, inference_dual: Option<&ApDual>, incumbent: Option<i64>) -> Vec<Successor> {
        let Some(from) = self.ordering.get(self.depth).copied() else { return vec![] };
        let ap = inference_dual.cloned().or_else(|| self.ap.clone());

        let mut states = vec![];
        for to in self.candidates(from) {
            if incumbent.map_or(false, |best| self.cost + self.problem.cost(from, to) >= best) {
                continue;
            }
            if inference_dual.map_or(false, |dual| dual.filter(from, to, incumbent)) {
                continue;
            }
            states.push(self.assign(from, to, ap.clone()));
        }

        if self.verbosity == 2 {
            for state in states.iter() {
                println!("{state}");
            }
        }
        states
    }
    /// The inherited relaxation where the last assigned arc is forced, and
    /// the arcs bypassing its origin are removed.
    fn infer_diagram(&self) -> Option<Diagram<ApDual>> {
        let ap = self.ap.as_ref()?;
        let last = self.depth.checked_sub(1)
            .map(|d| self.ordering[d])
            .and_then(|from| self.next[from].map(|to| (from, to)));

        let ap = match last {
            None           => ap.clone(),
            Some((from, to)) => {
                let n        = self.problem.nb_nodes();
                let earlier  = self.must_precede(from);
                let later    = self.must_follow(from);
                let forced   = (0..n).filter(|i| *i != from).map(|i| (i, to));
                let bypasses = earlier.iter()
                    .flat_map(|p| later.iter().map(move |s| (*p, *s)));
                ap.without(forced.chain(bypasses))
            },
        };
        Some(Diagram::new(ap, vec![], self.width))
    }
    fn relax_diagram(&self) -> Option<Diagram<Successor>> {
        None
    }
    fn restrict_diagram(&self) -> Option<Diagram<Successor>> {
        Some(Diagram::new(self.clone(), vec![Box::new(MaxCostMerger)], self.width))
    }
}
