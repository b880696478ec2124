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

//! This module provides the bound record and the bound computation which is
//! performed (in parallel) for each search node.

use crate::{Label, State};

/// The outcome of the bound computation for one search node. It ties the
/// state of the node (`root`) to the best states of its inference, relaxation
/// and restriction diagrams along with a label that tells how the search
/// must proceed with that node.
pub struct Bound<S: State> {
    /// The state that was bounded
    pub root: S,
    /// The best state of the last layer of the inference diagram (if any)
    pub inference_dual: Option<S::Dual>,
    /// The best state of the last layer of the relaxation diagram (if any)
    pub relaxation_dual: Option<S>,
    /// The best state found by the restriction diagram
    pub primal: S,
    /// The classification of this bound
    pub label: Label,
}

impl <S: State> Bound<S> {
    /// The dual (lower) bound on the cost of any solution in the subtree
    /// rooted in `root`. This bound is floored at zero: costs are assumed
    /// to be non-negative.
    pub fn dual_bound(&self) -> i64 {
        let infer = self.inference_dual.as_ref().map_or(0, |s| s.cost());
        let relax = self.relaxation_dual.as_ref().map_or(0, |s| s.cost());
        0.max(infer).max(relax)
    }
    /// The primal (upper) bound, that is the cost of the primal state.
    pub fn primal_bound(&self) -> i64 {
        self.primal.cost()
    }
    /// Returns true iff this bound found a complete solution which is
    /// strictly better than the given incumbent.
    pub fn is_better_than(&self, incumbent: Option<&S>) -> bool {
        self.label != Label::Failed
            && self.primal.is_solved()
            && incumbent.map_or(true, |best| self.primal.cost() < best.cost())
    }
    /// The classification of this bound
    pub fn label(&self) -> Label {
        self.label
    }
    /// Returns true iff the subtree has been solved to optimality
    pub fn is_exact(&self) -> bool {
        self.label == Label::Exact
    }
    /// Returns true iff the subtree cannot improve on the incumbent
    pub fn is_failed(&self) -> bool {
        self.label == Label::Failed
    }
    /// Returns true iff the subtree must be branched on
    pub fn is_relaxed(&self) -> bool {
        self.label == Label::Relaxed
    }

    /// Bounds the subtree rooted in the given state. This compiles the
    /// inference, relaxation and restriction diagrams of `root` in lockstep,
    /// one layer at a time, until the restriction is exhausted or it becomes
    /// clear that the node cannot improve on the incumbent.
    ///
    /// # Panics
    /// When `root` has no restriction diagram.
    pub fn compute(root: S, incumbent: Option<&S>) -> Self {
        let best = incumbent.map(|s| s.cost());
        let cannot_improve = |cost: i64| best.map_or(false, |b| cost >= b);

        let mut infer = root.infer_diagram();
        let mut relax = root.relax_diagram();
        let Some(mut restrict) = root.restrict_diagram() else {
            panic!("a state must always provide a restriction diagram");
        };

        let mut dual_bound      = root.cost();
        let mut inference_dual  = None;
        let mut relaxation_dual = None;
        let mut primal          = root.clone();

        while !restrict.is_done() {
            if let Some(dd) = infer.as_ref() {
                let Some(dual) = dd.layer().best() else {
                    return Self::failed(root, inference_dual, relaxation_dual, primal);
                };
                let cost = dual.cost();
                inference_dual = Some(dual.clone());
                if cannot_improve(cost) {
                    return Self::failed(root, inference_dual, relaxation_dual, primal);
                }
                dual_bound = dual_bound.max(cost);
            }
            if let Some(dd) = relax.as_ref() {
                let Some(dual) = dd.layer().best() else {
                    return Self::failed(root, inference_dual, relaxation_dual, primal);
                };
                let cost = dual.cost();
                relaxation_dual = Some(dual.clone());
                if cannot_improve(cost) {
                    return Self::failed(root, inference_dual, relaxation_dual, primal);
                }
                dual_bound = dual_bound.max(cost);
            }

            if let Some(state) = restrict.layer().best() {
                primal = state.clone();
            }
            if restrict.layer().is_exact() && cannot_improve(primal.cost()) {
                return Self::failed(root, inference_dual, relaxation_dual, primal);
            }

            if let Some(dd) = infer.as_mut() {
                dd.advance(inference_dual.as_ref(), best);
            }
            if let Some(dd) = relax.as_mut() {
                dd.advance(inference_dual.as_ref(), best);
            }
            restrict.advance(inference_dual.as_ref(), best);
        }

        let label = if primal.is_solved() {
            if dual_bound < primal.cost() { Label::Relaxed } else { Label::Exact }
        } else if restrict.layer().is_exact() {
            Label::Failed
        } else {
            // merging may have hidden the feasible solutions: branch on root
            primal = root.clone();
            Label::Relaxed
        };

        Bound { root, inference_dual, relaxation_dual, primal, label }
    }

    fn failed(root: S, inference_dual: Option<S::Dual>, relaxation_dual: Option<S>, primal: S) -> Self {
        Bound { root, inference_dual, relaxation_dual, primal, label: Label::Failed }
    }
}

// ############################################################################
// #### TESTS #################################################################
// ############################################################################

#[cfg(test)]
mod test_bound {
    use std::sync::Arc;

    use crate::{Bound, Label, State, test_utils::{Tour, dead_end, four_nodes, five_nodes}};

    #[test]
    fn an_exact_relaxation_closes_the_gap() {
        let root  = Tour::new(Arc::new(four_nodes()), 0).with_relaxation();
        let bound = Bound::compute(root, None);
        assert_eq!(Label::Exact, bound.label());
        assert!(bound.is_exact());
        assert_eq!(6, bound.dual_bound());
        assert_eq!(6, bound.primal_bound());
        assert_eq!(&[0, 1, 2, 3], bound.primal.path());
    }
    #[test]
    fn without_any_dual_a_gap_remains() {
        let root  = Tour::new(Arc::new(four_nodes()), 0);
        let bound = Bound::compute(root, None);
        assert_eq!(Label::Relaxed, bound.label());
        assert!(bound.is_relaxed());
        assert!(bound.relaxation_dual.is_none());
        assert!(bound.inference_dual.is_none());
        assert_eq!(0, bound.dual_bound());
        assert_eq!(6, bound.primal_bound());
        assert!(bound.primal.is_solved());
    }
    #[test]
    fn an_exact_restriction_without_solution_fails() {
        let root  = Tour::new(Arc::new(dead_end()), 0);
        let bound = Bound::compute(root, None);
        assert_eq!(Label::Failed, bound.label());
        assert!(bound.is_failed());
    }
    #[test]
    fn an_inexact_restriction_without_solution_branches_on_the_root() {
        let root  = Tour::new(Arc::new(dead_end()), 1);
        let bound = Bound::compute(root.clone(), None);
        assert_eq!(Label::Relaxed, bound.label());
        assert_eq!(root, bound.primal);
        assert_eq!(root, bound.root);
        assert!(!bound.is_better_than(None));
    }
    #[test]
    fn a_node_that_cannot_improve_on_the_incumbent_fails() {
        let incumbent = Tour::new(Arc::new(four_nodes()), 0).with_cost(6);
        let root  = Tour::new(Arc::new(four_nodes()), 0).with_relaxation();
        let bound = Bound::compute(root, Some(&incumbent));
        assert_eq!(Label::Failed, bound.label());
        assert!(!bound.is_better_than(Some(&incumbent)));
    }
    #[test]
    fn a_node_fails_as_soon_as_its_exact_primal_reaches_the_incumbent() {
        let incumbent = Tour::new(Arc::new(four_nodes()), 0).with_cost(0);
        let root  = Tour::new(Arc::new(four_nodes()), 0);
        let bound = Bound::compute(root.clone(), Some(&incumbent));
        assert_eq!(Label::Failed, bound.label());
        assert_eq!(root, bound.primal);
    }
    #[test]
    fn a_restricted_primal_may_be_suboptimal() {
        let root  = Tour::new(Arc::new(five_nodes()), 1).with_relaxation();
        let bound = Bound::compute(root, None);
        assert_eq!(Label::Relaxed, bound.label());
        assert_eq!(&[0, 2, 3, 4, 1], bound.primal.path());
        assert_eq!(19, bound.primal_bound());
        assert_eq!(16, bound.dual_bound());
    }
    #[test]
    fn is_better_than_requires_a_strictly_cheaper_solution() {
        let root  = Tour::new(Arc::new(four_nodes()), 0);
        let bound = Bound::compute(root.clone(), None);
        assert!(bound.is_better_than(None));
        assert!(bound.is_better_than(Some(&root.clone().with_cost(7))));
        assert!(!bound.is_better_than(Some(&root.clone().with_cost(6))));
        assert!(!bound.is_better_than(Some(&root.with_cost(5))));
    }
    #[test]
    fn bound_accessors_are_idempotent() {
        let root  = Tour::new(Arc::new(five_nodes()), 2).with_relaxation();
        let bound = Bound::compute(root, None);
        assert_eq!(bound.dual_bound(), bound.dual_bound());
        assert_eq!(bound.primal_bound(), bound.primal_bound());
        assert_eq!(bound.label(), bound.label());
    }
    #[test]
    fn exactly_one_label_predicate_holds() {
        let bounds = [
            Bound::compute(Tour::new(Arc::new(four_nodes()), 0).with_relaxation(), None),
            Bound::compute(Tour::new(Arc::new(four_nodes()), 0), None),
            Bound::compute(Tour::new(Arc::new(dead_end()), 0), None),
        ];
        let labels = bounds.iter().map(|b| b.label()).collect::<Vec<_>>();
        assert_eq!(vec![Label::Exact, Label::Relaxed, Label::Failed], labels);
        for bound in bounds.iter() {
            let holding = [bound.is_exact(), bound.is_failed(), bound.is_relaxed()];
            assert_eq!(1, holding.iter().filter(|b| **b).count());
            assert_eq!(bound.is_exact(),   bound.label() == Label::Exact);
            assert_eq!(bound.is_failed(),  bound.label() == Label::Failed);
            assert_eq!(bound.is_relaxed(), bound.label() == Label::Relaxed);
        }
    }
    #[test]
    #[should_panic]
    fn a_state_without_restriction_is_a_contract_violation() {
        #[derive(Debug, Clone)]
        struct NoRestriction;
        impl State for NoRestriction {
            type Dual = NoRestriction;
            fn cost(&self) -> i64 { 0 }
            fn is_solved(&self) -> bool { true }
            fn expand(&self, _: Option<&Self>, _: Option<i64>) -> Vec<Self> { vec![] }
            fn infer_diagram(&self) -> Option<crate::Diagram<Self>> { None }
            fn relax_diagram(&self) -> Option<crate::Diagram<Self>> { None }
            fn restrict_diagram(&self) -> Option<crate::Diagram<Self>> { None }
        }
        Bound::compute(NoRestriction, None);
    }
}
