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

//! This module provides the implementation of the queue which holds the
//! search nodes that are still to be explored.

use std::{cmp::Ordering, collections::VecDeque, vec};

use compare::Compare;

use crate::{Node, State};

/// This comparator orders the search nodes by increasing dual bound, and
/// then by increasing primal bound.
#[derive(Debug, Default, Copy, Clone)]
pub struct NodeOrder;
impl <S> Compare<Node<S>> for NodeOrder {
    fn compare(&self, l: &Node<S>, r: &Node<S>) -> Ordering {
        l.dual.cmp(&r.dual).then_with(|| l.primal.cmp(&r.primal))
    }
}

/// An approximate priority queue. It holds the pending nodes as a sequence
/// of batches, each of which is sorted by increasing `(dual, primal)`.
///
/// New batches are pushed in front of the older ones, and nodes are always
/// popped from the front batch. Hence, exploration is best first within a
/// batch but most recent first across batches. This trades a strict global
/// order for an O(1) pop and an O(b log b) insertion of a batch of b nodes.
///
/// # Note:
/// Batches are never merged with one another.
pub struct BatchQueue<S> {
    /// The batches; the front one is the most recent
    batches: VecDeque<vec::IntoIter<Node<S>>>,
    /// The total number of nodes remaining in all batches
    len: usize,
}

impl <S: State> BatchQueue<S> {
    /// Creates a queue holding one batch with a single zero cost node that
    /// wraps the given root state.
    pub fn new(root: S) -> Self {
        let mut batches = VecDeque::new();
        batches.push_front(vec![Node::root(root)].into_iter());
        BatchQueue { batches, len: 1 }
    }
    /// Pushes the given candidates onto the queue as a new batch. Candidates
    /// whose dual and primal bounds both fail to improve on the incumbent
    /// are dropped. The survivors are sorted and pushed in front of all the
    /// other batches.
    pub fn extend(&mut self, mut candidates: Vec<Node<S>>, incumbent: Option<&S>) {
        if let Some(best) = incumbent.map(|s| s.cost()) {
            candidates.retain(|n| n.dual < best || n.primal < best);
        }
        if candidates.is_empty() {
            return;
        }
        candidates.sort_by(|a, b| NodeOrder.compare(a, b));

        self.len += candidates.len();
        self.batches.push_front(candidates.into_iter());
    }
    /// Pops the first node of the front batch. It returns None when the queue
    /// is empty.
    pub fn pop(&mut self) -> Option<Node<S>> {
        let front = self.batches.front_mut()?;
        let node  = front.next();
        if front.len() == 0 {
            self.batches.pop_front();
        }
        if node.is_some() {
            self.len -= 1;
        }
        node
    }
    /// Yields the number of nodes remaining in the queue
    pub fn len(&self) -> usize {
        self.len
    }
    /// Returns true iff there is no node left in the queue
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
    /// Yields the number of batches in the queue
    pub fn nb_batches(&self) -> usize {
        self.batches.len()
    }
}

// ############################################################################
// #### TESTS #################################################################
// ############################################################################

#[cfg(test)]
mod test_batch_queue {
    use std::{cmp::Ordering, sync::Arc};

    use compare::Compare;

    use crate::{BatchQueue, Node, NodeOrder, test_utils::{Tour, four_nodes}};

    fn state(cost: i64) -> Tour {
        Tour::new(Arc::new(four_nodes()), 0).with_cost(cost)
    }
    fn node(dual: i64, primal: i64) -> Node<Tour> {
        Node { state: state(primal), dual, primal }
    }
    fn bounds(node: Option<Node<Tour>>) -> (i64, i64) {
        let node = node.unwrap();
        (node.dual, node.primal)
    }

    #[test]
    fn a_new_queue_holds_the_root_node_only() {
        let root  = state(0);
        let mut q = BatchQueue::new(root.clone());
        assert_eq!(1, q.len());
        assert_eq!(1, q.nb_batches());
        let n = q.pop().unwrap();
        assert_eq!(root, n.state);
        assert_eq!((0, 0), (n.dual, n.primal));
        assert!(q.is_empty());
    }
    #[test]
    fn pop_returns_none_when_the_queue_is_empty() {
        let mut q = BatchQueue::new(state(0));
        q.pop();
        assert!(q.pop().is_none());
        assert_eq!(0, q.len());
    }
    #[test]
    fn nodes_of_a_batch_are_popped_by_increasing_dual_then_primal() {
        let mut q = BatchQueue::new(state(0));
        q.pop();
        q.extend(vec![node(5, 5), node(2, 2), node(9, 1)], None);
        assert_eq!(3, q.len());
        assert_eq!((2, 2), bounds(q.pop()));
        assert_eq!((5, 5), bounds(q.pop()));
        assert_eq!((9, 1), bounds(q.pop()));
        assert!(q.is_empty());
    }
    #[test]
    fn ties_on_the_dual_are_broken_by_the_primal() {
        let mut q = BatchQueue::new(state(0));
        q.pop();
        q.extend(vec![node(3, 8), node(3, 4), node(1, 9)], None);
        assert_eq!((1, 9), bounds(q.pop()));
        assert_eq!((3, 4), bounds(q.pop()));
        assert_eq!((3, 8), bounds(q.pop()));
    }
    #[test]
    fn the_most_recent_batch_is_popped_first() {
        let mut q = BatchQueue::new(state(0));
        q.pop();
        q.extend(vec![node(5, 5), node(2, 2), node(9, 1)], None);
        assert_eq!((2, 2), bounds(q.pop()));
        q.extend(vec![node(1, 1)], None);
        assert_eq!(3, q.len());
        assert_eq!(2, q.nb_batches());
        assert_eq!((1, 1), bounds(q.pop()));
        assert_eq!((5, 5), bounds(q.pop()));
        assert_eq!((9, 1), bounds(q.pop()));
    }
    #[test]
    fn the_newest_batch_goes_first_even_if_its_bounds_are_worse() {
        let mut q = BatchQueue::new(state(0));
        q.extend(vec![node(40, 40)], None);
        assert_eq!(2, q.len());
        assert_eq!((40, 40), bounds(q.pop()));
        assert_eq!((0, 0), bounds(q.pop()));
    }
    #[test]
    fn extend_drops_nodes_whose_bounds_both_reach_the_incumbent() {
        let incumbent = state(10);
        let mut q = BatchQueue::new(state(0));
        q.pop();
        q.extend(vec![node(10, 10), node(3, 12)], Some(&incumbent));
        assert_eq!(1, q.len());
        assert_eq!((3, 12), bounds(q.pop()));
    }
    #[test]
    fn extend_keeps_nodes_with_a_primal_better_than_the_incumbent() {
        let incumbent = state(10);
        let mut q = BatchQueue::new(state(0));
        q.pop();
        q.extend(vec![node(12, 9), node(11, 11)], Some(&incumbent));
        assert_eq!(1, q.len());
        assert_eq!((12, 9), bounds(q.pop()));
    }
    #[test]
    fn extending_with_nothing_does_not_create_a_batch() {
        let incumbent = state(10);
        let mut q = BatchQueue::new(state(0));
        q.extend(vec![], None);
        q.extend(vec![node(10, 10)], Some(&incumbent));
        assert_eq!(1, q.len());
        assert_eq!(1, q.nb_batches());
    }
    #[test]
    fn len_is_the_number_of_remaining_nodes_in_all_batches() {
        let mut q = BatchQueue::new(state(0));
        q.extend(vec![node(1, 1), node(2, 2)], None);
        q.extend(vec![node(3, 3), node(4, 4), node(5, 5)], None);
        assert_eq!(6, q.len());
        q.pop();
        q.pop();
        assert_eq!(4, q.len());
        q.pop();
        q.pop();
        q.pop();
        q.pop();
        assert_eq!(0, q.len());
        assert_eq!(0, q.nb_batches());
    }
    #[test]
    fn node_order_compares_the_dual_first() {
        assert_eq!(Ordering::Less,    NodeOrder.compare(&node(1, 9), &node(2, 0)));
        assert_eq!(Ordering::Greater, NodeOrder.compare(&node(2, 0), &node(1, 9)));
        assert_eq!(Ordering::Less,    NodeOrder.compare(&node(1, 1), &node(1, 2)));
        assert_eq!(Ordering::Equal,   NodeOrder.compare(&node(1, 1), &node(1, 1)));
    }
}
