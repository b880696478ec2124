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

//! This module provides the implementation of one layer of a decision diagram.

use std::rc::Rc;

use crate::{Merger, State};

/// The mergers a layer may apply to shrink itself. They are shared by all
/// layers of a given diagram.
pub type Mergers<S> = Rc<[Box<dyn Merger<S>>]>;

/// A layer is one depth level of a decision diagram: an unordered collection
/// of states along with the maximum width of the diagram and a flag telling
/// whether any information has been lost (through merging) while building
/// this or any of the previous layers.
///
/// # Note:
/// A `width` of zero means that the layer is unbounded (merging never occurs).
pub struct Layer<S> {
    /// The depth of this layer in its diagram (the root layer has depth 0)
    depth: usize,
    /// The states composing this layer
    states: Vec<S>,
    /// The maximum number of states in a layer (0 = unbounded)
    width: usize,
    /// False as soon as some merger discarded information
    is_exact: bool,
    /// The mergers to apply when the layer grows larger than `width`
    mergers: Mergers<S>,
}

impl <S: State> Layer<S> {
    /// Creates the root layer of a diagram: it has depth 0, comprises one
    /// single state and is exact.
    pub fn root(state: S, mergers: Mergers<S>, width: usize) -> Self {
        Layer { depth: 0, states: vec![state], width, is_exact: true, mergers }
    }
    /// The depth of this layer
    pub fn depth(&self) -> usize {
        self.depth
    }
    /// The maximum width of this layer (0 = unbounded)
    pub fn width(&self) -> usize {
        self.width
    }
    /// The states of this layer
    pub fn states(&self) -> &[S] {
        &self.states
    }
    /// The number of states in this layer
    pub fn len(&self) -> usize {
        self.states.len()
    }
    /// Returns true iff this layer comprises no state at all
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
    /// Returns true iff no information has ever been discarded while this
    /// layer (and its predecessors) were built
    pub fn is_exact(&self) -> bool {
        self.is_exact
    }
    /// Returns the least cost state of the layer. When several states have
    /// the same cost, the first one is returned.
    pub fn best(&self) -> Option<&S> {
        self.states.iter().min_by_key(|s| s.cost())
    }
    /// Builds the next layer of the diagram: it expands all the states of
    /// this layer and merges the resulting states down to the layer width.
    pub fn expand(&self, inference_dual: Option<&S::Dual>, incumbent: Option<i64>) -> Layer<S> {
        let mut next = vec![];
        for state in self.states.iter() {
            next.append(&mut state.expand(inference_dual, incumbent));
        }

        let size   = next.len();
        let states = self.merge(next);
        let exact  = self.is_exact && states.len() == size;

        Layer {
            depth   : self.depth + 1,
            states,
            width   : self.width,
            is_exact: exact,
            mergers : Rc::clone(&self.mergers),
        }
    }
    /// Reduces the given collection to at most `width` states. The mergers
    /// are applied in order (cycling through the list) until the collection
    /// fits.
    ///
    /// # Panics
    /// When the collection is too large and no merger is able to shrink it.
    pub fn merge(&self, mut states: Vec<S>) -> Vec<S> {
        if self.width == 0 || states.len() <= self.width {
            return states;
        }
        assert!(!self.mergers.is_empty(),
            "layer {} holds {} states (width {}) but has no merger", self.depth + 1, states.len(), self.width);

        loop {
            let before = states.len();
            for merger in self.mergers.iter() {
                states = merger.merge(states, self.width);
                if states.len() <= self.width {
                    return states;
                }
            }
            assert!(states.len() < before,
                "a full cycle of mergers left {} states unchanged (width {})", before, self.width);
        }
    }
}

// ############################################################################
// #### TESTS #################################################################
// ############################################################################

#[cfg(test)]
mod test_layer {
    use std::{rc::Rc, sync::Arc};

    use crate::{Layer, MaxCostMerger, Merger, Mergers, State, test_utils::{Tour, four_nodes, five_nodes}};

    fn truncating() -> Mergers<Tour> {
        let mergers: Vec<Box<dyn Merger<Tour>>> = vec![Box::new(MaxCostMerger)];
        Rc::from(mergers)
    }
    fn nothing() -> Mergers<Tour> {
        let mergers: Vec<Box<dyn Merger<Tour>>> = vec![];
        Rc::from(mergers)
    }

    #[test]
    fn root_layer_has_depth_zero_one_state_and_is_exact() {
        let root  = Tour::new(Arc::new(four_nodes()), 0);
        let layer = Layer::root(root, truncating(), 3);
        assert_eq!(0, layer.depth());
        assert_eq!(1, layer.len());
        assert_eq!(3, layer.width());
        assert!(layer.is_exact());
        assert!(!layer.is_empty());
    }
    #[test]
    fn expand_increments_the_depth_and_collects_all_successors() {
        let root  = Tour::new(Arc::new(four_nodes()), 0);
        let layer = Layer::root(root, truncating(), 0);
        let next  = layer.expand(None, None);
        assert_eq!(1, next.depth());
        assert_eq!(3, next.len());
        let next  = next.expand(None, None);
        assert_eq!(2, next.depth());
        assert_eq!(6, next.len());
        assert!(next.is_exact());
    }
    #[test]
    fn expand_passes_the_incumbent_hint_on_to_the_states() {
        let root  = Tour::new(Arc::new(four_nodes()), 0);
        let layer = Layer::root(root, truncating(), 0);
        // [0 3] costs 7 and is pruned
        let next  = layer.expand(None, Some(7));
        assert_eq!(2, next.len());
        assert!(next.is_exact());
    }
    #[test]
    fn when_width_is_zero_merging_never_occurs() {
        let root  = Tour::new(Arc::new(five_nodes()), 0);
        let mut layer = Layer::root(root, nothing(), 0);
        while !layer.is_empty() {
            let next = layer.expand(None, None);
            if next.is_empty() {
                break;
            }
            layer = next;
        }
        assert_eq!(24, layer.len());
        assert!(layer.is_exact());
    }
    #[test]
    fn merging_enforces_the_maximum_width() {
        let root  = Tour::new(Arc::new(five_nodes()), 0);
        let mut layer = Layer::root(root, truncating(), 2);
        for _ in 0..4 {
            layer = layer.expand(None, None);
            assert!(layer.len() <= 2);
        }
    }
    #[test]
    fn a_layer_is_no_longer_exact_once_a_merge_occurred() {
        let root  = Tour::new(Arc::new(five_nodes()), 0);
        let layer = Layer::root(root, truncating(), 3);
        let next  = layer.expand(None, None);
        assert_eq!(3, next.len());
        assert!(!next.is_exact());
    }
    #[test]
    fn exactness_never_comes_back() {
        let root  = Tour::new(Arc::new(five_nodes()), 0);
        let mut layer = Layer::root(root, truncating(), 1);
        let mut was_exact = layer.is_exact();
        while !layer.is_empty() {
            layer = layer.expand(None, None);
            assert!(was_exact || !layer.is_exact());
            was_exact = layer.is_exact();
        }
        assert!(!was_exact);
    }
    #[test]
    fn best_yields_the_least_cost_state() {
        let root  = Tour::new(Arc::new(four_nodes()), 0);
        let layer = Layer::root(root, truncating(), 0).expand(None, None);
        let best  = layer.best().unwrap();
        assert_eq!(1, best.cost());
        assert_eq!(&[0, 1], best.path());
    }
    #[test]
    fn best_yields_nothing_when_the_layer_is_empty() {
        let root  = Tour::new(Arc::new(four_nodes()), 0);
        let layer = Layer::root(root, truncating(), 0).expand(None, Some(0));
        assert!(layer.is_empty());
        assert!(layer.best().is_none());
    }
    #[test]
    fn merge_is_a_noop_when_the_states_fit() {
        let root   = Tour::new(Arc::new(four_nodes()), 0);
        let layer  = Layer::root(root.clone(), truncating(), 3);
        let states = root.expand(None, None);
        let merged = layer.merge(states.clone());
        assert_eq!(states, merged);
    }
    #[test]
    fn merge_cycles_through_the_mergers_until_the_states_fit() {
        let drop_one = |mut states: Vec<Tour>, _: usize| {
            states.pop();
            states
        };
        let mergers: Vec<Box<dyn Merger<Tour>>> = vec![Box::new(drop_one)];
        let root   = Tour::new(Arc::new(five_nodes()), 0);
        let layer  = Layer::root(root.clone(), Rc::from(mergers), 1);
        let merged = layer.merge(root.expand(None, None));
        assert_eq!(1, merged.len());
        assert_eq!(&[0, 1], merged[0].path());
    }
    #[test]
    #[should_panic]
    fn merge_panics_when_there_is_no_merger() {
        let root   = Tour::new(Arc::new(five_nodes()), 0);
        let layer  = Layer::root(root.clone(), nothing(), 1);
        layer.merge(root.expand(None, None));
    }
    #[test]
    #[should_panic]
    fn merge_panics_when_the_mergers_make_no_progress() {
        let identity = |states: Vec<Tour>, _: usize| states;
        let mergers: Vec<Box<dyn Merger<Tour>>> = vec![Box::new(identity)];
        let root   = Tour::new(Arc::new(five_nodes()), 0);
        let layer  = Layer::root(root.clone(), Rc::from(mergers), 1);
        layer.merge(root.expand(None, None));
    }
}
