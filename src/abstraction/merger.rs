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

//! This module defines the `Merger` trait.

/// A merger reduces an oversized collection of states to a smaller one.
/// It is what a layer applies when it grows larger than the maximum width
/// of its diagram.
///
/// # Note:
/// A merger is not required to reduce the collection down to `width` states
/// in one pass. When it does not, the layer keeps cycling through its
/// mergers until the collection fits. However, a full cycle of mergers that
/// does not remove a single state is a contract violation.
pub trait Merger<S> {
    /// Maps the given states onto a (hopefully) smaller collection of states.
    fn merge(&self, states: Vec<S>, width: usize) -> Vec<S>;
}

/// The simplest and most natural merger implementation is to simply use
/// a closure (or a function).
impl <S, X: Fn(Vec<S>, usize) -> Vec<S>> Merger<S> for X {
    fn merge(&self, states: Vec<S>, width: usize) -> Vec<S> {
        self(states, width)
    }
}

#[cfg(test)]
mod tests {
    use crate::Merger;

    fn keep_first(mut states: Vec<char>, width: usize) -> Vec<char> {
        states.truncate(width);
        states
    }

    #[test]
    fn any_function_is_a_merger() {
        let merger: &dyn Merger<char> = &keep_first;
        assert_eq!(vec!['a', 'b'], merger.merge(vec!['a', 'b', 'c'], 2));
    }
    #[test]
    fn any_closure_is_a_merger() {
        let merger: &dyn Merger<char> = &|mut states: Vec<char>, _: usize| {
            states.pop();
            states
        };
        assert_eq!(vec!['a', 'b'], merger.merge(vec!['a', 'b', 'c'], 1));
    }
}
