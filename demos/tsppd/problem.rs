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

//! This module defines the pickup-and-delivery TSP instances and the way
//! they are decoded from json.
//!
//! The nodes of an instance are labelled `+0` (the start depot), `-0` (the
//! end depot), `+k` for the pickups and `-k` for the deliveries. A route
//! starts in `+0`, visits every pickup before its delivery and ends in `-0`.

use std::{collections::HashMap, fs::File, io::Read, path::Path};

use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// There was an io related error
    #[error("io error {0}")]
    Io(#[from] std::io::Error),
    /// The instance is not valid json (or does not have the expected shape)
    #[error("json error {0}")]
    Json(#[from] serde_json::Error),
    /// The instance is valid json but it does not describe a valid problem
    #[error("invalid instance: {0}")]
    Format(String),
}

/// The role of a node in a route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Start,
    End,
    Pickup,
    Delivery,
}
impl Kind {
    fn of(label: &str) -> Option<Kind> {
        match label {
            "+0" => Some(Kind::Start),
            "-0" => Some(Kind::End),
            _ if label.contains('+') => Some(Kind::Pickup),
            _ if label.contains('-') => Some(Kind::Delivery),
            _ => None,
        }
    }
}

/// The instance exactly as it is written in the json file
#[derive(Debug, Deserialize)]
struct RawProblem {
    #[serde(default)]
    name: String,
    #[serde(default)]
    comment: String,
    nodes: Vec<String>,
    #[serde(default)]
    precedence: HashMap<String, String>,
    edges: Vec<Vec<i64>>,
}

#[derive(Debug, Clone)]
pub struct Problem {
    pub name: String,
    pub comment: String,
    /// The labels of the nodes
    nodes: Vec<String>,
    /// The role of each node
    kinds: Vec<Kind>,
    /// The other end of the request of each pickup or delivery
    pair: Vec<Option<usize>>,
    /// The cost of the arc between any two nodes
    edges: Vec<Vec<i64>>,
    start: usize,
    end: usize,
    index: HashMap<String, usize>,
}

/// Reads the instance from the given file ("-" stands for stdin)
pub fn read_problem<P: AsRef<Path>>(input: P) -> Result<Problem, Error> {
    let mut text = String::new();
    if input.as_ref() == Path::new("-") {
        std::io::stdin().read_to_string(&mut text)?;
    } else {
        File::open(input)?.read_to_string(&mut text)?;
    }
    Problem::decode(&text)
}

impl Problem {
    /// Decodes an instance from its json representation
    pub fn decode(json: &str) -> Result<Self, Error> {
        let raw: RawProblem = serde_json::from_str(json)?;
        Self::try_from(raw)
    }

    pub fn nb_nodes(&self) -> usize {
        self.nodes.len()
    }
    pub fn label(&self, node: usize) -> &str {
        &self.nodes[node]
    }
    pub fn index(&self, label: &str) -> Option<usize> {
        self.index.get(label).copied()
    }
    pub fn kind(&self, node: usize) -> Kind {
        self.kinds[node]
    }
    pub fn start(&self) -> usize {
        self.start
    }
    pub fn end(&self) -> usize {
        self.end
    }
    pub fn is_pickup(&self, node: usize) -> bool {
        self.kinds[node] == Kind::Pickup
    }
    pub fn is_delivery(&self, node: usize) -> bool {
        self.kinds[node] == Kind::Delivery
    }
    /// The delivery matching the given pickup
    pub fn delivery_of(&self, pickup: usize) -> Option<usize> {
        if self.is_pickup(pickup) { self.pair[pickup] } else { None }
    }
    /// All pickups, in the order of the instance file
    pub fn pickups(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.nb_nodes()).filter(|n| self.is_pickup(*n))
    }
    /// Returns true iff `a` must be visited before `b` in any route
    pub fn precedes(&self, a: usize, b: usize) -> bool {
        self.delivery_of(a) == Some(b)
    }
    pub fn cost(&self, a: usize, b: usize) -> i64 {
        self.edges[a][b]
    }
    /// Returns true iff the arc a -> b may appear in a route
    pub fn is_feasible(&self, a: usize, b: usize) -> bool {
        // nothing enters the start, nothing leaves the end
        if b == self.start || a == self.end {
            return false;
        }
        if a == b || self.precedes(b, a) {
            return false;
        }
        match (self.kinds[a], self.kinds[b]) {
            (Kind::Start,  Kind::Delivery | Kind::End) => false,
            (Kind::Pickup, Kind::End)                  => false,
            _                                          => true,
        }
    }
    /// The nodes which may follow `a` in a route
    pub fn feasible_successors(&self, a: usize) -> Vec<usize> {
        (0..self.nb_nodes()).filter(|b| self.is_feasible(a, *b)).collect()
    }
}

/// A (partial) route starting in the start depot
pub trait Route {
    fn problem(&self) -> &Problem;
    /// The nodes of the route, starting with the start depot
    fn route(&self) -> Vec<usize>;
    /// The labels of the nodes of the route
    fn labels(&self) -> Vec<&str> {
        let problem = self.problem();
        self.route().into_iter().map(|n| problem.label(n)).collect()
    }
}

impl TryFrom<RawProblem> for Problem {
    type Error = Error;

    fn try_from(raw: RawProblem) -> Result<Self, Error> {
        let n = raw.nodes.len();
        if raw.edges.len() != n || raw.edges.iter().any(|row| row.len() != n) {
            return Err(Error::Format(format!("the edges must form a {n}x{n} matrix")));
        }

        let mut index = HashMap::with_capacity(n);
        let mut kinds = Vec::with_capacity(n);
        for (i, label) in raw.nodes.iter().enumerate() {
            if index.insert(label.clone(), i).is_some() {
                return Err(Error::Format(format!("duplicate node {label}")));
            }
            let kind = Kind::of(label)
                .ok_or_else(|| Error::Format(format!("node {label} is neither a pickup nor a delivery")))?;
            kinds.push(kind);
        }
        let start = *index.get("+0").ok_or_else(|| Error::Format("missing start node +0".to_string()))?;
        let end   = *index.get("-0").ok_or_else(|| Error::Format("missing end node -0".to_string()))?;

        let mut pair = vec![None; n];
        for (pickup, delivery) in raw.precedence.iter() {
            let p = *index.get(pickup).ok_or_else(|| Error::Format(format!("unknown pickup {pickup}")))?;
            let d = *index.get(delivery).ok_or_else(|| Error::Format(format!("unknown delivery {delivery}")))?;
            if kinds[p] != Kind::Pickup || kinds[d] != Kind::Delivery {
                return Err(Error::Format(format!("{pickup} -> {delivery} is not a pickup/delivery pair")));
            }
            pair[p] = Some(d);
            pair[d] = Some(p);
        }
        if let Some(i) = (0..n).find(|i| matches!(kinds[*i], Kind::Pickup | Kind::Delivery) && pair[*i].is_none()) {
            return Err(Error::Format(format!("node {} belongs to no request", raw.nodes[i])));
        }

        Ok(Problem {
            name   : raw.name,
            comment: raw.comment,
            nodes  : raw.nodes,
            kinds,
            pair,
            edges  : raw.edges,
            start,
            end,
            index,
        })
    }
}
