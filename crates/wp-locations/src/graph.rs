//! Adjacency graph of named locations.
//!
//! Edges are directed as written: `from → to[..]`.  Neighbour order is kept
//! exactly as configured because BFS visits neighbours in that order and the
//! first discovery of a node fixes its predecessor.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::{LocationError, LocationResult};

/// `name → ordered neighbour names`.  Immutable after construction.
#[derive(Debug, Clone, Default)]
pub struct LocationGraph {
    adjacency: HashMap<String, Vec<String>>,
}

impl LocationGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(from, neighbours)` pairs.
    ///
    /// # Errors
    ///
    /// [`LocationError::Duplicate`] if the same `from` appears twice.
    pub fn from_adjacency<I, S>(pairs: I) -> LocationResult<Self>
    where
        I: IntoIterator<Item = (S, Vec<S>)>,
        S: Into<String>,
    {
        let mut adjacency = HashMap::new();
        for (from, to) in pairs {
            let from = from.into();
            if adjacency.contains_key(&from) {
                return Err(LocationError::Duplicate { what: "path origin", name: from });
            }
            adjacency.insert(from, to.into_iter().map(Into::into).collect());
        }
        Ok(Self { adjacency })
    }

    pub fn neighbors(&self, name: &str) -> &[String] {
        self.adjacency.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of nodes with an outgoing adjacency list.
    pub fn len(&self) -> usize {
        self.adjacency.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    /// Every name mentioned anywhere in the graph (origins and neighbours).
    pub fn referenced_names(&self) -> HashSet<&str> {
        self.adjacency
            .iter()
            .flat_map(|(from, to)| std::iter::once(from.as_str()).chain(to.iter().map(String::as_str)))
            .collect()
    }

    /// Fewest-hop path of names from `start` to `goal`, both inclusive.
    ///
    /// `start == goal` yields `[start]` without consulting the graph.
    /// Returns `None` for empty names or when `goal` is unreachable.
    pub fn shortest_hops(&self, start: &str, goal: &str) -> Option<Vec<String>> {
        if start.is_empty() || goal.is_empty() {
            return None;
        }
        if start == goal {
            return Some(vec![start.to_owned()]);
        }

        let mut queue: VecDeque<&str> = VecDeque::new();
        let mut prev: HashMap<&str, &str> = HashMap::new();
        let mut visited: HashSet<&str> = HashSet::new();
        queue.push_back(start);
        visited.insert(start);

        while let Some(u) = queue.pop_front() {
            for v in self.neighbors(u) {
                let v = v.as_str();
                if !visited.insert(v) {
                    continue;
                }
                prev.insert(v, u);
                if v == goal {
                    return Some(walk_back(&prev, goal));
                }
                queue.push_back(v);
            }
        }
        None
    }
}

fn walk_back(prev: &HashMap<&str, &str>, goal: &str) -> Vec<String> {
    let mut path = vec![goal.to_owned()];
    let mut cur = goal;
    while let Some(&p) = prev.get(cur) {
        path.push(p.to_owned());
        cur = p;
    }
    path.reverse();
    path
}
