//! Directed dependency graph with cycle detection.
//!
//! The resolution engine builds one graph per container, with an edge from
//! each dependency to every dependency it consumes, then asks for a cycle
//! before emitting build functions. Detection is an iterative depth-first
//! search with an explicit stack, so arbitrarily deep chains cannot overflow
//! the call stack.

use std::collections::{BTreeMap, BTreeSet};

/// A directed graph over nodes of type `T`.
///
/// Nodes and edges are deduplicated; insertion order does not matter.
#[derive(Debug, Clone)]
pub struct DependencyGraph<T> {
    adjacency: BTreeMap<T, BTreeSet<T>>,
}

struct Frame<'a, T> {
    node: &'a T,
    neighbours: Vec<&'a T>,
    next: usize,
}

impl<T: Ord + Clone> DependencyGraph<T> {
    /// Creates an empty graph.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            adjacency: BTreeMap::new(),
        }
    }

    /// Adds a node with no edges. Idempotent.
    pub fn add_node(&mut self, node: T) {
        let _ = self.adjacency.entry(node).or_default();
    }

    /// Adds a directed edge from `from` to `to`, inserting either endpoint
    /// as needed. Idempotent.
    pub fn add_edge(&mut self, from: T, to: T) {
        self.add_node(to.clone());
        let _ = self.adjacency.entry(from).or_default().insert(to);
    }

    /// Number of nodes in the graph.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Checks the graph for a cycle.
    ///
    /// # Errors
    ///
    /// Returns the first cycle found as a path that starts and ends at the
    /// same node, for example `[a, b, c, a]`. A self-loop reports as
    /// `[a, a]`. Which cycle is reported is deterministic for a given set of
    /// nodes and edges.
    pub fn verify_cycle(&self) -> Result<(), Vec<T>> {
        let mut visited: BTreeSet<&T> = BTreeSet::new();
        let mut visiting: BTreeSet<&T> = BTreeSet::new();
        let mut parent: BTreeMap<&T, &T> = BTreeMap::new();

        for start in self.adjacency.keys() {
            if visited.contains(start) {
                continue;
            }

            let mut stack = vec![self.frame(start)];
            let _ = visiting.insert(start);

            while let Some(frame) = stack.last_mut() {
                let node = frame.node;

                if let Some(&neighbour) = frame.neighbours.get(frame.next) {
                    frame.next += 1;

                    if visiting.contains(neighbour) {
                        return Err(self.cycle_path(&parent, node, neighbour));
                    }
                    if !visited.contains(neighbour) {
                        let _ = parent.insert(neighbour, node);
                        let _ = visiting.insert(neighbour);
                        stack.push(self.frame(neighbour));
                    }
                } else {
                    let _ = visiting.remove(node);
                    let _ = visited.insert(node);
                    let _ = stack.pop();
                }
            }
        }

        Ok(())
    }

    fn frame<'a>(&'a self, node: &'a T) -> Frame<'a, T> {
        let neighbours = self
            .adjacency
            .get(node)
            .map(|set| set.iter().collect())
            .unwrap_or_default();
        Frame {
            node,
            neighbours,
            next: 0,
        }
    }

    /// Reconstructs the cycle closed by the edge `from -> entry` by walking
    /// the parent chain back from `from` to `entry`.
    fn cycle_path(&self, parent: &BTreeMap<&T, &T>, from: &T, entry: &T) -> Vec<T> {
        let mut path = vec![entry.clone()];
        let mut node = from;
        while node != entry {
            path.push(node.clone());
            node = parent.get(node).copied().unwrap_or(entry);
        }
        path.push(entry.clone());
        path.reverse();
        path
    }
}

impl<T: Ord + Clone> Default for DependencyGraph<T> {
    fn default() -> Self {
        Self::new()
    }
}
