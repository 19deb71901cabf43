//! Indexed graph wrapper for domain-typed vertices.
//!
//! [`IndexedGraph`] wraps a [`DirectedGraph`] and keeps the mapping between
//! domain keys (route stops, basic-block labels, package names) and the
//! internal [`NodeId`] indices the algorithms work on.
//!
//! # Examples
//!
//! ```rust
//! use pathscope::graph::IndexedGraph;
//!
//! let mut graph: IndexedGraph<&str, f64> = IndexedGraph::new();
//! graph.add_edge("A", "B", 1.0)?;
//! graph.add_edge("B", "C", 2.0)?;
//! graph.add_edge("A", "C", 5.0)?;
//!
//! let paths = graph.shortest_paths(&"A", |w| *w)?;
//! assert_eq!(graph.path(&paths, &"C"), Some(vec!["A", "B", "C"]));
//! # Ok::<(), pathscope::Error>(())
//! ```

use std::collections::HashMap;
use std::hash::Hash;

use crate::{
    graph::{
        algorithms::{compute_dominators, shortest_paths, Dominators, ShortestPaths},
        DirectedGraph, NodeId,
    },
    Error, Result,
};

/// A graph wrapper that maps domain keys to `NodeId`.
///
/// # Type Parameters
///
/// * `K` - The domain key type for vertices
/// * `E` - The edge data type
///
/// # Thread Safety
///
/// `IndexedGraph<K, E>` is `Send` and `Sync` when both `K` and `E` are.
#[derive(Debug, Clone)]
pub struct IndexedGraph<K, E>
where
    K: Hash + Eq + Clone,
{
    /// Underlying storage; vertex payloads are the keys themselves
    graph: DirectedGraph<K, E>,
    key_to_node: HashMap<K, NodeId>,
}

impl<K, E> Default for IndexedGraph<K, E>
where
    K: Hash + Eq + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, E> IndexedGraph<K, E>
where
    K: Hash + Eq + Clone,
{
    /// Creates a new empty indexed graph.
    #[must_use]
    pub fn new() -> Self {
        Self {
            graph: DirectedGraph::new(),
            key_to_node: HashMap::new(),
        }
    }

    /// Creates a new indexed graph with pre-allocated capacity.
    #[must_use]
    pub fn with_capacity(node_capacity: usize, edge_capacity: usize) -> Self {
        Self {
            graph: DirectedGraph::with_capacity(node_capacity, edge_capacity),
            key_to_node: HashMap::with_capacity(node_capacity),
        }
    }

    /// Adds a vertex for `key`, or returns the existing `NodeId`.
    pub fn add_node(&mut self, key: K) -> NodeId {
        if let Some(&node_id) = self.key_to_node.get(&key) {
            return node_id;
        }

        let node_id = self.graph.add_node(key.clone());
        self.key_to_node.insert(key, node_id);
        node_id
    }

    /// Adds a directed edge between the vertices for `from` and `to`, creating
    /// either vertex if needed.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` if a new edge was added
    /// * `Ok(false)` if an edge `from -> to` already existed
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying graph rejects the edge.
    pub fn add_edge(&mut self, from: K, to: K, data: E) -> Result<bool> {
        let from_node = self.add_node(from);
        let to_node = self.add_node(to);

        if self.graph.successors(from_node).any(|s| s == to_node) {
            return Ok(false);
        }

        self.graph.add_edge(from_node, to_node, data)?;
        Ok(true)
    }

    /// Returns the `NodeId` for `key`, if present.
    #[must_use]
    pub fn get_node_id(&self, key: &K) -> Option<NodeId> {
        self.key_to_node.get(key).copied()
    }

    /// Returns the key of `node_id`, if present.
    #[must_use]
    pub fn get_key(&self, node_id: NodeId) -> Option<&K> {
        self.graph.node(node_id)
    }

    /// Returns the number of vertices.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns the number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Returns `true` if the graph has no vertices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.graph.is_empty()
    }

    /// Returns the underlying `DirectedGraph`.
    #[must_use]
    pub fn inner(&self) -> &DirectedGraph<K, E> {
        &self.graph
    }

    /// Returns the keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.graph.nodes().map(|(_, key)| key)
    }

    /// Maps `NodeId`s back to keys, skipping unknown ids.
    #[must_use]
    pub fn map_nodes_to_keys(&self, nodes: &[NodeId]) -> Vec<K> {
        nodes
            .iter()
            .filter_map(|&node_id| self.graph.node(node_id).cloned())
            .collect()
    }

    fn resolve(&self, key: &K) -> Result<NodeId> {
        self.get_node_id(key)
            .ok_or_else(|| Error::InvalidArgument("key is not part of the graph".to_string()))
    }
}

// Algorithm convenience methods
impl<K, E> IndexedGraph<K, E>
where
    K: Hash + Eq + Clone,
{
    /// Computes shortest paths from `from`, weighting each edge by `weight`
    /// applied to its data.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `from` is not a key of the graph.
    pub fn shortest_paths<W>(&self, from: &K, weight: W) -> Result<ShortestPaths>
    where
        W: Fn(&E) -> f64,
    {
        let root = self.resolve(from)?;
        shortest_paths(&self.graph, Some(root), |edge| {
            self.graph.edge(edge).map_or(f64::INFINITY, &weight)
        })
    }

    /// Returns the keys along the best path to `to`, starting at the root.
    ///
    /// `None` if `to` is unknown or was not reached.
    #[must_use]
    pub fn path(&self, paths: &ShortestPaths, to: &K) -> Option<Vec<K>> {
        let target = self.get_node_id(to)?;
        if !paths.is_reached(target) {
            return None;
        }

        let Some(edges) = paths.try_get_path(target) else {
            return Some(vec![to.clone()]);
        };
        let mut nodes = Vec::with_capacity(edges.len() + 1);
        nodes.extend(edges.first().map(|edge| edge.source));
        nodes.extend(edges.iter().map(|edge| edge.target));
        Some(self.map_nodes_to_keys(&nodes))
    }

    /// Computes dominators of every vertex reachable from `root`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `root` is not a key of the graph.
    pub fn dominators(&self, root: &K) -> Result<Dominators> {
        compute_dominators(&self.graph, self.resolve(root)?)
    }

    /// Returns the key of the immediate dominator of `key`.
    #[must_use]
    pub fn immediate_dominator(&self, dominators: &Dominators, key: &K) -> Option<&K> {
        let node = self.get_node_id(key)?;
        self.get_key(dominators.immediate_dominator(node)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indexed_graph_basic() {
        let mut graph: IndexedGraph<&str, ()> = IndexedGraph::new();

        let a = graph.add_node("A");
        let b = graph.add_node("B");

        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.get_node_id(&"A"), Some(a));
        assert_eq!(graph.get_key(b), Some(&"B"));
        assert_eq!(graph.keys().copied().collect::<Vec<_>>(), vec!["A", "B"]);
    }

    #[test]
    fn test_indexed_graph_idempotent_add() {
        let mut graph: IndexedGraph<&str, ()> = IndexedGraph::new();

        let a1 = graph.add_node("A");
        let a2 = graph.add_node("A");

        assert_eq!(a1, a2);
        assert_eq!(graph.node_count(), 1);
    }

    #[test]
    fn test_indexed_graph_add_edge() {
        let mut graph: IndexedGraph<&str, i32> = IndexedGraph::new();

        assert!(graph.add_edge("A", "B", 10).unwrap());
        assert!(graph.add_edge("B", "C", 20).unwrap());
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 2);

        // Duplicate edge not added
        assert!(!graph.add_edge("A", "B", 10).unwrap());
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn test_indexed_graph_shortest_path_keys() {
        let mut graph: IndexedGraph<&str, f64> = IndexedGraph::new();
        graph.add_edge("A", "B", 4.0).unwrap();
        graph.add_edge("A", "C", 1.0).unwrap();
        graph.add_edge("C", "B", 1.0).unwrap();
        graph.add_node("Z");

        let paths = graph.shortest_paths(&"A", |w| *w).unwrap();
        assert_eq!(paths.distance(graph.get_node_id(&"B").unwrap()), 2.0);
        assert_eq!(graph.path(&paths, &"B"), Some(vec!["A", "C", "B"]));
        assert_eq!(graph.path(&paths, &"A"), Some(vec!["A"]));
        assert_eq!(graph.path(&paths, &"Z"), None);
        assert_eq!(graph.path(&paths, &"missing"), None);
    }

    #[test]
    fn test_indexed_graph_unknown_source() {
        let graph: IndexedGraph<&str, f64> = IndexedGraph::new();
        assert!(matches!(
            graph.shortest_paths(&"nowhere", |w| *w),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_indexed_graph_dominators() {
        let mut graph: IndexedGraph<&str, ()> = IndexedGraph::new();
        graph.add_edge("entry", "then", ()).unwrap();
        graph.add_edge("entry", "else", ()).unwrap();
        graph.add_edge("then", "merge", ()).unwrap();
        graph.add_edge("else", "merge", ()).unwrap();

        let dominators = graph.dominators(&"entry").unwrap();
        assert_eq!(graph.immediate_dominator(&dominators, &"merge"), Some(&"entry"));
        assert_eq!(graph.immediate_dominator(&dominators, &"entry"), None);
    }
}
