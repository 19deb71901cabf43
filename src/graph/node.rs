//! Vertex handle used by every algorithm in the crate.
//!
//! Algorithms never see caller vertex values. Storage hands out dense [`NodeId`]s
//! starting at 0, and all per-vertex state (colors, distances, timestamps) is kept
//! in vectors indexed by them.

use std::fmt;

/// Dense, copyable handle for a vertex in a graph.
///
/// A `NodeId` is only meaningful for the graph that produced it. Storage types
/// assign ids sequentially, so `node.index() < graph.node_count()` holds for
/// every valid id and per-vertex vectors can be indexed directly.
///
/// # Examples
///
/// ```rust
/// use pathscope::graph::{DirectedGraph, NodeId};
///
/// let mut graph: DirectedGraph<&str, f64> = DirectedGraph::new();
/// let a = graph.add_node("A");
/// let b = graph.add_node("B");
///
/// assert_eq!(a, NodeId::new(0));
/// assert!(a < b);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Wraps a raw vertex index.
    ///
    /// Mostly useful in tests; storage types hand out ids from `add_node`.
    #[must_use]
    #[inline]
    pub const fn new(index: usize) -> Self {
        NodeId(index)
    }

    /// Returns the raw index, suitable for indexing per-vertex vectors.
    #[must_use]
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

impl From<usize> for NodeId {
    #[inline]
    fn from(index: usize) -> Self {
        NodeId(index)
    }
}

impl From<NodeId> for usize {
    #[inline]
    fn from(node: NodeId) -> Self {
        node.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_node_id_roundtrip_index() {
        let node = NodeId::new(42);
        assert_eq!(node.index(), 42);

        let raw: usize = node.into();
        assert_eq!(raw, 42);
        assert_eq!(NodeId::from(raw), node);
    }

    #[test]
    fn test_node_id_ordering_follows_index() {
        let mut nodes = vec![NodeId::new(3), NodeId::new(1), NodeId::new(2)];
        nodes.sort();
        assert_eq!(nodes, vec![NodeId::new(1), NodeId::new(2), NodeId::new(3)]);
    }

    #[test]
    fn test_node_id_as_map_key() {
        let mut distances: HashMap<NodeId, f64> = HashMap::new();
        distances.insert(NodeId::new(1), 0.5);
        distances.insert(NodeId::new(1), 0.25);

        assert_eq!(distances.len(), 1);
        assert_eq!(distances.get(&NodeId::new(1)), Some(&0.25));
        assert_eq!(distances.get(&NodeId::new(2)), None);
    }

    #[test]
    fn test_node_id_formatting() {
        let node = NodeId::new(7);
        assert_eq!(format!("{node:?}"), "NodeId(7)");
        assert_eq!(format!("{node}"), "n7");
    }
}
