//! Storage traits consumed by the algorithms.
//!
//! Algorithms never touch adjacency containers directly. They program against
//! these traits, so any storage that can enumerate its vertices and incident edges
//! can be traversed:
//!
//! - [`GraphBase`] - vertex count and iteration
//! - [`EdgeEndpoints`] - resolve an edge to its stored `(source, target)` pair
//! - [`OutgoingEdges`] - edges leaving a vertex (directed traversal)
//! - [`IncidentEdges`] - edges touching a vertex in either direction (undirected traversal)
//!
//! # Dense identifiers
//!
//! Implementations must hand out `NodeId`s in `0..node_count()`. The traversal
//! engine keeps its color and distance state in vectors indexed by
//! [`NodeId::index`], and rejects ids outside that range with
//! [`Error::NodeNotFound`](crate::Error::NodeNotFound).
//!
//! # Immutability
//!
//! A graph is borrowed immutably for the whole computation. Mutating storage
//! through interior mutability while an algorithm runs is outside the contract.

use crate::graph::{EdgeId, NodeId};

/// Vertex-level view of a graph.
pub trait GraphBase {
    /// Returns the number of vertices.
    fn node_count(&self) -> usize;

    /// Returns every vertex in the graph's natural iteration order.
    ///
    /// Whole-graph computations pick their roots in this order.
    fn node_ids(&self) -> impl Iterator<Item = NodeId>;

    /// Returns `true` if `node` belongs to this graph.
    fn contains_node(&self, node: NodeId) -> bool {
        node.index() < self.node_count()
    }
}

/// Resolves stored edges to their endpoints.
pub trait EdgeEndpoints: GraphBase {
    /// Returns the stored `(source, target)` pair of an edge, or `None` if the
    /// edge does not belong to this graph.
    fn edge_endpoints(&self, edge: EdgeId) -> Option<(NodeId, NodeId)>;

    /// Returns the stored source of an edge.
    fn edge_source(&self, edge: EdgeId) -> Option<NodeId> {
        self.edge_endpoints(edge).map(|(source, _)| source)
    }

    /// Returns the stored target of an edge.
    fn edge_target(&self, edge: EdgeId) -> Option<NodeId> {
        self.edge_endpoints(edge).map(|(_, target)| target)
    }
}

/// Graphs whose edges can be followed in their stored direction.
///
/// # Examples
///
/// ```rust
/// use pathscope::graph::{DirectedGraph, EdgeEndpoints, OutgoingEdges};
///
/// let mut graph: DirectedGraph<&str, f64> = DirectedGraph::new();
/// let a = graph.add_node("A");
/// let b = graph.add_node("B");
/// let ab = graph.add_edge(a, b, 1.0)?;
///
/// let out: Vec<_> = graph.outgoing_edges(a).collect();
/// assert_eq!(out, vec![ab]);
/// assert_eq!(graph.edge_target(ab), Some(b));
/// # Ok::<(), pathscope::Error>(())
/// ```
pub trait OutgoingEdges: EdgeEndpoints {
    /// Returns the edges whose stored source is `node`, in insertion order.
    fn outgoing_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeId>;
}

/// Graphs whose edges can be walked in either direction.
///
/// Every edge touching `node` is yielded once, including self-loops. Which
/// endpoint the traversal treats as the source is decided by the caller from
/// [`EdgeEndpoints::edge_endpoints`].
pub trait IncidentEdges: EdgeEndpoints {
    /// Returns the edges with `node` as either endpoint.
    fn incident_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeId>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Minimal storage over an edge list, to exercise the trait defaults
    struct EdgeList {
        node_count: usize,
        edges: Vec<(NodeId, NodeId)>,
    }

    impl GraphBase for EdgeList {
        fn node_count(&self) -> usize {
            self.node_count
        }

        fn node_ids(&self) -> impl Iterator<Item = NodeId> {
            (0..self.node_count).map(NodeId::new)
        }
    }

    impl EdgeEndpoints for EdgeList {
        fn edge_endpoints(&self, edge: EdgeId) -> Option<(NodeId, NodeId)> {
            self.edges.get(edge.index()).copied()
        }
    }

    impl OutgoingEdges for EdgeList {
        fn outgoing_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeId> {
            self.edges
                .iter()
                .enumerate()
                .filter(move |(_, (source, _))| *source == node)
                .map(|(i, _)| EdgeId::new(i))
        }
    }

    fn sample() -> EdgeList {
        EdgeList {
            node_count: 3,
            edges: vec![
                (NodeId::new(0), NodeId::new(1)),
                (NodeId::new(0), NodeId::new(2)),
                (NodeId::new(2), NodeId::new(1)),
            ],
        }
    }

    #[test]
    fn test_contains_node_default() {
        let graph = sample();
        assert!(graph.contains_node(NodeId::new(0)));
        assert!(graph.contains_node(NodeId::new(2)));
        assert!(!graph.contains_node(NodeId::new(3)));
    }

    #[test]
    fn test_edge_source_and_target_defaults() {
        let graph = sample();
        assert_eq!(graph.edge_source(EdgeId::new(2)), Some(NodeId::new(2)));
        assert_eq!(graph.edge_target(EdgeId::new(2)), Some(NodeId::new(1)));
        assert_eq!(graph.edge_source(EdgeId::new(7)), None);
    }

    #[test]
    fn test_outgoing_edges() {
        let graph = sample();
        let out: Vec<EdgeId> = graph.outgoing_edges(NodeId::new(0)).collect();
        assert_eq!(out, vec![EdgeId::new(0), EdgeId::new(1)]);
        assert_eq!(graph.outgoing_edges(NodeId::new(1)).count(), 0);
    }
}
