//! Adjacency-list undirected graph.
//!
//! Each edge is stored once with the orientation it was added in, and listed in
//! the incidence list of both endpoints. Traversals decide per visit which
//! endpoint is the source; see [`TraversedEdge::reversed`](crate::graph::TraversedEdge).

use crate::{
    graph::{
        edge::EdgeId,
        node::NodeId,
        traits::{EdgeEndpoints, GraphBase, IncidentEdges},
    },
    Error, Result,
};

#[derive(Debug, Clone)]
struct EdgeData<E> {
    a: NodeId,
    b: NodeId,
    data: E,
}

/// An undirected multigraph with typed vertex and edge data.
///
/// Self-loops appear once in their vertex's incidence list.
///
/// # Examples
///
/// ```rust
/// use pathscope::graph::{IncidentEdges, UndirectedGraph};
///
/// let mut graph: UndirectedGraph<&str, f64> = UndirectedGraph::new();
/// let a = graph.add_node("A");
/// let b = graph.add_node("B");
/// let ab = graph.add_edge(a, b, 2.0)?;
///
/// assert_eq!(graph.incident_edges(b).collect::<Vec<_>>(), vec![ab]);
/// assert_eq!(graph.degree(a), 1);
/// # Ok::<(), pathscope::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct UndirectedGraph<N, E> {
    nodes: Vec<N>,
    edges: Vec<EdgeData<E>>,
    incident: Vec<Vec<EdgeId>>,
}

impl<N, E> Default for UndirectedGraph<N, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N, E> UndirectedGraph<N, E> {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        UndirectedGraph {
            nodes: Vec::new(),
            edges: Vec::new(),
            incident: Vec::new(),
        }
    }

    /// Creates an empty graph with room for the given number of vertices and edges.
    #[must_use]
    pub fn with_capacity(node_capacity: usize, edge_capacity: usize) -> Self {
        UndirectedGraph {
            nodes: Vec::with_capacity(node_capacity),
            edges: Vec::with_capacity(edge_capacity),
            incident: Vec::with_capacity(node_capacity),
        }
    }

    /// Builds a graph from vertex data and `(a_index, b_index, data)` triples.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NodeNotFound`] if a triple names an unknown vertex index.
    pub fn from_edges<I>(nodes: Vec<N>, edges: I) -> Result<Self>
    where
        I: IntoIterator<Item = (usize, usize, E)>,
    {
        let mut graph = Self::with_capacity(nodes.len(), 0);
        for data in nodes {
            graph.add_node(data);
        }
        for (a, b, data) in edges {
            graph.add_edge(NodeId::new(a), NodeId::new(b), data)?;
        }
        Ok(graph)
    }

    /// Adds a vertex and returns its id.
    pub fn add_node(&mut self, data: N) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(data);
        self.incident.push(Vec::new());
        id
    }

    /// Adds an edge between `a` and `b`. The stored orientation is `a -> b`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NodeNotFound`] if either endpoint is not in the graph.
    pub fn add_edge(&mut self, a: NodeId, b: NodeId, data: E) -> Result<EdgeId> {
        for node in [a, b] {
            if node.index() >= self.nodes.len() {
                return Err(Error::NodeNotFound(node));
            }
        }

        let id = EdgeId::new(self.edges.len());
        self.edges.push(EdgeData { a, b, data });
        self.incident[a.index()].push(id);
        if a != b {
            self.incident[b.index()].push(id);
        }
        Ok(id)
    }

    /// Returns the data of a vertex.
    #[must_use]
    pub fn node(&self, node: NodeId) -> Option<&N> {
        self.nodes.get(node.index())
    }

    /// Returns the number of vertices.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the data of an edge.
    #[must_use]
    pub fn edge(&self, edge: EdgeId) -> Option<&E> {
        self.edges.get(edge.index()).map(|e| &e.data)
    }

    /// Returns the number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Returns the vertices sharing an edge with `node`, once per edge.
    pub fn neighbors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.incident
            .get(node.index())
            .into_iter()
            .flatten()
            .map(move |&edge_id| {
                let edge = &self.edges[edge_id.index()];
                if edge.a == node {
                    edge.b
                } else {
                    edge.a
                }
            })
    }

    /// Returns the number of edges touching `node`; self-loops count once.
    #[must_use]
    pub fn degree(&self, node: NodeId) -> usize {
        self.incident.get(node.index()).map_or(0, Vec::len)
    }

    /// Returns `true` if the graph has no vertices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl<N, E> GraphBase for UndirectedGraph<N, E> {
    fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn node_ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId::new)
    }
}

impl<N, E> EdgeEndpoints for UndirectedGraph<N, E> {
    fn edge_endpoints(&self, edge: EdgeId) -> Option<(NodeId, NodeId)> {
        self.edges.get(edge.index()).map(|e| (e.a, e.b))
    }
}

impl<N, E> IncidentEdges for UndirectedGraph<N, E> {
    fn incident_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeId> {
        self.incident.get(node.index()).into_iter().flatten().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_triangle() -> UndirectedGraph<char, f64> {
        UndirectedGraph::from_edges(vec!['a', 'b', 'c'], [(0, 1, 1.0), (1, 2, 2.0), (2, 0, 3.0)])
            .unwrap()
    }

    #[test]
    fn test_edges_listed_at_both_endpoints() {
        let graph = create_triangle();
        let at_a: Vec<EdgeId> = graph.incident_edges(NodeId::new(0)).collect();
        assert_eq!(at_a, vec![EdgeId::new(0), EdgeId::new(2)]);

        let at_c: Vec<EdgeId> = graph.incident_edges(NodeId::new(2)).collect();
        assert_eq!(at_c, vec![EdgeId::new(1), EdgeId::new(2)]);
    }

    #[test]
    fn test_stored_orientation_is_preserved() {
        let graph = create_triangle();
        assert_eq!(
            graph.edge_endpoints(EdgeId::new(2)),
            Some((NodeId::new(2), NodeId::new(0)))
        );
    }

    #[test]
    fn test_neighbors() {
        let graph = create_triangle();
        let mut neighbors: Vec<NodeId> = graph.neighbors(NodeId::new(1)).collect();
        neighbors.sort();
        assert_eq!(neighbors, vec![NodeId::new(0), NodeId::new(2)]);
    }

    #[test]
    fn test_self_loop_listed_once() {
        let mut graph: UndirectedGraph<(), ()> = UndirectedGraph::new();
        let a = graph.add_node(());
        graph.add_edge(a, a, ()).unwrap();
        assert_eq!(graph.degree(a), 1);
        assert_eq!(graph.neighbors(a).collect::<Vec<_>>(), vec![a]);
    }

    #[test]
    fn test_add_edge_unknown_node() {
        let mut graph: UndirectedGraph<(), ()> = UndirectedGraph::new();
        graph.add_node(());
        assert_eq!(
            graph.add_edge(NodeId::new(0), NodeId::new(3), ()),
            Err(Error::NodeNotFound(NodeId::new(3)))
        );
    }

    #[test]
    fn test_unknown_node_has_no_edges() {
        let graph = create_triangle();
        assert_eq!(graph.incident_edges(NodeId::new(8)).count(), 0);
        assert_eq!(graph.degree(NodeId::new(8)), 0);
        assert!(graph.node(NodeId::new(8)).is_none());
    }
}
