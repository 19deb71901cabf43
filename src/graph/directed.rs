//! Adjacency-list directed graph.
//!
//! [`DirectedGraph`] is the reference storage collaborator for the algorithms:
//! vertices and edges carry arbitrary data, edges are kept in a contiguous
//! vector indexed by [`EdgeId`], and each vertex keeps its outgoing and incoming
//! edge lists so both directed and undirected traversals are cheap.

use crate::{
    graph::{
        edge::EdgeId,
        node::NodeId,
        traits::{EdgeEndpoints, GraphBase, IncidentEdges, OutgoingEdges},
    },
    Error, Result,
};

/// Internal storage for edge data and endpoints.
#[derive(Debug, Clone)]
struct EdgeData<E> {
    source: NodeId,
    target: NodeId,
    data: E,
}

/// A directed multigraph with typed vertex and edge data.
///
/// Typical use is `DirectedGraph<V, f64>` where the edge data is the weight fed
/// to the shortest-path algorithms, but any payload works: the weight function
/// passed to an algorithm decides how edge data becomes a distance.
///
/// Parallel edges and self-loops are allowed.
///
/// # Thread Safety
///
/// `DirectedGraph<N, E>` is [`Send`] and [`Sync`] when `N` and `E` are. Build it
/// on one thread, then share it immutably between concurrent computations.
///
/// # Examples
///
/// ```rust
/// use pathscope::graph::{DirectedGraph, OutgoingEdges};
///
/// let mut graph: DirectedGraph<&str, f64> = DirectedGraph::new();
/// let a = graph.add_node("A");
/// let b = graph.add_node("B");
/// let c = graph.add_node("C");
///
/// graph.add_edge(a, b, 1.0)?;
/// graph.add_edge(a, c, 4.0)?;
///
/// assert_eq!(graph.node_count(), 3);
/// assert_eq!(graph.outgoing_edges(a).count(), 2);
/// # Ok::<(), pathscope::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct DirectedGraph<N, E> {
    nodes: Vec<N>,
    edges: Vec<EdgeData<E>>,
    outgoing: Vec<Vec<EdgeId>>,
    incoming: Vec<Vec<EdgeId>>,
}

impl<N, E> Default for DirectedGraph<N, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N, E> DirectedGraph<N, E> {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        DirectedGraph {
            nodes: Vec::new(),
            edges: Vec::new(),
            outgoing: Vec::new(),
            incoming: Vec::new(),
        }
    }

    /// Creates an empty graph with room for the given number of vertices and edges.
    #[must_use]
    pub fn with_capacity(node_capacity: usize, edge_capacity: usize) -> Self {
        DirectedGraph {
            nodes: Vec::with_capacity(node_capacity),
            edges: Vec::with_capacity(edge_capacity),
            outgoing: Vec::with_capacity(node_capacity),
            incoming: Vec::with_capacity(node_capacity),
        }
    }

    /// Builds a graph from vertex data and `(source_index, target_index, data)` triples.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NodeNotFound`] if a triple names a vertex index outside
    /// `0..nodes.len()`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pathscope::graph::DirectedGraph;
    ///
    /// let graph = DirectedGraph::from_edges(vec!["A", "B", "C"], [(0, 1, 1.0), (1, 2, 1.0)])?;
    /// assert_eq!(graph.edge_count(), 2);
    /// # Ok::<(), pathscope::Error>(())
    /// ```
    pub fn from_edges<I>(nodes: Vec<N>, edges: I) -> Result<Self>
    where
        I: IntoIterator<Item = (usize, usize, E)>,
    {
        let mut graph = Self::with_capacity(nodes.len(), 0);
        for data in nodes {
            graph.add_node(data);
        }
        for (source, target, data) in edges {
            graph.add_edge(NodeId::new(source), NodeId::new(target), data)?;
        }
        Ok(graph)
    }

    /// Adds a vertex and returns its id. Ids are assigned sequentially from 0.
    pub fn add_node(&mut self, data: N) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(data);
        self.outgoing.push(Vec::new());
        self.incoming.push(Vec::new());
        id
    }

    /// Adds an edge from `source` to `target`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NodeNotFound`] if either endpoint is not in the graph.
    pub fn add_edge(&mut self, source: NodeId, target: NodeId, data: E) -> Result<EdgeId> {
        if source.index() >= self.nodes.len() {
            return Err(Error::NodeNotFound(source));
        }
        if target.index() >= self.nodes.len() {
            return Err(Error::NodeNotFound(target));
        }

        let id = EdgeId::new(self.edges.len());
        self.edges.push(EdgeData {
            source,
            target,
            data,
        });

        self.outgoing[source.index()].push(id);
        self.incoming[target.index()].push(id);

        Ok(id)
    }

    /// Returns the data of a vertex.
    #[must_use]
    pub fn node(&self, node: NodeId) -> Option<&N> {
        self.nodes.get(node.index())
    }

    /// Returns the data of a vertex for modification.
    pub fn node_mut(&mut self, node: NodeId) -> Option<&mut N> {
        self.nodes.get_mut(node.index())
    }

    /// Returns the number of vertices.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns every vertex id with its data, in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &N)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, data)| (NodeId::new(i), data))
    }

    /// Returns the data of an edge.
    #[must_use]
    pub fn edge(&self, edge: EdgeId) -> Option<&E> {
        self.edges.get(edge.index()).map(|e| &e.data)
    }

    /// Returns the data of an edge for modification.
    pub fn edge_mut(&mut self, edge: EdgeId) -> Option<&mut E> {
        self.edges.get_mut(edge.index()).map(|e| &mut e.data)
    }

    /// Returns the number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Returns every edge id with its data, in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &E)> + '_ {
        self.edges
            .iter()
            .enumerate()
            .map(|(i, e)| (EdgeId::new(i), &e.data))
    }

    /// Returns the targets of the edges leaving `node`.
    pub fn successors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.outgoing
            .get(node.index())
            .into_iter()
            .flatten()
            .map(|&edge_id| self.edges[edge_id.index()].target)
    }

    /// Returns the sources of the edges entering `node`.
    pub fn predecessors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.incoming
            .get(node.index())
            .into_iter()
            .flatten()
            .map(|&edge_id| self.edges[edge_id.index()].source)
    }

    /// Returns the number of edges leaving `node` (0 for unknown vertices).
    #[must_use]
    pub fn out_degree(&self, node: NodeId) -> usize {
        self.outgoing.get(node.index()).map_or(0, Vec::len)
    }

    /// Returns the number of edges entering `node` (0 for unknown vertices).
    #[must_use]
    pub fn in_degree(&self, node: NodeId) -> usize {
        self.incoming.get(node.index()).map_or(0, Vec::len)
    }

    /// Returns `true` if the graph has no vertices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns `true` if `edge` belongs to this graph.
    #[must_use]
    pub fn contains_edge(&self, edge: EdgeId) -> bool {
        edge.index() < self.edges.len()
    }
}

impl<N, E> GraphBase for DirectedGraph<N, E> {
    fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn node_ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId::new)
    }
}

impl<N, E> EdgeEndpoints for DirectedGraph<N, E> {
    fn edge_endpoints(&self, edge: EdgeId) -> Option<(NodeId, NodeId)> {
        self.edges.get(edge.index()).map(|e| (e.source, e.target))
    }
}

impl<N, E> OutgoingEdges for DirectedGraph<N, E> {
    fn outgoing_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeId> {
        self.outgoing.get(node.index()).into_iter().flatten().copied()
    }
}

// Viewing a directed graph as undirected: outgoing edges, then incoming edges
// that are not self-loops (those were already yielded as outgoing).
impl<N, E> IncidentEdges for DirectedGraph<N, E> {
    fn incident_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeId> {
        let outgoing = self.outgoing.get(node.index()).into_iter().flatten().copied();
        let incoming = self
            .incoming
            .get(node.index())
            .into_iter()
            .flatten()
            .copied()
            .filter(move |edge| self.edges[edge.index()].source != node);
        outgoing.chain(incoming)
    }
}
