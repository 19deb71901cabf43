use thiserror::Error;

use crate::graph::{EdgeId, NodeId};

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// Only caller mistakes are errors. Unreachable vertices are silently absent from
/// results, and cancellation produces a result flagged as
/// [`SearchStatus::Cancelled`](crate::graph::algorithms::SearchStatus) rather than
/// an `Err`.
///
/// # Error Categories
///
/// ## Invalid Arguments
/// - [`Error::NodeNotFound`] - A root or endpoint is not part of the graph
/// - [`Error::EdgeNotFound`] - Storage yielded an edge it cannot resolve
/// - [`Error::InvalidArgument`] - Any other rejected argument
///
/// ## Precondition Violations
/// - [`Error::RootNotUnvisited`] - A from-root entry point was handed a visited root
/// - [`Error::HeapOrderViolated`] - Priority-queue verification failed after a decrease-key
///
/// # Examples
///
/// ```rust
/// use pathscope::{graph::{algorithms, DirectedGraph, NodeId}, Error};
///
/// let graph: DirectedGraph<(), f64> = DirectedGraph::new();
/// match algorithms::shortest_paths(&graph, Some(NodeId::new(3)), |_| 1.0) {
///     Err(Error::NodeNotFound(node)) => assert_eq!(node, NodeId::new(3)),
///     other => panic!("unexpected: {other:?}"),
/// }
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The vertex is not part of the graph.
    ///
    /// Returned when an explicit root or an edge endpoint lies outside
    /// `0..node_count()`. Nothing is computed.
    #[error("Node {0} is not part of the graph")]
    NodeNotFound(NodeId),

    /// The storage layer handed out an edge it cannot resolve to endpoints.
    ///
    /// Indicates an inconsistent `GraphBase`/`EdgeEndpoints` implementation.
    #[error("Edge {0} could not be resolved to its endpoints")]
    EdgeNotFound(EdgeId),

    /// Generic rejection of an argument that has no dedicated variant.
    #[error("{0}")]
    InvalidArgument(String),

    /// A from-root entry point was invoked on a root that is not `Unvisited`.
    ///
    /// This signals a composition mistake in the caller, such as visiting the
    /// same root twice on one search instance.
    #[error("Root {0} has already been visited")]
    RootNotUnvisited(NodeId),

    /// The priority queue top was not the best entry after a decrease-key.
    ///
    /// Only reported when heap verification is enabled in the
    /// [`SearchConfig`](crate::graph::algorithms::SearchConfig). The associated
    /// node is the one whose key was just updated.
    #[error("Priority queue order violated after updating {0}")]
    HeapOrderViolated(NodeId),
}
