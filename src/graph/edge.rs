//! Edge handles.
//!
//! [`EdgeId`] identifies a stored edge. [`TraversedEdge`] is what algorithms and
//! observers actually see: the edge together with the orientation in which the
//! traversal walked it. For directed graphs the orientation always matches the
//! stored one; undirected edges can be walked either way, and the `reversed`
//! flag records which.

use std::fmt;

use crate::graph::NodeId;

/// Dense, copyable handle for an edge in a graph.
///
/// Edge ids are assigned sequentially by the storage type that owns the edge.
/// Parallel edges between the same pair of vertices get distinct ids, which is
/// what lets predecessor maps point at the exact edge that produced a distance.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeId(pub(crate) usize);

impl EdgeId {
    /// Wraps a raw edge index.
    #[must_use]
    #[inline]
    pub const fn new(index: usize) -> Self {
        EdgeId(index)
    }

    /// Returns the raw index.
    #[must_use]
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Debug for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EdgeId({})", self.0)
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

impl From<usize> for EdgeId {
    #[inline]
    fn from(index: usize) -> Self {
        EdgeId(index)
    }
}

/// An edge as seen by a traversal.
///
/// `source` is the endpoint the traversal was standing on when it examined the
/// edge and `target` is the endpoint it looked at. For an undirected edge walked
/// against its stored orientation, `reversed` is `true` and `source`/`target` are
/// swapped relative to [`EdgeEndpoints::edge_endpoints`](crate::graph::EdgeEndpoints::edge_endpoints).
///
/// # Examples
///
/// ```rust
/// use pathscope::graph::{EdgeId, NodeId, TraversedEdge};
///
/// let forward = TraversedEdge::new(EdgeId::new(0), NodeId::new(1), NodeId::new(2));
/// let backward = forward.flipped();
///
/// assert_eq!(backward.source, NodeId::new(2));
/// assert!(backward.reversed);
/// assert_eq!(backward.flipped(), forward);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TraversedEdge {
    /// The stored edge
    pub edge: EdgeId,
    /// Endpoint the traversal walked from
    pub source: NodeId,
    /// Endpoint the traversal walked to
    pub target: NodeId,
    /// `true` when walked against the stored orientation
    pub reversed: bool,
}

impl TraversedEdge {
    /// Creates an edge walked in its stored orientation.
    #[must_use]
    #[inline]
    pub const fn new(edge: EdgeId, source: NodeId, target: NodeId) -> Self {
        TraversedEdge {
            edge,
            source,
            target,
            reversed: false,
        }
    }

    /// Returns the same edge walked the other way.
    #[must_use]
    #[inline]
    pub const fn flipped(self) -> Self {
        TraversedEdge {
            edge: self.edge,
            source: self.target,
            target: self.source,
            reversed: !self.reversed,
        }
    }

    /// Returns `true` if both endpoints are the same vertex.
    #[must_use]
    #[inline]
    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }
}

impl fmt::Display for TraversedEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} -> {}", self.edge, self.source, self.target)
    }
}
