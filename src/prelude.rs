//! # pathscope Prelude
//!
//! Re-exports the types needed by most users: storage, handles, the search
//! types and their results.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all pathscope operations
pub use crate::Error;

/// The result type used throughout pathscope
pub use crate::Result;

// ================================================================================================
// Storage
// ================================================================================================

/// Graph storage types
pub use crate::graph::{DirectedGraph, IndexedGraph, UndirectedGraph};

/// Vertex and edge handles
pub use crate::graph::{EdgeId, NodeId, TraversedEdge};

/// Storage traits consumed by the algorithms
pub use crate::graph::{EdgeEndpoints, GraphBase, IncidentEdges, OutgoingEdges};

// ================================================================================================
// Searches
// ================================================================================================

/// Traversal engines
pub use crate::graph::algorithms::{BreadthFirstSearch, DepthFirstSearch};

/// Weighted path search
pub use crate::graph::algorithms::{
    longest_paths, shortest_paths, undirected_shortest_paths, ShortestPath, ShortestPaths,
};

/// Dominator analysis
pub use crate::graph::algorithms::{compute_dominators, DominatorAnalysis, Dominators};

// ================================================================================================
// Events, Observers and Control
// ================================================================================================

/// Event bus and subscription types
pub use crate::graph::algorithms::{EventKind, Observer, ObserverScope, TraversalEvent};

/// Ready-made observers
pub use crate::graph::algorithms::{
    DistanceRecorder, PredecessorMap, PredecessorRecorder, TimestampRecorder,
};

/// Search configuration and lifecycle
pub use crate::graph::algorithms::{CancellationToken, Color, SearchConfig, SearchStatus};
