//! Graph storage, handles and algorithms.
//!
//! # Storage
//!
//! - [`DirectedGraph`] - adjacency lists with outgoing and incoming edges per vertex
//! - [`UndirectedGraph`] - one incidence list per vertex; every edge reachable from both ends
//! - [`IndexedGraph`] - a [`DirectedGraph`] addressed by domain keys
//!
//! Algorithms only see the storage traits ([`GraphBase`], [`EdgeEndpoints`],
//! [`OutgoingEdges`], [`IncidentEdges`]), so any type implementing them can be
//! searched.
//!
//! # Examples
//!
//! ```rust
//! use pathscope::graph::{algorithms, DirectedGraph};
//!
//! let mut graph: DirectedGraph<&str, f64> = DirectedGraph::new();
//! let a = graph.add_node("A");
//! let b = graph.add_node("B");
//! let c = graph.add_node("C");
//! graph.add_edge(a, b, 2.0)?;
//! graph.add_edge(b, c, 3.0)?;
//!
//! let paths = algorithms::shortest_paths(&graph, Some(a), |e| *graph.edge(e).unwrap_or(&f64::INFINITY))?;
//! assert_eq!(paths.distance(c), 5.0);
//! # Ok::<(), pathscope::Error>(())
//! ```

pub mod algorithms;
mod directed;
mod edge;
mod indexed;
mod node;
mod traits;
mod undirected;

pub use directed::DirectedGraph;
pub use edge::{EdgeId, TraversedEdge};
pub use indexed::IndexedGraph;
pub use node::NodeId;
pub use traits::{EdgeEndpoints, GraphBase, IncidentEdges, OutgoingEdges};
pub use undirected::UndirectedGraph;
