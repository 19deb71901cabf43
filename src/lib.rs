// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![deny(unsafe_code)]

//! # pathscope
//!
//! A generic graph traversal and path-analysis engine. Breadth-first search,
//! depth-first search, weighted shortest paths and dominator analysis are all
//! driven by one event-producing traversal core, and results are collected by
//! observers subscribed to its events.
//!
//! ## Features
//!
//! - **Event-driven traversal** - BFS and DFS fire a typed event at every step
//!   (discover, examine, tree / back / forward / cross edge, finish)
//! - **Pluggable observers** - subscribe closures or [`Observer`](graph::algorithms::Observer)
//!   types; subscriptions are released when their scope is dropped
//! - **Relaxation-parameterized path search** - shortest and longest paths from the same
//!   heap-driven engine, with optional heap-order verification
//! - **Lengauer-Tarjan dominators** - semidominators, immediate dominators, dominance frontiers
//! - **Storage-agnostic** - algorithms only consume the storage traits in [`graph`]
//! - **Cancellable** - every long-running computation polls a
//!   [`CancellationToken`](graph::algorithms::CancellationToken)
//!
//! ## Quick Start
//!
//! ```rust
//! use pathscope::prelude::*;
//!
//! let mut graph: DirectedGraph<&str, f64> = DirectedGraph::new();
//! let depot = graph.add_node("depot");
//! let market = graph.add_node("market");
//! let harbor = graph.add_node("harbor");
//! graph.add_edge(depot, market, 4.0)?;
//! graph.add_edge(depot, harbor, 1.0)?;
//! graph.add_edge(harbor, market, 2.0)?;
//!
//! let paths = shortest_paths(&graph, Some(depot), |e| *graph.edge(e).unwrap_or(&f64::INFINITY))?;
//! assert_eq!(paths.distance(market), 3.0);
//!
//! let route: Vec<NodeId> = paths
//!     .try_get_path(market)
//!     .unwrap_or_default()
//!     .iter()
//!     .map(|edge| edge.target)
//!     .collect();
//! assert_eq!(route, vec![harbor, market]);
//! # Ok::<(), pathscope::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`prelude`] - Convenient re-exports of commonly used types and traits
//! - [`graph`] - Storage types, storage traits and vertex / edge handles
//! - [`graph::algorithms`] - The traversal engine and everything built on it
//! - [`Error`] and [`Result`] - Error handling
//!
//! ## Logging
//!
//! Computations log their start and outcome at `debug` level through the
//! [`log`](https://docs.rs/log) facade. With
//! [`SearchConfig::trace_events`](graph::algorithms::SearchConfig) enabled, every
//! fired event is logged at `trace` level.

mod error;

/// Graph storage, handles and algorithms.
///
/// # Key Types
///
/// - [`graph::DirectedGraph`] / [`graph::UndirectedGraph`] - Adjacency-list storage
/// - [`graph::IndexedGraph`] - Storage addressed by domain keys
/// - [`graph::NodeId`] / [`graph::EdgeId`] - Dense handles
/// - [`graph::TraversedEdge`] - An edge as a traversal walked it
pub mod graph;

/// Convenient re-exports of the most commonly used types and traits.
///
/// # Example
///
/// ```rust
/// use pathscope::prelude::*;
///
/// let graph: DirectedGraph<(), ()> = DirectedGraph::from_edges(vec![(); 2], [(0, 1, ())])?;
/// let mut bfs = BreadthFirstSearch::directed(&graph);
/// assert_eq!(bfs.compute(None)?, SearchStatus::Completed);
/// # Ok::<(), pathscope::Error>(())
/// ```
pub mod prelude;

/// `pathscope` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is always [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// `pathscope` Error type
///
/// The error type for all fallible operations in this crate.
///
/// # Examples
///
/// ```rust
/// use pathscope::{graph::{algorithms::compute_dominators, DirectedGraph, NodeId}, Error};
///
/// let graph: DirectedGraph<(), ()> = DirectedGraph::new();
/// match compute_dominators(&graph, NodeId::new(0)) {
///     Err(Error::NodeNotFound(node)) => println!("no such root: {}", node),
///     Err(e) => println!("Error: {}", e),
///     Ok(_) => unreachable!(),
/// }
/// ```
pub use error::Error;
