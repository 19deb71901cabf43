//! Event-driven graph algorithms.
//!
//! Every algorithm in this module is a configuration of one traversal engine.
//! The engine walks the graph, keeps a per-vertex [`Color`], and fires a
//! [`TraversalEvent`] at each step. Observers subscribed on the search's
//! [`EventBus`] turn those events into results.
//!
//! # Available Algorithms
//!
//! ## Traversal
//!
//! - [`BreadthFirstSearch`] - FIFO frontier; fires tree / non-tree / gray / black edge events
//! - [`DepthFirstSearch`] - explicit stack; classifies tree, back, forward and cross edges
//!
//! ## Path Search
//!
//! - [`ShortestPath`] - the breadth-first engine over an [`IndexedHeap`], relaxing edges
//!   with a [`DistanceRelaxer`]
//! - [`shortest_paths`], [`undirected_shortest_paths`], [`longest_paths`] - one-call forms
//! - [`parallel::shortest_paths_from_each`] - independent searches on the `rayon` pool
//!
//! ## Dominator Analysis
//!
//! - [`compute_dominators`] / [`DominatorAnalysis`] - Lengauer-Tarjan on top of DFS timestamps
//! - [`Dominators`] - semidominators, immediate dominators and dominance frontiers
//!
//! ## Observers
//!
//! - [`PredecessorRecorder`] - tree edge per vertex, see [`PredecessorMap`]
//! - [`DistanceRecorder`] - hop counts along tree edges
//! - [`TimestampRecorder`] - DFS discovery and finish times, see [`Timestamps`]
//!
//! # Algorithm Selection
//!
//! | Algorithm | Time Complexity | Use Case |
//! |-----------|-----------------|----------|
//! | BFS/DFS | O(V + E) | Reachability, edge classification |
//! | Shortest path | O((V + E) log V) | Non-negative weighted routing |
//! | Dominators | O(E log V) | Control-flow analysis, SSA construction |
//!
//! # Examples
//!
//! ```rust
//! use std::{cell::RefCell, rc::Rc};
//! use pathscope::graph::{
//!     algorithms::{DepthFirstSearch, EventKind},
//!     DirectedGraph, NodeId,
//! };
//!
//! let graph = DirectedGraph::from_edges(vec![(); 3], [(0, 1, ()), (1, 2, ()), (2, 0, ())])?;
//!
//! let back_edges = Rc::new(RefCell::new(Vec::new()));
//! let mut dfs = DepthFirstSearch::directed(&graph);
//! let sink = Rc::clone(&back_edges);
//! let _scope = dfs.events().on(EventKind::BackEdge, move |event| {
//!     sink.borrow_mut().extend(event.edge());
//! });
//! dfs.compute(Some(NodeId::new(0)))?;
//!
//! assert_eq!(back_edges.borrow().len(), 1);
//! # Ok::<(), pathscope::Error>(())
//! ```

mod cancel;
mod color;
mod config;
mod dominators;
mod events;
mod heap;
mod observers;
pub mod parallel;
mod relaxer;
mod roots;
mod shortest_path;
mod traversal;

pub use cancel::{CancellationToken, SearchStatus};
pub use color::{Color, ColorMap};
pub use config::SearchConfig;
pub use dominators::{compute_dominators, DominatorAnalysis, DominatorIterator, Dominators};
pub use events::{EventBus, EventKind, Observer, ObserverScope, Registrar, TraversalEvent};
pub use heap::IndexedHeap;
pub use observers::{
    DistanceRecorder, PredecessorMap, PredecessorRecorder, TimestampRecorder, Timestamps,
};
pub use relaxer::{DistanceRelaxer, LongestDistance, ShortestDistance};
pub use roots::RootSelector;
pub use shortest_path::{
    longest_paths, shortest_paths, undirected_shortest_paths, ShortestPath, ShortestPaths,
};
pub use traversal::{BreadthFirstSearch, DepthFirstSearch, Directed, EdgeAccess, Undirected};
