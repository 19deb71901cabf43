//! Independent searches fanned out over the `rayon` pool.
//!
//! Every search instance owns its colors, frontier and event bus, and only
//! borrows the graph immutably. Instances for different sources therefore run
//! concurrently against one shared graph with no coordination.

use rayon::prelude::*;

use crate::{
    graph::{
        algorithms::shortest_path::{shortest_paths, ShortestPaths},
        EdgeId, NodeId, OutgoingEdges,
    },
    Result,
};

/// Runs one shortest-path search per entry of `sources`, in parallel.
///
/// Results are returned in the order of `sources`. Each is identical to what
/// [`shortest_paths`] returns for that source alone.
///
/// # Errors
///
/// Returns the first error any search produced, e.g.
/// [`Error::NodeNotFound`](crate::Error::NodeNotFound) for a source outside the
/// graph.
///
/// # Examples
///
/// ```rust
/// use pathscope::graph::{algorithms::parallel, DirectedGraph, NodeId};
///
/// let graph = DirectedGraph::from_edges(vec![(); 3], [(0, 1, 1.0), (1, 2, 2.0)])?;
/// let sources = [NodeId::new(0), NodeId::new(1)];
///
/// let all = parallel::shortest_paths_from_each(&graph, &sources, |e| {
///     graph.edge(e).copied().unwrap_or(f64::INFINITY)
/// })?;
/// assert_eq!(all[0].distance(NodeId::new(2)), 3.0);
/// assert_eq!(all[1].distance(NodeId::new(2)), 2.0);
/// # Ok::<(), pathscope::Error>(())
/// ```
pub fn shortest_paths_from_each<G, W>(
    graph: &G,
    sources: &[NodeId],
    weight: W,
) -> Result<Vec<ShortestPaths>>
where
    G: OutgoingEdges + Sync,
    W: Fn(EdgeId) -> f64 + Sync,
{
    sources
        .par_iter()
        .map(|&source| shortest_paths(graph, Some(source), &weight))
        .collect()
}
