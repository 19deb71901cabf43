//! Single-source shortest (and longest) paths.
//!
//! [`ShortestPath`] is the breadth-first engine driven by an [`IndexedHeap`]
//! instead of a FIFO queue. Each vertex leaves the heap once, in order of its
//! best distance, and every edge examined from it is relaxed:
//!
//! - into an `Unvisited` target: if the candidate is better than the initial
//!   distance it is assigned, the edge fires `TreeEdge` and the target is
//!   discovered; otherwise (e.g. an infinite weight) the edge fires
//!   `EdgeNotRelaxed` and the target stays `Unvisited` until another edge
//!   reaches it
//! - into a queued (`InProgress`) target: if the candidate is better, the
//!   target's key is decreased and the edge fires `TreeEdge`; otherwise
//!   `EdgeNotRelaxed`
//! - into a settled (`Finished`) target: the distance is final; an edge whose
//!   candidate is not better fires `EdgeNotRelaxed`
//!
//! Predecessors are recorded by a [`PredecessorRecorder`] attached for the
//! duration of [`ShortestPath::compute`], so every accepted `TreeEdge` becomes
//! the predecessor of its target.
//!
//! The [`DistanceRelaxer`] decides what "better" means; plugging in
//! [`LongestDistance`] turns the same loop into a longest-path search.
//!
//! # Preconditions
//!
//! Negative weights under [`ShortestDistance`] (or positive weights under
//! [`LongestDistance`]) break the settle-once discipline and produce
//! unspecified distances. Negative cycles are not detected.

use std::{collections::HashMap, marker::PhantomData};

use log::debug;

use crate::{
    graph::{
        algorithms::{
            cancel::{CancellationToken, SearchStatus},
            color::Color,
            config::SearchConfig,
            events::{EventBus, TraversalEvent},
            heap::IndexedHeap,
            observers::{PredecessorMap, PredecessorRecorder},
            relaxer::{DistanceRelaxer, LongestDistance, ShortestDistance},
            roots::RootSelector,
            traversal::{
                breadth_first_search, Directed, EdgeAccess, Frontier, SearchState, Undirected,
            },
        },
        EdgeId, GraphBase, IncidentEdges, NodeId, OutgoingEdges, TraversedEdge,
    },
    Error, Result,
};

/// Heap frontier that relaxes edges as the engine classifies them.
struct RelaxingFrontier<'w, R, W> {
    relaxer: R,
    weight: &'w W,
    distances: Vec<f64>,
    heap: IndexedHeap<R>,
    verify_heap: bool,
}

impl<'w, R, W> RelaxingFrontier<'w, R, W>
where
    R: DistanceRelaxer + Clone,
    W: Fn(EdgeId) -> f64,
{
    fn new(relaxer: R, weight: &'w W, node_count: usize, verify_heap: bool) -> Self {
        RelaxingFrontier {
            distances: vec![relaxer.initial_distance(); node_count],
            heap: IndexedHeap::new(relaxer.clone(), node_count),
            relaxer,
            weight,
            verify_heap,
        }
    }

    fn candidate(&self, edge: TraversedEdge) -> f64 {
        self.relaxer.combine(
            self.distances[edge.source.index()],
            (self.weight)(edge.edge),
        )
    }

    /// Assigns the candidate distance if it is better. Returns whether it was.
    fn relax(&mut self, edge: TraversedEdge) -> bool {
        let candidate = self.candidate(edge);
        let slot = &mut self.distances[edge.target.index()];
        if self.relaxer.is_better(candidate, *slot) {
            *slot = candidate;
            true
        } else {
            false
        }
    }
}

impl<R, W> Frontier for RelaxingFrontier<'_, R, W>
where
    R: DistanceRelaxer + Clone,
    W: Fn(EdgeId) -> f64,
{
    fn push(&mut self, node: NodeId) {
        let key = self.distances[node.index()];
        self.heap.push(node, key);
    }

    fn pop(&mut self) -> Option<NodeId> {
        self.heap.pop().map(|(node, _)| node)
    }

    fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    fn start(&mut self, root: NodeId) {
        self.distances[root.index()] = self.relaxer.root_distance();
    }

    fn tree_edge(&mut self, state: &SearchState, edge: TraversedEdge) -> Result<bool> {
        let relaxed = self.relax(edge);
        if relaxed {
            state.emit(TraversalEvent::TreeEdge(edge));
        } else {
            state.emit(TraversalEvent::EdgeNotRelaxed(edge));
        }
        Ok(relaxed)
    }

    fn gray_target(&mut self, state: &SearchState, edge: TraversedEdge) -> Result<()> {
        if !self.relax(edge) {
            state.emit(TraversalEvent::EdgeNotRelaxed(edge));
            return Ok(());
        }

        let target = edge.target;
        if self.heap.update(target, self.distances[target.index()]) {
            if self.verify_heap && !self.heap.top_is_best() {
                return Err(Error::HeapOrderViolated(target));
            }
            debug_assert!(self.heap.is_ordered());
        }
        state.emit(TraversalEvent::TreeEdge(edge));
        Ok(())
    }

    fn black_target(&mut self, state: &SearchState, edge: TraversedEdge) -> Result<()> {
        let candidate = self.candidate(edge);
        if !self
            .relaxer
            .is_better(candidate, self.distances[edge.target.index()])
        {
            state.emit(TraversalEvent::EdgeNotRelaxed(edge));
        }
        Ok(())
    }
}

/// Result of a shortest-path computation.
///
/// Only vertices discovered by the computation carry a distance; every other
/// vertex reads as the relaxer's initial distance.
#[derive(Debug, Clone, PartialEq)]
pub struct ShortestPaths {
    distances: HashMap<NodeId, f64>,
    predecessors: PredecessorMap,
    roots: Vec<NodeId>,
    status: SearchStatus,
    initial_distance: f64,
}

impl ShortestPaths {
    /// Returns the best distance found for `node`, or the initial distance if it
    /// was never reached.
    #[must_use]
    pub fn distance(&self, node: NodeId) -> f64 {
        self.distances
            .get(&node)
            .copied()
            .unwrap_or(self.initial_distance)
    }

    /// Returns `true` if `node` was discovered.
    #[must_use]
    pub fn is_reached(&self, node: NodeId) -> bool {
        self.distances.contains_key(&node)
    }

    /// Returns the distances of every discovered vertex.
    #[must_use]
    pub fn distances(&self) -> &HashMap<NodeId, f64> {
        &self.distances
    }

    /// Returns the edge that produced `node`'s distance.
    #[must_use]
    pub fn predecessor(&self, node: NodeId) -> Option<TraversedEdge> {
        self.predecessors.get(node)
    }

    /// Returns the predecessor map.
    #[must_use]
    pub fn predecessors(&self) -> &PredecessorMap {
        &self.predecessors
    }

    /// Returns the edges of the best path from a root to `node`, root first.
    ///
    /// `None` for roots, unreached vertices and cyclic predecessor chains.
    #[must_use]
    pub fn try_get_path(&self, node: NodeId) -> Option<Vec<TraversedEdge>> {
        self.predecessors.try_get_path(node)
    }

    /// Returns the roots the computation started from, in order.
    #[must_use]
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Returns how the computation ended.
    #[must_use]
    pub fn status(&self) -> SearchStatus {
        self.status
    }

    /// Returns `true` if the computation was cancelled and the result is incomplete.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.status.is_cancelled()
    }

    /// Returns the distance unreached vertices read as.
    #[must_use]
    pub fn initial_distance(&self) -> f64 {
        self.initial_distance
    }
}

/// Configurable single-source path search.
///
/// # Type Parameters
///
/// * `G` - Graph storage
/// * `W` - Edge weight function
/// * `R` - Distance relaxer, [`ShortestDistance`] unless replaced
/// * `A` - Edge access strategy, [`Directed`] or [`Undirected`]
///
/// # Examples
///
/// ```rust
/// use pathscope::graph::{algorithms::ShortestPath, DirectedGraph, NodeId};
///
/// let graph = DirectedGraph::from_edges(
///     vec!["A", "B", "C", "D"],
///     [(0, 1, 1.0), (0, 2, 5.0), (1, 3, 1.0), (2, 3, 1.0)],
/// )?;
///
/// let mut search = ShortestPath::directed(&graph, |e| graph.edge(e).copied().unwrap_or(f64::INFINITY));
/// let paths = search.compute(Some(NodeId::new(0)))?;
///
/// assert_eq!(paths.distance(NodeId::new(3)), 2.0);
/// assert_eq!(paths.try_get_path(NodeId::new(3)).map(|p| p.len()), Some(2));
/// # Ok::<(), pathscope::Error>(())
/// ```
pub struct ShortestPath<'g, G, W, R = ShortestDistance, A = Directed> {
    graph: &'g G,
    weight: W,
    relaxer: R,
    state: SearchState,
    _access: PhantomData<A>,
}

impl<'g, G, W> ShortestPath<'g, G, W, ShortestDistance, Directed>
where
    G: OutgoingEdges,
    W: Fn(EdgeId) -> f64,
{
    /// Creates a shortest-path search over outgoing edges.
    #[must_use]
    pub fn directed(graph: &'g G, weight: W) -> Self {
        Self::new(graph, weight, ShortestDistance)
    }
}

impl<'g, G, W> ShortestPath<'g, G, W, ShortestDistance, Undirected>
where
    G: IncidentEdges,
    W: Fn(EdgeId) -> f64,
{
    /// Creates a shortest-path search walking edges in both directions.
    #[must_use]
    pub fn undirected(graph: &'g G, weight: W) -> Self {
        Self::new(graph, weight, ShortestDistance)
    }
}

impl<'g, G, W, R, A> ShortestPath<'g, G, W, R, A>
where
    G: GraphBase,
    W: Fn(EdgeId) -> f64,
    R: DistanceRelaxer + Clone,
    A: EdgeAccess<G>,
{
    /// Creates a search with an explicit relaxer.
    #[must_use]
    pub fn new(graph: &'g G, weight: W, relaxer: R) -> Self {
        ShortestPath {
            graph,
            weight,
            relaxer,
            state: SearchState::new(graph.node_count()),
            _access: PhantomData,
        }
    }

    /// Replaces the relaxer, keeping configuration and subscriptions.
    #[must_use]
    pub fn with_relaxer<R2>(self, relaxer: R2) -> ShortestPath<'g, G, W, R2, A>
    where
        R2: DistanceRelaxer + Clone,
    {
        ShortestPath {
            graph: self.graph,
            weight: self.weight,
            relaxer,
            state: self.state,
            _access: PhantomData,
        }
    }

    /// Replaces the configuration.
    #[must_use]
    pub fn with_config(mut self, config: SearchConfig) -> Self {
        self.state.config = config;
        self
    }

    /// Polls `token` during the search.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.state.cancellation = Some(token);
        self
    }

    /// Returns the bus this search fires its events on.
    #[must_use]
    pub fn events(&self) -> &EventBus {
        &self.state.events
    }

    /// Returns the color of `node` after the last computation.
    #[must_use]
    pub fn color(&self, node: NodeId) -> Color {
        self.state.colors.get(node)
    }

    /// Computes paths from `root` or, without one, a forest of path trees
    /// rooted at each vertex still `Unvisited` in graph order.
    ///
    /// Each call starts from scratch; repeated calls on the same graph give
    /// identical results.
    ///
    /// # Errors
    ///
    /// * [`Error::NodeNotFound`] - `root` is not in the graph (nothing runs)
    /// * [`Error::HeapOrderViolated`] - heap verification failed
    /// * [`Error::EdgeNotFound`] - storage yielded an unresolvable edge
    pub fn compute(&mut self, root: Option<NodeId>) -> Result<ShortestPaths> {
        let roots = RootSelector::new(self.graph, root)?;
        let node_count = self.graph.node_count();
        self.state.initialize(self.graph);
        debug!(
            "Path search over {} vertices from {:?}, direction {}",
            node_count,
            root,
            if A::UNDIRECTED { "undirected" } else { "directed" }
        );

        let recorder = PredecessorRecorder::new();
        let scope = self.state.events.attach(&recorder);
        let mut frontier = RelaxingFrontier::new(
            self.relaxer.clone(),
            &self.weight,
            node_count,
            self.state.config.verify_heap,
        );
        let started = breadth_first_search::<G, A, _>(self.graph, &mut self.state, &mut frontier, roots)?;
        drop(scope);

        let distances: HashMap<NodeId, f64> = self
            .graph
            .node_ids()
            .filter(|&node| self.state.colors.get(node) != Color::Unvisited)
            .map(|node| (node, frontier.distances[node.index()]))
            .collect();

        debug!(
            "Path search {}: {} of {} vertices reached from {} root(s)",
            self.state.status,
            distances.len(),
            node_count,
            started.len()
        );

        Ok(ShortestPaths {
            distances,
            predecessors: recorder.take(),
            roots: started,
            status: self.state.status,
            initial_distance: self.relaxer.initial_distance(),
        })
    }
}

/// Shortest paths over outgoing edges.
///
/// # Errors
///
/// Returns [`Error::NodeNotFound`] if `root` is given and not in the graph.
pub fn shortest_paths<G, W>(graph: &G, root: Option<NodeId>, weight: W) -> Result<ShortestPaths>
where
    G: OutgoingEdges,
    W: Fn(EdgeId) -> f64,
{
    ShortestPath::directed(graph, weight).compute(root)
}

/// Shortest paths walking every edge in both directions.
///
/// # Errors
///
/// Returns [`Error::NodeNotFound`] if `root` is given and not in the graph.
pub fn undirected_shortest_paths<G, W>(
    graph: &G,
    root: Option<NodeId>,
    weight: W,
) -> Result<ShortestPaths>
where
    G: IncidentEdges,
    W: Fn(EdgeId) -> f64,
{
    ShortestPath::undirected(graph, weight).compute(root)
}

/// Longest paths over outgoing edges.
///
/// Exact on graphs where extending a path never makes it longer than a path
/// settled earlier; see [`LongestDistance`].
///
/// # Errors
///
/// Returns [`Error::NodeNotFound`] if `root` is given and not in the graph.
pub fn longest_paths<G, W>(graph: &G, root: Option<NodeId>, weight: W) -> Result<ShortestPaths>
where
    G: OutgoingEdges,
    W: Fn(EdgeId) -> f64,
{
    ShortestPath::<G, W, LongestDistance, Directed>::new(graph, weight, LongestDistance)
        .compute(root)
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use super::*;
    use crate::graph::{
        algorithms::events::EventKind, DirectedGraph, UndirectedGraph,
    };

    fn weighted(nodes: usize, edges: &[(usize, usize, f64)]) -> DirectedGraph<(), f64> {
        DirectedGraph::from_edges(vec![(); nodes], edges.iter().copied()).unwrap()
    }

    fn weight_of<N>(graph: &DirectedGraph<N, f64>) -> impl Fn(EdgeId) -> f64 + '_ {
        move |e| graph.edge(e).copied().unwrap_or(f64::INFINITY)
    }

    #[test]
    fn test_linear_distances() {
        let graph = weighted(4, &[(0, 1, 1.0), (1, 2, 1.0), (2, 3, 1.0)]);
        let paths = shortest_paths(&graph, Some(NodeId::new(0)), weight_of(&graph)).unwrap();

        for (i, expected) in [0.0, 1.0, 2.0, 3.0].into_iter().enumerate() {
            assert_eq!(paths.distance(NodeId::new(i)), expected);
        }
        assert!(paths.predecessor(NodeId::new(0)).is_none());
        assert_eq!(
            paths.predecessor(NodeId::new(3)).map(|e| e.edge),
            Some(EdgeId::new(2))
        );
        assert_eq!(paths.roots(), &[NodeId::new(0)]);
        assert!(!paths.is_cancelled());
    }

    #[test]
    fn test_diamond_prefers_cheaper_branch() {
        let graph = weighted(4, &[(0, 1, 1.0), (0, 2, 5.0), (1, 3, 1.0), (2, 3, 1.0)]);
        let mut search = ShortestPath::directed(&graph, weight_of(&graph));

        let not_relaxed = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&not_relaxed);
        let _scope = search.events().on(EventKind::EdgeNotRelaxed, move |event| {
            sink.borrow_mut().extend(event.edge().map(|e| e.edge));
        });

        let paths = search.compute(Some(NodeId::new(0))).unwrap();
        assert_eq!(paths.distance(NodeId::new(3)), 2.0);
        assert_eq!(
            paths.predecessor(NodeId::new(3)).map(|e| e.source),
            Some(NodeId::new(1))
        );
        assert_eq!(*not_relaxed.borrow(), vec![EdgeId::new(3)]);
    }

    #[test]
    fn test_decrease_key_on_gray_target() {
        // 0 -> 2 (10) is found first, 0 -> 1 -> 2 (1 + 1) improves it while 2 is queued
        let graph = weighted(3, &[(0, 2, 10.0), (0, 1, 1.0), (1, 2, 1.0)]);
        let mut search = ShortestPath::directed(&graph, weight_of(&graph))
            .with_config(SearchConfig::verified());

        let tree_edges = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&tree_edges);
        let _scope = search.events().on(EventKind::TreeEdge, move |event| {
            sink.borrow_mut().extend(event.edge().map(|e| e.edge.index()));
        });

        let paths = search.compute(Some(NodeId::new(0))).unwrap();
        assert_eq!(paths.distance(NodeId::new(2)), 2.0);
        assert_eq!(*tree_edges.borrow(), vec![0, 1, 2]);
        assert_eq!(
            paths.predecessor(NodeId::new(2)).map(|e| e.edge),
            Some(EdgeId::new(2))
        );
    }

    #[test]
    fn test_unreached_vertices_keep_initial_distance() {
        let graph = weighted(3, &[(0, 1, 2.0)]);
        let paths = shortest_paths(&graph, Some(NodeId::new(0)), weight_of(&graph)).unwrap();

        assert!(!paths.is_reached(NodeId::new(2)));
        assert_eq!(paths.distance(NodeId::new(2)), f64::INFINITY);
        assert!(paths.predecessor(NodeId::new(2)).is_none());
        assert_eq!(paths.distances().len(), 2);
    }

    #[test]
    fn test_whole_graph_forest() {
        let graph = weighted(4, &[(0, 1, 1.0), (2, 3, 4.0)]);
        let paths = shortest_paths(&graph, None, weight_of(&graph)).unwrap();

        assert_eq!(paths.roots(), &[NodeId::new(0), NodeId::new(2)]);
        assert_eq!(paths.distance(NodeId::new(0)), 0.0);
        assert_eq!(paths.distance(NodeId::new(2)), 0.0);
        assert_eq!(paths.distance(NodeId::new(3)), 4.0);
        assert_eq!(paths.distances().len(), 4);
    }

    #[test]
    fn test_unknown_root() {
        let graph = weighted(2, &[]);
        assert_eq!(
            shortest_paths(&graph, Some(NodeId::new(2)), weight_of(&graph)),
            Err(Error::NodeNotFound(NodeId::new(2)))
        );
    }

    #[test]
    fn test_undirected_paths_use_both_orientations() {
        let graph =
            UndirectedGraph::from_edges(vec![(); 3], [(1, 0, 2.0), (2, 1, 3.0)]).unwrap();
        let paths = undirected_shortest_paths(&graph, Some(NodeId::new(0)), |e| {
            graph.edge(e).copied().unwrap_or(f64::INFINITY)
        })
        .unwrap();

        assert_eq!(paths.distance(NodeId::new(2)), 5.0);
        let path = paths.try_get_path(NodeId::new(2)).unwrap();
        assert_eq!(path.len(), 2);
        assert!(path.iter().all(|e| e.reversed));
        assert_eq!(path[0].source, NodeId::new(0));
        assert_eq!(path[1].target, NodeId::new(2));
    }

    #[test]
    fn test_longest_paths_on_dag() {
        // 0 -> 1 (1), 0 -> 2 (1), 1 -> 2 (5): the longest route to 2 is through 1
        let graph = weighted(3, &[(0, 1, 1.0), (0, 2, 1.0), (1, 2, 5.0)]);
        let paths = longest_paths(&graph, Some(NodeId::new(0)), weight_of(&graph)).unwrap();

        assert_eq!(paths.distance(NodeId::new(2)), 6.0);
        assert_eq!(paths.initial_distance(), f64::NEG_INFINITY);
    }

    #[test]
    fn test_with_relaxer() {
        let graph = weighted(2, &[(0, 1, 3.0)]);
        let paths = ShortestPath::directed(&graph, weight_of(&graph))
            .with_relaxer(LongestDistance)
            .compute(Some(NodeId::new(0)))
            .unwrap();
        assert_eq!(paths.distance(NodeId::new(1)), 3.0);
        assert_eq!(paths.distance(NodeId::new(0)), 0.0);
    }

    #[test]
    fn test_compute_is_idempotent() {
        let graph = weighted(4, &[(0, 1, 1.0), (0, 2, 5.0), (1, 3, 1.0), (2, 3, 1.0)]);
        let mut search = ShortestPath::directed(&graph, weight_of(&graph));
        let first = search.compute(None).unwrap();
        let second = search.compute(None).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_recorder_scope_released_after_compute() {
        let graph = weighted(2, &[(0, 1, 1.0)]);
        let mut search = ShortestPath::directed(&graph, weight_of(&graph));
        search.compute(None).unwrap();
        assert!(!search.events().has_subscribers(EventKind::TreeEdge));
    }

    #[test]
    fn test_cancelled_result_is_flagged() {
        let graph = weighted(3, &[(0, 1, 1.0), (1, 2, 1.0)]);
        let token = CancellationToken::new();
        let mut search =
            ShortestPath::directed(&graph, weight_of(&graph)).with_cancellation(token.clone());

        let trigger = token.clone();
        let _scope = search.events().on(EventKind::FinishVertex, move |_| trigger.cancel());

        let paths = search.compute(None).unwrap();
        assert!(paths.is_cancelled());
        assert!(paths.is_reached(NodeId::new(1)));
        assert!(!paths.is_reached(NodeId::new(2)));
    }

    #[test]
    fn test_infinite_weight_is_not_relaxed() {
        let graph = weighted(2, &[(0, 1, f64::INFINITY)]);
        let paths = shortest_paths(&graph, Some(NodeId::new(0)), weight_of(&graph)).unwrap();
        assert!(!paths.is_reached(NodeId::new(1)));
        assert_eq!(paths.distances().len(), 1);
        assert_eq!(paths.distance(NodeId::new(1)), f64::INFINITY);
        assert!(paths.predecessor(NodeId::new(1)).is_none());
    }

    #[test]
    fn test_rejected_target_reached_by_later_edge() {
        // 0 -inf-> 1, 0 -1-> 2 -1-> 1
        let graph = weighted(3, &[(0, 1, f64::INFINITY), (0, 2, 1.0), (2, 1, 1.0)]);
        let mut search = ShortestPath::directed(&graph, weight_of(&graph));

        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        let _rejected = search.events().on(EventKind::EdgeNotRelaxed, move |event| {
            sink.borrow_mut().push(*event);
        });
        let sink = Rc::clone(&log);
        let _discovered = search.events().on(EventKind::DiscoverVertex, move |event| {
            sink.borrow_mut().push(*event);
        });

        let paths = search.compute(Some(NodeId::new(0))).unwrap();
        assert_eq!(paths.distance(NodeId::new(1)), 2.0);
        assert_eq!(
            paths.predecessor(NodeId::new(1)).map(|e| e.source),
            Some(NodeId::new(2))
        );
        assert_eq!(
            *log.borrow(),
            vec![
                TraversalEvent::DiscoverVertex(NodeId::new(0)),
                TraversalEvent::EdgeNotRelaxed(TraversedEdge::new(
                    EdgeId::new(0),
                    NodeId::new(0),
                    NodeId::new(1)
                )),
                TraversalEvent::DiscoverVertex(NodeId::new(2)),
                TraversalEvent::DiscoverVertex(NodeId::new(1)),
            ]
        );
    }
}
