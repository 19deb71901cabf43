//! Event-driven breadth-first and depth-first traversal.
//!
//! Both searches share one color state machine: a vertex is `Unvisited` until
//! discovered, `InProgress` while it sits on the frontier (BFS queue or DFS
//! stack), and `Finished` once every edge leaving it has been examined. Each step
//! fires a [`TraversalEvent`] on the search's [`EventBus`], so algorithms built on
//! top of the engine are just handlers and frontier policies.
//!
//! # Event order
//!
//! Breadth-first, per dequeued vertex `v`:
//!
//! 1. `ExamineVertex(v)`
//! 2. for each edge: `ExamineEdge`, then one of
//!    - `TreeEdge` + `DiscoverVertex(target)` for an `Unvisited` target
//!    - `GrayTarget` for an `InProgress` target
//!    - `BlackTarget` for a `Finished` target
//! 3. `FinishVertex(v)`
//!
//! Depth-first fires `DiscoverVertex` and `ExamineVertex` when it enters a vertex,
//! then per edge `ExamineEdge` followed by `TreeEdge` (and a descent), `BackEdge`,
//! `ForwardEdge` or `CrossEdge`, and `FinishVertex` when it leaves.
//!
//! Whole-graph computations fire `InitializeVertex` for every vertex first, then
//! `StartVertex` for each root before its traversal.
//!
//! # Directed and undirected walks
//!
//! The [`Directed`] and [`Undirected`] access strategies are the only difference
//! between the two flavours. Undirected access yields every incident edge
//! oriented away from the current vertex and marks edges walked against their
//! stored orientation as [`reversed`](crate::graph::TraversedEdge::reversed).
//!
//! # Cancellation
//!
//! The frontier loop polls the configured [`CancellationToken`] before every pop
//! and every edge examination. Once cancelled the search returns immediately,
//! leaving colors as they were; the search then reports
//! [`SearchStatus::Cancelled`].

use std::{collections::VecDeque, marker::PhantomData};

use log::{debug, trace};

use crate::{
    graph::{
        algorithms::{
            cancel::{CancellationToken, SearchStatus},
            color::{Color, ColorMap},
            config::SearchConfig,
            events::{EventBus, TraversalEvent},
            roots::RootSelector,
        },
        EdgeEndpoints, EdgeId, GraphBase, IncidentEdges, NodeId, OutgoingEdges, TraversedEdge,
    },
    Error, Result,
};

/// Strategy for enumerating the edges a traversal may follow from a vertex.
pub trait EdgeAccess<G> {
    /// `true` when edges may be walked against their stored orientation.
    const UNDIRECTED: bool;

    /// Appends the edges leaving `node`, oriented away from it, to `out`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EdgeNotFound`] if storage yields an edge it cannot resolve
    /// and [`Error::NodeNotFound`] if an endpoint lies outside the graph.
    fn collect_edges(graph: &G, node: NodeId, out: &mut Vec<TraversedEdge>) -> Result<()>;
}

/// Follow edges in their stored direction only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Directed;

/// Follow edges in both directions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Undirected;

fn resolve<G: EdgeEndpoints>(graph: &G, edge: EdgeId) -> Result<(NodeId, NodeId)> {
    let (source, target) = graph.edge_endpoints(edge).ok_or(Error::EdgeNotFound(edge))?;
    for node in [source, target] {
        if !graph.contains_node(node) {
            return Err(Error::NodeNotFound(node));
        }
    }
    Ok((source, target))
}

impl<G: OutgoingEdges> EdgeAccess<G> for Directed {
    const UNDIRECTED: bool = false;

    fn collect_edges(graph: &G, node: NodeId, out: &mut Vec<TraversedEdge>) -> Result<()> {
        for edge in graph.outgoing_edges(node) {
            let (_, target) = resolve(graph, edge)?;
            out.push(TraversedEdge::new(edge, node, target));
        }
        Ok(())
    }
}

impl<G: IncidentEdges> EdgeAccess<G> for Undirected {
    const UNDIRECTED: bool = true;

    fn collect_edges(graph: &G, node: NodeId, out: &mut Vec<TraversedEdge>) -> Result<()> {
        for edge in graph.incident_edges(node) {
            let (source, target) = resolve(graph, edge)?;
            let stored = TraversedEdge::new(edge, source, target);
            out.push(if source == node {
                stored
            } else {
                stored.flipped()
            });
        }
        Ok(())
    }
}

/// State owned by one search instance.
#[derive(Debug)]
pub(crate) struct SearchState {
    pub(crate) colors: ColorMap,
    pub(crate) events: EventBus,
    pub(crate) config: SearchConfig,
    pub(crate) cancellation: Option<CancellationToken>,
    pub(crate) status: SearchStatus,
}

impl SearchState {
    pub(crate) fn new(node_count: usize) -> Self {
        SearchState {
            colors: ColorMap::new(node_count),
            events: EventBus::new(),
            config: SearchConfig::default(),
            cancellation: None,
            status: SearchStatus::Completed,
        }
    }

    /// Resets colors and status, then fires `InitializeVertex` for every vertex.
    pub(crate) fn initialize<G: GraphBase>(&mut self, graph: &G) {
        self.colors = ColorMap::new(graph.node_count());
        self.status = SearchStatus::Completed;
        for node in graph.node_ids() {
            self.emit(TraversalEvent::InitializeVertex(node));
        }
    }

    #[inline]
    pub(crate) fn emit(&self, event: TraversalEvent) {
        if self.config.trace_events {
            trace!("{event:?}");
        }
        self.events.fire(&event);
    }

    /// Polls the token; a positive poll flags the search as cancelled.
    #[inline]
    pub(crate) fn poll_cancelled(&mut self) -> bool {
        if self.status.is_cancelled() {
            return true;
        }
        match &self.cancellation {
            Some(token) if token.is_cancelled() => {
                trace!("Cancellation observed, stopping traversal");
                self.status = SearchStatus::Cancelled;
                true
            }
            _ => false,
        }
    }

    /// Validates `root` for a from-root entry point.
    pub(crate) fn check_root<G: GraphBase>(&self, graph: &G, root: NodeId) -> Result<()> {
        if !graph.contains_node(root) {
            return Err(Error::NodeNotFound(root));
        }
        if self.colors.get(root) != Color::Unvisited {
            return Err(Error::RootNotUnvisited(root));
        }
        Ok(())
    }
}

/// Queue policy plugged into the breadth-first loop.
///
/// The hooks run after the engine has fired the structural event for an edge
/// (`GrayTarget`, `BlackTarget`) or, for `tree_edge`, right before the target is
/// discovered.
pub(crate) trait Frontier {
    fn push(&mut self, node: NodeId);

    fn pop(&mut self) -> Option<NodeId>;

    fn is_empty(&self) -> bool;

    /// Called before `root` is discovered.
    fn start(&mut self, _root: NodeId) {}

    /// Handles an edge into an `Unvisited` target. Returns whether the target is
    /// discovered through it; a rejected target stays `Unvisited`.
    fn tree_edge(&mut self, state: &SearchState, edge: TraversedEdge) -> Result<bool> {
        state.emit(TraversalEvent::TreeEdge(edge));
        Ok(true)
    }

    fn gray_target(&mut self, _state: &SearchState, _edge: TraversedEdge) -> Result<()> {
        Ok(())
    }

    fn black_target(&mut self, _state: &SearchState, _edge: TraversedEdge) -> Result<()> {
        Ok(())
    }
}

/// Plain FIFO queue.
#[derive(Debug, Default)]
pub(crate) struct FifoFrontier {
    queue: VecDeque<NodeId>,
}

impl Frontier for FifoFrontier {
    fn push(&mut self, node: NodeId) {
        self.queue.push_back(node);
    }

    fn pop(&mut self) -> Option<NodeId> {
        self.queue.pop_front()
    }

    fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

/// Breadth-first walk from a single `Unvisited` root.
pub(crate) fn breadth_first_visit<G, A, F>(
    graph: &G,
    state: &mut SearchState,
    frontier: &mut F,
    root: NodeId,
) -> Result<()>
where
    G: GraphBase,
    A: EdgeAccess<G>,
    F: Frontier,
{
    state.check_root(graph, root)?;

    state.colors.set(root, Color::InProgress);
    frontier.push(root);
    state.emit(TraversalEvent::DiscoverVertex(root));

    let mut edges = Vec::new();
    while !frontier.is_empty() {
        if state.poll_cancelled() {
            return Ok(());
        }
        let Some(node) = frontier.pop() else {
            break;
        };
        state.emit(TraversalEvent::ExamineVertex(node));

        edges.clear();
        A::collect_edges(graph, node, &mut edges)?;
        for &edge in &edges {
            if state.poll_cancelled() {
                return Ok(());
            }
            state.emit(TraversalEvent::ExamineEdge(edge));

            match state.colors.get(edge.target) {
                Color::Unvisited => {
                    if frontier.tree_edge(state, edge)? {
                        state.colors.set(edge.target, Color::InProgress);
                        frontier.push(edge.target);
                        state.emit(TraversalEvent::DiscoverVertex(edge.target));
                    }
                }
                Color::InProgress => {
                    state.emit(TraversalEvent::GrayTarget(edge));
                    frontier.gray_target(state, edge)?;
                }
                Color::Finished => {
                    state.emit(TraversalEvent::BlackTarget(edge));
                    frontier.black_target(state, edge)?;
                }
            }
        }

        state.colors.set(node, Color::Finished);
        state.emit(TraversalEvent::FinishVertex(node));
    }
    Ok(())
}

/// Breadth-first walk from every root `roots` yields.
///
/// # Returns
///
/// The roots that were started, in order.
pub(crate) fn breadth_first_search<G, A, F>(
    graph: &G,
    state: &mut SearchState,
    frontier: &mut F,
    mut roots: RootSelector,
) -> Result<Vec<NodeId>>
where
    G: GraphBase,
    A: EdgeAccess<G>,
    F: Frontier,
{
    let mut started = Vec::new();
    while let Some(root) = roots.next_root(&state.colors) {
        if state.poll_cancelled() {
            break;
        }
        started.push(root);
        state.emit(TraversalEvent::StartVertex(root));
        frontier.start(root);
        breadth_first_visit::<G, A, F>(graph, state, frontier, root)?;
        if state.status.is_cancelled() {
            break;
        }
    }
    Ok(started)
}

/// Breadth-first search with a FIFO frontier.
///
/// # Examples
///
/// ```rust
/// use std::{cell::RefCell, rc::Rc};
/// use pathscope::graph::{algorithms::{BreadthFirstSearch, EventKind}, DirectedGraph, NodeId};
///
/// // 0 -> 1, 0 -> 2, 1 -> 3
/// let graph = DirectedGraph::from_edges(vec![(); 4], [(0, 1, ()), (0, 2, ()), (1, 3, ())])?;
/// let mut bfs = BreadthFirstSearch::directed(&graph);
///
/// let order = Rc::new(RefCell::new(Vec::new()));
/// let sink = Rc::clone(&order);
/// let _scope = bfs.events().on(EventKind::DiscoverVertex, move |event| {
///     sink.borrow_mut().extend(event.vertex());
/// });
///
/// bfs.compute(Some(NodeId::new(0)))?;
/// assert_eq!(*order.borrow(), vec![NodeId::new(0), NodeId::new(1), NodeId::new(2), NodeId::new(3)]);
/// # Ok::<(), pathscope::Error>(())
/// ```
pub struct BreadthFirstSearch<'g, G, A = Directed> {
    graph: &'g G,
    state: SearchState,
    _access: PhantomData<A>,
}

impl<'g, G: OutgoingEdges> BreadthFirstSearch<'g, G, Directed> {
    /// Creates a search following stored edge directions.
    #[must_use]
    pub fn directed(graph: &'g G) -> Self {
        Self::new(graph)
    }
}

impl<'g, G: IncidentEdges> BreadthFirstSearch<'g, G, Undirected> {
    /// Creates a search walking edges in both directions.
    #[must_use]
    pub fn undirected(graph: &'g G) -> Self {
        Self::new(graph)
    }
}

impl<'g, G, A> BreadthFirstSearch<'g, G, A>
where
    G: GraphBase,
    A: EdgeAccess<G>,
{
    /// Creates a search over `graph` with every vertex `Unvisited`.
    #[must_use]
    pub fn new(graph: &'g G) -> Self {
        BreadthFirstSearch {
            graph,
            state: SearchState::new(graph.node_count()),
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

    /// Returns the current color of `node`.
    #[must_use]
    pub fn color(&self, node: NodeId) -> Color {
        self.state.colors.get(node)
    }

    /// Returns the color of every vertex.
    #[must_use]
    pub fn colors(&self) -> &ColorMap {
        &self.state.colors
    }

    /// Returns how the last computation ended.
    #[must_use]
    pub fn status(&self) -> SearchStatus {
        self.state.status
    }

    /// Marks every vertex `Unvisited` and fires `InitializeVertex` for each.
    pub fn initialize(&mut self) {
        self.state.initialize(self.graph);
    }

    /// Traverses from `root` without resetting any state.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NodeNotFound`] if `root` is not in the graph and
    /// [`Error::RootNotUnvisited`] if it has already been reached. Storage
    /// inconsistencies surface as [`Error::EdgeNotFound`].
    pub fn visit_from(&mut self, root: NodeId) -> Result<SearchStatus> {
        breadth_first_visit::<G, A, _>(
            self.graph,
            &mut self.state,
            &mut FifoFrontier::default(),
            root,
        )?;
        Ok(self.state.status)
    }

    /// Initializes, then traverses from `root` or, without one, from every
    /// vertex still `Unvisited` in graph order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NodeNotFound`] for an explicit root outside the graph,
    /// before any event fires.
    pub fn compute(&mut self, root: Option<NodeId>) -> Result<SearchStatus> {
        let roots = RootSelector::new(self.graph, root)?;
        self.initialize();
        debug!(
            "Breadth-first search over {} vertices from {:?}",
            self.graph.node_count(),
            root
        );

        let started = breadth_first_search::<G, A, _>(
            self.graph,
            &mut self.state,
            &mut FifoFrontier::default(),
            roots,
        )?;

        debug!(
            "Breadth-first search {} after {} root(s)",
            self.state.status,
            started.len()
        );
        Ok(self.state.status)
    }
}

struct Frame {
    node: NodeId,
    edges: Vec<TraversedEdge>,
    next: usize,
    via: Option<EdgeId>,
}

/// Depth-first search with an explicit stack.
///
/// Non-tree edges are classified from the colors and discovery times: an
/// `InProgress` target is an ancestor on the stack (`BackEdge`), a `Finished`
/// target discovered after the source is a descendant (`ForwardEdge`), any
/// other `Finished` target is a `CrossEdge`.
///
/// In undirected mode the edge a vertex was entered through is not walked back,
/// and an edge into a `Finished` vertex is skipped because it was already
/// classified from the other endpoint.
///
/// # Examples
///
/// ```rust
/// use std::{cell::Cell, rc::Rc};
/// use pathscope::graph::{algorithms::{DepthFirstSearch, EventKind}, DirectedGraph, NodeId};
///
/// // 0 -> 1 -> 2 -> 0
/// let graph = DirectedGraph::from_edges(vec![(); 3], [(0, 1, ()), (1, 2, ()), (2, 0, ())])?;
/// let mut dfs = DepthFirstSearch::directed(&graph);
///
/// let back_edges = Rc::new(Cell::new(0));
/// let counter = Rc::clone(&back_edges);
/// let _scope = dfs.events().on(EventKind::BackEdge, move |_| counter.set(counter.get() + 1));
///
/// dfs.compute(Some(NodeId::new(0)))?;
/// assert_eq!(back_edges.get(), 1);
/// assert_eq!(dfs.discover_time(NodeId::new(2)), Some(2));
/// # Ok::<(), pathscope::Error>(())
/// ```
pub struct DepthFirstSearch<'g, G, A = Directed> {
    graph: &'g G,
    state: SearchState,
    discover_times: Vec<Option<usize>>,
    finish_times: Vec<Option<usize>>,
    clock: usize,
    finish_clock: usize,
    _access: PhantomData<A>,
}

impl<'g, G: OutgoingEdges> DepthFirstSearch<'g, G, Directed> {
    /// Creates a search following stored edge directions.
    #[must_use]
    pub fn directed(graph: &'g G) -> Self {
        Self::new(graph)
    }
}

impl<'g, G: IncidentEdges> DepthFirstSearch<'g, G, Undirected> {
    /// Creates a search walking edges in both directions.
    #[must_use]
    pub fn undirected(graph: &'g G) -> Self {
        Self::new(graph)
    }
}

impl<'g, G, A> DepthFirstSearch<'g, G, A>
where
    G: GraphBase,
    A: EdgeAccess<G>,
{
    /// Creates a search over `graph` with every vertex `Unvisited`.
    #[must_use]
    pub fn new(graph: &'g G) -> Self {
        let node_count = graph.node_count();
        DepthFirstSearch {
            graph,
            state: SearchState::new(node_count),
            discover_times: vec![None; node_count],
            finish_times: vec![None; node_count],
            clock: 0,
            finish_clock: 0,
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

    /// Returns the current color of `node`.
    #[must_use]
    pub fn color(&self, node: NodeId) -> Color {
        self.state.colors.get(node)
    }

    /// Returns how the last computation ended.
    #[must_use]
    pub fn status(&self) -> SearchStatus {
        self.state.status
    }

    /// Returns the position of `node` in discovery order across all roots.
    #[must_use]
    pub fn discover_time(&self, node: NodeId) -> Option<usize> {
        self.discover_times.get(node.index()).copied().flatten()
    }

    /// Returns the position of `node` in finish order across all roots.
    #[must_use]
    pub fn finish_time(&self, node: NodeId) -> Option<usize> {
        self.finish_times.get(node.index()).copied().flatten()
    }

    /// Marks every vertex `Unvisited`, clears timestamps and fires
    /// `InitializeVertex` for each vertex.
    pub fn initialize(&mut self) {
        let node_count = self.graph.node_count();
        self.discover_times = vec![None; node_count];
        self.finish_times = vec![None; node_count];
        self.clock = 0;
        self.finish_clock = 0;
        self.state.initialize(self.graph);
    }

    /// Traverses from `root` without resetting any state.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NodeNotFound`] if `root` is not in the graph and
    /// [`Error::RootNotUnvisited`] if it has already been reached.
    pub fn visit_from(&mut self, root: NodeId) -> Result<SearchStatus> {
        self.state.check_root(self.graph, root)?;

        let mut stack = vec![self.enter(root, None)?];

        while let Some(frame) = stack.last_mut() {
            if self.state.poll_cancelled() {
                return Ok(self.state.status);
            }

            let Some(&edge) = frame.edges.get(frame.next) else {
                let node = frame.node;
                stack.pop();
                self.state.colors.set(node, Color::Finished);
                self.finish_times[node.index()] = Some(self.finish_clock);
                self.finish_clock += 1;
                self.state.emit(TraversalEvent::FinishVertex(node));
                continue;
            };
            frame.next += 1;
            let via = frame.via;

            let target_color = self.state.colors.get(edge.target);
            if A::UNDIRECTED && (via == Some(edge.edge) || target_color == Color::Finished) {
                continue;
            }

            self.state.emit(TraversalEvent::ExamineEdge(edge));
            match target_color {
                Color::Unvisited => {
                    self.state.emit(TraversalEvent::TreeEdge(edge));
                    let child = self.enter(edge.target, Some(edge.edge))?;
                    stack.push(child);
                }
                Color::InProgress => self.state.emit(TraversalEvent::BackEdge(edge)),
                Color::Finished => {
                    if self.discover_time(edge.source) < self.discover_time(edge.target) {
                        self.state.emit(TraversalEvent::ForwardEdge(edge));
                    } else {
                        self.state.emit(TraversalEvent::CrossEdge(edge));
                    }
                }
            }
        }
        Ok(self.state.status)
    }

    /// Initializes, then traverses from `root` or, without one, from every
    /// vertex still `Unvisited` in graph order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NodeNotFound`] for an explicit root outside the graph,
    /// before any event fires.
    pub fn compute(&mut self, root: Option<NodeId>) -> Result<SearchStatus> {
        let mut roots = RootSelector::new(self.graph, root)?;
        self.initialize();
        debug!(
            "Depth-first search over {} vertices from {:?}",
            self.graph.node_count(),
            root
        );

        while let Some(root) = roots.next_root(&self.state.colors) {
            if self.state.poll_cancelled() {
                break;
            }
            self.state.emit(TraversalEvent::StartVertex(root));
            self.visit_from(root)?;
            if self.state.status.is_cancelled() {
                break;
            }
        }

        debug!("Depth-first search {}", self.state.status);
        Ok(self.state.status)
    }

    fn enter(&mut self, node: NodeId, via: Option<EdgeId>) -> Result<Frame> {
        self.state.colors.set(node, Color::InProgress);
        self.discover_times[node.index()] = Some(self.clock);
        self.clock += 1;
        self.state.emit(TraversalEvent::DiscoverVertex(node));
        self.state.emit(TraversalEvent::ExamineVertex(node));

        let mut edges = Vec::new();
        A::collect_edges(self.graph, node, &mut edges)?;
        Ok(Frame {
            node,
            edges,
            next: 0,
            via,
        })
    }
}
