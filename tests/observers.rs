//! Observer attachment and custom storage integration tests.
//!
//! These tests exercise the public subscription API end to end:
//! 1. Scoped attachment and release, including nesting and early exit
//! 2. Attaching one observer several times
//! 3. A user-defined observer type
//! 4. A user-defined storage type driven through the storage traits

use std::{cell::RefCell, collections::HashMap, rc::Rc};

use pathscope::{
    graph::{
        algorithms::{
            BreadthFirstSearch, DepthFirstSearch, DistanceRecorder, EventKind, Observer,
            PredecessorRecorder, Registrar, ShortestPath, TimestampRecorder, TraversalEvent,
        },
        DirectedGraph, EdgeEndpoints, EdgeId, GraphBase, NodeId, OutgoingEdges,
    },
    Error, Result,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn chain(n: usize) -> Result<DirectedGraph<(), ()>> {
    DirectedGraph::from_edges(vec![(); n], (0..n.saturating_sub(1)).map(|i| (i, i + 1, ())))
}

/// Counts events per kind.
#[derive(Default, Clone)]
struct EventCounter {
    counts: Rc<RefCell<HashMap<EventKind, usize>>>,
}

impl EventCounter {
    fn count(&self, kind: EventKind) -> usize {
        self.counts.borrow().get(&kind).copied().unwrap_or(0)
    }
}

impl Observer for EventCounter {
    fn register(&self, registrar: &mut Registrar<'_>) {
        for kind in [EventKind::DiscoverVertex, EventKind::TreeEdge, EventKind::FinishVertex] {
            let counts = Rc::clone(&self.counts);
            registrar.on(kind, move |event: &TraversalEvent| {
                *counts.borrow_mut().entry(event.kind()).or_default() += 1;
            });
        }
    }
}

#[test]
fn test_scope_releases_only_its_handlers() -> Result<()> {
    init_logging();
    let graph = chain(4)?;
    let mut bfs = BreadthFirstSearch::directed(&graph);

    let outer = EventCounter::default();
    let inner = EventCounter::default();
    let _outer_scope = bfs.events().attach(&outer);
    {
        let inner_scope = bfs.events().attach(&inner);
        assert_eq!(inner_scope.len(), 3);
        assert_eq!(bfs.events().subscriber_count(EventKind::TreeEdge), 2);
        bfs.compute(None)?;
    }
    assert_eq!(bfs.events().subscriber_count(EventKind::TreeEdge), 1);

    bfs.compute(None)?;
    assert_eq!(inner.count(EventKind::DiscoverVertex), 4);
    assert_eq!(outer.count(EventKind::DiscoverVertex), 8);
    assert_eq!(outer.count(EventKind::TreeEdge), 6);
    Ok(())
}

#[test]
fn test_double_attach_detaches_symmetrically() -> Result<()> {
    init_logging();
    let graph = chain(3)?;
    let mut dfs = DepthFirstSearch::directed(&graph);
    let counter = EventCounter::default();

    let first = dfs.events().attach(&counter);
    let second = dfs.events().attach(&counter);
    assert_eq!(dfs.events().subscriber_count(EventKind::FinishVertex), 2);

    dfs.compute(None)?;
    assert_eq!(counter.count(EventKind::FinishVertex), 6);

    first.detach();
    assert_eq!(dfs.events().subscriber_count(EventKind::FinishVertex), 1);
    dfs.compute(None)?;
    assert_eq!(counter.count(EventKind::FinishVertex), 9);

    drop(second);
    assert!(!dfs.events().has_subscribers(EventKind::FinishVertex));
    Ok(())
}

#[test]
fn test_scope_released_on_error_path() {
    init_logging();
    let graph = chain(2).expect("chain");
    let mut search = ShortestPath::directed(&graph, |_| 1.0);
    let counter = EventCounter::default();

    let result = {
        let _scope = search.events().attach(&counter);
        search.compute(Some(NodeId::new(7))).map(|_| ())
    };
    assert_eq!(result, Err(Error::NodeNotFound(NodeId::new(7))));
    assert!(!search.events().has_subscribers(EventKind::TreeEdge));
    assert_eq!(counter.count(EventKind::DiscoverVertex), 0);
}

#[test]
fn test_builtin_recorders_agree() -> Result<()> {
    init_logging();
    // 0 -> 1 -> 3, 0 -> 2 -> 3, 3 -> 4
    let graph = DirectedGraph::from_edges(
        vec![(); 5],
        [(0, 1, ()), (0, 2, ()), (1, 3, ()), (2, 3, ()), (3, 4, ())],
    )?;

    let mut bfs = BreadthFirstSearch::directed(&graph);
    let hops = DistanceRecorder::new();
    let tree = PredecessorRecorder::new();
    let _hops = bfs.events().attach(&hops);
    let _tree = bfs.events().attach(&tree);
    bfs.compute(Some(NodeId::new(0)))?;

    let tree = tree.snapshot();
    for (node, count) in hops.snapshot() {
        let path_len = tree.try_get_path(node).map_or(0, |path| path.len());
        assert_eq!(count, path_len, "vertex {node}");
    }
    assert_eq!(hops.hops(NodeId::new(4)), Some(3));

    let mut dfs = DepthFirstSearch::directed(&graph);
    let stamps = TimestampRecorder::new();
    let _stamps = dfs.events().attach(&stamps);
    dfs.compute(Some(NodeId::new(0)))?;
    let stamps = stamps.snapshot();
    for node in graph.node_ids() {
        assert_eq!(stamps.discovery(node), dfs.discover_time(node));
        assert_eq!(stamps.finish(node), dfs.finish_time(node));
    }
    Ok(())
}

#[test]
fn test_distance_recorder_seeds_every_root() -> Result<()> {
    init_logging();
    // {0 -> 1 -> 2} and {3 -> 4}
    let graph = DirectedGraph::from_edges(vec![(); 5], [(0, 1, ()), (1, 2, ()), (3, 4, ())])?;

    let mut bfs = BreadthFirstSearch::directed(&graph);
    let forest = DistanceRecorder::new();
    {
        let _scope = bfs.events().attach(&forest);
        bfs.compute(None)?;
    }
    let expected: HashMap<NodeId, usize> = [(0, 0), (1, 1), (2, 2), (3, 0), (4, 1)]
        .into_iter()
        .map(|(node, hops)| (NodeId::new(node), hops))
        .collect();
    assert_eq!(forest.snapshot(), expected);

    let mut dfs = DepthFirstSearch::directed(&graph);
    let single = DistanceRecorder::new();
    let _scope = dfs.events().attach(&single);
    dfs.visit_from(NodeId::new(3))?;
    assert_eq!(single.hops(NodeId::new(3)), Some(0));
    assert_eq!(single.hops(NodeId::new(4)), Some(1));
    assert_eq!(single.hops(NodeId::new(0)), None);
    Ok(())
}

/// Compressed sparse row storage, built once and never mutated.
struct Csr {
    offsets: Vec<usize>,
    targets: Vec<usize>,
}

impl Csr {
    fn new(nodes: usize, edges: &[(usize, usize)]) -> Self {
        let mut sorted = edges.to_vec();
        sorted.sort_unstable();
        let mut offsets = vec![0; nodes + 1];
        for &(source, _) in &sorted {
            offsets[source + 1] += 1;
        }
        for i in 0..nodes {
            offsets[i + 1] += offsets[i];
        }
        Csr {
            offsets,
            targets: sorted.into_iter().map(|(_, target)| target).collect(),
        }
    }

    fn source_of(&self, edge: usize) -> usize {
        self.offsets.partition_point(|&offset| offset <= edge) - 1
    }
}

impl GraphBase for Csr {
    fn node_count(&self) -> usize {
        self.offsets.len() - 1
    }

    fn node_ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.node_count()).map(NodeId::new)
    }
}

impl EdgeEndpoints for Csr {
    fn edge_endpoints(&self, edge: EdgeId) -> Option<(NodeId, NodeId)> {
        let target = *self.targets.get(edge.index())?;
        Some((NodeId::new(self.source_of(edge.index())), NodeId::new(target)))
    }
}

impl OutgoingEdges for Csr {
    fn outgoing_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeId> {
        (self.offsets[node.index()]..self.offsets[node.index() + 1]).map(EdgeId::new)
    }
}

#[test]
fn test_custom_storage_is_searchable() -> Result<()> {
    init_logging();
    let csr = Csr::new(5, &[(0, 1), (0, 2), (1, 3), (2, 3), (3, 4)]);

    let paths = ShortestPath::directed(&csr, |e| (e.index() + 1) as f64).compute(Some(NodeId::new(0)))?;
    assert_eq!(paths.distances().len(), 5);
    // 0 -e0(1)-> 1 -e2(3)-> 3 beats 0 -e1(2)-> 2 -e3(4)-> 3
    assert_eq!(paths.distance(NodeId::new(3)), 4.0);
    assert_eq!(paths.predecessor(NodeId::new(3)).map(|e| e.source), Some(NodeId::new(1)));

    let dominators = pathscope::graph::algorithms::compute_dominators(&csr, NodeId::new(0))?;
    assert_eq!(dominators.immediate_dominator(NodeId::new(3)), Some(NodeId::new(0)));
    assert_eq!(dominators.immediate_dominator(NodeId::new(4)), Some(NodeId::new(3)));
    Ok(())
}
