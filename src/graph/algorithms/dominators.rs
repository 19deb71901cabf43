//! Dominator computation using the Lengauer-Tarjan algorithm.
//!
//! A vertex `d` **dominates** `n` if every path from the root to `n` passes
//! through `d`. The **immediate dominator** of `n` is the unique strict dominator
//! of `n` that every other strict dominator of `n` dominates, and the dominator
//! tree makes it `n`'s parent.
//!
//! # Algorithm
//!
//! 1. **DFS**: a [`DepthFirstSearch`] from the root with a [`TimestampRecorder`]
//!    and a [`PredecessorRecorder`] attached yields discovery timestamps and the
//!    spanning tree.
//! 2. **Semidominators**: vertices are processed by decreasing timestamp. The
//!    semidominator of `w` is the lowest-timestamp vertex among its graph
//!    predecessors `v`, where a predecessor discovered after `w` contributes the
//!    lowest semidominator on its tree path instead of itself. That
//!    ancestor-with-lowest-semidominator query is answered by an eval/link
//!    forest with path compression.
//! 3. **Immediate dominators**: derived from the semidominators, implicitly while
//!    the buckets drain, then explicitly in increasing timestamp order.
//!
//! Total time is O(E log V).
//!
//! Vertices unreachable from the root get no timestamp and appear in no result.

use std::collections::{HashMap, HashSet};

use log::debug;

use crate::{
    graph::{
        algorithms::{
            cancel::{CancellationToken, SearchStatus},
            config::SearchConfig,
            observers::{PredecessorMap, PredecessorRecorder, TimestampRecorder},
            traversal::DepthFirstSearch,
        },
        NodeId, OutgoingEdges,
    },
    Result,
};

/// Result of a dominator computation.
///
/// # Examples
///
/// ```rust
/// use pathscope::graph::{algorithms::compute_dominators, DirectedGraph, NodeId};
///
/// // entry -> a -> b -> exit
/// let graph = DirectedGraph::from_edges(
///     vec!["entry", "a", "b", "exit"],
///     [(0, 1, ()), (1, 2, ()), (2, 3, ())],
/// )?;
/// let (entry, a, b, exit) = (NodeId::new(0), NodeId::new(1), NodeId::new(2), NodeId::new(3));
///
/// let dominators = compute_dominators(&graph, entry)?;
/// assert!(dominators.dominates(entry, exit));
/// assert_eq!(dominators.immediate_dominator(b), Some(a));
/// # Ok::<(), pathscope::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dominators {
    root: NodeId,
    status: SearchStatus,
    timestamps: HashMap<NodeId, usize>,
    order: Vec<NodeId>,
    spanning_tree: PredecessorMap,
    semidominators: HashMap<NodeId, NodeId>,
    idom: HashMap<NodeId, NodeId>,
}

impl Dominators {
    /// Returns the root the computation started from.
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Returns how the computation ended.
    #[must_use]
    pub fn status(&self) -> SearchStatus {
        self.status
    }

    /// Returns `true` if the computation was cancelled.
    ///
    /// A cancelled result keeps the timestamps gathered so far and carries no
    /// semidominators or immediate dominators.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.status.is_cancelled()
    }

    /// Returns the DFS discovery index of `node`; `None` if unreachable.
    #[must_use]
    pub fn timestamp(&self, node: NodeId) -> Option<usize> {
        self.timestamps.get(&node).copied()
    }

    /// Returns the reachable vertices in discovery order.
    #[must_use]
    pub fn reachable(&self) -> &[NodeId] {
        &self.order
    }

    /// Returns the DFS spanning tree as a predecessor map.
    #[must_use]
    pub fn spanning_tree(&self) -> &PredecessorMap {
        &self.spanning_tree
    }

    /// Returns the semidominator of `node`.
    ///
    /// `None` for the root and for unreachable vertices.
    #[must_use]
    pub fn semidominator(&self, node: NodeId) -> Option<NodeId> {
        self.semidominators.get(&node).copied()
    }

    /// Returns every computed semidominator.
    #[must_use]
    pub fn semidominators(&self) -> &HashMap<NodeId, NodeId> {
        &self.semidominators
    }

    /// Returns the immediate dominator of `node`.
    ///
    /// `None` for the root and for unreachable vertices.
    #[must_use]
    pub fn immediate_dominator(&self, node: NodeId) -> Option<NodeId> {
        self.idom.get(&node).copied()
    }

    /// Checks if `a` dominates `b`.
    ///
    /// A reachable vertex dominates itself. Nothing dominates an unreachable one.
    ///
    /// # Complexity
    ///
    /// O(depth) where depth is the depth of `b` in the dominator tree.
    #[must_use]
    pub fn dominates(&self, a: NodeId, b: NodeId) -> bool {
        self.dominators(b).any(|d| d == a)
    }

    /// Checks if `a` dominates `b` and `a != b`.
    #[must_use]
    #[inline]
    pub fn strictly_dominates(&self, a: NodeId, b: NodeId) -> bool {
        a != b && self.dominates(a, b)
    }

    /// Returns the dominators of `node`, from `node` itself up to the root.
    ///
    /// Empty for unreachable vertices.
    pub fn dominators(&self, node: NodeId) -> DominatorIterator<'_> {
        DominatorIterator {
            dominators: self,
            current: self.timestamps.contains_key(&node).then_some(node),
        }
    }

    /// Returns the depth of `node` in the dominator tree; the root has depth 0.
    #[must_use]
    pub fn depth(&self, node: NodeId) -> Option<usize> {
        let count = self.dominators(node).count();
        count.checked_sub(1)
    }

    /// Returns the vertices immediately dominated by `node`, in discovery order.
    #[must_use]
    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.order
            .iter()
            .copied()
            .filter(|&n| self.idom.get(&n) == Some(&node))
            .collect()
    }

    /// Computes the dominance frontier of every reachable vertex.
    ///
    /// The frontier of `n` holds each vertex `m` such that `n` dominates a
    /// predecessor of `m` but does not strictly dominate `m`. `graph` must be the
    /// graph these dominators were computed on.
    ///
    /// # Returns
    ///
    /// A vector where `result[i]` is the frontier of vertex `i`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pathscope::graph::{algorithms::compute_dominators, DirectedGraph, NodeId};
    ///
    /// let graph = DirectedGraph::from_edges(
    ///     vec!["entry", "left", "right", "join"],
    ///     [(0, 1, ()), (0, 2, ()), (1, 3, ()), (2, 3, ())],
    /// )?;
    /// let dominators = compute_dominators(&graph, NodeId::new(0))?;
    /// let frontiers = dominators.dominance_frontiers(&graph);
    ///
    /// assert!(frontiers[1].contains(&NodeId::new(3)));
    /// assert!(frontiers[0].is_empty());
    /// # Ok::<(), pathscope::Error>(())
    /// ```
    #[must_use]
    pub fn dominance_frontiers<G>(&self, graph: &G) -> Vec<HashSet<NodeId>>
    where
        G: OutgoingEdges,
    {
        let mut frontiers = vec![HashSet::new(); graph.node_count()];

        let mut predecessors: HashMap<NodeId, Vec<NodeId>> = HashMap::new();
        for &source in &self.order {
            for edge in graph.outgoing_edges(source) {
                if let Some(target) = graph.edge_target(edge) {
                    if self.timestamps.contains_key(&target) {
                        let preds = predecessors.entry(target).or_default();
                        if !preds.contains(&source) {
                            preds.push(source);
                        }
                    }
                }
            }
        }

        for (&node, preds) in &predecessors {
            if preds.len() < 2 {
                continue;
            }
            let idom_node = self.immediate_dominator(node);
            for &pred in preds {
                let mut runner = Some(pred);
                while let Some(current) = runner {
                    if Some(current) == idom_node {
                        break;
                    }
                    if let Some(frontier) = frontiers.get_mut(current.index()) {
                        frontier.insert(node);
                    }
                    runner = self.immediate_dominator(current);
                }
            }
        }

        frontiers
    }
}

/// Iterator over the dominators of a vertex, from the vertex up to the root.
pub struct DominatorIterator<'a> {
    dominators: &'a Dominators,
    current: Option<NodeId>,
}

impl Iterator for DominatorIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.current?;
        self.current = self.dominators.immediate_dominator(current);
        Some(current)
    }
}

/// Dominator computation with configuration and cancellation.
///
/// ```rust
/// use pathscope::graph::{
///     algorithms::{CancellationToken, DominatorAnalysis},
///     DirectedGraph, NodeId,
/// };
///
/// let graph = DirectedGraph::from_edges(vec![(); 2], [(0, 1, ())])?;
/// let token = CancellationToken::new();
/// let dominators = DominatorAnalysis::new(&graph)
///     .with_cancellation(token)
///     .compute(NodeId::new(0))?;
///
/// assert_eq!(dominators.immediate_dominator(NodeId::new(1)), Some(NodeId::new(0)));
/// # Ok::<(), pathscope::Error>(())
/// ```
pub struct DominatorAnalysis<'g, G> {
    graph: &'g G,
    config: SearchConfig,
    cancellation: Option<CancellationToken>,
}

impl<'g, G: OutgoingEdges> DominatorAnalysis<'g, G> {
    /// Creates an analysis over `graph`.
    #[must_use]
    pub fn new(graph: &'g G) -> Self {
        DominatorAnalysis {
            graph,
            config: SearchConfig::default(),
            cancellation: None,
        }
    }

    /// Replaces the configuration used by the DFS phase.
    #[must_use]
    pub fn with_config(mut self, config: SearchConfig) -> Self {
        self.config = config;
        self
    }

    /// Polls `token` during the DFS and before each vertex of the later phases.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Computes dominators of every vertex reachable from `root`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NodeNotFound`](crate::Error::NodeNotFound) if `root` is
    /// not in the graph.
    pub fn compute(&self, root: NodeId) -> Result<Dominators> {
        debug!(
            "Dominator analysis over {} vertices from {}",
            self.graph.node_count(),
            root
        );

        // Phase 1: DFS timestamps and spanning tree
        let timestamps = TimestampRecorder::new();
        let tree = PredecessorRecorder::new();
        let mut dfs = DepthFirstSearch::directed(self.graph).with_config(self.config);
        if let Some(token) = &self.cancellation {
            dfs = dfs.with_cancellation(token.clone());
        }
        let status = {
            let _stamps = dfs.events().attach(&timestamps);
            let _tree = dfs.events().attach(&tree);
            dfs.compute(Some(root))?
        };

        let stamps = timestamps.take();
        let spanning_tree = tree.take();
        let order = stamps.discovery_order().to_vec();
        let mut result = Dominators {
            root,
            status,
            timestamps: order.iter().enumerate().map(|(i, &n)| (n, i)).collect(),
            order,
            spanning_tree,
            semidominators: HashMap::new(),
            idom: HashMap::new(),
        };
        if status.is_cancelled() {
            debug!("Dominator analysis cancelled during DFS");
            return Ok(result);
        }

        // Phases 2 and 3 run in timestamp space
        let mut lt = LengauerTarjan::new(self.graph, &result);
        if !lt.compute(self.cancellation.as_ref()) {
            result.status = SearchStatus::Cancelled;
            debug!("Dominator analysis cancelled while computing semidominators");
            return Ok(result);
        }

        for w in 1..lt.len() {
            let node = result.order[w];
            result
                .semidominators
                .insert(node, result.order[lt.semi[w]]);
            result.idom.insert(node, result.order[lt.idom[w]]);
        }

        debug!(
            "Dominator analysis finished: {} reachable vertices",
            result.order.len()
        );
        Ok(result)
    }
}

/// Computes dominators of every vertex reachable from `root`.
///
/// # Errors
///
/// Returns [`Error::NodeNotFound`](crate::Error::NodeNotFound) if `root` is not
/// in the graph.
pub fn compute_dominators<G>(graph: &G, root: NodeId) -> Result<Dominators>
where
    G: OutgoingEdges,
{
    DominatorAnalysis::new(graph).compute(root)
}

/// Lengauer-Tarjan state, indexed by timestamp.
struct LengauerTarjan {
    /// Timestamps of each vertex's graph predecessors
    preds: Vec<Vec<usize>>,
    /// Timestamp of each vertex's spanning-tree parent
    parent: Vec<usize>,
    semi: Vec<usize>,
    idom: Vec<usize>,
    /// Eval/link forest
    ancestor: Vec<Option<usize>>,
    /// Vertex with the lowest semidominator on the compressed path
    label: Vec<usize>,
    bucket: Vec<Vec<usize>>,
}

impl LengauerTarjan {
    fn new<G: OutgoingEdges>(graph: &G, dfs: &Dominators) -> Self {
        let n = dfs.order.len();

        let mut preds = vec![Vec::new(); n];
        for (v, &source) in dfs.order.iter().enumerate() {
            for edge in graph.outgoing_edges(source) {
                if let Some(&w) = graph
                    .edge_target(edge)
                    .and_then(|target| dfs.timestamps.get(&target))
                {
                    preds[w].push(v);
                }
            }
        }

        let parent = dfs
            .order
            .iter()
            .map(|&node| {
                dfs.spanning_tree
                    .get(node)
                    .and_then(|edge| dfs.timestamps.get(&edge.source).copied())
                    .unwrap_or(0)
            })
            .collect();

        LengauerTarjan {
            preds,
            parent,
            semi: (0..n).collect(),
            idom: vec![0; n],
            ancestor: vec![None; n],
            label: (0..n).collect(),
            bucket: vec![Vec::new(); n],
        }
    }

    fn len(&self) -> usize {
        self.semi.len()
    }

    /// Runs phases 2 to 4. Returns `false` if cancelled.
    fn compute(&mut self, cancellation: Option<&CancellationToken>) -> bool {
        let cancelled = || cancellation.is_some_and(CancellationToken::is_cancelled);

        for w in (1..self.len()).rev() {
            if cancelled() {
                return false;
            }

            for i in 0..self.preds[w].len() {
                let u = self.eval(self.preds[w][i]);
                if self.semi[u] < self.semi[w] {
                    self.semi[w] = self.semi[u];
                }
            }

            let parent = self.parent[w];
            self.bucket[self.semi[w]].push(w);
            self.ancestor[w] = Some(parent);

            for v in std::mem::take(&mut self.bucket[parent]) {
                let u = self.eval(v);
                self.idom[v] = if self.semi[u] < self.semi[v] { u } else { parent };
            }
        }

        for w in 1..self.len() {
            if cancelled() {
                return false;
            }
            if self.idom[w] != self.semi[w] {
                self.idom[w] = self.idom[self.idom[w]];
            }
        }
        true
    }

    fn eval(&mut self, v: usize) -> usize {
        if self.ancestor[v].is_none() {
            return v;
        }
        self.compress(v);
        self.label[v]
    }

    fn compress(&mut self, v: usize) {
        let mut path = Vec::new();
        let mut current = v;
        while let Some(ancestor) = self.ancestor[current] {
            if self.ancestor[ancestor].is_none() {
                break;
            }
            path.push(current);
            current = ancestor;
        }

        for &node in path.iter().rev() {
            let Some(ancestor) = self.ancestor[node] else {
                continue;
            };
            if self.semi[self.label[ancestor]] < self.semi[self.label[node]] {
                self.label[node] = self.label[ancestor];
            }
            self.ancestor[node] = self.ancestor[ancestor];
        }
    }
}
