//! Stock observers.
//!
//! Each observer keeps its state behind an `Rc<RefCell<_>>` shared with the
//! handlers it registers, so results remain readable through the observer after
//! its [`ObserverScope`](super::ObserverScope) is released.

use std::{
    cell::RefCell,
    collections::{hash_map, HashMap},
    rc::Rc,
};

use log::warn;

use crate::graph::{
    algorithms::events::{EventKind, Observer, Registrar, TraversalEvent},
    NodeId, TraversedEdge,
};

/// Vertex to the tree edge that discovered it, or that last improved its distance.
///
/// Roots and unreached vertices have no entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PredecessorMap {
    edges: HashMap<NodeId, TraversedEdge>,
}

impl PredecessorMap {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `edge` as the predecessor of its target, replacing any earlier one.
    pub fn insert(&mut self, edge: TraversedEdge) {
        self.edges.insert(edge.target, edge);
    }

    /// Returns the predecessor edge of `node`.
    #[must_use]
    pub fn get(&self, node: NodeId) -> Option<TraversedEdge> {
        self.edges.get(&node).copied()
    }

    /// Returns `true` if `node` has a predecessor.
    #[must_use]
    pub fn contains(&self, node: NodeId) -> bool {
        self.edges.contains_key(&node)
    }

    /// Returns the number of vertices with a predecessor.
    #[must_use]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Returns `true` if no predecessor is recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Iterates over `(vertex, predecessor edge)` pairs in unspecified order.
    pub fn iter(&self) -> hash_map::Iter<'_, NodeId, TraversedEdge> {
        self.edges.iter()
    }

    /// Walks predecessors from `node` back to the root of its tree.
    ///
    /// # Returns
    ///
    /// The edges from the root to `node`, root first. `None` if `node` has no
    /// predecessor (it is a root or was never reached), or if the walk takes
    /// more steps than there are recorded edges, which means the map contains a
    /// cycle.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pathscope::graph::{algorithms::PredecessorMap, EdgeId, NodeId, TraversedEdge};
    ///
    /// let (a, b, c) = (NodeId::new(0), NodeId::new(1), NodeId::new(2));
    /// let mut map = PredecessorMap::new();
    /// map.insert(TraversedEdge::new(EdgeId::new(0), a, b));
    /// map.insert(TraversedEdge::new(EdgeId::new(1), b, c));
    ///
    /// let path = map.try_get_path(c).unwrap();
    /// assert_eq!(path.first().map(|e| e.source), Some(a));
    /// assert!(map.try_get_path(a).is_none());
    /// ```
    #[must_use]
    pub fn try_get_path(&self, node: NodeId) -> Option<Vec<TraversedEdge>> {
        let bound = self.edges.len();
        let mut path = Vec::new();
        let mut current = node;

        while let Some(&edge) = self.edges.get(&current) {
            if path.len() == bound {
                warn!("Predecessor chain from {node} exceeds {bound} edges, giving up");
                return None;
            }
            path.push(edge);
            current = edge.source;
        }

        if path.is_empty() {
            return None;
        }
        path.reverse();
        Some(path)
    }

    /// Returns the root of the tree containing `node`, or `node` itself if it has
    /// no predecessor. `None` if the chain is cyclic.
    #[must_use]
    pub fn root_of(&self, node: NodeId) -> Option<NodeId> {
        match self.try_get_path(node) {
            Some(path) => path.first().map(|edge| edge.source),
            None if !self.contains(node) => Some(node),
            None => None,
        }
    }
}

/// Records tree edges into a [`PredecessorMap`].
#[derive(Debug, Clone, Default)]
pub struct PredecessorRecorder {
    map: Rc<RefCell<PredecessorMap>>,
}

impl PredecessorRecorder {
    /// Creates a recorder with an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the map recorded so far.
    #[must_use]
    pub fn snapshot(&self) -> PredecessorMap {
        self.map.borrow().clone()
    }

    /// Moves the recorded map out, leaving the recorder empty.
    #[must_use]
    pub fn take(&self) -> PredecessorMap {
        std::mem::take(&mut *self.map.borrow_mut())
    }
}

impl Observer for PredecessorRecorder {
    fn register(&self, registrar: &mut Registrar<'_>) {
        let map = Rc::clone(&self.map);
        registrar.on(EventKind::TreeEdge, move |event| {
            if let TraversalEvent::TreeEdge(edge) = *event {
                map.borrow_mut().insert(edge);
            }
        });
    }
}

/// Records the number of tree edges between each vertex and its root.
///
/// A tree edge gives its target one more than its source. Tree edges fire before
/// their target is discovered, so only roots get 0 on discovery, including roots
/// of `visit_from` which fire no `StartVertex`.
#[derive(Debug, Clone, Default)]
pub struct DistanceRecorder {
    hops: Rc<RefCell<HashMap<NodeId, usize>>>,
}

impl DistanceRecorder {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the hop count of `node`, if it was reached.
    #[must_use]
    pub fn hops(&self, node: NodeId) -> Option<usize> {
        self.hops.borrow().get(&node).copied()
    }

    /// Returns a copy of every recorded hop count.
    #[must_use]
    pub fn snapshot(&self) -> HashMap<NodeId, usize> {
        self.hops.borrow().clone()
    }
}

impl Observer for DistanceRecorder {
    fn register(&self, registrar: &mut Registrar<'_>) {
        let hops = Rc::clone(&self.hops);
        registrar.on(EventKind::TreeEdge, move |event| {
            if let TraversalEvent::TreeEdge(edge) = *event {
                let mut hops = hops.borrow_mut();
                let base = hops.get(&edge.source).copied().unwrap_or(0);
                hops.insert(edge.target, base + 1);
            }
        });

        let hops = Rc::clone(&self.hops);
        registrar.on(EventKind::DiscoverVertex, move |event| {
            if let TraversalEvent::DiscoverVertex(node) = *event {
                hops.borrow_mut().entry(node).or_insert(0);
            }
        });
    }
}

/// Discovery (pre-order) and finish (post-order) indices of a traversal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Timestamps {
    discovered: HashMap<NodeId, usize>,
    finished: HashMap<NodeId, usize>,
    discovery_order: Vec<NodeId>,
}

impl Timestamps {
    /// Returns the pre-order index of `node`.
    #[must_use]
    pub fn discovery(&self, node: NodeId) -> Option<usize> {
        self.discovered.get(&node).copied()
    }

    /// Returns the post-order index of `node`.
    #[must_use]
    pub fn finish(&self, node: NodeId) -> Option<usize> {
        self.finished.get(&node).copied()
    }

    /// Returns the discovered vertices in discovery order.
    #[must_use]
    pub fn discovery_order(&self) -> &[NodeId] {
        &self.discovery_order
    }

    /// Returns the number of discovered vertices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.discovery_order.len()
    }

    /// Returns `true` if nothing was discovered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.discovery_order.is_empty()
    }
}

/// Records [`Timestamps`] from `DiscoverVertex` and `FinishVertex`.
#[derive(Debug, Clone, Default)]
pub struct TimestampRecorder {
    stamps: Rc<RefCell<Timestamps>>,
}

impl TimestampRecorder {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the timestamps recorded so far.
    #[must_use]
    pub fn snapshot(&self) -> Timestamps {
        self.stamps.borrow().clone()
    }

    /// Moves the recorded timestamps out, leaving the recorder empty.
    #[must_use]
    pub fn take(&self) -> Timestamps {
        std::mem::take(&mut *self.stamps.borrow_mut())
    }
}

impl Observer for TimestampRecorder {
    fn register(&self, registrar: &mut Registrar<'_>) {
        let stamps = Rc::clone(&self.stamps);
        registrar.on(EventKind::DiscoverVertex, move |event| {
            if let TraversalEvent::DiscoverVertex(node) = *event {
                let mut stamps = stamps.borrow_mut();
                let index = stamps.discovery_order.len();
                stamps.discovered.insert(node, index);
                stamps.discovery_order.push(node);
            }
        });

        let stamps = Rc::clone(&self.stamps);
        registrar.on(EventKind::FinishVertex, move |event| {
            if let TraversalEvent::FinishVertex(node) = *event {
                let mut stamps = stamps.borrow_mut();
                let index = stamps.finished.len();
                stamps.finished.insert(node, index);
            }
        });
    }
}
