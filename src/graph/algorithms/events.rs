//! Traversal events and the bus that delivers them.
//!
//! Every algorithm in this module owns an [`EventBus`]. The traversal engine fires
//! a [`TraversalEvent`] at each step of the walk and the bus invokes the handlers
//! registered for that event's [`EventKind`], synchronously and in registration
//! order. Handlers run to completion before the traversal continues.
//!
//! # Scoped subscriptions
//!
//! Subscribing returns an [`ObserverScope`]. Dropping the scope unregisters exactly
//! the handlers it registered, leaving every other subscription in place, so a
//! scope tied to a block is released on every exit path including `?` and panics.
//!
//! ```rust
//! use std::{cell::Cell, rc::Rc};
//! use pathscope::graph::{
//!     algorithms::{BreadthFirstSearch, EventKind},
//!     DirectedGraph,
//! };
//!
//! let graph = DirectedGraph::from_edges(vec![(); 3], [(0, 1, ()), (1, 2, ())])?;
//! let mut bfs = BreadthFirstSearch::directed(&graph);
//!
//! let discovered = Rc::new(Cell::new(0));
//! {
//!     let counter = Rc::clone(&discovered);
//!     let _scope = bfs.events().on(EventKind::DiscoverVertex, move |_| {
//!         counter.set(counter.get() + 1);
//!     });
//!     bfs.compute(None)?;
//! }
//! assert_eq!(discovered.get(), 3);
//! assert!(!bfs.events().has_subscribers(EventKind::DiscoverVertex));
//! # Ok::<(), pathscope::Error>(())
//! ```
//!
//! # Observers
//!
//! Reusable subscribers implement [`Observer`] and register any number of handlers
//! through a [`Registrar`]; [`EventBus::attach`] wraps all of them in one scope.

use std::{
    cell::{Cell, RefCell},
    rc::{Rc, Weak},
};

use strum::{Display, EnumCount, EnumIter};

use crate::graph::{NodeId, TraversedEdge};

/// An event fired by a traversal.
///
/// Vertex events carry the vertex, edge events carry the edge in the orientation
/// the traversal walked it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraversalEvent {
    /// Fired once per vertex by `initialize`, before any root is started
    InitializeVertex(NodeId),
    /// Fired for each root chosen by a whole-graph computation
    StartVertex(NodeId),
    /// A vertex turned `InProgress`
    DiscoverVertex(NodeId),
    /// A vertex was taken off the frontier and its edges are about to be examined
    ExamineVertex(NodeId),
    /// A vertex turned `Finished`
    FinishVertex(NodeId),
    /// An edge is about to be classified
    ExamineEdge(TraversedEdge),
    /// The edge discovered its target, or improved its target's distance
    TreeEdge(TraversedEdge),
    /// DFS: the target is an ancestor still on the stack
    BackEdge(TraversedEdge),
    /// DFS: the target is a finished descendant of the source
    ForwardEdge(TraversedEdge),
    /// DFS: the target is finished and not a descendant of the source
    CrossEdge(TraversedEdge),
    /// BFS: the target is `InProgress` (still queued)
    GrayTarget(TraversedEdge),
    /// BFS: the target is `Finished`
    BlackTarget(TraversedEdge),
    /// Shortest path: the candidate distance through this edge was not better
    EdgeNotRelaxed(TraversedEdge),
}

/// Fieldless tag of a [`TraversalEvent`], used to subscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumCount, EnumIter)]
pub enum EventKind {
    /// See [`TraversalEvent::InitializeVertex`]
    InitializeVertex,
    /// See [`TraversalEvent::StartVertex`]
    StartVertex,
    /// See [`TraversalEvent::DiscoverVertex`]
    DiscoverVertex,
    /// See [`TraversalEvent::ExamineVertex`]
    ExamineVertex,
    /// See [`TraversalEvent::FinishVertex`]
    FinishVertex,
    /// See [`TraversalEvent::ExamineEdge`]
    ExamineEdge,
    /// See [`TraversalEvent::TreeEdge`]
    TreeEdge,
    /// See [`TraversalEvent::BackEdge`]
    BackEdge,
    /// See [`TraversalEvent::ForwardEdge`]
    ForwardEdge,
    /// See [`TraversalEvent::CrossEdge`]
    CrossEdge,
    /// See [`TraversalEvent::GrayTarget`]
    GrayTarget,
    /// See [`TraversalEvent::BlackTarget`]
    BlackTarget,
    /// See [`TraversalEvent::EdgeNotRelaxed`]
    EdgeNotRelaxed,
}

impl TraversalEvent {
    /// Returns the tag handlers subscribe with.
    #[must_use]
    pub const fn kind(&self) -> EventKind {
        match self {
            TraversalEvent::InitializeVertex(_) => EventKind::InitializeVertex,
            TraversalEvent::StartVertex(_) => EventKind::StartVertex,
            TraversalEvent::DiscoverVertex(_) => EventKind::DiscoverVertex,
            TraversalEvent::ExamineVertex(_) => EventKind::ExamineVertex,
            TraversalEvent::FinishVertex(_) => EventKind::FinishVertex,
            TraversalEvent::ExamineEdge(_) => EventKind::ExamineEdge,
            TraversalEvent::TreeEdge(_) => EventKind::TreeEdge,
            TraversalEvent::BackEdge(_) => EventKind::BackEdge,
            TraversalEvent::ForwardEdge(_) => EventKind::ForwardEdge,
            TraversalEvent::CrossEdge(_) => EventKind::CrossEdge,
            TraversalEvent::GrayTarget(_) => EventKind::GrayTarget,
            TraversalEvent::BlackTarget(_) => EventKind::BlackTarget,
            TraversalEvent::EdgeNotRelaxed(_) => EventKind::EdgeNotRelaxed,
        }
    }

    /// Returns the vertex of a vertex event.
    #[must_use]
    pub const fn vertex(&self) -> Option<NodeId> {
        match *self {
            TraversalEvent::InitializeVertex(node)
            | TraversalEvent::StartVertex(node)
            | TraversalEvent::DiscoverVertex(node)
            | TraversalEvent::ExamineVertex(node)
            | TraversalEvent::FinishVertex(node) => Some(node),
            _ => None,
        }
    }

    /// Returns the edge of an edge event.
    #[must_use]
    pub const fn edge(&self) -> Option<TraversedEdge> {
        match *self {
            TraversalEvent::ExamineEdge(edge)
            | TraversalEvent::TreeEdge(edge)
            | TraversalEvent::BackEdge(edge)
            | TraversalEvent::ForwardEdge(edge)
            | TraversalEvent::CrossEdge(edge)
            | TraversalEvent::GrayTarget(edge)
            | TraversalEvent::BlackTarget(edge)
            | TraversalEvent::EdgeNotRelaxed(edge) => Some(edge),
            _ => None,
        }
    }
}

type Handler = Rc<RefCell<dyn FnMut(&TraversalEvent)>>;

struct Subscription {
    id: u64,
    handler: Handler,
}

struct BusInner {
    handlers: [RefCell<Vec<Subscription>>; EventKind::COUNT],
    next_id: Cell<u64>,
}

impl BusInner {
    fn subscribe(&self, kind: EventKind, handler: Handler) -> u64 {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.handlers[kind as usize]
            .borrow_mut()
            .push(Subscription { id, handler });
        id
    }

    fn unsubscribe(&self, kind: EventKind, id: u64) {
        let mut list = self.handlers[kind as usize].borrow_mut();
        if let Some(position) = list.iter().position(|s| s.id == id) {
            list.remove(position);
        }
    }
}

/// Per-algorithm handler registry.
///
/// The bus is single-threaded: handlers are `FnMut` closures invoked on the thread
/// running the algorithm. Handlers may subscribe or release scopes while an event
/// is being delivered; handlers added to the kind being delivered also see the
/// current event.
pub struct EventBus {
    inner: Rc<BusInner>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let subscribed: usize = self.inner.handlers.iter().map(|l| l.borrow().len()).sum();
        f.debug_struct("EventBus")
            .field("subscriptions", &subscribed)
            .finish()
    }
}

impl EventBus {
    /// Creates a bus with no subscriptions.
    #[must_use]
    pub fn new() -> Self {
        EventBus {
            inner: Rc::new(BusInner {
                handlers: std::array::from_fn(|_| RefCell::new(Vec::new())),
                next_id: Cell::new(0),
            }),
        }
    }

    /// Registers `handler` for events of `kind`.
    ///
    /// # Returns
    ///
    /// The scope owning the subscription. Dropping it unsubscribes.
    pub fn on<F>(&self, kind: EventKind, handler: F) -> ObserverScope
    where
        F: FnMut(&TraversalEvent) + 'static,
    {
        let id = self.inner.subscribe(kind, Rc::new(RefCell::new(handler)));
        ObserverScope {
            bus: Rc::downgrade(&self.inner),
            subscriptions: vec![(kind, id)],
        }
    }

    /// Registers every handler of `observer` under one scope.
    ///
    /// Attaching the same observer twice registers its handlers twice; each scope
    /// releases only its own copy.
    pub fn attach<O>(&self, observer: &O) -> ObserverScope
    where
        O: Observer + ?Sized,
    {
        let mut registrar = Registrar {
            bus: &self.inner,
            subscriptions: Vec::new(),
        };
        observer.register(&mut registrar);
        ObserverScope {
            bus: Rc::downgrade(&self.inner),
            subscriptions: registrar.subscriptions,
        }
    }

    /// Returns `true` if at least one handler listens for `kind`.
    #[must_use]
    pub fn has_subscribers(&self, kind: EventKind) -> bool {
        !self.inner.handlers[kind as usize].borrow().is_empty()
    }

    /// Returns the number of handlers listening for `kind`.
    #[must_use]
    pub fn subscriber_count(&self, kind: EventKind) -> usize {
        self.inner.handlers[kind as usize].borrow().len()
    }

    /// Delivers `event` to every handler registered for its kind.
    ///
    /// A kind without subscribers costs one emptiness check. A handler that fires
    /// an event it is itself subscribed to does not see the nested delivery.
    pub fn fire(&self, event: &TraversalEvent) {
        let list = &self.inner.handlers[event.kind() as usize];
        if list.borrow().is_empty() {
            return;
        }

        // Subscriptions are kept in ascending id order, so resuming after the last
        // delivered id stays correct when handlers unsubscribe mid-delivery.
        let mut delivered: Option<u64> = None;
        loop {
            let next = {
                let list = list.borrow();
                let start = delivered.map_or(0, |last| list.partition_point(|s| s.id <= last));
                list.get(start).map(|s| (s.id, Rc::clone(&s.handler)))
            };
            let Some((id, handler)) = next else {
                break;
            };
            delivered = Some(id);
            if let Ok(mut handler) = handler.try_borrow_mut() {
                (&mut *handler)(event);
            };
        }
    }
}

/// Handle given to [`Observer::register`].
pub struct Registrar<'bus> {
    bus: &'bus Rc<BusInner>,
    subscriptions: Vec<(EventKind, u64)>,
}

impl Registrar<'_> {
    /// Registers `handler` for events of `kind` as part of the observer's scope.
    pub fn on<F>(&mut self, kind: EventKind, handler: F)
    where
        F: FnMut(&TraversalEvent) + 'static,
    {
        let id = self.bus.subscribe(kind, Rc::new(RefCell::new(handler)));
        self.subscriptions.push((kind, id));
    }
}

/// A reusable event subscriber.
///
/// Observers keep their state behind shared ownership (typically
/// `Rc<RefCell<_>>`) and move clones of it into the handlers they register, so
/// the state stays readable after the scope is released.
pub trait Observer {
    /// Registers this observer's handlers.
    fn register(&self, registrar: &mut Registrar<'_>);
}

/// Guard for a group of subscriptions.
///
/// Unsubscribes exactly its own handlers when dropped. Outliving the bus is
/// harmless; the drop is then a no-op.
#[must_use = "dropping the scope immediately unsubscribes its handlers"]
pub struct ObserverScope {
    bus: Weak<BusInner>,
    subscriptions: Vec<(EventKind, u64)>,
}

impl ObserverScope {
    /// Returns the number of handlers this scope owns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    /// Returns `true` if the scope owns no handlers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    /// Unsubscribes now instead of at the end of the enclosing block.
    pub fn detach(self) {
        drop(self);
    }
}

impl std::fmt::Debug for ObserverScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObserverScope")
            .field("subscriptions", &self.subscriptions)
            .finish()
    }
}

impl Drop for ObserverScope {
    fn drop(&mut self) {
        if let Some(bus) = self.bus.upgrade() {
            for &(kind, id) in &self.subscriptions {
                bus.unsubscribe(kind, id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::EdgeId;
    use strum::IntoEnumIterator;

    fn recorder(
        bus: &EventBus,
        kind: EventKind,
        log: &Rc<RefCell<Vec<String>>>,
        tag: &'static str,
    ) -> ObserverScope {
        let log = Rc::clone(log);
        bus.on(kind, move |event| {
            log.borrow_mut().push(format!("{tag}:{:?}", event.kind()));
        })
    }

    #[test]
    fn test_event_kind_matches_variant() {
        let node = NodeId::new(1);
        let edge = TraversedEdge::new(EdgeId::new(0), NodeId::new(0), node);

        assert_eq!(TraversalEvent::DiscoverVertex(node).kind(), EventKind::DiscoverVertex);
        assert_eq!(TraversalEvent::EdgeNotRelaxed(edge).kind(), EventKind::EdgeNotRelaxed);
        assert_eq!(TraversalEvent::FinishVertex(node).vertex(), Some(node));
        assert_eq!(TraversalEvent::FinishVertex(node).edge(), None);
        assert_eq!(TraversalEvent::BackEdge(edge).edge(), Some(edge));
        assert_eq!(EventKind::iter().count(), EventKind::COUNT);
        assert_eq!(EventKind::GrayTarget.to_string(), "GrayTarget");
    }

    #[test]
    fn test_fire_without_subscribers_is_noop() {
        let bus = EventBus::new();
        bus.fire(&TraversalEvent::StartVertex(NodeId::new(0)));
        for kind in EventKind::iter() {
            assert!(!bus.has_subscribers(kind));
        }
    }

    #[test]
    fn test_handlers_run_in_registration_order() {
        let bus = EventBus::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let _first = recorder(&bus, EventKind::DiscoverVertex, &log, "first");
        let _second = recorder(&bus, EventKind::DiscoverVertex, &log, "second");
        let _other = recorder(&bus, EventKind::FinishVertex, &log, "other");

        bus.fire(&TraversalEvent::DiscoverVertex(NodeId::new(0)));
        assert_eq!(
            *log.borrow(),
            vec!["first:DiscoverVertex", "second:DiscoverVertex"]
        );
    }

    #[test]
    fn test_scope_drop_removes_only_its_handlers() {
        let bus = EventBus::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let keep = recorder(&bus, EventKind::TreeEdge, &log, "keep");
        {
            let _inner = recorder(&bus, EventKind::TreeEdge, &log, "inner");
            assert_eq!(bus.subscriber_count(EventKind::TreeEdge), 2);
        }
        assert_eq!(bus.subscriber_count(EventKind::TreeEdge), 1);

        let edge = TraversedEdge::new(EdgeId::new(0), NodeId::new(0), NodeId::new(1));
        bus.fire(&TraversalEvent::TreeEdge(edge));
        assert_eq!(*log.borrow(), vec!["keep:TreeEdge"]);

        keep.detach();
        assert!(!bus.has_subscribers(EventKind::TreeEdge));
    }

    struct Counter {
        count: Rc<Cell<usize>>,
    }

    impl Observer for Counter {
        fn register(&self, registrar: &mut Registrar<'_>) {
            for kind in [EventKind::DiscoverVertex, EventKind::FinishVertex] {
                let count = Rc::clone(&self.count);
                registrar.on(kind, move |_| count.set(count.get() + 1));
            }
        }
    }

    #[test]
    fn test_attach_same_observer_twice_detaches_symmetrically() {
        let bus = EventBus::new();
        let observer = Counter {
            count: Rc::new(Cell::new(0)),
        };

        let first = bus.attach(&observer);
        let second = bus.attach(&observer);
        assert_eq!(first.len(), 2);
        assert_eq!(bus.subscriber_count(EventKind::DiscoverVertex), 2);

        bus.fire(&TraversalEvent::DiscoverVertex(NodeId::new(0)));
        assert_eq!(observer.count.get(), 2);

        drop(first);
        bus.fire(&TraversalEvent::FinishVertex(NodeId::new(0)));
        assert_eq!(observer.count.get(), 3);

        drop(second);
        assert!(!bus.has_subscribers(EventKind::DiscoverVertex));
        assert!(!bus.has_subscribers(EventKind::FinishVertex));
    }

    #[test]
    fn test_scope_outliving_bus() {
        let scope = {
            let bus = EventBus::new();
            bus.on(EventKind::StartVertex, |_| {})
        };
        drop(scope);
    }

    #[test]
    fn test_handler_may_detach_during_dispatch() {
        let bus = EventBus::new();
        let slot: Rc<RefCell<Option<ObserverScope>>> = Rc::new(RefCell::new(None));
        let calls = Rc::new(Cell::new(0));

        let inner_slot = Rc::clone(&slot);
        let inner_calls = Rc::clone(&calls);
        let scope = bus.on(EventKind::ExamineVertex, move |_| {
            inner_calls.set(inner_calls.get() + 1);
            inner_slot.borrow_mut().take();
        });
        *slot.borrow_mut() = Some(scope);

        bus.fire(&TraversalEvent::ExamineVertex(NodeId::new(0)));
        bus.fire(&TraversalEvent::ExamineVertex(NodeId::new(0)));
        assert_eq!(calls.get(), 1);
        assert!(!bus.has_subscribers(EventKind::ExamineVertex));
    }

    #[test]
    fn test_detach_during_dispatch_keeps_later_handlers() {
        let bus = EventBus::new();
        let slot: Rc<RefCell<Option<ObserverScope>>> = Rc::new(RefCell::new(None));
        let second_calls = Rc::new(Cell::new(0));

        let inner_slot = Rc::clone(&slot);
        let first = bus.on(EventKind::ExamineVertex, move |_| {
            inner_slot.borrow_mut().take();
        });
        *slot.borrow_mut() = Some(first);

        let counter = Rc::clone(&second_calls);
        let _second = bus.on(EventKind::ExamineVertex, move |_| {
            counter.set(counter.get() + 1);
        });

        bus.fire(&TraversalEvent::ExamineVertex(NodeId::new(0)));
        assert_eq!(second_calls.get(), 1);
        assert_eq!(bus.subscriber_count(EventKind::ExamineVertex), 1);

        bus.fire(&TraversalEvent::ExamineVertex(NodeId::new(1)));
        assert_eq!(second_calls.get(), 2);
    }

    #[test]
    fn test_detach_of_earlier_scope_during_dispatch() {
        let bus = EventBus::new();
        let calls = Rc::new(RefCell::new(Vec::new()));

        let log = Rc::clone(&calls);
        let first = bus.on(EventKind::FinishVertex, move |_| log.borrow_mut().push(0));
        let slot = Rc::new(RefCell::new(Some(first)));

        let (log, inner_slot) = (Rc::clone(&calls), Rc::clone(&slot));
        let _second = bus.on(EventKind::FinishVertex, move |_| {
            log.borrow_mut().push(1);
            inner_slot.borrow_mut().take();
        });
        let log = Rc::clone(&calls);
        let _third = bus.on(EventKind::FinishVertex, move |_| log.borrow_mut().push(2));

        bus.fire(&TraversalEvent::FinishVertex(NodeId::new(0)));
        bus.fire(&TraversalEvent::FinishVertex(NodeId::new(0)));
        assert_eq!(*calls.borrow(), vec![0, 1, 2, 1, 2]);
    }
}
