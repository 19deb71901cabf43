//! Indexed binary heap with decrease-key.
//!
//! Entries are vertices keyed by their current distance. A position index maps
//! each queued vertex to its slot, so a key can be changed in place and the
//! entry sifted from where it sits instead of being pushed a second time.
//! Priority is defined by a [`DistanceRelaxer`]: the top is the entry no other
//! entry is better than.

use crate::graph::{algorithms::relaxer::DistanceRelaxer, NodeId};

/// Binary heap of `(vertex, distance)` entries ordered by a relaxer.
///
/// # Examples
///
/// ```rust
/// use pathscope::graph::{algorithms::{IndexedHeap, ShortestDistance}, NodeId};
///
/// let mut heap = IndexedHeap::new(ShortestDistance, 3);
/// heap.push(NodeId::new(0), 5.0);
/// heap.push(NodeId::new(1), 3.0);
/// heap.update(NodeId::new(0), 1.0);
///
/// assert!(heap.top_is_best());
/// assert_eq!(heap.pop(), Some((NodeId::new(0), 1.0)));
/// assert_eq!(heap.pop(), Some((NodeId::new(1), 3.0)));
/// ```
#[derive(Debug, Clone)]
pub struct IndexedHeap<R> {
    relaxer: R,
    entries: Vec<(NodeId, f64)>,
    positions: Vec<Option<usize>>,
}

impl<R: DistanceRelaxer> IndexedHeap<R> {
    /// Creates an empty heap for vertices `0..node_count`.
    #[must_use]
    pub fn new(relaxer: R, node_count: usize) -> Self {
        IndexedHeap {
            relaxer,
            entries: Vec::new(),
            positions: vec![None; node_count],
        }
    }

    /// Returns the number of queued vertices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns `true` if `node` is queued.
    #[must_use]
    pub fn contains(&self, node: NodeId) -> bool {
        self.positions.get(node.index()).is_some_and(Option::is_some)
    }

    /// Returns the queued key of `node`.
    #[must_use]
    pub fn key(&self, node: NodeId) -> Option<f64> {
        let slot = (*self.positions.get(node.index())?)?;
        Some(self.entries[slot].1)
    }

    /// Returns the top entry without removing it.
    #[must_use]
    pub fn peek(&self) -> Option<(NodeId, f64)> {
        self.entries.first().copied()
    }

    /// Queues `node` with `key`, or changes its key if already queued.
    pub fn push(&mut self, node: NodeId, key: f64) {
        if node.index() >= self.positions.len() {
            self.positions.resize(node.index() + 1, None);
        }
        if self.update(node, key) {
            return;
        }
        let slot = self.entries.len();
        self.entries.push((node, key));
        self.positions[node.index()] = Some(slot);
        self.sift_up(slot);
    }

    /// Removes and returns the top entry.
    pub fn pop(&mut self) -> Option<(NodeId, f64)> {
        if self.entries.is_empty() {
            return None;
        }
        let last = self.entries.len() - 1;
        self.swap(0, last);
        let top = self.entries.pop()?;
        self.positions[top.0.index()] = None;
        if !self.entries.is_empty() {
            self.sift_down(0);
        }
        Some(top)
    }

    /// Changes the key of a queued vertex and restores heap order from its slot.
    ///
    /// Returns `false` if `node` is not queued.
    pub fn update(&mut self, node: NodeId, key: f64) -> bool {
        let Some(slot) = self.positions.get(node.index()).copied().flatten() else {
            return false;
        };
        self.entries[slot].1 = key;
        let slot = self.sift_up(slot);
        self.sift_down(slot);
        true
    }

    /// Returns `true` if no queued entry is better than the top.
    ///
    /// Linear in the number of entries.
    #[must_use]
    pub fn top_is_best(&self) -> bool {
        let Some(&(_, top)) = self.entries.first() else {
            return true;
        };
        self.entries
            .iter()
            .all(|&(_, key)| !self.relaxer.is_better(key, top))
    }

    /// Returns `true` if no entry is better than its parent.
    #[must_use]
    pub fn is_ordered(&self) -> bool {
        (1..self.entries.len()).all(|i| {
            let parent = (i - 1) / 2;
            !self.relaxer.is_better(self.entries[i].1, self.entries[parent].1)
        })
    }

    fn swap(&mut self, a: usize, b: usize) {
        self.entries.swap(a, b);
        self.positions[self.entries[a].0.index()] = Some(a);
        self.positions[self.entries[b].0.index()] = Some(b);
    }

    fn sift_up(&mut self, mut slot: usize) -> usize {
        while slot > 0 {
            let parent = (slot - 1) / 2;
            if !self
                .relaxer
                .is_better(self.entries[slot].1, self.entries[parent].1)
            {
                break;
            }
            self.swap(slot, parent);
            slot = parent;
        }
        slot
    }

    fn sift_down(&mut self, mut slot: usize) {
        let len = self.entries.len();
        loop {
            let left = 2 * slot + 1;
            let right = left + 1;
            let mut best = slot;
            if left < len && self.relaxer.is_better(self.entries[left].1, self.entries[best].1) {
                best = left;
            }
            if right < len && self.relaxer.is_better(self.entries[right].1, self.entries[best].1)
            {
                best = right;
            }
            if best == slot {
                break;
            }
            self.swap(slot, best);
            slot = best;
        }
    }
}
