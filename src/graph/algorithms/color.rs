//! Per-vertex traversal state.

use strum::Display;

use crate::graph::NodeId;

/// Traversal state of a vertex.
///
/// A vertex moves `Unvisited -> InProgress -> Finished` exactly once per
/// computation and never moves back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Default)]
pub enum Color {
    /// Not yet discovered
    #[default]
    Unvisited,
    /// Discovered; still on the frontier or on the DFS stack
    InProgress,
    /// All edges examined
    Finished,
}

/// Dense color storage indexed by [`NodeId`].
#[derive(Debug, Clone)]
pub struct ColorMap {
    colors: Vec<Color>,
}

impl ColorMap {
    /// Creates a map with every vertex `Unvisited`.
    #[must_use]
    pub fn new(node_count: usize) -> Self {
        ColorMap {
            colors: vec![Color::Unvisited; node_count],
        }
    }

    /// Returns the color of `node`. Unknown vertices read as `Unvisited`.
    #[must_use]
    #[inline]
    pub fn get(&self, node: NodeId) -> Color {
        self.colors
            .get(node.index())
            .copied()
            .unwrap_or(Color::Unvisited)
    }

    /// Advances `node` to `color`.
    #[inline]
    pub(crate) fn set(&mut self, node: NodeId, color: Color) {
        let slot = &mut self.colors[node.index()];
        debug_assert!(
            matches!(
                (*slot, color),
                (Color::Unvisited, Color::InProgress) | (Color::InProgress, Color::Finished)
            ),
            "illegal color transition {} -> {} for {}",
            slot,
            color,
            node
        );
        *slot = color;
    }

    /// Returns the number of vertices currently in `color`.
    #[must_use]
    pub fn count(&self, color: Color) -> usize {
        self.colors.iter().filter(|&&c| c == color).count()
    }

    /// Returns the number of tracked vertices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Returns `true` if no vertices are tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}
