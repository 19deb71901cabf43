//! Root selection for single-root and whole-graph computations.

use crate::{
    graph::{algorithms::color::{Color, ColorMap}, GraphBase, NodeId},
    Error, Result,
};

/// Yields the roots a computation starts from.
///
/// With an explicit root, yields exactly that vertex once. Without one, yields
/// each vertex that is still `Unvisited` when asked, in the graph's natural
/// iteration order. The check is made lazily against the live color map, so
/// vertices reached from an earlier root are skipped and every vertex of the
/// graph ends up covered by exactly one root's traversal.
///
/// # Examples
///
/// ```rust
/// use pathscope::graph::{algorithms::{ColorMap, RootSelector}, DirectedGraph, NodeId};
///
/// let graph: DirectedGraph<(), ()> = DirectedGraph::from_edges(vec![(); 2], [])?;
/// let colors = ColorMap::new(2);
///
/// let mut roots = RootSelector::new(&graph, None)?;
/// assert_eq!(roots.next_root(&colors), Some(NodeId::new(0)));
/// # Ok::<(), pathscope::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct RootSelector {
    order: Vec<NodeId>,
    cursor: usize,
    explicit: bool,
}

impl RootSelector {
    /// Prepares root selection over `graph`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NodeNotFound`] if `root` is given but not in the graph.
    pub fn new<G: GraphBase>(graph: &G, root: Option<NodeId>) -> Result<Self> {
        match root {
            Some(root) if !graph.contains_node(root) => Err(Error::NodeNotFound(root)),
            Some(root) => Ok(RootSelector {
                order: vec![root],
                cursor: 0,
                explicit: true,
            }),
            None => Ok(RootSelector {
                order: graph.node_ids().collect(),
                cursor: 0,
                explicit: false,
            }),
        }
    }

    /// Returns `true` if this selector was created with an explicit root.
    #[must_use]
    pub fn is_explicit(&self) -> bool {
        self.explicit
    }

    /// Returns the next root, or `None` when every candidate is used up.
    pub fn next_root(&mut self, colors: &ColorMap) -> Option<NodeId> {
        while let Some(&node) = self.order.get(self.cursor) {
            self.cursor += 1;
            if self.explicit || colors.get(node) == Color::Unvisited {
                return Some(node);
            }
        }
        None
    }
}
