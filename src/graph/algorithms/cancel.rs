//! Cooperative cancellation.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

/// Shared cancellation flag.
///
/// Clones observe the same flag, so a token can be handed to an algorithm and
/// cancelled from another thread or from inside an event handler. Algorithms poll
/// it before every frontier pop and every edge examination and stop at the next
/// poll once it is set.
///
/// # Examples
///
/// ```rust
/// use pathscope::graph::algorithms::CancellationToken;
///
/// let token = CancellationToken::new();
/// let handle = token.clone();
/// assert!(!token.is_cancelled());
///
/// handle.cancel();
/// assert!(token.is_cancelled());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Creates a token that is not cancelled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation. Idempotent.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// Returns `true` once [`cancel`](Self::cancel) has been called on any clone.
    #[must_use]
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// How a computation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, strum::Display)]
pub enum SearchStatus {
    /// Ran to completion; results are exact
    #[default]
    Completed,
    /// Stopped at a cancellation poll; results are incomplete
    Cancelled,
}

impl SearchStatus {
    /// Returns `true` for [`SearchStatus::Cancelled`].
    #[must_use]
    pub const fn is_cancelled(self) -> bool {
        matches!(self, SearchStatus::Cancelled)
    }
}
