//! Search configuration
//!
//! Options shared by every algorithm in this module. The defaults favor checking
//! in debug builds and speed in release builds.

/// Configuration for a traversal or path computation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    /// After every decrease-key, verify that the priority queue top is the best
    /// queued entry under the active relaxer. A violation aborts the computation
    /// with [`Error::HeapOrderViolated`](crate::Error::HeapOrderViolated).
    /// Costs O(n) per update.
    pub verify_heap: bool,

    /// Emit a `log::trace!` record for every fired event
    pub trace_events: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            verify_heap: cfg!(debug_assertions),
            trace_events: false,
        }
    }
}

impl SearchConfig {
    /// Creates a configuration with every check enabled
    ///
    /// Heap verification runs after each decrease-key regardless of build profile.
    #[must_use]
    pub fn verified() -> Self {
        Self {
            verify_heap: true,
            trace_events: false,
        }
    }

    /// Creates a configuration for maximum performance
    #[must_use]
    pub fn fast() -> Self {
        Self {
            verify_heap: false,
            trace_events: false,
        }
    }

    /// Returns this configuration with per-event tracing switched on or off
    #[must_use]
    pub fn with_trace_events(mut self, enabled: bool) -> Self {
        self.trace_events = enabled;
        self
    }
}
