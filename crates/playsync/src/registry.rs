//! Registry of the players taking part in synchronized playback.
//!
//! The registry tracks handles in registration order. Order matters only for
//! the engine's fallback and tie-breaking; correctness of a pass does not
//! depend on it.

use std::sync::Arc;

use tracing::debug;

use crate::handle::MediaHandle;

/// Result of a [`PlayerRegistry::register`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterOutcome {
    /// Whether the handle was newly added (false for a duplicate).
    pub added: bool,
    /// Whether this registration brought the population up to (or past) the
    /// expected total for the first time at this count.
    pub reached_expected: bool,
}

/// Insertion-ordered set of media handles eligible for synchronization.
///
/// The expected population is supplied at construction; when registration
/// reaches it the caller is told so exactly once per distinct count increase,
/// so repeated registrations at the threshold cannot re-trigger a pass.
pub struct PlayerRegistry {
    handles: Vec<Arc<dyn MediaHandle>>,
    expected: usize,
    notified_len: usize,
}

impl PlayerRegistry {
    /// Create a registry expecting `expected` players.
    pub fn new(expected: usize) -> Self {
        Self {
            handles: Vec::with_capacity(expected),
            expected,
            notified_len: 0,
        }
    }

    /// Track a handle unless it is already registered.
    ///
    /// Registering more handles than the expected total is permitted; the
    /// extras take part in every future pass, and each genuine count increase
    /// at or past the threshold reports `reached_expected` once.
    pub fn register(&mut self, handle: Arc<dyn MediaHandle>) -> RegisterOutcome {
        if self.handles.iter().any(|known| Arc::ptr_eq(known, &handle)) {
            debug!(players = self.handles.len(), "duplicate handle ignored");
            return RegisterOutcome {
                added: false,
                reached_expected: false,
            };
        }

        self.handles.push(handle);

        let reached = self.expected > 0
            && self.handles.len() >= self.expected
            && self.handles.len() > self.notified_len;
        if reached {
            self.notified_len = self.handles.len();
        }

        debug!(
            players = self.handles.len(),
            expected = self.expected,
            reached,
            "player registered"
        );

        RegisterOutcome {
            added: true,
            reached_expected: reached,
        }
    }

    /// Ordered snapshot of the tracked handles.
    pub fn handles(&self) -> Vec<Arc<dyn MediaHandle>> {
        self.handles.clone()
    }

    /// Number of tracked handles.
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Expected population supplied at construction.
    pub fn expected(&self) -> usize {
        self.expected
    }

    /// Drop every tracked handle and reset the threshold notification, for
    /// when the mounted player set is rebuilt.
    pub fn clear(&mut self) {
        self.handles.clear();
        self.notified_len = 0;
    }
}
