//! Synchronization engine configuration.

use std::time::Duration;

use crate::handle::ReadyState;

/// Players expected before the first automatic alignment pass.
pub const DEFAULT_EXPECTED_PLAYERS: usize = 6;

/// Drift below or equal to this is left alone to avoid visible micro-seeks.
pub const DEFAULT_DRIFT_TOLERANCE_SECS: f64 = 0.1;

/// Pause between issuing seeks and resuming playback, letting the media
/// pipelines complete the seek before play is requested again.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(200);

/// Configuration for a [`SyncEngine`](crate::engine::SyncEngine).
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Population that triggers the automatic alignment pass.
    pub expected_players: usize,
    /// Strict threshold in seconds; a player is only seeked when its drift
    /// from the target exceeds this.
    pub drift_tolerance_secs: f64,
    /// Settle wait between the seek and resume steps of a pass.
    pub settle_delay: Duration,
    /// Minimum readiness for master candidacy.
    pub min_ready: ReadyState,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            expected_players: DEFAULT_EXPECTED_PLAYERS,
            drift_tolerance_secs: DEFAULT_DRIFT_TOLERANCE_SECS,
            settle_delay: DEFAULT_SETTLE_DELAY,
            min_ready: ReadyState::CurrentData,
        }
    }
}
