//! Capability interface over a playable media element.
//!
//! The engine never owns the media element behind a handle; it only reads the
//! element's observable playback state and issues pause/seek/play commands for
//! the duration the handle stays registered.

use thiserror::Error;

/// Error raised by a handle when a command cannot be delivered.
///
/// Command failures are always local to one handle; an alignment pass
/// contains them and carries on with the remaining players.
#[derive(Debug, Error)]
pub enum HandleError {
    /// The handle is no longer backed by a live media element, e.g. its
    /// session closed while a pass was inside the settle wait.
    #[error("media handle is detached")]
    Detached,

    /// The runtime refused the command (autoplay policy, command queue full).
    #[error("command rejected: {reason}")]
    Rejected { reason: String },
}

impl HandleError {
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::Rejected {
            reason: reason.into(),
        }
    }
}

/// Readiness of a media element, ordered from no data to fully buffered.
///
/// Mirrors the five HTMLMediaElement readiness levels. A handle reports
/// position and buffered ranges reliably from [`ReadyState::CurrentData`]
/// upward; anything below is excluded from master candidacy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ReadyState {
    Nothing = 0,
    Metadata = 1,
    CurrentData = 2,
    FutureData = 3,
    EnoughData = 4,
}

impl ReadyState {
    /// Map a raw readiness ordinal to a state, saturating above the range.
    pub fn from_ordinal(ordinal: u8) -> Self {
        match ordinal {
            0 => Self::Nothing,
            1 => Self::Metadata,
            2 => Self::CurrentData,
            3 => Self::FutureData,
            _ => Self::EnoughData,
        }
    }

    pub fn ordinal(self) -> u8 {
        self as u8
    }
}

/// A single buffered interval `[start, end)` in media time, seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeRange {
    pub start: f64,
    pub end: f64,
}

impl TimeRange {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }
}

/// Non-owning view of a playable media element.
///
/// `buffered()` returns disjoint ranges ordered by time; the live edge is the
/// end of the last range. Implementations must keep reads cheap: the engine
/// reads each handle's state once per alignment pass and never caches it
/// beyond that pass.
pub trait MediaHandle: Send + Sync {
    fn ready_state(&self) -> ReadyState;

    /// Current playback position in seconds.
    fn current_time(&self) -> f64;

    /// Buffered media ranges, ordered and disjoint.
    fn buffered(&self) -> Vec<TimeRange>;

    /// Halt playback. Position must not move while paused.
    fn pause(&self) -> Result<(), HandleError>;

    /// Move the playback position to `position` seconds.
    fn seek(&self, position: f64) -> Result<(), HandleError>;

    /// Resume playback.
    fn play(&self) -> Result<(), HandleError>;

    /// End of the last buffered range, if any media is buffered.
    fn live_edge(&self) -> Option<f64> {
        self.buffered().last().map(|range| range.end)
    }
}
