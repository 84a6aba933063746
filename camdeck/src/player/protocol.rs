//! Wire protocol between dashboard players and the sync endpoint.

use serde::{Deserialize, Serialize};

/// Messages a player sends over its session socket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Announces the camera stream this player carries; sent once the HLS
    /// loader reports the manifest ready. Registers the player.
    Hello { stream: String },
    /// Refreshes the player's observable playback state.
    State {
        current_time: f64,
        /// Raw HTMLMediaElement readiness ordinal.
        ready_state: u8,
        /// Buffered `[start, end)` ranges, ordered and disjoint.
        buffered: Vec<(f64, f64)>,
    },
}

/// Commands the engine issues to a player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerCommand {
    Pause,
    Seek { time: f64 },
    Play,
}
