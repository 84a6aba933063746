//! API request/response models.

use playsync::SyncReport;
use serde::{Deserialize, Serialize};

/// One playable stream as presented to the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamDescriptor {
    /// Camera name
    pub name: String,
    /// Absolute playlist URL, resolved through the relay
    pub url: String,
    /// Stream status
    pub status: String,
}

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
}

/// Result of a sync request.
#[derive(Debug, Serialize, Deserialize)]
pub struct SyncResponse {
    /// Players the pass operated on
    pub players: usize,
    /// Registration index of the selected master
    pub master: Option<usize>,
    /// Timeline position the players were aligned to
    pub target_time: f64,
    /// Seeks actually issued
    pub seeks: usize,
    /// Commands that failed and were contained
    pub command_failures: usize,
    /// Whether the request was folded into an in-flight pass
    pub coalesced: bool,
}

impl From<SyncReport> for SyncResponse {
    fn from(report: SyncReport) -> Self {
        Self {
            players: report.players,
            master: report.master,
            target_time: report.target_time,
            seeks: report.seeks,
            command_failures: report.command_failures,
            coalesced: report.coalesced,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stream_descriptor_serializes_expected_shape() {
        let descriptor = StreamDescriptor {
            name: "cam1".to_string(),
            url: "http://dash.local/stream/cam1/index.m3u8".to_string(),
            status: "live".to_string(),
        };

        let json = serde_json::to_string(&descriptor).unwrap();
        assert!(json.contains(r#""name":"cam1""#));
        assert!(json.contains("index.m3u8"));
        assert!(json.contains(r#""status":"live""#));
    }
}
