//! Server configuration loaded from the environment.

use std::time::Duration;

use playsync::SyncConfig;
use tracing::warn;

/// Camera roster used when `CAMDECK_CAMERAS` is unset.
pub const DEFAULT_CAMERAS: [&str; 6] = ["cam1", "cam2", "cam3", "cam4", "cam5", "cam6"];

/// Application configuration.
///
/// The camera roster drives the stream listing, the relay's allow-list, and
/// the player population the sync engine waits for before auto-aligning.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Server bind address
    pub bind_address: String,
    /// Server port
    pub port: u16,
    /// Upstream media origin the relay fetches playlists and segments from
    pub media_server: String,
    /// Camera names exposed by the listing and relay routes
    pub cameras: Vec<String>,
    /// Absolute base URL for listing entries; derived from the request host
    /// when unset
    pub public_base_url: Option<String>,
    /// Seek threshold for the alignment pass, seconds
    pub drift_tolerance_secs: f64,
    /// Settle wait between seeking and resuming players
    pub settle_delay: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 3000,
            media_server: "http://127.0.0.1:8888".to_string(),
            cameras: DEFAULT_CAMERAS.iter().map(|name| name.to_string()).collect(),
            public_base_url: None,
            drift_tolerance_secs: playsync::config::DEFAULT_DRIFT_TOLERANCE_SECS,
            settle_delay: playsync::config::DEFAULT_SETTLE_DELAY,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables, falling back to
    /// defaults.
    ///
    /// Supported env vars:
    /// - `CAMDECK_BIND_ADDRESS` (e.g. "0.0.0.0")
    /// - `CAMDECK_PORT` (e.g. "3000")
    /// - `MEDIA_SERVER` (upstream origin, e.g. "http://origin:8888")
    /// - `CAMDECK_CAMERAS` (comma-separated camera names)
    /// - `PUBLIC_BASE_URL` (absolute base for listing URLs)
    /// - `CAMDECK_DRIFT_TOLERANCE_SECS`, `CAMDECK_SETTLE_DELAY_MS`
    pub fn from_env_or_default() -> Self {
        let mut config = Self::default();

        if let Ok(bind_address) = std::env::var("CAMDECK_BIND_ADDRESS")
            && !bind_address.trim().is_empty()
        {
            config.bind_address = bind_address;
        }

        if let Ok(port) = std::env::var("CAMDECK_PORT") {
            match port.parse::<u16>() {
                Ok(parsed) => config.port = parsed,
                Err(_) => warn!(value = %port, "invalid CAMDECK_PORT, using default"),
            }
        }

        if let Ok(media_server) = std::env::var("MEDIA_SERVER")
            && !media_server.trim().is_empty()
        {
            match normalize_origin(&media_server) {
                Some(origin) => config.media_server = origin,
                None => warn!(value = %media_server, "invalid MEDIA_SERVER, using default"),
            }
        }

        if let Ok(cameras) = std::env::var("CAMDECK_CAMERAS") {
            match parse_cameras(&cameras) {
                Some(parsed) => config.cameras = parsed,
                None => warn!(value = %cameras, "empty CAMDECK_CAMERAS, using default roster"),
            }
        }

        if let Ok(base) = std::env::var("PUBLIC_BASE_URL")
            && !base.trim().is_empty()
        {
            config.public_base_url = Some(base.trim_end_matches('/').to_string());
        }

        if let Ok(tolerance) = std::env::var("CAMDECK_DRIFT_TOLERANCE_SECS") {
            match tolerance.parse::<f64>() {
                Ok(parsed) if parsed.is_finite() && parsed >= 0.0 => {
                    config.drift_tolerance_secs = parsed;
                }
                _ => warn!(value = %tolerance, "invalid CAMDECK_DRIFT_TOLERANCE_SECS, using default"),
            }
        }

        if let Ok(settle) = std::env::var("CAMDECK_SETTLE_DELAY_MS") {
            match settle.parse::<u64>() {
                Ok(parsed) => config.settle_delay = Duration::from_millis(parsed),
                Err(_) => warn!(value = %settle, "invalid CAMDECK_SETTLE_DELAY_MS, using default"),
            }
        }

        config
    }

    /// Sync engine configuration derived from this server configuration.
    ///
    /// The expected population is the roster size, so the first automatic
    /// alignment runs once every camera tile has a ready player.
    pub fn sync_config(&self) -> SyncConfig {
        SyncConfig {
            expected_players: self.cameras.len(),
            drift_tolerance_secs: self.drift_tolerance_secs,
            settle_delay: self.settle_delay,
            ..SyncConfig::default()
        }
    }

    /// Whether `camera` is part of the configured roster.
    pub fn knows_camera(&self, camera: &str) -> bool {
        self.cameras.iter().any(|known| known == camera)
    }
}

/// Validate an upstream origin and strip any trailing slash.
///
/// Only http/https origins make sense for the relay's `reqwest` client.
fn normalize_origin(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let parsed = url::Url::parse(trimmed).ok()?;
    match parsed.scheme() {
        "http" | "https" => Some(trimmed.trim_end_matches('/').to_string()),
        _ => None,
    }
}

/// Split a comma-separated roster, dropping blank entries.
fn parse_cameras(raw: &str) -> Option<Vec<String>> {
    let cameras: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect();

    if cameras.is_empty() { None } else { Some(cameras) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_expose_six_cameras() {
        let config = AppConfig::default();
        assert_eq!(config.cameras.len(), 6);
        assert_eq!(config.port, 3000);
        assert!(config.knows_camera("cam1"));
        assert!(!config.knows_camera("cam7"));
    }

    #[test]
    fn sync_config_tracks_roster_size() {
        let mut config = AppConfig::default();
        config.cameras = vec!["north".to_string(), "south".to_string()];
        let sync = config.sync_config();
        assert_eq!(sync.expected_players, 2);
        assert_eq!(sync.drift_tolerance_secs, config.drift_tolerance_secs);
    }

    #[test]
    fn normalize_origin_accepts_http_and_strips_slash() {
        assert_eq!(
            normalize_origin("http://origin:8888/").as_deref(),
            Some("http://origin:8888")
        );
        assert_eq!(
            normalize_origin("https://cdn.example").as_deref(),
            Some("https://cdn.example")
        );
        assert!(normalize_origin("file:///etc/passwd").is_none());
        assert!(normalize_origin("not a url").is_none());
    }

    #[test]
    fn parse_cameras_trims_and_drops_blanks() {
        let cameras = parse_cameras(" cam1, cam2 ,,cam3 ").unwrap();
        assert_eq!(cameras, vec!["cam1", "cam2", "cam3"]);
        assert!(parse_cameras("  ,  ").is_none());
        assert!(parse_cameras("").is_none());
    }
}
