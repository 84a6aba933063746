//! Tracing setup for the relay server.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Default log filter directive.
pub const DEFAULT_LOG_FILTER: &str = "camdeck=info,playsync=info,tower_http=warn";

/// Initialize the global subscriber with an env-overridable filter.
///
/// `RUST_LOG` takes precedence over the default directive.
pub fn init_logging() -> crate::Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .map_err(|e| {
            crate::Error::Configuration(format!("Failed to set global default subscriber: {}", e))
        })?;

    Ok(())
}
