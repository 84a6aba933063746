use std::sync::Arc;

use camdeck::api::server::{ApiServer, ApiServerConfig, AppState};
use camdeck::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize logging
    camdeck::logging::init_logging()?;

    let config = Arc::new(AppConfig::from_env_or_default());
    tracing::info!(
        cameras = config.cameras.len(),
        media_server = %config.media_server,
        "camdeck starting"
    );

    let server_config = ApiServerConfig::from_app_config(&config);
    let state = AppState::new(config);
    let server = ApiServer::with_state(server_config, state);

    // Ctrl-C triggers a graceful shutdown.
    let cancel_token = server.cancel_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel_token.cancel();
        }
    });

    server.run().await?;

    Ok(())
}
