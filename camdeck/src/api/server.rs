//! API server setup and configuration.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::Router;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use playsync::SyncEngine;

use crate::api::routes;
use crate::config::AppConfig;
use crate::error::Result;

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiServerConfig {
    /// Server bind address
    pub bind_address: String,
    /// Server port
    pub port: u16,
    /// Enable CORS
    pub enable_cors: bool,
}

impl Default for ApiServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 3000,
            enable_cors: true,
        }
    }
}

impl ApiServerConfig {
    /// Server settings taken from the application configuration.
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            bind_address: config.bind_address.clone(),
            port: config.port,
            enable_cors: true,
        }
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Server start time for uptime calculation
    pub start_time: Instant,
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Playback synchronization engine
    pub engine: Arc<SyncEngine>,
    /// Shared HTTP client for relaying upstream media
    pub http_client: reqwest::Client,
}

impl AppState {
    /// Create application state for the given configuration.
    pub fn new(config: Arc<AppConfig>) -> Self {
        let engine = Arc::new(SyncEngine::new(config.sync_config()));
        Self {
            start_time: Instant::now(),
            engine,
            http_client: Self::build_http_client(),
            config,
        }
    }

    pub(crate) fn build_http_client() -> reqwest::Client {
        // No overall request timeout: playlist relays are short but segment
        // responses can be long-lived on slow upstreams.
        match reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .tcp_nodelay(true)
            .pool_max_idle_per_host(20)
            .build()
        {
            Ok(client) => client,
            Err(error) => {
                tracing::warn!(
                    error = %error,
                    "Failed to build relay HTTP client; falling back to reqwest defaults"
                );
                reqwest::Client::new()
            }
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Arc::new(AppConfig::default()))
    }
}

/// API server.
pub struct ApiServer {
    config: ApiServerConfig,
    state: AppState,
    cancel_token: CancellationToken,
}

impl ApiServer {
    /// Create a new API server with the given state.
    pub fn with_state(config: ApiServerConfig, state: AppState) -> Self {
        Self {
            config,
            state,
            cancel_token: CancellationToken::new(),
        }
    }

    /// Get the cancellation token for graceful shutdown.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel_token.clone()
    }

    /// Build the router with all middleware and routes.
    fn build_router(&self) -> Router {
        let mut router = routes::create_router(self.state.clone());

        if self.config.enable_cors {
            let cors = CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any);
            router = router.layer(cors);
        }

        router.layer(TraceLayer::new_for_http())
    }

    /// Start the server.
    pub async fn run(&self) -> Result<()> {
        let addr: SocketAddr = format!("{}:{}", self.config.bind_address, self.config.port)
            .parse()
            .map_err(|e| crate::error::Error::Api(format!("Invalid address: {}", e)))?;

        let router = self.build_router();
        let listener = TcpListener::bind(addr).await?;

        tracing::info!("API server listening on http://{}", addr);

        let cancel_token = self.cancel_token.clone();

        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                cancel_token.cancelled().await;
                tracing::info!("API server shutting down...");
            })
            .await
            .map_err(|e| crate::error::Error::Api(format!("Server error: {}", e)))?;

        Ok(())
    }

    /// Shutdown the server.
    pub fn shutdown(&self) {
        self.cancel_token.cancel();
    }
}
