//! API route modules.
//!
//! Organizes routes by resource type.

pub mod health;
pub mod relay;
pub mod streams;
pub mod sync;

use axum::Router;

use crate::api::server::AppState;

/// Create the main API router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/streams", streams::router())
        .nest("/api/sync", sync::router())
        .nest("/stream", relay::router())
        .nest("/health", health::router())
        .with_state(state)
}
