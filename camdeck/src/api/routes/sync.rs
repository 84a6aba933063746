//! Sync control routes.
//!
//! `POST /api/sync` runs an alignment pass on demand; `GET /api/sync/ws`
//! carries the per-player sessions that feed the engine.

use std::sync::Arc;

use axum::extract::State;
use axum::extract::ws::WebSocketUpgrade;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::models::SyncResponse;
use crate::api::server::AppState;
use crate::player::session;

/// Create the sync router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(sync_all))
        .route("/ws", get(player_session))
}

/// Re-align every registered player on demand.
async fn sync_all(State(state): State<AppState>) -> Json<SyncResponse> {
    let report = state.engine.sync_all().await;
    Json(report.into())
}

/// Upgrade a dashboard player connection into a sync session.
async fn player_session(State(state): State<AppState>, ws: WebSocketUpgrade) -> impl IntoResponse {
    let engine = Arc::clone(&state.engine);
    ws.on_upgrade(move |socket| session::run(socket, engine))
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode};
    use tower::ServiceExt;

    use crate::config::AppConfig;
    use crate::player::handle::RemoteHandle;
    use crate::player::protocol::ServerCommand;

    fn sync_request() -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri("/api/sync")
            .body(Body::empty())
            .unwrap()
    }

    async fn post_sync(app: Router) -> SyncResponse {
        let response = app.oneshot(sync_request()).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn sync_with_no_players_is_a_noop() {
        let app = Router::new()
            .nest("/api/sync", router())
            .with_state(AppState::default());

        let body = post_sync(app).await;
        assert_eq!(body.players, 0);
        assert_eq!(body.master, None);
        assert_eq!(body.seeks, 0);
    }

    #[tokio::test]
    async fn sync_aligns_registered_players() {
        let state = AppState::new(Arc::new(AppConfig::default()));

        let (near, _near_rx) = RemoteHandle::channel("cam1".to_string());
        near.apply_report(10.0, 4, &[(0.0, 10.2)]);
        let (master, _master_rx) = RemoteHandle::channel("cam2".to_string());
        master.apply_report(10.05, 4, &[(0.0, 10.1)]);
        let (drifted, mut drifted_rx) = RemoteHandle::channel("cam3".to_string());
        drifted.apply_report(12.0, 4, &[(0.0, 13.0)]);

        state.engine.register(near).await;
        state.engine.register(master).await;
        state.engine.register(drifted).await;

        let app = Router::new()
            .nest("/api/sync", router())
            .with_state(state);

        let body = post_sync(app).await;
        assert_eq!(body.players, 3);
        assert_eq!(body.master, Some(1));
        assert_eq!(body.target_time, 10.05);
        assert_eq!(body.seeks, 1);

        // The drifted player is paused, pulled onto the target, and resumed.
        assert_eq!(drifted_rx.recv().await, Some(ServerCommand::Pause));
        assert_eq!(
            drifted_rx.recv().await,
            Some(ServerCommand::Seek { time: 10.05 })
        );
        assert_eq!(drifted_rx.recv().await, Some(ServerCommand::Play));
    }
}
