//! Stream listing routes.

use axum::{Json, Router, extract::State, http::HeaderMap, routing::get};

use crate::api::error::ApiResult;
use crate::api::models::StreamDescriptor;
use crate::api::server::AppState;

/// Create the stream listing router.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_streams))
}

/// List every configured camera with an absolute playlist URL resolved
/// through the relay.
async fn list_streams(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<Vec<StreamDescriptor>>> {
    let base = public_base(&state, &headers);

    let streams = state
        .config
        .cameras
        .iter()
        .map(|camera| StreamDescriptor {
            name: camera.clone(),
            url: format!("{base}/stream/{camera}/index.m3u8"),
            status: "live".to_string(),
        })
        .collect();

    Ok(Json(streams))
}

/// Absolute URL base for listing entries.
///
/// Prefers the configured public base; otherwise reconstructs it from the
/// request's `Host` header, honoring `X-Forwarded-Proto` when the server
/// sits behind a proxy.
fn public_base(state: &AppState, headers: &HeaderMap) -> String {
    if let Some(base) = &state.config.public_base_url {
        return base.clone();
    }

    let scheme = headers
        .get("x-forwarded-proto")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("http");
    let host = headers
        .get(axum::http::header::HOST)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| format!("localhost:{}", state.config.port));

    format!("{scheme}://{host}")
}
