//! Media relay routes.
//!
//! Relays playlist and segment files for a named camera from the upstream
//! media origin, so the dashboard only ever talks to this server. The relay
//! forwards bytes as-is; HLS parsing and bitrate selection stay on the
//! player side.

use axum::Router;
use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, HeaderValue, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use futures::TryStreamExt;
use tracing::warn;

use crate::api::error::{ApiError, ApiResult};
use crate::api::server::AppState;

/// Create the relay router.
pub fn router() -> Router<AppState> {
    Router::new().route("/{cam}/{file}", get(relay_file))
}

/// A single path segment naming a playlist or media segment file.
fn is_safe_file(file: &str) -> bool {
    !file.is_empty()
        && file != "."
        && !file.contains("..")
        && !file.contains('/')
        && !file.contains('\\')
}

async fn relay_file(
    State(state): State<AppState>,
    Path((cam, file)): Path<(String, String)>,
    headers_in: HeaderMap,
) -> ApiResult<Response> {
    if !state.config.knows_camera(&cam) {
        return Err(ApiError::not_found(format!("unknown camera `{cam}`")));
    }
    if !is_safe_file(&file) {
        return Err(ApiError::not_found("unknown stream file"));
    }

    let target = format!("{}/{}/{}", state.config.media_server, cam, file);

    let mut request = state.http_client.get(&target);

    // Forward Range requests so players can probe segments.
    if let Some(range) = headers_in.get(header::RANGE)
        && let Ok(value) = range.to_str()
        && let Ok(value) = HeaderValue::from_str(value)
    {
        request = request.header(header::RANGE, value);
    }

    let upstream = request.send().await.map_err(|error| {
        warn!(camera = %cam, %target, %error, "upstream fetch failed");
        ApiError::internal(format!("upstream fetch failed for `{cam}`"))
    })?;

    let status = upstream.status();

    // Forward the content headers the player cares about.
    let mut out_headers = HeaderMap::new();
    let allowed = [
        header::CONTENT_TYPE,
        header::CONTENT_LENGTH,
        header::CONTENT_RANGE,
        header::ACCEPT_RANGES,
        header::CACHE_CONTROL,
        header::ETAG,
        header::LAST_MODIFIED,
        header::DATE,
    ];

    for key in allowed {
        if let Some(value) = upstream.headers().get(key.as_str()) {
            out_headers.insert(key, value.clone());
        }
    }

    // CORS for the player; the dashboard may be served from another origin.
    out_headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    out_headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, HEAD, OPTIONS"),
    );
    out_headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Range"),
    );
    out_headers.insert(
        header::ACCESS_CONTROL_EXPOSE_HEADERS,
        HeaderValue::from_static("Content-Length, Content-Range, Accept-Ranges"),
    );

    // Stream the upstream body to the player.
    let stream = upstream.bytes_stream().map_err(std::io::Error::other);
    let body = Body::from_stream(stream);

    let mut response = (status, body).into_response();
    *response.headers_mut() = out_headers;
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use axum::http::{Request, StatusCode};
    use tokio::net::TcpListener;
    use tower::ServiceExt;

    use crate::config::AppConfig;

    const PLAYLIST: &str = "#EXTM3U\n#EXT-X-VERSION:3\n#EXTINF:2.0,\nseg_000.ts\n";

    async fn upstream_playlist() -> impl IntoResponse {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/vnd.apple.mpegurl"),
        );
        (StatusCode::OK, headers, PLAYLIST)
    }

    /// Serve a fixed playlist for every camera path on an ephemeral port.
    async fn spawn_upstream() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = Router::new().route("/{cam}/{file}", get(upstream_playlist));
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn relay_app(media_server: String) -> Router {
        let config = AppConfig {
            media_server,
            ..AppConfig::default()
        };
        Router::new()
            .nest("/stream", router())
            .with_state(AppState::new(Arc::new(config)))
    }

    #[tokio::test]
    async fn relay_forwards_playlist_and_sets_cors_headers() {
        let upstream = spawn_upstream().await;
        let app = relay_app(upstream);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/stream/cam1/index.m3u8")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .unwrap(),
            "*"
        );
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/vnd.apple.mpegurl"
        );

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(bytes.as_ref(), PLAYLIST.as_bytes());
    }

    #[tokio::test]
    async fn relay_rejects_unknown_camera() {
        let upstream = spawn_upstream().await;
        let app = relay_app(upstream);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/stream/cam99/index.m3u8")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn relay_rejects_traversal_file_names() {
        let upstream = spawn_upstream().await;
        let app = relay_app(upstream);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/stream/cam1/..%2Fsecrets")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn relay_maps_upstream_failure_to_500() {
        // Bind then drop a listener so the port is known to refuse connections.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let app = relay_app(format!("http://{addr}"));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/stream/cam1/index.m3u8")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn relay_passes_upstream_status_through() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let upstream =
            Router::new().route("/{cam}/{file}", get(|| async { StatusCode::NOT_FOUND }));
        tokio::spawn(async move {
            axum::serve(listener, upstream).await.unwrap();
        });

        let app = relay_app(format!("http://{addr}"));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/stream/cam1/missing.ts")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
