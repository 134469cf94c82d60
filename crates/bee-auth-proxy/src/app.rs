//! HTTP surface of the proxy: shared state, router and handlers.

use std::any::Any;
use std::sync::Arc;

use axum::body::{Body, Bytes};
use axum::extract::{Request, State};
use axum::http::{Method, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{SecondsFormat, Utc};
use percent_encoding::percent_decode_str;
use serde::Serialize;
use serde_json::json;
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::bee::{self, AuthRequest, LoginPayload};
use crate::config::AppConfig;
use crate::error::UpstreamError;

// ---------------------------------------------------------------------------
// Shared application state
// ---------------------------------------------------------------------------

/// State shared across all Axum handlers.
pub struct AppState {
    /// Global configuration (credentials, upstream, static root).
    pub config: AppConfig,
    /// HTTP client for upstream calls, carrying the configured timeout.
    pub http: reqwest::Client,
    static_files: ServeDir,
}

impl AppState {
    pub fn new(config: AppConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(config.upstream_timeout)
            .build()?;
        let static_files = ServeDir::new(&config.static_dir);

        Ok(Self {
            config,
            http,
            static_files,
        })
    }
}

/// Build the router with every route and layer the proxy serves.
pub fn router(state: Arc<AppState>) -> Router {
    with_layers(routes(state))
}

fn routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/proxy/bee-auth", post(bee_auth))
        .route("/proxy/health", get(health))
        .fallback(static_file)
        .with_state(state)
}

fn with_layers(router: Router) -> Router {
    router
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// `POST /proxy/bee-auth` — relay a login to Bee and mirror its answer.
async fn bee_auth(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Response, UpstreamError> {
    let req = AuthRequest::from_body(&body);
    let payload = LoginPayload::new(&state.config.credentials, req.uid.as_deref());

    info!(uid = %payload.uid, "auth request received");

    let upstream_body = bee::login(&state.http, &state.config.upstream_url, &payload).await?;

    info!(uid = %payload.uid, "auth succeeded");

    Ok(([(header::CONTENT_TYPE, "application/json")], upstream_body).into_response())
}

/// Response of `GET /proxy/health`.
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    time: String,
}

/// `GET /proxy/health` — liveness probe, never touches upstream.
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        time: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}

/// Fallback — serve a file from the static root.
///
/// Only `GET` and `HEAD` reach the filesystem; anything else, and any path
/// with a dot-prefixed segment, is a 404.
async fn static_file(State(state): State<Arc<AppState>>, req: Request) -> Response {
    let readable = matches!(*req.method(), Method::GET | Method::HEAD);
    if !readable || has_hidden_segment(req.uri().path()) {
        return StatusCode::NOT_FOUND.into_response();
    }

    match state.static_files.clone().oneshot(req).await {
        Ok(res) => res.into_response(),
        Err(never) => match never {},
    }
}

/// Checks the decoded path, since `ServeDir` decodes `%2F` into a separator.
fn has_hidden_segment(path: &str) -> bool {
    percent_decode_str(path)
        .decode_utf8_lossy()
        .split(['/', '\\'])
        .any(|segment| segment.starts_with('.'))
}

/// Answer for a request whose handler panicked. The panic itself is logged
/// by the process-wide hook installed in `main`.
fn panic_response(_: Box<dyn Any + Send + 'static>) -> Response<Body> {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "Internal server error" })),
    )
        .into_response()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
