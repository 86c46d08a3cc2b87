use anyhow::Result;
use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use linuxmap_core::dataset::load_dataset;
use linuxmap_core::protocol::{self, Envelope, InitData, Request, SearchData};
use linuxmap_core::{EngineConfig, SearchEngine};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod worker;

pub use worker::WorkerHandle;

#[derive(Debug, Clone, Default)]
pub struct AppOptions {
    /// Dataset directory (or single document) sent as INIT at startup and on reload
    pub data_dir: Option<PathBuf>,
    /// Engine config JSON
    pub config: Option<PathBuf>,
    /// Token required by admin endpoints; they refuse everything when unset
    pub admin_token: Option<String>,
}

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: String,
    #[serde(default)]
    pub seq: Option<u64>,
}

#[derive(Clone)]
pub struct AppState {
    pub worker: WorkerHandle,
    pub data_dir: Option<PathBuf>,
    pub admin_token: Option<String>,
}

type ApiError = (StatusCode, String);

pub async fn build_app(opts: AppOptions) -> Result<Router> {
    let config = EngineConfig::load(opts.config.as_deref())?;
    let worker = WorkerHandle::spawn(SearchEngine::new(config))?;
    if let Some(dir) = &opts.data_dir {
        let index_size = init_from(&worker, dir).await?;
        tracing::info!(data = %dir.display(), index_size, "initial index built");
    }
    let app_state = AppState { worker, data_dir: opts.data_dir, admin_token: opts.admin_token };

    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    let app = Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/message", post(message_handler))
        .route("/search", get(search_handler))
        .route("/stats", get(stats_handler))
        .route("/index/reload", post(reload_handler))
        .with_state(app_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());
    Ok(app)
}

async fn init_from(worker: &WorkerHandle, dir: &Path) -> Result<usize> {
    let nodes = load_dataset(dir)?;
    match worker.call(Request::Init(InitData { nodes })).await? {
        protocol::Response::InitComplete(done) => Ok(done.index_size),
        other => anyhow::bail!("unexpected reply to INIT: {other:?}"),
    }
}

/// Generic `{type, data}` endpoint. Unknown types get 204 and no body.
pub async fn message_handler(State(state): State<AppState>, Json(env): Json<Envelope>) -> Result<Response, ApiError> {
    let request = match Request::from_envelope(env) {
        Ok(Some(req)) => req,
        Ok(None) => return Ok(StatusCode::NO_CONTENT.into_response()),
        Err(err) => return Err((StatusCode::BAD_REQUEST, format!("{err:#}"))),
    };
    let reply = state.worker.call(request).await.map_err(internal)?;
    Ok(Json(reply).into_response())
}

pub async fn search_handler(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Result<Json<protocol::Response>, ApiError> {
    let request = Request::Search(SearchData { query: params.q, seq: params.seq });
    let reply = state.worker.call(request).await.map_err(internal)?;
    Ok(Json(reply))
}

pub async fn stats_handler(State(state): State<AppState>) -> Result<Json<protocol::Response>, ApiError> {
    let reply = state.worker.call(Request::GetStats).await.map_err(internal)?;
    Ok(Json(reply))
}

/// Re-read the data directory and rebuild the index from scratch.
async fn reload_handler(State(state): State<AppState>, headers: HeaderMap) -> Result<Json<protocol::Response>, ApiError> {
    authorize(&state, &headers)?;
    let dir = state
        .data_dir
        .as_ref()
        .ok_or_else(|| (StatusCode::CONFLICT, "server was started without a data directory".to_string()))?;
    let index_size = init_from(&state.worker, dir).await.map_err(internal)?;
    tracing::info!(data = %dir.display(), index_size, "index reloaded");
    Ok(Json(protocol::Response::InitComplete(protocol::InitComplete { index_size })))
}

fn authorize(state: &AppState, headers: &HeaderMap) -> Result<(), ApiError> {
    let required = match &state.admin_token {
        Some(t) => t,
        None => return Err((StatusCode::UNAUTHORIZED, "ADMIN_TOKEN not set".into())),
    };
    let provided = headers.get("X-ADMIN-TOKEN").and_then(|v| v.to_str().ok()).unwrap_or("");
    if provided == required {
        Ok(())
    } else {
        Err((StatusCode::UNAUTHORIZED, "invalid admin token".into()))
    }
}

fn internal(err: anyhow::Error) -> ApiError {
    tracing::error!(error = %format!("{err:#}"), "request failed");
    (StatusCode::INTERNAL_SERVER_ERROR, format!("{err:#}"))
}
