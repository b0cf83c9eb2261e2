//! API Handlers
//!
//! HTTP request handlers translating each endpoint into a single engine call.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};

use crate::cache::CacheEngine;
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::models::{
    ClearResponse, CountResponse, DeleteResponse, GetResponse, HealthResponse, SetRequest,
    SetResponse, StatsResponse,
};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Thread-safe cache engine
    pub engine: Arc<CacheEngine>,
    /// Bucket used by the `/keys/*` routes
    pub default_bucket: Arc<str>,
}

impl AppState {
    /// Creates a new AppState around an existing engine.
    pub fn new(engine: CacheEngine, default_bucket: impl Into<Arc<str>>) -> Self {
        Self {
            engine: Arc::new(engine),
            default_bucket: default_bucket.into(),
        }
    }

    /// Creates a new AppState from configuration.
    ///
    /// Builds the engine from the normalized settings, which also starts the
    /// TTL sweeper.
    pub fn from_config(config: &Config) -> Self {
        let engine = CacheEngine::new(config.engine_settings());
        Self::new(engine, config.default_bucket.as_str())
    }
}

// == Shared operations ==
fn read_value(state: &AppState, bucket: String, key: String) -> Result<Json<GetResponse>> {
    match state.engine.get(&bucket, &key) {
        Some(value) => Ok(Json(GetResponse::new(bucket, key, value))),
        None => Err(CacheError::not_found(&bucket, &key)),
    }
}

fn store_value(
    state: &AppState,
    bucket: String,
    key: String,
    payload: std::result::Result<Json<SetRequest>, JsonRejection>,
) -> Result<Json<SetResponse>> {
    let Json(req) = payload.map_err(|rejection| CacheError::InvalidRequest(rejection.body_text()))?;

    state.engine.set(bucket.as_str(), key.as_str(), req.value)?;

    Ok(Json(SetResponse::new(bucket, key)))
}

fn remove_value(state: &AppState, bucket: String, key: String) -> Result<Json<DeleteResponse>> {
    match state.engine.delete(&bucket, &key) {
        Some(value) => Ok(Json(DeleteResponse::new(bucket, key, value))),
        None => Err(CacheError::not_found(&bucket, &key)),
    }
}

// == Default bucket ==

/// Handler for GET /keys/*key
pub async fn get_default_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<GetResponse>> {
    let bucket = state.default_bucket.to_string();
    read_value(&state, bucket, key)
}

/// Handler for PUT /keys/*key
pub async fn set_default_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
    payload: std::result::Result<Json<SetRequest>, JsonRejection>,
) -> Result<Json<SetResponse>> {
    let bucket = state.default_bucket.to_string();
    store_value(&state, bucket, key, payload)
}

/// Handler for DELETE /keys/*key
pub async fn delete_default_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<DeleteResponse>> {
    let bucket = state.default_bucket.to_string();
    remove_value(&state, bucket, key)
}

// == Buckets ==

/// Handler for GET /buckets/:bucket/*key
pub async fn get_handler(
    State(state): State<AppState>,
    Path((bucket, key)): Path<(String, String)>,
) -> Result<Json<GetResponse>> {
    read_value(&state, bucket, key)
}

/// Handler for PUT /buckets/:bucket/*key
pub async fn set_handler(
    State(state): State<AppState>,
    Path((bucket, key)): Path<(String, String)>,
    payload: std::result::Result<Json<SetRequest>, JsonRejection>,
) -> Result<Json<SetResponse>> {
    store_value(&state, bucket, key, payload)
}

/// Handler for DELETE /buckets/:bucket/*key
pub async fn delete_handler(
    State(state): State<AppState>,
    Path((bucket, key)): Path<(String, String)>,
) -> Result<Json<DeleteResponse>> {
    remove_value(&state, bucket, key)
}

/// Handler for GET /buckets/:bucket
pub async fn count_handler(
    State(state): State<AppState>,
    Path(bucket): Path<String>,
) -> Json<CountResponse> {
    let count = state.engine.count(&bucket);
    Json(CountResponse::new(bucket, count))
}

/// Handler for DELETE /buckets/:bucket
pub async fn clear_bucket_handler(
    State(state): State<AppState>,
    Path(bucket): Path<String>,
) -> Json<ClearResponse> {
    let removed = state.engine.clear(&bucket);
    Json(ClearResponse::bucket(&bucket, removed))
}

/// Handler for DELETE /buckets
pub async fn clear_all_handler(State(state): State<AppState>) -> Json<ClearResponse> {
    let removed = state.engine.clear_all();
    Json(ClearResponse::all(removed))
}

// == Service ==

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::from(state.engine.stats()))
}

/// Handler for GET / and GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
