//! API Routes
//!
//! Configures the Axum router with all cache server endpoints.

use axum::{
    routing::{delete, get},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    clear_all_handler, clear_bucket_handler, count_handler, delete_default_handler,
    delete_handler, get_default_handler, get_handler, health_handler, set_default_handler,
    set_handler, stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(health_handler))
        .route("/health", get(health_handler))
        .route("/stats", get(stats_handler))
        .route(
            "/keys/*key",
            get(get_default_handler)
                .put(set_default_handler)
                .delete(delete_default_handler),
        )
        .route("/buckets", delete(clear_all_handler))
        .route(
            "/buckets/:bucket",
            get(count_handler).delete(clear_bucket_handler),
        )
        .route(
            "/buckets/:bucket/*key",
            get(get_handler).put(set_handler).delete(delete_handler),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
