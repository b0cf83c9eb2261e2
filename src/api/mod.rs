//! API Module
//!
//! HTTP handlers and routing for the cache server REST API.
//!
//! # Endpoints
//! - `GET /`, `GET /health` - Health check
//! - `GET /stats` - Cache statistics
//! - `GET|PUT|DELETE /keys/*key` - Key in the default bucket
//! - `DELETE /buckets` - Clear every bucket
//! - `GET /buckets/:bucket` - Count keys in a bucket
//! - `DELETE /buckets/:bucket` - Clear a bucket
//! - `GET|PUT|DELETE /buckets/:bucket/*key` - Key in a named bucket

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
