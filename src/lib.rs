//! Bucket Cache - An in-memory bucketed key/value cache server
//!
//! Provides namespaced ("bucket") key/value storage with a global size budget
//! enforced by LRU eviction and a per-entry TTL enforced both lazily and by a
//! background sweeper.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use cache::CacheEngine;
pub use config::{Config, EngineSettings};
pub use error::{CacheError, Result};
