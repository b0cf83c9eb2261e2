//! Background Tasks Module
//!
//! Contains background tasks that run periodically alongside the cache engine.
//!
//! # Tasks
//! - TTL Sweeper: Removes expired cache entries at configured intervals

mod cleanup;

pub use cleanup::Sweeper;
