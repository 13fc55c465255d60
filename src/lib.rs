//! Clip Relay - chunked clipboard transfer cache
//!
//! Admits numbered chunks of a client-side split payload, reconstructs the
//! payload on demand, and evicts stale or excess batches under TTL, count
//! and memory budgets.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use cache::ChunkCache;
pub use config::{CacheConfig, Config};
pub use error::CacheError;
pub use tasks::spawn_sweep_task;
