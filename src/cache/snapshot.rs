//! Diagnostics Reporter
//!
//! Point-in-time view of the cache for observability. Building a snapshot
//! never sweeps or otherwise mutates the store.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::cache::{memory_limit, Batch, BatchId, BatchStore, CacheStats, ChunkNumber};
use crate::config::CacheConfig;

// == Cache Snapshot ==
#[derive(Debug, Clone, Serialize)]
pub struct CacheSnapshot {
    pub taken_at: DateTime<Utc>,
    pub batch_count: usize,
    /// Sum of all stored chunk payloads
    pub total_bytes: u64,
    /// Available system memory at snapshot time
    pub available_memory: u64,
    /// Byte ceiling derived from `available_memory`
    pub memory_limit: u64,
    /// `total_bytes` as a percentage of `memory_limit`
    pub memory_usage_percent: f64,
    pub config: CacheConfig,
    pub stats: CacheStats,
    /// Oldest first
    pub batches: Vec<BatchSummary>,
}

// == Batch Summary ==
#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    pub id: BatchId,
    pub created_at: DateTime<Utc>,
    pub age_secs: f64,
    pub chunk_count: usize,
    pub size_bytes: u64,
    pub chunk_numbers: Vec<ChunkNumber>,
}

impl BatchSummary {
    pub fn of(batch: &Batch, now: DateTime<Utc>) -> Self {
        Self {
            id: batch.id,
            created_at: batch.created_at,
            age_secs: batch.age(now).num_milliseconds() as f64 / 1000.0,
            chunk_count: batch.chunk_count(),
            size_bytes: batch.size_bytes(),
            chunk_numbers: batch.chunk_numbers(),
        }
    }
}

// == Build Snapshot ==
pub fn build_snapshot(
    store: &BatchStore,
    stats: &CacheStats,
    config: &CacheConfig,
    now: DateTime<Utc>,
    available_memory: u64,
) -> CacheSnapshot {
    let limit = memory_limit(available_memory, config.memory_limit_fraction);
    let total_bytes = store.total_bytes();

    CacheSnapshot {
        taken_at: now,
        batch_count: store.batch_count(),
        total_bytes,
        available_memory,
        memory_limit: limit,
        memory_usage_percent: usage_percent(total_bytes, limit),
        config: config.clone(),
        stats: stats.clone(),
        batches: store
            .iter_oldest_first()
            .map(|batch| BatchSummary::of(batch, now))
            .collect(),
    }
}

fn usage_percent(total_bytes: u64, limit: u64) -> f64 {
    match (total_bytes, limit) {
        (0, _) => 0.0,
        (_, 0) => 100.0,
        (used, limit) => used as f64 / limit as f64 * 100.0,
    }
}
