//! Eviction Sweeper
//!
//! Removes batches by three criteria applied in a fixed order, each pass
//! seeing the store as the previous one left it:
//!
//! 1. TTL expiry
//! 2. batch-count ceiling, oldest first
//! 3. memory ceiling, oldest first

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::debug;

use crate::cache::BatchStore;
use crate::config::CacheConfig;

// == Sweep Limits ==
/// Thresholds for one sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepLimits {
    pub ttl: Duration,
    pub max_batches: usize,
    /// Byte ceiling, already derived from available memory
    pub memory_limit: u64,
}

impl SweepLimits {
    pub fn new(config: &CacheConfig, memory_limit: u64) -> Self {
        Self {
            ttl: i64::try_from(config.ttl_secs)
                .ok()
                .and_then(Duration::try_seconds)
                .unwrap_or(Duration::MAX),
            max_batches: config.max_batches,
            memory_limit,
        }
    }
}

// == Sweep Report ==
/// Batches removed by each criterion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    pub expired: usize,
    pub over_count: usize,
    pub over_memory: usize,
}

impl SweepReport {
    pub fn total(&self) -> usize {
        self.expired + self.over_count + self.over_memory
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

// == Sweep ==
/// Runs all three criteria against `store`.
pub fn sweep(store: &mut BatchStore, now: DateTime<Utc>, limits: &SweepLimits) -> SweepReport {
    let expired = evict_expired(store, now, limits.ttl);
    let over_count = evict_over_count(store, limits.max_batches);
    let over_memory = evict_over_memory(store, limits.memory_limit);

    SweepReport {
        expired,
        over_count,
        over_memory,
    }
}

/// Removes every batch older than `ttl`.
///
/// The age index is ordered by `created_at`, so expired batches always form
/// a prefix of it.
fn evict_expired(store: &mut BatchStore, now: DateTime<Utc>, ttl: Duration) -> usize {
    let mut removed = 0;
    while let Some((id, created_at)) = store.oldest() {
        if now - created_at <= ttl {
            break;
        }
        if store.remove(&id).is_ok() {
            debug!(batch_id = %id, "evicted expired batch");
            removed += 1;
        }
    }
    removed
}

fn evict_over_count(store: &mut BatchStore, max_batches: usize) -> usize {
    let mut removed = 0;
    while store.batch_count() > max_batches {
        match store.pop_oldest() {
            Some(batch) => {
                debug!(batch_id = %batch.id, "evicted batch over count ceiling");
                removed += 1;
            }
            None => break,
        }
    }
    removed
}

fn evict_over_memory(store: &mut BatchStore, memory_limit: u64) -> usize {
    let mut removed = 0;
    while store.total_bytes() > memory_limit {
        match store.pop_oldest() {
            Some(batch) => {
                debug!(
                    batch_id = %batch.id,
                    size_bytes = batch.size_bytes(),
                    "evicted batch over memory ceiling"
                );
                removed += 1;
            }
            None => break,
        }
    }
    removed
}
