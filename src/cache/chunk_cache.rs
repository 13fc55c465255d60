//! Chunk Cache
//!
//! The process-wide cache handed to request handlers. Wraps the batch store
//! behind a single lock and runs an eviction sweep ahead of every admission
//! and reconstruction.

use std::sync::Arc;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::cache::{
    build_snapshot, memory_limit, parse_batch_id, reconstruct, sweep, validate_chunk, Admission,
    BatchStore, CacheSnapshot, CacheStats, ChunkKey, Clock, MemoryProbe, Reconstruction,
    SweepLimits, SweepReport, SystemClock, SystemMemory,
};
use crate::config::CacheConfig;
use crate::error::{CacheError, Result};

struct CacheState {
    store: BatchStore,
    stats: CacheStats,
}

// == Chunk Cache ==
/// Thread-safe chunk cache.
///
/// Every operation is synchronous and holds the lock only for in-memory work.
/// Two racing writes to the same `(batch, chunk)` slot resolve in lock
/// acquisition order; no arrival-order guarantee is made.
pub struct ChunkCache {
    state: Mutex<CacheState>,
    config: CacheConfig,
    clock: Arc<dyn Clock>,
    memory: Arc<dyn MemoryProbe>,
}

impl ChunkCache {
    // == Constructors ==
    /// Creates a cache reading the system clock and system memory.
    pub fn new(config: CacheConfig) -> Self {
        Self::with_collaborators(config, Arc::new(SystemClock), Arc::new(SystemMemory::new()))
    }

    /// Creates a cache with explicit time and memory sources.
    pub fn with_collaborators(
        config: CacheConfig,
        clock: Arc<dyn Clock>,
        memory: Arc<dyn MemoryProbe>,
    ) -> Self {
        Self {
            state: Mutex::new(CacheState {
                store: BatchStore::new(),
                stats: CacheStats::new(),
            }),
            config: config.normalized(),
            clock,
            memory,
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    // == Admit ==
    /// Sweeps, validates, then stores one chunk.
    ///
    /// A repeated chunk number overwrites the earlier payload.
    pub fn admit(
        &self,
        batch_id: &str,
        chunk_number: Option<&str>,
        payload: Bytes,
    ) -> Result<ChunkKey> {
        let limits = self.sweep_limits();
        let now = self.clock.now();
        let mut state = self.state.lock();
        Self::sweep_locked(&mut state, now, &limits);

        let key = match validate_chunk(batch_id, chunk_number, self.config.max_chunk_number) {
            Ok(key) => key,
            Err(e) => {
                state.stats.record_rejection();
                warn!(batch_id, error = %e, "rejected chunk");
                return Err(e);
            }
        };

        let size = payload.len();
        let admission = Self::store_locked(&mut state, key, payload, now);
        debug!(
            batch_id = %key.batch_id,
            chunk_number = key.chunk_number,
            size,
            created_batch = admission.created_batch,
            overwrote = admission.overwrote,
            "admitted chunk"
        );
        Ok(key)
    }

    // == Reconstruct ==
    /// Sweeps, then joins the batch's chunks in ascending chunk-number order.
    ///
    /// The batch stays in the cache afterwards. An id that is not a UUID is
    /// reported as `BatchNotFound`, since it could never have been admitted.
    pub fn reconstruct(
        &self,
        batch_id: &str,
        expected_length: Option<usize>,
    ) -> Result<Reconstruction> {
        let limits = self.sweep_limits();
        let now = self.clock.now();
        let mut guard = self.state.lock();
        Self::sweep_locked(&mut guard, now, &limits);
        let CacheState { store, stats } = &mut *guard;

        let batch = parse_batch_id(batch_id)
            .map_err(|_| CacheError::BatchNotFound(batch_id.to_string()))
            .and_then(|id| store.get(&id));
        let result = match batch {
            Ok(batch) => reconstruct(batch, expected_length),
            Err(e) => {
                stats.record_not_found();
                debug!(batch_id, "batch not found");
                return Err(e);
            }
        };
        stats.record_reconstruction(result.length_matched);
        drop(guard);

        if !result.length_matched {
            warn!(
                batch_id = %result.batch_id,
                expected = ?result.expected_length,
                actual = result.payload.len(),
                "reconstructed length differs from expected"
            );
        }
        if result.has_gaps() {
            debug!(
                batch_id = %result.batch_id,
                missing = ?result.missing_chunks,
                "reconstructed batch has gaps"
            );
        }
        Ok(result)
    }

    // == Snapshot ==
    /// Read-only view of cache state; does not sweep.
    pub fn snapshot(&self) -> CacheSnapshot {
        let available = self.memory.available_bytes();
        let now = self.clock.now();
        let state = self.state.lock();
        build_snapshot(&state.store, &state.stats, &self.config, now, available)
    }

    // == Sweep ==
    /// Runs an eviction sweep on its own.
    pub fn sweep(&self) -> SweepReport {
        let limits = self.sweep_limits();
        let now = self.clock.now();
        let mut state = self.state.lock();
        Self::sweep_locked(&mut state, now, &limits)
    }

    // == Counters ==
    pub fn batch_count(&self) -> usize {
        self.state.lock().store.batch_count()
    }

    pub fn total_bytes(&self) -> u64 {
        self.state.lock().store.total_bytes()
    }

    pub fn stats(&self) -> CacheStats {
        self.state.lock().stats.clone()
    }

    fn sweep_limits(&self) -> SweepLimits {
        let available = self.memory.available_bytes();
        SweepLimits::new(
            &self.config,
            memory_limit(available, self.config.memory_limit_fraction),
        )
    }

    fn sweep_locked(
        state: &mut CacheState,
        now: DateTime<Utc>,
        limits: &SweepLimits,
    ) -> SweepReport {
        let report = sweep(&mut state.store, now, limits);
        if !report.is_empty() {
            state
                .stats
                .record_sweep(report.expired, report.over_count, report.over_memory);
            info!(
                expired = report.expired,
                over_count = report.over_count,
                over_memory = report.over_memory,
                remaining = state.store.batch_count(),
                total_bytes = state.store.total_bytes(),
                evicted_since_start = state.stats.evictions(),
                "sweep evicted batches"
            );
        }
        report
    }

    fn store_locked(
        state: &mut CacheState,
        key: ChunkKey,
        payload: Bytes,
        now: DateTime<Utc>,
    ) -> Admission {
        let admission = state
            .store
            .admit(key.batch_id, key.chunk_number, payload, now);
        state
            .stats
            .record_admission(admission.created_batch, admission.overwrote);
        admission
    }
}

impl std::fmt::Debug for ChunkCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChunkCache")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
