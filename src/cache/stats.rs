//! Cache Statistics Module
//!
//! Running counters for admissions, reconstructions and evictions.

use serde::Serialize;

// == Cache Stats ==
/// Tracks chunk cache activity since process start.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Chunks stored, including overwrites
    pub chunks_admitted: u64,
    /// Chunks that replaced an existing payload
    pub chunks_overwritten: u64,
    /// Batches created by a first chunk
    pub batches_created: u64,
    /// Admissions refused by validation
    pub admissions_rejected: u64,
    /// Successful reconstructions
    pub reconstructions: u64,
    /// Reconstructions that found no batch
    pub not_found: u64,
    /// Reconstructions whose length differed from the expected one
    pub length_mismatches: u64,
    /// Batches removed by TTL expiry
    pub evicted_ttl: u64,
    /// Batches removed by the batch-count ceiling
    pub evicted_count: u64,
    /// Batches removed by the memory ceiling
    pub evicted_memory: u64,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Total Evictions ==
    pub fn evictions(&self) -> u64 {
        self.evicted_ttl + self.evicted_count + self.evicted_memory
    }

    // == Record Admission ==
    /// Counts a stored chunk.
    pub fn record_admission(&mut self, created_batch: bool, overwrote: bool) {
        self.chunks_admitted += 1;
        if created_batch {
            self.batches_created += 1;
        }
        if overwrote {
            self.chunks_overwritten += 1;
        }
    }

    pub fn record_rejection(&mut self) {
        self.admissions_rejected += 1;
    }

    // == Record Reconstruction ==
    pub fn record_reconstruction(&mut self, length_matched: bool) {
        self.reconstructions += 1;
        if !length_matched {
            self.length_mismatches += 1;
        }
    }

    pub fn record_not_found(&mut self) {
        self.not_found += 1;
    }

    // == Record Sweep ==
    /// Adds the removals of one sweep.
    pub fn record_sweep(&mut self, ttl: usize, count: usize, memory: usize) {
        self.evicted_ttl += ttl as u64;
        self.evicted_count += count as u64;
        self.evicted_memory += memory as u64;
    }
}
