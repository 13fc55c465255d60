//! Batch Store Module
//!
//! Holds chunk payloads keyed by (batch id, chunk number), with O(1) running
//! totals for batch count and stored bytes.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use bytes::Bytes;
use chrono::{DateTime, Utc};

use crate::cache::{AgeIndex, Batch, BatchId, ChunkNumber};
use crate::error::{CacheError, Result};

// == Admission Outcome ==
/// What a single `admit` did to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Admission {
    /// The chunk opened a new batch
    pub created_batch: bool,
    /// The chunk replaced a payload already held under its number
    pub overwrote: bool,
}

// == Batch Store ==
/// Map of batch id to batch record, plus an oldest-first index.
///
/// Not synchronized on its own; `ChunkCache` owns it behind a lock.
#[derive(Debug, Default)]
pub struct BatchStore {
    /// Batch storage
    batches: HashMap<BatchId, Batch>,
    /// Creation-order tracker
    ages: AgeIndex,
    /// Sum of all chunk payload lengths across all batches
    total_bytes: u64,
    /// Next admission sequence number
    next_seq: u64,
}

impl BatchStore {
    // == Constructor ==
    pub fn new() -> Self {
        Self::default()
    }

    // == Admit ==
    /// Stores or overwrites a chunk.
    ///
    /// The first chunk of a batch creates the batch and stamps `created_at`
    /// with `now`; later chunks leave the stamp alone.
    pub fn admit(
        &mut self,
        id: BatchId,
        number: ChunkNumber,
        payload: Bytes,
        now: DateTime<Utc>,
    ) -> Admission {
        let incoming = payload.len() as u64;

        let (batch, created_batch) = match self.batches.entry(id) {
            Entry::Occupied(slot) => (slot.into_mut(), false),
            Entry::Vacant(slot) => {
                let seq = self.next_seq;
                self.next_seq += 1;
                self.ages.insert(now, seq, id);
                (slot.insert(Batch::new(id, now, seq)), true)
            }
        };
        let previous = batch.put_chunk(number, payload);

        self.total_bytes += incoming;
        if let Some(old) = &previous {
            self.total_bytes -= old.len() as u64;
        }

        Admission {
            created_batch,
            overwrote: previous.is_some(),
        }
    }

    // == Get ==
    /// Returns the batch record for `id`.
    pub fn get(&self, id: &BatchId) -> Result<&Batch> {
        self.batches
            .get(id)
            .ok_or_else(|| CacheError::BatchNotFound(id.to_string()))
    }

    // == Remove ==
    /// Deletes a batch and gives back its record.
    pub fn remove(&mut self, id: &BatchId) -> Result<Batch> {
        let batch = self
            .batches
            .remove(id)
            .ok_or_else(|| CacheError::BatchNotFound(id.to_string()))?;
        self.ages.remove(batch.created_at, batch.seq, batch.id);
        self.total_bytes -= batch.size_bytes();
        Ok(batch)
    }

    // == Oldest ==
    /// Id and creation time of the oldest batch.
    pub fn oldest(&self) -> Option<(BatchId, DateTime<Utc>)> {
        self.ages.peek_oldest()
    }

    /// Removes and returns the oldest batch.
    pub fn pop_oldest(&mut self) -> Option<Batch> {
        let (id, _) = self.oldest()?;
        self.remove(&id).ok()
    }

    /// Iterates batches oldest-first.
    pub fn iter_oldest_first(&self) -> impl Iterator<Item = &Batch> + '_ {
        self.ages
            .iter_oldest_first()
            .filter_map(|id| self.batches.get(&id))
    }

    // == Counters ==
    /// Total payload bytes across all batches.
    pub fn total_bytes(&self) -> u64 {
        self.total_bytes
    }

    pub fn batch_count(&self) -> usize {
        self.batches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }
}
