//! Batch Module
//!
//! One logical multi-chunk upload and its stored chunks.

use std::collections::BTreeMap;

use bytes::Bytes;
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

/// Client-generated batch identifier.
pub type BatchId = Uuid;

/// Position of a chunk within its batch, starting at 1.
pub type ChunkNumber = u64;

// == Batch ==
/// A batch record: creation stamp plus chunks keyed by chunk number.
#[derive(Debug, Clone)]
pub struct Batch {
    /// Batch identifier
    pub id: BatchId,
    /// Time the first chunk was admitted, never updated afterward
    pub created_at: DateTime<Utc>,
    /// Admission sequence number, breaks `created_at` ties
    pub seq: u64,
    /// Chunk payloads in ascending chunk-number order
    chunks: BTreeMap<ChunkNumber, Bytes>,
    /// Sum of all payload lengths
    size_bytes: u64,
}

impl Batch {
    // == Constructor ==
    /// Creates an empty batch stamped with `created_at`.
    pub fn new(id: BatchId, created_at: DateTime<Utc>, seq: u64) -> Self {
        Self {
            id,
            created_at,
            seq,
            chunks: BTreeMap::new(),
            size_bytes: 0,
        }
    }

    // == Put Chunk ==
    /// Stores a chunk, replacing any payload already held under `number`.
    ///
    /// Returns the replaced payload, if any.
    pub fn put_chunk(&mut self, number: ChunkNumber, payload: Bytes) -> Option<Bytes> {
        self.size_bytes += payload.len() as u64;
        let previous = self.chunks.insert(number, payload);
        if let Some(old) = &previous {
            self.size_bytes -= old.len() as u64;
        }
        previous
    }

    // == Chunk Access ==
    /// Returns the payload stored under `number`.
    pub fn chunk(&self, number: ChunkNumber) -> Option<&Bytes> {
        self.chunks.get(&number)
    }

    /// Iterates chunks in ascending chunk-number order.
    pub fn chunks(&self) -> impl Iterator<Item = (ChunkNumber, &Bytes)> {
        self.chunks.iter().map(|(n, b)| (*n, b))
    }

    /// Sorted chunk numbers present.
    pub fn chunk_numbers(&self) -> Vec<ChunkNumber> {
        self.chunks.keys().copied().collect()
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Total payload bytes held by this batch.
    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    // == Age ==
    /// Time elapsed since creation, zero if the clock went backwards.
    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        let age = now - self.created_at;
        if age < Duration::zero() {
            Duration::zero()
        } else {
            age
        }
    }

    // == Is Expired ==
    /// A batch is expired once its age strictly exceeds the TTL.
    pub fn is_expired(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now - self.created_at > ttl
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn batch() -> Batch {
        Batch::new(Uuid::new_v4(), Utc::now(), 0)
    }

    #[test]
    fn test_batch_starts_empty() {
        let b = batch();
        assert_eq!(b.chunk_count(), 0);
        assert_eq!(b.size_bytes(), 0);
        assert!(b.chunk_numbers().is_empty());
    }

    #[test]
    fn test_put_chunk_tracks_size() {
        let mut b = batch();
        assert!(b.put_chunk(2, Bytes::from_static(b"world")).is_none());
        assert!(b.put_chunk(1, Bytes::from_static(b"hello ")).is_none());

        assert_eq!(b.size_bytes(), 11);
        assert_eq!(b.chunk_numbers(), vec![1, 2]);
    }

    #[test]
    fn test_put_chunk_overwrite() {
        let mut b = batch();
        b.put_chunk(1, Bytes::from_static(b"first"));
        let old = b.put_chunk(1, Bytes::from_static(b"x"));

        assert_eq!(old, Some(Bytes::from_static(b"first")));
        assert_eq!(b.chunk(1), Some(&Bytes::from_static(b"x")));
        assert_eq!(b.size_bytes(), 1);
        assert_eq!(b.chunk_count(), 1);
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let created = Utc::now();
        let b = Batch::new(Uuid::new_v4(), created, 0);
        let ttl = Duration::seconds(600);

        assert!(!b.is_expired(created + ttl - Duration::milliseconds(1), ttl));
        // Exactly at the TTL the batch is still alive
        assert!(!b.is_expired(created + ttl, ttl));
        assert!(b.is_expired(created + ttl + Duration::milliseconds(1), ttl));
    }

    #[test]
    fn test_age_never_negative() {
        let created = Utc::now();
        let b = Batch::new(Uuid::new_v4(), created, 0);
        assert_eq!(b.age(created - Duration::seconds(10)), Duration::zero());
        assert_eq!(b.age(created + Duration::seconds(3)), Duration::seconds(3));
    }
}
