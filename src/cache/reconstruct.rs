//! Reconstructor
//!
//! Concatenates a batch's chunks in ascending chunk-number order. Gaps in the
//! numbering are skipped, not filled; they are listed in `missing_chunks` as
//! inclusive ranges so callers can decide whether to trust a partial payload.

use bytes::{Bytes, BytesMut};
use serde::Serialize;

use crate::cache::{Batch, BatchId, ChunkNumber};

// == Chunk Gap ==
/// An inclusive run of chunk numbers that were never admitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChunkGap {
    pub first: ChunkNumber,
    pub last: ChunkNumber,
}

// == Reconstruction ==
/// The reassembled payload of one batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconstruction {
    pub batch_id: BatchId,
    /// Chunks joined in ascending chunk-number order
    pub payload: Bytes,
    /// Length the caller said to expect, if any
    pub expected_length: Option<usize>,
    /// False only when an expected length was given and differs
    pub length_matched: bool,
    pub chunk_count: usize,
    /// Runs between 1 and the highest present chunk that were never admitted.
    /// One entry per gap, so this grows with the chunks held, not their numbers.
    pub missing_chunks: Vec<ChunkGap>,
}

impl Reconstruction {
    pub fn has_gaps(&self) -> bool {
        !self.missing_chunks.is_empty()
    }
}

// == Reconstruct ==
/// Builds the payload for `batch`, comparing against `expected_length` if given.
pub fn reconstruct(batch: &Batch, expected_length: Option<usize>) -> Reconstruction {
    let payload = concat_chunks(batch);
    let length_matched = expected_length.map_or(true, |expected| expected == payload.len());

    Reconstruction {
        batch_id: batch.id,
        payload,
        expected_length,
        length_matched,
        chunk_count: batch.chunk_count(),
        missing_chunks: missing_chunks(batch),
    }
}

fn concat_chunks(batch: &Batch) -> Bytes {
    if batch.chunk_count() == 1 {
        if let Some((_, only)) = batch.chunks().next() {
            return only.clone();
        }
    }

    let mut buf = BytesMut::with_capacity(batch.size_bytes() as usize);
    for (_, chunk) in batch.chunks() {
        buf.extend_from_slice(chunk);
    }
    buf.freeze()
}

fn missing_chunks(batch: &Batch) -> Vec<ChunkGap> {
    let mut missing = Vec::new();
    let mut next: ChunkNumber = 1;
    for (number, _) in batch.chunks() {
        if number > next {
            missing.push(ChunkGap {
                first: next,
                last: number - 1,
            });
        }
        next = number.saturating_add(1);
    }
    missing
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn batch_with(chunks: &[(ChunkNumber, &'static str)]) -> Batch {
        let mut batch = Batch::new(Uuid::new_v4(), Utc::now(), 0);
        for (n, s) in chunks {
            batch.put_chunk(*n, Bytes::from_static(s.as_bytes()));
        }
        batch
    }

    #[test]
    fn test_reconstruct_orders_by_chunk_number() {
        let batch = batch_with(&[(2, "world"), (1, "hello ")]);

        let r = reconstruct(&batch, Some(11));
        assert_eq!(r.payload, Bytes::from_static(b"hello world"));
        assert!(r.length_matched);
        assert_eq!(r.chunk_count, 2);
        assert!(!r.has_gaps());
    }

    #[test]
    fn test_length_mismatch_still_returns_payload() {
        let batch = batch_with(&[(2, "world"), (1, "hello ")]);

        let r = reconstruct(&batch, Some(5));
        assert!(!r.length_matched);
        assert_eq!(r.payload.len(), 11);
        assert_eq!(r.expected_length, Some(5));
    }

    #[test]
    fn test_no_expected_length_counts_as_match() {
        let batch = batch_with(&[(1, "abc")]);
        assert!(reconstruct(&batch, None).length_matched);
    }

    #[test]
    fn test_numeric_not_lexical_order() {
        let batch = batch_with(&[(10, "c"), (2, "b"), (1, "a")]);
        let r = reconstruct(&batch, None);
        assert_eq!(r.payload, Bytes::from_static(b"abc"));
    }

    #[test]
    fn test_gaps_are_skipped_and_reported() {
        let batch = batch_with(&[(5, "e"), (1, "a"), (3, "c")]);

        let r = reconstruct(&batch, None);
        assert_eq!(r.payload, Bytes::from_static(b"ace"));
        assert_eq!(
            r.missing_chunks,
            vec![ChunkGap { first: 2, last: 2 }, ChunkGap { first: 4, last: 4 }]
        );
    }

    #[test]
    fn test_leading_gap_reported() {
        let batch = batch_with(&[(3, "c")]);
        let r = reconstruct(&batch, Some(1));
        assert_eq!(r.missing_chunks, vec![ChunkGap { first: 1, last: 2 }]);
        assert!(r.length_matched);
    }

    #[test]
    fn test_sparse_batch_reports_one_range_per_gap() {
        let batch = batch_with(&[(1, "a"), (10_000, "z")]);

        let r = reconstruct(&batch, Some(2));
        assert_eq!(r.payload, Bytes::from_static(b"az"));
        assert_eq!(r.missing_chunks, vec![ChunkGap { first: 2, last: 9_999 }]);
    }

    #[test]
    fn test_huge_chunk_number_stays_one_range() {
        let batch = batch_with(&[(30_000_000, "x")]);

        let r = reconstruct(&batch, None);
        assert_eq!(r.missing_chunks.len(), 1);
        assert_eq!(r.missing_chunks[0], ChunkGap { first: 1, last: 29_999_999 });
    }

    #[test]
    fn test_empty_chunks_contribute_nothing() {
        let batch = batch_with(&[(1, ""), (2, "x")]);
        let r = reconstruct(&batch, Some(1));
        assert_eq!(r.payload, Bytes::from_static(b"x"));
        assert!(r.length_matched);
    }
}
