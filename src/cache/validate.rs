//! Admission Validator
//!
//! Checks batch id and chunk number well-formedness before anything is stored.
//! Rules run in a fixed order and the first failure wins:
//!
//! 1. batch id parses as a UUID
//! 2. chunk number is present and an integer
//! 3. chunk number is positive
//! 4. chunk number does not exceed the configured maximum

use std::num::IntErrorKind;

use uuid::Uuid;

use crate::cache::{BatchId, ChunkNumber};
use crate::error::{CacheError, Result};

// == Validated Chunk ==
/// A batch id / chunk number pair that passed every admission rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkKey {
    pub batch_id: BatchId,
    pub chunk_number: ChunkNumber,
}

// == Validate ==
/// Validates raw admission inputs as they arrive from a request.
pub fn validate_chunk(
    batch_id: &str,
    chunk_number: Option<&str>,
    max_chunk_number: u64,
) -> Result<ChunkKey> {
    let batch_id = parse_batch_id(batch_id)?;

    let raw = chunk_number
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(CacheError::MissingChunkNumber(None))?;

    let chunk_number = match raw.parse::<i64>() {
        Ok(n) => check_chunk_number(n, max_chunk_number)?,
        Err(e) => {
            return Err(match e.kind() {
                // Integers too wide for i64 are still integers
                IntErrorKind::PosOverflow => CacheError::ChunkNumberTooLarge {
                    value: raw.to_string(),
                    max: max_chunk_number,
                },
                IntErrorKind::NegOverflow => CacheError::InvalidChunkNumber(raw.to_string()),
                _ => CacheError::MissingChunkNumber(Some(raw.to_string())),
            })
        }
    };

    Ok(ChunkKey {
        batch_id,
        chunk_number,
    })
}

/// Parses a client-supplied batch id.
pub fn parse_batch_id(raw: &str) -> Result<BatchId> {
    Uuid::parse_str(raw.trim()).map_err(|_| CacheError::InvalidBatchId(raw.to_string()))
}

/// Applies the positivity and upper-bound rules to an already-numeric chunk number.
pub fn check_chunk_number(n: i64, max_chunk_number: u64) -> Result<ChunkNumber> {
    if n <= 0 {
        return Err(CacheError::InvalidChunkNumber(n.to_string()));
    }
    let n = n as u64;
    if n > max_chunk_number {
        return Err(CacheError::ChunkNumberTooLarge {
            value: n.to_string(),
            max: max_chunk_number,
        });
    }
    Ok(n)
}
