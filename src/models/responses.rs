//! Response DTOs for the relay API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::{ChunkGap, ChunkKey, ChunkNumber, Reconstruction};

/// Response body for `POST /clip-collector`
#[derive(Debug, Clone, Serialize)]
pub struct CollectResponse {
    /// Always "OK"
    pub message: String,
    pub batch_id: String,
    pub chunk_number: ChunkNumber,
}

impl CollectResponse {
    pub fn new(key: ChunkKey) -> Self {
        Self {
            message: "OK".to_string(),
            batch_id: key.batch_id.to_string(),
            chunk_number: key.chunk_number,
        }
    }
}

/// Response body for `GET /clip/:batch_id`
#[derive(Debug, Clone, Serialize)]
pub struct ClipResponse {
    pub batch_id: String,
    /// Reconstructed payload decoded as UTF-8, invalid sequences replaced
    pub content: String,
    /// Reconstructed length in bytes
    pub length: usize,
    pub expected_length: Option<usize>,
    pub length_matched: bool,
    pub chunk_count: usize,
    /// Inclusive `{first, last}` runs of absent chunk numbers
    pub missing_chunks: Vec<ChunkGap>,
}

impl From<Reconstruction> for ClipResponse {
    fn from(r: Reconstruction) -> Self {
        Self {
            batch_id: r.batch_id.to_string(),
            content: String::from_utf8_lossy(&r.payload).into_owned(),
            length: r.payload.len(),
            expected_length: r.expected_length,
            length_matched: r.length_matched,
            chunk_count: r.chunk_count,
            missing_chunks: r.missing_chunks,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
