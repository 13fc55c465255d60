//! Request DTOs for the relay API
//!
//! Query parameters of incoming requests. Chunk payloads travel as the raw
//! request body and are not modeled here.

use serde::Deserialize;

/// Query string of `POST /clip-collector`
///
/// Both fields are kept as raw strings so the admission validator can tell a
/// missing value from a malformed one.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CollectParams {
    /// Client-generated batch UUID
    #[serde(rename = "batchId", alias = "batch_id", default)]
    pub batch_id: Option<String>,
    /// 1-based chunk number
    #[serde(rename = "chunkNum", alias = "chunk_num", default)]
    pub chunk_num: Option<String>,
}

/// Query string of `GET /clip/:batch_id`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClipParams {
    /// Total payload length the client expects
    #[serde(rename = "expectedLength", alias = "expected_length", default)]
    pub expected_length: Option<usize>,
}
