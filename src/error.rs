//! Error types for the chunk relay
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for chunk admission and batch reconstruction.
///
/// Eviction never shows up here: it is housekeeping, visible only through
/// diagnostics or a later `BatchNotFound`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Batch id is not a syntactically valid UUID
    #[error("Invalid batch id: {0:?}")]
    InvalidBatchId(String),

    /// Chunk number absent or not an integer
    #[error("Missing or non-numeric chunk number: {0:?}")]
    MissingChunkNumber(Option<String>),

    /// Chunk number is zero or negative
    #[error("Chunk number must be positive, got {0}")]
    InvalidChunkNumber(String),

    /// Chunk number above the configured maximum
    #[error("Chunk number {value} exceeds maximum of {max}")]
    ChunkNumberTooLarge { value: String, max: u64 },

    /// Batch never admitted, or already evicted
    #[error("Batch not found: {0}")]
    BatchNotFound(String),
}

impl CacheError {
    /// Short machine-readable name of the failure kind.
    pub fn kind(&self) -> &'static str {
        match self {
            CacheError::InvalidBatchId(_) => "InvalidBatchId",
            CacheError::MissingChunkNumber(_) => "MissingChunkNumber",
            CacheError::InvalidChunkNumber(_) => "InvalidChunkNumber",
            CacheError::ChunkNumberTooLarge { .. } => "ChunkNumberTooLarge",
            CacheError::BatchNotFound(_) => "BatchNotFound",
        }
    }

    /// True for failures raised by admission validation.
    pub fn is_validation(&self) -> bool {
        !matches!(self, CacheError::BatchNotFound(_))
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = if self.is_validation() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::NOT_FOUND
        };

        let body = Json(json!({
            "error": self.to_string(),
            "kind": self.kind(),
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the chunk relay.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names() {
        assert_eq!(
            CacheError::InvalidBatchId("x".into()).kind(),
            "InvalidBatchId"
        );
        assert_eq!(
            CacheError::MissingChunkNumber(None).kind(),
            "MissingChunkNumber"
        );
        assert_eq!(
            CacheError::ChunkNumberTooLarge {
                value: "10001".into(),
                max: 10000
            }
            .kind(),
            "ChunkNumberTooLarge"
        );
    }

    #[test]
    fn test_status_mapping() {
        let resp = CacheError::InvalidChunkNumber("0".into()).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = CacheError::BatchNotFound("abc".into()).into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_display_mentions_limit() {
        let err = CacheError::ChunkNumberTooLarge {
            value: "10001".into(),
            max: 10000,
        };
        assert!(err.to_string().contains("10000"));
    }
}
