//! API Handlers
//!
//! HTTP request handlers for each relay endpoint.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    Json,
};

use crate::cache::{CacheSnapshot, ChunkCache};
use crate::error::Result;
use crate::models::{ClipParams, ClipResponse, CollectParams, CollectResponse, HealthResponse};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Shared chunk cache
    pub cache: Arc<ChunkCache>,
}

impl AppState {
    /// Creates a new AppState around the given cache.
    pub fn new(cache: ChunkCache) -> Self {
        Self {
            cache: Arc::new(cache),
        }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &crate::config::Config) -> Self {
        Self::new(ChunkCache::new(config.cache.clone()))
    }
}

/// Handler for POST /clip-collector?batchId=..&chunkNum=..
///
/// Stores the request body as one chunk of a batch.
pub async fn collect_handler(
    State(state): State<AppState>,
    Query(params): Query<CollectParams>,
    body: Bytes,
) -> Result<Json<CollectResponse>> {
    let batch_id = params.batch_id.unwrap_or_default();
    let key = state
        .cache
        .admit(&batch_id, params.chunk_num.as_deref(), body)?;

    Ok(Json(CollectResponse::new(key)))
}

/// Handler for GET /clip/:batch_id
///
/// Reassembles a batch. A length mismatch is reported in the body, not as
/// an error status.
pub async fn clip_handler(
    State(state): State<AppState>,
    Path(batch_id): Path<String>,
    Query(params): Query<ClipParams>,
) -> Result<Json<ClipResponse>> {
    let reconstruction = state.cache.reconstruct(&batch_id, params.expected_length)?;

    Ok(Json(ClipResponse::from(reconstruction)))
}

/// Handler for GET /diagnostics
pub async fn diagnostics_handler(State(state): State<AppState>) -> Json<CacheSnapshot> {
    Json(state.cache.snapshot())
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{FixedMemory, SystemClock};
    use crate::config::CacheConfig;
    use crate::error::CacheError;
    use uuid::Uuid;

    fn test_state() -> AppState {
        AppState::new(ChunkCache::with_collaborators(
            CacheConfig::default(),
            Arc::new(SystemClock),
            Arc::new(FixedMemory(1 << 30)),
        ))
    }

    fn collect(batch_id: &str, chunk: &str) -> Query<CollectParams> {
        Query(CollectParams {
            batch_id: Some(batch_id.to_string()),
            chunk_num: Some(chunk.to_string()),
        })
    }

    #[tokio::test]
    async fn test_collect_and_clip_handler() {
        let state = test_state();
        let id = Uuid::new_v4().to_string();

        collect_handler(
            State(state.clone()),
            collect(&id, "2"),
            Bytes::from_static(b"world"),
        )
        .await
        .unwrap();
        collect_handler(
            State(state.clone()),
            collect(&id, "1"),
            Bytes::from_static(b"hello "),
        )
        .await
        .unwrap();

        let response = clip_handler(
            State(state),
            Path(id),
            Query(ClipParams {
                expected_length: Some(11),
            }),
        )
        .await
        .unwrap();
        assert_eq!(response.content, "hello world");
        assert!(response.length_matched);
    }

    #[tokio::test]
    async fn test_collect_missing_chunk_number() {
        let state = test_state();
        let params = Query(CollectParams {
            batch_id: Some(Uuid::new_v4().to_string()),
            chunk_num: None,
        });

        let result = collect_handler(State(state), params, Bytes::new()).await;
        assert!(matches!(result, Err(CacheError::MissingChunkNumber(None))));
    }

    #[tokio::test]
    async fn test_collect_missing_batch_id() {
        let state = test_state();
        let result =
            collect_handler(State(state), Query(CollectParams::default()), Bytes::new()).await;
        assert!(matches!(result, Err(CacheError::InvalidBatchId(_))));
    }

    #[tokio::test]
    async fn test_clip_not_found() {
        let state = test_state();
        let result = clip_handler(
            State(state),
            Path(Uuid::new_v4().to_string()),
            Query(ClipParams::default()),
        )
        .await;
        assert!(matches!(result, Err(CacheError::BatchNotFound(_))));
    }

    #[tokio::test]
    async fn test_diagnostics_handler() {
        let state = test_state();
        let id = Uuid::new_v4().to_string();
        collect_handler(State(state.clone()), collect(&id, "1"), Bytes::from_static(b"abc"))
            .await
            .unwrap();

        let response = diagnostics_handler(State(state)).await;
        assert_eq!(response.batch_count, 1);
        assert_eq!(response.total_bytes, 3);
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler().await;
        assert_eq!(response.status, "healthy");
    }
}
