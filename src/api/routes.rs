//! API Routes
//!
//! Configures the Axum router with all relay endpoints.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    clip_handler, collect_handler, diagnostics_handler, health_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `POST /clip-collector` - Admit one chunk (`batchId`, `chunkNum` query params)
/// - `GET /clip/:batch_id` - Reconstruct a batch (optional `expectedLength`)
/// - `GET /diagnostics` - Cache snapshot
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - Body limit: disabled, chunk size is bounded only by the memory ceiling
/// - CORS: any origin, since chunks are posted from arbitrary pages
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/clip-collector", post(collect_handler))
        .route("/clip/:batch_id", get(clip_handler))
        .route("/diagnostics", get(diagnostics_handler))
        .route("/health", get(health_handler))
        .layer(DefaultBodyLimit::disable())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
