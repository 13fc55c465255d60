//! API Module
//!
//! HTTP handlers and routing for the chunk relay.
//!
//! # Endpoints
//! - `POST /clip-collector` - Admit one chunk of a batch
//! - `GET /clip/:batch_id` - Reconstruct a batch
//! - `GET /diagnostics` - Cache snapshot
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
