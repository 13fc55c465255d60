//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - Sweep: evicts expired and excess batches even when no requests arrive

mod sweep;

pub use sweep::spawn_sweep_task;
