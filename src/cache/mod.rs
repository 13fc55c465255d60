//! Cache Module
//!
//! Chunked transfer cache: admits numbered chunks of a batch, reconstructs
//! the batch on demand, and sweeps stale or excess batches under TTL, count
//! and memory budgets.

mod age;
mod batch;
mod chunk_cache;
mod clock;
mod memory;
mod reconstruct;
mod snapshot;
mod stats;
mod store;
mod sweep;
mod validate;


// Re-export public types
pub use age::AgeIndex;
pub use batch::{Batch, BatchId, ChunkNumber};
pub use chunk_cache::ChunkCache;
pub use clock::{Clock, ManualClock, SystemClock};
pub use memory::{memory_limit, FixedMemory, MemoryProbe, SystemMemory};
pub use reconstruct::{reconstruct, ChunkGap, Reconstruction};
pub use snapshot::{build_snapshot, BatchSummary, CacheSnapshot};
pub use stats::CacheStats;
pub use store::{Admission, BatchStore};
pub use sweep::{sweep, SweepLimits, SweepReport};
pub use validate::{check_chunk_number, parse_batch_id, validate_chunk, ChunkKey};
