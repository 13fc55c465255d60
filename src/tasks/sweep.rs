//! Periodic Sweep Task
//!
//! Background task that runs the eviction sweep on a timer. Admissions and
//! reconstructions still sweep inline; this only keeps an idle cache from
//! holding stale batches until the next request.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::ChunkCache;

/// Spawns a background task that periodically sweeps the chunk cache.
///
/// The task runs in an infinite loop, sleeping for the specified interval
/// between sweeps.
///
/// # Arguments
/// * `cache` - shared chunk cache
/// * `interval_secs` - Interval in seconds between sweeps, must be non-zero
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
///
/// # Example
/// ```ignore
/// let cache = Arc::new(ChunkCache::new(CacheConfig::default()));
/// let sweep_handle = spawn_sweep_task(cache.clone(), 30);
/// // Later, during shutdown:
/// sweep_handle.abort();
/// ```
pub fn spawn_sweep_task(cache: Arc<ChunkCache>, interval_secs: u64) -> JoinHandle<()> {
    let interval = Duration::from_secs(interval_secs.max(1));

    tokio::spawn(async move {
        info!(
            "Starting sweep task with interval of {} seconds",
            interval.as_secs()
        );

        loop {
            tokio::time::sleep(interval).await;

            let report = cache.sweep();

            if report.is_empty() {
                debug!("Periodic sweep: nothing to evict");
            } else {
                info!(
                    "Periodic sweep: removed {} batches ({} expired, {} over count, {} over memory)",
                    report.total(),
                    report.expired,
                    report.over_count,
                    report.over_memory
                );
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{FixedMemory, ManualClock};
    use crate::config::CacheConfig;
    use bytes::Bytes;
    use chrono::Utc;
    use uuid::Uuid;

    fn test_cache() -> (Arc<ChunkCache>, ManualClock) {
        let clock = ManualClock::new(Utc::now());
        let cache = ChunkCache::with_collaborators(
            CacheConfig {
                ttl_secs: 60,
                ..CacheConfig::default()
            },
            Arc::new(clock.clone()),
            Arc::new(FixedMemory(1 << 30)),
        );
        (Arc::new(cache), clock)
    }

    #[tokio::test]
    async fn test_sweep_task_removes_expired_batches() {
        let (cache, clock) = test_cache();
        let id = Uuid::new_v4().to_string();
        cache
            .admit(&id, Some("1"), Bytes::from_static(b"stale"))
            .unwrap();

        let handle = spawn_sweep_task(cache.clone(), 1);

        clock.advance(chrono::Duration::seconds(61));
        tokio::time::sleep(Duration::from_millis(1500)).await;

        assert_eq!(cache.batch_count(), 0, "Expired batch should have been swept");
        assert_eq!(cache.stats().evicted_ttl, 1);

        handle.abort();
    }

    #[tokio::test]
    async fn test_sweep_task_preserves_fresh_batches() {
        let (cache, _clock) = test_cache();
        let id = Uuid::new_v4().to_string();
        cache
            .admit(&id, Some("1"), Bytes::from_static(b"fresh"))
            .unwrap();

        let handle = spawn_sweep_task(cache.clone(), 1);
        tokio::time::sleep(Duration::from_millis(1500)).await;

        assert_eq!(cache.batch_count(), 1, "Fresh batch should not be removed");

        handle.abort();
    }

    #[tokio::test]
    async fn test_sweep_task_can_be_aborted() {
        let (cache, _clock) = test_cache();

        let handle = spawn_sweep_task(cache, 1);
        handle.abort();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(handle.is_finished(), "Task should be finished after abort");
    }
}
