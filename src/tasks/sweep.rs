//! Expiry Sweep Task
//!
//! Background task that periodically removes expired entries from the
//! in-process fallback store, bounding memory held by keys nobody reads again.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::MemoryStore;

/// Cancellation handle for a running sweep task.
///
/// The task stops on [`shutdown`](Self::shutdown) or when the handle is dropped.
#[derive(Debug)]
pub struct SweepHandle {
    handle: JoinHandle<()>,
}

impl SweepHandle {
    /// Stops the sweep. Idempotent.
    pub fn shutdown(&self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for SweepHandle {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Spawns a task that purges expired entries from `store` every `interval`.
///
/// Must be called from within a tokio runtime.
///
/// # Example
/// ```ignore
/// let store = Arc::new(MemoryStore::new());
/// let sweeper = spawn_sweep_task(store.clone(), Duration::from_secs(60));
/// // Later, during shutdown:
/// sweeper.shutdown();
/// ```
pub fn spawn_sweep_task(store: Arc<MemoryStore>, interval: Duration) -> SweepHandle {
    let handle = tokio::spawn(async move {
        info!(
            interval_secs = interval.as_secs(),
            "Starting fallback store sweep task"
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = store.purge_expired().await;

            if removed > 0 {
                info!(removed, "Sweep: removed expired entries");
            } else {
                debug!("Sweep: no expired entries found");
            }
        }
    });

    SweepHandle { handle }
}
