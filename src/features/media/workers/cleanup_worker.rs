use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::modules::storage::MemoryStore;

/// Periodically evicts expired in-memory uploads.
///
/// Lazy expiry on read already hides expired entries; the sweep releases
/// the memory of entries nobody asks for again.
pub struct MediaCleanupWorker {
    store: MemoryStore,
    period: Duration,
}

impl MediaCleanupWorker {
    pub fn new(store: MemoryStore, period: Duration) -> Self {
        Self { store, period }
    }

    /// Run one sweep immediately; returns the number of evicted uploads
    pub async fn sweep_now(&self) -> usize {
        let evicted = self.store.sweep().await;
        if evicted > 0 {
            tracing::info!(evicted, "Media cleanup sweep completed");
        } else {
            tracing::debug!("Media cleanup sweep found nothing to evict");
        }
        evicted
    }

    /// Sweep every `period` until `cancel` fires
    pub async fn run(self, cancel: CancellationToken) {
        tracing::info!(
            "Starting media cleanup worker (every {}s)",
            self.period.as_secs()
        );

        let mut ticker = interval_at(Instant::now() + self.period, self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Media cleanup worker stopped");
                    break;
                }
                _ = ticker.tick() => {
                    self.sweep_now().await;
                }
            }
        }
    }

    pub fn spawn(self, cancel: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(self.run(cancel))
    }
}
