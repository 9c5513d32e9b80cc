//! Background service that evicts abandoned scratch directories.
//!
//! Clients are expected to call `DELETE /cleanup/{request_id}`; directories
//! whose owners never did are removed once older than the configured TTL.

use std::time::Duration;

use tokio::time::interval;
use tracing::{error, info};

use odr_storage::ScratchStore;

use crate::metrics;

/// Upper bound on the interval between sweeps.
const MAX_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Scratch directory sweeper.
pub struct ScratchSweeper {
    scratch: ScratchStore,
    ttl: Option<Duration>,
}

impl ScratchSweeper {
    /// Create a sweeper; `ttl` of `None` disables it.
    pub fn new(scratch: ScratchStore, ttl: Option<Duration>) -> Self {
        Self { scratch, ttl }
    }

    /// Sweep interval: a quarter of the TTL, capped at one minute.
    pub fn sweep_interval(ttl: Duration) -> Duration {
        (ttl / 4).clamp(Duration::from_secs(1), MAX_SWEEP_INTERVAL)
    }

    /// Start the background sweep loop.
    ///
    /// This function runs indefinitely and should be spawned as a background task.
    pub async fn run(&self) {
        let Some(ttl) = self.ttl else {
            info!("Scratch sweeper is disabled");
            return;
        };

        let period = Self::sweep_interval(ttl);
        info!(ttl_secs = ttl.as_secs(), "Starting scratch sweeper (interval: {:?})", period);

        let mut ticker = interval(period);

        loop {
            ticker.tick().await;

            if let Err(e) = self.sweep_once(ttl).await {
                error!("Scratch sweep error: {}", e);
            }
        }
    }

    /// Run a single sweep.
    pub async fn sweep_once(&self, ttl: Duration) -> anyhow::Result<usize> {
        let removed = self.scratch.sweep_expired(ttl).await?;
        if removed > 0 {
            metrics::record_scratch_swept(removed);
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use odr_models::RequestId;

    #[test]
    fn test_sweep_interval_bounds() {
        assert_eq!(ScratchSweeper::sweep_interval(Duration::from_secs(2)), Duration::from_secs(1));
        assert_eq!(ScratchSweeper::sweep_interval(Duration::from_secs(120)), Duration::from_secs(30));
        assert_eq!(ScratchSweeper::sweep_interval(Duration::from_secs(86_400)), MAX_SWEEP_INTERVAL);
    }

    #[tokio::test]
    async fn test_disabled_sweeper_returns() {
        let dir = tempfile::tempdir().unwrap();
        let sweeper = ScratchSweeper::new(ScratchStore::new(dir.path()), None);
        sweeper.run().await;
    }

    #[tokio::test]
    async fn test_sweep_once_removes_old_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let store = ScratchStore::new(dir.path());
        let id = RequestId::new();
        store.create(&id).await.unwrap();

        let sweeper = ScratchSweeper::new(store.clone(), Some(Duration::from_millis(1)));
        tokio::time::sleep(Duration::from_millis(20)).await;

        assert_eq!(sweeper.sweep_once(Duration::from_millis(1)).await.unwrap(), 1);
        assert!(!store.dir(&id).exists());
    }
}
