//! TTL Cleanup Task
//!
//! Background sweeper that periodically removes expired cache entries.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::cache::{CacheStats, CacheStore};
use crate::config::MAX_CLEANUP_INTERVAL;

const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Handle to a running sweeper task.
///
/// Dropping the handle without calling [`stop`](Sweeper::stop) still ends the
/// task: the shutdown channel closes and the loop exits at its next wake-up.
#[derive(Debug)]
pub struct Sweeper {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl Sweeper {
    /// Spawns a task that sweeps expired entries every `interval`.
    ///
    /// The first sweep runs one full interval after spawning. Each sweep takes
    /// the store's write lock for the duration of a single pass.
    ///
    /// The interval is clamped to between one millisecond and
    /// [`MAX_CLEANUP_INTERVAL`]. Must be called from within a Tokio runtime.
    pub fn spawn(store: Arc<RwLock<CacheStore>>, stats: Arc<CacheStats>, interval: Duration) -> Self {
        let interval = interval.clamp(MIN_PERIOD, MAX_CLEANUP_INTERVAL);
        let (shutdown, mut shutdown_rx) = watch::channel(false);

        let handle = tokio::spawn(async move {
            info!(interval_ms = interval.as_millis() as u64, "Starting TTL sweeper");

            let now = Instant::now();
            let first_sweep = now.checked_add(interval).unwrap_or(now);
            let mut ticker = time::interval_at(first_sweep, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    biased;

                    changed = shutdown_rx.changed() => {
                        if changed.is_err() || *shutdown_rx.borrow() {
                            break;
                        }
                    }
                    _ = ticker.tick() => {
                        let removed = {
                            let mut guard = store.write();
                            guard.cleanup_expired()
                        };
                        stats.record_expirations(removed);

                        if removed > 0 {
                            info!("TTL sweep: removed {} expired entries", removed);
                        } else {
                            debug!("TTL sweep: no expired entries found");
                        }
                    }
                }
            }

            info!("TTL sweeper stopped");
        });

        Self { shutdown, handle }
    }

    /// Signals the task to stop and waits for it to finish.
    ///
    /// A sweep already in progress completes before this returns.
    pub async fn stop(self) {
        // A send error means the task is already gone.
        let _ = self.shutdown.send(true);
        if let Err(err) = self.handle.await {
            warn!("TTL sweeper ended abnormally: {}", err);
        }
    }

    /// Returns true once the task has exited.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}
