//! Periodic expiry sweep.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use authd_core::config::session::SessionConfig;

use super::manager::SessionManager;

/// Drives [`SessionManager::sweep_expired`] on a background cadence.
///
/// The sweeper may lag real expiry by up to one interval; `is_live` and
/// token authentication stay authoritative in the meantime. It never runs
/// inside a request path.
pub struct SessionSweeper {
    /// The session table to sweep.
    manager: Arc<SessionManager>,
    /// Interval between sweeps.
    interval: Duration,
}

impl SessionSweeper {
    /// Creates a sweeper over the given manager.
    pub fn new(manager: Arc<SessionManager>, config: &SessionConfig) -> Self {
        Self {
            manager,
            interval: Duration::from_secs(config.sweep_interval_seconds.max(1)),
        }
    }

    /// Runs the sweep loop until the shutdown channel flips.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(interval_seconds = self.interval.as_secs(), "Session sweeper started");

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let removed = self.manager.sweep_expired();
                    debug!(removed, "Sweep cycle completed");
                }
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        info!("Session sweeper stopping");
                        break;
                    }
                }
            }
        }
    }
}
