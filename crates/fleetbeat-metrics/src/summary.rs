//! Periodic operator summary of fleet totals.
//!
//! Logs fleet-wide server and player counts at a fixed interval so an
//! operator tailing the daemon's output can watch the fleet without
//! scraping. Pull-based consumers use the exposition endpoint instead.

use std::time::Duration;

use fleetbeat_core::Fleet;
use tracing::info;

/// Background loop that logs fleet totals until shutdown.
pub struct SummaryLoop {
    fleet: Fleet,
    interval: Duration,
}

impl SummaryLoop {
    pub fn new(fleet: Fleet, interval: Duration) -> Self {
        Self { fleet, interval }
    }

    /// Run until the shutdown signal flips.
    pub async fn run(&self, mut shutdown: tokio::sync::watch::Receiver<bool>) {
        info!(
            interval_secs = self.interval.as_secs(),
            "fleet summary loop started"
        );

        loop {
            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {
                    let snapshot = self.fleet.snapshot().await;
                    info!(
                        servers = snapshot.total_servers(),
                        players = snapshot.total_players(),
                        platforms = snapshot.aggregates.len(),
                        "fleet summary"
                    );
                }
                _ = shutdown.changed() => {
                    info!("fleet summary loop shutting down");
                    break;
                }
            }
        }
    }
}
