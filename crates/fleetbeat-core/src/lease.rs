//! Lease monitor — delayed liveness checks for silent reporters.
//!
//! Every accepted heartbeat arms one detached check that fires after the
//! fleet TTL. Checks are never cancelled: a check that fires after a newer
//! heartbeat finds `last_seen` fresh on re-read and backs off, so a
//! superseded timer is a harmless no-op. A reporter that stops sending
//! simply ages out when its final check fires — the intended steady-state
//! failure mode, not an error.

use tokio::time::sleep;
use tracing::debug;

use crate::fleet::Fleet;
use crate::report::ReporterKey;

/// Schedule a liveness check for `key`, due one TTL from now.
///
/// The check holds no lock while waiting and re-reads the registry when it
/// fires; eviction happens only if the key is still present and stale.
pub(crate) fn arm(fleet: &Fleet, key: ReporterKey) {
    let fleet = fleet.clone();
    tokio::spawn(async move {
        sleep(fleet.ttl()).await;
        if fleet.evict_if_expired(&key).await {
            debug!(%key, "lease expired, reporter evicted");
        }
    });
}
