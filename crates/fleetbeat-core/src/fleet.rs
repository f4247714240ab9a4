//! Fleet — the owned service object over registry, aggregates, and labels.
//!
//! All three live behind one `RwLock`, and every logical mutation (the
//! heartbeat pipeline, either eviction path) runs inside a single write
//! section: registry swap, aggregate delta, label reconcile. A reader
//! therefore never observes a registry change without its derived counter
//! effects. The lock is held for O(1) map work only; nothing inside it
//! blocks or performs I/O.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::aggregate::AggregateTable;
use crate::labels::LabelLedger;
use crate::lease;
use crate::registry::Registry;
use crate::report::{Report, ReporterKey};
use crate::snapshot::{FleetSnapshot, LabelCount, PlatformAggregate, ReporterInfo};

#[derive(Default)]
struct FleetState {
    registry: Registry,
    aggregates: AggregateTable,
    labels: LabelLedger,
}

/// Handle to the shared fleet state. Cheap to clone; constructed once at
/// process start and passed to the ingestion endpoint, the metrics sink,
/// and every armed lease check.
#[derive(Clone)]
pub struct Fleet {
    state: Arc<RwLock<FleetState>>,
    ttl: Duration,
}

impl Fleet {
    /// Create an empty fleet whose reporters age out after `ttl` without
    /// a heartbeat.
    pub fn new(ttl: Duration) -> Self {
        Self {
            state: Arc::new(RwLock::new(FleetState::default())),
            ttl,
        }
    }

    /// Lease duration for this fleet.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Ingest one heartbeat: install the report as current for `key`,
    /// fold its delta into the aggregates and label ledger, and arm a
    /// fresh lease check.
    pub async fn record_heartbeat(&self, key: ReporterKey, report: Report) {
        {
            let mut state = self.state.write().await;
            let FleetState {
                registry,
                aggregates,
                labels,
            } = &mut *state;
            let old = registry.upsert(key.clone(), report);
            let new = registry.get(&key);
            aggregates.apply_delta(old.as_ref(), new);
            labels.reconcile(old.as_ref(), new);
            debug!(%key, first_seen = old.is_none(), "heartbeat recorded");
        }
        lease::arm(self, key);
    }

    /// Explicit going-offline signal. Returns whether the key was present;
    /// an unknown key is a defined no-op. Racing against a concurrent
    /// lease eviction, exactly one path wins the `remove` and applies the
    /// decrement.
    pub async fn mark_offline(&self, key: &ReporterKey) -> bool {
        let mut state = self.state.write().await;
        let FleetState {
            registry,
            aggregates,
            labels,
        } = &mut *state;
        let Some(old) = registry.remove(key) else {
            return false;
        };
        aggregates.apply_delta(Some(&old), None);
        labels.reconcile(Some(&old), None);
        info!(%key, platform = %old.platform, "reporter went offline");
        true
    }

    /// Fire-time half of a lease check: evict `key` only if it is still
    /// present and no heartbeat has renewed it within the TTL.
    ///
    /// The freshness decision uses a re-read of `last_seen` under the
    /// write lock, never a value captured at arm time — a check armed
    /// before the latest heartbeat is thereby a no-op.
    pub(crate) async fn evict_if_expired(&self, key: &ReporterKey) -> bool {
        let mut state = self.state.write().await;
        let renewed = match state.registry.get(key) {
            None => return false,
            Some(report) => report.last_seen.elapsed() < self.ttl,
        };
        if renewed {
            return false;
        }
        let FleetState {
            registry,
            aggregates,
            labels,
        } = &mut *state;
        let Some(old) = registry.remove(key) else {
            return false;
        };
        aggregates.apply_delta(Some(&old), None);
        labels.reconcile(Some(&old), None);
        true
    }

    /// Current report for `key`, if the reporter is live.
    pub async fn get(&self, key: &ReporterKey) -> Option<Report> {
        self.state.read().await.registry.get(key).cloned()
    }

    /// Number of live reporters.
    pub async fn reporter_count(&self) -> usize {
        self.state.read().await.registry.len()
    }

    /// Detached copy of the aggregated view, sorted for stable rendering.
    pub async fn snapshot(&self) -> FleetSnapshot {
        let state = self.state.read().await;

        let mut aggregates: Vec<PlatformAggregate> = state
            .aggregates
            .iter()
            .map(|(platform, totals)| PlatformAggregate {
                platform: platform.clone(),
                servers: totals.servers,
                players: totals.players,
                managed_servers: totals.managed_servers,
                cores: totals.cores,
            })
            .collect();
        aggregates.sort_by(|a, b| a.platform.cmp(&b.platform));

        let mut labels: Vec<LabelCount> = state
            .labels
            .iter()
            .map(|(key, count)| LabelCount {
                dimension: key.dimension,
                platform: key.platform.clone(),
                value: key.value.clone(),
                count,
            })
            .collect();
        labels.sort_by(|a, b| {
            (a.dimension, &a.platform, &a.value).cmp(&(b.dimension, &b.platform, &b.value))
        });

        FleetSnapshot { aggregates, labels }
    }

    /// Live reporters with their age, sorted by key.
    pub async fn reporters(&self) -> Vec<ReporterInfo> {
        let state = self.state.read().await;
        let mut out: Vec<ReporterInfo> = state
            .registry
            .iter()
            .map(|(key, report)| ReporterInfo {
                key: key.clone(),
                platform: report.platform.clone(),
                players: report.players,
                last_seen_secs: report.last_seen.elapsed().as_secs(),
            })
            .collect();
        out.sort_by(|a, b| a.key.as_str().cmp(b.key.as_str()));
        out
    }
}
