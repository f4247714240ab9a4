//! Point-in-time views of the fleet for scraping and inspection.
//!
//! Snapshot types are plain serializable data, detached from the live
//! state the moment they are built — a scraper holding one never blocks
//! ingestion.

use serde::Serialize;

use crate::report::{LabelDimension, Platform, ReporterKey};

/// Aggregated totals for one platform.
#[derive(Debug, Clone, Serialize)]
pub struct PlatformAggregate {
    pub platform: Platform,
    pub servers: u64,
    pub players: f64,
    pub managed_servers: f64,
    pub cores: u64,
}

/// One active label combination and its reporter count.
#[derive(Debug, Clone, Serialize)]
pub struct LabelCount {
    pub dimension: LabelDimension,
    pub platform: Platform,
    pub value: String,
    pub count: u32,
}

/// The full aggregated view at one instant.
///
/// Both lists are sorted (platforms lexically, labels by dimension then
/// platform then value) so repeated scrapes of an unchanged fleet render
/// identically.
#[derive(Debug, Clone, Serialize)]
pub struct FleetSnapshot {
    pub aggregates: Vec<PlatformAggregate>,
    pub labels: Vec<LabelCount>,
}

impl FleetSnapshot {
    pub fn total_servers(&self) -> u64 {
        self.aggregates.iter().map(|a| a.servers).sum()
    }

    pub fn total_players(&self) -> f64 {
        self.aggregates.iter().map(|a| a.players).sum()
    }
}

/// One live reporter, for operator inspection.
#[derive(Debug, Clone, Serialize)]
pub struct ReporterInfo {
    pub key: ReporterKey,
    pub platform: Platform,
    pub players: f64,
    /// Seconds since the last heartbeat arrived.
    pub last_seen_secs: u64,
}
