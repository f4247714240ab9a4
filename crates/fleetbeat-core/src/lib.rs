//! fleetbeat-core — heartbeat registry and incremental aggregation.
//!
//! The concurrent heart of fleetbeat: a store of the latest report per
//! reporter, per-platform aggregate counters maintained by signed deltas,
//! a reference-counted ledger of categorical label combinations, and a
//! lease mechanism that ages out reporters which stop heartbeating.
//!
//! # Architecture
//!
//! [`Fleet`] owns all mutable state behind a single lock; the ingestion
//! endpoint calls [`Fleet::record_heartbeat`], the offline signal calls
//! [`Fleet::mark_offline`], and the metrics sink pulls
//! [`Fleet::snapshot`]. Each heartbeat arms a detached lease check that
//! fires after the TTL and evicts the reporter only if no newer heartbeat
//! arrived in the meantime.
//!
//! All state is in-memory; a restarted process starts empty and the fleet
//! re-registers through its next scheduled heartbeats.

pub mod aggregate;
pub mod fleet;
pub mod labels;
mod lease;
pub mod registry;
pub mod report;
pub mod snapshot;

pub use aggregate::{AggregateTable, PlatformTotals};
pub use fleet::Fleet;
pub use labels::{LabelKey, LabelLedger};
pub use registry::Registry;
pub use report::{LabelDimension, Platform, Report, ReporterKey};
pub use snapshot::{FleetSnapshot, LabelCount, PlatformAggregate, ReporterInfo};
