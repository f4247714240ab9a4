//! fleetbeat-metrics — exposition and operator summaries.
//!
//! Two consumers of the core's snapshot: [`render_prometheus`] turns it
//! into the Prometheus text exposition format for pull-based scraping,
//! and [`SummaryLoop`] periodically logs fleet totals for operators
//! watching the daemon's output.

pub mod prometheus;
pub mod summary;

pub use prometheus::render_prometheus;
pub use summary::SummaryLoop;
