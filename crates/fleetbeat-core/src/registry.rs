//! Registry — latest report per reporter key.
//!
//! Plain map with replace-and-return semantics; the returned previous
//! report is what the aggregator needs to compute its removal delta. The
//! registry itself is not synchronized — `Fleet` wraps it (together with
//! the aggregate table and label ledger) in a single lock so that a swap
//! and its derived counter updates form one critical section.

use std::collections::HashMap;

use tokio::time::Instant;

use crate::report::{Report, ReporterKey};

/// Store of the current report for every live reporter.
#[derive(Debug, Default)]
pub struct Registry {
    reporters: HashMap<ReporterKey, Report>,
}

impl Registry {
    /// Install `report` as the current report for `key`, stamping its
    /// arrival instant, and return whatever was there before.
    pub fn upsert(&mut self, key: ReporterKey, mut report: Report) -> Option<Report> {
        report.last_seen = Instant::now();
        self.reporters.insert(key, report)
    }

    /// Remove and return the current report for `key`. Unknown keys are a
    /// defined no-op; exactly one of two racing removals gets `Some`.
    pub fn remove(&mut self, key: &ReporterKey) -> Option<Report> {
        self.reporters.remove(key)
    }

    pub fn get(&self, key: &ReporterKey) -> Option<&Report> {
        self.reporters.get(key)
    }

    pub fn len(&self) -> usize {
        self.reporters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reporters.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ReporterKey, &Report)> {
        self.reporters.iter()
    }
}
