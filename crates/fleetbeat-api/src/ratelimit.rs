//! Per-source request budget for the ingestion endpoint.
//!
//! Sliding-window limiter keyed by the reporting backend's identifier.
//! Owned by the API state and passed by handle, not kept as a process
//! global. Requests beyond the budget are rejected before they reach the
//! registry.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Sliding-window rate limiter.
pub struct RateLimiter {
    max: usize,
    window: Duration,
    hits: Mutex<HashMap<String, VecDeque<Instant>>>,
}

impl RateLimiter {
    /// Allow up to `max` requests per `window` for each source. A `max`
    /// of zero disables limiting.
    pub fn new(max: usize, window: Duration) -> Self {
        Self {
            max,
            window,
            hits: Mutex::new(HashMap::new()),
        }
    }

    /// Record one request from `source` and report whether it fits the
    /// budget. Expired hits are pruned on access.
    pub fn allow(&self, source: &str) -> bool {
        if self.max == 0 {
            return true;
        }
        let now = Instant::now();
        let mut hits = self.hits.lock().expect("rate limiter mutex poisoned");
        let entry = hits.entry(source.to_string()).or_default();
        entry.retain(|ts| now.saturating_duration_since(*ts) <= self.window);
        if entry.len() >= self.max {
            false
        } else {
            entry.push_back(now);
            true
        }
    }
}
