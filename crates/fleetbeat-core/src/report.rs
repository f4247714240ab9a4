//! Domain types for the fleet registry.
//!
//! A `Report` is the latest decoded heartbeat from one reporting process,
//! plus the arrival instant stamped by the registry. Reports are plain data;
//! all behavior lives in the registry, aggregator, and ledger.

use std::fmt;

use serde::Serialize;
use tokio::time::Instant;

/// Platform (server software role) a reporter runs on, e.g. "paper" or
/// "velocity". Discovered at runtime; the set is not closed.
pub type Platform = String;

// ── Reporter identity ──────────────────────────────────────────────

/// Opaque key identifying one reporting process.
///
/// Composed of the backend identifier and, when supplied, a per-instance
/// identifier. Uniqueness is the caller's concern; the registry only ever
/// compares keys for equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ReporterKey(String);

impl ReporterKey {
    /// Key for a backend without a per-instance identifier.
    pub fn new(backend: impl Into<String>) -> Self {
        Self(backend.into())
    }

    /// Key for one instance of a backend.
    pub fn with_instance(backend: &str, instance: &str) -> Self {
        Self(format!("{backend}/{instance}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReporterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ── Report ─────────────────────────────────────────────────────────

/// The current state of one reporter, as of its latest heartbeat.
#[derive(Debug, Clone)]
pub struct Report {
    /// Category the reporter aggregates under.
    pub platform: Platform,
    /// Players currently connected to this reporter.
    pub players: f64,
    /// Backend servers this reporter manages (proxies report > 0).
    pub managed_servers: f64,
    /// CPU cores available to the reporter's host.
    pub cores: u32,
    pub plugin_version: String,
    pub server_version: String,
    pub java_version: String,
    pub os_name: String,
    pub os_arch: String,
    pub os_version: String,
    /// Whether the reporter authenticates players. `None` when not reported.
    pub online_mode: Option<bool>,
    /// Arrival instant of the heartbeat, stamped by the registry on upsert.
    /// Never client-supplied.
    pub last_seen: Instant,
}

impl Report {
    /// A report with all contributions zeroed; callers fill in the fields
    /// decoded from the heartbeat payload.
    pub fn new(platform: impl Into<Platform>) -> Self {
        Self {
            platform: platform.into(),
            players: 0.0,
            managed_servers: 0.0,
            cores: 0,
            plugin_version: String::new(),
            server_version: String::new(),
            java_version: String::new(),
            os_name: String::new(),
            os_arch: String::new(),
            os_version: String::new(),
            online_mode: None,
            last_seen: Instant::now(),
        }
    }

    /// Categorical label contributions of this report.
    ///
    /// Attributes reported empty or absent are "not provided" and yield no
    /// label, so they never create or decrement a ledger entry.
    pub fn labels(&self) -> Vec<(LabelDimension, String)> {
        let mut out = Vec::new();
        let mut push = |dim: LabelDimension, value: &str| {
            if !value.is_empty() {
                out.push((dim, value.to_string()));
            }
        };
        push(LabelDimension::PluginVersion, &self.plugin_version);
        push(LabelDimension::ServerVersion, &self.server_version);
        push(LabelDimension::JavaVersion, &self.java_version);
        push(LabelDimension::OsName, &self.os_name);
        push(LabelDimension::OsArch, &self.os_arch);
        push(LabelDimension::OsVersion, &self.os_version);
        if let Some(online) = self.online_mode {
            out.push((
                LabelDimension::OnlineMode,
                if online { "true" } else { "false" }.to_string(),
            ));
        }
        out
    }
}

// ── Label dimensions ───────────────────────────────────────────────

/// Categorical dimensions a report can contribute a label to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelDimension {
    PluginVersion,
    ServerVersion,
    JavaVersion,
    OsName,
    OsArch,
    OsVersion,
    OnlineMode,
}

impl LabelDimension {
    /// Metric-friendly dimension name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PluginVersion => "plugin_version",
            Self::ServerVersion => "server_version",
            Self::JavaVersion => "java_version",
            Self::OsName => "os_name",
            Self::OsArch => "os_arch",
            Self::OsVersion => "os_version",
            Self::OnlineMode => "online_mode",
        }
    }
}

impl fmt::Display for LabelDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
