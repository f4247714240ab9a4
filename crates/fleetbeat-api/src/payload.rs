//! Wire format of the inbound heartbeat.
//!
//! Reporters POST this JSON body; every field defaults, so partial
//! payloads from older plugin versions still decode. Conversion into a
//! core [`Report`] is the only place wire names meet domain names.

use fleetbeat_core::Report;
use serde::Deserialize;

/// JSON body of one heartbeat.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HeartbeatPayload {
    pub player_amount: f64,
    pub managed_servers: f64,
    pub online_mode: Option<bool>,
    pub server_name: String,
    pub server_version: String,
    pub plugin_version: String,
    pub java_version: String,
    pub os_name: String,
    pub os_arch: String,
    pub os_version: String,
    pub core_count: u32,
}

impl HeartbeatPayload {
    /// Build the core report. The platform falls back to "unknown" when
    /// the reporter omits its server name; numeric contributions are
    /// clamped at zero so a misbehaving client cannot drive an aggregate
    /// negative.
    pub fn into_report(self) -> Report {
        let platform = if self.server_name.is_empty() {
            "unknown".to_string()
        } else {
            self.server_name
        };
        let mut report = Report::new(platform);
        report.players = self.player_amount.max(0.0);
        report.managed_servers = self.managed_servers.max(0.0);
        report.cores = self.core_count;
        report.plugin_version = self.plugin_version;
        report.server_version = self.server_version;
        report.java_version = self.java_version;
        report.os_name = self.os_name;
        report.os_arch = self.os_arch;
        report.os_version = self.os_version;
        report.online_mode = self.online_mode;
        report
    }
}
