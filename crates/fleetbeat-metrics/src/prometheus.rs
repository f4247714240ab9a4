//! Prometheus text exposition format.
//!
//! Renders a fleet snapshot into the Prometheus text exposition format
//! for scraping by a Prometheus server or compatible agent.

use fleetbeat_core::{FleetSnapshot, LabelDimension};

/// Render a fleet snapshot into Prometheus text format.
///
/// Numeric families always carry their HELP/TYPE headers; categorical
/// families appear only while at least one reporter contributes to them,
/// mirroring the ledger's delete-at-zero discipline.
pub fn render_prometheus(snapshot: &FleetSnapshot) -> String {
    let mut out = String::new();

    out.push_str("# HELP fleetbeat_servers Live reporting servers per platform.\n");
    out.push_str("# TYPE fleetbeat_servers gauge\n");
    for a in &snapshot.aggregates {
        out.push_str(&format!(
            "fleetbeat_servers{{platform=\"{}\"}} {}\n",
            escape_label(&a.platform),
            a.servers
        ));
    }

    out.push_str("# HELP fleetbeat_players Connected players per platform.\n");
    out.push_str("# TYPE fleetbeat_players gauge\n");
    for a in &snapshot.aggregates {
        out.push_str(&format!(
            "fleetbeat_players{{platform=\"{}\"}} {}\n",
            escape_label(&a.platform),
            a.players
        ));
    }

    out.push_str("# HELP fleetbeat_managed_servers Backend servers managed per platform.\n");
    out.push_str("# TYPE fleetbeat_managed_servers gauge\n");
    for a in &snapshot.aggregates {
        out.push_str(&format!(
            "fleetbeat_managed_servers{{platform=\"{}\"}} {}\n",
            escape_label(&a.platform),
            a.managed_servers
        ));
    }

    out.push_str("# HELP fleetbeat_cores Host CPU cores per platform.\n");
    out.push_str("# TYPE fleetbeat_cores gauge\n");
    for a in &snapshot.aggregates {
        out.push_str(&format!(
            "fleetbeat_cores{{platform=\"{}\"}} {}\n",
            escape_label(&a.platform),
            a.cores
        ));
    }

    // One family per categorical dimension; the snapshot is sorted by
    // dimension, so contiguous runs share one header.
    let mut current: Option<LabelDimension> = None;
    for label in &snapshot.labels {
        if current != Some(label.dimension) {
            current = Some(label.dimension);
            let name = label.dimension.as_str();
            out.push_str(&format!(
                "# HELP fleetbeat_{name} Reporter count by {name} per platform.\n"
            ));
            out.push_str(&format!("# TYPE fleetbeat_{name} gauge\n"));
        }
        out.push_str(&format!(
            "fleetbeat_{}{{platform=\"{}\",value=\"{}\"}} {}\n",
            label.dimension.as_str(),
            escape_label(&label.platform),
            escape_label(&label.value),
            label.count
        ));
    }

    out
}

/// Escape a label value per the exposition format: backslash, quote, and
/// newline must not pass through raw.
fn escape_label(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use fleetbeat_core::{LabelCount, PlatformAggregate};

    use super::*;

    fn test_snapshot() -> FleetSnapshot {
        FleetSnapshot {
            aggregates: vec![
                PlatformAggregate {
                    platform: "paper".to_string(),
                    servers: 3,
                    players: 42.0,
                    managed_servers: 0.0,
                    cores: 12,
                },
                PlatformAggregate {
                    platform: "velocity".to_string(),
                    servers: 1,
                    players: 10.0,
                    managed_servers: 5.0,
                    cores: 4,
                },
            ],
            labels: vec![
                LabelCount {
                    dimension: LabelDimension::ServerVersion,
                    platform: "paper".to_string(),
                    value: "1.21".to_string(),
                    count: 3,
                },
                LabelCount {
                    dimension: LabelDimension::OsName,
                    platform: "paper".to_string(),
                    value: "Linux".to_string(),
                    count: 2,
                },
            ],
        }
    }

    #[test]
    fn render_empty() {
        let output = render_prometheus(&FleetSnapshot {
            aggregates: vec![],
            labels: vec![],
        });
        // Numeric families still declare themselves.
        assert!(output.contains("# HELP fleetbeat_servers"));
        assert!(output.contains("# TYPE fleetbeat_players gauge"));
        // Categorical families do not.
        assert!(!output.contains("fleetbeat_server_version"));
    }

    #[test]
    fn render_aggregates() {
        let output = render_prometheus(&test_snapshot());

        assert!(output.contains("fleetbeat_servers{platform=\"paper\"} 3"));
        assert!(output.contains("fleetbeat_players{platform=\"paper\"} 42"));
        assert!(output.contains("fleetbeat_managed_servers{platform=\"velocity\"} 5"));
        assert!(output.contains("fleetbeat_cores{platform=\"velocity\"} 4"));
    }

    #[test]
    fn render_label_families() {
        let output = render_prometheus(&test_snapshot());

        assert!(output.contains("# TYPE fleetbeat_server_version gauge"));
        assert!(
            output.contains("fleetbeat_server_version{platform=\"paper\",value=\"1.21\"} 3")
        );
        assert!(output.contains("fleetbeat_os_name{platform=\"paper\",value=\"Linux\"} 2"));
    }

    #[test]
    fn escape_hostile_values() {
        assert_eq!(escape_label("plain"), "plain");
        assert_eq!(escape_label("a\"b"), "a\\\"b");
        assert_eq!(escape_label("a\\b"), "a\\\\b");
        assert_eq!(escape_label("a\nb"), "a\\nb");
    }

    #[test]
    fn render_format_is_prometheus_compatible() {
        let output = render_prometheus(&test_snapshot());

        // Every non-comment line should match: metric_name{labels} value
        for line in output.lines() {
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            assert!(
                line.contains('{') && line.contains('}'),
                "line should have labels: {line}"
            );
        }
    }
}
