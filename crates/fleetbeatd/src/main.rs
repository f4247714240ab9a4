//! fleetbeatd — the fleetbeat daemon.
//!
//! Single binary that assembles the heartbeat master:
//! - Fleet core (registry + aggregates + label ledger + lease checks)
//! - Per-source rate limiter
//! - REST API + Prometheus exposition
//! - Periodic fleet summary logging
//!
//! # Usage
//!
//! ```text
//! fleetbeatd --port 8080 --lease-ttl-secs 20
//! ```

use std::net::SocketAddr;
use std::time::Duration;

use clap::Parser;
use tokio::sync::watch;
use tracing::info;

use fleetbeat_api::ratelimit::RateLimiter;
use fleetbeat_core::Fleet;
use fleetbeat_metrics::SummaryLoop;

#[derive(Parser)]
#[command(name = "fleetbeatd", about = "fleetbeat heartbeat master daemon")]
struct Cli {
    /// Port to listen on.
    #[arg(long, default_value = "8080")]
    port: u16,

    /// Seconds a reporter may stay silent before it is evicted.
    #[arg(long, default_value = "20")]
    lease_ttl_secs: u64,

    /// Seconds between fleet summary log lines (0 disables the loop).
    #[arg(long, default_value = "60")]
    summary_interval_secs: u64,

    /// Heartbeats allowed per source within the rate window (0 disables).
    #[arg(long, default_value = "25")]
    rate_limit: usize,

    /// Length of the rate window in seconds.
    #[arg(long, default_value = "1")]
    rate_window_secs: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,fleetbeatd=debug,fleetbeat=debug".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    info!("fleetbeat daemon starting");

    // ── Initialize subsystems ──────────────────────────────────

    let fleet = Fleet::new(Duration::from_secs(cli.lease_ttl_secs));
    info!(ttl_secs = cli.lease_ttl_secs, "fleet registry initialized");

    let limiter = RateLimiter::new(
        cli.rate_limit,
        Duration::from_secs(cli.rate_window_secs),
    );
    info!(
        budget = cli.rate_limit,
        window_secs = cli.rate_window_secs,
        "rate limiter initialized"
    );

    // ── Shutdown signal ────────────────────────────────────────

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // ── Start background tasks ─────────────────────────────────

    let summary_handle = if cli.summary_interval_secs > 0 {
        let summary = SummaryLoop::new(
            fleet.clone(),
            Duration::from_secs(cli.summary_interval_secs),
        );
        let summary_shutdown = shutdown_rx.clone();
        Some(tokio::spawn(async move {
            summary.run(summary_shutdown).await;
        }))
    } else {
        None
    };

    // ── Start API server ───────────────────────────────────────

    let router = fleetbeat_api::build_router(fleet, limiter);
    let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));

    info!(%addr, "API server starting");

    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Graceful shutdown on Ctrl-C.
    let server = axum::serve(listener, router).with_graceful_shutdown(async move {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install CTRL+C handler");
        info!("shutdown signal received");
        let _ = shutdown_tx.send(true);
    });

    server.await?;

    // Wait for background tasks.
    if let Some(handle) = summary_handle {
        let _ = handle.await;
    }

    info!("fleetbeat daemon stopped");
    Ok(())
}
