//! Compliance Monitor
//!
//! Run with: cargo run
//!
//! Environment variables:
//! - SENTRY_DSN: Error-tracking DSN (events are only logged when unset)
//! - ENVIRONMENT: Environment tag (default: production)
//! - PROMETHEUS_GATEWAY: Push gateway host:port (default: localhost:9091)
//! - API_BASE: Monitored service base URL (default: http://localhost:8080)
//! - PAGERDUTY_KEY: Paging routing key (paging disabled when unset)
//! - PAGERDUTY_URL: Paging endpoint (default: https://events.pagerduty.com/v2/enqueue)
//! - COMPLIANCE_CHECK_INTERVAL_SECS: Seconds between cycles (default: 60)
//! - COMPLIANCE_HTTP_TIMEOUT_SECS: Timeout for outbound calls (default: 10)
//! - COMPLIANCE_RUN_ONCE: Run a single cycle and exit (default: false)
//! - RUST_LOG: Log level (default: info)

use compliance_monitor::alerts::sink_from_config;
use compliance_monitor::{ComplianceMonitor, MonitorConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "compliance_monitor=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = MonitorConfig::from_env();

    tracing::info!("Compliance monitor configuration:");
    tracing::info!("  Environment: {}", config.environment);
    tracing::info!("  API base: {}", config.api_base);
    tracing::info!("  Push gateway: {}", config.prometheus_gateway);
    tracing::info!("  Check interval: {:?}", config.check_interval);
    tracing::info!("  HTTP timeout: {:?}", config.http_timeout);
    tracing::info!(
        "  Error tracking: {}",
        if config.sentry_dsn.is_some() { "sentry" } else { "log only" }
    );
    tracing::info!(
        "  Paging: {}",
        if config.paging_enabled() { "enabled" } else { "disabled" }
    );

    let sink = sink_from_config(&config)?;
    let monitor = ComplianceMonitor::new(&config, sink)?;

    monitor.run(shutdown_signal()).await;

    Ok(())
}

/// Resolves on Ctrl-C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
