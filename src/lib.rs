//! Compliance Monitor: sidecar poller for a compliance/ledger service
//!
//! Once per interval the monitor queries the service's admin endpoints,
//! turns the responses into Prometheus metrics pushed to a gateway, reports
//! violations and backlogs to an error-tracking sink, and pages on ledger
//! imbalance.
//!
//! # Example
//!
//! ```no_run
//! use compliance_monitor::alerts::sink_from_config;
//! use compliance_monitor::{ComplianceMonitor, MonitorConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = MonitorConfig::from_env();
//! let sink = sink_from_config(&config)?;
//! let monitor = ComplianceMonitor::new(&config, sink)?;
//!
//! let report = monitor.run_cycle().await;
//! println!("compliance ok: {}", report.compliance_ok);
//! # Ok(())
//! # }
//! ```

pub mod admin;
pub mod alerts;
pub mod config;
pub mod metrics;
pub mod monitor;

// Re-export commonly used types
pub use config::MonitorConfig;
pub use monitor::{CheckError, ComplianceMonitor, CycleReport, MonitorError};
