//! Periodic compliance checker

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::admin::{AdminClient, AdminError, IntegrityReport, Violation};
use crate::alerts::{AlertEvent, AlertSink, PagerError, PagerNotifier};
use crate::config::{MonitorConfig, JOB_NAME};
use crate::metrics::{ComplianceMetrics, PushError, PushGateway};

/// How long to wait for queued events on shutdown
const FLUSH_TIMEOUT: Duration = Duration::from_secs(2);

/// Polls the monitored service and turns its responses into metrics,
/// events and pages
pub struct ComplianceMonitor {
    admin: AdminClient,
    gateway: PushGateway,
    pager: PagerNotifier,
    metrics: ComplianceMetrics,
    sink: Arc<dyn AlertSink>,
    kyc_queue_threshold: i64,
    check_interval: Duration,
    run_once: bool,
}

/// Outcome of one polling cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleReport {
    pub compliance_ok: bool,
    pub integrity_ok: bool,
}

impl ComplianceMonitor {
    /// Create a monitor from configuration
    pub fn new(config: &MonitorConfig, sink: Arc<dyn AlertSink>) -> Result<Self, MonitorError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()
            .map_err(|e| MonitorError::HttpClient(e.to_string()))?;

        let metrics =
            ComplianceMetrics::new().map_err(|e| MonitorError::Metrics(e.to_string()))?;

        Ok(Self {
            admin: AdminClient::new(http_client.clone(), config.api_base.clone()),
            gateway: PushGateway::new(http_client.clone(), &config.prometheus_gateway),
            pager: PagerNotifier::new(
                http_client,
                config.pagerduty_url.clone(),
                config.pagerduty_key.clone(),
            ),
            metrics,
            sink,
            kyc_queue_threshold: config.kyc_queue_threshold,
            check_interval: config.check_interval,
            run_once: config.run_once,
        })
    }

    pub fn metrics(&self) -> &ComplianceMetrics {
        &self.metrics
    }

    /// Violations, KYC queue and metrics push.
    /// The first failure aborts the rest of the check and is reported.
    pub async fn check_compliance_violations(&self) -> Result<(), CheckError> {
        let result = self.run_compliance_check().await;
        if let Err(e) = &result {
            self.sink.capture_error(e);
            tracing::error!(error = %e, "Error in compliance check");
        }
        result
    }

    /// Ledger integrity check and paging.
    /// Failures are reported and do not affect the compliance check.
    pub async fn check_financial_integrity(&self) -> Result<(), CheckError> {
        let result = self.run_integrity_check().await;
        if let Err(e) = &result {
            self.sink.capture_error(e);
            tracing::error!(error = %e, "Error in financial integrity check");
        }
        result
    }

    /// Run both checks once, in order
    pub async fn run_cycle(&self) -> CycleReport {
        let compliance_ok = self.check_compliance_violations().await.is_ok();
        let integrity_ok = self.check_financial_integrity().await.is_ok();

        tracing::debug!(compliance_ok, integrity_ok, "Compliance cycle finished");

        CycleReport {
            compliance_ok,
            integrity_ok,
        }
    }

    /// Run cycles until `shutdown` resolves, sleeping between cycles.
    /// Returns after a single cycle in run-once mode.
    pub async fn run<F>(&self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        tracing::info!(
            interval = ?self.check_interval,
            run_once = self.run_once,
            paging = self.pager.is_enabled(),
            "Compliance monitor started"
        );

        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = self.run_cycle() => {}
                _ = &mut shutdown => break,
            }

            if self.run_once {
                break;
            }

            tokio::select! {
                _ = tokio::time::sleep(self.check_interval) => {}
                _ = &mut shutdown => break,
            }
        }

        if !self.sink.flush(FLUSH_TIMEOUT) {
            tracing::warn!("Timed out flushing pending events");
        }
        tracing::info!("Compliance monitor stopped");
    }

    async fn run_compliance_check(&self) -> Result<(), CheckError> {
        let violations = self.admin.fetch_violations().await?;
        self.process_violations(&violations)?;

        let queue_size = self.admin.fetch_kyc_queue_size().await?;
        self.process_queue_size(queue_size);

        self.gateway.push(JOB_NAME, &self.metrics).await?;

        Ok(())
    }

    async fn run_integrity_check(&self) -> Result<(), CheckError> {
        let report = self.admin.fetch_integrity().await?;
        if report.balanced {
            return Ok(());
        }

        self.sink.capture_event(imbalance_event(&report));
        self.pager
            .trigger(
                "Ledger Imbalance",
                &format!("Imbalance of {} detected", report.imbalance_display()),
            )
            .await?;

        Ok(())
    }

    fn process_violations(&self, violations: &[Violation]) -> Result<(), CheckError> {
        for violation in violations.iter().filter(|v| v.is_state_restriction()) {
            let state = violation
                .state
                .as_deref()
                .ok_or(CheckError::MissingField("state"))?;

            self.metrics.record_state_violation(state);
            self.sink.capture_event(
                AlertEvent::error(format!("State restriction violation: {}", state))
                    .with_extra("user_id", violation.user_id.clone())
                    .with_extra("state", state)
                    .with_extra("timestamp", violation.timestamp.clone()),
            );
        }
        Ok(())
    }

    fn process_queue_size(&self, queue_size: i64) {
        self.metrics.set_kyc_queue_size(queue_size);

        if queue_size > self.kyc_queue_threshold {
            self.sink.capture_event(AlertEvent::warning(format!(
                "KYC queue backlog: {} cases pending",
                queue_size
            )));
        }
    }
}

fn imbalance_event(report: &IntegrityReport) -> AlertEvent {
    let imbalance = report.imbalance.clone().unwrap_or(serde_json::Value::Null);

    AlertEvent::fatal("CRITICAL: Ledger imbalance detected")
        .with_extra("imbalance_amount", imbalance)
        .with_extra("affected_users", report.affected_users.clone())
}

/// Failure of a single check
#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    #[error("Admin API error: {0}")]
    Admin(#[from] AdminError),

    #[error("Metrics push error: {0}")]
    Push(#[from] PushError),

    #[error("Paging error: {0}")]
    Pager(#[from] PagerError),

    #[error("Violation is missing field `{0}`")]
    MissingField(&'static str),
}

/// Monitor startup errors
#[derive(Debug, thiserror::Error)]
pub enum MonitorError {
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),

    #[error("Failed to create metrics registry: {0}")]
    Metrics(String),
}
