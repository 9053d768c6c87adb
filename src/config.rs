//! Monitor configuration loaded from the environment

use std::time::Duration;

/// Push gateway job label used for every metrics push
pub const JOB_NAME: &str = "compliance_monitor";

/// Trace sampling rate handed to the error-tracking client
pub const TRACES_SAMPLE_RATE: f32 = 0.1;

/// KYC queue size above which a backlog warning is emitted
pub const KYC_QUEUE_THRESHOLD: i64 = 100;

pub const DEFAULT_PAGERDUTY_URL: &str = "https://events.pagerduty.com/v2/enqueue";

/// Monitor configuration
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Error-tracking DSN; events are only logged when absent
    pub sentry_dsn: Option<String>,
    /// Environment tag attached to every event
    pub environment: String,
    /// Push gateway address, `host:port` or a full URL
    pub prometheus_gateway: String,
    /// Base URL of the monitored service
    pub api_base: String,
    /// Paging routing key; paging is skipped when absent
    pub pagerduty_key: Option<String>,
    /// Paging ingestion endpoint
    pub pagerduty_url: String,
    /// Sleep between cycles
    pub check_interval: Duration,
    /// Timeout applied to every outbound HTTP call
    pub http_timeout: Duration,
    /// Queue size above which a backlog warning fires
    pub kyc_queue_threshold: i64,
    /// Run a single cycle and exit
    pub run_once: bool,
}

impl MonitorConfig {
    /// Create a config from environment variables
    /// SENTRY_DSN=https://key@sentry.example.com/1
    /// ENVIRONMENT=production
    /// PROMETHEUS_GATEWAY=localhost:9091
    /// API_BASE=http://localhost:8080
    /// PAGERDUTY_KEY=routing-key
    /// PAGERDUTY_URL=https://events.pagerduty.com/v2/enqueue
    /// COMPLIANCE_CHECK_INTERVAL_SECS=60
    /// COMPLIANCE_HTTP_TIMEOUT_SECS=10
    /// COMPLIANCE_RUN_ONCE=false
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let secs = |key: &str, default: Duration| {
            non_empty(key)
                .and_then(|v| v.trim().parse::<u64>().ok())
                .map(Duration::from_secs)
                .unwrap_or(default)
        };

        Self {
            sentry_dsn: non_empty("SENTRY_DSN"),
            environment: non_empty("ENVIRONMENT").unwrap_or(defaults.environment),
            prometheus_gateway: non_empty("PROMETHEUS_GATEWAY")
                .unwrap_or(defaults.prometheus_gateway),
            api_base: non_empty("API_BASE").unwrap_or(defaults.api_base),
            pagerduty_key: non_empty("PAGERDUTY_KEY"),
            pagerduty_url: non_empty("PAGERDUTY_URL").unwrap_or(defaults.pagerduty_url),
            check_interval: secs("COMPLIANCE_CHECK_INTERVAL_SECS", defaults.check_interval),
            http_timeout: secs("COMPLIANCE_HTTP_TIMEOUT_SECS", defaults.http_timeout),
            kyc_queue_threshold: defaults.kyc_queue_threshold,
            run_once: non_empty("COMPLIANCE_RUN_ONCE")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(defaults.run_once),
        }
    }

    /// Whether paging is configured
    pub fn paging_enabled(&self) -> bool {
        self.pagerduty_key.is_some()
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            sentry_dsn: None,
            environment: "production".to_string(),
            prometheus_gateway: "localhost:9091".to_string(),
            api_base: "http://localhost:8080".to_string(),
            pagerduty_key: None,
            pagerduty_url: DEFAULT_PAGERDUTY_URL.to_string(),
            check_interval: Duration::from_secs(60),
            http_timeout: Duration::from_secs(10),
            kyc_queue_threshold: KYC_QUEUE_THRESHOLD,
            run_once: false,
        }
    }
}
