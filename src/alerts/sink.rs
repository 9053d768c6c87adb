//! Error-tracking sinks

use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use sentry::protocol::Event;
use sentry::types::Dsn;

use super::config::{AlertEvent, Severity};
use crate::config::{MonitorConfig, TRACES_SAMPLE_RATE};

/// Destination for alert events and captured errors
pub trait AlertSink: Send + Sync {
    /// Submit a message event
    fn capture_event(&self, event: AlertEvent);

    /// Submit a captured error
    fn capture_error(&self, error: &(dyn Error + 'static));

    /// Wait until queued events are delivered, returning false on timeout
    fn flush(&self, _timeout: Duration) -> bool {
        true
    }
}

/// Sink backed by a Sentry client built from explicit configuration
pub struct SentrySink {
    client: Arc<sentry::Client>,
    hub: Arc<sentry::Hub>,
}

impl SentrySink {
    pub fn new(dsn: &str, environment: &str) -> Result<Self, SinkError> {
        let dsn: Dsn = dsn
            .parse()
            .map_err(|e| SinkError::InvalidDsn(format!("{}", e)))?;

        let options = sentry::apply_defaults(sentry::ClientOptions {
            dsn: Some(dsn),
            environment: Some(environment.to_string().into()),
            release: sentry::release_name!(),
            traces_sample_rate: TRACES_SAMPLE_RATE,
            ..Default::default()
        });

        let client = Arc::new(sentry::Client::from(options));
        let hub = Arc::new(sentry::Hub::new(
            Some(Arc::clone(&client)),
            Arc::new(sentry::Scope::default()),
        ));

        tracing::info!(environment = %environment, "Sentry client initialized");

        Ok(Self { client, hub })
    }
}

impl AlertSink for SentrySink {
    fn capture_event(&self, event: AlertEvent) {
        let id = self.hub.capture_event(Event {
            message: Some(event.message),
            level: event.severity.into(),
            extra: event.extras,
            ..Default::default()
        });
        tracing::debug!(event_id = %id, "Event sent to Sentry");
    }

    fn capture_error(&self, error: &(dyn Error + 'static)) {
        let id = self.hub.capture_error(error);
        tracing::debug!(event_id = %id, "Error sent to Sentry");
    }

    fn flush(&self, timeout: Duration) -> bool {
        self.client.flush(Some(timeout))
    }
}

/// Sink that writes events to the log when no DSN is configured
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl AlertSink for LogSink {
    fn capture_event(&self, event: AlertEvent) {
        let extras = serde_json::to_string(&event.extras).unwrap_or_default();
        match event.severity {
            Severity::Warning => {
                tracing::warn!(extras = %extras, "{}", event.message)
            }
            Severity::Error | Severity::Fatal => {
                tracing::error!(severity = %event.severity, extras = %extras, "{}", event.message)
            }
        }
    }

    fn capture_error(&self, error: &(dyn Error + 'static)) {
        tracing::error!(error = %error, "Captured error");
    }
}

/// Pick the sink matching the configuration
pub fn sink_from_config(config: &MonitorConfig) -> Result<Arc<dyn AlertSink>, SinkError> {
    match &config.sentry_dsn {
        Some(dsn) => Ok(Arc::new(SentrySink::new(dsn, &config.environment)?)),
        None => {
            tracing::warn!("SENTRY_DSN not set, events will only be logged");
            Ok(Arc::new(LogSink))
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("Invalid Sentry DSN: {0}")]
    InvalidDsn(String),
}
