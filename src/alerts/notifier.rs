//! Paging notifications through the PagerDuty Events API

use serde::Serialize;

/// Source tag attached to every page
pub const PAGE_SOURCE: &str = "luckxpress-monitor";

/// Sends critical pages to the on-call responder
#[derive(Debug, Clone)]
pub struct PagerNotifier {
    client: reqwest::Client,
    url: String,
    routing_key: Option<String>,
}

/// Whether a page was actually sent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageOutcome {
    Sent,
    /// No routing key configured
    Skipped,
}

#[derive(Debug, Serialize)]
struct PageEnvelope<'a> {
    routing_key: &'a str,
    event_action: &'static str,
    payload: PagePayload<'a>,
}

#[derive(Debug, Serialize)]
struct PagePayload<'a> {
    summary: &'a str,
    source: &'static str,
    severity: &'static str,
    custom_details: PageDetails<'a>,
}

#[derive(Debug, Serialize)]
struct PageDetails<'a> {
    message: &'a str,
    timestamp: String,
}

impl PagerNotifier {
    pub fn new(
        client: reqwest::Client,
        url: impl Into<String>,
        routing_key: Option<String>,
    ) -> Self {
        Self {
            client,
            url: url.into(),
            routing_key,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.routing_key.is_some()
    }

    /// Trigger a critical incident
    pub async fn trigger(&self, title: &str, message: &str) -> Result<PageOutcome, PagerError> {
        let Some(routing_key) = self.routing_key.as_deref() else {
            tracing::debug!(title = %title, "No paging key configured, page skipped");
            return Ok(PageOutcome::Skipped);
        };

        let envelope = PageEnvelope {
            routing_key,
            event_action: "trigger",
            payload: PagePayload {
                summary: title,
                source: PAGE_SOURCE,
                severity: "critical",
                custom_details: PageDetails {
                    message,
                    timestamp: chrono::Utc::now().to_rfc3339(),
                },
            },
        };

        let response = self
            .client
            .post(&self.url)
            .json(&envelope)
            .send()
            .await
            .map_err(|e| PagerError::Network(format!("Failed to send page: {}", e)))?;

        if !response.status().is_success() {
            return Err(PagerError::Rejected(format!(
                "Paging service returned status {}",
                response.status()
            )));
        }

        tracing::info!(title = %title, "Page triggered");

        Ok(PageOutcome::Sent)
    }
}

/// Pager errors
#[derive(Debug, thiserror::Error)]
pub enum PagerError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Page rejected: {0}")]
    Rejected(String),
}
