//! Push gateway client

use super::registry::ComplianceMetrics;

/// Pushes metric families to a Prometheus push gateway
#[derive(Debug, Clone)]
pub struct PushGateway {
    http_client: reqwest::Client,
    base_url: String,
}

impl PushGateway {
    /// `address` may be a bare `host:port` or a full URL
    pub fn new(http_client: reqwest::Client, address: &str) -> Self {
        let address = address.trim_end_matches('/');
        let base_url = if address.starts_with("http://") || address.starts_with("https://") {
            address.to_string()
        } else {
            format!("http://{}", address)
        };

        Self {
            http_client,
            base_url,
        }
    }

    /// URL of a job's grouping key
    pub fn job_url(&self, job: &str) -> String {
        format!("{}/metrics/job/{}", self.base_url, job)
    }

    /// Replace every metric of `job` with the current contents of `metrics`
    pub async fn push(&self, job: &str, metrics: &ComplianceMetrics) -> Result<(), PushError> {
        let (content_type, body) = metrics
            .encode()
            .map_err(|e| PushError::Encode(e.to_string()))?;

        let url = self.job_url(job);
        let response = self
            .http_client
            .put(&url)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(body)
            .send()
            .await
            .map_err(|e| PushError::Network(format!("PUT {}: {}", url, e)))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let error_text = response.text().await.unwrap_or_default();
            return Err(PushError::Status {
                status,
                body: error_text,
            });
        }

        tracing::debug!(job = %job, url = %url, "Metrics pushed");

        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PushError {
    #[error("Failed to encode metrics: {0}")]
    Encode(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Push gateway returned status {status}: {body}")]
    Status { status: u16, body: String },
}
