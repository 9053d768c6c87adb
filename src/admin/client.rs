use serde::de::DeserializeOwned;

use super::model::{IntegrityReport, QueueSize, Violation};

const VIOLATIONS_PATH: &str = "/api/v1/admin/compliance/violations";
const KYC_QUEUE_SIZE_PATH: &str = "/api/v1/admin/kyc/queue/size";
const INTEGRITY_PATH: &str = "/api/v1/admin/financial/integrity";

/// Client for the monitored service's admin API
#[derive(Debug, Clone)]
pub struct AdminClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl AdminClient {
    /// Create a client sharing an existing HTTP client
    pub fn new(http_client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http_client,
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// List current compliance violations
    pub async fn fetch_violations(&self) -> Result<Vec<Violation>, AdminError> {
        self.get_json(VIOLATIONS_PATH).await
    }

    /// Number of pending KYC verifications
    pub async fn fetch_kyc_queue_size(&self) -> Result<i64, AdminError> {
        let queue: QueueSize = self.get_json(KYC_QUEUE_SIZE_PATH).await?;
        Ok(queue.size)
    }

    /// Ledger balance-consistency report
    pub async fn fetch_integrity(&self) -> Result<IntegrityReport, AdminError> {
        self.get_json(INTEGRITY_PATH).await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, AdminError> {
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| AdminError::Network(format!("GET {}: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(AdminError::Status {
                url,
                status: status.as_u16(),
                body: error_text,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| AdminError::Network(format!("GET {}: {}", url, e)))?;

        serde_json::from_slice(&bytes)
            .map_err(|e| AdminError::Deserialization(format!("GET {}: {}", url, e)))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("{url} returned status {status}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },

    #[error("Deserialization error: {0}")]
    Deserialization(String),
}
