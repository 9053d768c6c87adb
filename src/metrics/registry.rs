//! Metric families pushed by the compliance monitor

use prometheus::{Encoder, GaugeVec, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};

/// Registry owning every metric family the monitor pushes.
///
/// The state violation counter is never reset: the gateway always receives
/// the cumulative total since process start.
pub struct ComplianceMetrics {
    registry: Registry,
    /// State restriction violations by region
    pub state_violations: IntCounterVec,
    /// Pending KYC verifications
    pub kyc_queue_size: IntGauge,
    /// Deposits today per user
    pub daily_deposits: GaugeVec,
}

impl ComplianceMetrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let state_violations = IntCounterVec::new(
            Opts::new(
                "compliance_state_violations_total",
                "Total state restriction violations",
            ),
            &["state"],
        )?;
        registry.register(Box::new(state_violations.clone()))?;

        let kyc_queue_size = IntGauge::new(
            "kyc_queue_size",
            "Number of pending KYC verifications",
        )?;
        registry.register(Box::new(kyc_queue_size.clone()))?;

        let daily_deposits = GaugeVec::new(
            Opts::new("daily_deposit_total", "Total deposits today per user"),
            &["user_id"],
        )?;
        registry.register(Box::new(daily_deposits.clone()))?;

        Ok(Self {
            registry,
            state_violations,
            kyc_queue_size,
            daily_deposits,
        })
    }

    pub fn record_state_violation(&self, state: &str) {
        self.state_violations.with_label_values(&[state]).inc();
    }

    pub fn set_kyc_queue_size(&self, size: i64) {
        self.kyc_queue_size.set(size);
    }

    /// Current total for a region (creates the series if absent)
    #[cfg(test)]
    pub fn state_violation_count(&self, state: &str) -> u64 {
        self.state_violations.with_label_values(&[state]).get()
    }

    /// Encode all families in the text exposition format.
    /// Returns the content type and body.
    pub fn encode(&self) -> Result<(String, Vec<u8>), prometheus::Error> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok((encoder.format_type().to_string(), buffer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoded(metrics: &ComplianceMetrics) -> String {
        let (_, body) = metrics.encode().unwrap();
        String::from_utf8(body).unwrap()
    }

    #[test]
    fn test_state_violations_accumulate() {
        let metrics = ComplianceMetrics::new().unwrap();
        metrics.record_state_violation("TX");
        metrics.record_state_violation("TX");
        metrics.record_state_violation("WA");

        assert_eq!(metrics.state_violation_count("TX"), 2);
        assert_eq!(metrics.state_violation_count("WA"), 1);

        let text = encoded(&metrics);
        assert!(text.contains("compliance_state_violations_total{state=\"TX\"} 2"));
        assert!(text.contains("compliance_state_violations_total{state=\"WA\"} 1"));
    }

    #[test]
    fn test_queue_size_is_absolute() {
        let metrics = ComplianceMetrics::new().unwrap();
        metrics.set_kyc_queue_size(150);
        metrics.set_kyc_queue_size(40);

        assert_eq!(metrics.kyc_queue_size.get(), 40);
        assert!(encoded(&metrics).contains("kyc_queue_size 40"));
    }

    #[test]
    fn test_only_recorded_regions_are_encoded() {
        let metrics = ComplianceMetrics::new().unwrap();
        metrics.record_state_violation("TX");

        let text = encoded(&metrics);
        assert!(text.contains("compliance_state_violations_total{state=\"TX\"} 1"));
        assert!(!text.contains("state=\"WA\""));
    }

    #[test]
    fn test_empty_deposit_family_not_encoded() {
        let metrics = ComplianceMetrics::new().unwrap();
        assert!(!encoded(&metrics).contains("daily_deposit_total"));

        metrics.daily_deposits.with_label_values(&["u1"]).set(250.0);
        assert!(encoded(&metrics).contains("daily_deposit_total{user_id=\"u1\"} 250"));
    }

    #[test]
    fn test_content_type() {
        let metrics = ComplianceMetrics::new().unwrap();
        let (content_type, _) = metrics.encode().unwrap();
        assert!(content_type.starts_with("text/plain"));
    }
}
