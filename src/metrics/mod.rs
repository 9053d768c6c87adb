//! Prometheus metric families and push gateway delivery

pub mod push;
pub mod registry;

pub use push::{PushError, PushGateway};
pub use registry::ComplianceMetrics;
