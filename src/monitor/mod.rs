//! Compliance poller
//!
//! Each cycle fetches violations and the KYC queue size, pushes metrics,
//! then verifies ledger integrity. The two checks fail independently.

pub mod checker;

#[cfg(test)]
pub(crate) mod testing;

pub use checker::{CheckError, ComplianceMonitor, CycleReport, MonitorError};
