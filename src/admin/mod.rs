//! Client for the monitored service's admin endpoints

pub mod client;
pub mod model;

pub use client::{AdminClient, AdminError};
pub use model::{IntegrityReport, QueueSize, Violation, STATE_RESTRICTION};
