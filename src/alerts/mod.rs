//! Alert delivery
//!
//! Events go to an error-tracking sink (Sentry, or the log when no DSN is
//! configured); critical failures additionally page the on-call responder.

pub mod config;
pub mod notifier;
pub mod sink;

pub use config::{AlertEvent, Extras, Severity};
pub use notifier::{PageOutcome, PagerError, PagerNotifier};
pub use sink::{sink_from_config, AlertSink, LogSink, SentrySink, SinkError};
