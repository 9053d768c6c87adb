//! Response payloads of the admin endpoints

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Violation type tag for a jurisdictional state restriction
pub const STATE_RESTRICTION: &str = "STATE_RESTRICTION";

/// A compliance violation reported by the monitored service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    #[serde(rename = "type")]
    pub kind: String,
    /// Region code, only guaranteed for state restrictions
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub user_id: Value,
    #[serde(default)]
    pub timestamp: Value,
}

impl Violation {
    pub fn is_state_restriction(&self) -> bool {
        self.kind == STATE_RESTRICTION
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueSize {
    pub size: i64,
}

/// Ledger balance-consistency report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntegrityReport {
    pub balanced: bool,
    /// Amount as sent by the ledger, number or string
    #[serde(default)]
    pub imbalance: Option<Value>,
    #[serde(default = "empty_users")]
    pub affected_users: Value,
}

fn empty_users() -> Value {
    Value::Array(Vec::new())
}

impl IntegrityReport {
    /// Imbalance amount as shown in alert messages
    pub fn imbalance_display(&self) -> String {
        match &self.imbalance {
            None | Some(Value::Null) => "unknown".to_string(),
            Some(Value::String(amount)) => amount.clone(),
            Some(other) => other.to_string(),
        }
    }
}
