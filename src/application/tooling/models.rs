use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use super::interface::{CustomerRecord, PlanTier};

/// Plan used when a customer record carries no `plan` field.
pub const DEFAULT_PLAN: &str = "free";

/// Plan tier details attached to a customer profile before it is returned to
/// the model. Missing table fields are filled in field by field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanDetails {
    pub label: String,
    pub sla_hours: Option<u32>,
    pub priority: String,
    pub support_channel: String,
    pub features: Vec<String>,
    pub auto_escalate: bool,
}

impl PlanDetails {
    pub fn resolve(plan: &str, tier: Option<PlanTier>) -> Self {
        let tier = tier.unwrap_or_else(|| {
            warn!(plan, "Plan tier not found, using defaults");
            PlanTier::default()
        });
        Self {
            label: tier.label.unwrap_or_else(|| plan.to_string()),
            sla_hours: tier.sla_hours,
            priority: tier.priority.unwrap_or_else(|| "low".to_string()),
            support_channel: tier.support_channel.unwrap_or_else(|| "email".to_string()),
            features: tier.features.unwrap_or_default(),
            auto_escalate: tier.auto_escalate.unwrap_or(false),
        }
    }
}

/// Plan key stored on a customer record, or [`DEFAULT_PLAN`].
pub fn customer_plan(record: &CustomerRecord) -> &str {
    record
        .get("plan")
        .and_then(Value::as_str)
        .unwrap_or(DEFAULT_PLAN)
}

/// Result of one dispatched tool call.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolOutcome {
    /// Decoded arguments, or an empty map when they could not be decoded.
    pub arguments: Map<String, Value>,
    pub result: Value,
}

impl ToolOutcome {
    pub fn new(arguments: Map<String, Value>, result: Value) -> Self {
        Self { arguments, result }
    }

    /// Serialized form sent back to the model as the tool message content.
    pub fn content(&self) -> String {
        self.result.to_string()
    }

    pub fn is_error(&self) -> bool {
        self.result.get("error").is_some()
    }
}
