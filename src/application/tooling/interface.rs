use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::error::ToolInvokeError;

/// A customer profile as stored, with arbitrary extra fields.
pub type CustomerRecord = Map<String, Value>;

/// One row of the plan-tier table. Every field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanTier {
    pub label: Option<String>,
    pub sla_hours: Option<u32>,
    pub priority: Option<String>,
    pub support_channel: Option<String>,
    pub features: Option<Vec<String>>,
    pub auto_escalate: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guideline {
    pub action: String,
    pub conditions: String,
}

/// Knowledge-base article returned by a search, best match first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KbArticle {
    pub id: String,
    pub topic: String,
    pub content: String,
    pub category: String,
    pub applies_to_plans: Vec<String>,
    pub guideline: Guideline,
    /// `1 - distance`, rounded to four decimals.
    pub relevance_score: Option<f64>,
}

#[async_trait]
pub trait CustomerLookup: Send + Sync {
    /// Exact, case-sensitive match on the email field.
    async fn find_by_email(&self, email: &str) -> Result<Option<CustomerRecord>, ToolInvokeError>;

    async fn plan_tier(&self, plan: &str) -> Result<Option<PlanTier>, ToolInvokeError>;
}

#[async_trait]
pub trait KnowledgeBase: Send + Sync {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<KbArticle>, ToolInvokeError>;
}
