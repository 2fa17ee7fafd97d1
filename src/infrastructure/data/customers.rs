use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use serde_json::Value;
use tracing::info;

use super::{DataError, read_json};
use crate::application::tooling::{CustomerLookup, CustomerRecord, PlanTier, ToolInvokeError};

pub const CUSTOMERS_FILE: &str = "customers.json";
pub const PLAN_TIERS_FILE: &str = "plan_tiers.json";

/// Customer records and the plan-tier table, loaded once.
#[derive(Debug, Clone, Default)]
pub struct CustomerDirectory {
    customers: Vec<CustomerRecord>,
    tiers: HashMap<String, PlanTier>,
}

impl CustomerDirectory {
    pub fn new(customers: Vec<CustomerRecord>, tiers: HashMap<String, PlanTier>) -> Self {
        Self { customers, tiers }
    }

    /// Reads `customers.json` and `plan_tiers.json` from `data_dir`.
    pub fn load(data_dir: &Path) -> Result<Self, DataError> {
        let customers_path = data_dir.join(CUSTOMERS_FILE);
        let customers: Vec<CustomerRecord> = read_json(&customers_path)?;
        if let Some(index) = customers
            .iter()
            .position(|record| !record.get("email").is_some_and(Value::is_string))
        {
            return Err(DataError::Invalid {
                path: customers_path,
                reason: format!("customer #{index} has no string `email` field"),
            });
        }
        let tiers: HashMap<String, PlanTier> = read_json(&data_dir.join(PLAN_TIERS_FILE))?;
        info!(
            customers = customers.len(),
            plans = tiers.len(),
            "Loaded customer directory"
        );
        Ok(Self::new(customers, tiers))
    }

    pub fn len(&self) -> usize {
        self.customers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.customers.is_empty()
    }
}

#[async_trait]
impl CustomerLookup for CustomerDirectory {
    async fn find_by_email(&self, email: &str) -> Result<Option<CustomerRecord>, ToolInvokeError> {
        Ok(self
            .customers
            .iter()
            .find(|record| record.get("email").and_then(Value::as_str) == Some(email))
            .cloned())
    }

    async fn plan_tier(&self, plan: &str) -> Result<Option<PlanTier>, ToolInvokeError> {
        Ok(self.tiers.get(plan).cloned())
    }
}
