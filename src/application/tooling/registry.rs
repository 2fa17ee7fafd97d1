//! Tool registry: the two capabilities the triage model may call.
//!
//! Dispatch never fails. Unknown tools, undecodable arguments and backend
//! errors are all turned into `{"error": ...}` objects that go back to the
//! model as the tool result.

use std::sync::Arc;

use serde_json::{Map, Value, json};
use tracing::{debug, error, info, warn};

use super::error::{InvocationError, ToolInvokeError};
use super::interface::{CustomerLookup, KnowledgeBase};
use super::invocation::{
    FETCH_CUSTOMER_DATA, QUERY_KNOWLEDGE_BASE, ToolInvocation, decode_arguments,
};
use super::models::{PlanDetails, ToolOutcome, customer_plan};
use crate::types::ToolDefinition;

/// Upper bound on knowledge-base articles returned per query.
pub const DEFAULT_KB_RESULTS: usize = 3;

pub struct ToolRegistry {
    customers: Arc<dyn CustomerLookup>,
    knowledge_base: Arc<dyn KnowledgeBase>,
    kb_results: usize,
    definitions: Vec<ToolDefinition>,
}

impl ToolRegistry {
    pub fn new(customers: Arc<dyn CustomerLookup>, knowledge_base: Arc<dyn KnowledgeBase>) -> Self {
        Self {
            customers,
            knowledge_base,
            kb_results: DEFAULT_KB_RESULTS,
            definitions: tool_definitions(),
        }
    }

    pub fn with_kb_results(mut self, limit: usize) -> Self {
        self.kb_results = limit.max(1);
        self
    }

    pub fn definitions(&self) -> &[ToolDefinition] {
        &self.definitions
    }

    /// Executes one tool call requested by the model.
    pub async fn dispatch(&self, name: &str, raw_arguments: &str) -> ToolOutcome {
        if !ToolInvocation::is_known(name) {
            warn!(tool = name, "Model requested an unknown tool");
            let err = InvocationError::UnknownTool(name.to_string());
            let arguments = decode_arguments(raw_arguments).unwrap_or_default();
            return ToolOutcome::new(arguments, error_object(err.to_string()));
        }

        let arguments = match decode_arguments(raw_arguments) {
            Ok(arguments) => arguments,
            Err(reason) => {
                warn!(tool = name, %reason, "Tool arguments could not be decoded");
                let err = InvocationError::InvalidArguments {
                    tool: name.to_string(),
                    reason,
                };
                return ToolOutcome::new(Map::new(), error_object(err.to_string()));
            }
        };

        let invocation = match ToolInvocation::parse(name, &arguments) {
            Ok(invocation) => invocation,
            Err(err) => {
                warn!(tool = name, error = %err, "Rejected tool call");
                return ToolOutcome::new(arguments, error_object(err.to_string()));
            }
        };

        debug!(tool = invocation.name(), "Executing tool");
        let result = match self.execute(invocation).await {
            Ok(value) => value,
            Err(err) => {
                error!(tool = name, error = %err, "Tool execution failed");
                error_object(err.to_string())
            }
        };
        ToolOutcome::new(arguments, result)
    }

    async fn execute(&self, invocation: ToolInvocation) -> Result<Value, ToolInvokeError> {
        match invocation {
            ToolInvocation::FetchCustomerData { email } => self.fetch_customer_data(&email).await,
            ToolInvocation::QueryKnowledgeBase { query } => {
                self.query_knowledge_base(&query).await
            }
        }
    }

    async fn fetch_customer_data(&self, email: &str) -> Result<Value, ToolInvokeError> {
        let Some(mut record) = self.customers.find_by_email(email).await? else {
            info!(email, "Customer not found");
            return Ok(json!({
                "error": "not_found",
                "message": format!("No customer found with email: {email}"),
            }));
        };

        let plan = customer_plan(&record).to_string();
        let tier = self.customers.plan_tier(&plan).await?;
        let details = PlanDetails::resolve(&plan, tier);
        let details = serde_json::to_value(details).map_err(|source| ToolInvokeError::Encode {
            backend: "customers",
            source,
        })?;
        record.insert("plan_details".to_string(), details);
        Ok(Value::Object(record))
    }

    async fn query_knowledge_base(&self, query: &str) -> Result<Value, ToolInvokeError> {
        let articles = self.knowledge_base.search(query, self.kb_results).await?;
        info!("KB search for '{}' returned {} results", query, articles.len());
        serde_json::to_value(articles).map_err(|source| ToolInvokeError::Encode {
            backend: "knowledge_base",
            source,
        })
    }
}

fn error_object(message: String) -> Value {
    json!({ "error": message })
}

fn tool_definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: FETCH_CUSTOMER_DATA.to_string(),
            description: "Look up customer profile by email address. Returns customer info \
                including plan type, region, usage history, and plan tier details \
                (SLA, priority level, support channel). Always call this first to \
                understand the customer context before making triage decisions."
                .to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "email": {
                        "type": "string",
                        "description": "The customer's email address to look up."
                    }
                },
                "required": ["email"]
            }),
        },
        ToolDefinition {
            name: QUERY_KNOWLEDGE_BASE.to_string(),
            description: "Search the knowledge base for relevant FAQ articles, troubleshooting \
                guides, and business guidelines. Returns matching articles with their \
                recommended actions (auto_respond, escalate, route_to_specialist). \
                Use this to find the appropriate resolution and action guidelines."
                .to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "Natural language description of the customer's issue to search for."
                    }
                },
                "required": ["query"]
            }),
        },
    ]
}
