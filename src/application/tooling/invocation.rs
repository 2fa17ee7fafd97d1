use serde::Deserialize;
use serde_json::{Map, Value};

use super::error::InvocationError;

pub const FETCH_CUSTOMER_DATA: &str = "fetch_customer_data";
pub const QUERY_KNOWLEDGE_BASE: &str = "query_knowledge_base";

/// A tool call the agent knows how to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolInvocation {
    FetchCustomerData { email: String },
    QueryKnowledgeBase { query: String },
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct FetchCustomerArgs {
    email: String,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct QueryKnowledgeArgs {
    query: String,
}

impl ToolInvocation {
    /// Builds a typed invocation from a tool name and its decoded arguments.
    pub fn parse(name: &str, arguments: &Map<String, Value>) -> Result<Self, InvocationError> {
        let args = Value::Object(arguments.clone());
        match name {
            FETCH_CUSTOMER_DATA => serde_json::from_value::<FetchCustomerArgs>(args)
                .map(|args| ToolInvocation::FetchCustomerData { email: args.email })
                .map_err(|err| invalid(name, err)),
            QUERY_KNOWLEDGE_BASE => serde_json::from_value::<QueryKnowledgeArgs>(args)
                .map(|args| ToolInvocation::QueryKnowledgeBase { query: args.query })
                .map_err(|err| invalid(name, err)),
            other => Err(InvocationError::UnknownTool(other.to_string())),
        }
    }

    /// True when `name` is one of the tools this agent exposes.
    pub fn is_known(name: &str) -> bool {
        matches!(name, FETCH_CUSTOMER_DATA | QUERY_KNOWLEDGE_BASE)
    }

    pub fn name(&self) -> &'static str {
        match self {
            ToolInvocation::FetchCustomerData { .. } => FETCH_CUSTOMER_DATA,
            ToolInvocation::QueryKnowledgeBase { .. } => QUERY_KNOWLEDGE_BASE,
        }
    }
}

/// Decodes the raw argument text of a tool call. An empty string is `{}`.
pub fn decode_arguments(raw: &str) -> Result<Map<String, Value>, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(Map::new());
    }
    match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err("arguments must be a JSON object".to_string()),
        Err(err) => Err(err.to_string()),
    }
}

fn invalid(tool: &str, err: serde_json::Error) -> InvocationError {
    InvocationError::InvalidArguments {
        tool: tool.to_string(),
        reason: err.to_string(),
    }
}
