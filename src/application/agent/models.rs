use serde::Serialize;
use serde_json::{Map, Value};

use crate::domain::TriageResult;
use crate::types::TokenUsage;

/// Maximum model calls per ticket.
pub const MAX_TOOL_ROUNDS: usize = 5;

/// Audit record of one tool invocation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolTrace {
    pub tool_name: String,
    pub arguments: Map<String, Value>,
    pub result: Value,
}

/// Outcome of a successful run: the validated result plus how it was reached.
#[derive(Debug, Clone, Serialize)]
pub struct AgentResponse {
    pub result: TriageResult,
    pub tool_traces: Vec<ToolTrace>,
    pub rounds: usize,
    pub total_tokens: u64,
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
}

impl AgentResponse {
    pub(crate) fn new(
        result: TriageResult,
        tool_traces: Vec<ToolTrace>,
        rounds: usize,
        usage: TokenUsage,
    ) -> Self {
        Self {
            result,
            tool_traces,
            rounds,
            total_tokens: usage.total_tokens,
            prompt_tokens: usage.prompt_tokens,
            completion_tokens: usage.completion_tokens,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AgentOptions {
    pub max_rounds: usize,
}

impl AgentOptions {
    pub fn with_max_rounds(mut self, max_rounds: usize) -> Self {
        self.max_rounds = max_rounds.max(1);
        self
    }
}

impl Default for AgentOptions {
    fn default() -> Self {
        Self {
            max_rounds: MAX_TOOL_ROUNDS,
        }
    }
}
