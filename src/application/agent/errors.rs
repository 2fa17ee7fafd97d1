use crate::domain::SchemaValidationError;
use crate::infrastructure::model::ProviderChainError;
use thiserror::Error;

use super::models::ToolTrace;

/// Fatal outcome for one ticket. Every variant names the ticket.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("model call failed for ticket {ticket_id}: {source}")]
    Provider {
        ticket_id: String,
        #[source]
        source: ProviderChainError,
    },
    #[error("agent exceeded {max_rounds} tool rounds for ticket {ticket_id}")]
    RoundsExceeded {
        ticket_id: String,
        max_rounds: usize,
        /// Tool calls made before the budget ran out.
        traces: Vec<ToolTrace>,
    },
    #[error("empty response from model for ticket {ticket_id}")]
    EmptyResponse { ticket_id: String },
    #[error("model returned invalid JSON for ticket {ticket_id}: {source}")]
    MalformedPayload {
        ticket_id: String,
        #[source]
        source: serde_json::Error,
        raw: String,
    },
    #[error("triage result for ticket {ticket_id} failed validation: {source}")]
    Schema {
        ticket_id: String,
        #[source]
        source: SchemaValidationError,
    },
}

impl AgentError {
    pub fn ticket_id(&self) -> &str {
        match self {
            AgentError::Provider { ticket_id, .. }
            | AgentError::RoundsExceeded { ticket_id, .. }
            | AgentError::EmptyResponse { ticket_id }
            | AgentError::MalformedPayload { ticket_id, .. }
            | AgentError::Schema { ticket_id, .. } => ticket_id,
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            AgentError::Provider { ticket_id, source } => {
                format!("Ticket {ticket_id}: {}", source.user_message())
            }
            AgentError::RoundsExceeded {
                ticket_id,
                max_rounds,
                ..
            } => format!(
                "Ticket {ticket_id}: the model did not reach a decision within {max_rounds} rounds."
            ),
            AgentError::EmptyResponse { ticket_id } => {
                format!("Ticket {ticket_id}: the model returned an empty answer.")
            }
            AgentError::MalformedPayload { ticket_id, .. } => {
                format!("Ticket {ticket_id}: the model answer was not valid JSON.")
            }
            AgentError::Schema { ticket_id, source } => {
                format!("Ticket {ticket_id}: the triage result was rejected ({source}).")
            }
        }
    }
}
