use serde_json::Value;
use tracing::error;

use super::errors::AgentError;
use crate::domain::{SchemaValidationError, TriageResult};

/// Turns the text of the model's final turn into a validated result.
pub fn parse_final_answer(content: Option<&str>, ticket_id: &str) -> Result<TriageResult, AgentError> {
    let raw = content.unwrap_or_default();
    if raw.trim().is_empty() {
        return Err(AgentError::EmptyResponse {
            ticket_id: ticket_id.to_string(),
        });
    }

    let payload = strip_code_fence(raw);
    let value: Value = serde_json::from_str(payload).map_err(|source| {
        error!(ticket_id, error = %source, "Failed to parse model response as JSON");
        error!(ticket_id, "Raw response:\n{raw}");
        AgentError::MalformedPayload {
            ticket_id: ticket_id.to_string(),
            source,
            raw: raw.to_string(),
        }
    })?;

    let schema_error = |source| AgentError::Schema {
        ticket_id: ticket_id.to_string(),
        source,
    };
    let result = TriageResult::from_payload(value).map_err(schema_error)?;
    if result.ticket_id != ticket_id {
        return Err(schema_error(SchemaValidationError::new(
            "ticket_id",
            format!("must equal `{ticket_id}`, got `{}`", result.ticket_id),
        )));
    }
    Ok(result)
}

/// Drops a leading fence line and a trailing fence marker, if present.
fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    if !trimmed.starts_with("```") {
        return trimmed;
    }
    let body = match trimmed.split_once('\n') {
        Some((_, rest)) => rest,
        None => &trimmed[3..],
    };
    let body = match body.rfind("```") {
        Some(end) => &body[..end],
        None => body,
    };
    body.trim()
}
