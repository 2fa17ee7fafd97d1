use super::errors::AgentError;
use super::models::{AgentOptions, AgentResponse, ToolTrace};
use super::parser::parse_final_answer;
use crate::application::tooling::ToolRegistry;
use crate::domain::Ticket;
use crate::model::{ModelProvider, ProviderChain};
use crate::types::{ChatMessage, TokenUsage};
use std::sync::Arc;
use tracing::{debug, info, warn};

const PREVIEW_CHARS: usize = 160;

/// Drives one ticket through the bounded model/tool conversation.
///
/// The agent holds only read-only state, so one instance can serve many
/// tickets, including concurrently. Each call to [`TriageAgent::process_ticket`]
/// owns its own conversation.
pub struct TriageAgent<P: ModelProvider> {
    chain: ProviderChain<P>,
    registry: Arc<ToolRegistry>,
    system_prompt: Arc<str>,
    options: AgentOptions,
}

impl<P: ModelProvider> TriageAgent<P> {
    pub fn new(
        chain: ProviderChain<P>,
        registry: Arc<ToolRegistry>,
        system_prompt: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            chain,
            registry,
            system_prompt: system_prompt.into(),
            options: AgentOptions::default(),
        }
    }

    pub fn with_options(mut self, options: AgentOptions) -> Self {
        self.options = options;
        self
    }

    pub async fn process_ticket(&self, ticket: &Ticket) -> Result<AgentResponse, AgentError> {
        let ticket_id = ticket.ticket_id.as_str();
        info!(ticket_id, "Processing ticket");

        let mut messages = vec![
            ChatMessage::system(&*self.system_prompt),
            ChatMessage::user(ticket.format_for_model()),
        ];
        let mut traces: Vec<ToolTrace> = Vec::new();
        let mut usage = TokenUsage::default();
        let max_rounds = self.options.max_rounds;

        for round in 1..=max_rounds {
            debug!(
                ticket_id,
                round,
                turns = messages.len(),
                "Submitting round to model provider"
            );
            let served = self
                .chain
                .complete(&messages, self.registry.definitions())
                .await
                .map_err(|source| AgentError::Provider {
                    ticket_id: ticket_id.to_string(),
                    source,
                })?;
            if served.used_fallback() {
                info!(ticket_id, round, "Round served by fallback provider");
            }

            let response = served.into_response();
            if let Some(round_usage) = response.usage {
                usage += round_usage;
            }

            if response.is_final() {
                let result = parse_final_answer(response.message.content.as_deref(), ticket_id)?;
                info!(
                    ticket_id,
                    rounds = round,
                    tool_calls = traces.len(),
                    total_tokens = usage.total_tokens,
                    "Ticket triaged"
                );
                return Ok(AgentResponse::new(result, traces, round, usage));
            }

            let calls = response.message.tool_calls.clone();
            messages.push(response.message);

            for call in calls {
                info!(ticket_id, round, tool = call.name.as_str(), "Model requested tool");
                let outcome = self.registry.dispatch(&call.name, &call.arguments).await;
                let content = outcome.content();
                debug!(
                    ticket_id,
                    tool = call.name.as_str(),
                    failed = outcome.is_error(),
                    result = %summarise(&content),
                    "Tool returned"
                );
                messages.push(ChatMessage::tool_result(call.id, content));
                traces.push(ToolTrace {
                    tool_name: call.name,
                    arguments: outcome.arguments,
                    result: outcome.result,
                });
            }
        }

        warn!(ticket_id, max_rounds, "Agent exceeded tool round budget");
        Err(AgentError::RoundsExceeded {
            ticket_id: ticket_id.to_string(),
            max_rounds,
            traces,
        })
    }
}

fn summarise(text: &str) -> String {
    if text.chars().count() <= PREVIEW_CHARS {
        return text.to_string();
    }
    let mut preview: String = text.chars().take(PREVIEW_CHARS).collect();
    preview.push_str("...");
    preview
}
