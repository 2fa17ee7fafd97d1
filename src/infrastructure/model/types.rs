//! Model types - Request, Response, and Error types

use crate::types::{ChatMessage, TokenUsage, ToolDefinition};
use reqwest::StatusCode;
use std::time::Duration;
use thiserror::Error;

/// Whether the model may call tools on this turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToolChoice {
    #[default]
    Auto,
}

impl ToolChoice {
    pub fn as_str(self) -> &'static str {
        match self {
            ToolChoice::Auto => "auto",
        }
    }
}

/// Model request for LLM chat
#[derive(Debug, Clone)]
pub struct ModelRequest {
    pub provider: String,
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub tools: Vec<ToolDefinition>,
    pub tool_choice: ToolChoice,
    /// `Some(false)` asks the provider to emit tool calls one at a time.
    pub parallel_tool_calls: Option<bool>,
}

/// Model response from LLM
#[derive(Debug, Clone)]
pub struct ModelResponse {
    pub message: ChatMessage,
    pub finish_reason: Option<String>,
    pub usage: Option<TokenUsage>,
}

impl ModelResponse {
    pub fn new(message: ChatMessage, finish_reason: Option<String>, usage: Option<TokenUsage>) -> Self {
        Self {
            message,
            finish_reason,
            usage,
        }
    }

    /// True when the model stopped on its own or asked for nothing further.
    pub fn is_final(&self) -> bool {
        self.finish_reason.as_deref() == Some("stop") || self.message.tool_calls.is_empty()
    }
}

/// Model errors
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("provider '{provider}' is not configured")]
    ProviderNotFound { provider: String },
    #[error("model '{model}' is not available for provider '{provider}'")]
    ModelNotFound { provider: String, model: String },
    #[error("provider '{provider}' requires an API key")]
    MissingApiKey { provider: String },
    #[error("provider '{provider}' rate limited the request")]
    RateLimited {
        provider: String,
        retry_after: Option<Duration>,
    },
    #[error("provider '{provider}' responded with status {status}: {message}")]
    Status {
        provider: String,
        status: u16,
        message: String,
    },
    #[error("network error calling provider '{provider}': {source}")]
    Network {
        provider: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("provider '{provider}' returned invalid response: {reason}")]
    InvalidResponse { provider: String, reason: String },
    #[error("unsupported provider type '{provider_type}' for provider '{provider}'")]
    UnsupportedProviderType {
        provider: String,
        provider_type: String,
    },
}

impl ModelError {
    pub fn provider_not_found(provider: impl Into<String>) -> Self {
        Self::ProviderNotFound {
            provider: provider.into(),
        }
    }

    pub fn model_not_found(provider: impl Into<String>, model: impl Into<String>) -> Self {
        Self::ModelNotFound {
            provider: provider.into(),
            model: model.into(),
        }
    }

    pub fn missing_api_key(provider: impl Into<String>) -> Self {
        Self::MissingApiKey {
            provider: provider.into(),
        }
    }

    pub fn rate_limited(provider: impl Into<String>, retry_after: Option<Duration>) -> Self {
        Self::RateLimited {
            provider: provider.into(),
            retry_after,
        }
    }

    pub fn status(provider: impl Into<String>, status: StatusCode, message: impl Into<String>) -> Self {
        Self::Status {
            provider: provider.into(),
            status: status.as_u16(),
            message: message.into(),
        }
    }

    pub fn network(provider: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            provider: provider.into(),
            source,
        }
    }

    pub fn invalid_response(provider: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidResponse {
            provider: provider.into(),
            reason: reason.into(),
        }
    }

    pub fn unsupported_provider_type(
        provider: impl Into<String>,
        provider_type: impl Into<String>,
    ) -> Self {
        Self::UnsupportedProviderType {
            provider: provider.into(),
            provider_type: provider_type.into(),
        }
    }

    /// The only failure kind that triggers a switch to the fallback provider.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, ModelError::RateLimited { .. })
    }

    pub fn user_message(&self) -> String {
        match self {
            ModelError::ProviderNotFound { provider } => {
                format!("Model provider '{provider}' is not configured. Check triage.toml.")
            }
            ModelError::ModelNotFound { provider, model } => {
                format!("Model '{model}' is not available on provider '{provider}'.")
            }
            ModelError::MissingApiKey { provider } => {
                format!("Provider '{provider}' needs an API key. Set the variable named by api_key.")
            }
            ModelError::RateLimited {
                provider,
                retry_after,
            } => match retry_after {
                Some(wait) => format!(
                    "Provider '{provider}' is rate limiting requests. Retry in {}s.",
                    wait.as_secs().max(1)
                ),
                None => format!("Provider '{provider}' is rate limiting requests."),
            },
            ModelError::Status {
                provider, status, ..
            } => format!("Request to '{provider}' failed with status {status}."),
            ModelError::Network { provider, source } => {
                if source.is_connect() {
                    format!("Cannot connect to model provider '{provider}'.")
                } else if source.is_timeout() {
                    format!("Request to '{provider}' timed out.")
                } else {
                    format!("Network error while calling '{provider}'.")
                }
            }
            ModelError::InvalidResponse { provider, .. } => {
                format!("Provider '{provider}' returned a response that could not be read.")
            }
            ModelError::UnsupportedProviderType {
                provider,
                provider_type,
            } => format!(
                "Provider type '{provider_type}' for '{provider}' is not supported. Use an OpenAI-compatible provider."
            ),
        }
    }
}
