//! Primary/fallback provider strategy.
//!
//! A round is first sent to the primary route. Only a rate-limit failure
//! moves the same round to the fallback route, which is asked for sequential
//! tool calls. The next round starts again from the primary.

use super::traits::ModelProvider;
use super::types::{ModelError, ModelRequest, ModelResponse, ToolChoice};
use crate::types::{ChatMessage, ToolDefinition};
use thiserror::Error;
use tracing::{error, warn};

/// A provider id plus the model to request from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelRoute {
    pub provider: String,
    pub model: String,
}

impl ModelRoute {
    pub fn new(provider: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            model: model.into(),
        }
    }
}

/// Which route produced a response.
#[derive(Debug)]
pub enum Served {
    Primary(ModelResponse),
    /// The primary was rate limited; the fallback answered instead.
    Fallback {
        response: ModelResponse,
        primary_error: ModelError,
    },
}

impl Served {
    pub fn response(&self) -> &ModelResponse {
        match self {
            Served::Primary(response) => response,
            Served::Fallback { response, .. } => response,
        }
    }

    pub fn into_response(self) -> ModelResponse {
        match self {
            Served::Primary(response) => response,
            Served::Fallback { response, .. } => response,
        }
    }

    pub fn used_fallback(&self) -> bool {
        matches!(self, Served::Fallback { .. })
    }
}

#[derive(Debug, Error)]
pub enum ProviderChainError {
    /// The primary failed with something other than a rate limit.
    #[error("primary provider failed: {0}")]
    Primary(#[source] ModelError),
    #[error("rate limit reached ({primary}) and no fallback provider is configured")]
    NoFallback { primary: ModelError },
    #[error("rate limit reached ({primary}) and fallback failed: {fallback}")]
    Exhausted {
        primary: ModelError,
        #[source]
        fallback: ModelError,
    },
}

impl ProviderChainError {
    pub fn user_message(&self) -> String {
        match self {
            ProviderChainError::Primary(err) => err.user_message(),
            ProviderChainError::NoFallback { primary } => primary.user_message(),
            ProviderChainError::Exhausted { primary, fallback } => format!(
                "{} The fallback provider also failed: {}",
                primary.user_message(),
                fallback.user_message()
            ),
        }
    }
}

pub struct ProviderChain<P: ModelProvider> {
    provider: P,
    primary: ModelRoute,
    fallback: Option<ModelRoute>,
}

impl<P: ModelProvider> ProviderChain<P> {
    pub fn new(provider: P, primary: ModelRoute) -> Self {
        Self {
            provider,
            primary,
            fallback: None,
        }
    }

    pub fn with_fallback(mut self, fallback: ModelRoute) -> Self {
        self.fallback = Some(fallback);
        self
    }

    pub async fn complete(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolDefinition],
    ) -> Result<Served, ProviderChainError> {
        let request = Self::request(&self.primary, messages, tools, None);
        let primary_error = match self.provider.chat(request).await {
            Ok(response) => return Ok(Served::Primary(response)),
            Err(err) if err.is_rate_limited() => err,
            Err(err) => return Err(ProviderChainError::Primary(err)),
        };

        let Some(fallback) = &self.fallback else {
            return Err(ProviderChainError::NoFallback {
                primary: primary_error,
            });
        };

        warn!(
            primary = self.primary.provider.as_str(),
            fallback = fallback.provider.as_str(),
            model = fallback.model.as_str(),
            error = %primary_error,
            "Primary provider rate limited, switching to fallback for this round"
        );

        let request = Self::request(fallback, messages, tools, Some(false));
        match self.provider.chat(request).await {
            Ok(response) => Ok(Served::Fallback {
                response,
                primary_error,
            }),
            Err(fallback_error) => {
                error!(
                    fallback = fallback.provider.as_str(),
                    error = %fallback_error,
                    "Fallback provider failed"
                );
                Err(ProviderChainError::Exhausted {
                    primary: primary_error,
                    fallback: fallback_error,
                })
            }
        }
    }

    fn request(
        route: &ModelRoute,
        messages: &[ChatMessage],
        tools: &[ToolDefinition],
        parallel_tool_calls: Option<bool>,
    ) -> ModelRequest {
        ModelRequest {
            provider: route.provider.clone(),
            model: route.model.clone(),
            messages: messages.to_vec(),
            tools: tools.to_vec(),
            tool_choice: ToolChoice::Auto,
            parallel_tool_calls,
        }
    }
}
