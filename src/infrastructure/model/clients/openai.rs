//! OpenAI-compatible client implementation

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use super::base::HttpClientBase;
use crate::config::ModelProviderConfig;
use crate::constants::DEFAULT_OPENAI_API_PATH;
use crate::infrastructure::model::adapter::MessageAdapter;
use crate::infrastructure::model::factory::resolve_api_key;
use crate::infrastructure::model::traits::ModelClient;
use crate::infrastructure::model::types::{ModelError, ModelRequest, ModelResponse};
use crate::types::{ChatMessage, TokenUsage};

/// OpenAI-compatible client (works with OpenAI, Groq, and other chat-completions APIs)
#[derive(Clone)]
pub struct OpenAIClient {
    base: HttpClientBase,
    api_path: String,
}

impl OpenAIClient {
    pub fn from_config(config: &ModelProviderConfig) -> Self {
        let api_key = resolve_api_key(&config.id, config.api_key.as_deref());
        Self::new(
            config.id.clone(),
            config.endpoint.clone(),
            api_key,
            config.api_path.clone(),
        )
    }

    pub fn new(
        id: impl Into<String>,
        endpoint: impl Into<String>,
        api_key: Option<String>,
        api_path: Option<String>,
    ) -> Self {
        Self {
            base: HttpClientBase::new(id.into(), endpoint.into(), api_key),
            api_path: api_path.unwrap_or_else(|| DEFAULT_OPENAI_API_PATH.to_string()),
        }
    }
}

#[async_trait]
impl ModelClient for OpenAIClient {
    fn id(&self) -> &str {
        &self.base.id
    }

    async fn chat(&self, request: ModelRequest) -> Result<ModelResponse, ModelError> {
        let url = self.base.build_url(&self.api_path);
        let payload = OpenAIRequest::from(&request);

        info!(
            provider = self.base.id.as_str(),
            model = request.model.as_str(),
            messages = request.messages.len(),
            tools = request.tools.len(),
            "Sending request to OpenAI-compatible provider"
        );

        let response: OpenAIResponse = self.base.post_with_bearer(&url, &payload).await?;
        debug!(
            provider = self.base.id.as_str(),
            "Received response from OpenAI-compatible provider"
        );

        response.into_model_response(&self.base.id)
    }
}

#[derive(Serialize)]
struct OpenAIRequest {
    model: String,
    messages: Vec<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    parallel_tool_calls: Option<bool>,
    stream: bool,
}

impl From<&ModelRequest> for OpenAIRequest {
    fn from(request: &ModelRequest) -> Self {
        let has_tools = !request.tools.is_empty();
        Self {
            model: request.model.clone(),
            messages: MessageAdapter::to_openai_format(&request.messages),
            tools: MessageAdapter::tools_to_openai(&request.tools),
            tool_choice: has_tools.then(|| request.tool_choice.as_str()),
            parallel_tool_calls: request.parallel_tool_calls.filter(|_| has_tools),
            stream: false,
        }
    }
}

#[derive(Deserialize)]
struct OpenAIResponse {
    #[serde(default)]
    choices: Vec<OpenAIChoice>,
    usage: Option<OpenAIUsage>,
}

#[derive(Deserialize)]
struct OpenAIChoice {
    message: Option<OpenAIMessage>,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct OpenAIMessage {
    content: Option<String>,
    #[serde(default)]
    tool_calls: Vec<OpenAIToolCall>,
}

#[derive(Deserialize)]
struct OpenAIToolCall {
    id: String,
    function: OpenAIFunction,
}

#[derive(Deserialize)]
struct OpenAIFunction {
    name: String,
    #[serde(default)]
    arguments: String,
}

#[derive(Deserialize)]
struct OpenAIUsage {
    #[serde(default)]
    prompt_tokens: u64,
    #[serde(default)]
    completion_tokens: u64,
    #[serde(default)]
    total_tokens: u64,
}

impl OpenAIResponse {
    fn into_model_response(self, provider: &str) -> Result<ModelResponse, ModelError> {
        let usage = self
            .usage
            .map(|u| TokenUsage::new(u.prompt_tokens, u.completion_tokens, u.total_tokens));

        let choice = self
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ModelError::invalid_response(provider, "missing choices"))?;
        let message = choice
            .message
            .ok_or_else(|| ModelError::invalid_response(provider, "missing message"))?;

        let tool_calls = message
            .tool_calls
            .into_iter()
            .map(|call| {
                MessageAdapter::tool_call_from_openai(call.id, call.function.name, call.function.arguments)
            })
            .collect();

        Ok(ModelResponse::new(
            ChatMessage::assistant(message.content, tool_calls),
            choice.finish_reason,
            usage,
        ))
    }
}
