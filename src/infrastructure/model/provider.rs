//! Routes each triage round to the configured backend.
//!
//! The chain names a route (provider id + model) per round; this layer maps
//! that route onto a client built from `[[providers]]`. A provider with an
//! empty model list accepts any model, which is how the fallback model can be
//! chosen without being listed.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use tracing::{debug, error};

use super::factory::ProviderFactory;
use super::traits::{ModelClient, ModelProvider};
use super::types::{ModelError, ModelRequest, ModelResponse};
use crate::config::ModelProviderConfig;

struct ProviderRuntime {
    models: HashSet<String>,
    client: Box<dyn ModelClient>,
}

impl ProviderRuntime {
    fn supports(&self, model: &str) -> bool {
        self.models.is_empty() || self.models.contains(model)
    }

    fn allowed_models(&self) -> Vec<&str> {
        let mut models: Vec<&str> = self.models.iter().map(String::as_str).collect();
        models.sort_unstable();
        models
    }
}

/// Routes requests to the backend whose id matches `request.provider`.
#[derive(Default)]
pub struct DynamicModelProvider {
    backends: HashMap<String, ProviderRuntime>,
}

impl DynamicModelProvider {
    pub fn from_configs(configs: &[ModelProviderConfig]) -> Result<Self, ModelError> {
        let mut backends = HashMap::new();

        for config in configs {
            let models: HashSet<String> = config.models.iter().map(|m| m.name.clone()).collect();
            let client = ProviderFactory::create(config)?;
            debug!(
                provider = config.id.as_str(),
                models = models.len(),
                "Registered model backend"
            );
            backends.insert(config.id.clone(), ProviderRuntime { models, client });
        }

        Ok(Self { backends })
    }

    pub fn contains(&self, provider: &str) -> bool {
        self.backends.contains_key(provider)
    }
}

#[async_trait]
impl ModelProvider for DynamicModelProvider {
    async fn chat(&self, request: ModelRequest) -> Result<ModelResponse, ModelError> {
        let provider_id = request.provider.as_str();

        let Some(runtime) = self.backends.get(provider_id) else {
            error!(
                provider = provider_id,
                model = request.model.as_str(),
                "Round routed to a provider that is not configured"
            );
            return Err(ModelError::provider_not_found(provider_id));
        };

        if !runtime.supports(&request.model) {
            error!(
                provider = provider_id,
                model = request.model.as_str(),
                allowed = ?runtime.allowed_models(),
                "Round routed to a model the provider does not list"
            );
            return Err(ModelError::model_not_found(provider_id, &request.model));
        }

        debug!(
            provider = provider_id,
            model = request.model.as_str(),
            tools = request.tools.len(),
            parallel_tool_calls = ?request.parallel_tool_calls,
            "Routing round"
        );
        runtime.client.chat(request).await
    }
}
