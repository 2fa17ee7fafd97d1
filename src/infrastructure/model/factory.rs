//! Provider factory - creates clients from config

use super::clients::OpenAIClient;
use super::traits::ModelClient;
use super::types::ModelError;
use crate::config::ModelProviderConfig;
use std::env;
use tracing::warn;

/// Resolve API key from the environment variable named in the config.
pub fn resolve_api_key(provider: &str, configured: Option<&str>) -> Option<String> {
    let raw = configured.map(str::trim).filter(|raw| !raw.is_empty())?;
    let name = raw
        .strip_prefix("${")
        .and_then(|rest| rest.strip_suffix('}'))
        .unwrap_or(raw);
    match env::var(name) {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(
                provider,
                env_var = name,
                %err,
                "API key environment variable is not set"
            );
            None
        }
    }
}

/// Factory for creating model clients from provider config.
pub struct ProviderFactory;

impl ProviderFactory {
    /// Creates a model client based on provider type.
    ///
    /// Every backend must speak chat-completions with tool calling, so only
    /// `openai`-style types (`openai`, `groq`, `openai-compatible`) are accepted.
    pub fn create(config: &ModelProviderConfig) -> Result<Box<dyn ModelClient>, ModelError> {
        match config.provider_type.to_lowercase().as_str() {
            "openai" | "groq" | "openai-compatible" | "" => {
                Ok(Box::new(OpenAIClient::from_config(config)))
            }
            other => Err(ModelError::unsupported_provider_type(&config.id, other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(provider_type: &str) -> ModelProviderConfig {
        ModelProviderConfig {
            id: "primary".into(),
            provider_type: provider_type.into(),
            endpoint: "https://api.openai.com".into(),
            api_key: None,
            api_path: None,
            models: Vec::new(),
        }
    }

    #[test]
    fn accepts_openai_compatible_types() {
        for kind in ["openai", "GROQ", "openai-compatible"] {
            let client = ProviderFactory::create(&config(kind)).expect("supported");
            assert_eq!(client.id(), "primary");
        }
    }

    #[test]
    fn rejects_other_types() {
        let err = ProviderFactory::create(&config("ollama")).err().expect("unsupported");
        assert!(matches!(err, ModelError::UnsupportedProviderType { .. }));
    }

    #[test]
    fn blank_key_spec_resolves_to_none() {
        assert_eq!(resolve_api_key("openai", Some("   ")), None);
        assert_eq!(resolve_api_key("openai", None), None);
    }
}
