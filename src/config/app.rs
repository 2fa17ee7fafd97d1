use super::error::ConfigError;
use super::provider::ModelProviderConfig;
use crate::model::ModelRoute;
use std::fs;
use std::path::{Path, PathBuf};

/// Provider used for a round when the primary is rate limited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackConfig {
    pub provider: String,
    pub model: String,
}

/// Application configuration loaded from triage.toml
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub default_provider: String,
    pub model: String,
    pub fallback: Option<FallbackConfig>,
    pub system_prompt_path: PathBuf,
    pub data_dir: PathBuf,
    pub max_rounds: usize,
    pub kb_results: usize,
    pub providers: Vec<ModelProviderConfig>,
}

impl AppConfig {
    /// Load configuration from a file path (or default path if None)
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        super::loader::load_config(path)
    }

    pub fn primary_route(&self) -> ModelRoute {
        ModelRoute::new(&self.default_provider, &self.model)
    }

    pub fn fallback_route(&self) -> Option<ModelRoute> {
        self.fallback
            .as_ref()
            .map(|fallback| ModelRoute::new(&fallback.provider, &fallback.model))
    }

    /// Reads the system instruction once at startup.
    pub fn load_system_prompt(&self) -> Result<String, ConfigError> {
        let path = &self.system_prompt_path;
        let prompt = fs::read_to_string(path).map_err(|source| ConfigError::SystemPrompt {
            path: path.clone(),
            source,
        })?;
        if prompt.trim().is_empty() {
            return Err(ConfigError::EmptySystemPrompt { path: path.clone() });
        }
        Ok(prompt)
    }
}
