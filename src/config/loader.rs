use super::app::{AppConfig, FallbackConfig};
use super::error::ConfigError;
use super::provider::{ModelProviderConfig, RawProviderConfig};
use crate::application::agent::MAX_TOOL_ROUNDS;
use crate::application::tooling::DEFAULT_KB_RESULTS;
use crate::constants::{
    CONFIG_PATH, DEFAULT_DATA_DIR, DEFAULT_FALLBACK_MODEL, DEFAULT_SYSTEM_PROMPT_PATH, ENV_PATHS,
    MODEL_ENV_VAR,
};
use dotenvy::from_filename;
use serde::Deserialize;
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Once;
use tracing::{debug, info};

static ENV_LOADER: Once = Once::new();

/// Raw configuration structure for deserialization from TOML
#[derive(Debug, Deserialize, Default)]
pub(super) struct RawConfig {
    pub model: Option<String>,
    pub default_provider: Option<String>,
    pub fallback: Option<RawFallback>,
    pub system_prompt_path: Option<String>,
    pub data_dir: Option<String>,
    pub max_rounds: Option<usize>,
    pub kb_results: Option<usize>,
    #[serde(default)]
    pub providers: Vec<RawProviderConfig>,
}

#[derive(Debug, Deserialize)]
pub(super) struct RawFallback {
    pub provider: String,
    pub model: Option<String>,
}

/// Ensures environment variables are loaded from the `.env` files
pub fn ensure_env_loaded() {
    ENV_LOADER.call_once(|| {
        for path in ENV_PATHS {
            if from_filename(path).is_ok() {
                debug!(path, "Loaded environment file");
            }
        }
    });
}

/// Load and validate configuration from a file path
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    ensure_env_loaded();
    let config_path = path.unwrap_or_else(|| Path::new(CONFIG_PATH));
    let parsed = read_config(config_path)?;
    let model_override = env::var(MODEL_ENV_VAR)
        .ok()
        .filter(|value| !value.trim().is_empty());
    validate_and_build(parsed, model_override)
}

fn read_config(path: &Path) -> Result<RawConfig, ConfigError> {
    debug!(path = %path.display(), "Reading triage configuration file");

    let content = fs::read_to_string(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            ConfigError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    parse_config(&content, path)
}

pub(super) fn parse_config(content: &str, path: &Path) -> Result<RawConfig, ConfigError> {
    toml::from_str(content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

pub(super) fn validate_and_build(
    parsed: RawConfig,
    model_override: Option<String>,
) -> Result<AppConfig, ConfigError> {
    let model = match model_override {
        Some(model) => {
            info!(model = model.as_str(), "Primary model overridden from environment");
            model
        }
        None => parsed.model.ok_or(ConfigError::MissingModel)?,
    };
    let default_provider = parsed
        .default_provider
        .ok_or(ConfigError::MissingDefaultProvider)?;

    if parsed.providers.is_empty() {
        return Err(ConfigError::NoProvidersConfigured);
    }

    let mut providers: Vec<ModelProviderConfig> = Vec::new();
    for raw_provider in parsed.providers {
        if raw_provider
            .endpoint
            .as_deref()
            .is_none_or(|endpoint| endpoint.trim().is_empty())
        {
            return Err(ConfigError::MissingEndpoint {
                provider: raw_provider.id.clone(),
            });
        }
        providers.push(ModelProviderConfig::from(raw_provider));
    }
    if !providers.iter().any(|p| p.id == default_provider) {
        return Err(ConfigError::ProviderNotFound {
            provider: default_provider,
        });
    }
    if let Some(provider) = providers.iter_mut().find(|p| p.id == default_provider) {
        provider.ensure_model(&model);
    }

    let fallback = match parsed.fallback {
        Some(raw) => {
            let model = raw
                .model
                .unwrap_or_else(|| DEFAULT_FALLBACK_MODEL.to_string());
            let Some(provider) = providers.iter_mut().find(|p| p.id == raw.provider) else {
                return Err(ConfigError::FallbackProviderNotFound {
                    provider: raw.provider,
                });
            };
            provider.ensure_model(&model);
            Some(FallbackConfig {
                provider: raw.provider,
                model,
            })
        }
        None => None,
    };

    let max_rounds = parsed.max_rounds.unwrap_or(MAX_TOOL_ROUNDS);
    if max_rounds == 0 {
        return Err(ConfigError::ZeroLimit {
            field: "max_rounds",
        });
    }
    let kb_results = parsed.kb_results.unwrap_or(DEFAULT_KB_RESULTS);
    if kb_results == 0 {
        return Err(ConfigError::ZeroLimit {
            field: "kb_results",
        });
    }

    Ok(AppConfig {
        default_provider,
        model,
        fallback,
        system_prompt_path: expand_path(
            parsed
                .system_prompt_path
                .as_deref()
                .unwrap_or(DEFAULT_SYSTEM_PROMPT_PATH),
        ),
        data_dir: expand_path(parsed.data_dir.as_deref().unwrap_or(DEFAULT_DATA_DIR)),
        max_rounds,
        kb_results,
        providers,
    })
}

fn expand_path(raw: &str) -> PathBuf {
    let expanded = shellexpand::full(raw)
        .map(|cow| cow.into_owned())
        .unwrap_or_else(|_| raw.to_string());
    PathBuf::from(expanded)
}
