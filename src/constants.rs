//! Application constants
//!
//! Single source of truth for paths and other constants.

/// Default configuration file path
pub const CONFIG_PATH: &str = "config/triage.toml";

/// Environment files, loaded in order. Existing variables are never overwritten.
pub const ENV_PATHS: &[&str] = &["config/.env", ".env"];

/// Overrides the primary `model` from the config file when set.
pub const MODEL_ENV_VAR: &str = "OPENAI_MODEL";

/// Chat-completions path used when a provider does not set `api_path`
pub const DEFAULT_OPENAI_API_PATH: &str = "/v1/chat/completions";

/// Model requested from the fallback provider when `[fallback]` omits one
pub const DEFAULT_FALLBACK_MODEL: &str = "llama-3.1-8b-instant";

pub const DEFAULT_SYSTEM_PROMPT_PATH: &str = "prompts/system_prompt.txt";
pub const DEFAULT_DATA_DIR: &str = "data";
