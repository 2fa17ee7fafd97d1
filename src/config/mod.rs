pub mod app;
pub mod error;
pub mod loader;
pub mod provider;

pub use crate::constants::CONFIG_PATH;
pub use app::{AppConfig, FallbackConfig};
pub use error::ConfigError;
pub use provider::{ModelInfo, ModelProviderConfig};
