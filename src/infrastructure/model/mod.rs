//! Model infrastructure module
//!
//! # Structure
//! - `types` - Request, Response, Error types
//! - `traits` - ModelProvider, ModelClient traits
//! - `adapter` - chat-completions wire format
//! - `factory` - Provider factory for creating clients
//! - `clients` - Individual client implementations
//! - `provider` - DynamicModelProvider for routing by provider id
//! - `chain` - primary/fallback strategy used by the agent

pub mod adapter;
pub mod chain;
pub mod clients;
pub mod factory;
pub mod provider;
pub mod traits;
pub mod types;

pub use chain::{ModelRoute, ProviderChain, ProviderChainError, Served};
pub use provider::DynamicModelProvider;
pub use traits::{ModelClient, ModelProvider};
pub use types::{ModelError, ModelRequest, ModelResponse, ToolChoice};
