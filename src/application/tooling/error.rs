use thiserror::Error;

/// Failure inside a tool backend. The registry turns these into
/// `{"error": ...}` objects for the model instead of aborting the run.
#[derive(Debug, Error)]
pub enum ToolInvokeError {
    #[error("{backend} backend failed: {message}")]
    Backend {
        backend: &'static str,
        message: String,
    },
    #[error("{backend} returned data that could not be encoded: {source}")]
    Encode {
        backend: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl ToolInvokeError {
    pub fn backend(backend: &'static str, message: impl Into<String>) -> Self {
        Self::Backend {
            backend,
            message: message.into(),
        }
    }
}

/// Why a requested call could not be turned into a typed invocation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvocationError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),
    #[error("Invalid arguments for {tool}: {reason}")]
    InvalidArguments { tool: String, reason: String },
}
