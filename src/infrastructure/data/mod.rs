//! File-backed data sources: customers, plan tiers, knowledge base, tickets.

mod customers;
mod error;
mod knowledge_base;
mod tickets;

pub use customers::{CUSTOMERS_FILE, CustomerDirectory, PLAN_TIERS_FILE};
pub use error::DataError;
pub use knowledge_base::{KNOWLEDGE_BASE_FILE, KnowledgeBaseStore};
pub use tickets::{SAMPLE_TICKETS_FILE, load_tickets};

use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, DataError> {
    let content = fs::read_to_string(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| DataError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
