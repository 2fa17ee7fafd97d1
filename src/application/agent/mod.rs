mod errors;
mod models;
mod parser;
mod runner;

#[cfg(test)]
mod tests;

pub use errors::AgentError;
pub use models::{AgentOptions, AgentResponse, MAX_TOOL_ROUNDS, ToolTrace};
pub use parser::parse_final_answer;
pub use runner::TriageAgent;
