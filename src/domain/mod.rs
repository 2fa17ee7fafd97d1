pub mod ticket;
pub mod triage;
pub mod types;

pub use ticket::{Ticket, TicketMessage};
pub use triage::{
    ActionKind, SchemaValidationError, Sentiment, SuggestedAction, TicketAnalysis, TriageResult,
    Urgency,
};
