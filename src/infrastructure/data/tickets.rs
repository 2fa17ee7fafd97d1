use std::path::Path;

use super::{DataError, read_json};
use crate::domain::Ticket;

pub const SAMPLE_TICKETS_FILE: &str = "sample_tickets.json";

pub fn load_tickets(path: &Path) -> Result<Vec<Ticket>, DataError> {
    read_json(path)
}
