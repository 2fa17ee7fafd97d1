use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "ticket-triage",
    version,
    about = "Triage support tickets with a tool-calling model"
)]
pub struct Cli {
    /// Configuration file path
    #[arg(long, short)]
    pub config: Option<String>,
    /// Tickets file (defaults to sample_tickets.json in the data directory)
    #[arg(long)]
    pub tickets: Option<String>,
    /// List the available tickets and exit
    #[arg(long)]
    pub list: bool,
    /// Only log warnings and errors
    #[arg(long, short)]
    pub quiet: bool,
    /// Ticket ids to process; all tickets when omitted
    pub ticket_ids: Vec<String>,
}
