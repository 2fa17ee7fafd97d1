use clap::Parser;
use std::error::Error;
use ticket_triage::{Cli, run};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    run(cli).await
}
