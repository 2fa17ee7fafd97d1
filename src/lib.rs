pub mod application;
pub mod cli;
pub mod config;
pub mod constants;
pub mod domain;
pub mod infrastructure;

pub use application::{agent, tooling};
pub use cli::Cli;
pub use config::{AppConfig, ModelProviderConfig};
pub use domain::types;
pub use infrastructure::{data, model};

use agent::{AgentOptions, TriageAgent};
use data::{CustomerDirectory, KNOWLEDGE_BASE_FILE, KnowledgeBaseStore, SAMPLE_TICKETS_FILE};
use domain::Ticket;
use model::{DynamicModelProvider, ProviderChain};
use std::error::Error;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tooling::ToolRegistry;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

pub async fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    init_tracing(cli.quiet);
    info!("Starting ticket triage");
    debug!(
        config = ?cli.config,
        tickets = ?cli.tickets,
        ids = ?cli.ticket_ids,
        "CLI arguments parsed"
    );

    let config_path = cli.config.as_deref().map(Path::new);
    let config = AppConfig::load(config_path)?;
    info!(
        provider = config.default_provider.as_str(),
        model = config.model.as_str(),
        fallback = ?config.fallback,
        "Loaded configuration"
    );

    let tickets_path = cli
        .tickets
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(|| config.data_dir.join(SAMPLE_TICKETS_FILE));
    let tickets = data::load_tickets(&tickets_path)?;

    if cli.list {
        for ticket in &tickets {
            println!(
                "{}\t{}\t{}",
                ticket.ticket_id,
                ticket.customer_email,
                ticket.subject_or_placeholder()
            );
        }
        return Ok(());
    }

    let selected = select_tickets(&tickets, &cli.ticket_ids);
    let agent = build_agent(&config)?;

    let mut failures = 0usize;
    for ticket in &selected {
        match agent.process_ticket(ticket).await {
            Ok(response) => println!("{}", serde_json::to_string_pretty(&response)?),
            Err(err) => {
                failures += 1;
                error!(ticket_id = err.ticket_id(), error = %err, "Ticket failed");
                eprintln!("{}", err.user_message());
            }
        }
    }

    info!(
        processed = selected.len(),
        failed = failures,
        "Triage run finished"
    );
    Ok(())
}

/// Wires configuration, data sources, tools and providers into an agent.
pub fn build_agent(config: &AppConfig) -> Result<TriageAgent<DynamicModelProvider>, Box<dyn Error>> {
    let system_prompt = config.load_system_prompt()?;
    let customers = CustomerDirectory::load(&config.data_dir)?;
    let knowledge_base = KnowledgeBaseStore::open(&config.data_dir.join(KNOWLEDGE_BASE_FILE))?;
    let registry = ToolRegistry::new(Arc::new(customers), Arc::new(knowledge_base))
        .with_kb_results(config.kb_results);

    debug!(
        provider_count = config.providers.len(),
        "Initializing dynamic model providers"
    );
    let provider = DynamicModelProvider::from_configs(&config.providers)?;
    let mut chain = ProviderChain::new(provider, config.primary_route());
    if let Some(fallback) = config.fallback_route() {
        chain = chain.with_fallback(fallback);
    } else {
        warn!("No fallback provider configured, rate limits will fail the ticket");
    }

    let options = AgentOptions::default().with_max_rounds(config.max_rounds);
    Ok(TriageAgent::new(chain, Arc::new(registry), system_prompt).with_options(options))
}

fn select_tickets<'a>(tickets: &'a [Ticket], ids: &[String]) -> Vec<&'a Ticket> {
    if ids.is_empty() {
        return tickets.iter().collect();
    }
    ids.iter()
        .filter_map(|id| {
            let found = tickets.iter().find(|ticket| &ticket.ticket_id == id);
            if found.is_none() {
                warn!(ticket_id = id.as_str(), "Ticket not found, skipping");
            }
            found
        })
        .collect()
}

fn init_tracing(quiet: bool) {
    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(|| {
        let filter = if quiet {
            EnvFilter::new("warn")
        } else {
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
        };
        fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_level(true)
            .with_writer(std::io::stderr)
            .init();
    });
}
