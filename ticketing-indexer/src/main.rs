//! Ticketing read model CLI
//!
//! Queries the ticketing program's accounts and prints JSON views.

use anyhow::Result;
use clap::{Parser, Subcommand};
use serde::Serialize;
use ticketing_indexer::services::{degrade, parse_address};
use ticketing_indexer::{IndexerConfig, LightRpcClient, ReadModel};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "ticketing-indexer")]
#[command(about = "Read model over the ticketing program's on-chain accounts")]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "indexer.toml")]
    config: String,

    /// Override RPC endpoint
    #[arg(long)]
    rpc_url: Option<String>,

    /// Override log level
    #[arg(long)]
    log_level: Option<String>,

    /// Dry run mode (validate config and exit)
    #[arg(long)]
    dry_run: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Platform-wide totals
    Stats,
    /// Event listings
    Events {
        /// Only events live right now
        #[arg(long)]
        active: bool,
        /// Only events created by this authority
        #[arg(long)]
        authority: Option<String>,
    },
    /// A single event by address
    Event { address: String },
    /// Tickets by owner or by event
    Tickets {
        #[arg(long, conflicts_with = "event")]
        owner: Option<String>,
        #[arg(long)]
        event: Option<String>,
    },
    /// A single ticket by address
    Ticket { address: String },
    /// Resale listings
    Listings {
        #[arg(long)]
        event: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config_missing = !std::path::Path::new(&cli.config).exists();
    let mut config = IndexerConfig::from_file(&cli.config)?;

    if let Some(log_level) = cli.log_level {
        config.monitoring.log_level = log_level;
    }
    if let Some(rpc_url) = cli.rpc_url {
        config.rpc.url = rpc_url;
    }

    init_logging(&config);
    if config_missing {
        warn!("Config file not found, using defaults plus environment: {}", cli.config);
    }

    config.check()?;
    info!("Program ID: {}", config.program.program_id);
    info!("RPC endpoint: {}", config.rpc.url);

    if cli.dry_run {
        info!("Dry run mode - configuration is valid, exiting");
        return Ok(());
    }

    let client = LightRpcClient::from_config(&config.rpc);
    let model = ReadModel::from_config(client, &config)?;

    match cli.command.unwrap_or(Command::Stats) {
        Command::Stats => print_json(&model.stats_response().await)?,
        Command::Events { active, authority } => {
            let events = match (active, authority) {
                (_, Some(authority)) => {
                    let authority = parse_address(&authority)?;
                    model.events_by_authority(&authority).await
                }
                (true, None) => model.active_events().await,
                (false, None) => model.all_events().await,
            };
            print_json(&degrade(events, "events"))?
        }
        Command::Event { address } => {
            let address = parse_address(&address)?;
            print_json(&model.event(&address).await?)?
        }
        Command::Tickets { owner, event } => {
            let tickets = match (owner, event) {
                (Some(owner), _) => model.tickets_by_owner(&parse_address(&owner)?).await,
                (None, Some(event)) => model.tickets_for_event(&parse_address(&event)?).await,
                (None, None) => anyhow::bail!("either --owner or --event is required"),
            };
            print_json(&degrade(tickets, "tickets"))?
        }
        Command::Ticket { address } => {
            let address = parse_address(&address)?;
            print_json(&model.ticket(&address).await?)?
        }
        Command::Listings { event } => {
            let listings = match event {
                Some(event) => model.listings_for_event(&parse_address(&event)?).await,
                None => model.marketplace_listings().await,
            };
            print_json(&degrade(listings, "listings"))?
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn init_logging(config: &IndexerConfig) {
    let log_level = config
        .monitoring
        .log_level
        .parse()
        .unwrap_or(tracing::Level::INFO);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("ticketing_indexer={}", log_level).into());

    // stdout carries the JSON output, so logs go to stderr
    if config.monitoring.structured_logging {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
