//! CLI command handlers
//!
//! Each subcommand has its own module with handler functions.

pub mod config;
pub mod nearby;
pub mod neighbourhoods;
pub mod resolve;
pub mod serve;

use crate::error::{Error, Result};
use crate::format::{get_formatter, OutputFormatter};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Neighbourhood resolution and proximity search
#[derive(Parser)]
#[command(name = "neighbourly")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Find the neighbourhood a location lies in
    Resolve(resolve::ResolveArgs),

    /// Rank neighbourhoods by distance from a location
    Nearby(nearby::NearbyArgs),

    /// List the neighbourhood taxonomy
    Neighbourhoods(neighbourhoods::NeighbourhoodsArgs),

    /// Start web server (foreground)
    Serve(serve::ServeArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

/// Run the CLI
pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Resolve(args) => resolve::run(args).await,
        Commands::Nearby(args) => nearby::run(args).await,
        Commands::Neighbourhoods(args) => neighbourhoods::run(args),
        Commands::Serve(args) => serve::run(args).await,
        Commands::Config(args) => config::run(args),
    }
}

/// Initialize logging to stderr; RUST_LOG overrides `default_level`
pub(crate) fn init_tracing(default_level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Look up an output formatter, listing the choices on failure
pub(crate) fn formatter(name: &str) -> Result<Box<dyn OutputFormatter>> {
    get_formatter(name).ok_or_else(|| {
        let choices: Vec<String> = crate::format::available_formats()
            .into_iter()
            .map(|f| f.name)
            .collect();
        Error::Config(format!(
            "Unknown format: {} (available: {})",
            name,
            choices.join(", ")
        ))
    })
}
