//! CLI command handlers
//!
//! Each subcommand has its own module with handler functions.

pub mod cache;
pub mod config;
pub mod discover;
pub mod resolve;
pub mod terms;

use clap::{Parser, Subcommand};

/// Scenic-area geocoding and spot discovery
#[derive(Parser)]
#[command(name = "spot-scout")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve scenic areas to coordinates
    Resolve(resolve::ResolveArgs),

    /// Discover spots around scenic areas
    Discover(discover::DiscoverArgs),

    /// Show the key terms and search queries for a name
    Terms(terms::TermsArgs),

    /// Inspect and clear the caches
    Cache(cache::CacheArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

/// Run the CLI
pub async fn run() -> crate::error::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Resolve(args) => resolve::run(args).await,
        Commands::Discover(args) => discover::run(args).await,
        Commands::Terms(args) => terms::run(args),
        Commands::Cache(args) => cache::run(args),
        Commands::Config(args) => config::run(args),
    }
}
