//! Discover command handler
//!
//! Runs the full pipeline for one or all scenic areas and writes the
//! per-area spots artifacts.

use crate::cache::TtlCache;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::geocode::{CoordinateResolver, Provider};
use crate::model::files::{self, SpotsArtifact};
use crate::pipeline::{self, DiscoverOptions};
use crate::search::client::SpotSearchClient;
use crate::search::relevance::FilterStrength;
use clap::Args;
use std::path::PathBuf;

/// Discover command arguments
#[derive(Args)]
pub struct DiscoverArgs {
    /// Scenic-area JSON file
    #[arg(default_value = "scenic-area.json")]
    pub input: PathBuf,

    /// Discover only the area with this name (default: all areas)
    #[arg(long, short = 'n')]
    pub name: Option<String>,

    /// Output directory for per-area spot files
    #[arg(long, short = 'o', default_value = "spots")]
    pub out: PathBuf,

    /// Search radius in meters (default: derived from the area level)
    #[arg(long, short = 'r')]
    pub radius: Option<u32>,

    /// Filter strength: strict, moderate, or loose
    #[arg(long, short = 's')]
    pub strength: Option<String>,

    /// Disable relevance filtering
    #[arg(long)]
    pub no_filter: bool,
}

/// Run the discover command
pub async fn run(args: DiscoverArgs) -> Result<()> {
    let config = Config::load()?;
    let cache_dir = config.cache_dir();

    let mut areas = files::load_scenic_areas(&args.input)?;
    if let Some(name) = &args.name {
        areas.retain(|a| &a.name == name);
        if areas.is_empty() {
            return Err(Error::DataFile(format!("No area named {}", name)));
        }
    }

    let mut options = build_options(&config, &args)?;
    options.radius = args.radius;

    let provider = Provider::from_parts(
        &config.api.provider,
        &config.api_key()?,
        config.api_secret(),
    )?;
    let mut resolver = CoordinateResolver::new(provider, TtlCache::coordinates(&cache_dir)?)
        .with_response_cache(TtlCache::responses(&cache_dir)?)
        .with_options(config.resolver_options());
    let client = SpotSearchClient::new(config.api_key()?, config.api_secret())?;

    let out = args.out.clone();
    let report = pipeline::discover_batch(&mut resolver, &client, &areas, &options, |area, discovery| {
        println!(
            "{}: {} spots ({} of {} queries failed)",
            area.name,
            discovery.spots.len(),
            discovery.queries_failed,
            discovery.queries_run
        );
        let mut resolved = area.clone();
        resolved.set_center(discovery.resolution.coordinates);
        SpotsArtifact::new(discovery.spots, resolved).save(&out)?;
        Ok(())
    })
    .await;

    println!();
    println!("Succeeded: {}", report.succeeded);
    println!("Failed:    {}", report.failed);
    for item in report.items.iter().filter(|i| i.error.is_some()) {
        println!("  {}: {}", item.name, item.error.as_deref().unwrap_or(""));
    }

    Ok(())
}

fn build_options(config: &Config, args: &DiscoverArgs) -> Result<DiscoverOptions> {
    let mut options = config.discover_options()?;
    if args.no_filter {
        options.filter.enable_filtering = false;
    }
    if let Some(strength) = &args.strength {
        options.filter.strength = Some(strength.parse::<FilterStrength>()?);
    }
    Ok(options)
}
