//! Resolve command handler
//!
//! Resolves every scenic area in a data file to coordinates, updating the
//! file in place and reporting found/fallback counts per city.

use crate::cache::TtlCache;
use crate::config::Config;
use crate::error::Result;
use crate::geocode::{CoordinateResolver, Provider};
use crate::model::files;
use crate::pipeline;
use clap::Args;
use std::path::PathBuf;

/// Resolve command arguments
#[derive(Args)]
pub struct ResolveArgs {
    /// Scenic-area JSON file to resolve
    #[arg(default_value = "scenic-area.json")]
    pub input: PathBuf,

    /// Only resolve areas in this city
    #[arg(long)]
    pub city: Option<String>,

    /// Reuse the assembled result for this province when fresh
    #[arg(long)]
    pub province: Option<String>,

    /// Resolve without writing the updated areas back to the input file
    #[arg(long)]
    pub dry_run: bool,
}

/// Run the resolve command
pub async fn run(args: ResolveArgs) -> Result<()> {
    let config = Config::load()?;
    let cache_dir = config.cache_dir();

    // The assembled list for a province is cached for four hours.
    let mut province_cache = TtlCache::provinces(&cache_dir)?;
    if let Some(province) = &args.province {
        if let Some(areas) = pipeline::cached_province_areas(&mut province_cache, province) {
            println!("Using cached results for {} ({} areas)", province, areas.len());
            if !args.dry_run {
                files::save_scenic_areas(&args.input, &areas)?;
            }
            return Ok(());
        }
    }

    let mut areas = files::load_scenic_areas(&args.input)?;
    if let Some(city) = &args.city {
        areas.retain(|a| a.in_city(city));
    }
    println!("Resolving {} areas", areas.len());

    let provider = Provider::from_parts(
        &config.api.provider,
        &config.api_key()?,
        config.api_secret(),
    )?;
    let mut resolver = CoordinateResolver::new(provider, TtlCache::coordinates(&cache_dir)?)
        .with_response_cache(TtlCache::responses(&cache_dir)?)
        .with_options(config.resolver_options());

    let summary = resolver.resolve_batch(&mut areas).await?;

    println!();
    println!("Found:    {}", summary.found);
    println!("Fallback: {}", summary.fallback);
    for (city, counts) in &summary.by_city {
        println!("  {}: {} found, {} fallback", city, counts.found, counts.fallback);
    }

    if !args.dry_run {
        files::save_scenic_areas(&args.input, &areas)?;
        println!("Updated {}", args.input.display());
    }
    if let Some(province) = &args.province {
        pipeline::store_province_areas(&mut province_cache, province, &areas)?;
    }

    Ok(())
}
