//! Cache command handler
//!
//! Shows entry counts and clears individual cache namespaces. Clearing the
//! coordinate cache is the only way to retry a lookup that previously fell
//! back.

use crate::cache::TtlCache;
use crate::config::Config;
use crate::error::Result;
use clap::Args;

/// Cache command arguments
#[derive(Args)]
pub struct CacheArgs {
    /// Clear the coordinate cache
    #[arg(long)]
    pub clear_coordinates: bool,

    /// Clear the raw-response cache
    #[arg(long)]
    pub clear_responses: bool,

    /// Clear the province result cache
    #[arg(long)]
    pub clear_provinces: bool,

    /// Clear everything
    #[arg(long)]
    pub clear_all: bool,
}

/// Run the cache command
pub fn run(args: CacheArgs) -> Result<()> {
    let config = Config::load()?;
    let dir = config.cache_dir();

    let mut coordinates = TtlCache::coordinates(&dir)?;
    let mut responses = TtlCache::responses(&dir)?;
    let mut provinces = TtlCache::provinces(&dir)?;

    let mut cleared = false;
    if args.clear_coordinates || args.clear_all {
        coordinates.clear()?;
        println!("Coordinate cache cleared");
        cleared = true;
    }
    if args.clear_responses || args.clear_all {
        responses.clear()?;
        println!("Response cache cleared");
        cleared = true;
    }
    if args.clear_provinces || args.clear_all {
        provinces.clear()?;
        println!("Province cache cleared");
        cleared = true;
    }

    if !cleared {
        println!("Cache directory: {}", dir.display());
        println!("  coordinates: {} entries", coordinates.len());
        println!("  responses:   {} entries", responses.len());
        println!("  provinces:   {} entries", provinces.len());
    }

    Ok(())
}
