//! spot-scout: Scenic-Area Spot Discovery
//!
//! A library and CLI tool for resolving named scenic areas to trustworthy
//! coordinates and discovering the nearby points of interest that actually
//! belong to them, while minimizing calls to rate-limited geocoding and
//! place-search APIs.
//!
//! ## Features
//!
//! - Multiple geocoding providers (AMap, Baidu) behind one trait
//! - Deterministic city-center fallback when live geocoding fails
//! - Multi-strategy query planning from key terms of the area name
//! - Relevance scoring and filtering of discovered spots
//! - Two-tier, TTL-bounded, file-persisted caching with signed requests
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use spot_scout::cache::TtlCache;
//! use spot_scout::geocode::{amap::AmapProvider, CoordinateResolver};
//! use spot_scout::model::ScenicArea;
//!
//! # async fn example() -> spot_scout::Result<()> {
//! let provider = AmapProvider::new("your-api-key", None)?;
//! let cache = TtlCache::coordinates(std::path::Path::new("cache"))?;
//! let mut resolver = CoordinateResolver::new(provider, cache);
//!
//! let mut area = ScenicArea::named("龙门石窟");
//! area.city = Some("洛阳".to_string());
//!
//! let resolution = resolver.resolve(&area).await?;
//! println!("{:?} via {}", resolution.coordinates, resolution.source);
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod geocode;
pub mod model;
pub mod pipeline;
pub mod search;
pub(crate) mod serde_helpers;
pub mod sign;

// Re-export commonly used types
pub use config::Config;
pub use error::{Error, Result};
pub use model::{Coordinates, Resolution, ResolutionStatus, ScenicArea, Spot};
