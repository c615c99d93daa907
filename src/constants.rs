//! Centralized constants for the spot-scout crate
//!
//! This module consolidates constants that are used across multiple modules
//! to avoid duplication and ensure consistency.

/// External API endpoints
pub mod api {
    /// AMap (Gaode) forward geocoding API
    pub const AMAP_GEOCODE_URL: &str = "https://restapi.amap.com/v3/geocode/geo";

    /// AMap (Gaode) nearby place search API
    pub const AMAP_AROUND_URL: &str = "https://restapi.amap.com/v3/place/around";

    /// Baidu forward geocoding API (returns BD-09 coordinates)
    pub const BAIDU_GEOCODE_URL: &str = "https://api.map.baidu.com/geocoding/v3/";
}

/// Cache settings
pub mod cache {
    /// Resolved coordinate cache (no expiry, cleared explicitly)
    pub const COORDINATES_CACHE_FILE: &str = "coordinates-cache.json";

    /// Raw upstream response cache file name
    pub const RESPONSES_CACHE_FILE: &str = "ai-call-cache.json";

    /// Assembled per-province result cache file name
    pub const PROVINCES_CACHE_FILE: &str = "scenic-areas-cache.json";

    /// Raw response cache duration in seconds (24 hours)
    pub const RESPONSE_TTL_SECS: u64 = 24 * 3600;

    /// Assembled province result cache duration in seconds (4 hours)
    pub const PROVINCE_TTL_SECS: u64 = 4 * 3600;
}

/// Search settings
pub mod search {
    /// Search radius in meters for 5A-graded areas
    pub const RADIUS_5A: u32 = 1500;

    /// Search radius in meters for 4A-graded areas
    pub const RADIUS_4A: u32 = 1000;

    /// Search radius in meters for everything else
    pub const RADIUS_DEFAULT: u32 = 500;

    /// Results per page requested from the place search API
    pub const DEFAULT_PAGE_SIZE: u32 = 20;

    /// Fixed delay between successive upstream requests, in milliseconds
    pub const REQUEST_DELAY_MS: u64 = 500;
}

/// Relevance filter settings
pub mod filter {
    /// Minimum score admitted under "strict" filtering
    pub const STRICT_MIN_SCORE: f64 = 0.5;

    /// Minimum score admitted under "moderate" filtering
    pub const MODERATE_MIN_SCORE: f64 = 0.3;

    /// Minimum score admitted under "loose" filtering
    pub const LOOSE_MIN_SCORE: f64 = 0.1;

    /// Distance at which the distance penalty saturates, in meters
    pub const PENALTY_DISTANCE_CAP_M: f64 = 1500.0;

    /// Largest possible distance penalty
    pub const MAX_DISTANCE_PENALTY: f64 = 0.1;

    /// Default number of spots kept after filtering
    pub const DEFAULT_MAX_RESULTS: usize = 20;
}
