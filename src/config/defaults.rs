//! Default configuration values

use crate::constants::{filter, search};

pub const DEFAULT_PROVIDER: &str = "amap";
pub const DEFAULT_CACHE_DIR: &str = "cache";
pub const DEFAULT_STRENGTH: &str = "moderate";

pub fn default_provider() -> String {
    DEFAULT_PROVIDER.to_string()
}

pub fn default_cache_dir() -> String {
    DEFAULT_CACHE_DIR.to_string()
}

pub fn default_strength() -> String {
    DEFAULT_STRENGTH.to_string()
}

pub fn default_true() -> bool {
    true
}

pub fn default_page_size() -> u32 {
    search::DEFAULT_PAGE_SIZE
}

pub fn default_delay_ms() -> u64 {
    search::REQUEST_DELAY_MS
}

pub fn default_max_results() -> usize {
    filter::DEFAULT_MAX_RESULTS
}

pub fn default_min_score() -> f64 {
    filter::MODERATE_MIN_SCORE
}
