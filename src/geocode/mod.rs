//! Coordinate resolution
//!
//! This module handles:
//! - Geocoding provider backends (AMap, Baidu) behind one trait
//! - Cache-first resolution with a deterministic fallback path
//! - Batch resolution with rate-limit delays and per-city reporting
//!
//! ## Flex Point
//! Adding a new geocoding provider requires:
//! 1. Create `src/geocode/{provider}.rs` implementing `GeocodeProvider`
//! 2. Add a `Provider` variant and wire it in `Provider::from_parts`

pub mod amap;
pub mod baidu;
pub mod convert;
pub mod fallback;

use crate::cache::{coordinate_key, TtlCache};
use crate::error::{Error, Result};
use crate::model::{Coordinates, Resolution, ResolutionStatus, ScenicArea};
use crate::sign::content_hash;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// A single geocoder match
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodeMatch {
    pub coordinates: Coordinates,
    pub formatted_address: Option<String>,
    /// Provider's match level (street, POI, ...), reported as confidence
    pub level: Option<String>,
}

/// Trait for geocoding provider backends
///
/// Implementations must be thread-safe (Send + Sync) to work across awaits.
pub trait GeocodeProvider: Send + Sync {
    /// Returns the provider name (e.g., "amap", "baidu")
    fn name(&self) -> &'static str;

    /// Geocode a query string to the best match, or None when nothing matches
    fn geocode(
        &self,
        query: &str,
    ) -> impl std::future::Future<Output = Result<Option<GeocodeMatch>>> + Send;
}

/// Provider selected by configuration at construction time
pub enum Provider {
    Amap(amap::AmapProvider),
    Baidu(baidu::BaiduProvider),
}

impl Provider {
    /// Build a provider from its configured name and credentials
    pub fn from_parts(name: &str, key: &str, secret: Option<String>) -> Result<Self> {
        match name {
            "amap" => Ok(Provider::Amap(amap::AmapProvider::new(key, secret)?)),
            "baidu" => Ok(Provider::Baidu(baidu::BaiduProvider::new(key)?)),
            other => Err(Error::Config(format!(
                "Unknown geocoding provider: {}",
                other
            ))),
        }
    }
}

impl GeocodeProvider for Provider {
    fn name(&self) -> &'static str {
        match self {
            Provider::Amap(p) => p.name(),
            Provider::Baidu(p) => p.name(),
        }
    }

    fn geocode(
        &self,
        query: &str,
    ) -> impl std::future::Future<Output = Result<Option<GeocodeMatch>>> + Send {
        async move {
            match self {
                Provider::Amap(p) => p.geocode(query).await,
                Provider::Baidu(p) => p.geocode(query).await,
            }
        }
    }
}

/// Raw-response cache entry shape: `{ result, identifier }` plus the cache
/// timestamp added by the store
#[derive(Debug, Serialize, Deserialize)]
struct CachedGeocode {
    result: GeocodeMatch,
    identifier: String,
}

/// Resolver behavior knobs
#[derive(Debug, Clone)]
pub struct ResolverOptions {
    /// Append the street address to the geocoding query
    pub include_address: bool,

    /// Fixed delay between successive live requests in a batch
    pub request_delay: Duration,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            include_address: false,
            request_delay: Duration::from_millis(crate::constants::search::REQUEST_DELAY_MS),
        }
    }
}

/// Per-city counts reported after a batch resolution
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct CityCounts {
    pub found: usize,
    pub fallback: usize,
}

/// Aggregate outcome of a batch resolution
#[derive(Debug, Default, Serialize)]
pub struct BatchSummary {
    pub found: usize,
    pub fallback: usize,
    pub by_city: BTreeMap<String, CityCounts>,
}

/// Resolves scenic areas to coordinates, cache first, fallback last
pub struct CoordinateResolver<P> {
    provider: P,
    coord_cache: TtlCache,
    response_cache: Option<TtlCache>,
    options: ResolverOptions,
}

impl<P: GeocodeProvider> CoordinateResolver<P> {
    pub fn new(provider: P, coord_cache: TtlCache) -> Self {
        Self {
            provider,
            coord_cache,
            response_cache: None,
            options: ResolverOptions::default(),
        }
    }

    /// Attach the 24 h raw-response cache tier
    pub fn with_response_cache(mut self, cache: TtlCache) -> Self {
        self.response_cache = Some(cache);
        self
    }

    pub fn with_options(mut self, options: ResolverOptions) -> Self {
        self.options = options;
        self
    }

    /// Coordinate-cache key for an area: `name_address` (city when no
    /// address is known)
    fn cache_key(area: &ScenicArea) -> String {
        let secondary = area
            .address
            .as_deref()
            .or(area.city.as_deref())
            .unwrap_or("");
        coordinate_key(&area.name, secondary)
    }

    /// Whether a resolution for this area is already cached
    pub fn is_cached(&mut self, area: &ScenicArea) -> bool {
        self.coord_cache.get(&Self::cache_key(area)).is_some()
    }

    /// Clear the persistent coordinate cache (the only way to retry a
    /// previously failed lookup)
    pub fn clear_cache(&mut self) -> Result<()> {
        self.coord_cache.clear()
    }

    /// Geocoding query: province + city + name, optionally + address
    fn build_query(&self, area: &ScenicArea) -> String {
        let mut query = String::new();
        if let Some(province) = &area.province {
            query.push_str(province);
        }
        if let Some(city) = &area.city {
            query.push_str(city);
        }
        query.push_str(&area.name);
        if self.options.include_address {
            if let Some(address) = &area.address {
                query.push_str(address);
            }
        }
        query
    }

    /// Geocode via the raw-response cache, hitting the network only on miss
    async fn lookup(&mut self, query: &str) -> Result<Option<GeocodeMatch>> {
        let hash = content_hash(query, self.provider.name());

        if let Some(cache) = &mut self.response_cache {
            if let Some(cached) = cache.get_as::<CachedGeocode>(&hash) {
                tracing::debug!(query, "geocode raw-response cache hit");
                return Ok(Some(cached.result));
            }
        }

        let matched = self.provider.geocode(query).await?;

        if let (Some(cache), Some(result)) = (&mut self.response_cache, &matched) {
            cache.set(
                &hash,
                &CachedGeocode {
                    result: result.clone(),
                    identifier: self.provider.name().to_string(),
                },
            )?;
        }

        Ok(matched)
    }

    /// Resolve an area to a coordinate
    ///
    /// Upstream failures never surface as errors: the result falls back to
    /// the static city-center table (or the hard default) with the failure
    /// reason recorded. Both outcomes are cached, so a failing lookup is not
    /// retried until the cache is cleared.
    pub async fn resolve(&mut self, area: &ScenicArea) -> Result<Resolution> {
        let key = Self::cache_key(area);
        if let Some(cached) = self.coord_cache.get_as::<Resolution>(&key) {
            tracing::debug!(name = %area.name, "coordinate cache hit");
            return Ok(cached);
        }

        let query = self.build_query(area);
        let resolution = match self.lookup(&query).await {
            Ok(Some(matched)) => Resolution {
                name: area.name.clone(),
                coordinates: matched.coordinates,
                status: ResolutionStatus::Found,
                source: self.provider.name().to_string(),
                confidence: matched.level,
                formatted_address: matched.formatted_address,
                error: None,
            },
            Ok(None) => self.fallback_resolution(area, "geocoder returned no matches"),
            Err(e) => {
                tracing::warn!(name = %area.name, error = %e, "geocode failed, using fallback");
                self.fallback_resolution(area, &e.to_string())
            }
        };

        self.coord_cache.set(&key, &resolution)?;
        Ok(resolution)
    }

    fn fallback_resolution(&self, area: &ScenicArea, reason: &str) -> Resolution {
        let (coordinates, source) = fallback::fallback_center(area.city.as_deref());
        Resolution {
            name: area.name.clone(),
            coordinates,
            status: ResolutionStatus::Fallback,
            source: source.to_string(),
            confidence: None,
            formatted_address: None,
            error: Some(reason.to_string()),
        }
    }

    /// Resolve a batch sequentially, sleeping between live requests
    ///
    /// Each area's `center` is updated in place. Per-area failures are
    /// absorbed by the fallback path, so the batch always completes; the
    /// summary reports found/fallback counts grouped by city.
    pub async fn resolve_batch(&mut self, areas: &mut [ScenicArea]) -> Result<BatchSummary> {
        let mut summary = BatchSummary::default();

        for area in areas.iter_mut() {
            let cached = self.is_cached(area);
            let resolution = self.resolve(area).await?;
            area.set_center(resolution.coordinates);

            let city = area.city.clone().unwrap_or_else(|| "unknown".to_string());
            let counts = summary.by_city.entry(city).or_default();
            match resolution.status {
                ResolutionStatus::Found => {
                    summary.found += 1;
                    counts.found += 1;
                }
                ResolutionStatus::Fallback => {
                    summary.fallback += 1;
                    counts.fallback += 1;
                }
            }

            // Rate limit only applies to live upstream calls.
            if !cached {
                tokio::time::sleep(self.options.request_delay).await;
            }
        }

        tracing::info!(
            found = summary.found,
            fallback = summary.fallback,
            "batch resolution complete"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::store::MemoryStore;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct MockProvider {
        result: Option<GeocodeMatch>,
        fail: bool,
        calls: AtomicUsize,
    }

    impl MockProvider {
        fn found(lat: f64, lng: f64) -> Self {
            Self {
                result: Some(GeocodeMatch {
                    coordinates: Coordinates::new(lat, lng),
                    formatted_address: Some("mock address".to_string()),
                    level: Some("POI".to_string()),
                }),
                fail: false,
                calls: AtomicUsize::new(0),
            }
        }

        fn empty() -> Self {
            Self {
                result: None,
                fail: false,
                calls: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                result: None,
                fail: true,
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl GeocodeProvider for MockProvider {
        fn name(&self) -> &'static str {
            "mock"
        }

        fn geocode(
            &self,
            _query: &str,
        ) -> impl std::future::Future<Output = Result<Option<GeocodeMatch>>> + Send {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let result = self.result.clone();
            let fail = self.fail;
            async move {
                if fail {
                    Err(Error::Geocoding("mock upstream failure".to_string()))
                } else {
                    Ok(result)
                }
            }
        }
    }

    fn memory_cache() -> TtlCache {
        TtlCache::new(Box::new(MemoryStore::new()), None).unwrap()
    }

    fn longmen() -> ScenicArea {
        let mut area = ScenicArea::named("龙门石窟");
        area.address = Some("河南省洛阳市洛龙区龙门中街13号".to_string());
        area.city = Some("洛阳".to_string());
        area.province = Some("河南省".to_string());
        area
    }

    fn resolver(provider: MockProvider) -> CoordinateResolver<MockProvider> {
        CoordinateResolver::new(provider, memory_cache()).with_options(ResolverOptions {
            include_address: false,
            request_delay: Duration::from_millis(0),
        })
    }

    #[tokio::test]
    async fn test_resolve_found() {
        let mut resolver = resolver(MockProvider::found(34.5553, 112.4747));
        let resolution = resolver.resolve(&longmen()).await.unwrap();

        assert_eq!(resolution.status, ResolutionStatus::Found);
        assert_eq!(resolution.coordinates, Coordinates::new(34.5553, 112.4747));
        assert_eq!(resolution.source, "mock");
        assert!(resolution.error.is_none());
    }

    #[tokio::test]
    async fn test_resolve_is_idempotent_and_skips_network() {
        let mut resolver = resolver(MockProvider::found(34.5553, 112.4747));
        let area = longmen();

        let first = resolver.resolve(&area).await.unwrap();
        let second = resolver.resolve(&area).await.unwrap();

        assert_eq!(first.coordinates, second.coordinates);
        assert_eq!(resolver.provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_empty_match_falls_back_to_city_table() {
        let mut resolver = resolver(MockProvider::empty());
        let resolution = resolver.resolve(&longmen()).await.unwrap();

        assert_eq!(resolution.status, ResolutionStatus::Fallback);
        assert_eq!(resolution.coordinates, Coordinates::new(34.6197, 112.4540));
        assert_eq!(resolution.source, "city-table");
        assert!(resolution.error.is_some());
    }

    #[tokio::test]
    async fn test_upstream_error_falls_back_and_is_cached() {
        let mut resolver = resolver(MockProvider::failing());
        let area = longmen();

        let first = resolver.resolve(&area).await.unwrap();
        assert_eq!(first.status, ResolutionStatus::Fallback);
        assert!(first.error.as_deref().unwrap().contains("mock upstream"));

        // The cached fallback short-circuits the retry.
        let _second = resolver.resolve(&area).await.unwrap();
        assert_eq!(resolver.provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_clear_cache_allows_retry() {
        let mut resolver = resolver(MockProvider::failing());
        let area = longmen();

        resolver.resolve(&area).await.unwrap();
        resolver.clear_cache().unwrap();
        resolver.resolve(&area).await.unwrap();

        assert_eq!(resolver.provider.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_unknown_city_uses_default_center() {
        let mut resolver = resolver(MockProvider::empty());
        let area = ScenicArea::named("无名景区");
        let resolution = resolver.resolve(&area).await.unwrap();

        assert_eq!(resolution.source, "default-center");
        assert_eq!(resolution.coordinates, fallback::DEFAULT_CENTER);
    }

    #[tokio::test]
    async fn test_raw_response_cache_short_circuits_same_query() {
        let provider = MockProvider::found(30.2741, 120.1551);
        let mut resolver = CoordinateResolver::new(provider, memory_cache())
            .with_response_cache(memory_cache())
            .with_options(ResolverOptions {
                include_address: false,
                request_delay: Duration::from_millis(0),
            });

        // Same geocoding query from two differently keyed areas.
        let mut a = ScenicArea::named("西湖");
        a.city = Some("杭州".to_string());
        let mut b = a.clone();
        b.address = Some("浙江省杭州市西湖区".to_string());

        resolver.resolve(&a).await.unwrap();
        resolver.resolve(&b).await.unwrap();

        assert_eq!(resolver.provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_batch_updates_centers_and_counts_by_city() {
        let mut resolver = resolver(MockProvider::empty());
        let mut areas = vec![longmen(), {
            let mut a = ScenicArea::named("白马寺");
            a.city = Some("洛阳".to_string());
            a.legacy_coordinates = Some(Coordinates::new(1.0, 2.0));
            a
        }];

        let summary = resolver.resolve_batch(&mut areas).await.unwrap();

        assert_eq!(summary.fallback, 2);
        assert_eq!(summary.by_city["洛阳"].fallback, 2);
        // Fallback determinism: same city, identical coordinates.
        assert_eq!(areas[0].center, areas[1].center);
        assert!(areas[1].legacy_coordinates.is_none());
    }

    #[test]
    fn test_build_query_composition() {
        let resolver = resolver(MockProvider::empty());
        assert_eq!(resolver.build_query(&longmen()), "河南省洛阳龙门石窟");

        let with_address = CoordinateResolver::new(MockProvider::empty(), memory_cache())
            .with_options(ResolverOptions {
                include_address: true,
                request_delay: Duration::from_millis(0),
            });
        assert!(with_address
            .build_query(&longmen())
            .ends_with("龙门中街13号"));
    }

    #[test]
    fn test_unknown_provider_name_is_config_error() {
        assert!(matches!(
            Provider::from_parts("nope", "k", None),
            Err(Error::Config(_))
        ));
    }
}
