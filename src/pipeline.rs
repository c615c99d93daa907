//! Discovery pipeline
//!
//! Ties the pieces together for one area: resolve the center, plan queries,
//! run them sequentially with a rate-limit delay, merge, score, filter. The
//! batch variant runs areas one after another, absorbing per-area failures so
//! the whole run always completes.

use crate::cache::TtlCache;
use crate::error::{Error, Result};
use crate::geocode::{CoordinateResolver, GeocodeProvider};
use crate::model::{Resolution, ScenicArea, Spot};
use crate::search::aggregate;
use crate::search::client::SearchBackend;
use crate::search::relevance::{self, FilterConfig};
use crate::search::terms::enhanced_queries;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Settings for a discovery run
#[derive(Debug, Clone)]
pub struct DiscoverOptions {
    /// Overrides the area's level-derived radius when set
    pub radius: Option<u32>,

    pub page_size: u32,

    /// Fixed delay between successive search requests
    pub request_delay: Duration,

    pub filter: FilterConfig,
}

impl Default for DiscoverOptions {
    fn default() -> Self {
        Self {
            radius: None,
            page_size: crate::constants::search::DEFAULT_PAGE_SIZE,
            request_delay: Duration::from_millis(crate::constants::search::REQUEST_DELAY_MS),
            filter: FilterConfig::default(),
        }
    }
}

/// Outcome of discovering spots for one area
#[derive(Debug, Serialize)]
pub struct Discovery {
    pub spots: Vec<Spot>,
    pub resolution: Resolution,
    pub queries_run: usize,
    pub queries_failed: usize,
}

/// Discover the relevant spots around one scenic area
///
/// Individual query failures are logged and swallowed; the call errors only
/// when every query in the plan failed.
pub async fn discover<P: GeocodeProvider, S: SearchBackend>(
    resolver: &mut CoordinateResolver<P>,
    client: &S,
    area: &ScenicArea,
    options: &DiscoverOptions,
) -> Result<Discovery> {
    let resolution = resolver.resolve(area).await?;
    let center = resolution.coordinates;
    let radius = options.radius.unwrap_or_else(|| area.search_radius());

    let queries = enhanced_queries(&area.name);
    let mut result_sets = Vec::new();
    let mut failed = 0;

    for (i, query) in queries.iter().enumerate() {
        if i > 0 {
            tokio::time::sleep(options.request_delay).await;
        }
        match client.search(center, radius, query, 1, options.page_size).await {
            Ok(page) => {
                tracing::debug!(query, results = page.results.len(), "search query done");
                result_sets.push(page.results);
            }
            Err(e) => {
                tracing::warn!(query, error = %e, "search query failed");
                failed += 1;
            }
        }
    }

    if failed == queries.len() {
        return Err(Error::Search(format!(
            "all {} search queries failed for {}",
            failed, area.name
        )));
    }

    let merged = aggregate::merge(result_sets);
    let spots = relevance::filter(merged, area, &options.filter);

    Ok(Discovery {
        spots,
        resolution,
        queries_run: queries.len(),
        queries_failed: failed,
    })
}

/// Per-area record in a batch discovery report
#[derive(Debug, Serialize)]
pub struct BatchItem {
    pub name: String,
    pub spots: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Aggregate report of a batch discovery run
#[derive(Debug, Default, Serialize)]
pub struct BatchReport {
    pub succeeded: usize,
    pub failed: usize,
    pub items: Vec<BatchItem>,
}

/// Discover spots for every area, collecting per-item outcomes
///
/// A failing area is recorded and skipped; the batch always completes. The
/// caller receives each successful discovery through `on_success` (used to
/// write the per-area artifact).
pub async fn discover_batch<P: GeocodeProvider, S: SearchBackend>(
    resolver: &mut CoordinateResolver<P>,
    client: &S,
    areas: &[ScenicArea],
    options: &DiscoverOptions,
    mut on_success: impl FnMut(&ScenicArea, Discovery) -> Result<()>,
) -> BatchReport {
    let mut report = BatchReport::default();

    for area in areas {
        match discover(resolver, client, area, options).await {
            Ok(discovery) => {
                let spots = discovery.spots.len();
                match on_success(area, discovery) {
                    Ok(()) => {
                        report.succeeded += 1;
                        report.items.push(BatchItem {
                            name: area.name.clone(),
                            spots,
                            error: None,
                        });
                    }
                    Err(e) => {
                        report.failed += 1;
                        report.items.push(BatchItem {
                            name: area.name.clone(),
                            spots,
                            error: Some(e.to_string()),
                        });
                    }
                }
            }
            Err(e) => {
                tracing::warn!(name = %area.name, error = %e, "discovery failed");
                report.failed += 1;
                report.items.push(BatchItem {
                    name: area.name.clone(),
                    spots: 0,
                    error: Some(e.to_string()),
                });
            }
        }
    }

    tracing::info!(
        succeeded = report.succeeded,
        failed = report.failed,
        "batch discovery complete"
    );
    report
}

/// Province cache entry shape: `{ data, timestamp }`, timestamp added by the
/// cache itself
#[derive(Debug, Serialize, Deserialize)]
struct ProvinceEntry {
    data: Vec<ScenicArea>,
}

fn province_key(province: &str) -> String {
    format!("scenic_areas_{}", province.trim())
}

/// Look up the assembled, resolved area list for a province (4 h TTL)
///
/// Independent of the 24 h raw-response tier: the raw geocode calls stay
/// reusable even after the assembled list is stale enough to re-validate.
pub fn cached_province_areas(cache: &mut TtlCache, province: &str) -> Option<Vec<ScenicArea>> {
    cache
        .get_as::<ProvinceEntry>(&province_key(province))
        .map(|entry| entry.data)
}

/// Store the assembled, resolved area list for a province
pub fn store_province_areas(
    cache: &mut TtlCache,
    province: &str,
    areas: &[ScenicArea],
) -> Result<()> {
    cache.set(
        &province_key(province),
        &ProvinceEntry {
            data: areas.to_vec(),
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::store::MemoryStore;
    use crate::geocode::GeocodeMatch;
    use crate::model::Coordinates;
    use crate::search::client::SearchPage;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration as StdDuration;

    struct MockGeocoder;

    impl GeocodeProvider for MockGeocoder {
        fn name(&self) -> &'static str {
            "mock"
        }

        fn geocode(
            &self,
            _query: &str,
        ) -> impl std::future::Future<Output = Result<Option<GeocodeMatch>>> + Send {
            async move {
                Ok(Some(GeocodeMatch {
                    coordinates: Coordinates::new(34.5553, 112.4747),
                    formatted_address: None,
                    level: None,
                }))
            }
        }
    }

    struct MockSearch {
        fail_queries: Vec<String>,
        fail_all: bool,
        results: Vec<Spot>,
        calls: AtomicUsize,
    }

    impl MockSearch {
        fn with_results(results: Vec<Spot>) -> Self {
            Self {
                fail_queries: Vec::new(),
                fail_all: false,
                results,
                calls: AtomicUsize::new(0),
            }
        }

        fn failing_on(mut self, query: &str) -> Self {
            self.fail_queries.push(query.to_string());
            self
        }

        fn failing_all() -> Self {
            Self {
                fail_queries: Vec::new(),
                fail_all: true,
                results: Vec::new(),
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl SearchBackend for MockSearch {
        fn search(
            &self,
            _center: Coordinates,
            _radius: u32,
            query: &str,
            _page: u32,
            _page_size: u32,
        ) -> impl std::future::Future<Output = Result<SearchPage>> + Send {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let fail = self.fail_all || self.fail_queries.iter().any(|q| q == query);
            let results = self.results.clone();
            async move {
                if fail {
                    Err(Error::Search("mock upstream failure".to_string()))
                } else {
                    let total = results.len() as u64;
                    Ok(SearchPage { results, total })
                }
            }
        }
    }

    fn spot(id: &str, name: &str) -> Spot {
        Spot {
            id: id.to_string(),
            name: name.to_string(),
            address: None,
            location: None,
            distance: None,
            poi_type: None,
            rating: None,
            relevance_score: None,
        }
    }

    fn memory_cache() -> TtlCache {
        TtlCache::new(Box::new(MemoryStore::new()), None).unwrap()
    }

    fn test_options() -> DiscoverOptions {
        DiscoverOptions {
            radius: None,
            page_size: 20,
            request_delay: StdDuration::from_millis(0),
            filter: FilterConfig {
                enable_filtering: false,
                strength: None,
                max_results: 20,
                min_relevance_score: 0.0,
            },
        }
    }

    #[tokio::test]
    async fn test_discover_survives_one_failing_query() {
        let mut resolver = CoordinateResolver::new(MockGeocoder, memory_cache());
        let client = MockSearch::with_results(vec![spot("B01", "奉先寺"), spot("B02", "香山寺")])
            .failing_on("龙门石窟");
        let area = ScenicArea::named("龙门石窟");

        let discovery = discover(&mut resolver, &client, &area, &test_options())
            .await
            .unwrap();

        assert_eq!(discovery.queries_failed, 1);
        assert!(discovery.queries_run > discovery.queries_failed);
        assert_eq!(client.calls.load(Ordering::SeqCst), discovery.queries_run);
        // Results from the surviving queries are merged and deduplicated.
        let ids: Vec<&str> = discovery.spots.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["B01", "B02"]);
    }

    #[tokio::test]
    async fn test_discover_errors_only_when_every_query_fails() {
        let mut resolver = CoordinateResolver::new(MockGeocoder, memory_cache());
        let client = MockSearch::failing_all();
        let area = ScenicArea::named("龙门石窟");

        let err = discover(&mut resolver, &client, &area, &test_options())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Search(_)));
        assert!(err.to_string().contains("龙门石窟"));
    }

    #[tokio::test]
    async fn test_batch_records_failed_area_and_continues() {
        let mut resolver = CoordinateResolver::new(MockGeocoder, memory_cache());
        let client = MockSearch::failing_all();
        let areas = vec![ScenicArea::named("龙门石窟"), ScenicArea::named("白马寺")];

        let report = discover_batch(&mut resolver, &client, &areas, &test_options(), |_, _| Ok(()))
            .await;

        assert_eq!(report.succeeded, 0);
        assert_eq!(report.failed, 2);
        assert_eq!(report.items.len(), 2);
        assert!(report.items.iter().all(|i| i.error.is_some()));
    }

    fn province_cache() -> TtlCache {
        TtlCache::new(
            Box::new(MemoryStore::new()),
            Some(StdDuration::from_secs(4 * 3600)),
        )
        .unwrap()
    }

    #[test]
    fn test_province_cache_round_trip() {
        let mut cache = province_cache();
        let areas = vec![ScenicArea::named("龙门石窟"), ScenicArea::named("白马寺")];

        store_province_areas(&mut cache, "河南", &areas).unwrap();
        let loaded = cached_province_areas(&mut cache, "河南").unwrap();

        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].name, "龙门石窟");
        assert!(cached_province_areas(&mut cache, "浙江").is_none());
    }

    #[test]
    fn test_province_cache_key_shape() {
        assert_eq!(province_key(" 河南 "), "scenic_areas_河南");
    }
}
