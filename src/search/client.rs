//! Nearby place search client
//!
//! Wraps a signed GET against the place-around endpoint. Each call fetches a
//! single page; multi-query plans run one call per query and tolerate
//! individual failures.

use crate::constants::api::AMAP_AROUND_URL;
use crate::error::{Error, Result};
use crate::model::{Coordinates, Spot};
use crate::serde_helpers::{flexible_f64, flexible_u64, string_or_none};
use crate::sign::{encode_query, signature};
use serde::Deserialize;

/// One page of nearby search results
#[derive(Debug)]
pub struct SearchPage {
    pub results: Vec<Spot>,
    pub total: u64,
}

/// Trait for nearby place search backends
///
/// Implementations must be thread-safe (Send + Sync) to work across awaits.
pub trait SearchBackend: Send + Sync {
    /// Fetch one page of places matching a query around a center point
    fn search(
        &self,
        center: Coordinates,
        radius: u32,
        query: &str,
        page: u32,
        page_size: u32,
    ) -> impl std::future::Future<Output = Result<SearchPage>> + Send;
}

/// Client for the nearby place search API
#[derive(Debug, Clone)]
pub struct SpotSearchClient {
    client: reqwest::Client,
    key: String,
    secret: Option<String>,
}

/// Place-around response envelope
#[derive(Debug, Deserialize)]
struct AroundResponse {
    status: String,
    #[serde(default)]
    info: Option<String>,
    #[serde(default, deserialize_with = "flexible_u64")]
    count: u64,
    #[serde(default)]
    pois: Vec<PoiRecord>,
}

#[derive(Debug, Deserialize)]
struct PoiRecord {
    id: String,
    name: String,
    #[serde(default, deserialize_with = "string_or_none")]
    address: Option<String>,
    #[serde(default, deserialize_with = "string_or_none")]
    location: Option<String>,
    #[serde(default, deserialize_with = "flexible_f64")]
    distance: Option<f64>,
    #[serde(default, rename = "type", deserialize_with = "string_or_none")]
    poi_type: Option<String>,
    #[serde(default)]
    biz_ext: Option<BizExt>,
}

#[derive(Debug, Deserialize)]
struct BizExt {
    #[serde(default, deserialize_with = "flexible_f64")]
    rating: Option<f64>,
}

impl PoiRecord {
    fn into_spot(self) -> Spot {
        let location = self
            .location
            .as_deref()
            .and_then(|s| Coordinates::parse_lng_lat(s).ok());
        Spot {
            id: self.id,
            name: self.name,
            address: self.address,
            location,
            distance: self.distance,
            poi_type: self.poi_type,
            rating: self.biz_ext.and_then(|b| b.rating),
            relevance_score: None,
        }
    }
}

impl SpotSearchClient {
    /// Create a client; the API key is required and checked up front
    pub fn new(key: impl Into<String>, secret: Option<String>) -> Result<Self> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(Error::Config(
                "Place search API key is not configured (set api.key or SPOT_SCOUT_API_KEY)"
                    .to_string(),
            ));
        }
        Ok(Self {
            client: reqwest::Client::new(),
            key,
            secret: secret.filter(|s| !s.trim().is_empty()),
        })
    }

    fn build_url(&self, center: Coordinates, radius: u32, query: &str, page: u32, page_size: u32) -> String {
        let mut params = vec![
            ("key", self.key.clone()),
            ("location", center.to_lng_lat()),
            ("radius", radius.to_string()),
            ("keywords", query.to_string()),
            ("types", String::new()),
            ("offset", page_size.to_string()),
            ("page", page.to_string()),
            ("extensions", "all".to_string()),
        ];
        if let Some(secret) = &self.secret {
            let sig = signature(&params, secret);
            params.push(("sig", sig));
        }
        format!("{}?{}", AMAP_AROUND_URL, encode_query(&params))
    }

    fn parse_response(data: AroundResponse) -> Result<SearchPage> {
        if data.status != "1" {
            return Err(Error::Search(format!(
                "Place search status {}: {}",
                data.status,
                data.info.as_deref().unwrap_or("unknown")
            )));
        }
        Ok(SearchPage {
            total: data.count,
            results: data.pois.into_iter().map(PoiRecord::into_spot).collect(),
        })
    }
}

impl SearchBackend for SpotSearchClient {
    fn search(
        &self,
        center: Coordinates,
        radius: u32,
        query: &str,
        page: u32,
        page_size: u32,
    ) -> impl std::future::Future<Output = Result<SearchPage>> + Send {
        async move {
            let url = self.build_url(center, radius, query, page, page_size);

            let response = self
                .client
                .get(&url)
                .send()
                .await
                .map_err(|e| Error::Search(format!("Place search request failed: {}", e)))?;

            if !response.status().is_success() {
                return Err(Error::Search(format!(
                    "Place search returned status: {}",
                    response.status()
                )));
            }

            let data: AroundResponse = response.json().await.map_err(|e| {
                Error::Search(format!("Failed to parse place search response: {}", e))
            })?;

            Self::parse_response(data)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pois() {
        let data: AroundResponse = serde_json::from_str(
            r#"{
                "status": "1",
                "info": "OK",
                "count": "2",
                "pois": [
                    {
                        "id": "B01", "name": "奉先寺",
                        "type": "风景名胜;风景名胜;寺庙道观",
                        "address": "龙门石窟景区内",
                        "location": "112.4750,34.5560",
                        "distance": "120",
                        "biz_ext": {"rating": "4.8"}
                    },
                    {
                        "id": "B02", "name": "香山寺",
                        "type": [], "address": [],
                        "location": "112.4790,34.5540",
                        "distance": 350,
                        "biz_ext": {"rating": []}
                    }
                ]
            }"#,
        )
        .unwrap();

        let page = SpotSearchClient::parse_response(data).unwrap();
        assert_eq!(page.total, 2);
        assert_eq!(page.results.len(), 2);

        let first = &page.results[0];
        assert_eq!(first.id, "B01");
        assert_eq!(first.distance, Some(120.0));
        assert_eq!(first.rating, Some(4.8));
        assert_eq!(
            first.location,
            Some(Coordinates::new(34.5560, 112.4750))
        );

        let second = &page.results[1];
        assert!(second.address.is_none());
        assert_eq!(second.distance, Some(350.0));
        assert!(second.rating.is_none());
        assert!(second.relevance_score.is_none());
    }

    #[test]
    fn test_parse_error_status() {
        let data: AroundResponse =
            serde_json::from_str(r#"{"status": "0", "info": "DAILY_QUERY_OVER_LIMIT"}"#).unwrap();
        let err = SpotSearchClient::parse_response(data).unwrap_err();
        assert!(err.to_string().contains("DAILY_QUERY_OVER_LIMIT"));
    }

    #[test]
    fn test_new_requires_key() {
        assert!(SpotSearchClient::new("", None).is_err());
    }

    #[test]
    fn test_build_url_params() {
        let client = SpotSearchClient::new("k", Some("s".to_string())).unwrap();
        let url = client.build_url(Coordinates::new(34.5553, 112.4747), 1500, "龙门石窟", 1, 20);

        assert!(url.contains("radius=1500"));
        assert!(url.contains("page=1"));
        assert!(url.contains("offset=20"));
        assert!(url.contains("location=112.474700%2C34.555300"));
        assert!(url.contains("sig="));
    }
}
