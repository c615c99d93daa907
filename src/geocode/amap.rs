//! AMap (Gaode) geocoding provider
//!
//! Issues a signed GET against the v3 forward-geocoding endpoint and parses
//! the first match. AMap output is already GCJ-02.

use crate::constants::api::AMAP_GEOCODE_URL;
use crate::error::{Error, Result};
use crate::geocode::{GeocodeMatch, GeocodeProvider};
use crate::model::Coordinates;
use crate::serde_helpers::string_or_none;
use crate::sign::{encode_query, signature};
use serde::Deserialize;

/// AMap geocoding provider
#[derive(Debug, Clone)]
pub struct AmapProvider {
    client: reqwest::Client,
    key: String,
    secret: Option<String>,
}

/// AMap geocode response
#[derive(Debug, Deserialize)]
struct GeoResponse {
    status: String,
    #[serde(default)]
    info: Option<String>,
    #[serde(default)]
    geocodes: Vec<GeoEntry>,
}

#[derive(Debug, Deserialize)]
struct GeoEntry {
    location: String,
    #[serde(default, deserialize_with = "string_or_none")]
    formatted_address: Option<String>,
    #[serde(default, deserialize_with = "string_or_none")]
    level: Option<String>,
}

impl AmapProvider {
    /// Create a provider; the API key is required and checked up front
    pub fn new(key: impl Into<String>, secret: Option<String>) -> Result<Self> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(Error::Config(
                "AMap API key is not configured (set api.key or SPOT_SCOUT_API_KEY)".to_string(),
            ));
        }
        Ok(Self {
            client: reqwest::Client::new(),
            key,
            secret: secret.filter(|s| !s.trim().is_empty()),
        })
    }

    fn build_url(&self, query: &str) -> String {
        let mut params = vec![
            ("address", query.to_string()),
            ("key", self.key.clone()),
            ("output", "JSON".to_string()),
            ("timestamp", chrono::Utc::now().timestamp().to_string()),
        ];
        if let Some(secret) = &self.secret {
            let sig = signature(&params, secret);
            params.push(("sig", sig));
        }
        format!("{}?{}", AMAP_GEOCODE_URL, encode_query(&params))
    }

    fn parse_response(data: GeoResponse) -> Result<Option<GeocodeMatch>> {
        if data.status != "1" {
            return Err(Error::Geocoding(format!(
                "AMap geocode status {}: {}",
                data.status,
                data.info.as_deref().unwrap_or("unknown")
            )));
        }

        let Some(entry) = data.geocodes.into_iter().next() else {
            return Ok(None);
        };

        let coordinates = Coordinates::parse_lng_lat(&entry.location)?;
        Ok(Some(GeocodeMatch {
            coordinates,
            formatted_address: entry.formatted_address,
            level: entry.level,
        }))
    }
}

impl GeocodeProvider for AmapProvider {
    fn name(&self) -> &'static str {
        "amap"
    }

    fn geocode(
        &self,
        query: &str,
    ) -> impl std::future::Future<Output = Result<Option<GeocodeMatch>>> + Send {
        async move {
            let url = self.build_url(query);

            let response = self
                .client
                .get(&url)
                .send()
                .await
                .map_err(|e| Error::Geocoding(format!("AMap request failed: {}", e)))?;

            if !response.status().is_success() {
                return Err(Error::Geocoding(format!(
                    "AMap returned status: {}",
                    response.status()
                )));
            }

            let data: GeoResponse = response
                .json()
                .await
                .map_err(|e| Error::Geocoding(format!("Failed to parse AMap response: {}", e)))?;

            Self::parse_response(data)
        }
    }
}
