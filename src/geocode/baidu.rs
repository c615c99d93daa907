//! Baidu geocoding provider
//!
//! Baidu's v3 geocoder returns BD-09 coordinates; they are converted to
//! GCJ-02 at this boundary so the rest of the pipeline sees a single datum.

use crate::constants::api::BAIDU_GEOCODE_URL;
use crate::error::{Error, Result};
use crate::geocode::convert::bd09_to_gcj02;
use crate::geocode::{GeocodeMatch, GeocodeProvider};
use crate::model::Coordinates;
use crate::sign::encode_query;
use serde::Deserialize;

/// Baidu geocoding provider
#[derive(Debug, Clone)]
pub struct BaiduProvider {
    client: reqwest::Client,
    key: String,
}

#[derive(Debug, Deserialize)]
struct BaiduResponse {
    status: i64,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    result: Option<BaiduResult>,
}

#[derive(Debug, Deserialize)]
struct BaiduResult {
    location: BaiduLocation,
    #[serde(default)]
    confidence: Option<i64>,
    #[serde(default)]
    level: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BaiduLocation {
    lat: f64,
    lng: f64,
}

impl BaiduProvider {
    /// Create a provider; the API key is required and checked up front
    pub fn new(key: impl Into<String>) -> Result<Self> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(Error::Config(
                "Baidu API key is not configured (set api.key or SPOT_SCOUT_API_KEY)".to_string(),
            ));
        }
        Ok(Self {
            client: reqwest::Client::new(),
            key,
        })
    }

    fn build_url(&self, query: &str) -> String {
        let params = vec![
            ("address", query.to_string()),
            ("output", "json".to_string()),
            ("ak", self.key.clone()),
        ];
        format!("{}?{}", BAIDU_GEOCODE_URL, encode_query(&params))
    }

    fn parse_response(data: BaiduResponse) -> Result<Option<GeocodeMatch>> {
        if data.status != 0 {
            return Err(Error::Geocoding(format!(
                "Baidu geocode status {}: {}",
                data.status,
                data.msg.as_deref().unwrap_or("unknown")
            )));
        }

        let Some(result) = data.result else {
            return Ok(None);
        };

        let bd09 = Coordinates::new(result.location.lat, result.location.lng);
        bd09.validate()?;
        let gcj02 = bd09_to_gcj02(bd09);
        Ok(Some(GeocodeMatch {
            coordinates: Coordinates::new(
                Coordinates::round6(gcj02.lat),
                Coordinates::round6(gcj02.lng),
            ),
            formatted_address: None,
            level: result
                .level
                .or_else(|| result.confidence.map(|c| c.to_string())),
        }))
    }
}

impl GeocodeProvider for BaiduProvider {
    fn name(&self) -> &'static str {
        "baidu"
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
                .map_err(|e| Error::Geocoding(format!("Baidu request failed: {}", e)))?;

            if !response.status().is_success() {
                return Err(Error::Geocoding(format!(
                    "Baidu returned status: {}",
                    response.status()
                )));
            }

            let data: BaiduResponse = response
                .json()
                .await
                .map_err(|e| Error::Geocoding(format!("Failed to parse Baidu response: {}", e)))?;

            Self::parse_response(data)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_found_converts_datum() {
        let data: BaiduResponse = serde_json::from_str(
            r#"{
                "status": 0,
                "result": {
                    "location": {"lat": 34.561, "lng": 112.481},
                    "confidence": 80,
                    "level": "旅游景点"
                }
            }"#,
        )
        .unwrap();

        let matched = BaiduProvider::parse_response(data).unwrap().unwrap();
        // BD-09 to GCJ-02 shifts by roughly 0.006 degrees
        assert!((matched.coordinates.lat - 34.561).abs() < 0.02);
        assert!((matched.coordinates.lat - 34.561).abs() > 1e-4);
        assert_eq!(matched.level.as_deref(), Some("旅游景点"));
    }

    #[test]
    fn test_parse_error_status() {
        let data: BaiduResponse =
            serde_json::from_str(r#"{"status": 302, "msg": "天配额超限"}"#).unwrap();
        assert!(BaiduProvider::parse_response(data).is_err());
    }

    #[test]
    fn test_parse_missing_result() {
        let data: BaiduResponse = serde_json::from_str(r#"{"status": 0}"#).unwrap();
        assert!(BaiduProvider::parse_response(data).unwrap().is_none());
    }

    #[test]
    fn test_new_requires_key() {
        assert!(BaiduProvider::new(" ").is_err());
    }
}
