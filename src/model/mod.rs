//! Core domain types
//!
//! This module defines:
//! - Geographic coordinates and parsing of provider "lng,lat" strings
//! - Scenic areas (named, graded tourist destinations)
//! - Spots (points of interest discovered near an area)
//! - Coordinate resolution records

pub mod files;

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// A geographic coordinate (latitude, longitude), GCJ-02 unless noted
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    /// Create new coordinates
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Round a degree value to 6 decimals (provider precision)
    pub fn round6(value: f64) -> f64 {
        (value * 1_000_000.0).round() / 1_000_000.0
    }

    /// Parse a provider `"lng,lat"` string into coordinates
    ///
    /// Both components are rounded to 6 decimals so that cached and freshly
    /// parsed values compare equal.
    pub fn parse_lng_lat(value: &str) -> Result<Self> {
        let mut parts = value.split(',');
        let lng = parts
            .next()
            .and_then(|s| s.trim().parse::<f64>().ok())
            .ok_or_else(|| Error::InvalidCoordinates(format!("Bad location string: {}", value)))?;
        let lat = parts
            .next()
            .and_then(|s| s.trim().parse::<f64>().ok())
            .ok_or_else(|| Error::InvalidCoordinates(format!("Bad location string: {}", value)))?;
        if parts.next().is_some() {
            return Err(Error::InvalidCoordinates(format!(
                "Bad location string: {}",
                value
            )));
        }
        let coords = Self::new(Self::round6(lat), Self::round6(lng));
        coords.validate()?;
        Ok(coords)
    }

    /// Format as the `"lng,lat"` string expected by the place APIs
    pub fn to_lng_lat(&self) -> String {
        format!("{:.6},{:.6}", self.lng, self.lat)
    }

    /// Validate that coordinates are within valid ranges
    ///
    /// Latitude: -90 to 90
    /// Longitude: -180 to 180
    pub fn validate(&self) -> Result<()> {
        if self.lat < -90.0 || self.lat > 90.0 {
            return Err(Error::InvalidCoordinates(format!(
                "Latitude {} is out of range [-90, 90]",
                self.lat
            )));
        }
        if self.lng < -180.0 || self.lng > 180.0 {
            return Err(Error::InvalidCoordinates(format!(
                "Longitude {} is out of range [-180, 180]",
                self.lng
            )));
        }
        Ok(())
    }
}

/// Official grading of a scenic area
///
/// Drives the default search radius: 5A areas cover more ground than lower
/// grades, so a wider net is cast around them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AreaLevel {
    #[serde(rename = "5A")]
    FiveA,
    #[serde(rename = "4A")]
    FourA,
    #[serde(rename = "3A")]
    ThreeA,
    #[serde(rename = "2A")]
    TwoA,
    #[serde(rename = "1A")]
    OneA,
    #[serde(rename = "national-park")]
    NationalPark,
}

impl AreaLevel {
    /// Default search radius in meters for this grade
    pub fn default_radius(&self) -> u32 {
        match self {
            AreaLevel::FiveA => crate::constants::search::RADIUS_5A,
            AreaLevel::FourA => crate::constants::search::RADIUS_4A,
            _ => crate::constants::search::RADIUS_DEFAULT,
        }
    }
}

/// A named scenic area, as read from `scenic-area.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenicArea {
    /// Area name, unique key for caching
    pub name: String,

    /// Street address, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    /// City name, used to disambiguate geocoding and for fallback lookup
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,

    /// Province name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub province: Option<String>,

    /// Official grade ("5A".."1A" or "national-park")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<AreaLevel>,

    /// Authoritative center, set by the coordinate resolver
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub center: Option<Coordinates>,

    /// Explicit search radius in meters, overrides the level default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<u32>,

    /// Legacy coordinate field found in older data files
    ///
    /// Cleared as soon as `center` is populated from a live resolution, so an
    /// area carries exactly one authoritative coordinate at a time.
    #[serde(
        default,
        alias = "location",
        rename = "coordinates",
        skip_serializing_if = "Option::is_none"
    )]
    pub legacy_coordinates: Option<Coordinates>,
}

impl ScenicArea {
    /// Create an area with only a name
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: None,
            city: None,
            province: None,
            level: None,
            center: None,
            radius: None,
            legacy_coordinates: None,
        }
    }

    /// Effective search radius: explicit value, else derived from the grade
    pub fn search_radius(&self) -> u32 {
        self.radius.unwrap_or_else(|| {
            self.level
                .map(|l| l.default_radius())
                .unwrap_or(crate::constants::search::RADIUS_DEFAULT)
        })
    }

    /// Set the authoritative center, dropping any legacy coordinate
    pub fn set_center(&mut self, center: Coordinates) {
        self.center = Some(center);
        self.legacy_coordinates = None;
    }

    /// Whether this area belongs to the given city
    ///
    /// Tolerant of the administrative suffix, in line with the fallback
    /// table: "洛阳" matches an area recorded as "洛阳市" and vice versa.
    pub fn in_city(&self, city: &str) -> bool {
        let wanted = city.trim();
        if wanted.is_empty() {
            return false;
        }
        self.city
            .as_deref()
            .map(str::trim)
            .is_some_and(|stored| stored.contains(wanted) || wanted.contains(stored))
    }
}

/// A point of interest returned by a nearby-places search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Spot {
    /// Provider-assigned stable identifier, used as the dedup key
    pub id: String,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Coordinates>,

    /// Distance in meters from the query center
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,

    /// Provider category string
    #[serde(
        default,
        rename = "type",
        skip_serializing_if = "Option::is_none"
    )]
    pub poi_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,

    /// Heuristic [0,1] score, assigned only by the relevance filter
    #[serde(
        default,
        rename = "relevanceScore",
        skip_serializing_if = "Option::is_none"
    )]
    pub relevance_score: Option<f64>,
}

/// How a coordinate resolution was satisfied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolutionStatus {
    /// Live geocode returned at least one match
    Found,
    /// Static city-center table or hard default was used
    Fallback,
}

/// Outcome of resolving a scenic area to a coordinate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resolution {
    /// Name of the resolved area
    pub name: String,

    pub coordinates: Coordinates,

    pub status: ResolutionStatus,

    /// Which provider or fallback produced the coordinates
    pub source: String,

    /// Geocoder match level, when the provider reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatted_address: Option<String>,

    /// Failure reason when `status` is `fallback`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
