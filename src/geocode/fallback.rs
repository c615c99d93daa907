//! Static fallback coordinates
//!
//! When live geocoding fails, the resolver falls back to the center of the
//! area's city, or to a hard default when the city is unknown. The table is a
//! closed set of city centers (GCJ-02) for the cities the data set covers.

use crate::model::Coordinates;

/// City-center table: (city name, lat, lng)
const CITY_CENTERS: &[(&str, f64, f64)] = &[
    ("北京", 39.9042, 116.4074),
    ("上海", 31.2304, 121.4737),
    ("杭州", 30.2741, 120.1551),
    ("南京", 32.0603, 118.7969),
    ("苏州", 31.2989, 120.5853),
    ("洛阳", 34.6197, 112.4540),
    ("郑州", 34.7466, 113.6254),
    ("开封", 34.7971, 114.3074),
    ("西安", 34.3416, 108.9398),
    ("成都", 30.5728, 104.0668),
    ("重庆", 29.5630, 106.5516),
    ("武汉", 30.5928, 114.3055),
    ("长沙", 28.2282, 112.9388),
    ("广州", 23.1291, 113.2644),
    ("深圳", 22.5431, 114.0579),
    ("桂林", 25.2345, 110.1800),
    ("昆明", 24.8801, 102.8329),
    ("丽江", 26.8721, 100.2240),
    ("拉萨", 29.6520, 91.1721),
    ("青岛", 36.0671, 120.3826),
    ("济南", 36.6512, 117.1201),
    ("泰安", 36.1943, 117.0887),
    ("黄山", 29.7147, 118.3376),
];

/// Hard default when no city matches (Beijing city center)
pub const DEFAULT_CENTER: Coordinates = Coordinates {
    lat: 39.9042,
    lng: 116.4074,
};

/// Look up the fallback center for a city
///
/// Matches when the table name appears in the given city string, so both
/// "洛阳" and "洛阳市" resolve to the same entry. Deterministic: the first
/// table entry that matches always wins.
pub fn city_center(city: &str) -> Option<Coordinates> {
    let city = city.trim();
    if city.is_empty() {
        return None;
    }
    CITY_CENTERS
        .iter()
        .find(|(name, _, _)| city.contains(name))
        .map(|&(_, lat, lng)| Coordinates::new(lat, lng))
}

/// Fallback center for an area: city table entry, else the hard default
pub fn fallback_center(city: Option<&str>) -> (Coordinates, &'static str) {
    match city.and_then(city_center) {
        Some(center) => (center, "city-table"),
        None => (DEFAULT_CENTER, "default-center"),
    }
}
