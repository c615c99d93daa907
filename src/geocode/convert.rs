//! Coordinate-system conversion
//!
//! Chinese map providers do not agree on a datum: AMap speaks GCJ-02, Baidu
//! speaks BD-09, and GPS hardware speaks WGS-84. Everything downstream of the
//! resolver is GCJ-02, so provider output is converted at the boundary.
//!
//! The GCJ-02 offset is defined by the standard polynomial approximation;
//! the inverse (GCJ-02 to WGS-84) applies the forward offset once and
//! subtracts it, which is accurate to a couple of meters.

use crate::model::Coordinates;
use std::f64::consts::PI;

const A: f64 = 6_378_245.0;
const EE: f64 = 0.006_693_421_622_965_943;
const X_PI: f64 = PI * 3000.0 / 180.0;

/// The GCJ-02 offset is only applied inside mainland China
pub fn out_of_china(coords: Coordinates) -> bool {
    !(72.004..=137.8347).contains(&coords.lng) || !(0.8293..=55.8271).contains(&coords.lat)
}

fn transform_lat(x: f64, y: f64) -> f64 {
    let mut ret = -100.0 + 2.0 * x + 3.0 * y + 0.2 * y * y + 0.1 * x * y + 0.2 * x.abs().sqrt();
    ret += (20.0 * (6.0 * x * PI).sin() + 20.0 * (2.0 * x * PI).sin()) * 2.0 / 3.0;
    ret += (20.0 * (y * PI).sin() + 40.0 * (y / 3.0 * PI).sin()) * 2.0 / 3.0;
    ret += (160.0 * (y / 12.0 * PI).sin() + 320.0 * (y * PI / 30.0).sin()) * 2.0 / 3.0;
    ret
}

fn transform_lng(x: f64, y: f64) -> f64 {
    let mut ret = 300.0 + x + 2.0 * y + 0.1 * x * x + 0.1 * x * y + 0.1 * x.abs().sqrt();
    ret += (20.0 * (6.0 * x * PI).sin() + 20.0 * (2.0 * x * PI).sin()) * 2.0 / 3.0;
    ret += (20.0 * (x * PI).sin() + 40.0 * (x / 3.0 * PI).sin()) * 2.0 / 3.0;
    ret += (150.0 * (x / 12.0 * PI).sin() + 300.0 * (x / 30.0 * PI).sin()) * 2.0 / 3.0;
    ret
}

fn gcj_offset(coords: Coordinates) -> (f64, f64) {
    let d_lat = transform_lat(coords.lng - 105.0, coords.lat - 35.0);
    let d_lng = transform_lng(coords.lng - 105.0, coords.lat - 35.0);
    let rad_lat = coords.lat / 180.0 * PI;
    let mut magic = rad_lat.sin();
    magic = 1.0 - EE * magic * magic;
    let sqrt_magic = magic.sqrt();
    let d_lat = (d_lat * 180.0) / ((A * (1.0 - EE)) / (magic * sqrt_magic) * PI);
    let d_lng = (d_lng * 180.0) / (A / sqrt_magic * rad_lat.cos() * PI);
    (d_lat, d_lng)
}

/// WGS-84 to GCJ-02
pub fn wgs84_to_gcj02(coords: Coordinates) -> Coordinates {
    if out_of_china(coords) {
        return coords;
    }
    let (d_lat, d_lng) = gcj_offset(coords);
    Coordinates::new(coords.lat + d_lat, coords.lng + d_lng)
}

/// GCJ-02 to WGS-84 (single-pass approximation)
pub fn gcj02_to_wgs84(coords: Coordinates) -> Coordinates {
    if out_of_china(coords) {
        return coords;
    }
    let (d_lat, d_lng) = gcj_offset(coords);
    Coordinates::new(coords.lat - d_lat, coords.lng - d_lng)
}

/// GCJ-02 to BD-09
pub fn gcj02_to_bd09(coords: Coordinates) -> Coordinates {
    let x = coords.lng;
    let y = coords.lat;
    let z = (x * x + y * y).sqrt() + 0.00002 * (y * X_PI).sin();
    let theta = y.atan2(x) + 0.000003 * (x * X_PI).cos();
    Coordinates::new(z * theta.sin() + 0.006, z * theta.cos() + 0.0065)
}

/// BD-09 to GCJ-02
pub fn bd09_to_gcj02(coords: Coordinates) -> Coordinates {
    let x = coords.lng - 0.0065;
    let y = coords.lat - 0.006;
    let z = (x * x + y * y).sqrt() - 0.00002 * (y * X_PI).sin();
    let theta = y.atan2(x) - 0.000003 * (x * X_PI).cos();
    Coordinates::new(z * theta.sin(), z * theta.cos())
}
