//! Great-circle helpers on a spherical Earth.
//!
//! Coordinates are in degrees; distances in meters; bearings in radians,
//! clockwise from true north and normalized to `[0, 2π)`.

use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

use super::finite_or;

/// Mean Earth radius (meters), IUGG.
pub const EARTH_MEAN_RADIUS_M: f64 = 6_371_008.8;

/// A geographic position. Altitude is carried but does not affect
/// great-circle distance or bearing.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoCoordinate {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub altitude: Option<f64>,
}

impl GeoCoordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            altitude: None,
        }
    }

    pub fn with_altitude(mut self, altitude_m: f64) -> Self {
        self.altitude = Some(altitude_m);
        self
    }

    /// Finite, latitude within ±90° and longitude within ±180°.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
            && self.altitude.is_none_or(f64::is_finite)
    }
}

/// Haversine distance between two coordinates (meters).
pub fn distance_m(from: GeoCoordinate, to: GeoCoordinate) -> f64 {
    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();
    let dlat = lat2 - lat1;
    let dlon = (to.longitude - from.longitude).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().min(1.0).asin();
    EARTH_MEAN_RADIUS_M * c
}

/// Initial great-circle bearing from `from` towards `to`.
///
/// Coincident points have no defined heading; they yield `0.0` (north).
pub fn initial_bearing_rad(from: GeoCoordinate, to: GeoCoordinate) -> f64 {
    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();
    let dlon = (to.longitude - from.longitude).to_radians();

    let y = dlon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * dlon.cos();
    if y == 0.0 && x == 0.0 {
        return 0.0;
    }
    normalize_bearing_rad(finite_or(y.atan2(x), 0.0))
}

/// Wrap an angle into `[0, 2π)`.
pub fn normalize_bearing_rad(radians: f64) -> f64 {
    let wrapped = radians.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs.
    if wrapped >= TAU { 0.0 } else { finite_or(wrapped, 0.0) }
}

/// Point reached by travelling `distance_m` along the great circle that
/// leaves `from` with heading `bearing_rad`. Altitude is copied from `from`.
pub fn destination(from: GeoCoordinate, bearing_rad: f64, distance_m: f64) -> GeoCoordinate {
    let lat1 = from.latitude.to_radians();
    let lon1 = from.longitude.to_radians();
    let delta = distance_m / EARTH_MEAN_RADIUS_M;

    let lat2 = (lat1.sin() * delta.cos() + lat1.cos() * delta.sin() * bearing_rad.cos()).asin();
    let y = bearing_rad.sin() * delta.sin() * lat1.cos();
    let x = delta.cos() - lat1.sin() * lat2.sin();
    let lon2 = lon1 + y.atan2(x);

    let mut lon_deg = lon2.to_degrees();
    lon_deg = (lon_deg + 540.0).rem_euclid(360.0) - 180.0;

    GeoCoordinate {
        latitude: lat2.to_degrees(),
        longitude: lon_deg,
        altitude: from.altitude,
    }
}
