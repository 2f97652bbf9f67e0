use serde::{Deserialize, Serialize};

pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;
pub const METERS_PER_NAUTICAL_MILE: f64 = 1852.0;
pub const FEET_PER_METER: f64 = 3.28084;

/// A 2D position in decimal degrees. Altitude is carried separately in feet
/// because every consumer of this type reports altitude independently.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub latitude: f64,
    pub longitude: f64,
}

impl Point {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Great-circle distance between two points in meters.
pub fn haversine_distance_meters(a: Point, b: Point) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let dlat = (b.latitude - a.latitude).to_radians();
    let dlon = (b.longitude - a.longitude).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * h.sqrt().asin() * EARTH_RADIUS_METERS
}

pub fn distance_nautical_miles(a: Point, b: Point) -> f64 {
    haversine_distance_meters(a, b) / METERS_PER_NAUTICAL_MILE
}

/// Initial great-circle bearing from one point to another, in degrees
/// clockwise from true north, normalized to [0, 360).
pub fn initial_bearing_degrees(from: Point, to: Point) -> f64 {
    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();
    let dlon = (to.longitude - from.longitude).to_radians();

    let y = dlon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * dlon.cos();
    normalize_degrees(y.atan2(x).to_degrees())
}

/// Wrap an angle into [0, 360).
pub fn normalize_degrees(degrees: f64) -> f64 {
    degrees.rem_euclid(360.0)
}

/// Smallest angular separation between two headings, in [0, 180].
pub fn angle_off_degrees(a: f64, b: f64) -> f64 {
    let diff = (normalize_degrees(a) - normalize_degrees(b)).abs();
    if diff > 180.0 { 360.0 - diff } else { diff }
}
