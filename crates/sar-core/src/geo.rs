//! Spherical geometry over latitude/longitude pairs.
//!
//! The Earth is modeled as a sphere of mean radius; no ellipsoidal
//! correction is applied. Angles are degrees in and degrees out, bearings
//! clockwise from north.

use crate::error::{PlannerError, Result};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Below this central angle (radians) interpolation falls back to linear.
const MIN_SLERP_ANGLE_RAD: f64 = 1e-12;

/// A position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    /// Create a point, rejecting coordinates outside [-90, 90] x [-180, 180].
    pub fn new(lat: f64, lon: f64) -> Result<Self> {
        let point = Self { lat, lon };
        point.validate()?;
        Ok(point)
    }

    /// Create a point without range checks.
    pub const fn new_unchecked(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Check the coordinate ranges (also catches NaN).
    pub fn validate(&self) -> Result<()> {
        if (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lon) {
            Ok(())
        } else {
            Err(PlannerError::InvalidCoordinate {
                lat: self.lat,
                lon: self.lon,
            })
        }
    }

    /// Great-circle distance to `other` in meters.
    pub fn distance_to(&self, other: &GeoPoint) -> f64 {
        haversine_distance(self, other)
    }

    /// True when both coordinates are within `tolerance_deg` of `other`.
    pub fn approx_eq(&self, other: &GeoPoint, tolerance_deg: f64) -> bool {
        (self.lat - other.lat).abs() <= tolerance_deg
            && (self.lon - other.lon).abs() <= tolerance_deg
    }
}

/// Calculate distance between two points in meters using the Haversine formula.
pub fn haversine_distance(a: &GeoPoint, b: &GeoPoint) -> f64 {
    2.0 * EARTH_RADIUS_M * central_angle(a, b)
}

/// Half the central angle between two points, in radians.
fn central_angle(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let phi1 = a.lat.to_radians();
    let phi2 = b.lat.to_radians();
    let dphi = (b.lat - a.lat).to_radians();
    let dlambda = (b.lon - a.lon).to_radians();
    let h = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    h.sqrt().atan2((1.0 - h).max(0.0).sqrt())
}

/// Initial bearing from `from` to `to`, degrees in [0, 360).
pub fn bearing_deg(from: &GeoPoint, to: &GeoPoint) -> f64 {
    let phi1 = from.lat.to_radians();
    let phi2 = to.lat.to_radians();
    let delta_lambda = (to.lon - from.lon).to_radians();

    let x = delta_lambda.sin() * phi2.cos();
    let y = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * delta_lambda.cos();

    x.atan2(y).to_degrees().rem_euclid(360.0)
}

/// Offset a position by distance and bearing.
///
/// # Arguments
/// * `origin` - Starting position
/// * `distance_m` - Distance in meters
/// * `bearing_deg` - Bearing in degrees (0 = north, 90 = east)
pub fn offset(origin: &GeoPoint, distance_m: f64, bearing_deg: f64) -> GeoPoint {
    if distance_m.abs() <= f64::EPSILON {
        return *origin;
    }

    let lat1 = origin.lat.to_radians();
    let lon1 = origin.lon.to_radians();
    let bearing_rad = bearing_deg.to_radians();
    let angular_distance = distance_m / EARTH_RADIUS_M;

    let sin_lat1 = lat1.sin();
    let cos_lat1 = lat1.cos();
    let sin_ad = angular_distance.sin();
    let cos_ad = angular_distance.cos();

    let sin_lat2 = sin_lat1 * cos_ad + cos_lat1 * sin_ad * bearing_rad.cos();
    let lat2 = sin_lat2.clamp(-1.0, 1.0).asin();

    let y = bearing_rad.sin() * sin_ad * cos_lat1;
    let x = cos_ad - sin_lat1 * sin_lat2;
    let lon2 = (lon1 + y.atan2(x) + PI).rem_euclid(2.0 * PI) - PI;

    GeoPoint::new_unchecked(lat2.to_degrees(), lon2.to_degrees())
}

/// Point at `fraction` of the great-circle arc from `from` to `to`.
///
/// The endpoints are returned bit-for-bit for fractions outside (0, 1).
pub fn interpolate(from: &GeoPoint, to: &GeoPoint, fraction: f64) -> GeoPoint {
    if fraction <= 0.0 {
        return *from;
    }
    if fraction >= 1.0 {
        return *to;
    }

    let angle = 2.0 * central_angle(from, to);
    let sin_angle = angle.sin();
    if angle < MIN_SLERP_ANGLE_RAD || sin_angle.abs() < MIN_SLERP_ANGLE_RAD {
        return GeoPoint::new_unchecked(
            from.lat + (to.lat - from.lat) * fraction,
            from.lon + (to.lon - from.lon) * fraction,
        );
    }

    let lat1 = from.lat.to_radians();
    let lon1 = from.lon.to_radians();
    let lat2 = to.lat.to_radians();
    let lon2 = to.lon.to_radians();

    let a = ((1.0 - fraction) * angle).sin() / sin_angle;
    let b = (fraction * angle).sin() / sin_angle;

    let x = a * lat1.cos() * lon1.cos() + b * lat2.cos() * lon2.cos();
    let y = a * lat1.cos() * lon1.sin() + b * lat2.cos() * lon2.sin();
    let z = a * lat1.sin() + b * lat2.sin();

    let lat = z.atan2((x * x + y * y).sqrt());
    let lon = y.atan2(x);
    GeoPoint::new_unchecked(lat.to_degrees(), lon.to_degrees())
}

/// Index of the point closest to `target`; the earliest index wins ties.
pub fn closest_index(points: &[GeoPoint], target: &GeoPoint) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (index, point) in points.iter().enumerate() {
        let dist = haversine_distance(point, target);
        match best {
            Some((_, best_dist)) if dist >= best_dist => {}
            _ => best = Some((index, dist)),
        }
    }
    best.map(|(index, _)| index)
}

/// Total great-circle length of a path in meters.
pub fn path_length(path: &[GeoPoint]) -> f64 {
    path.windows(2)
        .map(|pair| haversine_distance(&pair[0], &pair[1]))
        .sum()
}
