//! Latitude/longitude helpers on the unit sphere
//!
//! Latitudes and longitudes are in radians. Longitude is measured toward
//! +Y from +X in whatever frame the caller is working in, latitude toward +Z.

use nalgebra::Vector3;
use std::f64::consts::PI;

use crate::constants::TAU;

/// A point on a sphere
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LatLon {
    /// Latitude in radians
    pub lat: f64,
    /// Longitude in radians
    pub lon: f64,
}

impl LatLon {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Create from values in degrees
    pub fn from_degrees(lat_deg: f64, lon_deg: f64) -> Self {
        Self::new(lat_deg.to_radians(), lon_deg.to_radians())
    }

    /// Unit vector pointing at this location
    pub fn to_unit_vector(&self) -> Vector3<f64> {
        unit_vector(self.lat, self.lon)
    }
}

/// Unit vector at the given latitude and longitude
pub fn unit_vector(lat: f64, lon: f64) -> Vector3<f64> {
    let (sin_lat, cos_lat) = lat.sin_cos();
    let (sin_lon, cos_lon) = lon.sin_cos();
    Vector3::new(cos_lat * cos_lon, cos_lat * sin_lon, sin_lat)
}

/// Latitude and longitude of a vector's direction
///
/// Returns `(lat, lon)`; the zero vector maps to `(0, 0)`.
pub fn to_lat_lon(v: &Vector3<f64>) -> (f64, f64) {
    let r = v.norm();
    if r == 0.0 {
        return (0.0, 0.0);
    }
    let lat = (v.z / r).clamp(-1.0, 1.0).asin();
    let lon = v.y.atan2(v.x);
    (lat, lon)
}

/// Wrap a longitude into [-PI, PI)
pub fn wrap_longitude(lon: f64) -> f64 {
    let wrapped = (lon + PI).rem_euclid(TAU) - PI;
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= PI {
        wrapped - TAU
    } else {
        wrapped
    }
}

/// Great-circle course and distance between two points
///
/// Returns `(true_course, distance)` in radians, where the course from the
/// first point is measured from north.
pub fn great_arc(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> (f64, f64) {
    let (sin_lat1, cos_lat1) = lat1.sin_cos();
    let (sin_lat2, cos_lat2) = lat2.sin_cos();
    let dlon = lon1 - lon2;

    let cos_dist = sin_lat1 * sin_lat2 + cos_lat1 * cos_lat2 * dlon.cos();
    let dist = cos_dist.clamp(-1.0, 1.0).acos();

    let course = (dlon.sin() * cos_lat2)
        .atan2(cos_lat1 * sin_lat2 - sin_lat1 * cos_lat2 * dlon.cos())
        % TAU;

    (course, dist)
}

/// Great-circle distance between two points, radians
pub fn angular_distance(a: &LatLon, b: &LatLon) -> f64 {
    great_arc(a.lat, a.lon, b.lat, b.lon).1
}

/// Points spaced along the great circle from `a` to `b`
///
/// Consecutive samples are at most `spacing` radians apart and both end
/// points are included. Antipodal end points have no unique great circle;
/// the path then runs through the north pole side.
pub fn great_circle_points(a: &LatLon, b: &LatLon, spacing: f64) -> Vec<LatLon> {
    let dist = angular_distance(a, b);
    let steps = ((dist / spacing.max(1e-6)).ceil() as usize).max(1);

    let va = a.to_unit_vector();
    let vb = b.to_unit_vector();
    let sin_dist = dist.sin();

    (0..=steps)
        .map(|k| {
            let f = k as f64 / steps as f64;
            let v = if sin_dist.abs() < 1e-12 {
                if dist < 1.0 {
                    va.lerp(&vb, f)
                } else {
                    let mid = (va.cross(&Vector3::z()).cross(&va)).normalize();
                    let angle = f * PI;
                    va * angle.cos() + mid * angle.sin()
                }
            } else {
                va * (((1.0 - f) * dist).sin() / sin_dist) + vb * ((f * dist).sin() / sin_dist)
            };
            let (lat, lon) = to_lat_lon(&v);
            LatLon::new(lat, lon)
        })
        .collect()
}
