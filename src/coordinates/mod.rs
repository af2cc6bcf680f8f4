//! Coordinate helpers: vector math, rotations and spherical geometry

pub mod spherical;
pub mod vector;

pub use spherical::{great_arc, to_lat_lon, unit_vector, wrap_longitude, LatLon};
pub use vector::{matrix_from_rows, ndot, reject, rotation_x, rotation_y, rotation_z};

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    #[test]
    fn test_rotated_point_keeps_angular_distance() {
        let a = LatLon::new(0.3, 1.0);
        let b = LatLon::new(-0.2, 2.0);
        let rot = rotation_x(0.4) * rotation_y(-0.9) * rotation_z(2.2);

        let (lat_a, lon_a) = to_lat_lon(&(rot * a.to_unit_vector()));
        let (lat_b, lon_b) = to_lat_lon(&(rot * b.to_unit_vector()));

        let before = great_arc(a.lat, a.lon, b.lat, b.lon).1;
        let after = great_arc(lat_a, lon_a, lat_b, lon_b).1;
        assert_relative_eq!(before, after, epsilon = 1e-12);
    }

    #[test]
    fn test_antipodes_are_pi_apart() {
        let p = LatLon::new(0.5, 1.0);
        let q = LatLon::new(-0.5, wrap_longitude(1.0 + PI));
        assert_relative_eq!(spherical::angular_distance(&p, &q), PI, epsilon = 1e-7);
    }
}
