use std::f64::consts::FRAC_PI_2;

use super::{Cartographic, Local, ProjectionFrame, EDGE_TOLERANCE};
use crate::coordinates::wrap_longitude;

/// Two equatorial azimuthal-equidistant discs, the western hemisphere
/// (centred on longitude -90) on the left and the eastern one on the right,
/// in the style of old double-hemisphere world maps
#[derive(Debug, Clone)]
pub(crate) struct Ancient {
    radius: f64,
}

impl Ancient {
    pub fn new(frame: &ProjectionFrame) -> Self {
        Self {
            radius: (frame.width() / 4.0).min(frame.height() / 2.0),
        }
    }

    /// (disc centre x, disc centre y, central longitude)
    fn disc(&self, frame: &ProjectionFrame, east: bool) -> (f64, f64, f64) {
        if east {
            (frame.width() * 0.75, frame.center_y(), FRAC_PI_2)
        } else {
            (frame.width() / 4.0, frame.center_y(), -FRAC_PI_2)
        }
    }
}

impl Cartographic for Ancient {
    fn inverse(&self, frame: &ProjectionFrame, x: f64, y: f64) -> Option<Local> {
        let (cx, cy, lon0) = self.disc(frame, x >= frame.center_x());
        let big_x = (x - cx) / self.radius * FRAC_PI_2;
        let big_y = (cy - y) / self.radius * FRAC_PI_2;
        let c = big_x.hypot(big_y);
        if c > FRAC_PI_2 + EDGE_TOLERANCE {
            return None;
        }
        let c = c.min(FRAC_PI_2);
        if c < 1e-12 {
            return Some(Local::flat(0.0, lon0));
        }
        let (sin_c, cos_c) = c.sin_cos();
        let lat = (big_y * sin_c / c).clamp(-1.0, 1.0).asin();
        let lon = lon0 + (big_x * sin_c).atan2(c * cos_c);
        Some(Local::flat(lat, wrap_longitude(lon)))
    }

    fn forward(&self, frame: &ProjectionFrame, lat: f64, lon: f64) -> Option<(f64, f64)> {
        let (cx, cy, lon0) = self.disc(frame, lon >= 0.0);
        let dlon = lon - lon0;
        let c = (lat.cos() * dlon.cos()).clamp(-1.0, 1.0).acos();
        let k = if c < 1e-12 { 1.0 } else { c / c.sin() };
        let big_x = k * lat.cos() * dlon.sin();
        let big_y = k * lat.sin();
        Some((
            cx + big_x / FRAC_PI_2 * self.radius,
            cy - big_y / FRAC_PI_2 * self.radius,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::super::{Projection, ProjectionKind};
    use approx::assert_relative_eq;

    #[test]
    fn test_hemisphere_centres() {
        let p = Projection::new(ProjectionKind::Ancient, 1.0, 400, 200, 0.0).unwrap();
        let west = p.pixel_to_spherical(100.0, 100.0).unwrap();
        assert_relative_eq!(west.lon, -std::f64::consts::FRAC_PI_2, epsilon = 1e-12);
        let east = p.pixel_to_spherical(300.0, 100.0).unwrap();
        assert_relative_eq!(east.lon, std::f64::consts::FRAC_PI_2, epsilon = 1e-12);
        // North pole sits at the top of each disc
        let (x, y) = p.spherical_to_pixel(std::f64::consts::FRAC_PI_2 - 1e-9, 1.0).unwrap();
        assert_relative_eq!(x, 300.0, epsilon = 1e-4);
        assert_relative_eq!(y, 0.0, epsilon = 1e-4);
    }

    #[test]
    fn test_prime_meridian_on_the_disc_rim_maps_back() {
        // Longitude 0 sits on the rim shared by both discs
        let p = Projection::new(ProjectionKind::Ancient, 1.0, 400, 200, 0.0).unwrap();
        for lat in [0.34, -1.36, 0.0, 1.2] {
            let (x, y) = p.spherical_to_pixel(lat, 0.0).unwrap();
            let back = p
                .pixel_to_spherical(x, y)
                .unwrap_or_else(|| panic!("lat {} lost at ({}, {})", lat, x, y));
            assert_relative_eq!(back.lat, lat, epsilon = 1e-9);
            assert_relative_eq!(back.lon, 0.0, epsilon = 1e-9);
        }
    }
}
