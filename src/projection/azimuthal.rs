use std::f64::consts::{FRAC_PI_2, PI};

use super::{Cartographic, Local, ProjectionFrame, EDGE_TOLERANCE};

/// Azimuthal equidistant projection centred on the local north pole
///
/// Distance from the centre is proportional to angular distance from the
/// pole; the disc edge is the south pole.
#[derive(Debug, Clone)]
pub(crate) struct Azimuthal {
    radius: f64,
    range: f64,
}

impl Azimuthal {
    pub fn new(frame: &ProjectionFrame) -> Self {
        Self {
            radius: frame.width().min(frame.height()) / 2.0,
            range: PI,
        }
    }
}

impl Cartographic for Azimuthal {
    fn inverse(&self, frame: &ProjectionFrame, x: f64, y: f64) -> Option<Local> {
        let big_x = (x - frame.center_x()) / self.radius;
        let big_y = (y - frame.center_y()) / self.radius;
        let rho = big_x.hypot(big_y) * self.range;
        if rho > self.range + EDGE_TOLERANCE {
            return None;
        }
        let rho = rho.min(self.range);
        Some(Local::flat(FRAC_PI_2 - rho, big_x.atan2(big_y)))
    }

    fn forward(&self, frame: &ProjectionFrame, lat: f64, lon: f64) -> Option<(f64, f64)> {
        let rho = (FRAC_PI_2 - lat) / self.range;
        let (sin_lon, cos_lon) = lon.sin_cos();
        Some((
            frame.center_x() + rho * sin_lon * self.radius,
            frame.center_y() + rho * cos_lon * self.radius,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::super::{Projection, ProjectionKind};
    use approx::assert_relative_eq;

    #[test]
    fn test_pole_at_centre_equator_at_half_radius() {
        let p = Projection::new(ProjectionKind::Azimuthal, 1.0, 200, 200, 0.0).unwrap();
        let pole = p.pixel_to_spherical(100.0, 100.0).unwrap();
        assert_relative_eq!(pole.lat, std::f64::consts::FRAC_PI_2, epsilon = 1e-12);
        let (x, y) = p.spherical_to_pixel(0.0, 0.0).unwrap();
        assert_relative_eq!(x, 100.0, epsilon = 1e-9);
        assert_relative_eq!(y, 150.0, epsilon = 1e-9);
        assert!(p.pixel_to_spherical(0.0, 0.0).is_none());
    }
}
