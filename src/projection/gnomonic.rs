use nalgebra::Vector3;

use super::{Cartographic, Local, ProjectionFrame};
use crate::coordinates::{to_lat_lon, unit_vector};

/// Gnomonic projection onto the plane tangent at the local origin; great
/// circles are straight lines. The frame's shorter half-side spans 45
/// degrees.
#[derive(Debug, Clone)]
pub(crate) struct Gnomonic {
    scale: f64,
}

impl Gnomonic {
    pub fn new(frame: &ProjectionFrame) -> Self {
        Self {
            scale: frame.width().min(frame.height()) / 2.0,
        }
    }
}

impl Cartographic for Gnomonic {
    fn inverse(&self, frame: &ProjectionFrame, x: f64, y: f64) -> Option<Local> {
        let big_x = (x - frame.center_x()) / self.scale;
        let big_y = (frame.center_y() - y) / self.scale;
        let (lat, lon) = to_lat_lon(&Vector3::new(1.0, big_x, big_y));
        Some(Local::flat(lat, lon))
    }

    fn forward(&self, frame: &ProjectionFrame, lat: f64, lon: f64) -> Option<(f64, f64)> {
        let v = unit_vector(lat, lon);
        if v.x <= 1e-6 {
            return None;
        }
        Some((
            frame.center_x() + v.y / v.x * self.scale,
            frame.center_y() - v.z / v.x * self.scale,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::super::{Projection, ProjectionKind};
    use approx::assert_relative_eq;

    #[test]
    fn test_half_frame_is_45_degrees() {
        let p = Projection::new(ProjectionKind::Gnomonic, 1.0, 200, 200, 0.0).unwrap();
        let (x, _) = p.spherical_to_pixel(0.0, std::f64::consts::FRAC_PI_4).unwrap();
        assert_relative_eq!(x, 200.0, epsilon = 1e-9);
        assert!(p.spherical_to_pixel(0.0, 2.0).is_none());
    }
}
