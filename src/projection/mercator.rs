use std::f64::consts::{FRAC_PI_4, PI};

use super::{Cartographic, Local, ProjectionFrame};
use crate::constants::TAU;

/// Mercator projection; the frame height spans +/- 1.5 PI in the stretched
/// latitude coordinate (about +/- 85 degrees)
#[derive(Debug, Clone)]
pub(crate) struct Mercator;

const Y_SPAN: f64 = 1.5 * PI;

impl Cartographic for Mercator {
    fn inverse(&self, frame: &ProjectionFrame, x: f64, y: f64) -> Option<Local> {
        let big_x = (x - frame.center_x()) * TAU / frame.width();
        let big_y = (frame.center_y() - y) * Y_SPAN / frame.height();
        Some(Local::flat(big_y.sinh().atan(), big_x))
    }

    fn forward(&self, frame: &ProjectionFrame, lat: f64, lon: f64) -> Option<(f64, f64)> {
        let big_y = (FRAC_PI_4 + lat / 2.0).tan().ln();
        let x = frame.width() * lon / TAU + frame.center_x();
        let y = frame.center_y() - frame.height() * big_y / Y_SPAN;
        if !(0.0..frame.height()).contains(&y) {
            return None;
        }
        Some((x, y))
    }
}

#[cfg(test)]
mod tests {
    use super::super::{Projection, ProjectionKind};
    use approx::assert_relative_eq;

    #[test]
    fn test_equator_is_the_middle_row() {
        let p = Projection::new(ProjectionKind::Mercator, 1.0, 400, 200, 0.0).unwrap();
        let (x, y) = p.spherical_to_pixel(0.0, 0.0).unwrap();
        assert_relative_eq!(x, 200.0, epsilon = 1e-9);
        assert_relative_eq!(y, 100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_poles_fall_off_the_map() {
        let p = Projection::new(ProjectionKind::Mercator, 1.0, 400, 200, 0.0).unwrap();
        assert!(p.spherical_to_pixel(89.0f64.to_radians(), 0.0).is_none());
        assert!(p.spherical_to_pixel(-89.0f64.to_radians(), 0.0).is_none());
    }
}
