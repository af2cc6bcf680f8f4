use super::{Cartographic, Local, ProjectionFrame, EDGE_TOLERANCE};
use crate::constants::TAU;

/// Lambert cylindrical equal-area projection, stretched to fill the frame
#[derive(Debug, Clone)]
pub(crate) struct Lambert;

impl Cartographic for Lambert {
    fn inverse(&self, frame: &ProjectionFrame, x: f64, y: f64) -> Option<Local> {
        let lon = (x - frame.center_x()) * TAU / frame.width();
        let sin_lat = (frame.center_y() - y) * 2.0 / frame.height();
        if sin_lat.abs() > 1.0 + EDGE_TOLERANCE {
            return None;
        }
        Some(Local::flat(sin_lat.clamp(-1.0, 1.0).asin(), lon))
    }

    fn forward(&self, frame: &ProjectionFrame, lat: f64, lon: f64) -> Option<(f64, f64)> {
        Some((
            frame.center_x() + lon * frame.width() / TAU,
            frame.center_y() - lat.sin() * frame.height() / 2.0,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::super::{Projection, ProjectionKind};
    use approx::assert_relative_eq;

    #[test]
    fn test_equal_area_rows() {
        // Equal pixel rows enclose equal areas, so 30 degrees is a quarter of the way up
        let p = Projection::new(ProjectionKind::Lambert, 1.0, 360, 200, 0.0).unwrap();
        let (_, y) = p.spherical_to_pixel(30.0f64.to_radians(), 0.0).unwrap();
        assert_relative_eq!(y, 50.0, epsilon = 1e-9);
    }
}
