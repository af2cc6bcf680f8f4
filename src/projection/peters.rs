use std::f64::consts::{FRAC_PI_4, PI};

use super::{Cartographic, Local, ProjectionFrame, EDGE_TOLERANCE};

/// Gall-Peters projection (cylindrical equal-area with standard parallels
/// at 45 degrees)
///
/// The map keeps its natural aspect ratio and is centred in the frame;
/// pixels outside it map to nothing.
#[derive(Debug, Clone)]
pub(crate) struct Peters {
    cos_standard: f64,
    scale: f64,
}

impl Peters {
    pub fn new(frame: &ProjectionFrame) -> Self {
        let cos_standard = FRAC_PI_4.cos();
        let map_width = 2.0 * PI * cos_standard;
        let map_height = 2.0 / cos_standard;
        Self {
            cos_standard,
            scale: (frame.width() / map_width).min(frame.height() / map_height),
        }
    }
}

impl Cartographic for Peters {
    fn inverse(&self, frame: &ProjectionFrame, x: f64, y: f64) -> Option<Local> {
        let big_x = (x - frame.center_x()) / self.scale;
        let big_y = (frame.center_y() - y) / self.scale;
        let lon = big_x / self.cos_standard;
        let sin_lat = big_y * self.cos_standard;
        if lon.abs() > PI + EDGE_TOLERANCE || sin_lat.abs() > 1.0 + EDGE_TOLERANCE {
            return None;
        }
        Some(Local::flat(sin_lat.clamp(-1.0, 1.0).asin(), lon.clamp(-PI, PI)))
    }

    fn forward(&self, frame: &ProjectionFrame, lat: f64, lon: f64) -> Option<(f64, f64)> {
        let big_x = lon * self.cos_standard;
        let big_y = lat.sin() / self.cos_standard;
        Some((
            frame.center_x() + big_x * self.scale,
            frame.center_y() - big_y * self.scale,
        ))
    }
}
