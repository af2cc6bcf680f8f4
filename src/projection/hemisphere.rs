use std::f64::consts::PI;

use super::orthographic::{disc_forward, disc_inverse};
use super::{Cartographic, Local, ProjectionFrame};
use crate::coordinates::{unit_vector, wrap_longitude};

/// Two orthographic discs side by side: the near hemisphere on the left,
/// the far hemisphere (seen from behind) on the right
#[derive(Debug, Clone)]
pub(crate) struct Hemisphere {
    radius: f64,
}

impl Hemisphere {
    pub fn new(frame: &ProjectionFrame) -> Self {
        Self {
            radius: (frame.width() / 4.0).min(frame.height() / 2.0),
        }
    }

    fn centres(&self, frame: &ProjectionFrame) -> [(f64, f64); 2] {
        let cy = frame.center_y();
        [(frame.width() / 4.0, cy), (frame.width() * 0.75, cy)]
    }
}

impl Cartographic for Hemisphere {
    fn inverse(&self, frame: &ProjectionFrame, x: f64, y: f64) -> Option<Local> {
        let [near, far] = self.centres(frame);
        if x < frame.center_x() {
            disc_inverse(near.0, near.1, self.radius, x, y)
        } else {
            let mut local = disc_inverse(far.0, far.1, self.radius, x, y)?;
            local.lon = wrap_longitude(local.lon + PI);
            Some(local)
        }
    }

    fn forward(&self, frame: &ProjectionFrame, lat: f64, lon: f64) -> Option<(f64, f64)> {
        let [near, far] = self.centres(frame);
        if unit_vector(lat, lon).x >= 0.0 {
            disc_forward(near.0, near.1, self.radius, lat, lon)
        } else {
            disc_forward(far.0, far.1, self.radius, lat, wrap_longitude(lon - PI))
        }
    }
}
