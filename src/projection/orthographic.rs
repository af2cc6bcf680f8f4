//! Orthographic projection: the globe as seen from infinitely far away

use nalgebra::Vector3;

use super::{Cartographic, Local, ProjectionFrame, EDGE_TOLERANCE};
use crate::coordinates::{to_lat_lon, unit_vector};

#[derive(Debug, Clone)]
pub(crate) struct Orthographic {
    radius: f64,
}

impl Orthographic {
    pub fn new(frame: &ProjectionFrame) -> Self {
        Self {
            radius: frame.width().min(frame.height()) / 2.0,
        }
    }
}

/// Inverse orthographic mapping for a disc of `radius` centred at
/// (`cx`, `cy`), looking down the local +X axis
pub(super) fn disc_inverse(cx: f64, cy: f64, radius: f64, x: f64, y: f64) -> Option<Local> {
    let big_x = (x - cx) / radius;
    let big_y = (cy - y) / radius;
    let rho2 = big_x * big_x + big_y * big_y;
    if rho2 > 1.0 + EDGE_TOLERANCE {
        return None;
    }
    let z = (1.0 - rho2).max(0.0).sqrt();
    let (lat, lon) = to_lat_lon(&Vector3::new(z, big_x, big_y));
    Some(Local { lat, lon, mu: z })
}

/// Forward orthographic mapping; `None` on the far hemisphere
pub(super) fn disc_forward(
    cx: f64,
    cy: f64,
    radius: f64,
    lat: f64,
    lon: f64,
) -> Option<(f64, f64)> {
    let v = unit_vector(lat, lon);
    if v.x < 0.0 {
        return None;
    }
    Some((cx + v.y * radius, cy - v.z * radius))
}

impl Cartographic for Orthographic {
    fn inverse(&self, frame: &ProjectionFrame, x: f64, y: f64) -> Option<Local> {
        disc_inverse(frame.center_x(), frame.center_y(), self.radius, x, y)
    }

    fn forward(&self, frame: &ProjectionFrame, lat: f64, lon: f64) -> Option<(f64, f64)> {
        disc_forward(frame.center_x(), frame.center_y(), self.radius, lat, lon)
    }
}
