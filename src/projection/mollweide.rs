//! Mollweide equal-area projection, stretched to fill the frame

use std::f64::consts::{FRAC_PI_2, PI, SQRT_2};

use super::{Cartographic, Local, ProjectionFrame, EDGE_TOLERANCE};

const MAX_ITERATIONS: usize = 50;
const TOLERANCE: f64 = 1e-12;

#[derive(Debug, Clone)]
pub(crate) struct Mollweide {
    scale_x: f64,
    scale_y: f64,
}

impl Mollweide {
    pub fn new(frame: &ProjectionFrame) -> Self {
        Self {
            scale_x: frame.width() / (4.0 * SQRT_2),
            scale_y: frame.height() / (2.0 * SQRT_2),
        }
    }
}

/// Solve 2θ + sin 2θ = π sin φ for the auxiliary angle θ
fn auxiliary_angle(lat: f64) -> f64 {
    if (FRAC_PI_2 - lat.abs()).abs() < 1e-10 {
        return lat.signum() * FRAC_PI_2;
    }
    let target = PI * lat.sin();
    let mut theta = lat;
    for _ in 0..MAX_ITERATIONS {
        let f = 2.0 * theta + (2.0 * theta).sin() - target;
        let df = 2.0 + 2.0 * (2.0 * theta).cos();
        if df.abs() < f64::EPSILON {
            break;
        }
        let step = f / df;
        theta -= step;
        if step.abs() < TOLERANCE {
            break;
        }
    }
    theta
}

impl Cartographic for Mollweide {
    fn inverse(&self, frame: &ProjectionFrame, x: f64, y: f64) -> Option<Local> {
        let big_x = (x - frame.center_x()) / self.scale_x;
        let big_y = (frame.center_y() - y) / self.scale_y;
        if big_y.abs() > SQRT_2 + EDGE_TOLERANCE {
            return None;
        }
        let theta = (big_y / SQRT_2).clamp(-1.0, 1.0).asin();
        let lat = ((2.0 * theta + (2.0 * theta).sin()) / PI).clamp(-1.0, 1.0).asin();
        let cos_theta = theta.cos();
        let lon = if cos_theta.abs() < 1e-12 {
            0.0
        } else {
            PI * big_x / (2.0 * SQRT_2 * cos_theta)
        };
        if lon.abs() > PI + EDGE_TOLERANCE {
            return None;
        }
        Some(Local::flat(lat, lon.clamp(-PI, PI)))
    }

    fn forward(&self, frame: &ProjectionFrame, lat: f64, lon: f64) -> Option<(f64, f64)> {
        let theta = auxiliary_angle(lat);
        let big_x = 2.0 * SQRT_2 / PI * lon * theta.cos();
        let big_y = SQRT_2 * theta.sin();
        Some((
            frame.center_x() + big_x * self.scale_x,
            frame.center_y() - big_y * self.scale_y,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_auxiliary_angle_solves_equation() {
        for lat in [-1.4, -0.7, 0.0, 0.3, 1.2] {
            let t = auxiliary_angle(lat);
            assert_relative_eq!(2.0 * t + (2.0 * t).sin(), PI * f64::sin(lat), epsilon = 1e-10);
        }
        assert_eq!(auxiliary_angle(FRAC_PI_2), FRAC_PI_2);
    }

    #[test]
    fn test_corners_are_outside_the_ellipse() {
        let p = super::super::Projection::new(
            super::super::ProjectionKind::Mollweide,
            1.0,
            400,
            200,
            0.0,
        )
        .unwrap();
        assert!(p.pixel_to_spherical(1.0, 1.0).is_none());
        assert!(p.pixel_to_spherical(200.0, 100.0).is_some());
    }
}
