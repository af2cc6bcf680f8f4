//! # Vector and Rotation Helpers
//!
//! Small helpers on top of nalgebra used throughout the rendering pipeline.
//!
//! ## Rotation Convention
//!
//! The `rotation_*` constructors return active rotations: multiplying a
//! column vector by `rotation_z(theta)` turns it counter-clockwise by `theta`
//! about +Z when viewed from +Z looking back at the origin. Each rotation is
//! orthonormal, so its inverse is its transpose, and `rotation_*(-theta)`
//! undoes `rotation_*(theta)`.

use nalgebra::{Matrix3, Vector3};

/// Cosine of the angle between two vectors
///
/// Returns 0 when either vector has zero length rather than NaN; callers use
/// this inside per-pixel loops where a degenerate sample should contribute
/// nothing.
pub fn ndot(a: &Vector3<f64>, b: &Vector3<f64>) -> f64 {
    let denom = (a.norm_squared() * b.norm_squared()).sqrt();
    if denom == 0.0 {
        return 0.0;
    }
    a.dot(b) / denom
}

/// Rotation about the X axis
pub fn rotation_x(theta: f64) -> Matrix3<f64> {
    let (s, c) = theta.sin_cos();
    Matrix3::new(1.0, 0.0, 0.0, 0.0, c, -s, 0.0, s, c)
}

/// Rotation about the Y axis
///
/// Positive angles turn +X toward -Z, so a point at latitude `theta` on the
/// prime meridian is brought down onto the equator.
pub fn rotation_y(theta: f64) -> Matrix3<f64> {
    let (s, c) = theta.sin_cos();
    Matrix3::new(c, 0.0, s, 0.0, 1.0, 0.0, -s, 0.0, c)
}

/// Rotation about the Z axis
pub fn rotation_z(theta: f64) -> Matrix3<f64> {
    let (s, c) = theta.sin_cos();
    Matrix3::new(c, -s, 0.0, s, c, 0.0, 0.0, 0.0, 1.0)
}

/// Build a matrix whose rows are the given axes
///
/// When the axes form an orthonormal basis, multiplying by the result
/// expresses a vector in that basis.
pub fn matrix_from_rows(
    x: &Vector3<f64>,
    y: &Vector3<f64>,
    z: &Vector3<f64>,
) -> Matrix3<f64> {
    Matrix3::from_rows(&[x.transpose(), y.transpose(), z.transpose()])
}

/// Component of `v` perpendicular to the unit vector `axis`
pub fn reject(v: &Vector3<f64>, axis: &Vector3<f64>) -> Vector3<f64> {
    v - axis * v.dot(axis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_ndot_parallel_and_perpendicular() {
        let a = Vector3::new(2.0, 0.0, 0.0);
        let b = Vector3::new(5.0, 0.0, 0.0);
        let c = Vector3::new(0.0, 3.0, 0.0);
        assert_relative_eq!(ndot(&a, &b), 1.0);
        assert_relative_eq!(ndot(&a, &c), 0.0);
        assert_eq!(ndot(&a, &Vector3::zeros()), 0.0);
    }

    #[test]
    fn test_rotation_z_quarter_turn() {
        let v = rotation_z(FRAC_PI_2) * Vector3::x();
        assert_relative_eq!(v, Vector3::y(), epsilon = 1e-15);
    }

    #[test]
    fn test_rotation_y_brings_latitude_to_equator() {
        let lat: f64 = 0.7;
        let p = Vector3::new(lat.cos(), 0.0, lat.sin());
        let v = rotation_y(lat) * p;
        assert_relative_eq!(v, Vector3::x(), epsilon = 1e-15);
    }

    #[test]
    fn test_rotations_invert_with_negated_angle() {
        let v = Vector3::new(0.3, -1.2, 2.5);
        for rot in [rotation_x, rotation_y, rotation_z] {
            let back = rot(-0.8) * (rot(0.8) * v);
            assert_relative_eq!(back, v, epsilon = 1e-14);
            assert_relative_eq!(rot(0.8).transpose(), rot(-0.8), epsilon = 1e-15);
        }
    }

    #[test]
    fn test_matrix_from_rows_projects_onto_axes() {
        let m = matrix_from_rows(&Vector3::y(), &Vector3::z(), &Vector3::x());
        let v = m * Vector3::new(1.0, 2.0, 3.0);
        assert_eq!(v, Vector3::new(2.0, 3.0, 1.0));
    }

    #[test]
    fn test_reject_removes_axis_component() {
        let v = reject(&Vector3::new(1.0, 2.0, 3.0), &Vector3::z());
        assert_eq!(v, Vector3::new(1.0, 2.0, 0.0));
    }
}
