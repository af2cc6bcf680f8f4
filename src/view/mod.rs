//! Camera transform from heliocentric coordinates to screen pixels
//!
//! A [`View`] is built once per frame from an observer position, a target
//! position, an "up" direction and a linear scale (AU per pixel at the
//! target's distance). View coordinates are right-handed with the observer
//! at the origin:
//!
//! - **Z** points from the observer toward the target
//! - **Y** is the part of "up" perpendicular to Z
//! - **X** completes the frame (X = Y × Z), which puts +X on the left of the
//!   screen
//!
//! Pixel offsets are measured from the frame centre, x to the right and y
//! down, and are then turned by the optional in-plane rotation.

use nalgebra::{Matrix3, Vector3};

use crate::coordinates::{matrix_from_rows, reject};
use crate::{PlanetariumError, Result};

/// Screen position of a projected point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelPosition {
    /// Offset from the frame centre, pixels to the right
    pub x: f64,
    /// Offset from the frame centre, pixels down
    pub y: f64,
    /// Distance along the line of sight; positive in front of the observer
    pub depth: f64,
}

impl PixelPosition {
    pub fn is_in_front(&self) -> bool {
        self.depth > 0.0
    }
}

/// Perspective camera for one frame
#[derive(Debug, Clone)]
pub struct View {
    observer: Vector3<f64>,
    rotate: Matrix3<f64>,
    inv_rotate: Matrix3<f64>,
    /// AU per pixel at the target's distance
    dist_per_pixel: f64,
    /// Observer to target distance, AU
    dist_to_plane: f64,
    /// In-plane rotation (sin, cos)
    roll: (f64, f64),
}

impl View {
    /// Build a view looking from `observer` at `target`
    ///
    /// # Arguments
    ///
    /// * `observer` - Projection reference point, heliocentric AU
    /// * `target` - View reference point (usually the target body centre)
    /// * `up` - Direction that should point to the top of the screen
    /// * `dist_per_pixel` - AU per pixel at the target's distance
    /// * `rotate_angle` - Extra rotation of the image about the line of sight, radians
    ///
    /// # Errors
    ///
    /// Returns [`PlanetariumError::DegenerateView`] if the observer and target
    /// coincide, the up vector is zero or parallel to the line of sight, or the
    /// scale is not a positive finite number.
    pub fn new(
        observer: Vector3<f64>,
        target: Vector3<f64>,
        up: Vector3<f64>,
        dist_per_pixel: f64,
        rotate_angle: f64,
    ) -> Result<Self> {
        let line_of_sight = target - observer;
        let dist_to_plane = line_of_sight.norm();
        if dist_to_plane == 0.0 || !dist_to_plane.is_finite() {
            return Err(PlanetariumError::DegenerateView(format!(
                "observer {:?} and target {:?} coincide",
                observer.as_slice(),
                target.as_slice()
            )));
        }
        if up.norm() == 0.0 {
            return Err(PlanetariumError::DegenerateView(
                "up vector has zero length".to_string(),
            ));
        }
        if !(dist_per_pixel > 0.0 && dist_per_pixel.is_finite()) {
            return Err(PlanetariumError::DegenerateView(format!(
                "distance per pixel must be positive, got {}",
                dist_per_pixel
            )));
        }

        let z_axis = line_of_sight / dist_to_plane;
        let y_perp = reject(&up.normalize(), &z_axis);
        if y_perp.norm() < 1e-12 {
            return Err(PlanetariumError::DegenerateView(
                "up vector is parallel to the line of sight".to_string(),
            ));
        }
        let y_axis = y_perp.normalize();
        let x_axis = y_axis.cross(&z_axis);

        let rotate = matrix_from_rows(&x_axis, &y_axis, &z_axis);

        Ok(Self {
            observer,
            rotate,
            inv_rotate: rotate.transpose(),
            dist_per_pixel,
            dist_to_plane,
            roll: rotate_angle.sin_cos(),
        })
    }

    pub fn observer(&self) -> Vector3<f64> {
        self.observer
    }

    pub fn dist_per_pixel(&self) -> f64 {
        self.dist_per_pixel
    }

    pub fn dist_to_plane(&self) -> f64 {
        self.dist_to_plane
    }

    /// Heliocentric point to view coordinates (observer at the origin)
    pub fn rotate_to_view(&self, p: &Vector3<f64>) -> Vector3<f64> {
        self.rotate * (p - self.observer)
    }

    /// View coordinates back to a heliocentric point
    pub fn rotate_to_xyz(&self, v: &Vector3<f64>) -> Vector3<f64> {
        self.inv_rotate * v + self.observer
    }

    /// Heliocentric direction (no translation) to view coordinates
    pub fn direction_to_view(&self, d: &Vector3<f64>) -> Vector3<f64> {
        self.rotate * d
    }

    /// View-coordinate direction back to a heliocentric direction
    pub fn direction_to_xyz(&self, d: &Vector3<f64>) -> Vector3<f64> {
        self.inv_rotate * d
    }

    /// Project a heliocentric point onto the screen
    ///
    /// The pixel offset is only meaningful when the returned depth is
    /// positive; points behind the observer still get a finite offset.
    pub fn xyz_to_pixel(&self, p: &Vector3<f64>) -> PixelPosition {
        let v = self.rotate_to_view(p);
        let depth = v.z;
        let safe_depth = if depth.abs() < f64::MIN_POSITIVE {
            f64::MIN_POSITIVE.copysign(depth)
        } else {
            depth
        };
        let scale = self.dist_to_plane / (safe_depth * self.dist_per_pixel);
        let (x, y) = self.roll_forward(-v.x * scale, -v.y * scale);
        PixelPosition { x, y, depth }
    }

    /// Point on the target plane under a pixel offset, in view coordinates
    ///
    /// The returned vector is also the direction of the ray cast from the
    /// observer through that pixel.
    pub fn pixel_to_view(&self, x: f64, y: f64) -> Vector3<f64> {
        let (dx, dy) = self.roll_backward(x, y);
        Vector3::new(
            -dx * self.dist_per_pixel,
            -dy * self.dist_per_pixel,
            self.dist_to_plane,
        )
    }

    fn roll_forward(&self, x: f64, y: f64) -> (f64, f64) {
        let (s, c) = self.roll;
        (x * c - y * s, x * s + y * c)
    }

    fn roll_backward(&self, x: f64, y: f64) -> (f64, f64) {
        let (s, c) = self.roll;
        (x * c + y * s, -x * s + y * c)
    }
}
