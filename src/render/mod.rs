//! Rasterization onto an output frame
//!
//! [`Framebuffer`] is the frame being drawn: 8-bit RGB with an optional
//! alpha channel. Drawing is compositing: every write carries an opacity
//! and is blended over what is already there.
//!
//! The rasterizers ([`draw_sphere`], [`draw_ellipsoid`], [`draw_sun`],
//! [`draw_rings`]) cast one ray per output pixel through a [`Viewport`] and
//! run row-parallel with rayon; each row is owned by one worker.

use nalgebra::Vector3;
use rayon::prelude::*;

use crate::view::{PixelPosition, View};
use crate::{PlanetariumError, Result};

pub mod photo;
pub mod rings;
pub mod sphere;
pub mod sun;

pub use photo::{photo_function, PhotoTable};
pub use rings::{draw_rings, RingHalf};
pub use sphere::{draw_ellipsoid, draw_sphere, BodyDrawing};
pub use sun::{draw_sun, glow_opacity};

fn blend_channel(old: u8, new: u8, opacity: f64) -> u8 {
    (opacity * f64::from(new) + (1.0 - opacity) * f64::from(old))
        .round()
        .clamp(0.0, 255.0) as u8
}

/// Weights spreading a point at continuous (`x`, `y`) over the four
/// pixels around it: ((x, y), weight) for the pixels at floor and floor + 1
pub fn fractional_weights(x: f64, y: f64) -> [((i64, i64), f64); 4] {
    let ix = x.floor();
    let iy = y.floor();
    let fx = x - ix;
    let fy = y - iy;
    let (ix, iy) = (ix as i64, iy as i64);
    [
        ((ix, iy), (1.0 - fx) * (1.0 - fy)),
        ((ix + 1, iy), fx * (1.0 - fy)),
        ((ix, iy + 1), (1.0 - fx) * fy),
        ((ix + 1, iy + 1), fx * fy),
    ]
}

/// Output frame
#[derive(Debug, Clone, PartialEq)]
pub struct Framebuffer {
    width: usize,
    height: usize,
    rgb: Vec<u8>,
    alpha: Option<Vec<u8>>,
}

impl Framebuffer {
    /// A black, opaque frame
    ///
    /// # Errors
    ///
    /// Returns [`PlanetariumError::InvalidInput`] if either side is zero.
    pub fn new(width: usize, height: usize) -> Result<Self> {
        Self::filled(width, height, [0, 0, 0])
    }

    /// An opaque frame of one colour
    pub fn filled(width: usize, height: usize, color: [u8; 3]) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(PlanetariumError::InvalidInput(format!(
                "frame size must be positive, got {}x{}",
                width, height
            )));
        }
        let rgb = color.iter().copied().cycle().take(width * height * 3).collect();
        Ok(Self {
            width,
            height,
            rgb,
            alpha: None,
        })
    }

    /// A fully transparent frame; writes raise the alpha of the pixels they
    /// touch
    pub fn transparent(width: usize, height: usize) -> Result<Self> {
        let mut frame = Self::new(width, height)?;
        frame.alpha = Some(vec![0; width * height]);
        Ok(frame)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn rgb(&self) -> &[u8] {
        &self.rgb
    }

    pub fn alpha(&self) -> Option<&[u8]> {
        self.alpha.as_deref()
    }

    fn contains(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    pub fn get_pixel(&self, x: usize, y: usize) -> [u8; 3] {
        let i = 3 * (y * self.width + x);
        [self.rgb[i], self.rgb[i + 1], self.rgb[i + 2]]
    }

    /// Opaque write; ignored outside the frame
    pub fn set_pixel(&mut self, x: usize, y: usize, color: [u8; 3]) {
        self.blend(x as i64, y as i64, color, 1.0);
    }

    /// Blend `color` over pixel (`x`, `y`) with `opacity` in [0, 1]; ignored
    /// outside the frame
    pub fn blend(&mut self, x: i64, y: i64, color: [u8; 3], opacity: f64) {
        if !self.contains(x, y) || opacity <= 0.0 {
            return;
        }
        let opacity = opacity.min(1.0);
        let idx = y as usize * self.width + x as usize;
        for (c, &v) in self.rgb[3 * idx..3 * idx + 3].iter_mut().zip(&color) {
            *c = blend_channel(*c, v, opacity);
        }
        if let Some(alpha) = &mut self.alpha {
            alpha[idx] = blend_channel(alpha[idx], 255, opacity);
        }
    }

    /// Draw a point at continuous coordinates, spread over the four
    /// nearest pixels by area
    pub fn set_pixel_fractional(&mut self, x: f64, y: f64, color: [u8; 3], opacity: f64) {
        for ((px, py), weight) in fractional_weights(x, y) {
            self.blend(px, py, color, weight * opacity);
        }
    }

    /// Mutable rows for parallel drawing
    pub(crate) fn rows_mut(&mut self) -> Vec<RowMut<'_>> {
        let w = self.width;
        let rgb = self.rgb.chunks_mut(3 * w);
        match &mut self.alpha {
            Some(alpha) => rgb
                .zip(alpha.chunks_mut(w))
                .enumerate()
                .map(|(y, (rgb, alpha))| RowMut {
                    y,
                    rgb,
                    alpha: Some(alpha),
                })
                .collect(),
            None => rgb
                .enumerate()
                .map(|(y, rgb)| RowMut {
                    y,
                    rgb,
                    alpha: None,
                })
                .collect(),
        }
    }

    /// Run `f` on the rows in `y_range` in parallel
    pub(crate) fn par_rows<F>(&mut self, y_range: std::ops::Range<usize>, f: F)
    where
        F: Fn(&mut RowMut<'_>) + Sync + Send,
    {
        let end = y_range.end.min(self.height);
        let start = y_range.start.min(end);
        self.rows_mut()
            .into_par_iter()
            .skip(start)
            .take(end - start)
            .for_each(|mut row| f(&mut row));
    }
}

/// One scanline of a [`Framebuffer`]
#[derive(Debug)]
pub(crate) struct RowMut<'a> {
    pub y: usize,
    rgb: &'a mut [u8],
    alpha: Option<&'a mut [u8]>,
}

impl RowMut<'_> {
    pub fn width(&self) -> usize {
        self.rgb.len() / 3
    }

    pub fn blend(&mut self, x: usize, color: [u8; 3], opacity: f64) {
        if x >= self.width() || opacity <= 0.0 {
            return;
        }
        let opacity = opacity.min(1.0);
        for (c, &v) in self.rgb[3 * x..3 * x + 3].iter_mut().zip(&color) {
            *c = blend_channel(*c, v, opacity);
        }
        if let Some(alpha) = &mut self.alpha {
            alpha[x] = blend_channel(alpha[x], 255, opacity);
        }
    }
}

/// A [`View`] placed on a frame: the view's line of sight passes through
/// pixel (`center_x`, `center_y`)
#[derive(Debug, Clone, Copy)]
pub struct Viewport<'a> {
    pub view: &'a View,
    pub center_x: f64,
    pub center_y: f64,
}

impl<'a> Viewport<'a> {
    pub fn new(view: &'a View, center_x: f64, center_y: f64) -> Self {
        Self {
            view,
            center_x,
            center_y,
        }
    }

    /// Frame position of a heliocentric point
    pub fn project(&self, p: &Vector3<f64>) -> PixelPosition {
        let mut pos = self.view.xyz_to_pixel(p);
        pos.x += self.center_x;
        pos.y += self.center_y;
        pos
    }

    /// Unit heliocentric direction of the ray through frame pixel (`x`, `y`)
    pub fn ray(&self, x: f64, y: f64) -> Vector3<f64> {
        let v = self.view.pixel_to_view(x - self.center_x, y - self.center_y);
        self.view.direction_to_xyz(&v).normalize()
    }

    /// Pixel radius of a sphere of `radius` centred at `center`, or `None`
    /// when it is behind the observer or the observer is inside it
    pub fn pixel_radius(&self, center: &Vector3<f64>, radius: f64) -> Option<f64> {
        let dist = (center - self.view.observer()).norm();
        if dist <= radius || self.view.rotate_to_view(center).z <= 0.0 {
            return None;
        }
        let angular = (radius / dist).asin();
        Some(angular.tan() * self.view.dist_to_plane() / self.view.dist_per_pixel())
    }
}

/// Inclusive pixel ranges covering a disc, clipped to the frame; `None` if
/// the disc is entirely off the frame
pub(crate) fn disc_bounds(
    frame: &Framebuffer,
    x: f64,
    y: f64,
    radius: f64,
) -> Option<(std::ops::Range<usize>, std::ops::Range<usize>)> {
    let x0 = (x - radius - 2.0).floor().max(0.0);
    let x1 = (x + radius + 2.0).ceil().min(frame.width() as f64 - 1.0);
    let y0 = (y - radius - 2.0).floor().max(0.0);
    let y1 = (y + radius + 2.0).ceil().min(frame.height() as f64 - 1.0);
    if !(x0 <= x1 && y0 <= y1) {
        return None;
    }
    Some((x0 as usize..x1 as usize + 1, y0 as usize..y1 as usize + 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_zero_size_is_rejected() {
        assert!(Framebuffer::new(0, 10).is_err());
        assert!(Framebuffer::transparent(10, 0).is_err());
    }

    #[test]
    fn test_blend_mixes_colours() {
        let mut frame = Framebuffer::filled(2, 2, [100, 100, 100]).unwrap();
        frame.blend(1, 1, [200, 0, 100], 0.5);
        assert_eq!(frame.get_pixel(1, 1), [150, 50, 100]);
        frame.blend(5, 5, [255, 255, 255], 1.0);
        frame.blend(-1, 0, [255, 255, 255], 1.0);
        assert_eq!(frame.get_pixel(0, 0), [100, 100, 100]);
    }

    #[test]
    fn test_fractional_point_spreads_over_four_pixels() {
        let weights = fractional_weights(1.25, 2.5);
        let total: f64 = weights.iter().map(|(_, w)| w).sum();
        assert_relative_eq!(total, 1.0, epsilon = 1e-12);
        assert_eq!(weights[0].0, (1, 2));
        assert_relative_eq!(weights[0].1, 0.375, epsilon = 1e-12);

        let mut frame = Framebuffer::new(4, 4).unwrap();
        frame.set_pixel_fractional(1.0, 1.0, [200, 200, 200], 1.0);
        assert_eq!(frame.get_pixel(1, 1), [200, 200, 200]);
        assert_eq!(frame.get_pixel(2, 1), [0, 0, 0]);
    }

    #[test]
    fn test_transparent_frame_gains_alpha_where_drawn() {
        let mut frame = Framebuffer::transparent(3, 1).unwrap();
        frame.set_pixel(0, 0, [1, 2, 3]);
        frame.blend(1, 0, [1, 2, 3], 0.5);
        assert_eq!(frame.alpha().unwrap(), &[255, 128, 0]);
    }

    #[test]
    fn test_parallel_rows_cover_the_requested_range() {
        let mut frame = Framebuffer::transparent(4, 6).unwrap();
        frame.par_rows(2..4, |row| {
            for x in 0..row.width() {
                row.blend(x, [9, 9, 9], 1.0);
            }
        });
        assert_eq!(frame.get_pixel(3, 2), [9, 9, 9]);
        assert_eq!(frame.get_pixel(3, 3), [9, 9, 9]);
        assert_eq!(frame.get_pixel(0, 4), [0, 0, 0]);
        assert_eq!(frame.alpha().unwrap()[4 * 2], 255);
        assert_eq!(frame.alpha().unwrap()[0], 0);
    }
}
