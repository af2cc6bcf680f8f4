//! RGB texture buffers
//!
//! A [`Texture`] is a row-major 8-bit RGB raster with an optional alpha
//! channel. It is used for source image maps, for finished [`crate::Map`]
//! grids and as the exchange format with the [`TextureLoader`] that reads
//! image files.

use image::imageops::{self, FilterType};
use image::{GrayImage, RgbImage};

use crate::{PlanetariumError, Result};

pub mod io;

pub use io::{ImageFileLoader, ImageFileWriter, OutputSink, TextureLoader};

/// Row-major 8-bit RGB raster with optional alpha
#[derive(Debug, Clone, PartialEq)]
pub struct Texture {
    width: usize,
    height: usize,
    rgb: Vec<u8>,
    alpha: Option<Vec<u8>>,
}

impl Texture {
    /// Wrap existing buffers
    ///
    /// # Errors
    ///
    /// Returns [`PlanetariumError::InvalidInput`] if either dimension is zero
    /// or a buffer length does not match the dimensions.
    pub fn new(width: usize, height: usize, rgb: Vec<u8>, alpha: Option<Vec<u8>>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(PlanetariumError::InvalidInput(format!(
                "texture size must be positive, got {}x{}",
                width, height
            )));
        }
        if rgb.len() != width * height * 3 {
            return Err(PlanetariumError::InvalidInput(format!(
                "RGB buffer has {} bytes, expected {} for {}x{}",
                rgb.len(),
                width * height * 3,
                width,
                height
            )));
        }
        if let Some(a) = &alpha {
            if a.len() != width * height {
                return Err(PlanetariumError::InvalidInput(format!(
                    "alpha buffer has {} bytes, expected {}",
                    a.len(),
                    width * height
                )));
            }
        }
        Ok(Self {
            width,
            height,
            rgb,
            alpha,
        })
    }

    /// A texture of a single colour
    pub fn filled(width: usize, height: usize, color: [u8; 3]) -> Result<Self> {
        let rgb = color
            .iter()
            .copied()
            .cycle()
            .take(width * height * 3)
            .collect();
        Self::new(width, height, rgb, None)
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

    pub(crate) fn rgb_mut(&mut self) -> &mut [u8] {
        &mut self.rgb
    }

    pub fn alpha(&self) -> Option<&[u8]> {
        self.alpha.as_deref()
    }

    pub fn same_size(&self, other: &Texture) -> bool {
        self.width == other.width && self.height == other.height
    }

    /// Colour at integer pixel (`x`, `y`)
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 3] {
        let i = 3 * (y * self.width + x);
        [self.rgb[i], self.rgb[i + 1], self.rgb[i + 2]]
    }

    /// Grey level of a pixel, for single-channel layers such as cloud or
    /// specular maps
    pub fn luminance(&self, x: usize, y: usize) -> u8 {
        let [r, g, b] = self.pixel(x, y);
        ((u16::from(r) + u16::from(g) + u16::from(b)) / 3) as u8
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, color: [u8; 3]) {
        let i = 3 * (y * self.width + x);
        self.rgb[i..i + 3].copy_from_slice(&color);
    }

    /// Bilinear sample at continuous pixel coordinates (integer values at
    /// pixel centres); x wraps around, y clamps to the first/last row
    pub fn sample_bilinear(&self, x: f64, y: f64) -> [u8; 3] {
        let w = self.width as i64;
        let h = self.height as i64;

        let x0 = x.floor() as i64;
        let y0 = y.floor() as i64;
        let fx = x - x0 as f64;
        let fy = (y - y0 as f64).clamp(0.0, 1.0);

        let wrap = |c: i64| c.rem_euclid(w) as usize;
        let clamp = |c: i64| c.clamp(0, h - 1) as usize;

        let (xa, xb) = (wrap(x0), wrap(x0 + 1));
        let (ya, yb) = (clamp(y0), clamp(y0 + 1));

        let p00 = self.pixel(xa, ya);
        let p10 = self.pixel(xb, ya);
        let p01 = self.pixel(xa, yb);
        let p11 = self.pixel(xb, yb);

        let mut result = [0u8; 3];
        for c in 0..3 {
            let v0 = f64::from(p00[c]) * (1.0 - fx) + f64::from(p10[c]) * fx;
            let v1 = f64::from(p01[c]) * (1.0 - fx) + f64::from(p11[c]) * fx;
            let v = v0 * (1.0 - fy) + v1 * fy;
            result[c] = v.round().clamp(0.0, 255.0) as u8;
        }
        result
    }

    /// Resample to a new size with a triangle filter
    pub fn resize(&self, width: usize, height: usize) -> Result<Texture> {
        if width == self.width && height == self.height {
            return Ok(self.clone());
        }
        let src = self.to_rgb_image()?;
        let resized = imageops::resize(&src, width as u32, height as u32, FilterType::Triangle);
        let alpha = match &self.alpha {
            Some(a) => {
                let gray = GrayImage::from_raw(self.width as u32, self.height as u32, a.clone())
                    .ok_or_else(|| {
                        PlanetariumError::InvalidInput("alpha buffer size mismatch".to_string())
                    })?;
                Some(
                    imageops::resize(&gray, width as u32, height as u32, FilterType::Triangle)
                        .into_raw(),
                )
            }
            None => None,
        };
        Texture::new(width, height, resized.into_raw(), alpha)
    }

    /// Downsample by `factor` successive halvings
    ///
    /// Each output pixel is the rounded mean of a `2^factor` square block of
    /// input pixels; alpha is averaged the same way. The factor is limited
    /// so the result keeps at least one pixel in each direction.
    pub fn reduce(&self, factor: u32) -> Texture {
        let max_factor = self.width.min(self.height).ilog2();
        let factor = factor.min(max_factor);
        if factor == 0 {
            return self.clone();
        }
        let scale = 1usize << factor;
        let width = self.width / scale;
        let height = self.height / scale;
        let area = (scale * scale) as f64;

        let average = |src: &[u8], channels: usize, x: usize, y: usize, c: usize| -> u8 {
            let mut sum = 0u32;
            for j in y * scale..(y + 1) * scale {
                let row = j * self.width;
                for i in x * scale..(x + 1) * scale {
                    sum += u32::from(src[channels * (row + i) + c]);
                }
            }
            (f64::from(sum) / area + 0.5) as u8
        };

        let mut rgb = Vec::with_capacity(width * height * 3);
        for y in 0..height {
            for x in 0..width {
                for c in 0..3 {
                    rgb.push(average(&self.rgb, 3, x, y, c));
                }
            }
        }
        let alpha = self.alpha.as_ref().map(|a| {
            let mut out = Vec::with_capacity(width * height);
            for y in 0..height {
                for x in 0..width {
                    out.push(average(a, 1, x, y, 0));
                }
            }
            out
        });

        Texture {
            width,
            height,
            rgb,
            alpha,
        }
    }

    pub fn to_rgb_image(&self) -> Result<RgbImage> {
        RgbImage::from_raw(self.width as u32, self.height as u32, self.rgb.clone()).ok_or_else(
            || PlanetariumError::InvalidInput("RGB buffer size mismatch".to_string()),
        )
    }

    pub fn from_rgb_image(img: RgbImage, alpha: Option<Vec<u8>>) -> Result<Self> {
        let (w, h) = img.dimensions();
        Self::new(w as usize, h as usize, img.into_raw(), alpha)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: usize, height: usize) -> Texture {
        let mut rgb = Vec::new();
        for y in 0..height {
            for x in 0..width {
                rgb.extend_from_slice(&[(x * 10) as u8, (y * 10) as u8, 7]);
            }
        }
        Texture::new(width, height, rgb, None).unwrap()
    }

    #[test]
    fn test_buffer_size_is_checked() {
        assert!(Texture::new(2, 2, vec![0; 11], None).is_err());
        assert!(Texture::new(2, 2, vec![0; 12], Some(vec![0; 3])).is_err());
        assert!(Texture::new(0, 2, vec![], None).is_err());
    }

    #[test]
    fn test_reduce_box_average() {
        let t = Texture::new(
            2,
            2,
            vec![0, 0, 0, 1, 1, 1, 2, 2, 2, 2, 2, 2],
            Some(vec![255, 255, 0, 0]),
        )
        .unwrap();
        let r = t.reduce(1);
        assert_eq!((r.width(), r.height()), (1, 1));
        // (0 + 1 + 2 + 2) / 4 = 1.25 rounds to 1
        assert_eq!(r.pixel(0, 0), [1, 1, 1]);
        assert_eq!(r.alpha().unwrap(), &[128]);
    }

    #[test]
    fn test_reduce_is_limited_by_size() {
        let t = gradient(8, 4);
        let r = t.reduce(5);
        assert_eq!((r.width(), r.height()), (2, 1));
        assert_eq!(t.reduce(0), t);
    }

    #[test]
    fn test_bilinear_wraps_in_x_and_clamps_in_y() {
        let t = gradient(4, 3);
        // Halfway between the last and first column
        let p = t.sample_bilinear(3.5, 0.0);
        assert_eq!(p[0], 15);
        assert_eq!(t.sample_bilinear(1.0, -5.0), t.pixel(1, 0));
        assert_eq!(t.sample_bilinear(1.0, 10.0), t.pixel(1, 2));
    }

    #[test]
    fn test_resize_keeps_flat_colour() {
        let t = Texture::filled(10, 5, [12, 34, 56]).unwrap();
        let r = t.resize(4, 2).unwrap();
        assert_eq!((r.width(), r.height()), (4, 2));
        assert_eq!(r.pixel(3, 1), [12, 34, 56]);
    }
}
