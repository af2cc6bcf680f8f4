//! Image file input and output
//!
//! The renderer never touches codecs directly: textures arrive through a
//! [`TextureLoader`] and finished frames leave through an [`OutputSink`].
//! The image-crate backed implementations here are what the command line
//! tool uses.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, RgbImage, RgbaImage};

use super::Texture;
use crate::render::Framebuffer;
use crate::{texture_err, PlanetariumError, Result};

/// Source of texture images
pub trait TextureLoader: Sync {
    /// Load the image named `name`
    ///
    /// Failures are returned, not panicked on; map construction turns them
    /// into a warning and a flat-colour fallback.
    fn load(&self, name: &Path) -> Result<Texture>;
}

/// Loads textures from image files with the `image` crate
#[derive(Debug, Clone, Default)]
pub struct ImageFileLoader {
    base_dir: Option<PathBuf>,
}

impl ImageFileLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve relative texture names against `dir`
    pub fn with_base_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: Some(dir.into()),
        }
    }

    fn resolve(&self, name: &Path) -> PathBuf {
        match &self.base_dir {
            Some(dir) if name.is_relative() => dir.join(name),
            _ => name.to_path_buf(),
        }
    }
}

impl TextureLoader for ImageFileLoader {
    fn load(&self, name: &Path) -> Result<Texture> {
        let path = self.resolve(name);
        let img = image::open(&path).map_err(|e| texture_err(&path, e))?;
        let alpha = if img.color().has_alpha() {
            Some(img.to_rgba8().pixels().map(|p| p[3]).collect())
        } else {
            None
        };
        log::debug!(
            "Loaded {} ({}x{}{})",
            path.display(),
            img.width(),
            img.height(),
            if alpha.is_some() { ", with alpha" } else { "" }
        );
        Texture::from_rgb_image(img.to_rgb8(), alpha)
    }
}

/// Destination for finished frames
pub trait OutputSink {
    /// Accept a finished frame; `quality` is a 0-100 hint for lossy formats
    fn write(&mut self, frame: &Framebuffer, quality: u8) -> Result<()>;
}

/// Writes frames to an image file, format chosen by extension
#[derive(Debug, Clone)]
pub struct ImageFileWriter {
    path: PathBuf,
}

impl ImageFileWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl OutputSink for ImageFileWriter {
    fn write(&mut self, frame: &Framebuffer, quality: u8) -> Result<()> {
        let (w, h) = (frame.width() as u32, frame.height() as u32);
        let size_err = || PlanetariumError::InvalidInput("framebuffer size mismatch".to_string());

        let image = match frame.alpha() {
            Some(alpha) => {
                let rgba: Vec<u8> = frame
                    .rgb()
                    .chunks_exact(3)
                    .zip(alpha)
                    .flat_map(|(c, &a)| [c[0], c[1], c[2], a])
                    .collect();
                DynamicImage::ImageRgba8(RgbaImage::from_raw(w, h, rgba).ok_or_else(size_err)?)
            }
            None => DynamicImage::ImageRgb8(
                RgbImage::from_raw(w, h, frame.rgb().to_vec()).ok_or_else(size_err)?,
            ),
        };

        let format = ImageFormat::from_path(&self.path).map_err(|e| texture_err(&self.path, e))?;
        if format == ImageFormat::Jpeg {
            let file = BufWriter::new(File::create(&self.path)?);
            let mut encoder = JpegEncoder::new_with_quality(file, quality.clamp(1, 100));
            encoder
                .encode_image(&image.to_rgb8())
                .map_err(|e| texture_err(&self.path, e))?;
        } else {
            image
                .save_with_format(&self.path, format)
                .map_err(|e| texture_err(&self.path, e))?;
        }
        log::info!("Wrote {}x{} frame to {}", w, h, self.path.display());
        Ok(())
    }
}
