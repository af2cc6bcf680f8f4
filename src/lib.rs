//! Planetarium: photorealistic rendering of solar system bodies
//!
//! This crate turns body positions, orientations and image-map textures into
//! correctly lit, correctly projected pixels. Two rendering modes are
//! provided:
//!
//! - [`scene::render_frame`]: a perspective view from an observer in space,
//!   with every visible body ray-traced onto the frame in depth order
//! - [`scene::render_projection`]: a single body's surface drawn under one of
//!   the cartographic projections in [`projection`]
//!
//! Body positions come from an [`body::Ephemeris`] implementation, textures
//! from a [`texture::TextureLoader`]; both are supplied by the caller.

use std::path::PathBuf;
use thiserror::Error;

pub mod body;
pub mod constants;
pub mod coordinates;
pub mod map;
pub mod projection;
pub mod render;
pub mod ring;
pub mod scene;
pub mod texture;
pub mod view;

// Re-export commonly used types
pub use body::{Body, BodyOrientation, Ephemeris, Planet, TableEphemeris};
pub use map::Map;
pub use projection::{Projection, ProjectionKind};
pub use render::Framebuffer;
pub use ring::Ring;
pub use scene::{
    render_frame, render_projection, BodyProperties, FrameRequest, RenderContext, Scene,
};
pub use texture::{Texture, TextureLoader};
pub use view::View;

/// Main error type for the planetarium library
#[derive(Debug, Error)]
pub enum PlanetariumError {
    #[error("Degenerate view: {0}")]
    DegenerateView(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Texture error on {path:?}: {source}")]
    Texture {
        /// The texture file that failed
        path: PathBuf,
        /// The underlying decoder error
        source: image::ImageError,
    },

    #[error("Ephemeris error: {0}")]
    Ephemeris(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Body not found: {0}")]
    BodyNotFound(String),
}

impl From<serde_json::Error> for PlanetariumError {
    fn from(err: serde_json::Error) -> Self {
        PlanetariumError::Config(err.to_string())
    }
}

/// Result type for planetarium operations
pub type Result<T> = std::result::Result<T, PlanetariumError>;

/// Helper to attach a path to an image decoding/encoding error
pub fn texture_err(path: impl Into<PathBuf>, err: image::ImageError) -> PlanetariumError {
    PlanetariumError::Texture {
        path: path.into(),
        source: err,
    }
}
