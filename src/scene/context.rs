//! Per-frame render settings
//!
//! A [`RenderContext`] is built once per frame and passed by reference to
//! everything that needs a frame-wide setting. All fields have defaults so a
//! scene file only has to name what it changes.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_LIMB_DARKENING, J2000, SUN_GLOW_RADII};
use crate::projection::{MapBounds, ProjectionKind};

/// How the perspective view's scale is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FovMode {
    /// The target's disc radius is `radius` times the frame height
    #[default]
    Radius,
    /// The frame is `field_of_view` degrees wide
    FieldOfView,
}

/// Which direction is drawn as "up"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NorthMode {
    /// The target's rotation axis
    #[default]
    Body,
    /// The normal of the target's orbit, or of its primary's orbit for a moon
    Orbit,
    /// The north galactic pole
    Galactic,
}

/// Settings shared by everything drawn in one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderContext {
    pub width: usize,
    pub height: usize,
    /// Frame position of the view centre; the frame centre when unset
    pub center: Option<[f64; 2]>,
    pub julian_day: f64,

    pub fov_mode: FovMode,
    /// Target radius as a fraction of the frame height
    pub radius: f64,
    /// Frame width, degrees
    pub field_of_view: f64,
    /// Image rotation about the line of sight, degrees
    pub rotate: f64,
    pub north: NorthMode,
    /// Query each body where it was when the light now arriving left it
    pub light_time: bool,

    pub projection: ProjectionKind,
    /// Pick a projection at random instead of `projection`
    pub random_projection: bool,
    /// Crop a rectangular projection to this region (radians)
    pub map_bounds: Option<MapBounds>,
    /// Map centre for projections: planetographic latitude and east
    /// longitude, degrees
    pub latitude: f64,
    pub longitude: f64,

    /// Limb-darkening exponent
    pub limb_darkening: f64,
    /// Extent of the Sun's glow, solar radii
    pub glare: f64,
    pub background: [u8; 3],
    /// Start from a transparent frame instead of `background`
    pub transparent: bool,
}

impl Default for RenderContext {
    fn default() -> Self {
        Self {
            width: 512,
            height: 512,
            center: None,
            julian_day: J2000,
            fov_mode: FovMode::Radius,
            radius: 0.45,
            field_of_view: 1.0,
            rotate: 0.0,
            north: NorthMode::Body,
            light_time: false,
            projection: ProjectionKind::Rectangular,
            random_projection: false,
            map_bounds: None,
            latitude: 0.0,
            longitude: 0.0,
            limb_darkening: DEFAULT_LIMB_DARKENING,
            glare: SUN_GLOW_RADII,
            background: [0, 0, 0],
            transparent: false,
        }
    }
}

impl RenderContext {
    pub fn with_size(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Frame position of the view centre
    pub fn center(&self) -> (f64, f64) {
        match self.center {
            Some([x, y]) => (x, y),
            None => (self.width as f64 / 2.0, self.height as f64 / 2.0),
        }
    }
}
