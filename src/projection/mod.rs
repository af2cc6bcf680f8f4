//! Cartographic projections
//!
//! A [`Projection`] maps output pixels to body-surface latitude/longitude
//! and back. The family is closed, so variants are dispatched through a
//! private enum rather than boxed trait objects.
//!
//! ## Conventions
//!
//! - Pixel coordinates are continuous with integer values at pixel centres;
//!   `x` grows to the right and `y` downward.
//! - Longitudes passed to and returned from [`Projection`] are
//!   planetocentric east longitudes. Internally each variant works in the
//!   body's display convention (east longitude times `flipped`), so
//!   west-positive bodies appear mirrored the customary way.
//! - The optional centre/rotation turns the globe before the core mapping:
//!   the centre point lands at local (0, 0).

use std::fmt;
use std::str::FromStr;

use nalgebra::Matrix3;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::coordinates::{
    rotation_x, rotation_y, rotation_z, to_lat_lon, unit_vector, wrap_longitude,
};
use crate::render::photo::PhotoTable;
use crate::{PlanetariumError, Result};

/// Slack allowed on domain edges so points on a rim or seam survive the
/// round trip through floating point
pub(crate) const EDGE_TOLERANCE: f64 = 1e-9;

mod ancient;
mod azimuthal;
mod gnomonic;
mod hemisphere;
mod lambert;
mod mercator;
mod mollweide;
mod orthographic;
mod peters;
mod rectangular;

pub use rectangular::MapBounds;

/// The available projections
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ProjectionKind {
    Ancient,
    Azimuthal,
    Gnomonic,
    Hemisphere,
    Lambert,
    Mercator,
    Mollweide,
    Orthographic,
    Peters,
    Rectangular,
}

impl ProjectionKind {
    pub const ALL: [ProjectionKind; 10] = [
        ProjectionKind::Ancient,
        ProjectionKind::Azimuthal,
        ProjectionKind::Gnomonic,
        ProjectionKind::Hemisphere,
        ProjectionKind::Lambert,
        ProjectionKind::Mercator,
        ProjectionKind::Mollweide,
        ProjectionKind::Orthographic,
        ProjectionKind::Peters,
        ProjectionKind::Rectangular,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ProjectionKind::Ancient => "ancient",
            ProjectionKind::Azimuthal => "azimuthal",
            ProjectionKind::Gnomonic => "gnomonic",
            ProjectionKind::Hemisphere => "hemisphere",
            ProjectionKind::Lambert => "lambert",
            ProjectionKind::Mercator => "mercator",
            ProjectionKind::Mollweide => "mollweide",
            ProjectionKind::Orthographic => "orthographic",
            ProjectionKind::Peters => "peters",
            ProjectionKind::Rectangular => "rectangular",
        }
    }

    /// Shortest prefix accepted when parsing
    fn min_prefix(&self) -> usize {
        match self {
            ProjectionKind::Ancient
            | ProjectionKind::Azimuthal
            | ProjectionKind::Mercator
            | ProjectionKind::Mollweide => 2,
            _ => 1,
        }
    }

    /// Parse a projection name, falling back to rectangular with a warning
    pub fn parse_or_default(name: &str) -> Self {
        name.parse().unwrap_or_else(|_| {
            log::warn!("Unknown projection {:?}, using rectangular", name);
            ProjectionKind::Rectangular
        })
    }

    /// Pick a projection at random
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        *Self::ALL
            .choose(rng)
            .unwrap_or(&ProjectionKind::Rectangular)
    }

    /// Whether the map is periodic in x, so annotations are repeated one
    /// width to either side
    pub fn is_wrap_around(&self) -> bool {
        matches!(
            self,
            ProjectionKind::Rectangular | ProjectionKind::Mercator | ProjectionKind::Lambert
        )
    }

    /// Whether pixels carry a limb-darkening factor
    pub fn has_limb_darkening(&self) -> bool {
        matches!(
            self,
            ProjectionKind::Orthographic | ProjectionKind::Hemisphere
        )
    }
}

impl fmt::Display for ProjectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ProjectionKind {
    type Err = PlanetariumError;

    /// Case-insensitive unique-prefix match ("merc", "or", "r" ...)
    fn from_str(s: &str) -> Result<Self> {
        let lower = s.trim().to_ascii_lowercase();
        ProjectionKind::ALL
            .iter()
            .copied()
            .find(|kind| lower.len() >= kind.min_prefix() && kind.name().starts_with(&lower))
            .ok_or_else(|| PlanetariumError::InvalidInput(format!("unknown projection {:?}", s)))
    }
}

/// A surface point under a pixel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spherical {
    /// Latitude, radians
    pub lat: f64,
    /// East longitude, radians in [-PI, PI)
    pub lon: f64,
    /// Limb-darkening multiplier; 1 for flat maps
    pub darkening: f64,
}

/// Output size, longitude convention, rotation and photometry shared by
/// every variant
#[derive(Debug, Clone)]
pub struct ProjectionFrame {
    width: f64,
    height: f64,
    flipped: f64,
    /// (geographic -> local, local -> geographic)
    rotation: Option<(Matrix3<f64>, Matrix3<f64>)>,
    photo: PhotoTable,
}

impl ProjectionFrame {
    fn new(flipped: f64, width: usize, height: usize, limb_darkening: f64) -> Self {
        Self {
            width: width as f64,
            height: height as f64,
            flipped: if flipped < 0.0 { -1.0 } else { 1.0 },
            rotation: None,
            photo: PhotoTable::new(limb_darkening),
        }
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn center_x(&self) -> f64 {
        self.width / 2.0
    }

    pub fn center_y(&self) -> f64 {
        self.height / 2.0
    }

    /// Turn the globe so (`lat`, `lon`) in display longitude lands at the
    /// local origin, then roll it by `rotate` about that point
    fn set_center(&mut self, lat: f64, lon: f64, rotate: f64) {
        if lat == 0.0 && lon == 0.0 && rotate == 0.0 {
            self.rotation = None;
            return;
        }
        let to_local = rotation_x(rotate) * rotation_y(lat) * rotation_z(-lon);
        self.rotation = Some((to_local, to_local.transpose()));
    }

    fn to_local(&self, lat: f64, lon: f64) -> (f64, f64) {
        match &self.rotation {
            Some((to_local, _)) => to_lat_lon(&(to_local * unit_vector(lat, lon))),
            None => (lat, lon),
        }
    }

    fn to_geographic(&self, lat: f64, lon: f64) -> (f64, f64) {
        match &self.rotation {
            Some((_, to_geo)) => to_lat_lon(&(to_geo * unit_vector(lat, lon))),
            None => (lat, lon),
        }
    }

    fn darkening(&self, mu: f64) -> f64 {
        self.photo.lookup(mu)
    }
}

/// Result of a variant's inverse mapping in local coordinates
#[derive(Debug, Clone, Copy)]
pub(crate) struct Local {
    pub lat: f64,
    pub lon: f64,
    /// Cosine between surface normal and view direction
    pub mu: f64,
}

impl Local {
    pub fn flat(lat: f64, lon: f64) -> Self {
        Self { lat, lon, mu: 1.0 }
    }
}

/// Core mapping of one projection, in local display coordinates
pub(crate) trait Cartographic {
    fn inverse(&self, frame: &ProjectionFrame, x: f64, y: f64) -> Option<Local>;

    fn forward(&self, frame: &ProjectionFrame, lat: f64, lon: f64) -> Option<(f64, f64)>;
}

#[derive(Debug, Clone)]
enum Variant {
    Ancient(ancient::Ancient),
    Azimuthal(azimuthal::Azimuthal),
    Gnomonic(gnomonic::Gnomonic),
    Hemisphere(hemisphere::Hemisphere),
    Lambert(lambert::Lambert),
    Mercator(mercator::Mercator),
    Mollweide(mollweide::Mollweide),
    Orthographic(orthographic::Orthographic),
    Peters(peters::Peters),
    Rectangular(rectangular::Rectangular),
}

impl Variant {
    fn new(kind: ProjectionKind, frame: &ProjectionFrame) -> Self {
        match kind {
            ProjectionKind::Ancient => Variant::Ancient(ancient::Ancient::new(frame)),
            ProjectionKind::Azimuthal => Variant::Azimuthal(azimuthal::Azimuthal::new(frame)),
            ProjectionKind::Gnomonic => Variant::Gnomonic(gnomonic::Gnomonic::new(frame)),
            ProjectionKind::Hemisphere => Variant::Hemisphere(hemisphere::Hemisphere::new(frame)),
            ProjectionKind::Lambert => Variant::Lambert(lambert::Lambert),
            ProjectionKind::Mercator => Variant::Mercator(mercator::Mercator),
            ProjectionKind::Mollweide => Variant::Mollweide(mollweide::Mollweide::new(frame)),
            ProjectionKind::Orthographic => {
                Variant::Orthographic(orthographic::Orthographic::new(frame))
            }
            ProjectionKind::Peters => Variant::Peters(peters::Peters::new(frame)),
            ProjectionKind::Rectangular => {
                Variant::Rectangular(rectangular::Rectangular::new(frame, None))
            }
        }
    }

    fn as_map(&self) -> &dyn Cartographic {
        match self {
            Variant::Ancient(p) => p,
            Variant::Azimuthal(p) => p,
            Variant::Gnomonic(p) => p,
            Variant::Hemisphere(p) => p,
            Variant::Lambert(p) => p,
            Variant::Mercator(p) => p,
            Variant::Mollweide(p) => p,
            Variant::Orthographic(p) => p,
            Variant::Peters(p) => p,
            Variant::Rectangular(p) => p,
        }
    }
}

/// A cartographic projection sized to an output frame
#[derive(Debug, Clone)]
pub struct Projection {
    kind: ProjectionKind,
    frame: ProjectionFrame,
    variant: Variant,
    bounded: bool,
}

impl Projection {
    /// Create a projection for a `width` x `height` frame
    ///
    /// `flipped` is the body's longitude convention (1 east-positive, -1
    /// west-positive); `limb_darkening` is the photometric exponent used by
    /// the orthographic and hemisphere variants.
    pub fn new(
        kind: ProjectionKind,
        flipped: f64,
        width: usize,
        height: usize,
        limb_darkening: f64,
    ) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(PlanetariumError::InvalidInput(format!(
                "projection size must be positive, got {}x{}",
                width, height
            )));
        }
        let frame = ProjectionFrame::new(flipped, width, height, limb_darkening);
        let variant = Variant::new(kind, &frame);
        Ok(Self {
            kind,
            frame,
            variant,
            bounded: false,
        })
    }

    /// Rectangular projection covering only `bounds`
    pub fn rectangular_with_bounds(
        flipped: f64,
        width: usize,
        height: usize,
        bounds: MapBounds,
    ) -> Result<Self> {
        bounds.validate()?;
        let mut projection = Self::new(ProjectionKind::Rectangular, flipped, width, height, 0.0)?;
        projection.variant =
            Variant::Rectangular(rectangular::Rectangular::new(&projection.frame, Some(bounds)));
        projection.bounded = true;
        Ok(projection)
    }

    /// Centre the map on an east-longitude point and roll it by `rotate`
    /// radians
    pub fn with_center(mut self, lat: f64, lon: f64, rotate: f64) -> Self {
        self.frame.set_center(lat, lon * self.frame.flipped, rotate);
        self
    }

    pub fn kind(&self) -> ProjectionKind {
        self.kind
    }

    pub fn width(&self) -> usize {
        self.frame.width as usize
    }

    pub fn height(&self) -> usize {
        self.frame.height as usize
    }

    pub fn is_wrap_around(&self) -> bool {
        self.kind.is_wrap_around() && !self.bounded
    }

    /// Surface point under pixel (`x`, `y`), or `None` outside the mapped area
    pub fn pixel_to_spherical(&self, x: f64, y: f64) -> Option<Spherical> {
        let local = self.variant.as_map().inverse(&self.frame, x, y)?;
        let (lat, lon) = self.frame.to_geographic(local.lat, local.lon);
        Some(Spherical {
            lat,
            lon: wrap_longitude(lon * self.frame.flipped),
            darkening: self.frame.darkening(local.mu),
        })
    }

    /// Pixel position of an east-longitude surface point, or `None` if the
    /// projection cannot show it
    pub fn spherical_to_pixel(&self, lat: f64, lon: f64) -> Option<(f64, f64)> {
        let (lat, lon) = self.frame.to_local(lat, lon * self.frame.flipped);
        self.variant
            .as_map()
            .forward(&self.frame, lat, wrap_longitude(lon))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[rstest]
    #[case("merc", ProjectionKind::Mercator)]
    #[case("MOLLWEIDE", ProjectionKind::Mollweide)]
    #[case("o", ProjectionKind::Orthographic)]
    #[case("an", ProjectionKind::Ancient)]
    #[case("az", ProjectionKind::Azimuthal)]
    #[case("rect", ProjectionKind::Rectangular)]
    #[case("g", ProjectionKind::Gnomonic)]
    fn test_prefix_parsing(#[case] name: &str, #[case] expected: ProjectionKind) {
        assert_eq!(name.parse::<ProjectionKind>().unwrap(), expected);
    }

    #[test]
    fn test_ambiguous_or_unknown_names() {
        assert!("m".parse::<ProjectionKind>().is_err());
        assert!("a".parse::<ProjectionKind>().is_err());
        assert!("sinusoidal".parse::<ProjectionKind>().is_err());
        assert_eq!(
            ProjectionKind::parse_or_default("sinusoidal"),
            ProjectionKind::Rectangular
        );
    }

    #[test]
    fn test_random_projection_is_a_known_kind() {
        let mut rng = rand::thread_rng();
        for _ in 0..20 {
            let kind = ProjectionKind::random(&mut rng);
            assert!(ProjectionKind::ALL.contains(&kind));
        }
    }

    #[test]
    fn test_flipped_body_mirrors_longitude() {
        let east = Projection::new(ProjectionKind::Rectangular, 1.0, 360, 180, 0.0).unwrap();
        let west = Projection::new(ProjectionKind::Rectangular, -1.0, 360, 180, 0.0).unwrap();
        let (xe, _) = east.spherical_to_pixel(0.0, 1.0).unwrap();
        let (xw, _) = west.spherical_to_pixel(0.0, 1.0).unwrap();
        assert_relative_eq!(xe - 179.5, -(xw - 179.5), epsilon = 1e-9);
    }

    #[test]
    fn test_center_lands_in_middle() {
        let p = Projection::new(ProjectionKind::Orthographic, 1.0, 200, 200, 0.3)
            .unwrap()
            .with_center(0.4, -1.2, 0.0);
        let (x, y) = p.spherical_to_pixel(0.4, -1.2).unwrap();
        assert_relative_eq!(x, 100.0, epsilon = 1e-9);
        assert_relative_eq!(y, 100.0, epsilon = 1e-9);
        let s = p.pixel_to_spherical(100.0, 100.0).unwrap();
        assert_relative_eq!(s.lat, 0.4, epsilon = 1e-9);
        assert_relative_eq!(s.lon, -1.2, epsilon = 1e-9);
    }

    #[test]
    fn test_orthographic_darkens_toward_limb() {
        let p = Projection::new(ProjectionKind::Orthographic, 1.0, 200, 200, 0.5).unwrap();
        let centre = p.pixel_to_spherical(100.0, 100.0).unwrap();
        let limb = p.pixel_to_spherical(199.0, 100.0).unwrap();
        assert_relative_eq!(centre.darkening, 1.0, epsilon = 1e-9);
        assert!(limb.darkening < 0.5);
        let flat = Projection::new(ProjectionKind::Mercator, 1.0, 200, 200, 0.5).unwrap();
        assert_eq!(flat.pixel_to_spherical(3.0, 50.0).unwrap().darkening, 1.0);
    }

    #[test]
    fn test_zero_size_is_rejected() {
        assert!(Projection::new(ProjectionKind::Lambert, 1.0, 0, 10, 0.0).is_err());
    }
}
