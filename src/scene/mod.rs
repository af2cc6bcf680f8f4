//! Frame composition
//!
//! This is where the pieces meet. A [`Scene`] bundles the caller's data
//! sources (ephemeris, texture loader, per-body properties, an optional
//! glyph renderer); [`render_frame`] and [`render_projection`] turn it into a
//! [`Framebuffer`](crate::render::Framebuffer) for one [`RenderContext`].

use crate::body::{Ephemeris, Planet};
use crate::coordinates::ndot;
use crate::projection::Projection;
use crate::render::Viewport;
use crate::texture::TextureLoader;
use crate::view::PixelPosition;

pub mod annotation;
pub mod cartographic;
pub mod context;
pub mod frame;
pub mod grid;
pub mod orbit;
pub mod overlay;
pub mod properties;

pub use annotation::{Annotation, AnnotationMap, GlyphBitmap, GlyphRenderer};
pub use cartographic::render_projection;
pub use context::{FovMode, NorthMode, RenderContext};
pub use frame::{render_frame, FrameRequest, Observer};
pub use properties::{
    Align, ArcSpec, BodyProperties, MarkerPosition, MarkerSpec, OrbitSampling, PropertyTable,
};

/// Data sources for rendering
pub struct Scene<'a> {
    pub ephemeris: &'a dyn Ephemeris,
    pub textures: &'a dyn TextureLoader,
    pub properties: PropertyTable,
    /// Label renderer; labels are skipped without one
    pub glyphs: Option<&'a dyn GlyphRenderer>,
}

impl<'a> Scene<'a> {
    /// A scene with default properties for every body and no labels
    pub fn new(ephemeris: &'a dyn Ephemeris, textures: &'a dyn TextureLoader) -> Self {
        Self {
            ephemeris,
            textures,
            properties: PropertyTable::new(),
            glyphs: None,
        }
    }

    pub fn with_properties(mut self, properties: PropertyTable) -> Self {
        self.properties = properties;
        self
    }

    pub fn with_glyphs(mut self, glyphs: &'a dyn GlyphRenderer) -> Self {
        self.glyphs = Some(glyphs);
        self
    }
}

/// How surface points reach the frame: through a perspective camera or a
/// map projection
#[derive(Debug, Clone, Copy)]
pub enum Placement<'a> {
    Perspective(Viewport<'a>),
    Map(&'a Projection),
}

impl Placement<'_> {
    /// Frame position of a point `radius` body radii from the centre of
    /// `planet` at planetographic `lat`, east `lon` (radians)
    ///
    /// Returns `None` when the point cannot be seen: behind the limb or the
    /// observer in perspective, outside the mapped area for projections.
    /// Projected points have depth zero.
    pub fn surface_to_pixel(
        &self,
        planet: &Planet,
        lat: f64,
        lon: f64,
        radius: f64,
    ) -> Option<PixelPosition> {
        match self {
            Placement::Perspective(viewport) => {
                let p = planet.planetographic_to_xyz(lat, lon, radius);
                let observer = viewport.view.observer();
                if ndot(&(planet.position() - p), &(observer - p)) > 0.0 {
                    return None;
                }
                let pos = viewport.project(&p);
                pos.is_in_front().then_some(pos)
            }
            Placement::Map(projection) => projection
                .spherical_to_pixel(lat, lon)
                .map(|(x, y)| PixelPosition { x, y, depth: 0.0 }),
        }
    }

    /// Frame width for wrap-around projections
    pub(crate) fn wrap_width(&self) -> Option<f64> {
        match self {
            Placement::Map(projection) if projection.is_wrap_around() => {
                Some(projection.width() as f64)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::{Body, BodyOrientation};
    use crate::constants::J2000;
    use crate::projection::ProjectionKind;
    use crate::view::View;
    use nalgebra::Vector3;

    fn mars() -> Planet {
        let mut o = BodyOrientation::for_body(Body::Mars);
        o.pole_ra = 0.0;
        o.pole_dec = 90.0;
        o.pole_ra_rate = 0.0;
        o.pole_dec_rate = 0.0;
        o.flattening = 0.0;
        Planet::new(Body::Mars, Vector3::new(1.5, 0.0, 0.0), o, J2000)
    }

    #[test]
    fn test_far_side_is_hidden_in_perspective() {
        let planet = mars();
        let observer = Vector3::new(1.0, 0.0, 0.0);
        let view = View::new(observer, planet.position(), Vector3::z(), 1e-6, 0.0).unwrap();
        let placement = Placement::Perspective(Viewport::new(&view, 50.0, 50.0));

        // Observer is sunward of Mars, so the sub-observer point faces the Sun
        let (lat, lon) = planet.xyz_to_planetographic(&observer);
        let near = placement.surface_to_pixel(&planet, lat, lon, 1.0).unwrap();
        assert!((near.x - 50.0).abs() < 1e-6);
        assert!((near.y - 50.0).abs() < 1e-6);
        assert!(near.depth < 0.5);

        let far_lon = crate::coordinates::wrap_longitude(lon + std::f64::consts::PI);
        assert!(placement.surface_to_pixel(&planet, -lat, far_lon, 1.0).is_none());
    }

    #[test]
    fn test_projected_points_have_zero_depth() {
        let projection = Projection::new(ProjectionKind::Rectangular, 1.0, 360, 180, 0.0).unwrap();
        let placement = Placement::Map(&projection);
        let pos = placement.surface_to_pixel(&mars(), 0.1, 0.2, 1.0).unwrap();
        assert_eq!(pos.depth, 0.0);
        assert_eq!(placement.wrap_width(), Some(360.0));
    }
}
