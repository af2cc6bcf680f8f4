//! Single-body map projections
//!
//! The target's lit surface map is resampled onto the frame through a
//! [`Projection`]. The projection is centred on the context's latitude and
//! longitude and turned so the chosen north points up.

use nalgebra::Vector3;

use super::frame::up_vector;
use super::grid::draw_grid;
use super::overlay::{add_arcs, add_markers};
use super::{AnnotationMap, MarkerPosition, NorthMode, Placement, RenderContext, Scene};
use crate::body::{Body, Planet};
use crate::constants::{DEG2RAD, FAR_DISTANCE};
use crate::coordinates::great_arc;
use crate::map::{select_casters, Lighting, Map};
use crate::projection::{Projection, ProjectionKind};
use crate::render::Framebuffer;
use crate::ring::Ring;
use crate::Result;

/// Render `target` under the context's projection
///
/// # Errors
///
/// Fails if the ephemeris cannot place the target, if the frame size is
/// zero, or if the map bounds are invalid.
pub fn render_projection(scene: &Scene, ctx: &RenderContext, target: Body) -> Result<Framebuffer> {
    let jd = ctx.julian_day;
    let planet = scene.ephemeris.planet(target, jd)?;
    let props = scene.properties.get(target);
    let flipped = planet.flipped();

    let kind = if ctx.random_projection {
        ProjectionKind::random(&mut rand::thread_rng())
    } else {
        ctx.projection
    };

    let lat0 = ctx.latitude * DEG2RAD;
    let lon0 = ctx.longitude * DEG2RAD;
    let projection = match (&ctx.map_bounds, kind) {
        (Some(bounds), ProjectionKind::Rectangular) => {
            Projection::rectangular_with_bounds(flipped, ctx.width, ctx.height, *bounds)?
        }
        (bounds, _) => {
            if bounds.is_some() {
                log::warn!("Map bounds only apply to the rectangular projection; ignoring them");
            }
            let rotate = -north_course(scene, ctx, &planet, lat0, lon0)?;
            Projection::new(kind, flipped, ctx.width, ctx.height, ctx.limb_darkening)?
                .with_center(lat0, lon0, rotate)
        }
    };
    log::info!(
        "Rendering {} in {} projection centred on ({:.2}, {:.2})",
        target,
        kind.name(),
        ctx.latitude,
        ctx.longitude
    );

    let mut frame = if ctx.transparent {
        Framebuffer::transparent(ctx.width, ctx.height)?
    } else {
        Framebuffer::filled(ctx.width, ctx.height, ctx.background)?
    };

    let map = if target == Body::Sun {
        None
    } else {
        let ring = if planet.body().has_rings() {
            let (sun_lat, sun_lon, _) = planet.xyz_to_planetocentric(&Vector3::zeros());
            let mut ring = Ring::saturn(sun_lon, sun_lat, props.shade)?;
            ring.build_shadow_radius_table(&planet);
            Some(ring)
        } else {
            None
        };
        let neighbours = neighbours(scene, &planet, jd);
        let mut lighting =
            Lighting::new(&planet).with_casters(select_casters(&planet, &neighbours));
        lighting.observer = Some((planet.graphic_to_centric(lat0), lon0));
        if let Some(ring) = &ring {
            lighting = lighting.with_ring(ring);
        }
        Some(Map::create(
            scene.textures,
            &props,
            &lighting,
            ctx.radius * ctx.height as f64,
            ctx.width,
        )?)
    };

    let darken = kind.has_limb_darkening();
    frame.par_rows(0..ctx.height, |row| {
        let y = row.y as f64;
        for x in 0..row.width() {
            let Some(point) = projection.pixel_to_spherical(x as f64, y) else {
                continue;
            };
            let mut color = match &map {
                Some(map) => map.get_pixel(point.lat, point.lon),
                None => props.color,
            };
            if darken {
                for c in color.iter_mut() {
                    *c = (f64::from(*c) * point.darkening).round().clamp(0.0, 255.0) as u8;
                }
            }
            row.blend(x, color, 1.0);
        }
    });

    let placement = Placement::Map(&projection);
    if props.grid {
        draw_grid(&mut frame, &placement, &planet, &props, None);
    }

    let mut annotations = AnnotationMap::new();
    add_arcs(&mut annotations, &placement, &planet, &props);
    let others = marker_bodies(scene, &props.markers, jd);
    add_markers(
        &mut annotations,
        &placement,
        &planet,
        &props,
        &others,
        (ctx.width, ctx.height),
    );
    annotations.draw_all(&mut frame, scene.glyphs, placement.wrap_width());

    Ok(frame)
}

/// Course from the map centre to the chosen north pole, radians, measured in
/// the body's display longitudes
fn north_course(
    scene: &Scene,
    ctx: &RenderContext,
    planet: &Planet,
    lat0: f64,
    lon0: f64,
) -> Result<f64> {
    if ctx.north == NorthMode::Body {
        return Ok(0.0);
    }
    let up = up_vector(scene, ctx.north, planet, ctx.julian_day)?;
    let (n_lat, n_lon, _) = planet.xyz_to_planetocentric(&(planet.position() + up * FAR_DISTANCE));
    let flipped = planet.flipped();
    let (course, _) = great_arc(lat0, lon0 * flipped, n_lat, n_lon * flipped);
    Ok(course)
}

/// Bodies in the same system as `planet`, for eclipse shadows; bodies the
/// ephemeris cannot place are left out
fn neighbours(scene: &Scene, planet: &Planet, jd: f64) -> Vec<Planet> {
    let system = if planet.primary() == Body::Sun {
        planet.body()
    } else {
        planet.primary()
    };
    Body::ALL
        .iter()
        .copied()
        .filter(|&b| b != planet.body() && b != Body::Sun)
        .filter(|&b| b == system || b.primary() == system)
        .filter_map(|b| match scene.ephemeris.planet(b, jd) {
            Ok(p) => Some(p),
            Err(e) => {
                log::debug!("No shadow from {}: {}", b, e);
                None
            }
        })
        .collect()
}

fn marker_bodies(scene: &Scene, markers: &[super::MarkerSpec], jd: f64) -> Vec<Planet> {
    markers
        .iter()
        .filter_map(|m| match m.position {
            MarkerPosition::Body(b) => scene.ephemeris.planet(b, jd).ok(),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::{BodyOrientation, TableEphemeris};
    use crate::constants::J2000;
    use crate::texture::{Texture, TextureLoader};
    use crate::PlanetariumError;
    use std::path::Path;

    /// Left half red, right half blue
    struct HalfAndHalf;

    impl TextureLoader for HalfAndHalf {
        fn load(&self, path: &Path) -> Result<Texture> {
            if path != Path::new("mars.jpg") {
                return Err(PlanetariumError::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    path.display().to_string(),
                )));
            }
            let mut t = Texture::filled(64, 32, [255, 0, 0])?;
            for y in 0..32 {
                for x in 32..64 {
                    t.set_pixel(x, y, [0, 0, 255]);
                }
            }
            Ok(t)
        }
    }

    fn scene_data() -> TableEphemeris {
        let mut o = BodyOrientation::for_body(Body::Mars);
        o.pole_ra = 0.0;
        o.pole_dec = 90.0;
        o.pole_ra_rate = 0.0;
        o.pole_dec_rate = 0.0;
        o.flipped = 1;
        let mut eph = TableEphemeris::new(J2000);
        eph.insert(Body::Mars, Vector3::new(1.5, 0.0, 0.0));
        eph.set_orientation(Body::Mars, o).unwrap();
        eph
    }

    #[test]
    fn test_rectangular_map_keeps_hemispheres() {
        let eph = scene_data();
        let mut props = crate::scene::PropertyTable::new();
        let mut mars = crate::scene::BodyProperties::for_body(Body::Mars);
        // No night side: the map comes through unchanged
        mars.shade = 1.0;
        props.set(Body::Mars, mars);
        let scene = Scene::new(&eph, &HalfAndHalf).with_properties(props);
        let ctx = RenderContext {
            projection: ProjectionKind::Rectangular,
            ..RenderContext::with_size(64, 32)
        };
        let frame = render_projection(&scene, &ctx, Body::Mars).unwrap();
        // West longitudes on the left, east on the right
        assert_eq!(frame.get_pixel(8, 16), [255, 0, 0]);
        assert_eq!(frame.get_pixel(56, 16), [0, 0, 255]);
    }

    #[test]
    fn test_orthographic_leaves_corners_empty() {
        let eph = scene_data();
        let scene = Scene::new(&eph, &HalfAndHalf);
        let ctx = RenderContext {
            projection: ProjectionKind::Orthographic,
            background: [1, 2, 3],
            ..RenderContext::with_size(64, 64)
        };
        let frame = render_projection(&scene, &ctx, Body::Mars).unwrap();
        assert_eq!(frame.get_pixel(0, 0), [1, 2, 3]);
        assert_ne!(frame.get_pixel(32, 32), [1, 2, 3]);
    }

    #[test]
    fn test_sun_is_flat_colour() {
        let eph = TableEphemeris::new(J2000);
        let scene = Scene::new(&eph, &HalfAndHalf);
        let frame =
            render_projection(&scene, &RenderContext::with_size(20, 10), Body::Sun).unwrap();
        assert_eq!(frame.get_pixel(10, 5), [255, 255, 166]);
    }
}
