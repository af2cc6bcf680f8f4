//! Perspective rendering of many bodies
//!
//! The frame is composed back to front. Every body in the request is
//! placed with the [`View`]; bodies that fall on the frame are drawn
//! farthest first, and before each body any queued annotation lying
//! behind it is drawn so the body covers it. Whatever remains is drawn
//! last, on top.
//!
//! Per body, the order is: far half of the rings, the lit disc, the grid,
//! near half of the rings.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use super::grid::draw_grid;
use super::orbit::add_orbit;
use super::overlay::{add_arcs, add_label, add_markers};
use super::{AnnotationMap, FovMode, NorthMode, Placement, RenderContext, Scene};
use crate::body::{Body, Planet};
use crate::constants::{C_AUDAY, DEG2RAD, RAD2DEG, RING_EXTENT_FACTOR, SUN_GLOW_RADII};
use crate::map::{select_casters, Lighting, Map};
use crate::render::{
    draw_ellipsoid, draw_rings, draw_sphere, draw_sun, BodyDrawing, Framebuffer, RingHalf, Viewport,
};
use crate::ring::Ring;
use crate::view::View;
use crate::{PlanetariumError, Result};

/// Half-width of the interval used to estimate orbital velocity, days
const VELOCITY_STEP_DAYS: f64 = 0.5;

/// Where the frame is seen from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Observer {
    /// The centre of a body, as given by the ephemeris
    Body(Body),
    /// A fixed heliocentric equatorial point, AU
    Point([f64; 3]),
}

/// What to render in a perspective frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameRequest {
    pub observer: Observer,
    /// Body at the centre of the frame
    pub target: Body,
    /// Other bodies to consider; the target is always included
    #[serde(default)]
    pub bodies: Vec<Body>,
}

/// A body that lands on the frame
struct PlotDetail {
    index: usize,
    x: f64,
    y: f64,
    depth: f64,
    pixel_radius: f64,
}

/// Render a perspective view of the bodies in `request`
///
/// # Errors
///
/// Fails if the ephemeris cannot place the observer or the target, if the
/// view is degenerate (observer at the target), or if the frame size is
/// zero. Problems with single non-target bodies only skip that body.
pub fn render_frame(
    scene: &Scene,
    ctx: &RenderContext,
    request: &FrameRequest,
) -> Result<Framebuffer> {
    let jd = ctx.julian_day;
    let observer = match request.observer {
        Observer::Body(body) => scene.ephemeris.position(body, jd)?,
        Observer::Point(p) => Vector3::from(p),
    };

    let mut bodies = request.bodies.clone();
    if !bodies.contains(&request.target) {
        bodies.push(request.target);
    }
    bodies.sort();
    bodies.dedup();

    let mut planets = Vec::with_capacity(bodies.len());
    for body in bodies {
        match locate(scene, body, jd, &observer, ctx.light_time) {
            Ok(planet) => planets.push(planet),
            Err(e) if body == request.target => return Err(e),
            Err(e) => log::warn!("Skipping {}: {}", body, e),
        }
    }
    // Nearest the Sun first
    planets.sort_by(|a, b| a.position().norm().total_cmp(&b.position().norm()));

    let target = planets
        .iter()
        .find(|p| p.body() == request.target)
        .ok_or_else(|| PlanetariumError::BodyNotFound(request.target.to_string()))?;
    let target_props = scene.properties.get(target.body());
    let target_dist = (target.position() - observer).norm();
    if target_dist == 0.0 {
        return Err(PlanetariumError::DegenerateView(format!(
            "observer is at the centre of {}",
            target.body()
        )));
    }

    let up = up_vector(scene, ctx.north, target, jd)?;
    let dist_per_pixel = dist_per_pixel(ctx, target, target_dist, target_props.magnify)?;
    let view = View::new(observer, target.position(), up, dist_per_pixel, ctx.rotate * DEG2RAD)?;
    let (cx, cy) = ctx.center();
    let viewport = Viewport::new(&view, cx, cy);
    let placement = Placement::Perspective(viewport);

    log::info!(
        "Rendering {} from {:?} at JD {:.5}, field of view {:.4} deg",
        target.body(),
        request.observer,
        jd,
        2.0 * (ctx.width as f64 / 2.0 * dist_per_pixel / target_dist).atan() * RAD2DEG
    );

    let mut frame = if ctx.transparent {
        Framebuffer::transparent(ctx.width, ctx.height)?
    } else {
        Framebuffer::filled(ctx.width, ctx.height, ctx.background)?
    };
    let (width, height) = (ctx.width as f64, ctx.height as f64);

    let mut annotations = AnnotationMap::new();
    let mut plots = Vec::new();
    for (index, planet) in planets.iter().enumerate() {
        let props = scene.properties.get(planet.body());
        let position = planet.position();

        if props.draw_orbit {
            let is_target = planet.body() == request.target;
            if let Err(e) = add_orbit(
                &mut annotations,
                scene.ephemeris,
                &viewport,
                planet,
                &props,
                planet.julian_day(),
                (ctx.width, ctx.height),
                is_target,
            ) {
                log::warn!("Can't trace the orbit of {}: {}", planet.body(), e);
            }
        }

        let Some(pixel_radius) = viewport.pixel_radius(&position, planet.radius() * props.magnify)
        else {
            continue;
        };
        let screen = viewport.project(&position);

        if pixel_radius > props.min_radius_for_markers {
            add_arcs(&mut annotations, &placement, planet, &props);
            add_markers(
                &mut annotations,
                &placement,
                planet,
                &props,
                &planets,
                (ctx.width, ctx.height),
            );
        }

        // Glare and rings reach well past the disc
        let reach = match planet.body() {
            Body::Sun => pixel_radius.max(1.0) * SUN_GLOW_RADII.max(ctx.glare),
            _ if planet.body().has_rings() => pixel_radius * RING_EXTENT_FACTOR,
            _ => pixel_radius,
        };
        if !screen.is_in_front()
            || screen.x < -reach
            || screen.x > width + reach
            || screen.y < -reach
            || screen.y > height + reach
        {
            continue;
        }

        if pixel_radius >= props.min_radius_for_label
            && pixel_radius <= props.max_radius_for_label
        {
            add_label(
                &mut annotations,
                &props,
                planet,
                (screen.x, screen.y, screen.depth),
                pixel_radius,
            );
        }

        if log::log_enabled!(log::Level::Debug) {
            let (sun_lat, sun_lon) = planet.xyz_to_planetographic(&Vector3::zeros());
            let (obs_lat, obs_lon) = planet.xyz_to_planetographic(&observer);
            log::debug!(
                "{:>10} dist {:.6} at ({:.2}, {:.2}) r {:.3} sun ({:.2}, {:.2}) obs ({:.2}, {:.2})",
                planet.body(),
                screen.depth,
                screen.x,
                screen.y,
                pixel_radius,
                sun_lat * RAD2DEG,
                sun_lon * RAD2DEG,
                obs_lat * RAD2DEG,
                obs_lon * RAD2DEG
            );
        }

        plots.push(PlotDetail {
            index,
            x: screen.x,
            y: screen.y,
            depth: screen.depth,
            pixel_radius,
        });
    }

    // Farthest first
    plots.sort_by(|a, b| b.depth.total_cmp(&a.depth));
    for plot in &plots {
        annotations.draw_farther_than(plot.depth, &mut frame, scene.glyphs);
        let planet = &planets[plot.index];
        if let Err(e) = draw_body(&mut frame, scene, ctx, &viewport, &planets, planet, plot) {
            if planet.body() == request.target {
                return Err(e);
            }
            log::warn!("Can't draw {}: {}", planet.body(), e);
        }
    }
    annotations.draw_all(&mut frame, scene.glyphs, None);

    Ok(frame)
}

/// Place `body` at `jd`, or where it was when light now reaching the
/// observer left it
fn locate(
    scene: &Scene,
    body: Body,
    jd: f64,
    observer: &Vector3<f64>,
    light_time: bool,
) -> Result<Planet> {
    if !light_time {
        return scene.ephemeris.planet(body, jd);
    }
    let dist = (scene.ephemeris.position(body, jd)? - observer).norm();
    scene.ephemeris.planet(body, jd - dist / C_AUDAY)
}

/// Direction drawn as "up" for `target`
pub(crate) fn up_vector(
    scene: &Scene,
    north: NorthMode,
    target: &Planet,
    jd: f64,
) -> Result<Vector3<f64>> {
    Ok(match north {
        NorthMode::Body => target.body_north(),
        NorthMode::Galactic => target.galactic_north(),
        NorthMode::Orbit => {
            // A moon uses its primary's orbit
            let body = if target.primary() == Body::Sun {
                target.body()
            } else {
                target.primary()
            };
            let planet = scene.ephemeris.planet(body, target.julian_day())?;
            let before = scene.ephemeris.position(body, jd - VELOCITY_STEP_DAYS)?;
            let after = scene.ephemeris.position(body, jd + VELOCITY_STEP_DAYS)?;
            planet.orbital_north(&((after - before) / (2.0 * VELOCITY_STEP_DAYS)))
        }
    })
}

/// AU per pixel at the target's distance
fn dist_per_pixel(
    ctx: &RenderContext,
    target: &Planet,
    target_dist: f64,
    magnify: f64,
) -> Result<f64> {
    let pixels_per_radian = match ctx.fov_mode {
        FovMode::Radius => {
            let mut target_pixel_radius = ctx.radius * ctx.height as f64 / magnify;
            if target.body().has_rings() {
                target_pixel_radius /= RING_EXTENT_FACTOR;
            }
            let angular_radius = target.radius() / target_dist;
            target_pixel_radius / angular_radius
        }
        FovMode::FieldOfView => ctx.width as f64 / (ctx.field_of_view * DEG2RAD),
    };
    let dpp = target_dist / pixels_per_radian;
    if !(dpp > 0.0 && dpp.is_finite()) {
        return Err(PlanetariumError::InvalidInput(format!(
            "field of view gives {} AU per pixel",
            dpp
        )));
    }
    Ok(dpp)
}

fn draw_body(
    frame: &mut Framebuffer,
    scene: &Scene,
    ctx: &RenderContext,
    viewport: &Viewport,
    planets: &[Planet],
    planet: &Planet,
    plot: &PlotDetail,
) -> Result<()> {
    let props = scene.properties.get(planet.body());

    if planet.body() == Body::Sun {
        return draw_sun(frame, viewport, planet, props.color, props.magnify, ctx.glare);
    }
    if plot.pixel_radius <= 1.0 {
        frame.set_pixel_fractional(plot.x, plot.y, props.color, 1.0);
        return Ok(());
    }

    let observer = viewport.view.observer();
    let ring = if planet.body().has_rings() {
        let (sun_lat, sun_lon, _) = planet.xyz_to_planetocentric(&Vector3::zeros());
        let mut ring = Ring::saturn(sun_lon, sun_lat, props.shade)?;
        let dpp = viewport.view.dist_per_pixel() * plot.depth / viewport.view.dist_to_plane();
        ring.set_dist_per_pixel(dpp / (planet.radius() * props.magnify));
        ring.build_shadow_radius_table(planet);
        draw_rings(frame, viewport, planet, &ring, props.magnify, RingHalf::Far);
        Some(ring)
    } else {
        None
    };

    let mut lighting = Lighting::new(planet)
        .with_observer(&observer)
        .with_casters(select_casters(planet, planets));
    if let Some(ring) = &ring {
        lighting = lighting.with_ring(ring);
    }
    let map = Map::create(scene.textures, &props, &lighting, plot.pixel_radius, ctx.width)?;

    let drawing = BodyDrawing {
        planet,
        map: &map,
        magnify: props.magnify,
        limb_darkening: Some(ctx.limb_darkening),
    };
    if planet.flattening() > 0.0 {
        draw_ellipsoid(frame, viewport, &drawing);
    } else {
        draw_sphere(frame, viewport, &drawing);
    }

    if props.grid {
        draw_grid(
            frame,
            &Placement::Perspective(*viewport),
            planet,
            &props,
            Some(plot.depth),
        );
    }

    if let Some(ring) = &ring {
        draw_rings(frame, viewport, planet, ring, props.magnify, RingHalf::Near);
    }
    Ok(())
}
