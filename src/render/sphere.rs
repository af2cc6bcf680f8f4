//! Ray-traced body discs
//!
//! Each output pixel inside the body's bounding box casts a ray from the
//! observer. Rays are moved into the body frame and the polar axis is
//! stretched by `1 / (1 - f)`, which turns the reference ellipsoid into a
//! sphere of the equatorial radius, so one quadratic serves both shapes.
//!
//! The silhouette is antialiased without supersampling: with `det` the
//! quadratic's discriminant for a pixel and `det0` the value for the ray
//! through the centre, edge pixels get opacity `1 - (1 - det/det0)^r` where
//! `r` is the disc's pixel radius.

use nalgebra::Vector3;

use super::{disc_bounds, photo_function, Framebuffer, Viewport};
use crate::body::Planet;
use crate::map::Map;

/// What to draw for one body
#[derive(Debug, Clone, Copy)]
pub struct BodyDrawing<'a> {
    pub planet: &'a Planet,
    pub map: &'a Map,
    /// Scale factor applied to the body's radius
    pub magnify: f64,
    /// Limb-darkening exponent; `None` draws the map unmodified
    pub limb_darkening: Option<f64>,
}

impl BodyDrawing<'_> {
    fn radius(&self) -> f64 {
        self.planet.radius() * self.magnify
    }
}

/// Intersection of a body-frame ray with the stretched body
struct Hit {
    /// Quarter discriminant of the ray/sphere quadratic over the squared
    /// ray length, independent of the ray's scale
    det: f64,
    /// Ray parameter of the near intersection
    u: f64,
}

/// Nearest intersection of `origin + u * dir` with a sphere of `radius`
/// at the origin
fn intersect(origin: &Vector3<f64>, dir: &Vector3<f64>, radius: f64) -> Option<Hit> {
    let a = dir.dot(dir);
    let b = origin.dot(dir);
    let c = origin.dot(origin) - radius * radius;
    let det = b * b - a * c;
    if det < 0.0 {
        return None;
    }
    let u = (-b - det.sqrt()) / a;
    if u < 0.0 {
        return None;
    }
    Some(Hit { det: det / a, u })
}

/// Silhouette antialiasing opacity
pub fn edge_opacity(det: f64, center_det: f64, pixel_radius: f64) -> f64 {
    if center_det <= 0.0 {
        return 1.0;
    }
    let ratio = (det / center_det).clamp(0.0, 1.0);
    (1.0 - (1.0 - ratio).powf(pixel_radius.max(1.0))).clamp(0.0, 1.0)
}

/// Draw a spherical body; flattening is ignored
pub fn draw_sphere(frame: &mut Framebuffer, viewport: &Viewport, body: &BodyDrawing) {
    draw_body(frame, viewport, body, 0.0);
}

/// Draw a body as an oblate ellipsoid with its own flattening
pub fn draw_ellipsoid(frame: &mut Framebuffer, viewport: &Viewport, body: &BodyDrawing) {
    draw_body(frame, viewport, body, body.planet.flattening());
}

fn draw_body(frame: &mut Framebuffer, viewport: &Viewport, body: &BodyDrawing, flattening: f64) {
    let planet = body.planet;
    let center = planet.position();
    let radius = body.radius();
    let Some(pixel_radius) = viewport.pixel_radius(&center, radius) else {
        log::debug!("{} is behind the observer or surrounds it", planet.body());
        return;
    };
    let screen = viewport.project(&center);

    if pixel_radius <= 1.0 {
        let (lat, lon) = planet.xyz_to_planetographic(&viewport.view.observer());
        let color = body.map.get_pixel(lat, lon);
        frame.set_pixel_fractional(screen.x, screen.y, color, 1.0);
        return;
    }

    let Some((xs, ys)) = disc_bounds(frame, screen.x, screen.y, pixel_radius) else {
        return;
    };

    let stretch = 1.0 / (1.0 - flattening);
    let to_body = |v: &Vector3<f64>| {
        let mut b = planet.to_body_frame(v);
        b.z *= stretch;
        b
    };
    let origin = to_body(&(viewport.view.observer() - center));
    let center_det = match intersect(&origin, &-origin, radius) {
        Some(hit) => hit.det,
        None => return,
    };
    let normal_scale = stretch * stretch;

    frame.par_rows(ys, |row| {
        let y = row.y as f64;
        for xi in xs.clone() {
            let ray = viewport.ray(xi as f64, y);
            let dir = to_body(&ray);
            let Some(hit) = intersect(&origin, &dir, radius) else {
                continue;
            };
            let mut p = origin + dir * hit.u;
            p.z /= stretch;

            let lat_c = (p.z / p.norm()).clamp(-1.0, 1.0).asin();
            let lon = p.y.atan2(p.x);
            let mut color = body.map.get_pixel(planet.centric_to_graphic(lat_c), lon);

            if let Some(k) = body.limb_darkening {
                let normal = Vector3::new(p.x, p.y, p.z * normal_scale).normalize();
                let mu = -normal.dot(&planet.to_body_frame(&ray));
                let factor = photo_function(mu, k);
                for c in color.iter_mut() {
                    *c = (f64::from(*c) * factor).round() as u8;
                }
            }

            row.blend(xi, color, edge_opacity(hit.det, center_det, pixel_radius));
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::Body;
    use crate::constants::J2000;
    use crate::texture::Texture;
    use crate::view::View;

    #[test]
    fn test_intersect_misses_and_hits() {
        let origin = Vector3::new(0.0, 0.0, -10.0);
        assert!(intersect(&origin, &Vector3::new(1.0, 0.0, 0.0), 1.0).is_none());
        let hit = intersect(&origin, &Vector3::new(0.0, 0.0, 1.0), 1.0).unwrap();
        assert!((hit.u - 9.0).abs() < 1e-12);
        // Facing away from the sphere
        assert!(intersect(&origin, &Vector3::new(0.0, 0.0, -1.0), 1.0).is_none());
    }

    #[test]
    fn test_edge_opacity_ramp() {
        assert_eq!(edge_opacity(1.0, 1.0, 50.0), 1.0);
        assert_eq!(edge_opacity(0.0, 1.0, 50.0), 0.0);
        assert!(edge_opacity(0.01, 1.0, 50.0) > 0.3);
        assert!(edge_opacity(0.01, 1.0, 5.0) < edge_opacity(0.01, 1.0, 50.0));
    }

    #[test]
    fn test_tiny_body_is_a_single_point() {
        let planet = Planet::with_default_orientation(Body::Io, Vector3::new(5.0, 0.0, 0.0), J2000);
        let map = Map::from_texture(Texture::filled(8, 4, [200, 100, 0]).unwrap());
        let view = View::new(
            Vector3::new(1.0, 0.0, 0.0),
            planet.position(),
            Vector3::z(),
            1e-3,
            0.0,
        )
        .unwrap();
        let mut frame = Framebuffer::new(11, 11).unwrap();
        let body = BodyDrawing {
            planet: &planet,
            map: &map,
            magnify: 1.0,
            limb_darkening: None,
        };
        draw_sphere(&mut frame, &Viewport::new(&view, 5.0, 5.0), &body);
        assert_eq!(frame.get_pixel(5, 5), [200, 100, 0]);
        assert_eq!(frame.get_pixel(6, 5), [0, 0, 0]);
    }
}
