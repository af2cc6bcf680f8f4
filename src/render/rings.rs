//! Planetary rings
//!
//! Rings are drawn in two halves around the planet: the half beyond the
//! plane through the planet's centre perpendicular to the line of sight
//! goes down before the planet, the near half after it.

use super::{disc_bounds, Framebuffer, Viewport};
use crate::body::Planet;
use crate::constants::RING_COLOR;
use crate::ring::{Ring, RingSide};

/// Which half of the ring to draw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RingHalf {
    /// Behind the planet; draw before the planet
    Far,
    /// In front of the planet; draw after the planet
    Near,
}

/// Draw one half of `ring` around `planet`
///
/// The face seen is the lit face when the observer and the Sun are on the
/// same side of the ring plane.
pub fn draw_rings(
    frame: &mut Framebuffer,
    viewport: &Viewport,
    planet: &Planet,
    ring: &Ring,
    magnify: f64,
    half: RingHalf,
) {
    let unit = planet.radius() * magnify;
    let center = planet.position();
    let Some(pixel_radius) = viewport.pixel_radius(&center, ring.outer_radius() * unit) else {
        log::debug!("Observer is inside the rings of {}", planet.body());
        return;
    };
    let screen = viewport.project(&center);
    let Some((xs, ys)) = disc_bounds(frame, screen.x, screen.y, pixel_radius) else {
        return;
    };

    // Observer in the body frame, in units of the planet radius
    let origin = planet.to_body_frame(&(viewport.view.observer() - center)) / unit;
    if origin.z == 0.0 {
        return;
    }
    let side = if ring.sun_lat() * origin.z > 0.0 {
        RingSide::Lit
    } else {
        RingSide::Unlit
    };

    frame.par_rows(ys, |row| {
        let y = row.y as f64;
        for xi in xs.clone() {
            let dir = planet.to_body_frame(&viewport.ray(xi as f64, y));
            if dir.z == 0.0 {
                continue;
            }
            let u = -origin.z / dir.z;
            if u <= 0.0 {
                continue;
            }
            let p = origin + dir * u;
            let beyond = p.dot(&origin) < 0.0;
            if beyond != (half == RingHalf::Far) {
                continue;
            }

            let r = p.x.hypot(p.y);
            if r < ring.inner_radius() || r > ring.outer_radius() {
                continue;
            }
            let t = ring.transparency(r);
            let b = ring.brightness(p.y.atan2(p.x), r, side);
            if t < 0.0 || b < 0.0 {
                continue;
            }
            let color = RING_COLOR.map(|c| (f64::from(c) * b).round().clamp(0.0, 255.0) as u8);
            row.blend(xi, color, 1.0 - t);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::{Body, BodyOrientation};
    use crate::constants::J2000;
    use crate::view::View;
    use nalgebra::Vector3;

    /// Saturn with its pole along +z, seen from 30 degrees above the ring plane
    fn scene() -> (Planet, Ring, View) {
        let mut o = BodyOrientation::for_body(Body::Saturn);
        o.pole_ra = 0.0;
        o.pole_dec = 90.0;
        o.pole_ra_rate = 0.0;
        o.pole_dec_rate = 0.0;
        let saturn = Planet::new(Body::Saturn, Vector3::new(9.5, 0.0, 0.0), o, J2000);
        let ring = Ring::saturn(0.0, 0.3, 0.25).unwrap();
        let d = 0.02;
        let observer = saturn.position()
            + Vector3::new(-d * 30f64.to_radians().cos(), 0.0, d * 30f64.to_radians().sin());
        let view = View::new(
            observer,
            saturn.position(),
            Vector3::z(),
            3.0 * saturn.radius() / 100.0,
            0.0,
        )
        .unwrap();
        (saturn, ring, view)
    }

    fn count_drawn(frame: &Framebuffer) -> usize {
        frame.rgb().chunks_exact(3).filter(|c| c.iter().any(|&v| v > 0)).count()
    }

    #[test]
    fn test_both_halves_draw_and_do_not_overlap_the_centre() {
        let (saturn, ring, view) = scene();
        let viewport = Viewport::new(&view, 100.0, 100.0);

        let mut far = Framebuffer::new(200, 200).unwrap();
        draw_rings(&mut far, &viewport, &saturn, &ring, 1.0, RingHalf::Far);
        let mut near = Framebuffer::new(200, 200).unwrap();
        draw_rings(&mut near, &viewport, &saturn, &ring, 1.0, RingHalf::Near);

        assert!(count_drawn(&far) > 100);
        assert!(count_drawn(&near) > 100);
        // The ring has a hole where the planet sits
        assert_eq!(far.get_pixel(100, 100), [0, 0, 0]);
        assert_eq!(near.get_pixel(100, 100), [0, 0, 0]);
    }
}
