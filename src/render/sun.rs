//! The Sun: a flat disc inside a starburst glow
use std::f64::consts::FRAC_PI_2;

use super::{disc_bounds, draw_sphere, BodyDrawing, Framebuffer, Viewport};
use crate::body::Planet;
use crate::constants::{SUN_GLOW_BASE, SUN_GLOW_FALLOFF, SUN_GLOW_SCALE, SUN_GLOW_SPIKES};
use crate::map::Map;
use crate::texture::Texture;
use crate::Result;

/// Glow opacity at `dist` solar radii from the disc centre and position
/// angle `angle`; zero inside the disc and beyond `glare` radii
pub fn glow_opacity(dist: f64, angle: f64, glare: f64) -> f64 {
    if dist <= 1.0 || dist >= glare {
        return 0.0;
    }
    let spikes = SUN_GLOW_BASE + (SUN_GLOW_SPIKES * angle).cos();
    (SUN_GLOW_SCALE * ((1.0 - dist) / SUN_GLOW_FALLOFF).exp() * spikes).clamp(0.0, 1.0)
}

/// Draw the Sun's glow out to `glare` radii, then its disc in `color`
pub fn draw_sun(
    frame: &mut Framebuffer,
    viewport: &Viewport,
    sun: &Planet,
    color: [u8; 3],
    magnify: f64,
    glare: f64,
) -> Result<()> {
    let radius = sun.radius() * magnify;
    let Some(pixel_radius) = viewport.pixel_radius(&sun.position(), radius) else {
        return Ok(());
    };
    let screen = viewport.project(&sun.position());
    let glow_radius = pixel_radius.max(1.0);

    if glare > 1.0 {
        if let Some((xs, ys)) = disc_bounds(frame, screen.x, screen.y, glare * glow_radius) {
            frame.par_rows(ys, |row| {
                let dy = row.y as f64 - screen.y;
                for xi in xs.clone() {
                    let dx = xi as f64 - screen.x;
                    let dist = dx.hypot(dy) / glow_radius;
                    let angle = dy.atan2(dx) + FRAC_PI_2;
                    row.blend(xi, color, glow_opacity(dist, angle, glare));
                }
            });
        }
    }

    let map = Map::from_texture(Texture::filled(2, 1, color)?);
    draw_sphere(
        frame,
        viewport,
        &BodyDrawing {
            planet: sun,
            map: &map,
            magnify,
            limb_darkening: None,
        },
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::Body;
    use crate::constants::{J2000, SUN_GLOW_RADII};
    use crate::view::View;
    use nalgebra::Vector3;

    #[test]
    fn test_glow_fades_with_distance() {
        assert_eq!(glow_opacity(0.5, 0.0, SUN_GLOW_RADII), 0.0);
        assert_eq!(glow_opacity(30.0, 0.0, SUN_GLOW_RADII), 0.0);
        let near = glow_opacity(1.5, 0.0, SUN_GLOW_RADII);
        let far = glow_opacity(10.0, 0.0, SUN_GLOW_RADII);
        assert!(near > far && far > 0.0);
        // Spikes every 30 degrees
        assert!(glow_opacity(5.0, 0.0, 28.0) > glow_opacity(5.0, 15f64.to_radians(), 28.0));
    }

    #[test]
    fn test_sun_disc_and_glow() {
        let sun = Planet::with_default_orientation(Body::Sun, Vector3::zeros(), J2000);
        let observer = Vector3::new(1.0, 0.0, 0.0);
        // Solar radius is about 0.00465 AU; 5 pixels across the radius
        let view = View::new(observer, sun.position(), Vector3::z(), 0.00465 / 5.0, 0.0).unwrap();
        let mut frame = Framebuffer::new(101, 101).unwrap();
        draw_sun(
            &mut frame,
            &Viewport::new(&view, 50.0, 50.0),
            &sun,
            [255, 255, 166],
            1.0,
            SUN_GLOW_RADII,
        )
        .unwrap();
        assert_eq!(frame.get_pixel(50, 50), [255, 255, 166]);
        let glow = frame.get_pixel(50, 60);
        assert!(glow[0] > 0 && glow[0] < 255, "glow {:?}", glow);
        assert!(frame.get_pixel(0, 0)[0] < glow[0]);
    }
}
