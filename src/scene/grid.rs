//! Latitude/longitude grid overlay

use std::f64::consts::{FRAC_PI_2, PI};

use super::{BodyProperties, Placement};
use crate::body::Planet;
use crate::render::Framebuffer;

/// Planetographic (lat, east lon) samples of the grid, radians
///
/// There are `grid1` lines per 90 degrees of latitude and of longitude;
/// each line is sampled `grid2` times between crossings.
pub fn grid_points(grid1: u32, grid2: u32) -> Vec<(f64, f64)> {
    if grid1 == 0 {
        return Vec::new();
    }
    let lines = grid1 as usize;
    let dense = lines * grid2.max(1) as usize;
    let coarse_step = FRAC_PI_2 / lines as f64;
    let fine_step = FRAC_PI_2 / dense as f64;

    let mut points = Vec::with_capacity((2 * lines + 1) * (4 * dense + 1) * 2);
    // Parallels
    for i in 0..=2 * lines {
        let lat = -FRAC_PI_2 + i as f64 * coarse_step;
        points.extend((0..=4 * dense).map(|j| (lat, -PI + j as f64 * fine_step)));
    }
    // Meridians
    for i in 0..=2 * dense {
        let lat = -FRAC_PI_2 + i as f64 * fine_step;
        points.extend((0..=4 * lines).map(|j| (lat, -PI + j as f64 * coarse_step)));
    }
    points
}

/// Draw the grid of `planet` as single points
///
/// With `max_depth`, points at or beyond that depth are skipped.
pub fn draw_grid(
    frame: &mut Framebuffer,
    placement: &Placement,
    planet: &Planet,
    properties: &BodyProperties,
    max_depth: Option<f64>,
) {
    let mut drawn = 0usize;
    for (lat, lon) in grid_points(properties.grid1, properties.grid2) {
        let radius = planet.radius_at(lat) * properties.magnify;
        let Some(pos) = placement.surface_to_pixel(planet, lat, lon, radius) else {
            continue;
        };
        if max_depth.map_or(true, |d| pos.depth < d) {
            frame.set_pixel_fractional(pos.x, pos.y, properties.grid_color, 1.0);
            drawn += 1;
        }
    }
    log::debug!("Drew {} grid points on {}", drawn, planet.body());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::Body;
    use crate::constants::J2000;
    use crate::projection::{Projection, ProjectionKind};
    use nalgebra::Vector3;

    #[test]
    fn test_point_count() {
        assert_eq!(grid_points(6, 15).len(), 13 * 361 + 181 * 25);
        assert!(grid_points(0, 15).is_empty());
        // grid2 of zero samples only the crossings
        assert_eq!(grid_points(1, 0).len(), 3 * 5 + 3 * 5);
    }

    #[test]
    fn test_points_span_the_globe() {
        let points = grid_points(2, 3);
        let (min_lat, max_lat) = points
            .iter()
            .fold((f64::MAX, f64::MIN), |(lo, hi), p| (lo.min(p.0), hi.max(p.0)));
        assert!((min_lat + FRAC_PI_2).abs() < 1e-12);
        assert!((max_lat - FRAC_PI_2).abs() < 1e-12);
        assert!(points.iter().any(|p| (p.1 - PI).abs() < 1e-12));
    }

    #[test]
    fn test_grid_on_a_map() {
        let planet =
            Planet::with_default_orientation(Body::Mars, Vector3::new(1.5, 0.0, 0.0), J2000);
        let projection = Projection::new(ProjectionKind::Rectangular, 1.0, 90, 45, 0.0).unwrap();
        let mut frame = Framebuffer::new(90, 45).unwrap();
        let properties = BodyProperties {
            grid: true,
            grid1: 2,
            grid2: 4,
            grid_color: [0, 255, 0],
            ..BodyProperties::default()
        };
        draw_grid(&mut frame, &Placement::Map(&projection), &planet, &properties, None);
        let green = frame
            .rgb()
            .chunks_exact(3)
            .filter(|c| c[1] > 0 && c[0] == 0)
            .count();
        assert!(green > 100, "only {} grid pixels", green);
    }
}
