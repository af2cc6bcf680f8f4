//! Body labels, markers and arcs
//!
//! Everything here only queues [`Annotation`]s; nothing is drawn until the
//! frame composer drains the [`AnnotationMap`].

use super::annotation::DEFAULT_FONT_SIZE;
use super::{Align, Annotation, AnnotationMap, BodyProperties, MarkerPosition, Placement};
use crate::body::Planet;
use crate::constants::DEG2RAD;
use crate::coordinates::spherical::great_circle_points;
use crate::coordinates::LatLon;

/// Queue the name of a body drawn at (`x`, `y`) with pixel radius `pixel_radius`
pub fn add_label(
    annotations: &mut AnnotationMap,
    properties: &BodyProperties,
    planet: &Planet,
    (x, y, depth): (f64, f64, f64),
    pixel_radius: f64,
) {
    let size = 2.0 * (pixel_radius + 1.0).floor();
    annotations.insert(
        depth,
        Annotation::Text {
            x: (x + 0.5).floor(),
            y: (y + 0.5).floor(),
            box_width: size,
            box_height: size,
            align: Align::Auto,
            text: properties.label(planet.body()),
            size: DEFAULT_FONT_SIZE,
            color: properties.text_color,
        },
    );
}

/// Queue the markers of `planet`
///
/// `others` supplies the positions of bodies that markers may point at;
/// a marker naming a body that is not there is skipped with a warning.
pub fn add_markers(
    annotations: &mut AnnotationMap,
    placement: &Placement,
    planet: &Planet,
    properties: &BodyProperties,
    others: &[Planet],
    (width, height): (usize, usize),
) {
    // Depth of the body centre; markers beyond it are on the far side
    let center_depth = match placement {
        Placement::Perspective(viewport) => Some(viewport.project(&planet.position()).depth),
        Placement::Map(_) => None,
    };

    for marker in &properties.markers {
        let (lat, lon) = match &marker.position {
            MarkerPosition::LatLon { lat, lon } => (lat * DEG2RAD, lon * DEG2RAD),
            MarkerPosition::Body(body) => {
                if *body == planet.body() {
                    continue;
                }
                let Some(other) = others.iter().find(|p| p.body() == *body) else {
                    log::warn!(
                        "Marker on {} refers to {}, which is not in the scene",
                        planet.body(),
                        body
                    );
                    continue;
                };
                planet.xyz_to_planetographic(&other.position())
            }
            MarkerPosition::Pixel { .. } => (0.0, 0.0),
        };

        let (x, y, depth) = match &marker.position {
            MarkerPosition::Pixel { x, y, absolute } => {
                let mut x = *x;
                let mut y = *y;
                if !absolute {
                    if x < 0.0 {
                        x += width as f64;
                    }
                    if y < 0.0 {
                        y += height as f64;
                    }
                }
                (x, y, 0.0)
            }
            _ => {
                let radius = marker.radius * properties.magnify;
                let Some(pos) = placement.surface_to_pixel(planet, lat, lon, radius) else {
                    continue;
                };
                if center_depth.is_some_and(|d| pos.depth > d) {
                    continue;
                }
                (pos.x, pos.y, pos.depth)
            }
        };

        let (x, y) = ((x + 0.5).floor(), (y + 0.5).floor());
        let color = marker.color.unwrap_or(properties.marker_color);
        if marker.symbol_size > 0 {
            annotations.insert(
                depth,
                Annotation::Symbol {
                    x,
                    y,
                    radius: marker.symbol_size,
                    color,
                },
            );
        }
        if let Some(name) = &marker.name {
            let icon = 2.0 * f64::from(marker.symbol_size);
            annotations.insert(
                depth,
                Annotation::Text {
                    x,
                    y,
                    box_width: icon,
                    box_height: icon,
                    align: marker.align,
                    text: name.clone(),
                    size: marker.font_size.unwrap_or(DEFAULT_FONT_SIZE),
                    color,
                },
            );
        }
    }
}

/// Queue the great-circle arcs of `planet` as line segments
///
/// A segment is kept only when both ends are visible; on wrap-around
/// projections segments crossing the map edge are dropped.
pub fn add_arcs(
    annotations: &mut AnnotationMap,
    placement: &Placement,
    planet: &Planet,
    properties: &BodyProperties,
) {
    let seam = placement.wrap_width().map(|w| w / 2.0);
    for arc in &properties.arcs {
        let start = LatLon::from_degrees(arc.start[0], arc.start[1]);
        let end = LatLon::from_degrees(arc.end[0], arc.end[1]);
        let radius = arc.radius * properties.magnify;
        let color = arc.color.unwrap_or(properties.arc_color);

        let points: Vec<_> = great_circle_points(&start, &end, arc.spacing * DEG2RAD)
            .into_iter()
            .map(|p| placement.surface_to_pixel(planet, p.lat, p.lon, radius))
            .collect();

        for pair in points.windows(2) {
            let (Some(a), Some(b)) = (pair[0], pair[1]) else {
                continue;
            };
            if seam.is_some_and(|s| (a.x - b.x).abs() > s) {
                continue;
            }
            annotations.insert(
                a.depth.max(b.depth),
                Annotation::Line {
                    from: (a.x, a.y),
                    to: (b.x, b.y),
                    color,
                },
            );
        }
    }
}
