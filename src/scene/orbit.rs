//! Orbit traces
//!
//! A body's path is sampled from the ephemeris over a span of orbital
//! periods around the frame date. Moons are traced relative to their
//! primary, pinned to where the primary is at the frame date, so the trace
//! is a closed ellipse around it rather than a heliocentric spiral.

use nalgebra::Vector3;

use super::{Annotation, AnnotationMap, BodyProperties};
use crate::body::{Body, Ephemeris, Planet};
use crate::render::Viewport;
use crate::view::PixelPosition;
use crate::Result;

/// Samples further than this many frame sizes off the frame are not drawn
const FAR_OFF_FRAME: f64 = 100.0;

/// Queue the orbit of `planet` as line segments
///
/// Each segment is keyed on the depth of its farther end. The first
/// segment of the target's own orbit is always kept so the trace is
/// anchored on it.
///
/// # Errors
///
/// Returns the ephemeris error if a sample cannot be computed.
#[allow(clippy::too_many_arguments)]
pub fn add_orbit(
    annotations: &mut AnnotationMap,
    ephemeris: &dyn Ephemeris,
    viewport: &Viewport,
    planet: &Planet,
    properties: &BodyProperties,
    julian_day: f64,
    frame_size: (usize, usize),
    is_target: bool,
) -> Result<()> {
    let period = planet.period();
    if period == 0.0 {
        return Ok(());
    }
    let sampling = properties.orbit;
    if !(sampling.delta > 0.0) {
        return Ok(());
    }

    let body = planet.body();
    let primary = planet.primary();
    let anchor = if primary == Body::Sun {
        Vector3::zeros()
    } else {
        ephemeris.position(primary, julian_day)?
    };
    let position_at = |jd: f64| -> Result<Vector3<f64>> {
        let p = ephemeris.position(body, jd)?;
        if primary == Body::Sun {
            Ok(p)
        } else {
            Ok(p - ephemeris.position(primary, jd)? + anchor)
        }
    };

    let steps = ((180.0 / sampling.delta + 0.5) as usize).max(1);
    let start = julian_day + sampling.start * period;
    let stop = julian_day + sampling.stop * period;
    let tracer = Tracer {
        frame_size,
        color: properties.orbit_color,
        is_target,
    };
    let mut segments = 0;
    for (from, to) in [(start, julian_day), (julian_day, stop)] {
        let dt = (to - from) / steps as f64;
        let mut samples = Vec::with_capacity(steps + 1);
        for i in 0..=steps {
            samples.push(viewport.project(&position_at(from + i as f64 * dt)?));
        }
        segments += tracer.add(annotations, &samples);
    }
    log::debug!("Orbit of {}: {} segments", body, segments);
    Ok(())
}

struct Tracer {
    frame_size: (usize, usize),
    color: [u8; 3],
    is_target: bool,
}

impl Tracer {
    fn add(&self, annotations: &mut AnnotationMap, samples: &[PixelPosition]) -> usize {
        let (w, h) = (self.frame_size.0 as f64, self.frame_size.1 as f64);
        let far_off =
            |p: &PixelPosition| p.x.abs() > w * FAR_OFF_FRAME || p.y.abs() > h * FAR_OFF_FRAME;

        let mut added = 0;
        for (i, pair) in samples.windows(2).enumerate() {
            let (prev, cur) = (&pair[0], &pair[1]);
            let skip = (prev.x < 0.0 && cur.x < 0.0)
                || (prev.y < 0.0 && cur.y < 0.0)
                || (prev.x >= w && cur.x >= w)
                || (prev.y >= h && cur.y >= h)
                || far_off(prev)
                || far_off(cur)
                || (!prev.is_in_front() && !cur.is_in_front());
            if skip && !(i == 0 && self.is_target) {
                continue;
            }
            let (near, far) = if prev.depth > cur.depth {
                (cur, prev)
            } else {
                (prev, cur)
            };
            annotations.insert(
                far.depth,
                Annotation::Line {
                    from: (far.x, far.y),
                    to: (near.x, near.y),
                    color: self.color,
                },
            );
            added += 1;
        }
        added
    }
}
