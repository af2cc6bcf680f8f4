//! Eclipse shadows cast by one body onto another
//!
//! Bodies and the Sun are treated as discs on the sky of a surface point.
//! The shadow strength is the fraction of the solar disc hidden by the
//! caster, ramped so that hiding [`PENUMBRA_FULL_OCCLUSION`] of the disc or
//! more gives full shadow.

use std::f64::consts::PI;

use nalgebra::Vector3;

use crate::body::{Body, Planet};
use crate::constants::{AU_KM, PENUMBRA_FULL_OCCLUSION, SUN_RADIUS_KM};

/// A body that may shade the map's target
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowCaster {
    pub body: Body,
    /// Heliocentric position, AU
    pub position: Vector3<f64>,
    /// Radius, AU
    pub radius: f64,
}

/// Angle between two vectors, accurate for small angles
fn angle_between(a: &Vector3<f64>, b: &Vector3<f64>) -> f64 {
    a.cross(b).norm().atan2(a.dot(b))
}

/// Fraction of a disc of angular radius `r1` covered by a disc of radius
/// `r2` whose centre is `separation` away
pub fn disc_overlap(separation: f64, r1: f64, r2: f64) -> f64 {
    if r1 <= 0.0 || r2 <= 0.0 || separation >= r1 + r2 {
        return 0.0;
    }
    if separation <= (r1 - r2).abs() {
        return if r2 >= r1 { 1.0 } else { (r2 / r1).powi(2) };
    }
    let d = separation;
    let a1 = ((d * d + r1 * r1 - r2 * r2) / (2.0 * d * r1)).clamp(-1.0, 1.0).acos();
    let a2 = ((d * d + r2 * r2 - r1 * r1) / (2.0 * d * r2)).clamp(-1.0, 1.0).acos();
    let k = ((-d + r1 + r2) * (d + r1 - r2) * (d - r1 + r2) * (d + r1 + r2)).max(0.0);
    let lens = r1 * r1 * a1 + r2 * r2 * a2 - 0.5 * k.sqrt();
    (lens / (PI * r1 * r1)).clamp(0.0, 1.0)
}

/// Illumination multiplier for a given occluded fraction of the Sun
pub fn shadow_weight(occluded: f64) -> f64 {
    1.0 - (occluded / PENUMBRA_FULL_OCCLUSION).clamp(0.0, 1.0)
}

impl ShadowCaster {
    pub fn from_planet(planet: &Planet) -> Self {
        Self {
            body: planet.body(),
            position: planet.position(),
            radius: planet.radius(),
        }
    }

    /// Fraction of the solar disc hidden by this body, seen from `point`
    pub fn occlusion(&self, point: &Vector3<f64>) -> f64 {
        let to_sun = -point;
        let sun_dist = to_sun.norm();
        let to_caster = self.position - point;
        let caster_dist = to_caster.norm();
        if caster_dist >= sun_dist || caster_dist <= self.radius || to_sun.dot(&to_caster) <= 0.0 {
            return 0.0;
        }
        let sun_radius = (SUN_RADIUS_KM / AU_KM / sun_dist).asin();
        let caster_radius = (self.radius / caster_dist).asin();
        disc_overlap(angle_between(&to_sun, &to_caster), sun_radius, caster_radius)
    }
}

/// Bodies that can shade some part of `target`
///
/// Only bodies nearer the Sun than the target are candidates, and only
/// those whose disc comes close enough to the Sun as seen from the target's
/// centre, allowing for the target's own size.
pub fn select_casters<'a>(
    target: &Planet,
    bodies: impl IntoIterator<Item = &'a Planet>,
) -> Vec<ShadowCaster> {
    let t = target.position();
    let target_dist = t.norm();
    let sun_radius = (SUN_RADIUS_KM / AU_KM / target_dist).asin();

    bodies
        .into_iter()
        .filter(|p| p.body() != Body::Sun && p.body() != target.body())
        .filter(|p| p.position().norm() < target_dist)
        .filter(|p| {
            let to_caster = p.position() - t;
            let dist = to_caster.norm();
            if dist <= p.radius() + target.radius() {
                return false;
            }
            let caster_radius = (p.radius() / dist).asin();
            let margin = 1.5 * target.radius() / dist;
            angle_between(&-t, &to_caster) <= sun_radius + caster_radius + margin
        })
        .map(ShadowCaster::from_planet)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_disc_overlap_limits() {
        assert_eq!(disc_overlap(3.0, 1.0, 1.0), 0.0);
        assert_eq!(disc_overlap(0.0, 1.0, 2.0), 1.0);
        assert_relative_eq!(disc_overlap(0.0, 1.0, 0.5), 0.25, epsilon = 1e-12);
        // Equal discs offset by one radius overlap by about 39%
        assert_relative_eq!(disc_overlap(1.0, 1.0, 1.0), 0.391, epsilon = 1e-3);
    }

    #[test]
    fn test_overlap_grows_as_discs_approach() {
        let mut last = 0.0;
        for i in (0..=20).rev() {
            let f = disc_overlap(i as f64 * 0.1, 1.0, 0.8);
            assert!(f >= last);
            last = f;
        }
    }

    #[test]
    fn test_shadow_weight_ramp() {
        assert_eq!(shadow_weight(0.0), 1.0);
        assert_relative_eq!(shadow_weight(0.25), 0.5, epsilon = 1e-12);
        assert_eq!(shadow_weight(0.8), 0.0);
    }

    #[test]
    fn test_moon_in_front_of_sun_occludes() {
        let earth = Planet::with_default_orientation(
            Body::Earth,
            Vector3::new(1.0, 0.0, 0.0),
            2_451_545.0,
        );
        let moon = Planet::with_default_orientation(
            Body::Moon,
            Vector3::new(1.0 - 0.00257, 0.0, 0.0),
            2_451_545.0,
        );
        let casters = select_casters(&earth, [&moon]);
        assert_eq!(casters.len(), 1);

        let sub_solar = Vector3::new(1.0 - earth.radius(), 0.0, 0.0);
        assert!(casters[0].occlusion(&sub_solar) > 0.9);
        let far_away = ShadowCaster {
            body: Body::Moon,
            position: Vector3::new(1.0, 0.3, 0.0),
            radius: moon.radius(),
        };
        assert_eq!(far_away.occlusion(&sub_solar), 0.0);
    }

    #[test]
    fn test_bodies_beyond_the_target_are_not_casters() {
        let earth = Planet::with_default_orientation(
            Body::Earth,
            Vector3::new(1.0, 0.0, 0.0),
            2_451_545.0,
        );
        let moon = Planet::with_default_orientation(
            Body::Moon,
            Vector3::new(1.0 + 0.00257, 0.0, 0.0),
            2_451_545.0,
        );
        assert!(select_casters(&earth, [&moon]).is_empty());
    }
}
