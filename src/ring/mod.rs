//! Planetary ring optical model
//!
//! A [`Ring`] holds radial brightness and transparency profiles (outermost
//! sample first) and answers three questions for the renderer:
//!
//! - how bright and how transparent the ring is at a radius, averaged over
//!   the radial footprint of one output pixel
//! - how far the planet's shadow reaches across the ring at a longitude
//! - which ring radius shades a given point on the planet's surface
//!
//! All radii are in units of the planet's equatorial radius and longitudes
//! are planetocentric, measured in the body-fixed frame.

use crate::body::Planet;
use crate::constants::{
    RING_INNER_PADDING, RING_OUTER_PADDING, RING_SHADOW_COS_LIMIT, SHADOW_TABLE_SIZE,
};
use crate::view::View;
use crate::{PlanetariumError, Result};

pub mod saturn;

/// Which face of the ring plane is being looked at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RingSide {
    /// The face turned toward the sun
    Lit,
    /// The far face, seen by light diffusing through the ring
    Unlit,
}

/// A padded radial profile with its sampling
#[derive(Debug, Clone)]
struct Profile {
    values: Vec<f64>,
    /// Radius of sample 0
    top: f64,
    /// Radial step between samples
    dr: f64,
    /// Half-width of the averaging window, in samples
    window: usize,
}

impl Profile {
    fn radius(&self, j: usize) -> f64 {
        self.top - j as f64 * self.dr
    }

    fn index(&self, r: f64) -> Option<usize> {
        let i = ((self.top - r) / self.dr).floor();
        if i < 0.0 || i >= self.values.len() as f64 {
            None
        } else {
            Some(i as usize)
        }
    }

    fn window_bounds(&self, i: usize) -> (usize, usize) {
        let j1 = i.saturating_sub(self.window);
        let j2 = (i + self.window).min(self.values.len() - 1);
        (j1, j2)
    }

    /// Window average around `r`, or -1 outside the profile
    fn average(&self, r: f64) -> f64 {
        let Some(i) = self.index(r) else {
            return -1.0;
        };
        let (j1, j2) = self.window_bounds(i);
        if j2 <= j1 {
            return self.values[i];
        }
        let sum: f64 = self.values[j1..j2].iter().sum();
        sum / (j2 - j1) as f64
    }

    /// Window average where samples inside `shadow_radius` are scaled by
    /// `shade`
    fn shadowed_average(&self, r: f64, shadow_radius: f64, shade: f64) -> f64 {
        let Some(i) = self.index(r) else {
            return -1.0;
        };
        let (j1, j2) = self.window_bounds(i);
        if j2 <= j1 {
            let v = self.values[i];
            return if r < shadow_radius { shade * v } else { v };
        }
        let (mut lit, mut shaded) = (0.0, 0.0);
        for j in j1..j2 {
            if self.radius(j) < shadow_radius {
                shaded += self.values[j];
            } else {
                lit += self.values[j];
            }
        }
        let n = (j2 - j1) as f64;
        lit / n + shade * (shaded / n)
    }
}

/// Ring brightness/transparency/shadow model for one frame
#[derive(Debug, Clone)]
pub struct Ring {
    brightness: Profile,
    transparency: Profile,
    outer_radius: f64,
    inner_radius: f64,
    shade: f64,
    sun_lon: f64,
    sun_lat: f64,
    sun_dir: [f64; 3],
    /// (cos of longitude from the sub-solar meridian, outer shadow radius),
    /// cosines increasing
    shadow_table: Vec<(f64, f64)>,
}

impl Ring {
    /// Build a ring model
    ///
    /// # Arguments
    ///
    /// * `inner_radius`, `outer_radius` - Ring edges, same units as `planet_radius`
    /// * `planet_radius` - Planet equatorial radius
    /// * `brightness` - Lit-side brightness profile, outermost sample first
    /// * `transparency` - Transparency profile (0 opaque, 1 clear), outermost first
    /// * `sun_lon`, `sun_lat` - Planetocentric sub-solar point, radians
    /// * `shade` - Brightness multiplier inside the planet's shadow
    ///
    /// # Errors
    ///
    /// Returns [`PlanetariumError::InvalidInput`] for empty profiles or
    /// radii that are not positive and ordered.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        inner_radius: f64,
        outer_radius: f64,
        planet_radius: f64,
        brightness: &[f64],
        transparency: &[f64],
        sun_lon: f64,
        sun_lat: f64,
        shade: f64,
    ) -> Result<Self> {
        if brightness.is_empty() || transparency.is_empty() {
            return Err(PlanetariumError::InvalidInput(
                "ring profiles must not be empty".to_string(),
            ));
        }
        if !(planet_radius > 0.0 && inner_radius > 0.0 && outer_radius > inner_radius) {
            return Err(PlanetariumError::InvalidInput(format!(
                "bad ring radii: inner {}, outer {}, planet {}",
                inner_radius, outer_radius, planet_radius
            )));
        }

        let r_out = outer_radius / planet_radius;
        let r_in = inner_radius / planet_radius;
        let width = r_out - r_in;

        let cos_sun_lat = sun_lat.cos();
        let brightness = Self::pad_brightness(brightness, r_out, width, cos_sun_lat);
        let transparency = Self::pad_transparency(transparency, r_out, width);

        let (sin_lon, cos_lon) = sun_lon.sin_cos();
        let (sin_lat, cos_lat) = sun_lat.sin_cos();

        Ok(Self {
            outer_radius: brightness.top.max(transparency.top),
            inner_radius: r_in,
            brightness,
            transparency,
            shade,
            sun_lon,
            sun_lat,
            sun_dir: [cos_lat * cos_lon, cos_lat * sin_lon, sin_lat],
            shadow_table: Vec::new(),
        })
    }

    /// Saturn's rings with the built-in profiles
    pub fn saturn(sun_lon: f64, sun_lat: f64, shade: f64) -> Result<Self> {
        let (brightness, transparency) = saturn::profiles(saturn::PROFILE_SAMPLES);
        Self::new(
            crate::constants::SATURN_RING_INNER_KM,
            crate::constants::SATURN_RING_OUTER_KM,
            crate::constants::SATURN_RING_PLANET_KM,
            &brightness,
            &transparency,
            sun_lon,
            sun_lat,
            shade,
        )
    }

    /// Brightness fades to zero over the outer padding and holds its last
    /// value over the inner padding
    fn pad_brightness(raw: &[f64], r_out: f64, width: f64, scale: f64) -> Profile {
        let n = raw.len();
        let dr = width / n as f64;
        let first = raw[0];
        let last = raw[n - 1];

        let mut values = Vec::with_capacity(RING_OUTER_PADDING + n + RING_INNER_PADDING);
        values.extend(
            (0..RING_OUTER_PADDING).map(|i| first * i as f64 / (RING_OUTER_PADDING - 1) as f64),
        );
        values.extend_from_slice(raw);
        values.extend(std::iter::repeat(last).take(RING_INNER_PADDING));
        for v in &mut values {
            *v *= scale;
        }

        Profile {
            values,
            top: r_out + RING_OUTER_PADDING as f64 * dr,
            dr,
            window: 1,
        }
    }

    /// Transparency rises to fully clear over the padding on both sides
    fn pad_transparency(raw: &[f64], r_out: f64, width: f64) -> Profile {
        let n = raw.len();
        let dr = width / n as f64;
        let first = raw[0];
        let last = raw[n - 1];

        let mut values = Vec::with_capacity(RING_OUTER_PADDING + n + RING_INNER_PADDING);
        values.extend((0..RING_OUTER_PADDING).map(|i| {
            let weight = i as f64 / (RING_OUTER_PADDING - 1) as f64;
            1.0 - (1.0 - first) * weight
        }));
        values.extend_from_slice(raw);
        values.extend((0..RING_INNER_PADDING).map(|i| {
            let weight = 1.0 - i as f64 / (RING_INNER_PADDING - 1) as f64;
            1.0 - (1.0 - last) * weight
        }));

        Profile {
            values,
            top: r_out + RING_OUTER_PADDING as f64 * dr,
            dr,
            window: 1,
        }
    }

    /// Outermost radius carrying any ring material, planet radii
    pub fn outer_radius(&self) -> f64 {
        self.outer_radius
    }

    /// Inner edge of the ring proper, planet radii
    pub fn inner_radius(&self) -> f64 {
        self.inner_radius
    }

    pub fn sun_lat(&self) -> f64 {
        self.sun_lat
    }

    /// Size the averaging windows to the radial footprint of one pixel
    /// (`dist_per_pixel` in planet radii)
    pub fn set_dist_per_pixel(&mut self, dist_per_pixel: f64) {
        for profile in [&mut self.brightness, &mut self.transparency] {
            let samples = (dist_per_pixel / profile.dr + 0.5).max(0.0) as usize;
            profile.window = samples / 2 + 1;
        }
    }

    /// Tabulate how far the planet's shadow extends across the ring
    ///
    /// Walks longitudes from the anti-solar meridian toward the sun and, at
    /// each, the transparency radii from the outside in, stopping at the
    /// first radius hidden from the sun behind the planet's disc. Only
    /// longitudes with a shadowed radius get an entry.
    ///
    /// With the pole pointing at the sun the planet's shadow never reaches
    /// the ring; the table is left empty.
    pub fn build_shadow_radius_table(&mut self, planet: &Planet) {
        self.shadow_table.clear();
        let sun_view = match View::new(
            nalgebra::Vector3::zeros(),
            planet.position(),
            planet.body_north(),
            planet.radius(),
            0.0,
        ) {
            Ok(view) => view,
            Err(e) => {
                log::warn!("No ring shadow for {}: {}", planet.body(), e);
                return;
            }
        };
        let planet_distance = sun_view.dist_to_plane();

        let is_in_shadow = |lon: f64, r: f64| {
            let p = planet.planetocentric_to_xyz(0.0, lon, r);
            let pix = sun_view.xyz_to_pixel(&p);
            pix.depth > planet_distance && pix.x * pix.x + pix.y * pix.y < 1.0
        };

        let d_angle = std::f64::consts::PI / SHADOW_TABLE_SIZE as f64;
        let radii = self.transparency.values.len();
        let mut table = Vec::with_capacity(SHADOW_TABLE_SIZE);
        let mut start = 0;

        for step in 0..SHADOW_TABLE_SIZE {
            let angle = std::f64::consts::PI - step as f64 * d_angle;
            let lon = self.sun_lon + angle;
            let hit = (start..radii).find(|&j| is_in_shadow(lon, self.transparency.radius(j)));
            // The first longitude with no shadow at any radius ends the table;
            // past its last entry the shadow edge is 0
            let Some(j) = hit else {
                break;
            };
            table.push((angle.cos(), self.transparency.radius(j)));
            start = j;
        }

        log::debug!(
            "Ring shadow table: {} entries, anti-solar shadow radius {:.3}",
            table.len(),
            table.first().map(|e| e.1).unwrap_or(0.0)
        );
        self.shadow_table = table;
    }

    /// Outer edge of the planet's shadow on the ring at a longitude whose
    /// angle from the sub-solar meridian has cosine `cos_lon`; 0 where
    /// there is no shadow
    fn shadow_edge(&self, cos_lon: f64) -> f64 {
        let Some(i) = self.shadow_table.iter().position(|&(c, _)| c > cos_lon) else {
            return 0.0;
        };
        if i == 0 {
            return self.shadow_table[0].1;
        }
        let (c0, r0) = self.shadow_table[i - 1];
        let (c1, r1) = self.shadow_table[i];
        let frac = (cos_lon - c0) / (c1 - c0);
        r0 + frac * (r1 - r0)
    }

    fn windowed(&self, profile: &Profile, lon: f64, r: f64) -> f64 {
        let cos_lon = (lon - self.sun_lon).cos();
        if cos_lon > RING_SHADOW_COS_LIMIT {
            return profile.average(r);
        }
        profile.shadowed_average(r, self.shadow_edge(cos_lon), self.shade)
    }

    /// Ring brightness at (`lon`, `r`) seen from `side`, including the
    /// planet's shadow; -1 outside the ring
    pub fn brightness(&self, lon: f64, r: f64, side: RingSide) -> f64 {
        match side {
            RingSide::Lit => self.windowed(&self.brightness, lon, r),
            RingSide::Unlit => {
                if self.transparency(r) == 1.0 {
                    0.0
                } else {
                    self.windowed(&self.transparency, lon, r)
                }
            }
        }
    }

    /// Window-averaged transparency at radius `r`; -1 outside the ring
    pub fn transparency(&self, r: f64) -> f64 {
        self.transparency.average(r)
    }

    /// Ring radius whose shadow falls on the planet surface at planetocentric
    /// (`lat`, `lon`), or -1 if the point is on the sunward side of the ring
    /// plane
    pub fn shadow_radius_at(&self, lat: f64, lon: f64) -> f64 {
        if self.sun_lat * lat >= 0.0 {
            return -1.0;
        }
        let (sin_lat, cos_lat) = lat.sin_cos();
        let (sin_lon, cos_lon) = lon.sin_cos();
        let (x, y, z) = (cos_lat * cos_lon, cos_lat * sin_lon, sin_lat);

        let [sx, sy, sz] = self.sun_dir;
        let dist = z / sz;
        let dx = x - sx * dist;
        let dy = y - sy * dist;
        dx.hypot(dy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::{Body, Planet};
    use approx::assert_relative_eq;
    use nalgebra::Vector3;

    fn flat_ring(sun_lat: f64) -> Ring {
        Ring::new(1.5, 2.5, 1.0, &[0.8; 50], &[0.3; 50], 0.0, sun_lat, 0.4).unwrap()
    }

    #[test]
    fn test_empty_profiles_are_rejected() {
        assert!(Ring::new(1.5, 2.5, 1.0, &[], &[0.3], 0.0, 0.1, 0.3).is_err());
        assert!(Ring::new(2.5, 1.5, 1.0, &[0.5], &[0.3], 0.0, 0.1, 0.3).is_err());
    }

    #[test]
    fn test_values_inside_and_outside() {
        let ring = flat_ring(0.2);
        assert_relative_eq!(ring.transparency(2.0), 0.3, epsilon = 1e-12);
        assert_relative_eq!(
            ring.brightness(0.0, 2.0, RingSide::Lit),
            0.8 * 0.2f64.cos(),
            epsilon = 1e-12
        );
        assert_eq!(ring.transparency(10.0), -1.0);
        // Inner padding clears toward the planet
        assert!(ring.transparency(0.5) > ring.transparency(1.4));
        assert!(ring.outer_radius() > 2.5);
    }

    #[test]
    fn test_padding_tapers_outer_edge() {
        let ring = flat_ring(0.0);
        let edge = ring.outer_radius() - 1e-6;
        assert!(ring.transparency(edge) > 0.9);
        assert!(ring.brightness(0.0, edge, RingSide::Lit) < 0.1);
    }

    #[test]
    fn test_shadow_radius_same_side_is_sentinel() {
        let ring = flat_ring(0.3);
        for lat in [0.1, 0.5, 1.2] {
            for lon in [-2.0, 0.0, 1.0, 3.0] {
                assert_eq!(ring.shadow_radius_at(lat, lon), -1.0);
            }
        }
        let south = flat_ring(-0.3);
        assert_eq!(south.shadow_radius_at(-0.4, 1.0), -1.0);
        assert!(south.shadow_radius_at(0.4, 1.0) >= 0.0);
    }

    #[test]
    fn test_shadow_radius_follows_sun_ray() {
        let sun_lat: f64 = 0.3;
        let ring = flat_ring(sun_lat);
        // A point on the southern sub-solar meridian looks up the sun ray to the ring plane
        let lat: f64 = -0.2;
        let r = ring.shadow_radius_at(lat, 0.0);
        let expected = lat.cos() - sun_lat.cos() * lat.sin() / sun_lat.sin();
        assert_relative_eq!(r, expected, epsilon = 1e-12);
        assert!(r > 1.0);
    }

    #[test]
    fn test_window_grows_with_pixel_size() {
        let mut ring = flat_ring(0.1);
        ring.set_dist_per_pixel(0.2);
        assert_eq!(ring.brightness.window, 6);
        // A flat profile stays flat under averaging
        assert_relative_eq!(ring.transparency(2.0), 0.3, epsilon = 1e-12);
    }

    #[test]
    fn test_shadow_table_and_full_shadow_brightness() {
        let planet = Planet::with_default_orientation(
            Body::Saturn,
            Vector3::new(9.0, 2.0, 0.5),
            crate::constants::J2000,
        );
        let (sun_lat, sun_lon, _) = planet.xyz_to_planetocentric(&Vector3::zeros());
        let mut ring = Ring::new(1.2, 2.3, 1.0, &[0.7; 80], &[0.4; 80], sun_lon, sun_lat, 0.25)
            .unwrap();
        ring.build_shadow_radius_table(&planet);
        assert!(!ring.shadow_table.is_empty());

        let anti = sun_lon + std::f64::consts::PI;
        let r = 1.25;
        let lit = ring.brightness.average(r);
        let shadowed = ring.brightness(anti, r, RingSide::Lit);
        assert_relative_eq!(shadowed, lit * 0.25, epsilon = 1e-12);
        // Toward the sun there is no shadow
        assert_relative_eq!(ring.brightness(sun_lon, r, RingSide::Lit), lit, epsilon = 1e-12);
    }

    #[test]
    fn test_shadow_table_stops_where_the_shadow_ends() {
        let planet = Planet::with_default_orientation(
            Body::Saturn,
            Vector3::new(9.0, 2.0, 0.5),
            crate::constants::J2000,
        );
        let (sun_lat, sun_lon, _) = planet.xyz_to_planetocentric(&Vector3::zeros());
        let mut ring = Ring::new(1.2, 2.3, 1.0, &[0.7; 80], &[0.4; 80], sun_lon, sun_lat, 0.25)
            .unwrap();
        ring.build_shadow_radius_table(&planet);

        // The shadow covers only the longitudes behind the planet
        assert!(ring.shadow_table.len() < SHADOW_TABLE_SIZE);

        // Every entry is a radius actually hidden from the sun
        let sun_view = View::new(
            Vector3::zeros(),
            planet.position(),
            planet.body_north(),
            planet.radius(),
            0.0,
        )
        .unwrap();
        for &(cos_angle, r) in &ring.shadow_table {
            let lon = sun_lon + cos_angle.acos();
            let pix = sun_view.xyz_to_pixel(&planet.planetocentric_to_xyz(0.0, lon, r));
            assert!(pix.depth > sun_view.dist_to_plane());
            assert!(pix.x * pix.x + pix.y * pix.y < 1.0, "r {} at cos {}", r, cos_angle);
        }

        let (last_cos, _) = *ring.shadow_table.last().unwrap();
        assert_eq!(ring.shadow_edge(last_cos + 1e-6), 0.0);
    }

    #[test]
    fn test_pole_toward_sun_leaves_no_shadow_table() {
        let mut orientation = crate::body::BodyOrientation::for_body(Body::Saturn);
        orientation.pole_ra = 0.0;
        orientation.pole_dec = 0.0;
        orientation.pole_ra_rate = 0.0;
        orientation.pole_dec_rate = 0.0;
        // Pole along +x, the sun-to-planet direction
        let planet = Planet::new(
            Body::Saturn,
            Vector3::new(9.5, 0.0, 0.0),
            orientation,
            crate::constants::J2000,
        );
        let (sun_lat, sun_lon, _) = planet.xyz_to_planetocentric(&Vector3::zeros());
        let mut ring = Ring::saturn(sun_lon, sun_lat, 0.3).unwrap();
        ring.build_shadow_radius_table(&planet);
        assert!(ring.shadow_table.is_empty());
        let r = 1.5;
        assert_relative_eq!(
            ring.brightness(sun_lon + std::f64::consts::PI, r, RingSide::Lit),
            ring.brightness.average(r),
            epsilon = 1e-12
        );
    }
}
