//! Static orientation and shape constants for each body
//!
//! Pole directions and prime meridians follow the IAU working group
//! conventions: the pole is given as right ascension/declination in the
//! J2000 equatorial frame (with linear drift per Julian century) and the
//! prime meridian as an angle W = W0 + Wdot * d measured along the body's
//! equator from the ascending node on the Earth's equator, where d is days
//! since J2000.

use super::Body;

/// Orientation, shape and orbit constants for a single body
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BodyOrientation {
    /// Right ascension of the north pole at J2000, degrees
    pub pole_ra: f64,
    /// Drift of the pole right ascension, degrees per Julian century
    #[serde(default)]
    pub pole_ra_rate: f64,
    /// Declination of the north pole at J2000, degrees
    pub pole_dec: f64,
    /// Drift of the pole declination, degrees per Julian century
    #[serde(default)]
    pub pole_dec_rate: f64,
    /// Prime meridian angle at J2000, degrees
    pub prime_meridian: f64,
    /// Spin rate, degrees per day (negative for retrograde rotation)
    pub rotation_rate: f64,
    /// Equatorial radius, km
    pub radius_km: f64,
    /// (equatorial - polar) / equatorial radius
    #[serde(default)]
    pub flattening: f64,
    /// Orbital period, days (0 for the Sun)
    #[serde(default)]
    pub period_days: f64,
    /// 1 if longitude increases to the east (e.g. Earth), -1 if to the west (e.g. Mars)
    #[serde(default = "default_flipped")]
    pub flipped: i8,
}

fn default_flipped() -> i8 {
    1
}

#[allow(clippy::too_many_arguments)]
const fn orient(
    pole_ra: f64,
    pole_ra_rate: f64,
    pole_dec: f64,
    pole_dec_rate: f64,
    prime_meridian: f64,
    rotation_rate: f64,
    radius_km: f64,
    flattening: f64,
    period_days: f64,
    flipped: i8,
) -> BodyOrientation {
    BodyOrientation {
        pole_ra,
        pole_ra_rate,
        pole_dec,
        pole_dec_rate,
        prime_meridian,
        rotation_rate,
        radius_km,
        flattening,
        period_days,
        flipped,
    }
}

impl BodyOrientation {
    /// Default constants for a body
    pub fn for_body(body: Body) -> Self {
        match body {
            Body::Sun => orient(286.13, 0.0, 63.87, 0.0, 84.176, 14.1844, 696_000.0, 0.0, 0.0, 1),
            Body::Mercury => orient(
                281.0097, -0.0328, 61.4143, -0.0049, 329.5469, 6.138_502_5, 2439.7, 0.0, 87.969, -1,
            ),
            Body::Venus => orient(
                272.76, 0.0, 67.16, 0.0, 160.20, -1.481_368_8, 6051.8, 0.0, 224.701, 1,
            ),
            Body::Earth => orient(
                0.0, -0.641, 90.0, -0.557, 190.147, 360.985_623_5, 6378.14, 0.003_353, 365.256, 1,
            ),
            Body::Moon => orient(
                269.9949, 0.0031, 66.5392, 0.0130, 38.3213, 13.176_358_15, 1737.4, 0.0012, 27.3217,
                1,
            ),
            Body::Mars => orient(
                317.681_43, -0.1061, 52.886_50, -0.0609, 176.630, 350.891_982_26, 3396.19, 0.005_89,
                686.98, -1,
            ),
            Body::Phobos => orient(
                317.68, -0.108, 52.90, -0.061, 35.06, 1128.844_585, 11.1, 0.0, 0.318_91, -1,
            ),
            Body::Deimos => orient(
                316.65, -0.108, 53.52, -0.061, 79.41, 285.161_897, 6.2, 0.0, 1.262_44, -1,
            ),
            Body::Jupiter => orient(
                268.056_595, -0.006_499, 64.495_303, 0.002_413, 284.95, 870.536, 71_492.0,
                0.064_87, 4332.589, -1,
            ),
            Body::Io => orient(
                268.05, -0.009, 64.50, 0.003, 200.39, 203.488_955_3, 1821.6, 0.0, 1.769_138, -1,
            ),
            Body::Europa => orient(
                268.08, -0.009, 64.51, 0.003, 36.022, 101.374_723_5, 1560.8, 0.0, 3.551_181, -1,
            ),
            Body::Ganymede => orient(
                268.20, -0.009, 64.57, 0.003, 44.064, 50.317_608_1, 2631.2, 0.0, 7.154_553, -1,
            ),
            Body::Callisto => orient(
                268.72, -0.009, 64.83, 0.003, 259.51, 21.571_071_5, 2410.3, 0.0, 16.689_018, -1,
            ),
            Body::Saturn => orient(
                40.589, -0.036, 83.537, -0.004, 38.90, 810.793_902_4, 60_268.0, 0.097_96,
                10_759.22, -1,
            ),
            Body::Mimas => orient(
                40.66, -0.036, 83.52, -0.004, 333.46, 381.994_555, 198.2, 0.0, 0.942_422, -1,
            ),
            Body::Enceladus => orient(
                40.66, -0.036, 83.52, -0.004, 6.32, 262.731_899_6, 252.1, 0.0, 1.370_218, -1,
            ),
            Body::Tethys => orient(
                40.66, -0.036, 83.52, -0.004, 8.95, 190.697_908_5, 531.1, 0.0, 1.887_802, -1,
            ),
            Body::Dione => orient(
                40.66, -0.036, 83.52, -0.004, 357.6, 131.534_931_6, 561.4, 0.0, 2.736_915, -1,
            ),
            Body::Rhea => orient(
                40.38, -0.036, 83.55, -0.004, 235.16, 79.690_047_8, 763.8, 0.0, 4.5175, -1,
            ),
            Body::Titan => orient(
                39.4827, 0.0, 83.4279, 0.0, 186.5855, 22.576_976_8, 2575.0, 0.0, 15.945_421, -1,
            ),
            Body::Hyperion => orient(
                40.6, 0.0, 83.5, 0.0, 0.0, 16.92, 135.0, 0.0, 21.276_609, -1,
            ),
            Body::Iapetus => orient(
                318.16, -3.949, 75.03, -1.143, 355.2, 4.537_957_2, 734.5, 0.0, 79.330_183, -1,
            ),
            Body::Phoebe => orient(
                356.90, 0.0, 77.80, 0.0, 178.58, 931.639, 106.5, 0.0, 550.48, -1,
            ),
            Body::Uranus => orient(
                257.311, 0.0, -15.175, 0.0, 203.81, -501.160_092_8, 25_559.0, 0.022_93,
                30_685.4, 1,
            ),
            Body::Miranda => orient(
                257.43, 0.0, -15.08, 0.0, 30.70, -254.690_689_2, 235.8, 0.0, 1.413_479, 1,
            ),
            Body::Ariel => orient(
                257.43, 0.0, -15.10, 0.0, 156.22, -142.835_668_1, 578.9, 0.0, 2.520_379, 1,
            ),
            Body::Umbriel => orient(
                257.43, 0.0, -15.10, 0.0, 108.05, -86.868_892_3, 584.7, 0.0, 4.144_177, 1,
            ),
            Body::Titania => orient(
                257.43, 0.0, -15.10, 0.0, 77.74, -41.351_431_6, 788.9, 0.0, 8.705_872, 1,
            ),
            Body::Oberon => orient(
                257.43, 0.0, -15.10, 0.0, 6.77, -26.739_493_2, 761.4, 0.0, 13.463_239, 1,
            ),
            Body::Neptune => orient(
                299.36, 0.0, 43.46, 0.0, 253.18, 536.312_849_2, 24_764.0, 0.017_08, 60_189.0, -1,
            ),
            Body::Triton => orient(
                299.36, 0.0, 41.17, 0.0, 296.53, -61.257_263_7, 1353.4, 0.0, 5.876_854, 1,
            ),
            Body::Nereid => orient(
                299.36, 0.0, 43.46, 0.0, 0.0, 1.0, 170.0, 0.0, 360.136_19, -1,
            ),
            Body::Pluto => orient(
                132.993, 0.0, -6.163, 0.0, 302.695, 56.362_522_5, 1188.3, 0.0, 90_560.0, 1,
            ),
            Body::Charon => orient(
                132.993, 0.0, -6.163, 0.0, 122.695, 56.362_522_5, 606.0, 0.0, 6.387_23, 1,
            ),
        }
    }

    /// Pole right ascension and declination at `jd`, radians
    pub fn pole_at(&self, jd: f64) -> (f64, f64) {
        let t = (jd - crate::constants::J2000) / crate::constants::JULIAN_CENTURY;
        (
            (self.pole_ra + self.pole_ra_rate * t).to_radians(),
            (self.pole_dec + self.pole_dec_rate * t).to_radians(),
        )
    }

    /// Prime meridian angle at `jd`, radians
    pub fn prime_meridian_at(&self, jd: f64) -> f64 {
        let d = jd - crate::constants::J2000;
        (self.prime_meridian + self.rotation_rate * d)
            .rem_euclid(360.0)
            .to_radians()
    }

    /// Equatorial radius in AU
    pub fn radius_au(&self) -> f64 {
        self.radius_km / crate::constants::AU_KM
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::J2000;
    use approx::assert_relative_eq;

    #[test]
    fn test_every_body_has_a_radius() {
        for body in Body::ALL {
            let o = BodyOrientation::for_body(body);
            assert!(o.radius_km > 0.0, "{} has no radius", body);
            assert!(o.flipped == 1 || o.flipped == -1);
            assert!((0.0..0.2).contains(&o.flattening));
        }
    }

    #[test]
    fn test_earth_pole_is_celestial_pole_at_j2000() {
        let (_, dec) = BodyOrientation::for_body(Body::Earth).pole_at(J2000);
        assert_relative_eq!(dec, std::f64::consts::FRAC_PI_2, epsilon = 1e-12);
    }

    #[test]
    fn test_earth_rotates_once_per_sidereal_day() {
        let earth = BodyOrientation::for_body(Body::Earth);
        let w0 = earth.prime_meridian_at(J2000);
        let w1 = earth.prime_meridian_at(J2000 + 0.997_269_57);
        assert!((w1 - w0).abs() < 1e-4, "{} vs {}", w0, w1);
    }

    #[test]
    fn test_orientation_from_json_defaults() {
        let json = r#"{"pole_ra": 10.0, "pole_dec": 80.0, "prime_meridian": 0.0,
                       "rotation_rate": 100.0, "radius_km": 500.0}"#;
        let o: BodyOrientation = serde_json::from_str(json).unwrap();
        assert_eq!(o.flipped, 1);
        assert_eq!(o.flattening, 0.0);
        assert_eq!(o.pole_ra_rate, 0.0);
    }
}
