//! Radial profiles of Saturn's main rings
//!
//! The profiles are built from the major ring regions with representative
//! brightness and transparency for each, sampled from the outer edge
//! inward.

use crate::constants::{SATURN_RING_INNER_KM, SATURN_RING_OUTER_KM};

/// Default number of radial samples
pub const PROFILE_SAMPLES: usize = 660;

/// A ring region: (outer km, inner km, brightness, transparency)
const REGIONS: [(f64, f64, f64, f64); 9] = [
    // F ring
    (140_300.0, 140_060.0, 0.35, 0.80),
    // Roche division
    (140_060.0, 136_775.0, 0.02, 0.99),
    // A ring outside the Encke gap
    (136_775.0, 133_745.0, 0.62, 0.45),
    // Encke gap
    (133_745.0, 133_423.0, 0.08, 0.95),
    // Inner A ring
    (133_423.0, 122_170.0, 0.70, 0.35),
    // Cassini division
    (122_170.0, 117_580.0, 0.15, 0.88),
    // B ring
    (117_580.0, 92_000.0, 0.95, 0.08),
    // C ring
    (92_000.0, 74_658.0, 0.22, 0.90),
    // D ring
    (74_658.0, SATURN_RING_INNER_KM, 0.04, 0.99),
];

/// Brightness and transparency at ring radius `r_km`
fn sample(r_km: f64) -> (f64, f64) {
    REGIONS
        .iter()
        .find(|&&(outer, inner, _, _)| r_km <= outer && r_km > inner)
        .map(|&(_, _, b, t)| (b, t))
        .unwrap_or((0.0, 1.0))
}

/// Brightness and transparency profiles with `samples` entries each,
/// outermost first
pub fn profiles(samples: usize) -> (Vec<f64>, Vec<f64>) {
    let samples = samples.max(1);
    let dr = (SATURN_RING_OUTER_KM - SATURN_RING_INNER_KM) / samples as f64;
    (0..samples)
        .map(|i| sample(SATURN_RING_OUTER_KM - (i as f64 + 0.5) * dr))
        .unzip()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profiles_have_requested_length() {
        let (b, t) = profiles(PROFILE_SAMPLES);
        assert_eq!(b.len(), PROFILE_SAMPLES);
        assert_eq!(t.len(), PROFILE_SAMPLES);
        assert!(b.iter().all(|v| (0.0..=1.0).contains(v)));
        assert!(t.iter().all(|v| (0.0..=1.0).contains(v)));
    }

    #[test]
    fn test_b_ring_is_brighter_than_cassini_division() {
        let (b_ring, b_t) = sample(100_000.0);
        let (cassini, c_t) = sample(120_000.0);
        assert!(b_ring > cassini);
        assert!(b_t < c_t);
        assert_eq!(sample(139_000.0).1, 0.99);
    }
}
