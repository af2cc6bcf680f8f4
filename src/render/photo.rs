//! Photometric response of a lit surface
//!
//! A Minnaert-style `mu^k` law: `mu` is the cosine between the surface
//! normal and the view direction, `k` the limb-darkening exponent. `k = 0`
//! gives a uniformly bright disc.

use crate::constants::PHOTO_TABLE_SIZE;

/// Brightness multiplier for a surface seen at cosine `mu`, clamped to zero
/// when the surface faces away
pub fn photo_function(mu: f64, k: f64) -> f64 {
    if mu <= 0.0 {
        0.0
    } else if mu >= 1.0 {
        1.0
    } else {
        mu.powf(k)
    }
}

/// Precomputed [`photo_function`] samples over `mu` in [0, 1]
#[derive(Debug, Clone)]
pub struct PhotoTable {
    values: Vec<f64>,
}

impl PhotoTable {
    pub fn new(k: f64) -> Self {
        let n = PHOTO_TABLE_SIZE;
        let values = (0..n)
            .map(|i| photo_function(i as f64 / (n - 1) as f64, k))
            .collect();
        Self { values }
    }

    /// Linearly interpolated table lookup
    pub fn lookup(&self, mu: f64) -> f64 {
        let n = self.values.len();
        let pos = mu.clamp(0.0, 1.0) * (n - 1) as f64;
        let i = (pos.floor() as usize).min(n - 2);
        let frac = pos - i as f64;
        self.values[i] * (1.0 - frac) + self.values[i + 1] * frac
    }
}
