//! Equirectangular (plate carrée) projection, optionally cropped to a
//! latitude/longitude box

use std::f64::consts::{FRAC_PI_2, PI};

use super::{Cartographic, Local, ProjectionFrame};
use crate::constants::TAU;
use crate::coordinates::wrap_longitude;
use crate::{PlanetariumError, Result};

/// Sub-region shown by a bounded rectangular map, radians
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MapBounds {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
}

impl MapBounds {
    pub fn validate(&self) -> Result<()> {
        let ok = self.lat_min < self.lat_max
            && self.lon_min < self.lon_max
            && self.lat_min >= -FRAC_PI_2
            && self.lat_max <= FRAC_PI_2
            && self.lon_max - self.lon_min <= TAU;
        if ok {
            Ok(())
        } else {
            Err(PlanetariumError::InvalidInput(format!(
                "invalid map bounds {:?}",
                self
            )))
        }
    }

    fn contains(&self, lat: f64, lon: f64) -> bool {
        (self.lat_min..=self.lat_max).contains(&lat) && (self.lon_min..=self.lon_max).contains(&lon)
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Rectangular {
    start_lon: f64,
    start_lat: f64,
    del_lon: f64,
    del_lat: f64,
    bounds: Option<MapBounds>,
}

impl Rectangular {
    pub fn new(frame: &ProjectionFrame, bounds: Option<MapBounds>) -> Self {
        let (start_lon, start_lat, map_width, map_height) = match &bounds {
            Some(b) => (b.lon_min, b.lat_max, b.lon_max - b.lon_min, b.lat_max - b.lat_min),
            None => (-PI, FRAC_PI_2, TAU, PI),
        };
        Self {
            start_lon,
            start_lat,
            del_lon: map_width / frame.width(),
            del_lat: map_height / frame.height(),
            bounds,
        }
    }
}

impl Cartographic for Rectangular {
    fn inverse(&self, _frame: &ProjectionFrame, x: f64, y: f64) -> Option<Local> {
        let lon = (x + 0.5) * self.del_lon + self.start_lon;
        let lat = self.start_lat - (y + 0.5) * self.del_lat;
        Some(Local::flat(lat, lon))
    }

    fn forward(&self, frame: &ProjectionFrame, lat: f64, lon: f64) -> Option<(f64, f64)> {
        let y = (self.start_lat - lat) / self.del_lat - 0.5;
        match &self.bounds {
            Some(b) => {
                // bounds may straddle the date line
                let lon = if lon < b.lon_min { lon + TAU } else { lon };
                if !b.contains(lat, lon) {
                    return None;
                }
                Some(((lon - self.start_lon) / self.del_lon - 0.5, y))
            }
            None => {
                let mut x = (wrap_longitude(lon) - self.start_lon) / self.del_lon - 0.5;
                if x < -0.5 {
                    x += frame.width();
                } else if x >= frame.width() - 0.5 {
                    x -= frame.width();
                }
                Some((x, y))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::{Projection, ProjectionKind};
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_pixel_centres() {
        let p = Projection::new(ProjectionKind::Rectangular, 1.0, 360, 180, 0.0).unwrap();
        let s = p.pixel_to_spherical(0.0, 0.0).unwrap();
        assert_relative_eq!(s.lon, (-179.5f64).to_radians(), epsilon = 1e-12);
        assert_relative_eq!(s.lat, 89.5f64.to_radians(), epsilon = 1e-12);
        let (x, y) = p.spherical_to_pixel(0.0, 0.0).unwrap();
        assert_relative_eq!(x, 179.5, epsilon = 1e-9);
        assert_relative_eq!(y, 89.5, epsilon = 1e-9);
    }

    #[test]
    fn test_bounded_map_covers_only_the_box() {
        let bounds = MapBounds {
            lat_min: 0.0,
            lat_max: 0.5,
            lon_min: 1.0,
            lon_max: 2.0,
        };
        let p = Projection::rectangular_with_bounds(1.0, 100, 50, bounds).unwrap();
        assert!(!p.is_wrap_around());
        let s = p.pixel_to_spherical(0.0, 49.0).unwrap();
        assert!(s.lon > 1.0 && s.lon < 1.02);
        assert!(s.lat > 0.0 && s.lat < 0.01);
        assert!(p.spherical_to_pixel(0.2, 0.0).is_none());
        let (x, y) = p.spherical_to_pixel(0.25, 1.5).unwrap();
        assert_relative_eq!(x, 49.5, epsilon = 1e-9);
        assert_relative_eq!(y, 24.5, epsilon = 1e-9);
    }

    #[test]
    fn test_invalid_bounds() {
        let bounds = MapBounds {
            lat_min: 0.5,
            lat_max: 0.0,
            lon_min: 1.0,
            lon_max: 2.0,
        };
        assert!(Projection::rectangular_with_bounds(1.0, 10, 10, bounds).is_err());
    }
}
