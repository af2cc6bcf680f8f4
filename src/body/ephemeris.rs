//! Ephemeris interface
//!
//! The renderer treats the orbital solver as a black box: anything that can
//! report a body's heliocentric equatorial position for a Julian date can
//! drive a frame. [`TableEphemeris`] is a simple implementation backed by
//! tabulated states, used by the command line tool and in tests.

use std::collections::HashMap;

use nalgebra::Vector3;

use super::{Body, BodyOrientation, Planet};
use crate::{PlanetariumError, Result};

/// Source of body positions and orientation constants
pub trait Ephemeris: Sync {
    /// Heliocentric equatorial position of `body` at `julian_day`, in AU
    fn position(&self, body: Body, julian_day: f64) -> Result<Vector3<f64>>;

    /// Orientation constants for `body`
    fn orientation(&self, body: Body) -> BodyOrientation {
        BodyOrientation::for_body(body)
    }

    /// Build the rotation model of `body` at `julian_day`
    fn planet(&self, body: Body, julian_day: f64) -> Result<Planet> {
        let position = self.position(body, julian_day)?;
        Ok(Planet::new(body, position, self.orientation(body), julian_day))
    }
}

/// Tabulated state of one body
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EphemerisEntry {
    pub body: Body,
    /// Heliocentric equatorial position at the table epoch, AU
    pub position: [f64; 3],
    /// Velocity, AU/day; positions are extrapolated linearly from the epoch
    #[serde(default)]
    pub velocity: [f64; 3],
    /// Orientation override; defaults to the built-in constants
    #[serde(default)]
    pub orientation: Option<BodyOrientation>,
}

/// Ephemeris backed by a table of body states at a single epoch
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct TableEphemeris {
    /// Julian date the tabulated states refer to
    pub epoch: f64,
    entries: HashMap<Body, EphemerisEntry>,
}

impl TableEphemeris {
    /// Create an empty table for `epoch`
    pub fn new(epoch: f64) -> Self {
        Self {
            epoch,
            entries: HashMap::new(),
        }
    }

    /// Create a table from a list of entries
    pub fn from_entries(epoch: f64, entries: impl IntoIterator<Item = EphemerisEntry>) -> Self {
        let mut table = Self::new(epoch);
        for entry in entries {
            table.entries.insert(entry.body, entry);
        }
        table
    }

    /// Add or replace a body at a fixed position
    pub fn insert(&mut self, body: Body, position: Vector3<f64>) {
        self.entries.insert(
            body,
            EphemerisEntry {
                body,
                position: position.into(),
                velocity: [0.0; 3],
                orientation: None,
            },
        );
    }

    /// Add or replace a body with a velocity
    pub fn insert_moving(&mut self, body: Body, position: Vector3<f64>, velocity: Vector3<f64>) {
        self.insert(body, position);
        if let Some(entry) = self.entries.get_mut(&body) {
            entry.velocity = velocity.into();
        }
    }

    /// Override the orientation constants of a body already in the table
    pub fn set_orientation(&mut self, body: Body, orientation: BodyOrientation) -> Result<()> {
        let entry = self
            .entries
            .get_mut(&body)
            .ok_or_else(|| PlanetariumError::BodyNotFound(body.to_string()))?;
        entry.orientation = Some(orientation);
        Ok(())
    }

    /// Bodies present in the table, in body order
    pub fn bodies(&self) -> Vec<Body> {
        let mut bodies: Vec<Body> = self.entries.keys().copied().collect();
        bodies.sort();
        bodies
    }

    pub fn contains(&self, body: Body) -> bool {
        self.entries.contains_key(&body)
    }
}

impl Ephemeris for TableEphemeris {
    fn position(&self, body: Body, julian_day: f64) -> Result<Vector3<f64>> {
        if body == Body::Sun && !self.entries.contains_key(&Body::Sun) {
            return Ok(Vector3::zeros());
        }
        let entry = self.entries.get(&body).ok_or_else(|| {
            PlanetariumError::Ephemeris(format!("{} is not in the ephemeris table", body))
        })?;
        let dt = julian_day - self.epoch;
        Ok(Vector3::from(entry.position) + Vector3::from(entry.velocity) * dt)
    }

    fn orientation(&self, body: Body) -> BodyOrientation {
        self.entries
            .get(&body)
            .and_then(|entry| entry.orientation)
            .unwrap_or_else(|| BodyOrientation::for_body(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_sun_defaults_to_origin() {
        let table = TableEphemeris::new(2_451_545.0);
        assert_eq!(table.position(Body::Sun, 2_451_600.0).unwrap(), Vector3::zeros());
    }

    #[test]
    fn test_missing_body_is_an_error() {
        let table = TableEphemeris::new(2_451_545.0);
        let err = table.position(Body::Mars, 2_451_545.0).unwrap_err();
        assert!(matches!(err, PlanetariumError::Ephemeris(_)));
    }

    #[test]
    fn test_linear_extrapolation() {
        let mut table = TableEphemeris::new(100.0);
        table.insert_moving(
            Body::Earth,
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(0.0, 0.0172, 0.0),
        );
        let p = table.position(Body::Earth, 110.0).unwrap();
        assert_relative_eq!(p.y, 0.172, epsilon = 1e-12);
    }

    #[test]
    fn test_orientation_override() {
        let mut table = TableEphemeris::new(0.0);
        table.insert(Body::Moon, Vector3::new(1.0, 0.0, 0.0));
        let mut custom = BodyOrientation::for_body(Body::Moon);
        custom.radius_km = 2000.0;
        table.set_orientation(Body::Moon, custom).unwrap();
        assert_eq!(table.orientation(Body::Moon).radius_km, 2000.0);
        assert!(table.set_orientation(Body::Io, custom).is_err());
    }

    #[test]
    fn test_table_from_json() {
        let json = r#"{
            "epoch": 2451545.0,
            "entries": {
                "mars": {"body": "mars", "position": [1.5, 0.0, 0.0]}
            }
        }"#;
        let table: TableEphemeris = serde_json::from_str(json).unwrap();
        let planet = table.planet(Body::Mars, 2_451_545.0).unwrap();
        assert_eq!(planet.position(), Vector3::new(1.5, 0.0, 0.0));
        assert_eq!(table.bodies(), vec![Body::Mars]);
    }
}
