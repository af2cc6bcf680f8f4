//! Rotation model of a body at a single instant
//!
//! A [`Planet`] pairs a body's heliocentric position with its orientation at
//! one Julian date and converts between heliocentric equatorial XYZ (AU) and
//! body-fixed latitude/longitude.
//!
//! ## Longitude convention
//!
//! All longitudes produced and consumed here are planetocentric east
//! longitudes in radians, wrapped to [-PI, PI). Bodies whose customary
//! longitudes increase to the west carry `flipped == -1`; the conversion to
//! that display convention happens at the edges (projections, markers).
//!
//! ## Latitudes
//!
//! Planetocentric latitude is the angle at the body's centre; planetographic
//! latitude is the angle of the local normal to the reference ellipsoid.
//! They coincide for spherical bodies.

use nalgebra::{Matrix3, Vector3};

use super::{Body, BodyOrientation};
use crate::constants::{GALACTIC_NORTH_DEC, GALACTIC_NORTH_RA};
use crate::coordinates::{matrix_from_rows, to_lat_lon, unit_vector, wrap_longitude};

/// A body's position and orientation at one instant
#[derive(Debug, Clone)]
pub struct Planet {
    body: Body,
    orientation: BodyOrientation,
    julian_day: f64,
    /// Heliocentric equatorial position, AU
    position: Vector3<f64>,
    /// Heliocentric equatorial -> body-fixed rotation
    rotation: Matrix3<f64>,
    /// Body-fixed -> heliocentric equatorial rotation
    inverse: Matrix3<f64>,
}

impl Planet {
    /// Create a planet at `position` (heliocentric AU) for the given date
    pub fn new(
        body: Body,
        position: Vector3<f64>,
        orientation: BodyOrientation,
        julian_day: f64,
    ) -> Self {
        let rotation = Self::body_rotation(&orientation, julian_day);
        Self {
            body,
            orientation,
            julian_day,
            position,
            rotation,
            inverse: rotation.transpose(),
        }
    }

    /// Create a planet with the default orientation constants for `body`
    pub fn with_default_orientation(body: Body, position: Vector3<f64>, julian_day: f64) -> Self {
        Self::new(body, position, BodyOrientation::for_body(body), julian_day)
    }

    /// Rotation taking equatorial vectors into the body-fixed frame
    ///
    /// The body Z axis is the north pole, X points at the prime meridian,
    /// which lies W radians east of the node Q of the body equator on the
    /// Earth's equator.
    fn body_rotation(orientation: &BodyOrientation, julian_day: f64) -> Matrix3<f64> {
        let (ra, dec) = orientation.pole_at(julian_day);
        let w = orientation.prime_meridian_at(julian_day);

        let pole = unit_vector(dec, ra);
        let node = Vector3::new(-ra.sin(), ra.cos(), 0.0);
        let quadrature = pole.cross(&node);

        let (sin_w, cos_w) = w.sin_cos();
        let x_axis = node * cos_w + quadrature * sin_w;
        let y_axis = pole.cross(&x_axis);

        matrix_from_rows(&x_axis, &y_axis, &pole)
    }

    pub fn body(&self) -> Body {
        self.body
    }

    pub fn primary(&self) -> Body {
        self.body.primary()
    }

    pub fn orientation(&self) -> &BodyOrientation {
        &self.orientation
    }

    pub fn julian_day(&self) -> f64 {
        self.julian_day
    }

    /// Heliocentric equatorial position, AU
    pub fn position(&self) -> Vector3<f64> {
        self.position
    }

    /// Equatorial radius, AU
    pub fn radius(&self) -> f64 {
        self.orientation.radius_au()
    }

    pub fn flattening(&self) -> f64 {
        self.orientation.flattening
    }

    pub fn flipped(&self) -> f64 {
        f64::from(self.orientation.flipped)
    }

    pub fn period(&self) -> f64 {
        self.orientation.period_days
    }

    /// Heliocentric equatorial -> body-fixed rotation matrix
    pub fn rotation(&self) -> &Matrix3<f64> {
        &self.rotation
    }

    /// Rotate a heliocentric direction into the body-fixed frame
    pub fn to_body_frame(&self, v: &Vector3<f64>) -> Vector3<f64> {
        self.rotation * v
    }

    /// Rotate a body-fixed direction into the heliocentric frame
    pub fn from_body_frame(&self, v: &Vector3<f64>) -> Vector3<f64> {
        self.inverse * v
    }

    /// Unit vector along the body's rotation axis
    pub fn body_north(&self) -> Vector3<f64> {
        self.from_body_frame(&Vector3::z())
    }

    /// Unit normal of the orbit plane given the heliocentric `velocity`;
    /// falls back to the body's pole when the motion is radial
    pub fn orbital_north(&self, velocity: &Vector3<f64>) -> Vector3<f64> {
        self.position
            .cross(velocity)
            .try_normalize(1e-15)
            .unwrap_or_else(|| self.body_north())
    }

    /// Unit vector toward the north galactic pole
    pub fn galactic_north(&self) -> Vector3<f64> {
        unit_vector(GALACTIC_NORTH_DEC, GALACTIC_NORTH_RA)
    }

    /// Planetocentric latitude, longitude and distance (in body radii) of a heliocentric point
    pub fn xyz_to_planetocentric(&self, p: &Vector3<f64>) -> (f64, f64, f64) {
        let v = self.to_body_frame(&(p - self.position));
        let (lat, lon) = to_lat_lon(&v);
        (lat, wrap_longitude(lon), v.norm() / self.radius())
    }

    /// Planetographic latitude and longitude of a heliocentric point
    pub fn xyz_to_planetographic(&self, p: &Vector3<f64>) -> (f64, f64) {
        let (lat, lon, _) = self.xyz_to_planetocentric(p);
        (self.centric_to_graphic(lat), lon)
    }

    /// Heliocentric position of a body-fixed planetocentric point; `radius` in body radii
    pub fn planetocentric_to_xyz(&self, lat: f64, lon: f64, radius: f64) -> Vector3<f64> {
        let v = unit_vector(lat, lon) * (radius * self.radius());
        self.position + self.from_body_frame(&v)
    }

    /// Heliocentric position of a body-fixed planetographic point; `radius` in body radii
    pub fn planetographic_to_xyz(&self, lat: f64, lon: f64, radius: f64) -> Vector3<f64> {
        self.planetocentric_to_xyz(self.graphic_to_centric(lat), lon, radius)
    }

    /// Distance from the centre to the reference ellipsoid at a planetographic latitude,
    /// in equatorial radii
    pub fn radius_at(&self, lat: f64) -> f64 {
        let f = self.flattening();
        if f == 0.0 {
            return 1.0;
        }
        let lat_c = self.graphic_to_centric(lat);
        let b = 1.0 - f;
        let e2 = 1.0 - b * b;
        b / (1.0 - e2 * lat_c.cos().powi(2)).sqrt()
    }

    /// Convert a planetocentric latitude to planetographic
    pub fn centric_to_graphic(&self, lat: f64) -> f64 {
        let ratio = (1.0 - self.flattening()).powi(2);
        lat.sin().atan2(lat.cos() * ratio)
    }

    /// Convert a planetographic latitude to planetocentric
    pub fn graphic_to_centric(&self, lat: f64) -> f64 {
        let ratio = (1.0 - self.flattening()).powi(2);
        (lat.sin() * ratio).atan2(lat.cos())
    }
}
