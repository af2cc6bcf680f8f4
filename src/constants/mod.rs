//! Constants module for rendering and body geometry

use std::f64::consts::PI;

// Astronomical distances
/// Astronomical Unit in kilometers
pub const AU_KM: f64 = 149_597_870.700;
/// Solar equatorial radius in kilometers
pub const SUN_RADIUS_KM: f64 = 696_000.0;
/// Distance used to push a direction out to "infinity" when converting it to a position (AU)
pub const FAR_DISTANCE: f64 = 1.0e6;

// Time constants
/// Seconds in a day
pub const DAY_S: f64 = 86_400.0;
/// J2000.0 epoch as Julian date
pub const J2000: f64 = 2_451_545.0;
/// Days per Julian century
pub const JULIAN_CENTURY: f64 = 36_525.0;
/// Unix epoch (1970-01-01T00:00:00Z) as Julian date
pub const UNIX_EPOCH_JD: f64 = 2_440_587.5;
/// Speed of light in AU/day
pub const C_AUDAY: f64 = 299_792.458 * DAY_S / AU_KM;

// Angles
/// Degrees to radians conversion factor
pub const DEG2RAD: f64 = PI / 180.0;
/// Radians to degrees conversion factor
pub const RAD2DEG: f64 = 180.0 / PI;
/// Tau (2*PI) for full circle
pub const TAU: f64 = 2.0 * PI;

/// Right ascension of the north galactic pole (J2000), radians
pub const GALACTIC_NORTH_RA: f64 = 192.859_48 * DEG2RAD;
/// Declination of the north galactic pole (J2000), radians
pub const GALACTIC_NORTH_DEC: f64 = 27.128_25 * DEG2RAD;

// Saturn's rings
/// Inner edge of the ring profile tables, km
pub const SATURN_RING_INNER_KM: f64 = 74_270.580_913;
/// Outer edge of the ring profile tables, km
pub const SATURN_RING_OUTER_KM: f64 = 140_478.924_731;
/// Saturn's radius used to normalise the ring tables, km
pub const SATURN_RING_PLANET_KM: f64 = 60_330.0;
/// Outer ring radius over planet radius; scales the apparent size of a ringed body
pub const RING_EXTENT_FACTOR: f64 = 2.321_66;
/// Samples used to taper the ring profiles to zero beyond the outer edge
pub const RING_OUTER_PADDING: usize = 20;
/// Samples used to taper the ring profiles beyond the inner edge
pub const RING_INNER_PADDING: usize = 100;
/// Longitude samples in the planet-shadow-on-ring table
pub const SHADOW_TABLE_SIZE: usize = 180;
/// cos(lon - sun_lon) above which a ring point can't be in the planet's shadow
pub const RING_SHADOW_COS_LIMIT: f64 = -0.45;
/// Colour of fully lit ring material
pub const RING_COLOR: [u8; 3] = [236, 218, 180];

// Photometry
/// Entries in the cosine -> limb darkening lookup table
pub const PHOTO_TABLE_SIZE: usize = 1000;
/// Default Minnaert exponent for limb darkening
pub const DEFAULT_LIMB_DARKENING: f64 = 0.3;
/// Exponent of the cosine falloff around the specular highlight
pub const SPECULAR_EXPONENT: i32 = 50;
/// Fraction of the solar disc that must be covered for a full-strength shadow
pub const PENUMBRA_FULL_OCCLUSION: f64 = 0.5;

// Sun glow
/// The sun's glare extends this many disc radii from its centre
pub const SUN_GLOW_RADII: f64 = 28.0;
/// Overall scale of the glare brightness
pub const SUN_GLOW_SCALE: f64 = 0.05;
/// Constant term of the glare angular modulation
pub const SUN_GLOW_BASE: f64 = 19.0;
/// Number of spikes in the glare starburst
pub const SUN_GLOW_SPIKES: f64 = 12.0;
/// e-folding distance of the glare, in disc radii
pub const SUN_GLOW_FALLOFF: f64 = 5.0;

// Maps
/// Smallest width of a flat-colour fallback map
pub const MIN_FALLBACK_MAP_WIDTH: usize = 128;
