//! Solar system bodies, their rotation models and the ephemeris interface

use std::fmt;
use std::str::FromStr;

use crate::PlanetariumError;

pub mod ephemeris;
pub mod orientation;
pub mod planet;

pub use ephemeris::{Ephemeris, EphemerisEntry, TableEphemeris};
pub use orientation::BodyOrientation;
pub use planet::Planet;

/// Enum representing the renderable solar system bodies
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Body {
    Sun,
    Mercury,
    Venus,
    Earth,
    Moon,
    Mars,
    Phobos,
    Deimos,
    Jupiter,
    Io,
    Europa,
    Ganymede,
    Callisto,
    Saturn,
    Mimas,
    Enceladus,
    Tethys,
    Dione,
    Rhea,
    Titan,
    Hyperion,
    Iapetus,
    Phoebe,
    Uranus,
    Miranda,
    Ariel,
    Umbriel,
    Titania,
    Oberon,
    Neptune,
    Triton,
    Nereid,
    Pluto,
    Charon,
}

impl Body {
    /// Every body, Sun first, then each planet followed by its moons
    pub const ALL: [Body; 34] = [
        Body::Sun,
        Body::Mercury,
        Body::Venus,
        Body::Earth,
        Body::Moon,
        Body::Mars,
        Body::Phobos,
        Body::Deimos,
        Body::Jupiter,
        Body::Io,
        Body::Europa,
        Body::Ganymede,
        Body::Callisto,
        Body::Saturn,
        Body::Mimas,
        Body::Enceladus,
        Body::Tethys,
        Body::Dione,
        Body::Rhea,
        Body::Titan,
        Body::Hyperion,
        Body::Iapetus,
        Body::Phoebe,
        Body::Uranus,
        Body::Miranda,
        Body::Ariel,
        Body::Umbriel,
        Body::Titania,
        Body::Oberon,
        Body::Neptune,
        Body::Triton,
        Body::Nereid,
        Body::Pluto,
        Body::Charon,
    ];

    /// Get the body's name as a string
    pub fn name(&self) -> &'static str {
        match self {
            Body::Sun => "Sun",
            Body::Mercury => "Mercury",
            Body::Venus => "Venus",
            Body::Earth => "Earth",
            Body::Moon => "Moon",
            Body::Mars => "Mars",
            Body::Phobos => "Phobos",
            Body::Deimos => "Deimos",
            Body::Jupiter => "Jupiter",
            Body::Io => "Io",
            Body::Europa => "Europa",
            Body::Ganymede => "Ganymede",
            Body::Callisto => "Callisto",
            Body::Saturn => "Saturn",
            Body::Mimas => "Mimas",
            Body::Enceladus => "Enceladus",
            Body::Tethys => "Tethys",
            Body::Dione => "Dione",
            Body::Rhea => "Rhea",
            Body::Titan => "Titan",
            Body::Hyperion => "Hyperion",
            Body::Iapetus => "Iapetus",
            Body::Phoebe => "Phoebe",
            Body::Uranus => "Uranus",
            Body::Miranda => "Miranda",
            Body::Ariel => "Ariel",
            Body::Umbriel => "Umbriel",
            Body::Titania => "Titania",
            Body::Oberon => "Oberon",
            Body::Neptune => "Neptune",
            Body::Triton => "Triton",
            Body::Nereid => "Nereid",
            Body::Pluto => "Pluto",
            Body::Charon => "Charon",
        }
    }

    /// The body this one orbits; the Sun for planets and for the Sun itself
    pub fn primary(&self) -> Body {
        match self {
            Body::Moon => Body::Earth,
            Body::Phobos | Body::Deimos => Body::Mars,
            Body::Io | Body::Europa | Body::Ganymede | Body::Callisto => Body::Jupiter,
            Body::Mimas
            | Body::Enceladus
            | Body::Tethys
            | Body::Dione
            | Body::Rhea
            | Body::Titan
            | Body::Hyperion
            | Body::Iapetus
            | Body::Phoebe => Body::Saturn,
            Body::Miranda | Body::Ariel | Body::Umbriel | Body::Titania | Body::Oberon => {
                Body::Uranus
            }
            Body::Triton | Body::Nereid => Body::Neptune,
            Body::Charon => Body::Pluto,
            _ => Body::Sun,
        }
    }

    /// Whether this body carries a ring system that is rendered
    pub fn has_rings(&self) -> bool {
        matches!(self, Body::Saturn)
    }
}

impl fmt::Display for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Body {
    type Err = PlanetariumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Body::ALL
            .iter()
            .copied()
            .find(|b| b.name().to_ascii_lowercase() == lower)
            .ok_or_else(|| PlanetariumError::BodyNotFound(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_names_parse_back() {
        for body in Body::ALL {
            assert_eq!(body.name().parse::<Body>().unwrap(), body);
        }
        assert_eq!("  SATURN ".parse::<Body>().unwrap(), Body::Saturn);
        assert!("vulcan".parse::<Body>().is_err());
    }

    #[test]
    fn test_primaries() {
        assert_eq!(Body::Moon.primary(), Body::Earth);
        assert_eq!(Body::Titan.primary(), Body::Saturn);
        assert_eq!(Body::Jupiter.primary(), Body::Sun);
        assert_eq!(Body::Sun.primary(), Body::Sun);
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&Body::Ganymede).unwrap();
        assert_eq!(json, "\"ganymede\"");
        let body: Body = serde_json::from_str("\"charon\"").unwrap();
        assert_eq!(body, Body::Charon);
    }
}
