//! Per-body rendering properties
//!
//! Every body has a [`BodyProperties`] record: which image maps to use,
//! how to shade it, and which overlays (grid, orbit, markers, arcs, label)
//! to draw. Defaults come from [`BodyProperties::for_body`]; a scene file can
//! override any subset of fields per body through [`PropertyTable`].

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::body::Body;
use crate::Result;

/// Placement of a label relative to the thing it names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    /// Right of the marker if it fits on the frame, otherwise left
    #[default]
    Auto,
    Left,
    Right,
    Above,
    Below,
    Center,
}

/// Where a marker goes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerPosition {
    /// Planetographic latitude and east longitude, degrees
    LatLon { lat: f64, lon: f64 },
    /// The point on the surface directly under another body
    Body(Body),
    /// A fixed frame position; negative values count from the right/bottom
    /// edge unless `absolute` is set
    Pixel {
        x: f64,
        y: f64,
        #[serde(default)]
        absolute: bool,
    },
}

/// A marker symbol with an optional label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerSpec {
    pub position: MarkerPosition,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub color: Option<[u8; 3]>,
    #[serde(default)]
    pub align: Align,
    /// Radius of the marker circle, pixels; 0 draws no symbol
    #[serde(default = "default_symbol_size")]
    pub symbol_size: u32,
    /// Height above the centre, body radii
    #[serde(default = "default_one")]
    pub radius: f64,
    #[serde(default)]
    pub font_size: Option<u32>,
}

/// A great-circle arc between two surface points
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArcSpec {
    /// Start point (planetographic latitude, east longitude), degrees
    pub start: [f64; 2],
    /// End point, degrees
    pub end: [f64; 2],
    #[serde(default)]
    pub color: Option<[u8; 3]>,
    /// Sample spacing along the arc, degrees
    #[serde(default = "default_arc_spacing")]
    pub spacing: f64,
    /// Height above the centre, body radii
    #[serde(default = "default_one")]
    pub radius: f64,
}

/// Span and step of an orbit trace, in orbital periods about the current
/// date
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrbitSampling {
    pub start: f64,
    pub stop: f64,
    /// Step between samples, degrees of orbital motion
    pub delta: f64,
}

impl Default for OrbitSampling {
    fn default() -> Self {
        Self {
            start: -0.5,
            stop: 0.5,
            delta: 2.0,
        }
    }
}

fn default_symbol_size() -> u32 {
    2
}

fn default_one() -> f64 {
    1.0
}

fn default_arc_spacing() -> f64 {
    0.1
}

/// Rendering properties of one body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BodyProperties {
    /// Label text; the body's name when unset
    pub name: Option<String>,
    /// Colour of the flat fallback map, and of the Sun
    pub color: [u8; 3],
    pub day_map: Option<PathBuf>,
    pub night_map: Option<PathBuf>,
    pub cloud_map: Option<PathBuf>,
    pub specular_map: Option<PathBuf>,
    /// Night side brightness as a fraction of the day side
    pub shade: f64,
    /// Half-width of the day/night transition, degrees
    pub twilight: f64,
    pub cloud_gamma: f64,
    pub cloud_threshold: u8,
    /// Scale factor on the drawn radius
    pub magnify: f64,

    pub grid: bool,
    /// Grid lines per 90 degrees
    pub grid1: u32,
    /// Grid samples between lines
    pub grid2: u32,
    pub grid_color: [u8; 3],

    pub draw_orbit: bool,
    pub orbit: OrbitSampling,
    pub orbit_color: [u8; 3],

    /// The body is labelled when its pixel radius lies in this range
    pub min_radius_for_label: f64,
    pub max_radius_for_label: f64,
    /// Markers and arcs are drawn only above this pixel radius
    pub min_radius_for_markers: f64,

    pub markers: Vec<MarkerSpec>,
    pub marker_color: [u8; 3],
    pub arcs: Vec<ArcSpec>,
    pub arc_color: [u8; 3],
    pub text_color: [u8; 3],
}

impl Default for BodyProperties {
    fn default() -> Self {
        Self {
            name: None,
            color: [255, 255, 255],
            day_map: None,
            night_map: None,
            cloud_map: None,
            specular_map: None,
            shade: 0.3,
            twilight: 6.0,
            cloud_gamma: 1.0,
            cloud_threshold: 90,
            magnify: 1.0,
            grid: false,
            grid1: 6,
            grid2: 15,
            grid_color: [255, 255, 255],
            draw_orbit: false,
            orbit: OrbitSampling::default(),
            orbit_color: [255, 255, 255],
            min_radius_for_label: 0.01,
            max_radius_for_label: 3.0,
            min_radius_for_markers: 40.0,
            markers: Vec::new(),
            marker_color: [255, 0, 0],
            arcs: Vec::new(),
            arc_color: [255, 255, 255],
            text_color: [255, 0, 0],
        }
    }
}

impl BodyProperties {
    /// Built-in defaults for `body`
    ///
    /// Image maps default to `<name>.jpg` (and `earth_night.jpg` for the
    /// Earth), resolved by the texture loader.
    pub fn for_body(body: Body) -> Self {
        let lower = body.name().to_ascii_lowercase();
        let mut props = Self {
            day_map: Some(PathBuf::from(format!("{}.jpg", lower))),
            ..Self::default()
        };
        match body {
            Body::Sun => {
                props.color = [255, 255, 166];
                props.day_map = None;
            }
            Body::Earth => {
                props.night_map = Some(PathBuf::from("earth_night.jpg"));
            }
            _ => {}
        }
        props
    }

    /// Text used to label the body
    pub fn label(&self, body: Body) -> String {
        self.name.clone().unwrap_or_else(|| body.name().to_string())
    }
}

/// Properties for every body, defaults plus overrides
#[derive(Debug, Clone, Default)]
pub struct PropertyTable {
    overrides: HashMap<Body, BodyProperties>,
}

impl PropertyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge partial JSON records over each body's defaults
    ///
    /// # Errors
    ///
    /// Returns [`crate::PlanetariumError::Config`] if an override is not an
    /// object or has fields of the wrong type.
    pub fn with_overrides(overrides: HashMap<Body, serde_json::Value>) -> Result<Self> {
        let mut table = Self::new();
        for (body, partial) in overrides {
            let mut merged = serde_json::to_value(BodyProperties::for_body(body))?;
            match (merged.as_object_mut(), partial) {
                (Some(base), serde_json::Value::Object(fields)) => {
                    base.extend(fields);
                }
                (_, other) => {
                    return Err(crate::PlanetariumError::Config(format!(
                        "properties for {} must be an object, got {}",
                        body, other
                    )));
                }
            }
            table.set(body, serde_json::from_value(merged)?);
        }
        Ok(table)
    }

    pub fn set(&mut self, body: Body, properties: BodyProperties) {
        self.overrides.insert(body, properties);
    }

    /// Properties of `body`
    pub fn get(&self, body: Body) -> BodyProperties {
        self.overrides
            .get(&body)
            .cloned()
            .unwrap_or_else(|| BodyProperties::for_body(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let earth = BodyProperties::for_body(Body::Earth);
        assert_eq!(earth.shade, 0.3);
        assert_eq!(earth.night_map, Some(PathBuf::from("earth_night.jpg")));
        assert_eq!((earth.grid1, earth.grid2), (6, 15));
        assert_eq!(earth.label(Body::Earth), "Earth");

        let sun = BodyProperties::for_body(Body::Sun);
        assert_eq!(sun.color, [255, 255, 166]);
        assert!(sun.day_map.is_none());
        assert!(BodyProperties::for_body(Body::Mars).night_map.is_none());
    }

    #[test]
    fn test_overrides_keep_other_defaults() {
        let mut overrides = HashMap::new();
        overrides.insert(Body::Earth, json!({"grid": true, "shade": 0.1}));
        let table = PropertyTable::with_overrides(overrides).unwrap();

        let earth = table.get(Body::Earth);
        assert!(earth.grid);
        assert_eq!(earth.shade, 0.1);
        assert_eq!(earth.night_map, Some(PathBuf::from("earth_night.jpg")));
        assert!(!table.get(Body::Mars).grid);
    }

    #[test]
    fn test_bad_override_is_a_config_error() {
        let mut overrides = HashMap::new();
        overrides.insert(Body::Mars, json!({"shade": "dark"}));
        assert!(matches!(
            PropertyTable::with_overrides(overrides),
            Err(crate::PlanetariumError::Config(_))
        ));

        let mut overrides = HashMap::new();
        overrides.insert(Body::Mars, json!(3));
        assert!(PropertyTable::with_overrides(overrides).is_err());
    }

    #[test]
    fn test_marker_json() {
        let marker: MarkerSpec = serde_json::from_value(json!({
            "position": {"latlon": {"lat": 10.0, "lon": -20.0}},
            "name": "Here"
        }))
        .unwrap();
        assert_eq!(marker.symbol_size, 2);
        assert_eq!(marker.align, Align::Auto);
        assert_eq!(marker.position, MarkerPosition::LatLon { lat: 10.0, lon: -20.0 });

        let marker: MarkerSpec =
            serde_json::from_value(json!({"position": {"body": "moon"}})).unwrap();
        assert_eq!(marker.position, MarkerPosition::Body(Body::Moon));
    }
}
