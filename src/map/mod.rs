//! Lit surface maps
//!
//! A [`Map`] is the finished, lit texture of one body for one frame. It is
//! built at the resolution of the source image maps from:
//!
//! - a day image (or a flat colour when none can be loaded)
//! - an optional night image, otherwise the day image scaled by `shade`
//! - an optional cloud image composited over the surface
//! - an optional specular image giving per-pixel reflectivity
//!
//! plus the frame's lighting geometry: the sub-solar and sub-observer points,
//! eclipse shadows from other bodies and the shadow of the body's own rings.
//!
//! Map pixels follow the usual equirectangular layout: column 0 starts at
//! longitude -180° and longitude increases eastward to the right, row 0
//! starts at the north pole.

use std::f64::consts::{FRAC_PI_2, PI};
use std::path::Path;

use nalgebra::Vector3;
use ndarray::Array1;
use rayon::prelude::*;

use crate::body::Planet;
use crate::constants::{DEG2RAD, MIN_FALLBACK_MAP_WIDTH, SPECULAR_EXPONENT, TAU};
use crate::coordinates::{unit_vector, wrap_longitude};
use crate::ring::Ring;
use crate::scene::BodyProperties;
use crate::texture::{Texture, TextureLoader};
use crate::Result;

pub mod shadow;

pub use shadow::{disc_overlap, select_casters, shadow_weight, ShadowCaster};

/// Source images for a map; all layers are resized to the day layer's size
#[derive(Debug, Clone)]
pub struct MapLayers {
    pub day: Texture,
    pub night: Option<Texture>,
    pub cloud: Option<Texture>,
    pub specular: Option<Texture>,
}

impl MapLayers {
    pub fn day_only(day: Texture) -> Self {
        Self {
            day,
            night: None,
            cloud: None,
            specular: None,
        }
    }
}

/// Surface shading parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shading {
    /// Night side brightness as a fraction of the day side
    pub shade: f64,
    /// Half-width of the day/night transition, radians
    pub twilight: f64,
    pub cloud_gamma: f64,
    /// Cloud pixels darker than this (after gamma) are transparent
    pub cloud_threshold: u8,
}

impl Default for Shading {
    fn default() -> Self {
        Self {
            shade: 0.3,
            twilight: 6.0 * DEG2RAD,
            cloud_gamma: 1.0,
            cloud_threshold: 90,
        }
    }
}

impl From<&BodyProperties> for Shading {
    fn from(p: &BodyProperties) -> Self {
        Self {
            shade: p.shade,
            twilight: p.twilight * DEG2RAD,
            cloud_gamma: p.cloud_gamma,
            cloud_threshold: p.cloud_threshold,
        }
    }
}

/// Lighting geometry of one body for one frame
#[derive(Debug, Clone)]
pub struct Lighting<'a> {
    pub planet: &'a Planet,
    /// Planetocentric sub-solar point (lat, lon), radians
    pub sun: (f64, f64),
    /// Planetocentric sub-observer point, needed for specular highlights
    pub observer: Option<(f64, f64)>,
    pub ring: Option<&'a Ring>,
    pub casters: Vec<ShadowCaster>,
}

impl<'a> Lighting<'a> {
    /// Lighting for `planet` with the Sun at the origin
    pub fn new(planet: &'a Planet) -> Self {
        let (lat, lon, _) = planet.xyz_to_planetocentric(&Vector3::zeros());
        Self {
            planet,
            sun: (lat, lon),
            observer: None,
            ring: None,
            casters: Vec::new(),
        }
    }

    pub fn with_observer(mut self, observer: &Vector3<f64>) -> Self {
        let (lat, lon, _) = self.planet.xyz_to_planetocentric(observer);
        self.observer = Some((lat, lon));
        self
    }

    pub fn with_ring(mut self, ring: &'a Ring) -> Self {
        self.ring = Some(ring);
        self
    }

    pub fn with_casters(mut self, casters: Vec<ShadowCaster>) -> Self {
        self.casters = casters;
        self
    }
}

/// Fraction of daylight for a given cosine of the sun's incidence angle
///
/// Full day above `sin(twilight)`, full night below `-sin(twilight)`,
/// linear in between.
pub fn day_weight(cos_incidence: f64, twilight: f64) -> f64 {
    let band = twilight.sin();
    if band <= 0.0 {
        return if cos_incidence > 0.0 { 1.0 } else { 0.0 };
    }
    if cos_incidence >= band {
        1.0
    } else if cos_incidence <= -band {
        0.0
    } else {
        0.5 * (1.0 + cos_incidence / band)
    }
}

/// Lit surface texture of a body
#[derive(Debug, Clone)]
pub struct Map {
    texture: Texture,
}

impl Map {
    /// Composite the layers under `lighting`
    ///
    /// Layers whose size differs from the day image are resized to match,
    /// with a warning.
    pub fn from_layers(layers: MapLayers, lighting: &Lighting, shading: &Shading) -> Result<Self> {
        let MapLayers {
            day,
            night,
            cloud,
            specular,
        } = layers;
        let matched = |layer: Option<Texture>, name: &str| -> Result<Option<Texture>> {
            match layer {
                Some(t) if !t.same_size(&day) => {
                    log::warn!(
                        "{} map is {}x{}, day map is {}x{}; resizing",
                        name,
                        t.width(),
                        t.height(),
                        day.width(),
                        day.height()
                    );
                    t.resize(day.width(), day.height()).map(Some)
                }
                other => Ok(other),
            }
        };
        let night = matched(night, "Night")?;
        let cloud = matched(cloud, "Cloud")?;
        let specular = matched(specular, "Specular")?;

        let texture = Compositor::new(
            &day,
            night.as_ref(),
            cloud.as_ref(),
            specular.as_ref(),
            lighting,
            shading,
        )
        .run();
        Ok(Self { texture })
    }

    /// A map of one colour, lit the same way as an image map
    pub fn flat(
        width: usize,
        height: usize,
        color: [u8; 3],
        lighting: &Lighting,
        shading: &Shading,
    ) -> Result<Self> {
        Self::from_layers(
            MapLayers::day_only(Texture::filled(width, height, color)?),
            lighting,
            shading,
        )
    }

    /// Wrap an already lit texture
    pub fn from_texture(texture: Texture) -> Self {
        Self { texture }
    }

    /// Build the map for a body from its render properties
    ///
    /// A day image that cannot be loaded degrades to a flat map of the
    /// body's colour sized for the on-screen radius `pixel_radius`. Other
    /// layers that cannot be loaded are skipped. The night image is only
    /// used when `shade < 1`. When the day image's sides are powers of two
    /// and much larger than needed on screen, the result is reduced.
    pub fn create(
        loader: &dyn TextureLoader,
        properties: &BodyProperties,
        lighting: &Lighting,
        pixel_radius: f64,
        output_width: usize,
    ) -> Result<Self> {
        let shading = Shading::from(properties);

        let day = properties.day_map.as_deref().and_then(|path| load_layer(loader, path, "day"));
        let Some(day) = day else {
            let width = ((4.0 * pixel_radius) as usize)
                .max(MIN_FALLBACK_MAP_WIDTH)
                .min(output_width.max(2));
            let height = (width / 2).max(1);
            log::debug!(
                "Using a flat {}x{} map for {}",
                width,
                height,
                lighting.planet.body()
            );
            return Self::flat(width, height, properties.color, lighting, &shading);
        };

        let night = if shading.shade < 1.0 {
            properties.night_map.as_deref().and_then(|p| load_layer(loader, p, "night"))
        } else {
            None
        };
        let cloud = properties.cloud_map.as_deref().and_then(|p| load_layer(loader, p, "cloud"));
        let specular = properties
            .specular_map
            .as_deref()
            .and_then(|p| load_layer(loader, p, "specular"));

        let reduce_by = reduction_factor(day.width(), day.height(), pixel_radius);
        let mut map = Self::from_layers(
            MapLayers {
                day,
                night,
                cloud,
                specular,
            },
            lighting,
            &shading,
        )?;
        if reduce_by > 0 {
            log::debug!("Reducing {} map by {} halvings", lighting.planet.body(), reduce_by);
            map.reduce(reduce_by);
        }
        Ok(map)
    }

    pub fn width(&self) -> usize {
        self.texture.width()
    }

    pub fn height(&self) -> usize {
        self.texture.height()
    }

    pub fn texture(&self) -> &Texture {
        &self.texture
    }

    /// Downsample by `factor` 2x box averages
    pub fn reduce(&mut self, factor: u32) {
        self.texture = self.texture.reduce(factor);
    }

    /// Colour at planetographic `lat`, east longitude `lon` (radians)
    pub fn get_pixel(&self, lat: f64, lon: f64) -> [u8; 3] {
        let w = self.texture.width() as f64;
        let h = self.texture.height() as f64;
        let x = (wrap_longitude(lon) + PI) / TAU * w - 0.5;
        let y = (FRAC_PI_2 - lat) / PI * h - 0.5;
        self.texture.sample_bilinear(x, y)
    }
}

fn load_layer(loader: &dyn TextureLoader, path: &Path, name: &str) -> Option<Texture> {
    match loader.load(path) {
        Ok(t) => Some(t),
        Err(e) => {
            log::warn!("Can't load {} map {}: {}", name, path.display(), e);
            None
        }
    }
}

/// Number of halvings for a `width` x `height` source drawn at `pixel_radius`
///
/// Only power-of-two images are reduced.
pub fn reduction_factor(width: usize, height: usize, pixel_radius: f64) -> u32 {
    if !width.is_power_of_two() || !height.is_power_of_two() || pixel_radius <= 0.0 {
        return 0;
    }
    let ratio = height as f64 / pixel_radius;
    if ratio < 1.0 {
        return 0;
    }
    let factor = ratio.log2().floor() as i64 - 1;
    factor.max(0) as u32
}

/// Per-pixel compositing state shared by all rows
struct Compositor<'a> {
    day: &'a Texture,
    night: Option<&'a Texture>,
    cloud: Option<&'a Texture>,
    specular: Option<&'a Texture>,
    lighting: &'a Lighting<'a>,
    shading: &'a Shading,
    lat: Array1<f64>,
    lon: Array1<f64>,
    sun: Vector3<f64>,
    /// Unit bisector of the sun and observer directions, body frame
    half_vector: Option<Vector3<f64>>,
}

impl<'a> Compositor<'a> {
    fn new(
        day: &'a Texture,
        night: Option<&'a Texture>,
        cloud: Option<&'a Texture>,
        specular: Option<&'a Texture>,
        lighting: &'a Lighting<'a>,
        shading: &'a Shading,
    ) -> Self {
        let (w, h) = (day.width(), day.height());
        let dlon = TAU / w as f64;
        let dlat = PI / h as f64;
        let lon = Array1::from_shape_fn(w, |i| -PI + (i as f64 + 0.5) * dlon);
        let lat = Array1::from_shape_fn(h, |j| FRAC_PI_2 - (j as f64 + 0.5) * dlat);

        let sun = unit_vector(lighting.sun.0, lighting.sun.1);
        let half_vector = lighting
            .observer
            .filter(|_| specular.is_some())
            .and_then(|(lat, lon)| (sun + unit_vector(lat, lon)).try_normalize(1e-12));

        Self {
            day,
            night,
            cloud,
            specular,
            lighting,
            shading,
            lat,
            lon,
            sun,
            half_vector,
        }
    }

    fn run(&self) -> Texture {
        let w = self.day.width();
        let mut out = self.day.clone();
        out.rgb_mut()
            .par_chunks_mut(w * 3)
            .enumerate()
            .for_each(|(j, row)| self.row(j, row));
        out
    }

    /// Daylight fraction at (`lat`, `lon`), including shadows
    fn illumination(&self, lat: f64, lon: f64, normal: &Vector3<f64>) -> f64 {
        let mut weight = day_weight(normal.dot(&self.sun), self.shading.twilight);
        if weight <= 0.0 {
            return 0.0;
        }

        let planet = self.lighting.planet;
        if !self.lighting.casters.is_empty() {
            let point = planet.planetographic_to_xyz(lat, lon, planet.radius_at(lat));
            for caster in &self.lighting.casters {
                weight *= shadow_weight(caster.occlusion(&point));
            }
        }

        if let Some(ring) = self.lighting.ring {
            let r = ring.shadow_radius_at(planet.graphic_to_centric(lat), lon);
            if r >= 0.0 {
                let t = ring.transparency(r);
                if t >= 0.0 {
                    weight *= t;
                }
            }
        }
        weight
    }

    fn row(&self, j: usize, row: &mut [u8]) {
        let lat = self.lat[j];
        let shade = self.shading.shade;
        let gamma = if self.shading.cloud_gamma > 0.0 {
            1.0 / self.shading.cloud_gamma
        } else {
            1.0
        };

        for (i, px) in row.chunks_exact_mut(3).enumerate() {
            let lon = self.lon[i];
            let normal = unit_vector(lat, lon);
            let weight = self.illumination(lat, lon, &normal);

            let day = self.day.pixel(i, j);
            let night = self.night.map(|t| t.pixel(i, j));
            let mut color = [0.0f64; 3];
            for c in 0..3 {
                let d = f64::from(day[c]);
                let n = night.map_or(shade * d, |n| f64::from(n[c]));
                color[c] = weight * d + (1.0 - weight) * n;
            }

            if let (Some(spec), Some(half)) = (self.specular, &self.half_vector) {
                let cos_h = normal.dot(half);
                if cos_h > 0.0 {
                    let reflectivity = f64::from(spec.luminance(i, j)) / 255.0;
                    let highlight = reflectivity * cos_h.powi(SPECULAR_EXPONENT) * weight;
                    for v in color.iter_mut() {
                        *v += highlight * (255.0 - *v);
                    }
                }
            }

            if let Some(cloud) = self.cloud {
                let raw = f64::from(cloud.luminance(i, j)) / 255.0;
                let value = 255.0 * raw.powf(gamma);
                if value >= f64::from(self.shading.cloud_threshold) {
                    let opacity = value / 255.0;
                    let lit = value * (weight + (1.0 - weight) * shade);
                    for v in color.iter_mut() {
                        *v = opacity * lit + (1.0 - opacity) * *v;
                    }
                }
            }

            for c in 0..3 {
                px[c] = color[c].round().clamp(0.0, 255.0) as u8;
            }
        }
    }
}
