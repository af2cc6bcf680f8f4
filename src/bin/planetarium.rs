//! Planetarium renderer
//!
//! Reads a JSON scene description, renders it and writes the frame to an
//! image file. A scene file looks like:
//!
//! ```json
//! {
//!   "context": { "width": 800, "height": 600, "north": "orbit" },
//!   "ephemeris": { "epoch": 2451545.0, "entries": { ... } },
//!   "observer": { "body": "earth" },
//!   "target": "mars",
//!   "bodies": ["sun", "phobos", "deimos"],
//!   "properties": { "mars": { "grid": true } },
//!   "textures": "maps"
//! }
//! ```
//!
//! Usage:
//!   cargo run --bin planetarium -- scene.json -o mars.png --date 2003-08-27T10:00:00Z

use std::collections::HashMap;
use std::path::PathBuf;

use chrono::DateTime;
use clap::{ArgAction, Parser};
use serde::Deserialize;

use planetarium::body::{Body, TableEphemeris};
use planetarium::constants::{DAY_S, UNIX_EPOCH_JD};
use planetarium::scene::{
    render_frame, render_projection, FrameRequest, Observer, PropertyTable, RenderContext, Scene,
};
use planetarium::texture::{ImageFileLoader, ImageFileWriter, OutputSink};
use planetarium::{PlanetariumError, ProjectionKind};

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Planetarium renderer
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Renders solar system bodies from a JSON scene description",
    long_about = None
)]
struct Args {
    /// Scene description file
    scene: PathBuf,

    /// Output image; the format follows the extension
    #[arg(short, long, default_value = "planetarium.png")]
    output: PathBuf,

    /// Override the frame width
    #[arg(long)]
    width: Option<usize>,

    /// Override the frame height
    #[arg(long)]
    height: Option<usize>,

    /// Draw a map projection of the target instead of a perspective view
    /// (any unique prefix: "rect", "merc", "ortho", ...)
    #[arg(short, long)]
    projection: Option<String>,

    /// Pick the projection at random
    #[arg(long, action = ArgAction::SetTrue)]
    random_projection: bool,

    /// Render at this instant (RFC 3339, e.g. 2003-08-27T10:00:00Z)
    #[arg(short, long)]
    date: Option<String>,

    /// JPEG quality
    #[arg(long, default_value_t = 80)]
    quality: u8,

    /// Log per-body details
    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
enum Mode {
    #[default]
    Perspective,
    Projection,
}

/// Everything a scene file can say
#[derive(Debug, Deserialize)]
struct SceneFile {
    #[serde(default)]
    context: RenderContext,
    ephemeris: TableEphemeris,
    #[serde(default)]
    mode: Mode,
    #[serde(default = "default_observer")]
    observer: Observer,
    target: Body,
    #[serde(default)]
    bodies: Vec<Body>,
    /// Per-body property overrides, merged over the defaults
    #[serde(default)]
    properties: HashMap<Body, serde_json::Value>,
    /// Directory that relative texture names resolve against
    #[serde(default)]
    textures: Option<PathBuf>,
}

fn default_observer() -> Observer {
    Observer::Body(Body::Earth)
}

/// Julian date of an RFC 3339 timestamp
fn julian_day(date: &str) -> Result<f64> {
    let parsed = DateTime::parse_from_rfc3339(date)
        .map_err(|e| PlanetariumError::Config(format!("bad date {:?}: {}", date, e)))?;
    let seconds = parsed.timestamp() as f64 + f64::from(parsed.timestamp_subsec_nanos()) * 1e-9;
    Ok(seconds / DAY_S + UNIX_EPOCH_JD)
}

fn run(args: Args) -> Result<()> {
    let text = std::fs::read_to_string(&args.scene)?;
    let file: SceneFile = serde_json::from_str(&text).map_err(PlanetariumError::from)?;

    let mut ctx = file.context;
    let mut mode = file.mode;
    if let Some(width) = args.width {
        ctx.width = width;
    }
    if let Some(height) = args.height {
        ctx.height = height;
    }
    if let Some(date) = &args.date {
        ctx.julian_day = julian_day(date)?;
    }
    if let Some(name) = &args.projection {
        ctx.projection = ProjectionKind::parse_or_default(name);
        mode = Mode::Projection;
    }
    if args.random_projection {
        ctx.random_projection = true;
        mode = Mode::Projection;
    }

    let loader = match &file.textures {
        Some(dir) => ImageFileLoader::with_base_dir(dir),
        None => {
            ImageFileLoader::with_base_dir(args.scene.parent().unwrap_or(std::path::Path::new(".")))
        }
    };
    let properties = PropertyTable::with_overrides(file.properties)?;
    let scene = Scene::new(&file.ephemeris, &loader).with_properties(properties);

    let frame = match mode {
        Mode::Perspective => render_frame(
            &scene,
            &ctx,
            &FrameRequest {
                observer: file.observer,
                target: file.target,
                bodies: file.bodies,
            },
        )?,
        Mode::Projection => render_projection(&scene, &ctx, file.target)?,
    };

    ImageFileWriter::new(&args.output).write(&frame, args.quality)?;
    Ok(())
}

fn main() {
    let args = Args::parse();
    let level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    if let Err(e) = run(args) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_julian_day_of_known_instants() {
        assert_eq!(julian_day("1970-01-01T00:00:00Z").unwrap(), UNIX_EPOCH_JD);
        let j2000 = julian_day("2000-01-01T12:00:00Z").unwrap();
        assert!((j2000 - 2_451_545.0).abs() < 1e-9);
        assert!(julian_day("yesterday").is_err());
    }

    #[test]
    fn test_minimal_scene_file() {
        let file: SceneFile = serde_json::from_str(
            r#"{
                "ephemeris": {"epoch": 2451545.0, "entries": {}},
                "target": "mars",
                "properties": {"mars": {"grid": true}}
            }"#,
        )
        .unwrap();
        assert_eq!(file.mode, Mode::Perspective);
        assert_eq!(file.observer, Observer::Body(Body::Earth));
        assert_eq!(file.context.width, 512);
        assert!(file.properties.contains_key(&Body::Mars));
    }
}
