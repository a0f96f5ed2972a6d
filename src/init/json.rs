use std::{fs::File, io::Read, path::Path};

use json::JsonValue;

use crate::difficulty::Difficulty;
use crate::session::SessionOptions;
use crate::terrain::{PadPlacement, TerrainOptions};

macro_rules! get_json {
    ($json:ident,$($key:literal),+, $func:ident) => {
            get_json!($json$([$key])+, concat!($("/",$key),+), $func)
    };

    ($value:expr, $key:expr, $func:ident) => {
        $value
            .$func()
            .ok_or(concat!("Couldn't find ", $key))?
    };
}

/// Parses a session config file. Every key except `Difficulty` is
/// optional and falls back to the built-in defaults.
pub fn session_from_file<P: AsRef<Path>>(path: P) -> Result<(Difficulty, SessionOptions), String> {
    let path = path.as_ref();
    let mut content = String::new();
    let mut file = File::open(path)
        .map_err(|e| format!("Error while opening file {}: {e}", path.display()))?;
    file.read_to_string(&mut content)
        .map_err(|e| format!("Failed to read file: {e}"))?;
    session_from_string(&content)
}

pub fn session_from_string(content: &str) -> Result<(Difficulty, SessionOptions), String> {
    let config = json::parse(content).map_err(|e| format!("Json error: {e}"))?;

    let name = get_json!(config, "Difficulty", as_str);
    let difficulty = Difficulty::from_str(name).ok_or(format!("Unknown difficulty: {name}"))?;

    let mut options = SessionOptions::default();
    if let (Some(width), Some(height)) = (
        config["World"]["Width"].as_f64(),
        config["World"]["Height"].as_f64(),
    ) {
        options = options.with_world(width, height);
    }
    if let Some(seed) = config["Seed"].as_u64() {
        options = options.with_seed(seed);
    }
    if let Some(enabled) = config["Autopilot"].as_bool() {
        options = options.with_autopilot(enabled);
    }
    options = options.with_terrain(parse_terrain(&config["Terrain"])?);

    Ok((difficulty, options))
}

fn parse_terrain(value: &JsonValue) -> Result<TerrainOptions, String> {
    let mut options = TerrainOptions::default();
    if let Some(segments) = value["Segments"].as_usize() {
        options = options.with_segment_count(segments);
    }
    if let Some(pad_segments) = value["PadSegments"].as_usize() {
        options = options.with_pad_segments(pad_segments);
    }
    if let Some(x) = value["PadCenterX"].as_f64() {
        options = options.with_placement(PadPlacement::CenterX(x));
    } else if !value["PadRange"].is_null() {
        let err = "PadRange has to contain two numeric fractions";
        let min = value["PadRange"][0].as_f64().ok_or(err)?;
        let max = value["PadRange"][1].as_f64().ok_or(err)?;
        options = options.with_placement(PadPlacement::Fraction { min, max });
    }
    Ok(options)
}
