//! Walk-risk CLI - command line tools around the risk pipeline.
//!
//! Binaries:
//! - score_route: score one route from `--point` flags or a JSON file
//! - evaluate_model: train on a dataset and report held-out metrics

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use walkrisk_core::{LatLon, RiskConfig, RiskContext};

/// Parse a `lat,lon` pair in degrees, as given on the command line.
pub fn parse_point(raw: &str) -> Result<LatLon, String> {
    let (lat, lon) = raw
        .split_once(',')
        .ok_or_else(|| format!("expected `lat,lon`, got `{raw}`"))?;
    let lat: f64 = lat
        .trim()
        .parse()
        .map_err(|e| format!("invalid latitude `{}`: {e}", lat.trim()))?;
    let lon: f64 = lon
        .trim()
        .parse()
        .map_err(|e| format!("invalid longitude `{}`: {e}", lon.trim()))?;
    LatLon::from_pair(0, &[lat, lon]).map_err(|e| e.to_string())
}

/// Read a route file: a JSON array of `[lat, lon]` pairs, or an object with
/// a `points` array in the same shape the server accepts.
pub fn read_route_file(path: &Path) -> Result<Vec<Vec<f64>>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read route file {}", path.display()))?;
    parse_route_json(&raw).with_context(|| format!("invalid route file {}", path.display()))
}

pub fn parse_route_json(raw: &str) -> Result<Vec<Vec<f64>>> {
    #[derive(serde::Deserialize)]
    #[serde(untagged)]
    enum RouteFile {
        Bare(Vec<Vec<f64>>),
        Wrapped { points: Vec<Vec<f64>> },
    }

    match serde_json::from_str(raw)? {
        RouteFile::Bare(points) | RouteFile::Wrapped { points } => Ok(points),
    }
}

/// Pipeline parameters from an optional JSON file.
pub fn load_pipeline_config(path: Option<&PathBuf>) -> Result<RiskConfig> {
    match path {
        Some(path) => RiskConfig::from_path(path)
            .with_context(|| format!("failed to load pipeline config {}", path.display())),
        None => Ok(RiskConfig::default()),
    }
}

/// Load the dataset and train the model.
pub fn build_context(data: &Path, config: Option<&PathBuf>) -> Result<RiskContext> {
    let pipeline = load_pipeline_config(config)?;
    if !data.exists() {
        bail!("dataset not found at {}", data.display());
    }
    RiskContext::from_csv_path(pipeline, data)
        .with_context(|| format!("failed to build risk model from {}", data.display()))
}

/// Log to stderr so stdout stays clean for results.
pub fn init_tracing(verbose: bool) {
    let default = if verbose { "walkrisk_core=debug" } else { "walkrisk_core=info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_lat_lon_pairs() {
        assert_eq!(parse_point("47.6,-122.33"), Ok(LatLon::new(47.6, -122.33)));
        assert_eq!(parse_point(" 47.6 , -122.33 "), Ok(LatLon::new(47.6, -122.33)));
    }

    #[test]
    fn rejects_malformed_points() {
        assert!(parse_point("47.6").is_err());
        assert!(parse_point("north,-122.33").is_err());
        assert!(parse_point("47.6,west").is_err());
        assert!(parse_point("NaN,-122.33").is_err());
    }

    #[test]
    fn route_json_accepts_bare_and_wrapped_arrays() {
        let bare = parse_route_json("[[47.6, -122.33], [47.61, -122.34]]").unwrap();
        let wrapped = parse_route_json(r#"{"points": [[47.6, -122.33], [47.61, -122.34]]}"#).unwrap();
        assert_eq!(bare, wrapped);
        assert_eq!(bare.len(), 2);

        assert!(parse_route_json(r#"{"waypoints": []}"#).is_err());
    }
}
