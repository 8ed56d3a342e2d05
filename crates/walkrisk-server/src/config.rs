//! Server configuration from environment.

use std::env;
use std::path::PathBuf;
use walkrisk_core::{ConfigError, RiskConfig};

pub const DEFAULT_DATA_PATH: &str = "data/Access_to_Everyday_Life_Dataset.csv";

#[derive(Debug, Clone)]
pub struct Config {
    pub server_port: u16,
    pub data_path: PathBuf,
    /// Optional JSON file overriding the default pipeline parameters
    pub pipeline_config_path: Option<PathBuf>,
    /// Routes longer than this are rejected with 413. Zero disables the cap.
    pub max_route_points: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            pipeline_config_path: None,
            max_route_points: 10_000,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_port: env::var("WALKRISK_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.server_port),
            data_path: env::var("WALKRISK_DATA_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_path),
            pipeline_config_path: env::var("WALKRISK_PIPELINE_CONFIG")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from),
            max_route_points: env::var("WALKRISK_MAX_ROUTE_POINTS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_route_points),
        }
    }

    /// Pipeline parameters: the configured JSON file, or the defaults.
    pub fn pipeline_config(&self) -> Result<RiskConfig, ConfigError> {
        match &self.pipeline_config_path {
            Some(path) => RiskConfig::from_path(path),
            None => Ok(RiskConfig::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_pipeline_file() {
        let config = Config::default();
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.max_route_points, 10_000);
        let pipeline = config.pipeline_config().unwrap();
        assert_eq!(pipeline.boosting.n_estimators, 400);
    }

    #[test]
    fn pipeline_file_overrides_defaults() {
        let path = std::env::temp_dir().join(format!(
            "walkrisk-pipeline-{}.json",
            uuid::Uuid::new_v4()
        ));
        std::fs::write(&path, r#"{"decay_m": 30.0, "boosting": {"n_estimators": 25}}"#).unwrap();

        let config = Config {
            pipeline_config_path: Some(path.clone()),
            ..Config::default()
        };
        let pipeline = config.pipeline_config().unwrap();
        assert_eq!(pipeline.decay_m, 30.0);
        assert_eq!(pipeline.boosting.n_estimators, 25);
        assert_eq!(pipeline.boosting.max_depth, 4);

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn missing_pipeline_file_is_an_error() {
        let config = Config {
            pipeline_config_path: Some(PathBuf::from("/nonexistent/pipeline.json")),
            ..Config::default()
        };
        assert!(matches!(config.pipeline_config(), Err(ConfigError::Io { .. })));
    }
}
