//! Obstacle dataset loading and severity normalization.
//!
//! The source is the Project Sidewalk style CSV export where GeoJSON fields
//! are flattened into `geometry/...` and `properties/...` columns.

use crate::config::SeverityScale;
use crate::error::DataLoadError;
use crate::models::{LatLon, LatLonRad, Obstacle, ObstacleRecord};
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;

pub const LONGITUDE_COLUMN: &str = "geometry/coordinates/0";
pub const LATITUDE_COLUMN: &str = "geometry/coordinates/1";
pub const SEVERITY_COLUMN: &str = "properties/severity";

const REQUIRED_COLUMNS: [&str; 3] = [LONGITUDE_COLUMN, LATITUDE_COLUMN, SEVERITY_COLUMN];

#[derive(Debug, Deserialize)]
struct RawObstacleRow {
    #[serde(rename = "geometry/coordinates/0")]
    longitude: f64,
    #[serde(rename = "geometry/coordinates/1")]
    latitude: f64,
    #[serde(rename = "properties/severity")]
    severity: Option<f64>,
    #[serde(rename = "properties/is_temporary", default)]
    is_temporary: Option<String>,
    #[serde(rename = "properties/label_type", default)]
    label_type: Option<String>,
    #[serde(rename = "properties/neighborhood", default)]
    neighborhood: Option<String>,
    #[serde(rename = "properties/attribute_id", default)]
    attribute_id: Option<String>,
}

/// The working set of obstacles: severity-rated, normalized, in radians.
#[derive(Debug, Clone)]
pub struct ObstacleDataset {
    obstacles: Vec<Obstacle>,
    dropped_without_severity: usize,
}

impl ObstacleDataset {
    /// Load the dataset from a CSV file on disk.
    pub fn load(path: impl AsRef<Path>, scale: SeverityScale) -> Result<Self, DataLoadError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| DataLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let dataset = Self::from_reader(file, scale)?;
        tracing::info!(
            "Loaded {} obstacles from {} ({} dropped without severity)",
            dataset.len(),
            path.display(),
            dataset.dropped_without_severity
        );
        Ok(dataset)
    }

    /// Parse CSV from any reader. The header must name the coordinate and
    /// severity columns; metadata columns are optional.
    pub fn from_reader<R: Read>(reader: R, scale: SeverityScale) -> Result<Self, DataLoadError> {
        let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        for column in REQUIRED_COLUMNS {
            if !headers.iter().any(|h| h == column) {
                return Err(DataLoadError::MissingColumn(column));
            }
        }

        let mut records = Vec::new();
        let mut dropped_without_severity = 0usize;
        for (row, result) in csv_reader.deserialize::<RawObstacleRow>().enumerate() {
            let raw = result?;
            let Some(severity) = raw.severity.filter(|s| !s.is_nan()) else {
                dropped_without_severity += 1;
                continue;
            };
            if !raw.longitude.is_finite() {
                return Err(DataLoadError::NonFinite {
                    row,
                    column: LONGITUDE_COLUMN,
                });
            }
            if !raw.latitude.is_finite() {
                return Err(DataLoadError::NonFinite {
                    row,
                    column: LATITUDE_COLUMN,
                });
            }
            if !severity.is_finite() {
                return Err(DataLoadError::NonFinite {
                    row,
                    column: SEVERITY_COLUMN,
                });
            }

            records.push(ObstacleRecord {
                longitude: raw.longitude,
                latitude: raw.latitude,
                severity,
                is_temporary: raw.is_temporary.as_deref().is_some_and(parse_flag),
                label_type: raw.label_type.unwrap_or_default(),
                neighborhood: raw.neighborhood.unwrap_or_default(),
                attribute_id: raw.attribute_id.filter(|id| !id.is_empty()),
            });
        }

        if dropped_without_severity > 0 {
            tracing::debug!(
                "Dropped {} rows with blank severity",
                dropped_without_severity
            );
        }

        Ok(Self::from_records(records, scale, dropped_without_severity))
    }

    /// Build the working set from already-filtered records.
    pub fn from_records(
        records: Vec<ObstacleRecord>,
        scale: SeverityScale,
        dropped_without_severity: usize,
    ) -> Self {
        let divisor = match scale {
            SeverityScale::Fixed(divisor) => divisor,
            SeverityScale::DatasetMax => records
                .iter()
                .map(|r| r.severity)
                .fold(f64::NEG_INFINITY, f64::max),
        };

        let obstacles = records
            .into_iter()
            .map(|record| {
                let severity_norm = normalize_severity(record.severity, divisor);
                let position = LatLon::new(record.latitude, record.longitude).to_radians();
                Obstacle {
                    record,
                    severity_norm,
                    position,
                }
            })
            .collect();

        Self {
            obstacles,
            dropped_without_severity,
        }
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    pub fn dropped_without_severity(&self) -> usize {
        self.dropped_without_severity
    }

    /// Obstacle positions in radians, indexed like [`Self::obstacles`].
    pub fn positions(&self) -> Vec<LatLonRad> {
        self.obstacles.iter().map(|o| o.position).collect()
    }

    pub fn severity_norm(&self, idx: usize) -> f64 {
        self.obstacles[idx].severity_norm
    }
}

fn normalize_severity(severity: f64, divisor: f64) -> f64 {
    if !divisor.is_finite() || divisor <= 0.0 {
        return 0.0;
    }
    (severity / divisor).clamp(0.0, 1.0)
}

fn parse_flag(raw: &str) -> bool {
    matches!(raw.to_ascii_lowercase().as_str(), "true" | "1" | "yes" | "t")
}
