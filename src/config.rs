//! Pipeline configuration.
//!
//! Defaults track Kenya, United States and India
//! read from `owid-covid-data.csv`, two PNGs written to the working
//! directory. A TOML file can override any field.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Result, TrackerError};

/// Which rows feed the per-location summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SnapshotPolicy {
    /// Rows at the single latest date of the whole table. Locations without
    /// data on that date drop out of the summary.
    #[default]
    GlobalLatest,
    /// Each location's own latest row.
    PerLocationLatest,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CleaningConfig {
    pub locations: Vec<String>,
    pub required_columns: Vec<String>,
}

impl Default for CleaningConfig {
    fn default() -> Self {
        Self {
            locations: default_locations(),
            required_columns: default_required_columns(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub enabled: bool,
    pub overview_file: String,
    pub overview_size: (u32, u32),
    pub vaccination_file: String,
    pub vaccination_size: (u32, u32),
    pub histogram_bins: usize,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            overview_file: "covid_visualizations.png".to_string(),
            overview_size: (1400, 1200),
            vaccination_file: "vaccination_progress.png".to_string(),
            vaccination_size: (800, 600),
            histogram_bins: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    pub preview_rows: usize,
    /// Columns reported in the missing-value and statistics sections.
    pub key_columns: Vec<String>,
    pub snapshot: SnapshotPolicy,
    pub cleaning: CleaningConfig,
    pub charts: ChartConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("owid-covid-data.csv"),
            output_dir: PathBuf::from("."),
            preview_rows: 5,
            key_columns: default_key_columns(),
            snapshot: SnapshotPolicy::default(),
            cleaning: CleaningConfig::default(),
            charts: ChartConfig::default(),
        }
    }
}

impl PipelineConfig {
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| TrackerError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&text).map_err(|message| TrackerError::Config {
            path: path.to_path_buf(),
            message,
        })
    }

    pub fn from_toml_str(text: &str) -> std::result::Result<Self, String> {
        toml::from_str(text).map_err(|e| e.to_string())
    }

    pub fn overview_path(&self) -> PathBuf {
        self.output_dir.join(&self.charts.overview_file)
    }

    pub fn vaccination_path(&self) -> PathBuf {
        self.output_dir.join(&self.charts.vaccination_file)
    }
}

fn default_locations() -> Vec<String> {
    ["Kenya", "United States", "India"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_required_columns() -> Vec<String> {
    [
        "location",
        "date",
        "total_cases",
        "new_cases",
        "total_deaths",
        "new_deaths",
        "total_vaccinations",
        "people_vaccinated",
        "population",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_key_columns() -> Vec<String> {
    [
        "date",
        "location",
        "total_cases",
        "new_cases",
        "total_deaths",
        "new_deaths",
        "total_vaccinations",
        "people_vaccinated",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}
