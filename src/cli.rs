//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tracing::Level;

use crate::config::{PipelineConfig, SnapshotPolicy};

/// COVID-19 tracker: clean the OWID dataset for a few countries, print a
/// report and save case and vaccination charts.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// OWID CSV to read (default: owid-covid-data.csv)
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Directory the two PNG files are written to
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// TOML file with pipeline settings; flags override it
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Comma-separated locations to keep, e.g. "Kenya,India"
    #[arg(long, value_delimiter = ',')]
    pub countries: Option<Vec<String>>,

    /// Which rows feed the per-country summary
    #[arg(long, value_enum)]
    pub snapshot: Option<SnapshotArg>,

    /// Skip writing the PNG files
    #[arg(long)]
    pub no_charts: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SnapshotArg {
    /// Latest date of the whole table; countries without data that day are left out
    Global,
    /// Each country's own latest date
    PerLocation,
}

impl From<SnapshotArg> for SnapshotPolicy {
    fn from(arg: SnapshotArg) -> Self {
        match arg {
            SnapshotArg::Global => SnapshotPolicy::GlobalLatest,
            SnapshotArg::PerLocation => SnapshotPolicy::PerLocationLatest,
        }
    }
}

impl Args {
    pub fn log_level(&self) -> Level {
        if self.verbose {
            Level::DEBUG
        } else if self.quiet {
            Level::WARN
        } else {
            Level::INFO
        }
    }

    pub fn apply_to(&self, config: &mut PipelineConfig) {
        if let Some(input) = &self.input {
            config.input = input.clone();
        }
        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
        if let Some(countries) = &self.countries {
            config.cleaning.locations = countries
                .iter()
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty())
                .collect();
        }
        if let Some(snapshot) = self.snapshot {
            config.snapshot = snapshot.into();
        }
        if self.no_charts {
            config.charts.enabled = false;
        }
    }
}
