use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error(
        "'{}' not found. Please download it from https://covid.ourworldindata.org/data/owid-covid-data.csv",
        .path.display()
    )]
    MissingFile { path: PathBuf },

    #[error("error loading dataset '{}': {source}", .path.display())]
    LoadFailure {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("dataset is missing required columns: {}", .columns.join(", "))]
    MissingColumns { columns: Vec<String> },

    #[error("invalid config file '{}': {message}", .path.display())]
    Config { path: PathBuf, message: String },
}

pub type Result<T> = std::result::Result<T, TrackerError>;
