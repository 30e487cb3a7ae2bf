use std::fs::File;
use std::io;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::{debug, info};

use crate::error::{Result, TrackerError};
use crate::models::{ColumnKind, ColumnProfile, CovidRecord};

/// The raw table: typed rows plus what the report needs to describe the file.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub headers: Vec<String>,
    /// Data rows in the file. Stays put when `records` is handed on.
    pub rows: usize,
    pub preview: Vec<StringRecord>,
    pub profiles: Vec<ColumnProfile>,
    pub records: Vec<CovidRecord>,
}

impl Dataset {
    pub fn row_count(&self) -> usize {
        self.rows
    }

    pub fn profile(&self, column: &str) -> Option<&ColumnProfile> {
        self.profiles.iter().find(|p| p.name == column)
    }

    /// Missing cells per column, `None` for columns the file does not have.
    pub fn missing_counts(&self, columns: &[String]) -> Vec<(String, Option<usize>)> {
        columns
            .iter()
            .map(|c| (c.clone(), self.profile(c).map(|p| p.missing(self.row_count()))))
            .collect()
    }
}

struct ColumnTally {
    non_null: usize,
    numeric: bool,
}

// Load the whole CSV in one pass
pub fn load_dataset(path: &Path, preview_rows: usize) -> Result<Dataset> {
    let file = File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => TrackerError::MissingFile {
            path: path.to_path_buf(),
        },
        _ => load_failure(path, e.into()),
    })?;

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(file);

    let header_record = reader
        .headers()
        .map_err(|e| load_failure(path, e))?
        .clone();
    let headers: Vec<String> = header_record.iter().map(|h| h.to_string()).collect();

    let mut tallies: Vec<ColumnTally> = headers
        .iter()
        .map(|_| ColumnTally {
            non_null: 0,
            numeric: true,
        })
        .collect();
    let mut preview = Vec::with_capacity(preview_rows);
    let mut records = Vec::new();

    for result in reader.records() {
        let row = result.map_err(|e| load_failure(path, e))?;
        for (tally, value) in tallies.iter_mut().zip(row.iter()) {
            if !value.is_empty() {
                tally.non_null += 1;
                tally.numeric = tally.numeric && value.parse::<f64>().is_ok();
            }
        }

        let record: CovidRecord = row
            .deserialize(Some(&header_record))
            .map_err(|e| load_failure(path, e))?;
        records.push(record);

        if preview.len() < preview_rows {
            preview.push(row);
        }
    }

    let profiles = headers
        .iter()
        .zip(tallies)
        .map(|(name, tally)| ColumnProfile {
            name: name.clone(),
            non_null: tally.non_null,
            kind: match (tally.non_null, tally.numeric) {
                (0, _) => ColumnKind::Empty,
                (_, true) => ColumnKind::Numeric,
                (_, false) => ColumnKind::Text,
            },
        })
        .collect();

    info!(
        "Dataset loaded from {}: {} rows, {} columns",
        path.display(),
        records.len(),
        headers.len()
    );
    debug!("Columns: {:?}", headers);

    Ok(Dataset {
        headers,
        rows: records.len(),
        preview,
        profiles,
        records,
    })
}

fn load_failure(path: &Path, source: csv::Error) -> TrackerError {
    TrackerError::LoadFailure {
        path: path.to_path_buf(),
        source,
    }
}
