//! Load -> clean -> derive -> aggregate. `run` does it in one call; `load`
//! and `process` let the caller report between the two halves.

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::aggregate::{latest_date, missing_from_summary, summarize};
use crate::clean::{clean_records, missing_after_cleaning, validate_columns};
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::load_clean::{load_dataset, Dataset};
use crate::metrics::derive_metrics;
use crate::models::{MetricRecord, SummaryRecord};

#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub dataset: Dataset,
    pub missing_after: Vec<(String, Option<usize>)>,
    pub records: Vec<MetricRecord>,
    pub latest_date: Option<NaiveDate>,
    pub summary: Vec<SummaryRecord>,
}

pub fn run(config: &PipelineConfig) -> Result<PipelineOutput> {
    process(load(config)?, config)
}

/// Reads the configured input file. Nothing is checked beyond the CSV itself.
pub fn load(config: &PipelineConfig) -> Result<Dataset> {
    load_dataset(&config.input, config.preview_rows)
}

/// Validates, cleans, derives and summarizes an already loaded dataset.
pub fn process(mut dataset: Dataset, config: &PipelineConfig) -> Result<PipelineOutput> {
    validate_columns(&dataset.headers, &config.cleaning.required_columns)?;

    // The typed rows move into cleaning; the dataset keeps the file description.
    let raw = std::mem::take(&mut dataset.records);
    let cleaned = clean_records(raw, &config.cleaning);
    let missing_after = missing_after_cleaning(&cleaned, &config.key_columns);

    let records = derive_metrics(cleaned);
    let latest = latest_date(&records);
    let summary = summarize(&records, config.snapshot);

    match latest {
        Some(date) => info!("Latest date in cleaned data: {}", date),
        None => warn!("No rows left after cleaning; summary is empty"),
    }
    let dropped = missing_from_summary(&summary, &config.cleaning.locations);
    if latest.is_some() && !dropped.is_empty() {
        warn!(
            "No data at the snapshot date for {}; they are left out of the summary",
            dropped.join(", ")
        );
    }

    Ok(PipelineOutput {
        dataset,
        missing_after,
        records,
        latest_date: latest,
        summary,
    })
}
