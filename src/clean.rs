use chrono::NaiveDate;
use tracing::{debug, info};

use crate::config::CleaningConfig;
use crate::error::{Result, TrackerError};
use crate::models::{CleanedRecord, CovidRecord};

const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn validate_columns(headers: &[String], required: &[String]) -> Result<()> {
    let missing: Vec<String> = required
        .iter()
        .filter(|column| !headers.contains(column))
        .cloned()
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(TrackerError::MissingColumns { columns: missing })
    }
}

pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).ok()
}

/// Restrict to the configured locations, drop rows without a usable date or
/// location, default case/death gaps to 0 and forward-fill vaccination counts
/// within each location.
///
/// The result is ordered by the position of the location in `config.locations`,
/// then by date. Rows sharing a location and date keep their input order.
pub fn clean_records(records: Vec<CovidRecord>, config: &CleaningConfig) -> Vec<CleanedRecord> {
    let total = records.len();
    let mut undated = 0usize;

    let mut cleaned: Vec<CleanedRecord> = records
        .into_iter()
        .filter_map(|record| {
            let location = record.location.filter(|l| !l.is_empty())?;
            if !config.locations.contains(&location) {
                return None;
            }
            let Some(date) = record.date.as_deref().and_then(parse_date) else {
                undated += 1;
                return None;
            };

            Some(CleanedRecord {
                location,
                date,
                total_cases: record.total_cases.unwrap_or(0.0),
                new_cases: record.new_cases.unwrap_or(0.0),
                total_deaths: record.total_deaths.unwrap_or(0.0),
                new_deaths: record.new_deaths.unwrap_or(0.0),
                total_vaccinations: record.total_vaccinations,
                people_vaccinated: record.people_vaccinated,
                population: record.population,
            })
        })
        .collect();

    cleaned.sort_by_key(|r| (location_rank(&config.locations, &r.location), r.date));

    for group in cleaned.chunk_by_mut(|a, b| a.location == b.location) {
        forward_fill(group.iter_mut().map(|r| &mut r.total_vaccinations));
        forward_fill(group.iter_mut().map(|r| &mut r.people_vaccinated));
    }

    if undated > 0 {
        debug!("Dropped {} rows without a valid date", undated);
    }
    info!(
        "Cleaning kept {} of {} rows for {}",
        cleaned.len(),
        total,
        config.locations.join(", ")
    );

    cleaned
}

fn location_rank(locations: &[String], location: &str) -> usize {
    locations
        .iter()
        .position(|l| l == location)
        .unwrap_or(locations.len())
}

/// Replace each gap with the last value seen before it in the sequence.
pub fn forward_fill<'a>(values: impl Iterator<Item = &'a mut Option<f64>>) {
    let mut last = None;
    for value in values {
        match value {
            Some(v) => last = Some(*v),
            None => *value = last,
        }
    }
}

/// Missing cells per key column after cleaning. Columns the cleaned table does
/// not carry report `None`.
pub fn missing_after_cleaning(records: &[CleanedRecord], columns: &[String]) -> Vec<(String, Option<usize>)> {
    columns
        .iter()
        .map(|column| {
            let count = match column.as_str() {
                "date" | "location" | "total_cases" | "new_cases" | "total_deaths"
                | "new_deaths" => Some(0),
                "total_vaccinations" => Some(records.iter().filter(|r| r.total_vaccinations.is_none()).count()),
                "people_vaccinated" => Some(records.iter().filter(|r| r.people_vaccinated.is_none()).count()),
                "population" => Some(records.iter().filter(|r| r.population.is_none()).count()),
                _ => None,
            };
            (column.clone(), count)
        })
        .collect()
}
