use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One row of the OWID table, as read. Extra columns in the file are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct CovidRecord {
    pub location: Option<String>,
    pub date: Option<String>,
    pub total_cases: Option<f64>,
    pub new_cases: Option<f64>,
    pub total_deaths: Option<f64>,
    pub new_deaths: Option<f64>,
    pub total_vaccinations: Option<f64>,
    pub people_vaccinated: Option<f64>,
    pub population: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CleanedRecord {
    pub location: String,
    pub date: NaiveDate,
    pub total_cases: f64,
    pub new_cases: f64,
    pub total_deaths: f64,
    pub new_deaths: f64,
    // Forward-filled per location, absent until the first reported value.
    pub total_vaccinations: Option<f64>,
    pub people_vaccinated: Option<f64>,
    pub population: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricRecord {
    pub record: CleanedRecord,
    pub death_rate: f64,
    /// `None` when population is zero/unknown or nobody is reported vaccinated yet.
    pub percent_vaccinated: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRecord {
    pub location: String,
    pub date: NaiveDate,
    pub total_cases: f64,
    pub total_deaths: f64,
    pub total_vaccinations: Option<f64>,
    pub death_rate: f64,
    pub percent_vaccinated: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Numeric,
    Text,
    Empty,
}

impl ColumnKind {
    pub fn label(&self) -> &'static str {
        match self {
            ColumnKind::Numeric => "float64",
            ColumnKind::Text => "object",
            ColumnKind::Empty => "empty",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnProfile {
    pub name: String,
    pub non_null: usize,
    pub kind: ColumnKind,
}

impl ColumnProfile {
    pub fn missing(&self, rows: usize) -> usize {
        rows.saturating_sub(self.non_null)
    }
}
