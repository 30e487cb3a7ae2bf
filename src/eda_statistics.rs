use ndarray::{Array2, ArrayView1, Axis};
use ndarray_stats::QuantileExt;
use statrs::distribution::{Continuous, Normal};
use statrs::statistics::{Data, Distribution};

use crate::models::MetricRecord;

/// Numeric columns of the cleaned table, in report order.
pub const NUMERIC_COLUMNS: [&str; 6] = [
    "total_cases",
    "new_cases",
    "total_deaths",
    "new_deaths",
    "total_vaccinations",
    "people_vaccinated",
];

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSummary {
    pub name: String,
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

// Rows x NUMERIC_COLUMNS, undefined cells as NaN
pub(crate) fn numeric_matrix(records: &[MetricRecord]) -> Array2<f64> {
    let mut matrix = Array2::from_elem((records.len(), NUMERIC_COLUMNS.len()), f64::NAN);
    for (mut row, r) in matrix.axis_iter_mut(Axis(0)).zip(records) {
        let r = &r.record;
        row[0] = r.total_cases;
        row[1] = r.new_cases;
        row[2] = r.total_deaths;
        row[3] = r.new_deaths;
        row[4] = r.total_vaccinations.unwrap_or(f64::NAN);
        row[5] = r.people_vaccinated.unwrap_or(f64::NAN);
    }
    matrix
}

/// count / mean / std / min / quartiles / max per numeric column, skipping
/// undefined cells. Columns with no values report NaN statistics.
pub fn describe(records: &[MetricRecord]) -> Vec<ColumnSummary> {
    let matrix = numeric_matrix(records);
    NUMERIC_COLUMNS
        .iter()
        .zip(matrix.axis_iter(Axis(1)))
        .map(|(name, column)| summarize_column(name, column))
        .collect()
}

fn summarize_column(name: &str, column: ArrayView1<f64>) -> ColumnSummary {
    let mut values: Vec<f64> = column.iter().copied().filter(|v| !v.is_nan()).collect();
    values.sort_by(|a, b| a.total_cmp(b));

    let stats = Data::new(values.clone());
    ColumnSummary {
        name: name.to_string(),
        count: values.len(),
        mean: stats.mean().unwrap_or(f64::NAN),
        std: stats.std_dev().unwrap_or(f64::NAN),
        min: *column.min_skipnan(),
        q25: quantile_sorted(&values, 0.25),
        median: quantile_sorted(&values, 0.5),
        q75: quantile_sorted(&values, 0.75),
        max: *column.max_skipnan(),
    }
}

/// Linear-interpolated quantile of an ascending slice.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    match sorted.len() {
        0 => f64::NAN,
        1 => sorted[0],
        n => {
            let position = q.clamp(0.0, 1.0) * (n - 1) as f64;
            let lower = position.floor() as usize;
            let upper = position.ceil() as usize;
            let fraction = position - lower as f64;
            sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
        }
    }
}

/// Equal-width bins spanning the data. The last bin is closed on the right so
/// the maximum is counted. A constant sample gets a unit-wide range around it.
pub fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() || bins == 0 {
        return Vec::new();
    }

    let (mut lo, mut hi) = finite
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }
    let width = (hi - lo) / bins as f64;

    let mut counts = vec![0usize; bins];
    for v in finite {
        let index = (((v - lo) / width) as usize).min(bins - 1);
        counts[index] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            start: lo + width * i as f64,
            end: lo + width * (i + 1) as f64,
            count,
        })
        .collect()
}

/// Gaussian kernel density estimate with Scott's bandwidth, evaluated at
/// `points` evenly spaced positions over `[lo, hi]` and scaled by
/// `scale` (sample size x bin width puts it on a count axis).
///
/// Returns `None` when the bandwidth is degenerate (fewer than two values or
/// zero spread).
pub fn gaussian_kde(values: &[f64], lo: f64, hi: f64, points: usize, scale: f64) -> Option<Vec<(f64, f64)>> {
    let n = values.len();
    if n < 2 || points < 2 {
        return None;
    }
    let std = Data::new(values.to_vec()).std_dev()?;
    let bandwidth = std * (n as f64).powf(-0.2);
    if !(bandwidth.is_finite() && bandwidth > 0.0) {
        return None;
    }

    let kernel = Normal::new(0.0, 1.0).ok()?;
    let step = (hi - lo) / (points - 1) as f64;
    let curve = (0..points)
        .map(|i| {
            let x = lo + step * i as f64;
            let density = values
                .iter()
                .map(|&v| kernel.pdf((x - v) / bandwidth))
                .sum::<f64>()
                / (n as f64 * bandwidth);
            (x, density * scale)
        })
        .collect();
    Some(curve)
}
