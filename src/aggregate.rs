use chrono::NaiveDate;
use itertools::Itertools;

use crate::config::SnapshotPolicy;
use crate::models::{MetricRecord, SummaryRecord};

pub fn latest_date(records: &[MetricRecord]) -> Option<NaiveDate> {
    records.iter().map(|r| r.record.date).max()
}

/// One summary row per location, ordered by location name.
///
/// Within a location the last row in cleaning order wins, matching a
/// group-by "last" over the cleaned table.
pub fn summarize(records: &[MetricRecord], policy: SnapshotPolicy) -> Vec<SummaryRecord> {
    let selected: Vec<&MetricRecord> = match policy {
        SnapshotPolicy::GlobalLatest => match latest_date(records) {
            Some(latest) => records.iter().filter(|r| r.record.date == latest).collect(),
            None => Vec::new(),
        },
        SnapshotPolicy::PerLocationLatest => records.iter().collect(),
    };

    let groups = selected
        .into_iter()
        .into_group_map_by(|r| r.record.location.clone());

    groups
        .into_iter()
        .filter_map(|(_, rows)| {
            let last = match policy {
                SnapshotPolicy::GlobalLatest => rows.last().copied(),
                // Stable max keeps the later row on equal dates.
                SnapshotPolicy::PerLocationLatest => rows.iter().copied().max_by_key(|r| r.record.date),
            }?;
            Some(SummaryRecord {
                location: last.record.location.clone(),
                date: last.record.date,
                total_cases: last.record.total_cases,
                total_deaths: last.record.total_deaths,
                total_vaccinations: last.record.total_vaccinations,
                death_rate: last.death_rate,
                percent_vaccinated: last.percent_vaccinated,
            })
        })
        .sorted_by(|a, b| a.location.cmp(&b.location))
        .collect()
}

/// Configured locations that did not make it into the summary.
pub fn missing_from_summary<'a>(summary: &[SummaryRecord], locations: &'a [String]) -> Vec<&'a str> {
    locations
        .iter()
        .filter(|l| !summary.iter().any(|s| &s.location == *l))
        .map(|l| l.as_str())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CleanedRecord;

    fn row(location: &str, day: u32, total_cases: f64) -> MetricRecord {
        MetricRecord {
            record: CleanedRecord {
                location: location.to_string(),
                date: NaiveDate::from_ymd_opt(2021, 5, day).unwrap(),
                total_cases,
                new_cases: 0.0,
                total_deaths: total_cases / 100.0,
                new_deaths: 0.0,
                total_vaccinations: Some(day as f64 * 10.0),
                people_vaccinated: None,
                population: None,
            },
            death_rate: if total_cases == 0.0 { 0.0 } else { 0.01 },
            percent_vaccinated: None,
        }
    }

    #[test]
    fn latest_date_is_global_maximum() {
        let records = vec![row("Kenya", 3, 1.0), row("India", 7, 1.0), row("India", 2, 1.0)];
        assert_eq!(latest_date(&records), NaiveDate::from_ymd_opt(2021, 5, 7));
        assert_eq!(latest_date(&[]), None);
    }

    #[test]
    fn global_latest_uses_only_rows_at_max_date() {
        let records = vec![
            row("Kenya", 1, 10.0),
            row("Kenya", 2, 20.0),
            row("United States", 1, 100.0),
            row("United States", 2, 200.0),
            row("India", 1, 50.0),
        ];
        let summary = summarize(&records, SnapshotPolicy::GlobalLatest);
        let locations: Vec<&str> = summary.iter().map(|s| s.location.as_str()).collect();
        assert_eq!(locations, vec!["Kenya", "United States"]);
        assert!(summary.iter().all(|s| s.date == NaiveDate::from_ymd_opt(2021, 5, 2).unwrap()));
        assert_eq!(summary[0].total_cases, 20.0);
        assert_eq!(summary[1].total_vaccinations, Some(20.0));

        let locations = crate::config::CleaningConfig::default().locations;
        assert_eq!(missing_from_summary(&summary, &locations), vec!["India"]);
    }

    #[test]
    fn duplicate_rows_on_max_date_take_the_last() {
        let records = vec![row("Kenya", 2, 20.0), row("Kenya", 2, 25.0)];
        let summary = summarize(&records, SnapshotPolicy::GlobalLatest);
        assert_eq!(summary.len(), 1);
        assert_eq!(summary[0].total_cases, 25.0);
    }

    #[test]
    fn per_location_latest_keeps_lagging_locations() {
        let records = vec![
            row("Kenya", 1, 10.0),
            row("Kenya", 2, 20.0),
            row("India", 1, 50.0),
        ];
        let summary = summarize(&records, SnapshotPolicy::PerLocationLatest);
        assert_eq!(summary.len(), 2);
        assert_eq!(summary[0].location, "India");
        assert_eq!(summary[0].date, NaiveDate::from_ymd_opt(2021, 5, 1).unwrap());
        assert_eq!(summary[1].total_cases, 20.0);
    }

    #[test]
    fn empty_table_gives_empty_summary() {
        assert!(summarize(&[], SnapshotPolicy::GlobalLatest).is_empty());
        assert!(summarize(&[], SnapshotPolicy::PerLocationLatest).is_empty());
    }
}
