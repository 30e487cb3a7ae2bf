use crate::models::{CleanedRecord, MetricRecord};

/// Deaths per confirmed case. A location with no cases has a rate of 0.
pub fn death_rate(total_cases: f64, total_deaths: f64) -> f64 {
    if total_cases == 0.0 {
        return 0.0;
    }
    let rate = total_deaths / total_cases;
    if rate.is_finite() {
        rate
    } else {
        0.0
    }
}

/// Share of the population with at least one dose, in percent. Undefined
/// (not zero) when either input is unknown or the population is 0.
pub fn percent_vaccinated(people_vaccinated: Option<f64>, population: Option<f64>) -> Option<f64> {
    match (people_vaccinated, population) {
        (Some(people), Some(population)) if population != 0.0 => {
            Some(people / population * 100.0).filter(|p| p.is_finite())
        }
        _ => None,
    }
}

pub fn derive_metrics(records: Vec<CleanedRecord>) -> Vec<MetricRecord> {
    records
        .into_iter()
        .map(|record| MetricRecord {
            death_rate: death_rate(record.total_cases, record.total_deaths),
            percent_vaccinated: percent_vaccinated(record.people_vaccinated, record.population),
            record,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn cleaned(total_cases: f64, total_deaths: f64) -> CleanedRecord {
        CleanedRecord {
            location: "India".to_string(),
            date: NaiveDate::from_ymd_opt(2021, 5, 1).unwrap(),
            total_cases,
            new_cases: 0.0,
            total_deaths,
            new_deaths: 0.0,
            total_vaccinations: None,
            people_vaccinated: None,
            population: None,
        }
    }

    #[test]
    fn death_rate_is_exact_quotient() {
        assert_eq!(death_rate(20_000_000.0, 220_000.0), 220_000.0 / 20_000_000.0);
        assert!((death_rate(20_000_000.0, 220_000.0) - 0.011).abs() < 1e-12);
    }

    #[test]
    fn death_rate_is_zero_without_cases() {
        assert_eq!(death_rate(0.0, 0.0), 0.0);
        assert_eq!(death_rate(0.0, 5.0), 0.0);
    }

    #[test]
    fn percent_vaccinated_is_undefined_not_zero() {
        assert_eq!(percent_vaccinated(Some(50.0), Some(200.0)), Some(25.0));
        assert_eq!(percent_vaccinated(Some(50.0), Some(0.0)), None);
        assert_eq!(percent_vaccinated(None, Some(200.0)), None);
        assert_eq!(percent_vaccinated(Some(50.0), None), None);
        assert_eq!(percent_vaccinated(Some(0.0), Some(200.0)), Some(0.0));
    }

    #[test]
    fn derive_metrics_keeps_records_intact() {
        let mut kenya = cleaned(0.0, 0.0);
        kenya.location = "Kenya".to_string();
        kenya.people_vaccinated = Some(5_377_130.0);
        kenya.population = Some(53_771_300.0);

        let derived = derive_metrics(vec![cleaned(20_000_000.0, 220_000.0), kenya.clone()]);
        assert_eq!(derived.len(), 2);
        assert!((derived[0].death_rate - 0.011).abs() < 1e-12);
        assert_eq!(derived[0].percent_vaccinated, None);
        assert_eq!(derived[1].record, kenya);
        assert_eq!(derived[1].death_rate, 0.0);
        assert!((derived[1].percent_vaccinated.unwrap() - 10.0).abs() < 1e-9);
    }
}
