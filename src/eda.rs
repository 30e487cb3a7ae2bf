use std::path::Path;

use crate::eda_statistics::ColumnSummary;
use crate::load_clean::Dataset;
use crate::models::SummaryRecord;

const PREVIEW_COLUMNS: usize = 8;

pub fn print_section(title: &str) {
    println!("\n=== {} ===", title);
}

fn format_value(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{:.0}", value)
    } else {
        format!("{:.4}", value)
    }
}

fn format_optional(value: Option<f64>) -> String {
    value.map(format_value).unwrap_or_else(|| "NaN".to_string())
}

// Head, column list, info and missing counts of the raw file
pub fn report_dataset(dataset: &Dataset, key_columns: &[String]) {
    println!("\nFirst {} rows of the dataset:", dataset.preview.len());
    let shown = dataset.headers.len().min(PREVIEW_COLUMNS);
    let truncated = if dataset.headers.len() > shown { " ..." } else { "" };
    println!("{}{}", dataset.headers[..shown].join(" | "), truncated);
    for row in &dataset.preview {
        let cells: Vec<&str> = row.iter().take(shown).map(|c| if c.is_empty() { "NaN" } else { c }).collect();
        println!("{}{}", cells.join(" | "), truncated);
    }

    println!("\nColumns in dataset:");
    println!("{:?}", dataset.headers);

    println!("\nDataset Info:");
    println!("{} entries, {} columns", dataset.row_count(), dataset.headers.len());
    println!("{:>4}  {:<40} {:>14}  {}", "#", "Column", "Non-Null Count", "Dtype");
    for (i, profile) in dataset.profiles.iter().enumerate() {
        println!(
            "{:>4}  {:<40} {:>14}  {}",
            i,
            profile.name,
            profile.non_null,
            profile.kind.label()
        );
    }

    println!("\nMissing Values (selected columns):");
    print_missing(&dataset.missing_counts(key_columns));
}

pub fn print_missing(counts: &[(String, Option<usize>)]) {
    for (column, count) in counts {
        match count {
            Some(count) => println!("{:<20} {}", column, count),
            None => println!("{:<20} (column not present)", column),
        }
    }
}

pub fn report_initial_observations() {
    println!("\nInitial Observations:");
    println!("- Dataset contains global COVID-19 data by date and location.");
    println!("- Key columns include cases, deaths, and vaccinations.");
    println!("- Missing values are present, especially in vaccination data (expected for early pandemic).");
}

pub fn report_cleaning(missing_after: &[(String, Option<usize>)], locations: &[String]) {
    println!("\nMissing Values After Cleaning:");
    print_missing(missing_after);

    println!("\nCleaning Observations:");
    println!("- Filtered for {}.", locations.join(", "));
    println!("- Parsed 'date' as a calendar date; rows without a date or location were dropped.");
    println!("- Filled missing cases/deaths with 0, forward filled vaccinations per location.");
}

pub fn report_statistics(columns: &[ColumnSummary]) {
    println!("\nBasic Statistics for Numerical Columns:");
    print!("{:<8}", "");
    for column in columns {
        print!(" {:>20}", column.name);
    }
    println!();

    let rows: [(&str, fn(&ColumnSummary) -> f64); 8] = [
        ("count", |c: &ColumnSummary| c.count as f64),
        ("mean", |c: &ColumnSummary| c.mean),
        ("std", |c: &ColumnSummary| c.std),
        ("min", |c: &ColumnSummary| c.min),
        ("25%", |c: &ColumnSummary| c.q25),
        ("50%", |c: &ColumnSummary| c.median),
        ("75%", |c: &ColumnSummary| c.q75),
        ("max", |c: &ColumnSummary| c.max),
    ];
    for (label, value) in rows {
        print!("{:<8}", label);
        for column in columns {
            print!(" {:>20}", format_value(value(column)));
        }
        println!();
    }
}

pub fn report_summary(summary: &[SummaryRecord]) {
    println!("\nLatest Data by Country (most recent date):");
    if summary.is_empty() {
        println!("(no rows at the latest date)");
        return;
    }
    println!(
        "{:<16} {:<12} {:>16} {:>14} {:>20} {:>12}",
        "location", "date", "total_cases", "total_deaths", "total_vaccinations", "death_rate"
    );
    for s in summary {
        println!(
            "{:<16} {:<12} {:>16} {:>14} {:>20} {:>12.6}",
            s.location,
            s.date.to_string(),
            format_value(s.total_cases),
            format_value(s.total_deaths),
            format_optional(s.total_vaccinations),
            s.death_rate
        );
    }
}

/// Observations drawn from the summary rows. Empty when there is nothing to compare.
pub fn summary_observations(summary: &[SummaryRecord]) -> Vec<String> {
    let mut notes = Vec::new();
    let by = |key: fn(&SummaryRecord) -> f64| {
        let max = summary.iter().max_by(|a, b| key(a).total_cmp(&key(b)));
        let min = summary.iter().min_by(|a, b| key(a).total_cmp(&key(b)));
        (max, min)
    };

    if summary.len() >= 2 {
        if let (Some(max), Some(min)) = by(|s| s.total_cases) {
            notes.push(format!("{} has the highest total cases; {} has the fewest.", max.location, min.location));
        }
        if let (Some(max), Some(min)) = by(|s| s.death_rate) {
            notes.push(format!(
                "Death rate ranges from {:.2}% ({}) to {:.2}% ({}).",
                min.death_rate * 100.0,
                min.location,
                max.death_rate * 100.0,
                max.location
            ));
        }
    }

    let vaccinated: Vec<&SummaryRecord> = summary.iter().filter(|s| s.percent_vaccinated.is_some()).collect();
    if let Some(leader) = vaccinated
        .iter()
        .max_by(|a, b| a.percent_vaccinated.unwrap_or(0.0).total_cmp(&b.percent_vaccinated.unwrap_or(0.0)))
    {
        notes.push(format!(
            "{} leads in share of population vaccinated ({:.1}%).",
            leader.location,
            leader.percent_vaccinated.unwrap_or(0.0)
        ));
    }
    if vaccinated.len() < summary.len() {
        notes.push("Vaccination coverage is unknown for some locations at the latest date.".to_string());
    }
    notes
}

pub fn report_eda_observations(summary: &[SummaryRecord]) {
    println!("\nEDA Observations:");
    for note in summary_observations(summary) {
        println!("- {}", note);
    }
    println!("- Vaccination data shows progress, but coverage varies.");
}

pub fn report_vaccination(summary: &[SummaryRecord]) {
    println!("\nPercentage of Population Vaccinated (latest date):");
    for s in summary {
        match s.percent_vaccinated {
            Some(p) => println!("{:<16} {:>8.2}%", s.location, p),
            None => println!("{:<16} {:>9}", s.location, "NaN"),
        }
    }
}

const SKEW_INSIGHT: &str =
    "Daily new cases are right-skewed: most days are low, with occasional large spikes.";

/// One line per location with its snapshot figures, then the distribution note.
pub fn key_insights(summary: &[SummaryRecord]) -> Vec<String> {
    let mut insights: Vec<String> = summary
        .iter()
        .map(|s| {
            let coverage = match s.percent_vaccinated {
                Some(p) => format!("{:.2}% of the population vaccinated", p),
                None => "vaccination coverage unknown".to_string(),
            };
            format!(
                "{} on {}: {} cases, {} deaths ({:.2}% of cases fatal), {}.",
                s.location,
                s.date,
                format_value(s.total_cases),
                format_value(s.total_deaths),
                s.death_rate * 100.0,
                coverage
            )
        })
        .collect();
    insights.push(SKEW_INSIGHT.to_string());
    insights
}

pub fn report_insights(summary: &[SummaryRecord]) {
    println!("\nKey Insights:");
    for (i, insight) in key_insights(summary).iter().enumerate() {
        println!("{}. {}", i + 1, insight);
    }

    println!("\nInteresting Patterns:");
    println!("- Vaccination rollouts accelerated in 2021, visible as steep rises in the vaccination lines.");
    println!("- Sparse vaccination reporting shows up as flat, forward-filled stretches.");
    println!("- Case waves appear as steep segments in the total cases chart.");
}

pub fn report_completion(images: Option<(&Path, &Path)>) {
    match images {
        Some((overview, vaccination)) => println!(
            "\nScript completed. Visualizations saved as '{}' and '{}'.",
            overview.display(),
            vaccination.display()
        ),
        None => println!("\nScript completed. Chart rendering was disabled."),
    }
}
