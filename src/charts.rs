use std::error::Error;
use std::path::Path;

use chrono::{Duration, NaiveDate};
use plotters::coord::Shift;
use plotters::prelude::*;
use tracing::info;

use crate::config::ChartConfig;
use crate::eda_statistics::{gaussian_kde, histogram};
use crate::models::{MetricRecord, SummaryRecord};

type Area<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

const PALETTE: [RGBColor; 6] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
];
const SKY_BLUE: RGBColor = RGBColor(135, 206, 235);
const KDE_POINTS: usize = 200;

/// Compact axis label for large counts, e.g. 1.5M.
pub fn format_count(value: f64) -> String {
    let abs = value.abs();
    if abs >= 1e9 {
        format!("{:.1}B", value / 1e9)
    } else if abs >= 1e6 {
        format!("{:.1}M", value / 1e6)
    } else if abs >= 1e3 {
        format!("{:.0}K", value / 1e3)
    } else {
        format!("{:.0}", value)
    }
}

/// Axis label for a percentage. Values under 1% keep two significant digits
/// so an early rollout does not collapse to "0".
pub fn format_percent(value: f64) -> String {
    let abs = value.abs();
    if abs == 0.0 || abs >= 1.0 || !abs.is_finite() {
        return format!("{:.1}%", value);
    }
    let digits = ((-abs.log10()).ceil() as usize + 1).min(12);
    format!("{:.*}%", digits, value)
}

/// Colour of a location, fixed by its position in the configured list so it
/// matches across every chart.
fn location_color(locations: &[String], location: &str) -> RGBColor {
    let index = locations
        .iter()
        .position(|l| l == location)
        .unwrap_or(locations.len());
    PALETTE[index % PALETTE.len()]
}

// One unit-wide slot per bar; ticks sit on the slot centres.
fn bar_slots(bars: usize) -> (f64, Vec<f64>) {
    let width = bars.max(1) as f64;
    (width, (0..bars).map(|i| i as f64 + 0.5).collect())
}

fn padded(max: f64) -> f64 {
    if max.is_finite() && max > 0.0 {
        max * 1.05
    } else {
        1.0
    }
}

fn date_range(records: &[MetricRecord]) -> (NaiveDate, NaiveDate) {
    let start = records.iter().map(|r| r.record.date).min();
    let end = records.iter().map(|r| r.record.date).max();
    match (start, end) {
        (Some(start), Some(end)) if end > start => (start, end),
        (Some(day), _) => (day, day + Duration::days(1)),
        _ => {
            let epoch = NaiveDate::default();
            (epoch, epoch + Duration::days(1))
        }
    }
}

/// 2x2 overview: cases over time, cases per location, vaccinations over time
/// and the distribution of daily new cases.
pub fn render_overview(
    records: &[MetricRecord],
    summary: &[SummaryRecord],
    locations: &[String],
    config: &ChartConfig,
    output_file: &Path,
) -> Result<(), Box<dyn Error>> {
    let root = BitMapBackend::new(output_file, config.overview_size).into_drawing_area();
    root.fill(&WHITE)?;
    let areas = root.split_evenly((2, 2));

    draw_time_series(
        &areas[0],
        "Total COVID-19 Cases Over Time",
        "Total Cases",
        records,
        locations,
        |r| Some(r.record.total_cases),
    )?;

    let cases: Vec<(String, f64)> = summary
        .iter()
        .map(|s| (s.location.clone(), s.total_cases))
        .collect();
    draw_location_bars(
        &areas[1],
        "Total Cases by Country (Latest Date)",
        "Total Cases",
        &cases,
        locations,
        format_count,
    )?;

    draw_time_series(
        &areas[2],
        "Total Vaccinations Over Time",
        "Total Vaccinations",
        records,
        locations,
        |r| r.record.total_vaccinations,
    )?;

    let new_cases: Vec<f64> = records.iter().map(|r| r.record.new_cases).collect();
    draw_histogram(&areas[3], &new_cases, config.histogram_bins)?;

    root.present()?;
    info!("Overview charts saved to {}", output_file.display());
    Ok(())
}

/// Share of population vaccinated per location. Locations without a defined
/// percentage get no bar.
pub fn render_vaccination(
    summary: &[SummaryRecord],
    locations: &[String],
    config: &ChartConfig,
    output_file: &Path,
) -> Result<(), Box<dyn Error>> {
    let root = BitMapBackend::new(output_file, config.vaccination_size).into_drawing_area();
    root.fill(&WHITE)?;

    let percentages: Vec<(String, f64)> = summary
        .iter()
        .filter_map(|s| s.percent_vaccinated.map(|p| (s.location.clone(), p)))
        .collect();
    draw_location_bars(
        &root,
        "Percentage of Population Vaccinated (Latest Date)",
        "% Vaccinated",
        &percentages,
        locations,
        format_percent,
    )?;

    root.present()?;
    info!("Vaccination chart saved to {}", output_file.display());
    Ok(())
}

fn draw_time_series(
    area: &Area,
    title: &str,
    y_desc: &str,
    records: &[MetricRecord],
    locations: &[String],
    value: fn(&MetricRecord) -> Option<f64>,
) -> Result<(), Box<dyn Error>> {
    let series: Vec<(&str, Vec<(NaiveDate, f64)>)> = locations
        .iter()
        .map(|location| {
            let points = records
                .iter()
                .filter(|r| &r.record.location == location)
                .filter_map(|r| value(r).map(|v| (r.record.date, v)))
                .collect();
            (location.as_str(), points)
        })
        .collect();

    let (start, end) = date_range(records);
    let y_max = series
        .iter()
        .flat_map(|(_, points)| points.iter().map(|(_, v)| *v))
        .fold(0.0, f64::max);

    let mut chart = ChartBuilder::on(area)
        .caption(title, ("sans-serif", 22))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d(start..end, 0f64..padded(y_max))?;

    chart
        .configure_mesh()
        .x_desc("Date")
        .y_desc(y_desc)
        .x_labels(6)
        .x_label_formatter(&|d| d.format("%Y-%m").to_string())
        .y_label_formatter(&|v| format_count(*v))
        .draw()?;

    for (location, points) in series {
        let color = location_color(locations, location);
        chart
            .draw_series(LineSeries::new(points, color.stroke_width(2)))?
            .label(location)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &color));
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    Ok(())
}

fn draw_location_bars(
    area: &Area,
    title: &str,
    y_desc: &str,
    bars: &[(String, f64)],
    locations: &[String],
    y_format: fn(f64) -> String,
) -> Result<(), Box<dyn Error>> {
    let y_max = bars.iter().map(|(_, v)| *v).fold(0.0, f64::max);
    let (width, centres) = bar_slots(bars.len());

    let mut chart = ChartBuilder::on(area)
        .caption(title, ("sans-serif", 22))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d((0f64..width).with_key_points(centres), 0f64..padded(y_max))?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc("Country")
        .y_desc(y_desc)
        .x_label_formatter(&|x| {
            bars.get(x.max(0.0).floor() as usize)
                .map(|(name, _)| name.clone())
                .unwrap_or_default()
        })
        .y_label_formatter(&|v| y_format(*v))
        .draw()?;

    chart.draw_series(bars.iter().enumerate().map(|(i, (location, value))| {
        let left = i as f64 + 0.15;
        Rectangle::new(
            [(left, 0.0), (left + 0.7, *value)],
            location_color(locations, location).filled(),
        )
    }))?;

    Ok(())
}

fn draw_histogram(area: &Area, values: &[f64], bins: usize) -> Result<(), Box<dyn Error>> {
    let bins = histogram(values, bins);
    let (lo, hi) = match (bins.first(), bins.last()) {
        (Some(first), Some(last)) => (first.start, last.end),
        _ => (0.0, 1.0),
    };
    let y_max = bins.iter().map(|b| b.count).max().unwrap_or(0) as f64;

    let mut chart = ChartBuilder::on(area)
        .caption("Distribution of Daily New Cases", ("sans-serif", 22))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d(lo..hi, 0f64..padded(y_max))?;

    chart
        .configure_mesh()
        .x_desc("Daily New Cases")
        .y_desc("Frequency")
        .x_labels(6)
        .x_label_formatter(&|v| format_count(*v))
        .draw()?;

    chart.draw_series(bins.iter().map(|b| {
        Rectangle::new([(b.start, 0.0), (b.end, b.count as f64)], SKY_BLUE.filled())
    }))?;
    chart.draw_series(bins.iter().map(|b| {
        Rectangle::new([(b.start, 0.0), (b.end, b.count as f64)], WHITE.stroke_width(1))
    }))?;

    // Density on the count axis: n * bin width
    if let Some(width) = bins.first().map(|b| b.end - b.start) {
        let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        let scale = finite.len() as f64 * width;
        if let Some(curve) = gaussian_kde(&finite, lo, hi, KDE_POINTS, scale) {
            chart.draw_series(LineSeries::new(curve, PALETTE[0].stroke_width(2)))?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;
    use crate::models::CleanedRecord;

    fn locations() -> Vec<String> {
        ["Kenya", "United States", "India"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    fn metric(location: &str, day: u32, total_cases: f64, vaccinations: Option<f64>) -> MetricRecord {
        MetricRecord {
            record: CleanedRecord {
                location: location.to_string(),
                date: NaiveDate::from_ymd_opt(2021, 5, day).unwrap(),
                total_cases,
                new_cases: total_cases / 10.0,
                total_deaths: total_cases / 100.0,
                new_deaths: 0.0,
                total_vaccinations: vaccinations,
                people_vaccinated: vaccinations,
                population: Some(50_000_000.0),
            },
            death_rate: 0.01,
            percent_vaccinated: vaccinations.map(|v| v / 50_000_000.0 * 100.0),
        }
    }

    fn snapshot(location: &str, total_cases: f64, percent: Option<f64>) -> SummaryRecord {
        SummaryRecord {
            location: location.to_string(),
            date: NaiveDate::from_ymd_opt(2021, 5, 4).unwrap(),
            total_cases,
            total_deaths: total_cases / 100.0,
            total_vaccinations: percent.map(|p| p * 500_000.0),
            death_rate: 0.01,
            percent_vaccinated: percent,
        }
    }

    // Width and height from the PNG IHDR chunk.
    fn png_size(path: &Path) -> (u32, u32) {
        let bytes = fs::read(path).unwrap();
        assert!(bytes.len() > 24);
        assert_eq!(&bytes[1..4], b"PNG");
        let word = |at: usize| u32::from_be_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]]);
        (word(16), word(20))
    }

    #[test]
    fn counts_are_abbreviated() {
        assert_eq!(format_count(950.0), "950");
        assert_eq!(format_count(340_000.0), "340K");
        assert_eq!(format_count(44_500_000.0), "44.5M");
        assert_eq!(format_count(2_200_000_000.0), "2.2B");
    }

    #[test]
    fn small_percentages_keep_their_digits() {
        assert_eq!(format_percent(0.0), "0.0%");
        assert_eq!(format_percent(43.9), "43.9%");
        assert_eq!(format_percent(0.5), "0.50%");
        assert_eq!(format_percent(0.0002), "0.00020%");
        assert_eq!(format_percent(0.000065), "0.000065%");
    }

    #[test]
    fn empty_series_still_get_a_usable_range() {
        let (start, end) = date_range(&[]);
        assert!(end > start);
        assert_eq!(padded(0.0), 1.0);
        assert_eq!(padded(f64::NAN), 1.0);
        assert!((padded(100.0) - 105.0).abs() < 1e-9);
    }

    #[test]
    fn one_slot_per_bar() {
        assert_eq!(bar_slots(3), (3.0, vec![0.5, 1.5, 2.5]));
        assert_eq!(bar_slots(1), (1.0, vec![0.5]));
        assert_eq!(bar_slots(0), (1.0, vec![]));
    }

    #[test]
    fn colours_follow_the_configured_order() {
        let locations = locations();
        assert_eq!(location_color(&locations, "Kenya"), PALETTE[0]);
        assert_eq!(location_color(&locations, "India"), PALETTE[2]);
        // Name order in the summary does not matter.
        let sorted = ["India", "Kenya", "United States"];
        let colours: Vec<RGBColor> = sorted.iter().map(|l| location_color(&locations, l)).collect();
        assert_eq!(colours, vec![PALETTE[2], PALETTE[0], PALETTE[1]]);
        assert_eq!(location_color(&locations, "France"), PALETTE[3]);
    }

    #[test]
    fn renders_both_images_at_the_configured_sizes() {
        let dir = tempdir().unwrap();
        let config = ChartConfig::default();
        let records = vec![
            metric("Kenya", 1, 100.0, Some(100.0)),
            metric("Kenya", 2, 150.0, None),
            metric("India", 1, 20_000_000.0, Some(1000.0)),
            metric("India", 2, 20_400_000.0, Some(4000.0)),
            metric("United States", 2, 32_000_000.0, Some(240_000_000.0)),
        ];
        let summary = vec![
            snapshot("India", 20_400_000.0, Some(0.00026)),
            snapshot("Kenya", 150.0, Some(0.0002)),
            snapshot("United States", 32_000_000.0, Some(43.9)),
        ];

        let overview = dir.path().join(&config.overview_file);
        let vaccination = dir.path().join(&config.vaccination_file);
        render_overview(&records, &summary, &locations(), &config, &overview).unwrap();
        render_vaccination(&summary, &locations(), &config, &vaccination).unwrap();

        assert!(fs::metadata(&overview).unwrap().len() > 0);
        assert!(fs::metadata(&vaccination).unwrap().len() > 0);
        assert_eq!(png_size(&overview), (1400, 1200));
        assert_eq!(png_size(&vaccination), (800, 600));
    }

    #[test]
    fn empty_inputs_render_placeholder_axes() {
        let dir = tempdir().unwrap();
        let config = ChartConfig::default();
        let overview = dir.path().join("overview.png");
        let vaccination = dir.path().join("vaccination.png");

        render_overview(&[], &[], &locations(), &config, &overview).unwrap();
        render_vaccination(&[], &locations(), &config, &vaccination).unwrap();

        assert!(fs::metadata(&overview).unwrap().len() > 0);
        assert_eq!(png_size(&vaccination), (800, 600));
    }

    #[test]
    fn unknown_coverage_everywhere_renders_no_bars() {
        let dir = tempdir().unwrap();
        let config = ChartConfig::default();
        let summary = vec![snapshot("India", 20_400_000.0, None), snapshot("Kenya", 150.0, None)];
        let vaccination = dir.path().join("vaccination.png");

        render_vaccination(&summary, &locations(), &config, &vaccination).unwrap();

        assert!(fs::metadata(&vaccination).unwrap().len() > 0);
    }

    #[test]
    fn a_single_location_gets_one_bar() {
        let dir = tempdir().unwrap();
        let config = ChartConfig::default();
        let vaccination = dir.path().join("vaccination.png");

        render_vaccination(&[snapshot("Kenya", 150.0, Some(0.0002))], &locations(), &config, &vaccination)
            .unwrap();

        assert!(fs::metadata(&vaccination).unwrap().len() > 0);
    }
}
