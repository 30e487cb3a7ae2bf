use std::error::Error;
use std::process;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use covid_tracker::charts::{render_overview, render_vaccination};
use covid_tracker::cli::Args;
use covid_tracker::config::PipelineConfig;
use covid_tracker::eda::{self, print_section};
use covid_tracker::eda_statistics::describe;
use covid_tracker::pipeline::{self, PipelineOutput};

fn init_logging(args: &Args) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.log_level().to_string().to_lowercase()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn main() {
    let args = Args::parse();
    init_logging(&args);

    if let Err(e) = run(&args) {
        error!("{}", e);
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    let mut config = match &args.config {
        Some(path) => PipelineConfig::from_toml_file(path)?,
        None => PipelineConfig::default(),
    };
    args.apply_to(&mut config);

    print_section("1. Data Collection");
    let dataset = pipeline::load(&config)?;
    println!("Dataset loaded successfully!");
    let output = pipeline::process(dataset, &config)?;

    report(&output, &config);

    print_section("5. Data Visualization");
    let images = if config.charts.enabled {
        let overview = config.overview_path();
        let vaccination = config.vaccination_path();
        render_overview(
            &output.records,
            &output.summary,
            &config.cleaning.locations,
            &config.charts,
            &overview,
        )?;

        print_section("6. Visualizing Vaccination Progress");
        eda::report_vaccination(&output.summary);
        render_vaccination(
            &output.summary,
            &config.cleaning.locations,
            &config.charts,
            &vaccination,
        )?;
        Some((overview, vaccination))
    } else {
        info!("Chart rendering disabled");
        print_section("6. Visualizing Vaccination Progress");
        eda::report_vaccination(&output.summary);
        None
    };

    print_section("7. Insights & Reporting");
    eda::report_insights(&output.summary);
    eda::report_completion(images.as_ref().map(|(o, v)| (o.as_path(), v.as_path())));
    Ok(())
}

// Sections 2-4 of the console report
fn report(output: &PipelineOutput, config: &PipelineConfig) {
    print_section("2. Data Loading & Exploration");
    eda::report_dataset(&output.dataset, &config.key_columns);
    eda::report_initial_observations();

    print_section("3. Data Cleaning");
    eda::report_cleaning(&output.missing_after, &config.cleaning.locations);

    print_section("4. Exploratory Data Analysis");
    eda::report_statistics(&describe(&output.records));
    eda::report_summary(&output.summary);
    eda::report_eda_observations(&output.summary);
}
