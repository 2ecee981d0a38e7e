//! CLI entry point for the SNCF open-data insights tool.
//!
//! Provides subcommands for building the full analysis report, comparing
//! emissions for given distances, and measuring station distances.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sncf_insights::analyzers::emissions::EmissionEstimate;
use sncf_insights::cache::AnalysisCache;
use sncf_insights::config::Settings;
use sncf_insights::fetch::BasicClient;
use sncf_insights::geodesy::{self, Coordinate};
use sncf_insights::loader::{RidershipLoader, samples};
use sncf_insights::output::{log_emissions, log_summary, print_pretty, write_fares_csv, write_json};
use sncf_insights::report::{Inputs, Report};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "sncf_insights")]
#[command(about = "Indicators from SNCF open data: ridership, punctuality, fares, emissions", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load every dataset and build the analysis report
    Report {
        /// Ridership CSV to try before the cache and the remote dataset
        #[arg(short, long, value_name = "CSV")]
        ridership: Option<PathBuf>,

        /// Punctuality records JSON (defaults to the embedded sample)
        #[arg(long, value_name = "JSON")]
        punctuality: Option<PathBuf>,

        /// Fare records JSON (defaults to the embedded sample)
        #[arg(long, value_name = "JSON")]
        pricing: Option<PathBuf>,

        /// Station list JSON (defaults to the embedded sample)
        #[arg(long, value_name = "JSON")]
        stations: Option<PathBuf>,

        /// Write the full report as JSON to this path
        #[arg(long, value_name = "PATH")]
        json: Option<PathBuf>,

        /// Gzip-compress the JSON report
        #[arg(long, default_value_t = false)]
        gzip: bool,

        /// Write the enriched fares as CSV to this path
        #[arg(long, value_name = "PATH")]
        fares_csv: Option<PathBuf>,
    },
    /// Compare train and car CO2 for the given distances (km)
    Emissions {
        #[arg(value_name = "KM", required = true, allow_negative_numbers = true)]
        distances: Vec<f64>,
    },
    /// Great-circle distance between two points
    Distance {
        #[arg(allow_negative_numbers = true)]
        lat1: f64,
        #[arg(allow_negative_numbers = true)]
        lon1: f64,
        #[arg(allow_negative_numbers = true)]
        lat2: f64,
        #[arg(allow_negative_numbers = true)]
        lon2: f64,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    let settings = Settings::from_env()?;

    // Logging setup: colored stderr + JSON rolling log file
    let log_dir = settings
        .log_file_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("logs"));
    let log_file_name = settings
        .log_file_path
        .file_name()
        .unwrap_or(OsStr::new("sncf_insights.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Report {
            ridership,
            punctuality,
            pricing,
            stations,
            json,
            gzip,
            fares_csv,
        } => {
            let mut cache = AnalysisCache::new();
            let inputs = cache.get_or_try_insert_with(|| {
                load_inputs(&settings, ridership, punctuality, pricing, stations)
            })?;

            let report = Report::build(inputs);
            print_pretty(&report);
            log_summary(&report);

            if let Some(path) = json {
                write_json(&path, &report, gzip)?;
                info!(path = %path.display(), gzip, "Report written");
            }
            if let Some(path) = fares_csv {
                write_fares_csv(&path, &report.fares)?;
                info!(path = %path.display(), "Fares written");
            }
        }
        Commands::Emissions { distances } => {
            let estimates: Vec<_> = distances
                .into_iter()
                .map(EmissionEstimate::for_distance)
                .collect();
            log_emissions(&estimates);
        }
        Commands::Distance {
            lat1,
            lon1,
            lat2,
            lon2,
        } => {
            let km = geodesy::distance(Coordinate::new(lat1, lon1), Coordinate::new(lat2, lon2));
            info!(lat1, lon1, lat2, lon2, distance_km = km, "Great-circle distance");
        }
    }

    Ok(())
}

/// Resolves the ridership table and reads the record collections.
#[tracing::instrument(skip(settings))]
fn load_inputs(
    settings: &Settings,
    ridership: Option<PathBuf>,
    punctuality: Option<PathBuf>,
    pricing: Option<PathBuf>,
    stations: Option<PathBuf>,
) -> Result<Inputs> {
    let client = BasicClient::new(settings.http_timeout)?;
    let loader = RidershipLoader::standard(
        ridership,
        settings.cache_path(),
        &settings.ridership_url,
        Box::new(client),
    );
    let resolved = loader.load();

    let punctuality = read_or_sample(punctuality.as_deref(), samples::PUNCTUALITY_JSON)?;
    let pricing = read_or_sample(pricing.as_deref(), samples::PRICING_JSON)?;
    let stations = read_or_sample(stations.as_deref(), samples::STATIONS_JSON)?;

    Ok(Inputs::from_json(resolved, &punctuality, &pricing, &stations)?)
}

fn read_or_sample(path: Option<&Path>, sample: &str) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display())),
        None => Ok(sample.to_string()),
    }
}
