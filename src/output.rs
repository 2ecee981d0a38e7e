//! Output formatting and persistence for analysis reports.
//!
//! Supports logging summaries, JSON export (optionally gzip-compressed),
//! and CSV export of enriched fares.

use anyhow::Result;
use csv::WriterBuilder;
use flate2::Compression;
use flate2::write::GzEncoder;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use tracing::{debug, info};

use crate::analyzers::emissions::EmissionEstimate;
use crate::analyzers::pricing::EnrichedFareRecord;
use crate::report::Report;

/// Logs the report using Rust's debug pretty-print format.
pub fn print_pretty(report: &Report) {
    debug!("{:#?}", report);
}

/// Logs the report as pretty-printed JSON.
pub fn print_json(report: &Report) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

/// Logs the headline indicators, one event per table.
pub fn log_summary(report: &Report) {
    for (year, total) in &report.ridership.yearly_totals {
        info!(year, total_passengers = total, "Yearly ridership");
    }
    for (rank, station) in report.ridership.top_stations.iter().enumerate() {
        info!(
            rank = rank + 1,
            year = report.ridership.ranking_year,
            station = %station.station_name,
            passengers = station.passengers,
            "Top station"
        );
    }

    let p = &report.punctuality;
    info!(
        routes = p.routes,
        avg_delay_arrival = ?p.avg_delay_arrival,
        avg_delay_severe = ?p.avg_delay_severe,
        cancellation_rate = p.cancellation_rate,
        "Punctuality summary"
    );
    for share in &report.delay_causes {
        info!(cause = share.column, mean_percent = ?share.mean_percent, "Delay cause");
    }

    for fare in &report.fares {
        info!(
            route = %fare.fare.route(),
            class = %fare.fare.travel_class,
            price_min = ?fare.fare.price_min,
            price_max = ?fare.fare.price_max,
            distance_km = ?fare.distance_km,
            cost_per_km_min = ?fare.cost_per_km_min,
            "Fare"
        );
    }

    if report.route_emissions.is_empty() {
        info!("No fare route resolved to coordinates, using reference distances");
        log_emissions(&report.reference_emissions);
    } else {
        for route in &report.route_emissions {
            info!(
                route = %route.route,
                distance_km = route.estimate.distance_km,
                train_kg_co2 = route.estimate.train_kg_co2,
                car_kg_co2 = route.estimate.car_kg_co2,
                "Route emissions"
            );
        }
    }
}

pub fn log_emissions(estimates: &[EmissionEstimate]) {
    for e in estimates {
        info!(
            distance_km = e.distance_km,
            train_kg_co2 = e.train_kg_co2,
            car_kg_co2 = e.car_kg_co2,
            saved_kg_co2 = e.saved_kg_co2(),
            "Emissions"
        );
    }
}

fn create_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// Writes the report as JSON, gzip-compressed when `gzip` is set.
pub fn write_json(path: &Path, report: &Report, gzip: bool) -> Result<()> {
    create_parent(path)?;
    let body = serde_json::to_vec_pretty(report)?;

    let body = if gzip {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&body)?;
        encoder.finish()?
    } else {
        body
    };

    fs::write(path, &body)?;
    debug!(path = %path.display(), bytes = body.len(), gzip, "Report written");
    Ok(())
}

const FARE_HEADER: [&str; 12] = [
    "transporteur",
    "classe",
    "origine",
    "origine_uic",
    "destination",
    "destination_uic",
    "profil_tarifaire",
    "prix_min",
    "prix_max",
    "distance_km",
    "cost_per_km_min",
    "cost_per_km_max",
];

/// Writes enriched fares as CSV with a header row. Missing values are empty cells.
pub fn write_fares_csv(path: &Path, fares: &[EnrichedFareRecord]) -> Result<()> {
    create_parent(path)?;
    let file = File::create(path)?;
    let mut writer = WriterBuilder::new().from_writer(file);

    let num = |v: Option<f64>| v.map(|v| v.to_string()).unwrap_or_default();

    writer.write_record(FARE_HEADER)?;
    for f in fares {
        writer.write_record([
            f.fare.carrier.clone(),
            f.fare.travel_class.clone(),
            f.fare.origin.clone(),
            f.fare.origin_uic.as_ref().map(|c| c.to_string()).unwrap_or_default(),
            f.fare.destination.clone(),
            f.fare.destination_uic.as_ref().map(|c| c.to_string()).unwrap_or_default(),
            f.fare.fare_profile.clone(),
            num(f.fare.price_min),
            num(f.fare.price_max),
            num(f.distance_km),
            num(f.cost_per_km_min),
            num(f.cost_per_km_max),
        ])?;
    }
    writer.flush()?;

    debug!(path = %path.display(), rows = fares.len(), "Fares CSV written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::RidershipLoader;
    use crate::report::Inputs;
    use flate2::read::GzDecoder;
    use std::env;
    use std::io::Read;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        env::temp_dir().join(name)
    }

    fn sample_report() -> Report {
        let inputs = Inputs::from_samples(RidershipLoader::new().load()).unwrap();
        Report::build(&inputs)
    }

    #[test]
    fn test_print_pretty_does_not_panic() {
        print_pretty(&sample_report());
    }

    #[test]
    fn test_print_json_does_not_panic() {
        print_json(&sample_report()).unwrap();
    }

    #[test]
    fn test_log_summary_does_not_panic() {
        log_summary(&sample_report());
    }

    #[test]
    fn test_write_json_plain() {
        let path = temp_path("sncf_insights_test_report.json");
        let _ = fs::remove_file(&path);

        write_json(&path, &sample_report(), false).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
        assert_eq!(value["ridership_source"], "embedded");
        assert_eq!(value["fares"].as_array().unwrap().len(), 10);
        assert_eq!(value["fares"][0]["transporteur"], "INTERCITES");
        assert!(value["fares"][0]["distance_km"].is_null());

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_write_json_gzip() {
        let path = temp_path("sncf_insights_test_report.json.gz");
        let _ = fs::remove_file(&path);

        write_json(&path, &sample_report(), true).unwrap();

        let mut decoded = String::new();
        GzDecoder::new(File::open(&path).unwrap())
            .read_to_string(&mut decoded)
            .unwrap();
        assert!(decoded.contains("\"reference_emissions\""));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_write_fares_csv_keeps_every_row() {
        let path = temp_path("sncf_insights_test_fares.csv");
        let _ = fs::remove_file(&path);
        let report = sample_report();

        write_fares_csv(&path, &report.fares).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 1 + report.fares.len());
        assert!(lines[0].starts_with("transporteur,classe,origine"));
        assert!(lines[1].ends_with(",,,"));

        fs::remove_file(&path).unwrap();
    }
}
