use sncf_insights::analyzers::emissions::route_emissions;
use sncf_insights::analyzers::pricing::enrich;
use sncf_insights::analyzers::punctuality::summarize;
use sncf_insights::analyzers::ridership::aggregate;
use sncf_insights::fetch::HttpClient;
use sncf_insights::loader::sources::{EmbeddedSample, LocalFile, RemoteSource};
use sncf_insights::loader::{FieldsTable, RidershipLoader, RidershipTable, load_records};
use sncf_insights::report::{Inputs, Report};
use sncf_insights::types::{FareRecord, PunctualityRecord, StationLocation};

const RIDERSHIP_CSV: &str = include_str!("fixtures/ridership.csv");
const FARES_JSON: &str = include_str!("fixtures/fares.json");
const STATIONS_JSON: &str = include_str!("fixtures/stations.json");
const PUNCTUALITY_JSON: &str = include_str!("fixtures/punctuality.json");

struct OfflineClient;

impl HttpClient for OfflineClient {
    fn get(&self, url: &str) -> anyhow::Result<Vec<u8>> {
        anyhow::bail!("no network in tests: {url}")
    }
}

struct FixtureClient;

impl HttpClient for FixtureClient {
    fn get(&self, _url: &str) -> anyhow::Result<Vec<u8>> {
        Ok(RIDERSHIP_CSV.as_bytes().to_vec())
    }
}

#[test]
fn test_ridership_pipeline() {
    let table = RidershipTable::parse(RIDERSHIP_CSV).expect("fixture parses");
    assert_eq!(table.len(), 13);
    assert_eq!(table.years, vec![2022, 2023, 2024]);

    let summary = aggregate(&table);

    assert_eq!(summary.yearly_totals[&2023], 688_000_000.0);
    assert_eq!(summary.ranking_year, Some(2024));
    assert_eq!(summary.top_stations.len(), 10);
    assert_eq!(summary.top_stations[0].station_name, "Paris Gare du Nord");
    assert_eq!(summary.top_stations[9].station_name, "Rennes");
    assert!(summary.top_stations.iter().all(|s| s.station_name != "Paris Est"));
    assert!(
        summary
            .top_stations
            .windows(2)
            .all(|w| w[0].passengers >= w[1].passengers)
    );
}

#[test]
fn test_envelope_round_trip_shape() {
    let table = FieldsTable::from_json(FARES_JSON).expect("fixture parses");

    assert_eq!(table.len(), 4);
    assert_eq!(
        table.columns(),
        [
            "transporteur",
            "classe",
            "origine",
            "origine_uic",
            "destination",
            "destination_uic",
            "profil_tarifaire",
            "prix_min",
            "prix_max",
        ]
    );
    assert_eq!(table.get(2, "origine").unwrap(), "PARIS AUSTERLITZ");
}

#[test]
fn test_pricing_and_emissions_pipeline() {
    let fares: Vec<FareRecord> = load_records(FARES_JSON).unwrap();
    let stations: Vec<StationLocation> = load_records(STATIONS_JSON).unwrap();

    let enriched = enrich(&fares, &stations);

    assert_eq!(enriched.len(), fares.len());

    let paris_bordeaux = &enriched[0];
    let d = paris_bordeaux.distance_km.unwrap();
    assert!(d > 450.0 && d < 550.0, "got {d}");
    assert!(paris_bordeaux.cost_per_km_min.unwrap() <= paris_bordeaux.cost_per_km_max.unwrap());

    // Zero-padded string code and string price still resolve.
    let nantes_paris = &enriched[1];
    assert!(nantes_paris.distance_km.is_some());
    assert_eq!(nantes_paris.fare.price_min, Some(25.0));

    // Austerlitz has no coordinates.
    assert_eq!(enriched[2].distance_km, None);
    assert_eq!(enriched[2].cost_per_km_min, None);
    assert_eq!(enriched[2].cost_per_km_max, None);

    // Distance without prices.
    assert!(enriched[3].distance_km.is_some());
    assert_eq!(enriched[3].cost_per_km_min, None);
    assert_eq!(enriched[3].cost_per_km_max, None);

    let emissions = route_emissions(&enriched);
    assert_eq!(emissions.len(), 3);
    assert_eq!(emissions[0].route, "PARIS GARE DE LYON → BORDEAUX ST JEAN");
    assert!((emissions[0].estimate.train_kg_co2 - d * 0.014).abs() < 1e-9);
}

#[test]
fn test_punctuality_zero_scheduled() {
    let records: Vec<PunctualityRecord> = load_records(PUNCTUALITY_JSON).unwrap();

    let (summary, causes) = summarize(&records);

    assert_eq!(summary.routes, 2);
    assert!(summary.cancellation_rate.is_nan());
    assert_eq!(summary.avg_delay_arrival, Some(20.0));
    assert_eq!(summary.avg_delay_severe, Some(12.5));
    assert_eq!(causes[0].mean_percent, Some(10.0));
}

#[test]
fn test_full_report_from_remote_source() {
    let loader = RidershipLoader::new()
        .with_source(LocalFile::new(
            "explicit",
            std::env::temp_dir().join("sncf_insights_it_missing.csv"),
        ))
        .with_source(RemoteSource::new("http://example.test/gares.csv", Box::new(FixtureClient)));

    let inputs = Inputs::from_json(loader.load(), PUNCTUALITY_JSON, FARES_JSON, STATIONS_JSON)
        .expect("fixtures parse");
    let report = Report::build(&inputs);

    assert_eq!(report.ridership_source, "remote");
    assert_eq!(report.ridership.top_stations.len(), 10);
    assert_eq!(report.fares.len(), 4);
    assert_eq!(report.route_emissions.len(), 3);

    let json = serde_json::to_value(&report).unwrap();
    assert!(json["punctuality"]["cancellation_rate"].is_null());
    assert_eq!(json["fares"][2]["origine"], "PARIS AUSTERLITZ");
}

#[test]
fn test_offline_falls_back_to_embedded() {
    let loader = RidershipLoader::new().with_source(RemoteSource::new(
        "http://example.test/gares.csv",
        Box::new(OfflineClient),
    ));

    let resolved = loader.load();

    assert_eq!(resolved.source, "embedded");
    let embedded = RidershipLoader::new().with_source(EmbeddedSample).load();
    assert_eq!(resolved.table, embedded.table);
}
