//! One synchronous analysis pass over all datasets.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::analyzers::emissions::{self, EmissionEstimate, RouteEmissions};
use crate::analyzers::pricing::{self, EnrichedFareRecord};
use crate::analyzers::punctuality::{self, CauseShare, PunctualitySummary};
use crate::analyzers::ridership::{self, RidershipSummary};
use crate::error::ParseError;
use crate::loader::{Resolved, load_records, samples};
use crate::types::{FareRecord, PunctualityRecord, StationLocation};

/// Loaded datasets, ready for analysis.
#[derive(Debug, Clone)]
pub struct Inputs {
    pub ridership: Resolved,
    pub punctuality: Vec<PunctualityRecord>,
    pub fares: Vec<FareRecord>,
    pub stations: Vec<StationLocation>,
}

impl Inputs {
    /// Decodes the three record collections.
    ///
    /// # Errors
    ///
    /// Fails if any document has a malformed envelope.
    pub fn from_json(
        ridership: Resolved,
        punctuality_json: &str,
        pricing_json: &str,
        stations_json: &str,
    ) -> Result<Self, ParseError> {
        Ok(Self {
            ridership,
            punctuality: load_records(punctuality_json)?,
            fares: load_records(pricing_json)?,
            stations: load_records(stations_json)?,
        })
    }

    /// Uses the embedded sample collections.
    pub fn from_samples(ridership: Resolved) -> Result<Self, ParseError> {
        Self::from_json(
            ridership,
            samples::PUNCTUALITY_JSON,
            samples::PRICING_JSON,
            samples::STATIONS_JSON,
        )
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub generated_at: DateTime<Utc>,
    pub ridership_source: String,
    pub ridership: RidershipSummary,
    pub punctuality: PunctualitySummary,
    pub delay_causes: Vec<CauseShare>,
    pub fares: Vec<EnrichedFareRecord>,
    /// Per-route estimates for fares with a resolved distance.
    pub route_emissions: Vec<RouteEmissions>,
    /// Generic distances, for when no route resolves.
    pub reference_emissions: Vec<EmissionEstimate>,
}

impl Report {
    #[tracing::instrument(skip_all, fields(ridership_source = %inputs.ridership.source))]
    pub fn build(inputs: &Inputs) -> Self {
        let ridership = ridership::aggregate(&inputs.ridership.table);
        let (punctuality, delay_causes) = punctuality::summarize(&inputs.punctuality);
        let fares = pricing::enrich(&inputs.fares, &inputs.stations);
        let route_emissions = emissions::route_emissions(&fares);

        info!(
            stations = inputs.ridership.table.len(),
            punctuality_routes = inputs.punctuality.len(),
            fares = fares.len(),
            routes_with_distance = route_emissions.len(),
            "Analysis pass complete"
        );

        Self {
            generated_at: Utc::now(),
            ridership_source: inputs.ridership.source.clone(),
            ridership,
            punctuality,
            delay_causes,
            fares,
            route_emissions,
            reference_emissions: emissions::reference_comparison(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::RidershipLoader;

    fn sample_inputs() -> Inputs {
        Inputs::from_samples(RidershipLoader::new().load()).unwrap()
    }

    #[test]
    fn test_samples_decode() {
        let inputs = sample_inputs();
        assert_eq!(inputs.punctuality.len(), 10);
        assert_eq!(inputs.fares.len(), 10);
        assert_eq!(inputs.stations.len(), 10);
        assert!(inputs.stations.iter().all(|s| s.position.is_some()));
    }

    #[test]
    fn test_report_over_samples() {
        let report = Report::build(&sample_inputs());

        assert_eq!(report.ridership_source, "embedded");
        assert_eq!(report.ridership.ranking_year, Some(2024));
        assert_eq!(report.ridership.top_stations[0].station_name, "Paris Gare de Lyon");
        assert_eq!(report.ridership.yearly_totals[&2024], 196_000_000.0);

        assert_eq!(report.punctuality.routes, 10);
        assert!((report.punctuality.cancellation_rate - 2.0 / 936.0).abs() < 1e-12);
        assert_eq!(report.punctuality.avg_delay_arrival, Some(14.5));
        assert_eq!(report.delay_causes.len(), 5);

        assert_eq!(report.fares.len(), 10);
        assert_eq!(report.reference_emissions.len(), 4);
    }

    #[test]
    fn test_malformed_envelope_surfaces() {
        let result = Inputs::from_json(
            RidershipLoader::new().load(),
            r#"{"records": [{"no_fields": {}}]}"#,
            samples::PRICING_JSON,
            samples::STATIONS_JSON,
        );
        assert!(matches!(result, Err(ParseError::MissingFields { index: 0 })));
    }
}
