//! Joins fares to station coordinates to derive distance and cost per km.

use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use crate::geodesy::{self, Coordinate};
use crate::types::{FareRecord, StationLocation, UicCode};

/// Station coordinates keyed by canonical UIC code.
#[derive(Debug, Clone, Default)]
pub struct StationIndex(HashMap<UicCode, Coordinate>);

impl StationIndex {
    /// Stations without a code or a position are dropped. When a code
    /// repeats, the later station wins.
    pub fn build(stations: &[StationLocation]) -> Self {
        let mut index = HashMap::with_capacity(stations.len());
        for station in stations {
            if let (Some(code), Some(position)) = (&station.uic_code, station.position) {
                index.insert(code.clone(), position);
            }
        }
        Self(index)
    }

    pub fn lookup(&self, code: &UicCode) -> Option<Coordinate> {
        self.0.get(code).copied()
    }

    /// Great-circle distance between two stations, if both are known.
    pub fn distance_between(&self, from: Option<&UicCode>, to: Option<&UicCode>) -> Option<f64> {
        let from = self.lookup(from?)?;
        let to = self.lookup(to?)?;
        Some(geodesy::distance(from, to))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A fare with its derived distance and cost per kilometre.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedFareRecord {
    #[serde(flatten)]
    pub fare: FareRecord,
    pub distance_km: Option<f64>,
    pub cost_per_km_min: Option<f64>,
    pub cost_per_km_max: Option<f64>,
}

/// `price / distance`, only for a strictly positive distance.
pub fn cost_per_km(price: Option<f64>, distance_km: Option<f64>) -> Option<f64> {
    match (price, distance_km) {
        (Some(price), Some(d)) if d > 0.0 => Some(price / d),
        _ => None,
    }
}

pub fn enrich_with_index(fares: &[FareRecord], index: &StationIndex) -> Vec<EnrichedFareRecord> {
    fares
        .iter()
        .map(|fare| {
            let distance_km =
                index.distance_between(fare.origin_uic.as_ref(), fare.destination_uic.as_ref());
            EnrichedFareRecord {
                fare: fare.clone(),
                distance_km,
                cost_per_km_min: cost_per_km(fare.price_min, distance_km),
                cost_per_km_max: cost_per_km(fare.price_max, distance_km),
            }
        })
        .collect()
}

/// Returns one enriched record per fare, in input order. Fares whose
/// stations are unknown keep missing derived fields.
pub fn enrich(fares: &[FareRecord], stations: &[StationLocation]) -> Vec<EnrichedFareRecord> {
    let index = StationIndex::build(stations);
    let enriched = enrich_with_index(fares, &index);

    debug!(
        fares = fares.len(),
        stations = index.len(),
        resolved = enriched.iter().filter(|f| f.distance_km.is_some()).count(),
        "Fares enriched"
    );
    enriched
}
