//! CO2 estimates for a journey by train versus by car.
//!
//! Linear model with fixed per-passenger factors (Youmatter): 14 g CO2 per
//! passenger-km by train, 55 g by car.

use serde::Serialize;

use super::pricing::EnrichedFareRecord;

pub const TRAIN_G_CO2_PER_PKM: f64 = 14.0;
pub const CAR_G_CO2_PER_PKM: f64 = 55.0;

/// Distances compared when no route distance is available.
pub const REFERENCE_DISTANCES_KM: [f64; 4] = [100.0, 300.0, 500.0, 700.0];

/// `(train_kg, car_kg)` for `distance_km`. Negative input is passed through.
pub fn estimate(distance_km: f64) -> (f64, f64) {
    let train_kg = distance_km * TRAIN_G_CO2_PER_PKM / 1000.0;
    let car_kg = distance_km * CAR_G_CO2_PER_PKM / 1000.0;
    (train_kg, car_kg)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EmissionEstimate {
    pub distance_km: f64,
    pub train_kg_co2: f64,
    pub car_kg_co2: f64,
}

impl EmissionEstimate {
    pub fn for_distance(distance_km: f64) -> Self {
        let (train_kg_co2, car_kg_co2) = estimate(distance_km);
        Self {
            distance_km,
            train_kg_co2,
            car_kg_co2,
        }
    }

    /// CO2 avoided by taking the train.
    pub fn saved_kg_co2(&self) -> f64 {
        self.car_kg_co2 - self.train_kg_co2
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteEmissions {
    pub route: String,
    pub travel_class: String,
    #[serde(flatten)]
    pub estimate: EmissionEstimate,
}

pub fn reference_comparison() -> Vec<EmissionEstimate> {
    REFERENCE_DISTANCES_KM
        .iter()
        .map(|&d| EmissionEstimate::for_distance(d))
        .collect()
}

/// Estimates for every fare whose distance resolved, in input order.
pub fn route_emissions(fares: &[EnrichedFareRecord]) -> Vec<RouteEmissions> {
    fares
        .iter()
        .filter_map(|f| {
            f.distance_km.map(|d| RouteEmissions {
                route: f.fare.route(),
                travel_class: f.fare.travel_class.clone(),
                estimate: EmissionEstimate::for_distance(d),
            })
        })
        .collect()
}
