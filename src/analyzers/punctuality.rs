//! Delay and cancellation indicators for the monthly punctuality samples.

use serde::Serialize;

use super::utility::{mean_present, sum_present};
use crate::types::{DelayCause, PunctualityRecord};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PunctualitySummary {
    pub routes: usize,
    /// Mean arrival delay in minutes.
    pub avg_delay_arrival: Option<f64>,
    /// Mean delay of trains arriving more than 15 minutes late.
    pub avg_delay_severe: Option<f64>,
    /// Cancelled over scheduled trains. Not guarded: with no scheduled
    /// trains this is NaN (or infinite if some were cancelled).
    pub cancellation_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CauseShare {
    pub cause: DelayCause,
    pub column: &'static str,
    /// Mean percentage across routes reporting this cause.
    pub mean_percent: Option<f64>,
}

pub fn cancellation_rate(records: &[PunctualityRecord]) -> f64 {
    let cancelled = sum_present(records.iter().map(|r| r.cancelled_trains));
    let scheduled = sum_present(records.iter().map(|r| r.scheduled_trains));
    cancelled / scheduled
}

pub fn cause_breakdown(records: &[PunctualityRecord]) -> Vec<CauseShare> {
    DelayCause::ALL
        .iter()
        .map(|&cause| CauseShare {
            cause,
            column: cause.column(),
            mean_percent: mean_present(records.iter().map(|r| r.cause_share(cause))),
        })
        .collect()
}

pub fn summarize(records: &[PunctualityRecord]) -> (PunctualitySummary, Vec<CauseShare>) {
    let summary = PunctualitySummary {
        routes: records.len(),
        avg_delay_arrival: mean_present(records.iter().map(|r| r.mean_arrival_delay)),
        avg_delay_severe: mean_present(records.iter().map(|r| r.mean_severe_delay)),
        cancellation_rate: cancellation_rate(records),
    };

    (summary, cause_breakdown(records))
}
