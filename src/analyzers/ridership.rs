//! Yearly ridership totals and station rankings.

use std::collections::BTreeMap;

use serde::Serialize;

use super::utility::sum_present;
use crate::loader::RidershipTable;

/// Number of stations in the default ranking.
pub const TOP_N: usize = 10;

/// Year ranked when the table has a column for it.
pub const PREFERRED_LATEST_YEAR: i32 = 2024;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedStation {
    pub station_name: String,
    pub passengers: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RidershipSummary {
    /// Passengers across all stations per year, ascending by year.
    pub yearly_totals: BTreeMap<i32, f64>,
    /// Year used for the ranking; `None` when the table has no year column.
    pub ranking_year: Option<i32>,
    pub top_stations: Vec<RankedStation>,
}

/// Sums every year column across all stations, skipping missing cells.
pub fn yearly_totals(table: &RidershipTable) -> BTreeMap<i32, f64> {
    table
        .years
        .iter()
        .map(|&year| {
            let total = sum_present(table.records.iter().map(|r| r.total_for(year)));
            (year, total)
        })
        .collect()
}

/// [`PREFERRED_LATEST_YEAR`] if present, otherwise the latest year column.
pub fn ranking_year(table: &RidershipTable) -> Option<i32> {
    if table.years.contains(&PREFERRED_LATEST_YEAR) {
        Some(PREFERRED_LATEST_YEAR)
    } else {
        table.years.iter().max().copied()
    }
}

/// The `n` busiest stations for `year`, descending.
///
/// Stations with no value for `year` are left out. The sort is stable, so
/// stations with equal counts keep their input order.
pub fn top_stations(table: &RidershipTable, year: i32, n: usize) -> Vec<RankedStation> {
    let mut ranked: Vec<RankedStation> = table
        .records
        .iter()
        .filter_map(|r| {
            r.total_for(year).map(|passengers| RankedStation {
                station_name: r.station_name.clone(),
                passengers,
            })
        })
        .collect();

    ranked.sort_by(|a, b| b.passengers.total_cmp(&a.passengers));
    ranked.truncate(n);
    ranked
}

pub fn aggregate(table: &RidershipTable) -> RidershipSummary {
    let ranking_year = ranking_year(table);
    let top_stations = ranking_year
        .map(|year| top_stations(table, year, TOP_N))
        .unwrap_or_default();

    RidershipSummary {
        yearly_totals: yearly_totals(table),
        ranking_year,
        top_stations,
    }
}
