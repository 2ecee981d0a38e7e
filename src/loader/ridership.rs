//! Semicolon-separated station ridership table.

use std::collections::BTreeSet;

use anyhow::{Context, Result, anyhow, bail};
use csv::{ReaderBuilder, WriterBuilder};

use crate::types::{StationRidershipRecord, parse_number};

pub const STATION_COLUMN: &str = "nom_gare";
pub const NON_TRAVELERS_COLUMN: &str = "non_voyageurs";
pub const YEAR_COLUMN_PREFIX: &str = "total_voyageurs_";

/// Year of a `total_voyageurs_YYYY` column, if `name` follows that form.
pub fn year_of_column(name: &str) -> Option<i32> {
    let suffix = name.trim().strip_prefix(YEAR_COLUMN_PREFIX)?;
    if suffix.len() == 4 && suffix.bytes().all(|b| b.is_ascii_digit()) {
        suffix.parse().ok()
    } else {
        None
    }
}

/// Ridership counts per station, one record per input row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RidershipTable {
    /// Years that have a column in the source, ascending.
    pub years: Vec<i32>,
    pub has_non_travelers: bool,
    pub records: Vec<StationRidershipRecord>,
}

impl RidershipTable {
    /// Parses semicolon-separated text with a header row.
    ///
    /// Cells that are not numbers become missing values. Fails only when the
    /// text is not readable as delimited data or lacks the station column.
    pub fn parse(text: &str) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .delimiter(b';')
            .flexible(true)
            .from_reader(text.as_bytes());

        let headers = reader.headers().context("reading header row")?.clone();
        let station_idx = headers
            .iter()
            .position(|h| h.trim() == STATION_COLUMN)
            .with_context(|| format!("missing `{STATION_COLUMN}` column"))?;
        let non_travelers_idx = headers.iter().position(|h| h.trim() == NON_TRAVELERS_COLUMN);

        let year_columns: Vec<(usize, i32)> = headers
            .iter()
            .enumerate()
            .filter_map(|(idx, name)| year_of_column(name).map(|year| (idx, year)))
            .collect();

        let mut records = Vec::new();
        for (line, row) in reader.records().enumerate() {
            let row = row.with_context(|| format!("reading data row {}", line + 1))?;
            let cell = |idx: usize| row.get(idx).unwrap_or("");

            records.push(StationRidershipRecord {
                station_name: cell(station_idx).trim().to_string(),
                yearly_totals: year_columns
                    .iter()
                    .map(|&(idx, year)| (year, parse_number(cell(idx))))
                    .collect(),
                non_travelers: non_travelers_idx.and_then(|idx| parse_number(cell(idx))),
            });
        }

        let years: BTreeSet<i32> = year_columns.iter().map(|&(_, year)| year).collect();
        if year_columns.len() != years.len() {
            bail!("duplicate year columns in header");
        }

        Ok(Self {
            years: years.into_iter().collect(),
            has_non_travelers: non_travelers_idx.is_some(),
            records,
        })
    }

    /// Renders the table back to the semicolon-separated source format.
    pub fn to_csv(&self) -> Result<String> {
        let mut writer = WriterBuilder::new().delimiter(b';').from_writer(Vec::new());

        let mut header = vec![STATION_COLUMN.to_string()];
        header.extend(self.years.iter().map(|y| format!("{YEAR_COLUMN_PREFIX}{y}")));
        if self.has_non_travelers {
            header.push(NON_TRAVELERS_COLUMN.to_string());
        }
        writer.write_record(&header)?;

        let fmt = |v: Option<f64>| v.map(|v| v.to_string()).unwrap_or_default();
        for record in &self.records {
            let mut row = vec![record.station_name.clone()];
            row.extend(self.years.iter().map(|&y| fmt(record.total_for(y))));
            if self.has_non_travelers {
                row.push(fmt(record.non_travelers));
            }
            writer.write_record(&row)?;
        }

        writer.flush()?;
        let bytes = writer
            .into_inner()
            .map_err(|e| anyhow!("flushing CSV writer: {}", e.error()))?;
        Ok(String::from_utf8(bytes)?)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
