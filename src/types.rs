//! Typed records for each dataset.
//!
//! Every numeric field is an `Option<f64>`: cells that fail to parse are
//! `None` and aggregations skip them. Field names on the wire follow the
//! SNCF open-data schemas.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::geodesy::Coordinate;

/// Parses a cell as a finite number. Anything else is missing.
pub fn parse_number(cell: &str) -> Option<f64> {
    cell.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Canonical UIC station code.
///
/// Codes arrive as JSON numbers, numeric strings, or zero-padded strings.
/// All of `8738240`, `"8738240"`, `"08738240"` and `"8738240.0"` map to the
/// same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UicCode(String);

impl UicCode {
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }

        if trimmed.bytes().all(|b| b.is_ascii_digit()) {
            let stripped = trimmed.trim_start_matches('0');
            let canonical = if stripped.is_empty() { "0" } else { stripped };
            return Some(Self(canonical.to_string()));
        }

        match trimmed.parse::<f64>() {
            Ok(v) if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e15 => {
                Some(Self(format!("{}", v as i64)))
            }
            _ => Some(Self(trimmed.to_string())),
        }
    }

    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Some(Self(i.to_string()))
                } else if let Some(u) = n.as_u64() {
                    Some(Self(u.to_string()))
                } else {
                    n.as_f64().and_then(|f| Self::parse(&f.to_string()))
                }
            }
            serde_json::Value::String(s) => Self::parse(s),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UicCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Field decoders that never fail on bad cell content.
pub(crate) mod lenient {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    use super::{UicCode, parse_number};
    use crate::geodesy::Coordinate;

    pub fn number_from_json(value: &Value) -> Option<f64> {
        match value {
            Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
            Value::String(s) => parse_number(s),
            _ => None,
        }
    }

    pub fn number<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
        let value = Value::deserialize(d)?;
        Ok(number_from_json(&value))
    }

    pub fn text<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        let value = Value::deserialize(d)?;
        Ok(match value {
            Value::String(s) => s,
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            _ => String::new(),
        })
    }

    pub fn uic<'de, D: Deserializer<'de>>(d: D) -> Result<Option<UicCode>, D::Error> {
        let value = Value::deserialize(d)?;
        Ok(UicCode::from_json(&value))
    }

    pub fn date<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDate>, D::Error> {
        let value = Value::deserialize(d)?;
        Ok(value
            .as_str()
            .and_then(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()))
    }

    /// Accepts `[lat, lon]` or `{"lat": .., "lon": ..}`.
    pub fn geo_point<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Coordinate>, D::Error> {
        let value = Value::deserialize(d)?;
        let pair = match &value {
            Value::Array(items) if items.len() == 2 => {
                (number_from_json(&items[0]), number_from_json(&items[1]))
            }
            Value::Object(map) => (
                map.get("lat").and_then(number_from_json),
                map.get("lon").and_then(number_from_json),
            ),
            _ => (None, None),
        };
        Ok(match pair {
            (Some(lat), Some(lon)) => Some(Coordinate::new(lat, lon)),
            _ => None,
        })
    }
}

/// One station row of the ridership table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationRidershipRecord {
    pub station_name: String,
    /// Passenger count per year; `None` where the cell did not parse.
    pub yearly_totals: BTreeMap<i32, Option<f64>>,
    pub non_travelers: Option<f64>,
}

impl StationRidershipRecord {
    pub fn total_for(&self, year: i32) -> Option<f64> {
        self.yearly_totals.get(&year).copied().flatten()
    }
}

/// The five delay-cause categories of the punctuality dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DelayCause {
    Infrastructure,
    External,
    Network,
    TrafficManagement,
    Operations,
}

impl DelayCause {
    pub const ALL: [DelayCause; 5] = [
        DelayCause::Infrastructure,
        DelayCause::External,
        DelayCause::Network,
        DelayCause::TrafficManagement,
        DelayCause::Operations,
    ];

    /// Column name in the source dataset.
    pub fn column(self) -> &'static str {
        match self {
            DelayCause::Infrastructure => "prct_cause_infra",
            DelayCause::External => "prct_cause_externe",
            DelayCause::Network => "prct_cause_reseau",
            DelayCause::TrafficManagement => "prct_cause_gestion",
            DelayCause::Operations => "prct_cause_exploit",
        }
    }
}

/// A monthly punctuality sample for one route.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PunctualityRecord {
    #[serde(default, deserialize_with = "lenient::text")]
    pub service: String,
    #[serde(rename = "gare_depart", default, deserialize_with = "lenient::text")]
    pub origin: String,
    #[serde(rename = "gare_arrivee", default, deserialize_with = "lenient::text")]
    pub destination: String,
    #[serde(default, deserialize_with = "lenient::date")]
    pub date: Option<NaiveDate>,

    #[serde(rename = "nb_train_prevu", default, deserialize_with = "lenient::number")]
    pub scheduled_trains: Option<f64>,
    #[serde(rename = "nb_annulation", default, deserialize_with = "lenient::number")]
    pub cancelled_trains: Option<f64>,
    #[serde(rename = "nb_train_retard_sup_15", default, deserialize_with = "lenient::number")]
    pub trains_over_15_min: Option<f64>,
    #[serde(rename = "nb_train_retard_depart", default, deserialize_with = "lenient::number")]
    pub trains_late_at_departure: Option<f64>,
    #[serde(rename = "nb_train_retard_arrivee", default, deserialize_with = "lenient::number")]
    pub trains_late_at_arrival: Option<f64>,

    #[serde(rename = "retard_moyen_arrivee", default, deserialize_with = "lenient::number")]
    pub mean_arrival_delay: Option<f64>,
    #[serde(
        rename = "retard_moyen_trains_retard_sup15",
        default,
        deserialize_with = "lenient::number"
    )]
    pub mean_severe_delay: Option<f64>,
    #[serde(rename = "dur_moyen", default, deserialize_with = "lenient::number")]
    pub mean_journey_minutes: Option<f64>,

    #[serde(rename = "prct_cause_infra", default, deserialize_with = "lenient::number")]
    pub cause_infrastructure: Option<f64>,
    #[serde(rename = "prct_cause_externe", default, deserialize_with = "lenient::number")]
    pub cause_external: Option<f64>,
    #[serde(rename = "prct_cause_reseau", default, deserialize_with = "lenient::number")]
    pub cause_network: Option<f64>,
    #[serde(rename = "prct_cause_gestion", default, deserialize_with = "lenient::number")]
    pub cause_traffic_management: Option<f64>,
    #[serde(rename = "prct_cause_exploit", default, deserialize_with = "lenient::number")]
    pub cause_operations: Option<f64>,
    #[serde(rename = "cause_principale", default, deserialize_with = "lenient::text")]
    pub main_cause: String,
}

impl PunctualityRecord {
    pub fn cause_share(&self, cause: DelayCause) -> Option<f64> {
        match cause {
            DelayCause::Infrastructure => self.cause_infrastructure,
            DelayCause::External => self.cause_external,
            DelayCause::Network => self.cause_network,
            DelayCause::TrafficManagement => self.cause_traffic_management,
            DelayCause::Operations => self.cause_operations,
        }
    }
}

/// An intercity fare range between two stations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FareRecord {
    #[serde(rename = "transporteur", default, deserialize_with = "lenient::text")]
    pub carrier: String,
    #[serde(rename = "classe", default, deserialize_with = "lenient::text")]
    pub travel_class: String,
    #[serde(rename = "origine", default, deserialize_with = "lenient::text")]
    pub origin: String,
    #[serde(rename = "origine_uic", default, deserialize_with = "lenient::uic")]
    pub origin_uic: Option<UicCode>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub destination: String,
    #[serde(rename = "destination_uic", default, deserialize_with = "lenient::uic")]
    pub destination_uic: Option<UicCode>,
    #[serde(rename = "profil_tarifaire", default, deserialize_with = "lenient::text")]
    pub fare_profile: String,
    #[serde(rename = "prix_min", default, deserialize_with = "lenient::number")]
    pub price_min: Option<f64>,
    #[serde(rename = "prix_max", default, deserialize_with = "lenient::number")]
    pub price_max: Option<f64>,
}

impl FareRecord {
    /// `"ORIGIN → DESTINATION"` label.
    pub fn route(&self) -> String {
        format!("{} → {}", self.origin, self.destination)
    }
}

/// A station position keyed by UIC code.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StationLocation {
    #[serde(rename = "code_uic", default, deserialize_with = "lenient::uic")]
    pub uic_code: Option<UicCode>,
    #[serde(rename = "libelle", default, deserialize_with = "lenient::text")]
    pub label: String,
    #[serde(rename = "geo_point_2d", default, deserialize_with = "lenient::geo_point")]
    pub position: Option<Coordinate>,
}
