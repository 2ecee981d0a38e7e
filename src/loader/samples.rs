//! Ten-record extracts of the SNCF open datasets, shipped with the crate.

/// `regularite-mensuelle-tgv`
pub const PUNCTUALITY_JSON: &str = include_str!("../../data/punctuality_sample.json");

/// `tarifs-intercites`
pub const PRICING_JSON: &str = include_str!("../../data/pricing_sample.json");

/// `liste-des-gares`
pub const STATIONS_JSON: &str = include_str!("../../data/stations_sample.json");
