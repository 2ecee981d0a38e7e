//! Loading of the raw datasets into typed records.
//!
//! - [`envelope`] unwraps JSON record collections (punctuality, fares,
//!   stations).
//! - [`ridership`] parses the semicolon-separated ridership table.
//! - [`sources`] resolves that table through an ordered fallback chain.
//! - [`samples`] embeds the JSON sample datasets.

pub mod envelope;
pub mod ridership;
pub mod samples;
pub mod sources;

pub use envelope::{FieldsTable, load_records};
pub use ridership::RidershipTable;
pub use sources::{Resolved, RidershipLoader, RidershipSource};
