//! Error types surfaced by the loaders.

use thiserror::Error;

/// A structured-record collection whose envelope cannot be unwrapped.
///
/// Bad cell values never produce this error; they decode to missing values.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("invalid JSON document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("document has no `records` sequence")]
    MissingRecords,

    #[error("record {index} has no `fields` object")]
    MissingFields { index: usize },
}
