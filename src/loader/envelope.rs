//! Unwraps open-data record collections.
//!
//! Each document looks like `{"records": [{"fields": {...}}, ...]}`; only
//! the inner `fields` maps are kept.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::ParseError;

/// The `fields` maps of a record collection, in input order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldsTable {
    columns: Vec<String>,
    rows: Vec<Map<String, Value>>,
}

impl FieldsTable {
    /// Parses a JSON document and extracts every record's `fields` map.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] if the document is not JSON, has no
    /// `records` array, or any record lacks a `fields` object.
    pub fn from_json(json: &str) -> Result<Self, ParseError> {
        let document: Value = serde_json::from_str(json)?;
        Self::from_value(document)
    }

    pub fn from_value(document: Value) -> Result<Self, ParseError> {
        let records = match document {
            Value::Object(mut top) => match top.remove("records") {
                Some(Value::Array(records)) => records,
                _ => return Err(ParseError::MissingRecords),
            },
            _ => return Err(ParseError::MissingRecords),
        };

        let mut table = FieldsTable::default();
        for (index, record) in records.into_iter().enumerate() {
            let fields = match record {
                Value::Object(mut envelope) => match envelope.remove("fields") {
                    Some(Value::Object(fields)) => fields,
                    _ => return Err(ParseError::MissingFields { index }),
                },
                _ => return Err(ParseError::MissingFields { index }),
            };
            table.push(fields);
        }

        debug!(
            rows = table.rows.len(),
            columns = table.columns.len(),
            "Record collection unwrapped"
        );
        Ok(table)
    }

    fn push(&mut self, fields: Map<String, Value>) {
        for key in fields.keys() {
            if !self.columns.iter().any(|c| c == key) {
                self.columns.push(key.clone());
            }
        }
        self.rows.push(fields);
    }

    /// Union of keys across all rows, in first-seen order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Map<String, Value>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell at `row`/`column`; `None` when the row has no such key.
    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        self.rows.get(row).and_then(|r| r.get(column))
    }

    /// Decodes every row into a typed record.
    ///
    /// The record types in [`crate::types`] decode fields leniently, so this
    /// only fails for types that reject a row outright.
    pub fn records<T: DeserializeOwned>(&self) -> Result<Vec<T>, ParseError> {
        self.rows
            .iter()
            .map(|row| serde_json::from_value(Value::Object(row.clone())).map_err(ParseError::from))
            .collect()
    }
}

/// Shorthand for [`FieldsTable::from_json`] followed by [`FieldsTable::records`].
pub fn load_records<T: DeserializeOwned>(json: &str) -> Result<Vec<T>, ParseError> {
    FieldsTable::from_json(json)?.records()
}
