//! Query result handling
//!
//! Socrata resource endpoints answer with a bare JSON array of row objects. The
//! schema differs per dataset, so rows stay loosely typed.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// One row, keys in the order the portal sent them
pub type Record = Map<String, Value>;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ResultSet {
    records: Vec<Record>,
}

impl ResultSet {
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    /// Parse a response body into rows
    pub fn from_json(json: Value) -> Result<Self> {
        let rows = match json {
            Value::Array(rows) => rows,
            other => {
                return Err(Error::InvalidResponse {
                    reason: format!("expected a JSON array, got {}", value_kind(&other)),
                });
            }
        };

        let records = rows
            .into_iter()
            .enumerate()
            .map(|(index, row)| match row {
                Value::Object(record) => Ok(record),
                other => Err(Error::InvalidResponse {
                    reason: format!("row {} is {}, not an object", index, value_kind(&other)),
                }),
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { records })
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn into_records(self) -> Vec<Record> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn first(&self) -> Option<&Record> {
        self.records.first()
    }

    /// Keys of the first record, in their original order
    pub fn columns(&self) -> Vec<&str> {
        self.first()
            .map(|record| record.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
