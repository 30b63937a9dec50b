//! Corner-count comparison dataset.
//!
//! A [`Dataset`] is an ordered table with three columns:
//!
//! - `name`: row identifier (a room)
//! - `rb_corners`: the truth series
//! - `gt_corners`: the predicted series
//!
//! The table is parsed from a JSON document in either of the two layouts a
//! data-frame export produces:
//!
//! ```json
//! [{"name": "a", "rb_corners": 4, "gt_corners": 4}, ...]
//! ```
//!
//! ```json
//! {"name": {"0": "a", ...}, "rb_corners": {"0": 4, ...}, "gt_corners": {"0": 4, ...}}
//! ```
//!
//! Column values may also be plain arrays. Extra columns are ignored. In the
//! column layout, rows follow the index order of the `name` column and the
//! other columns are joined on the same index key.

mod fetch;

use std::io::Read;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub use fetch::DEFAULT_URL;

use crate::error::{Error, Result};

/// Column holding the row identifiers.
pub const NAME_COLUMN: &str = "name";
/// Column holding the truth series.
pub const TRUTH_COLUMN: &str = "rb_corners";
/// Column holding the predicted series.
pub const PREDICTED_COLUMN: &str = "gt_corners";

/// A single dataset row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    /// Row identifier.
    pub name: String,
    /// Truth corner count.
    pub rb_corners: f64,
    /// Predicted corner count.
    pub gt_corners: f64,
}

impl Row {
    /// Create a row.
    #[must_use]
    pub fn new(name: impl Into<String>, rb_corners: f64, gt_corners: f64) -> Self {
        Self {
            name: name.into(),
            rb_corners,
            gt_corners,
        }
    }
}

/// Column-oriented comparison table.
///
/// All columns have the same length. The table is never mutated after it is
/// built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    names: Vec<String>,
    rb_corners: Vec<f64>,
    gt_corners: Vec<f64>,
}

impl Dataset {
    /// Build a dataset from rows, keeping their order.
    pub fn from_rows(rows: impl IntoIterator<Item = Row>) -> Self {
        let mut dataset = Self::default();
        for row in rows {
            dataset.names.push(row.name);
            dataset.rb_corners.push(row.rb_corners);
            dataset.gt_corners.push(row.gt_corners);
        }
        dataset
    }

    /// Parse a dataset from a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let document: Value = serde_json::from_str(json)?;
        Self::from_value(document)
    }

    /// Parse a dataset from a reader yielding a JSON document.
    pub fn from_reader(reader: impl Read) -> Result<Self> {
        let document: Value = serde_json::from_reader(reader)?;
        Self::from_value(document)
    }

    /// Build a dataset from an already parsed JSON document.
    pub fn from_value(document: Value) -> Result<Self> {
        match document {
            Value::Array(records) => Self::from_records(records),
            Value::Object(columns) => Self::from_columns(columns),
            other => Err(Error::Dataset(format!(
                "expected an array of records or an object of columns, got {}",
                json_kind(&other)
            ))),
        }
    }

    fn from_records(records: Vec<Value>) -> Result<Self> {
        let mut dataset = Self::default();
        for (index, record) in records.into_iter().enumerate() {
            let mut record = match record {
                Value::Object(record) => record,
                other => {
                    return Err(Error::Dataset(format!(
                        "record {index} is {}, expected an object",
                        json_kind(&other)
                    )));
                }
            };
            dataset.names.push(take_field(&mut record, NAME_COLUMN)?);
            dataset.rb_corners.push(take_field(&mut record, TRUTH_COLUMN)?);
            dataset.gt_corners.push(take_field(&mut record, PREDICTED_COLUMN)?);
        }
        Ok(dataset)
    }

    fn from_columns(mut columns: Map<String, Value>) -> Result<Self> {
        let mut names = take_column(&mut columns, NAME_COLUMN)?;
        let mut rb_corners = take_column(&mut columns, TRUTH_COLUMN)?;
        let mut gt_corners = take_column(&mut columns, PREDICTED_COLUMN)?;

        if rb_corners.len() != names.len() || gt_corners.len() != names.len() {
            return Err(Error::Dataset(format!(
                "column lengths differ: {NAME_COLUMN}={}, {TRUTH_COLUMN}={}, {PREDICTED_COLUMN}={}",
                names.len(),
                rb_corners.len(),
                gt_corners.len()
            )));
        }

        // Rows follow the index of the name column; the other columns are
        // joined on the same index key, whatever order they list it in.
        let mut dataset = Self::default();
        for key in names.keys() {
            dataset.names.push(names.take(NAME_COLUMN, &key)?);
            dataset.rb_corners.push(rb_corners.take(TRUTH_COLUMN, &key)?);
            dataset.gt_corners.push(gt_corners.take(PREDICTED_COLUMN, &key)?);
        }
        Ok(dataset)
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the dataset has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Row identifiers in row order.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Truth series in row order.
    #[must_use]
    pub fn rb_corners(&self) -> &[f64] {
        &self.rb_corners
    }

    /// Predicted series in row order.
    #[must_use]
    pub fn gt_corners(&self) -> &[f64] {
        &self.gt_corners
    }

    /// Get a copy of the row at `index`.
    #[must_use]
    pub fn row(&self, index: usize) -> Option<Row> {
        Some(Row {
            name: self.names.get(index)?.clone(),
            rb_corners: *self.rb_corners.get(index)?,
            gt_corners: *self.gt_corners.get(index)?,
        })
    }

    /// Iterate over rows in order.
    pub fn rows(&self) -> impl Iterator<Item = Row> + '_ {
        (0..self.len()).filter_map(|i| self.row(i))
    }
}

fn take_field<T: DeserializeOwned>(record: &mut Map<String, Value>, column: &str) -> Result<T> {
    let value = record
        .remove(column)
        .ok_or_else(|| Error::MissingColumn(column.to_string()))?;
    Ok(serde_json::from_value(value)?)
}

/// One column of a column-oriented document.
enum Column {
    /// Plain array; the index is the position.
    List(Vec<Value>),
    /// Index-keyed object, e.g. `{"0": 4, "1": 5}`.
    Indexed(Map<String, Value>),
}

impl Column {
    fn len(&self) -> usize {
        match self {
            Self::List(values) => values.len(),
            Self::Indexed(values) => values.len(),
        }
    }

    /// Index keys in document order.
    fn keys(&self) -> Vec<String> {
        match self {
            Self::List(values) => (0..values.len()).map(|i| i.to_string()).collect(),
            Self::Indexed(values) => values.keys().cloned().collect(),
        }
    }

    /// Remove and decode the value stored under `key`.
    fn take<T: DeserializeOwned>(&mut self, column: &str, key: &str) -> Result<T> {
        let value = match self {
            Self::List(values) => key
                .parse::<usize>()
                .ok()
                .and_then(|i| values.get_mut(i))
                .map(Value::take),
            Self::Indexed(values) => values.remove(key),
        };
        let value =
            value.ok_or_else(|| Error::Dataset(format!("column {column} has no row {key:?}")))?;
        Ok(serde_json::from_value(value)?)
    }
}

fn take_column(columns: &mut Map<String, Value>, column: &str) -> Result<Column> {
    match columns.remove(column) {
        Some(Value::Array(values)) => Ok(Column::List(values)),
        Some(Value::Object(indexed)) => Ok(Column::Indexed(indexed)),
        Some(other) => Err(Error::Dataset(format!(
            "column {column} is {}, expected an array or an object",
            json_kind(&other)
        ))),
        None => Err(Error::MissingColumn(column.to_string())),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_records() {
        let json = r#"[
            {"name": "kitchen", "rb_corners": 4, "gt_corners": 4, "floor": 1},
            {"name": "hall", "rb_corners": 6, "gt_corners": 5.0}
        ]"#;
        let dataset = Dataset::from_json_str(json).unwrap();

        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.names(), ["kitchen", "hall"]);
        assert_eq!(dataset.rb_corners(), [4.0, 6.0]);
        assert_eq!(dataset.gt_corners(), [4.0, 5.0]);
    }

    #[test]
    fn test_parse_indexed_columns_keeps_document_order() {
        let json = r#"{
            "name": {"3": "d", "0": "a", "1": "b"},
            "rb_corners": {"3": 8, "0": 4, "1": 5},
            "gt_corners": {"3": 7, "0": 4, "1": 6}
        }"#;
        let dataset = Dataset::from_json_str(json).unwrap();

        assert_eq!(dataset.names(), ["d", "a", "b"]);
        assert_eq!(dataset.rb_corners(), [8.0, 4.0, 5.0]);
        assert_eq!(dataset.gt_corners(), [7.0, 4.0, 6.0]);
    }

    #[test]
    fn test_indexed_columns_join_on_index_key() {
        let json = r#"{
            "name": {"0": "a", "1": "b"},
            "rb_corners": {"1": 5, "0": 4},
            "gt_corners": {"0": 4, "1": 6}
        }"#;
        let dataset = Dataset::from_json_str(json).unwrap();

        assert_eq!(
            dataset.rows().collect::<Vec<_>>(),
            [Row::new("a", 4.0, 4.0), Row::new("b", 5.0, 6.0)]
        );
    }

    #[test]
    fn test_indexed_column_without_matching_key() {
        let json = r#"{
            "name": {"0": "a", "1": "b"},
            "rb_corners": {"0": 4, "2": 5},
            "gt_corners": {"0": 4, "1": 6}
        }"#;
        let err = Dataset::from_json_str(json).unwrap_err();
        assert!(matches!(err, Error::Dataset(ref msg) if msg.contains("rb_corners")));
    }

    #[test]
    fn test_array_name_column_with_indexed_values() {
        let json = r#"{"name": ["a", "b"], "rb_corners": {"1": 7, "0": 3}, "gt_corners": [3, 8]}"#;
        let dataset = Dataset::from_json_str(json).unwrap();

        assert_eq!(dataset.rb_corners(), [3.0, 7.0]);
        assert_eq!(dataset.gt_corners(), [3.0, 8.0]);
    }

    #[test]
    fn test_parse_array_columns() {
        let json = r#"{"name": ["a", "b"], "rb_corners": [1, 2], "gt_corners": [1.5, 2.5]}"#;
        let dataset = Dataset::from_reader(json.as_bytes()).unwrap();

        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.row(1), Some(Row::new("b", 2.0, 2.5)));
        assert_eq!(dataset.row(2), None);
    }

    #[test]
    fn test_missing_column() {
        let json = r#"[{"name": "a", "rb_corners": 4}]"#;
        let err = Dataset::from_json_str(json).unwrap_err();
        assert!(matches!(err, Error::MissingColumn(ref c) if c == "gt_corners"));

        let json = r#"{"name": [], "gt_corners": []}"#;
        let err = Dataset::from_json_str(json).unwrap_err();
        assert!(matches!(err, Error::MissingColumn(ref c) if c == "rb_corners"));
    }

    #[test]
    fn test_ragged_columns() {
        let json = r#"{"name": ["a", "b"], "rb_corners": [1, 2], "gt_corners": [1]}"#;
        let err = Dataset::from_json_str(json).unwrap_err();
        assert!(matches!(err, Error::Dataset(_)));
    }

    #[test]
    fn test_non_numeric_value() {
        let json = r#"[{"name": "a", "rb_corners": "four", "gt_corners": 4}]"#;
        let err = Dataset::from_json_str(json).unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(Dataset::from_json_str("{"), Err(Error::Json(_))));
        assert!(matches!(Dataset::from_json_str("42"), Err(Error::Dataset(_))));
    }

    #[test]
    fn test_from_rows_round_trips_rows() {
        let rows = vec![Row::new("a", 1.0, 2.0), Row::new("b", 3.0, 4.0)];
        let dataset = Dataset::from_rows(rows.clone());

        assert!(!dataset.is_empty());
        assert_eq!(dataset.rows().collect::<Vec<_>>(), rows);
        assert!(Dataset::default().is_empty());
    }
}
