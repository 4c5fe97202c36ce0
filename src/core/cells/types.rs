//! Cell values and cellset types

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// A TM1 cell value: numeric or string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Text(String),
}

impl CellValue {
    /// The value written by a bulk delete
    pub fn zero() -> Self {
        CellValue::Number(0.0)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            CellValue::Text(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            CellValue::Number(_) => None,
        }
    }

    /// Convert a JSON cell value; `null` and non-scalars have no cell value
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_f64().map(CellValue::Number),
            Value::String(s) => Some(CellValue::Text(s.clone())),
            Value::Bool(b) => Some(CellValue::Number(if *b { 1.0 } else { 0.0 })),
            _ => None,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            CellValue::Number(n) => serde_json::Number::from_f64(*n)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            CellValue::Text(s) => Value::String(s.clone()),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Number(value as f64)
    }
}

impl From<i32> for CellValue {
    fn from(value: i32) -> Self {
        CellValue::Number(f64::from(value))
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

/// One cell of a write request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellUpdate {
    /// Element names, one per cube dimension, in cube order
    pub coordinates: Vec<String>,
    pub value: CellValue,
    /// Add `value` to the stored number instead of replacing it
    #[serde(default)]
    pub increment: bool,
}

impl CellUpdate {
    pub fn new(coordinates: Vec<String>, value: impl Into<CellValue>) -> Self {
        Self {
            coordinates,
            value: value.into(),
            increment: false,
        }
    }

    pub fn incrementing(mut self, increment: bool) -> Self {
        self.increment = increment;
        self
    }
}

/// A single cell address
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellQuery {
    pub target: String,
    pub coordinates: Vec<String>,
}

impl CellQuery {
    pub fn new<S: Into<String>>(
        target: impl Into<String>,
        coordinates: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            target: target.into(),
            coordinates: coordinates.into_iter().map(Into::into).collect(),
        }
    }
}

/// One axis of an MDX result: its tuples as member-name lists
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Axis {
    pub ordinal: usize,
    pub tuples: Vec<Vec<String>>,
}

/// One cell of an MDX result
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub ordinal: usize,
    pub value: Option<CellValue>,
}

/// Result of an MDX query
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CellSet {
    pub id: Option<String>,
    pub axes: Vec<Axis>,
    pub cells: Vec<Cell>,
}

impl CellSet {
    /// Parse the `ExecuteMDX` response body
    pub fn from_json(body: &Value) -> Self {
        let id = body.get("ID").and_then(Value::as_str).map(str::to_string);

        let axes = body
            .get("Axes")
            .and_then(Value::as_array)
            .map(|axes| {
                axes.iter()
                    .enumerate()
                    .map(|(index, axis)| Axis {
                        ordinal: axis
                            .get("Ordinal")
                            .and_then(Value::as_u64)
                            .map(|o| o as usize)
                            .unwrap_or(index),
                        tuples: axis
                            .get("Tuples")
                            .and_then(Value::as_array)
                            .map(|tuples| tuples.iter().map(member_names).collect())
                            .unwrap_or_default(),
                    })
                    .collect()
            })
            .unwrap_or_default();

        let cells = body
            .get("Cells")
            .and_then(Value::as_array)
            .map(|cells| {
                cells
                    .iter()
                    .enumerate()
                    .map(|(index, cell)| Cell {
                        ordinal: cell
                            .get("Ordinal")
                            .and_then(Value::as_u64)
                            .map(|o| o as usize)
                            .unwrap_or(index),
                        value: cell.get("Value").and_then(CellValue::from_json),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self { id, axes, cells }
    }

    /// Value of the first cell, if the cellset has one
    pub fn first_value(&self) -> Option<&CellValue> {
        self.cells.first().and_then(|c| c.value.as_ref())
    }
}

fn member_names(tuple: &Value) -> Vec<String> {
    tuple
        .get("Members")
        .and_then(Value::as_array)
        .map(|members| {
            members
                .iter()
                .filter_map(|m| m.get("Name").and_then(Value::as_str))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
