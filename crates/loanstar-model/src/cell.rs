//! Typed cell values.
//!
//! A [`Cell`] is the tagged union every table row is made of. Loading produces
//! `Missing`, `Bool`, `Int`, `Float`, and `Text` cells; schema application and
//! the transform rules introduce `Date` and `DateTime`.

use std::fmt;

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Date rendering used everywhere a cell is shown as text.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Datetime rendering used everywhere a cell is shown as text.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Tokens treated as a missing value when loading delimited text.
pub const DEFAULT_MISSING_MARKERS: &[&str] = &[
    "", "NA", "N/A", "n/a", "NaN", "nan", "NULL", "null", "None", "#N/A", "<NA>",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum Cell {
    Missing,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

/// Coarse classification of a cell, used by type inference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CellKind {
    Missing,
    Bool,
    Int,
    Float,
    Text,
    Date,
    DateTime,
}

impl Cell {
    /// Parse one raw field.
    ///
    /// An empty field, or one whose trimmed value is in `missing_markers`,
    /// becomes [`Cell::Missing`]. A field of only whitespace is a value and is
    /// kept verbatim as text. Otherwise integer, float, and boolean parses are
    /// tried on the trimmed value in that order before falling back to text.
    pub fn parse_scalar(raw: &str, missing_markers: &[&str]) -> Self {
        if raw.is_empty() {
            return Self::Missing;
        }
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Self::Text(raw.to_string());
        }
        if missing_markers.contains(&trimmed) {
            return Self::Missing;
        }
        if let Ok(value) = trimmed.parse::<i64>() {
            return Self::Int(value);
        }
        if let Ok(value) = trimmed.parse::<f64>() {
            return Self::Float(value);
        }
        match trimmed {
            "true" | "True" | "TRUE" => Self::Bool(true),
            "false" | "False" | "FALSE" => Self::Bool(false),
            _ => Self::Text(trimmed.to_string()),
        }
    }

    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn kind(&self) -> CellKind {
        match self {
            Self::Missing => CellKind::Missing,
            Self::Bool(_) => CellKind::Bool,
            Self::Int(_) => CellKind::Int,
            Self::Float(_) => CellKind::Float,
            Self::Text(_) => CellKind::Text,
            Self::Date(_) => CellKind::Date,
            Self::DateTime(_) => CellKind::DateTime,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(value) => Some(*value as f64),
            Self::Float(value) => Some(*value),
            _ => None,
        }
    }

    /// Month and year of a temporal cell.
    pub fn month_year(&self) -> Option<(u32, i32)> {
        match self {
            Self::Date(date) => Some((date.month(), date.year())),
            Self::DateTime(datetime) => Some((datetime.month(), datetime.year())),
            _ => None,
        }
    }

    pub fn is_temporal(&self) -> bool {
        matches!(self, Self::Date(_) | Self::DateTime(_))
    }

    /// Hashable identity of the value, `None` for missing cells.
    pub fn key(&self) -> Option<CellKey> {
        let key = match self {
            Self::Missing => return None,
            Self::Bool(value) => CellKey::Bool(*value),
            Self::Int(value) => CellKey::Int(*value),
            // -0.0 and 0.0 compare equal, so they must share a key.
            Self::Float(value) if *value == 0.0 => CellKey::Float(0.0f64.to_bits()),
            Self::Float(value) => CellKey::Float(value.to_bits()),
            Self::Text(value) => CellKey::Text(value.clone()),
            Self::Date(value) => CellKey::Date(*value),
            Self::DateTime(value) => CellKey::DateTime(*value),
        };
        Some(key)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => Ok(()),
            Self::Bool(value) => write!(f, "{value}"),
            Self::Int(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
            Self::Date(value) => write!(f, "{}", value.format(DATE_FORMAT)),
            Self::DateTime(value) => write!(f, "{}", value.format(DATETIME_FORMAT)),
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<NaiveDate> for Cell {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

/// Natural-value identity of a non-missing cell.
///
/// Floats are keyed by bit pattern so the key can be hashed and ordered.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CellKey {
    Bool(bool),
    Int(i64),
    Float(u64),
    Text(String),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}
