//! Semantic column types produced by type inference.

use std::fmt;

/// Label assigned to a column by generic inference over its scalar kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InferredKind {
    /// No non-missing values.
    Empty,
    Integer,
    Floating,
    /// Integers and floats, nothing else.
    MixedIntegerFloat,
    Boolean,
    String,
    Date,
    DateTime,
    /// Any other combination of kinds.
    Mixed,
}

impl InferredKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Integer => "integer",
            Self::Floating => "floating",
            Self::MixedIntegerFloat => "mixed-integer-float",
            Self::Boolean => "boolean",
            Self::String => "string",
            Self::Date => "date",
            Self::DateTime => "datetime",
            Self::Mixed => "mixed",
        }
    }
}

/// Semantic type tag for a column.
///
/// `DateTime` and `Date` come from the text pattern checks; everything else is
/// the generic fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    DateTime,
    Date,
    Inferred(InferredKind),
}

impl ColumnType {
    pub const fn label(self) -> &'static str {
        match self {
            Self::DateTime => "datetime",
            Self::Date => "date",
            Self::Inferred(kind) => kind.label(),
        }
    }

    /// True when the tag came from a pattern match rather than the fallback.
    pub const fn is_pattern(self) -> bool {
        matches!(self, Self::DateTime | Self::Date)
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Column name to [`ColumnType`], in table column order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnTypeMap {
    entries: Vec<(String, ColumnType)>,
}

impl ColumnTypeMap {
    pub fn new(entries: Vec<(String, ColumnType)>) -> Self {
        Self { entries }
    }

    pub fn get(&self, column: &str) -> Option<ColumnType> {
        self.entries
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, column_type)| *column_type)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, ColumnType)> + '_ {
        self.entries
            .iter()
            .map(|(name, column_type)| (name.as_str(), *column_type))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
