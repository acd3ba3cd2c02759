//! Column type inference.
//!
//! Each column is first checked against the datetime and date text patterns.
//! A pattern only applies when every non-missing value matches it; otherwise
//! the column falls back to a label derived from its scalar kinds.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use loanstar_model::{Cell, CellKind, ColumnType, ColumnTypeMap, InferredKind, Table};
use regex::Regex;
use tracing::debug;

/// `YYYY-MM-DD HH:MM:SS` at the start of a value.
static DATETIME_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2} [0-9]{2}:[0-9]{2}:[0-9]{2}")
        .expect("valid datetime regex")
});

/// `YYYY-MM-DD` at the start of a value.
static DATE_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}").expect("valid date regex"));

pub fn infer_column_types(table: &Table) -> ColumnTypeMap {
    let entries = table
        .columns()
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            let column_type = infer_column_type(table.column_cells(idx));
            debug!(column = %name, column_type = %column_type, "inferred column type");
            (name.clone(), column_type)
        })
        .collect();
    ColumnTypeMap::new(entries)
}

/// Classify one column from its cells.
pub fn infer_column_type<'a>(cells: impl IntoIterator<Item = &'a Cell>) -> ColumnType {
    let values: Vec<&Cell> = cells.into_iter().filter(|cell| !cell.is_missing()).collect();
    if values.is_empty() {
        return ColumnType::Inferred(InferredKind::Empty);
    }
    let rendered: Vec<String> = values.iter().map(ToString::to_string).collect();
    if rendered.iter().all(|value| DATETIME_PREFIX.is_match(value)) {
        return ColumnType::DateTime;
    }
    if rendered.iter().all(|value| DATE_PREFIX.is_match(value)) {
        return ColumnType::Date;
    }
    ColumnType::Inferred(generic_kind(values.iter().map(|cell| cell.kind())))
}

/// Label a set of non-missing scalar kinds.
pub fn generic_kind(kinds: impl IntoIterator<Item = CellKind>) -> InferredKind {
    let kinds: BTreeSet<CellKind> = kinds
        .into_iter()
        .filter(|kind| *kind != CellKind::Missing)
        .collect();
    let mut iter = kinds.iter();
    match (iter.next(), iter.next(), iter.next()) {
        (None, _, _) => InferredKind::Empty,
        (Some(kind), None, _) => match kind {
            CellKind::Int => InferredKind::Integer,
            CellKind::Float => InferredKind::Floating,
            CellKind::Bool => InferredKind::Boolean,
            CellKind::Text => InferredKind::String,
            CellKind::Date => InferredKind::Date,
            CellKind::DateTime => InferredKind::DateTime,
            CellKind::Missing => InferredKind::Empty,
        },
        (Some(CellKind::Int), Some(CellKind::Float), None) => InferredKind::MixedIntegerFloat,
        _ => InferredKind::Mixed,
    }
}
