//! Two-stage missing-value column filter followed by a complete-row filter.
//!
//! Stage 1 drops columns by missing percentage, stage 2 drops the survivors by
//! absolute missing count, stage 3 drops every row that still has a missing
//! cell. Column survival is decided before any row is removed.

use loanstar_model::{QualityConfig, Table};
use tracing::{debug, info};

use crate::error::Result;

/// A column removed by one of the column stages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedColumn {
    pub column: String,
    pub missing: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilterOutcome {
    /// Complete rows over the retained columns.
    pub table: Table,
    pub retained_columns: Vec<String>,
    pub dropped_by_percentage: Vec<DroppedColumn>,
    pub dropped_by_count: Vec<DroppedColumn>,
    pub rows_dropped: usize,
}

/// Missing fraction of a column. A table without rows counts as fully missing.
fn missing_fraction(missing: usize, rows: usize) -> f64 {
    if rows == 0 {
        1.0
    } else {
        missing as f64 / rows as f64
    }
}

pub fn filter_missing(table: &Table, quality: &QualityConfig) -> Result<FilterOutcome> {
    let max_fraction = quality.max_missing_percent / 100.0;
    let rows = table.height();

    let mut stage_one = Vec::new();
    let mut dropped_by_percentage = Vec::new();
    for (idx, column) in table.columns().iter().enumerate() {
        let missing = table.missing_count(idx);
        if missing_fraction(missing, rows) <= max_fraction {
            stage_one.push(column.clone());
        } else {
            dropped_by_percentage.push(DroppedColumn {
                column: column.clone(),
                missing,
            });
        }
    }
    let table = table.select(&stage_one)?;
    debug!(
        kept = stage_one.len(),
        dropped = dropped_by_percentage.len(),
        "missing percentage filter"
    );

    let mut retained_columns = Vec::new();
    let mut dropped_by_count = Vec::new();
    for (idx, column) in table.columns().iter().enumerate() {
        let missing = table.missing_count(idx);
        if missing <= quality.max_missing_count {
            retained_columns.push(column.clone());
        } else {
            dropped_by_count.push(DroppedColumn {
                column: column.clone(),
                missing,
            });
        }
    }
    let table = table.select(&retained_columns)?;
    debug!(
        kept = retained_columns.len(),
        dropped = dropped_by_count.len(),
        "missing count filter"
    );

    let table = table.filter_rows(|row| row.iter().all(|cell| !cell.is_missing()));
    let rows_dropped = rows - table.height();
    info!(
        columns = retained_columns.len(),
        rows = table.height(),
        rows_dropped,
        "quality filter applied"
    );

    Ok(FilterOutcome {
        table,
        retained_columns,
        dropped_by_percentage,
        dropped_by_count,
        rows_dropped,
    })
}
