//! Fact table assembly and foreign-key checks.

use loanstar_model::{Cell, FactTable, KeyMap, StarConfig, StarSchema, Table};
use tracing::{debug, warn};

use crate::dimension::DimensionSet;
use crate::error::{Result, TransformError};

/// Where one output column of the fact table comes from.
enum FactSource {
    /// Surrogate key looked up from the attribute column at `index`.
    Key { index: usize, keys: KeyMap },
    /// Copied from the column at `index`.
    Copy { index: usize },
}

fn plan_columns(
    table: &Table,
    dimensions: &DimensionSet,
    fact_columns: &[String],
) -> Vec<(String, FactSource)> {
    let mut plan = Vec::with_capacity(fact_columns.len());
    for column in fact_columns {
        let dimension = dimensions
            .tables
            .iter()
            .find(|dimension| dimension.key_column() == *column);
        let source = match dimension {
            Some(dimension) => table.column_index(dimension.attribute()).map(|index| {
                FactSource::Key {
                    index,
                    keys: dimension.key_map(),
                }
            }),
            None => table
                .column_index(column)
                .map(|index| FactSource::Copy { index }),
        };
        match source {
            Some(source) => plan.push((column.clone(), source)),
            None => warn!(column = %column, "fact column not available, omitted"),
        }
    }
    plan
}

/// Build the fact table from the transformed rows.
///
/// Dimension key columns are resolved through each dimension's [`KeyMap`];
/// a value without a key is an integrity violation.
pub fn assemble_fact(
    table: &Table,
    dimensions: &DimensionSet,
    config: &StarConfig,
) -> Result<FactTable> {
    let plan = plan_columns(table, dimensions, &config.fact_columns);
    let columns = plan.iter().map(|(name, _)| name.clone()).collect();
    let mut fact = Table::new(columns)?;

    for (row_idx, row) in table.rows().iter().enumerate() {
        let mut out = Vec::with_capacity(plan.len());
        for (_, source) in &plan {
            let cell = match source {
                FactSource::Copy { index } => row[*index].clone(),
                FactSource::Key { index, keys } => {
                    let value = &row[*index];
                    let key = keys.get(value).ok_or_else(|| TransformError::Integrity {
                        dimension: keys.attribute().to_string(),
                        row: row_idx,
                        value: value.to_string(),
                    })?;
                    Cell::Int(key as i64)
                }
            };
            out.push(cell);
        }
        fact.push_row(out)?;
    }

    debug!(
        table = %config.fact_table,
        rows = fact.height(),
        columns = fact.width(),
        "fact table assembled"
    );
    Ok(FactTable::new(config.fact_table.clone(), fact))
}

/// Check that every foreign key in the fact table names an existing dimension row.
pub fn verify_referential_integrity(star: &StarSchema) -> Result<()> {
    let fact = star.fact.table();
    for dimension in &star.dimensions {
        let Some(index) = fact.column_index(&dimension.key_column()) else {
            continue;
        };
        for (row_idx, cell) in fact.column_cells(index).enumerate() {
            let valid = match cell {
                Cell::Int(key) => usize::try_from(*key).is_ok_and(|key| key < dimension.len()),
                _ => false,
            };
            if !valid {
                return Err(TransformError::Integrity {
                    dimension: dimension.attribute().to_string(),
                    row: row_idx,
                    value: cell.to_string(),
                });
            }
        }
    }
    Ok(())
}
