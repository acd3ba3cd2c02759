//! Dimension extraction with positional surrogate keys.

use std::collections::HashSet;

use loanstar_model::{Cell, DimensionTable, Table};
use tracing::{debug, warn};

pub const MONTH_COLUMN: &str = "month";
pub const YEAR_COLUMN: &str = "year";

/// Dimensions built for the configured attributes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DimensionSet {
    /// One table per configured attribute present in the input, in config order.
    pub tables: Vec<DimensionTable>,
    /// Configured attributes the input table does not have.
    pub missing: Vec<String>,
}

impl DimensionSet {
    pub fn get(&self, attribute: &str) -> Option<&DimensionTable> {
        self.tables
            .iter()
            .find(|table| table.attribute() == attribute)
    }
}

/// Build a dimension for each of `attributes` present in `table`.
pub fn build_dimensions<S: AsRef<str>>(table: &Table, attributes: &[S]) -> DimensionSet {
    let mut set = DimensionSet::default();
    for attribute in attributes {
        let attribute = attribute.as_ref();
        match table.column_index(attribute) {
            Some(index) => {
                let dimension = build_dimension(attribute, table.column_cells(index));
                debug!(
                    dimension = attribute,
                    values = dimension.len(),
                    "dimension built"
                );
                set.tables.push(dimension);
            }
            None => {
                warn!(dimension = attribute, "dimension column not in table");
                set.missing.push(attribute.to_string());
            }
        }
    }
    set
}

/// Deduplicate `cells` in first-occurrence order, skipping missing values.
///
/// A column whose values are all dates or datetimes also gets `month` and
/// `year` columns.
pub fn build_dimension<'a>(
    attribute: &str,
    cells: impl IntoIterator<Item = &'a Cell>,
) -> DimensionTable {
    let mut seen = HashSet::new();
    let distinct: Vec<&Cell> = cells
        .into_iter()
        .filter(|cell| cell.key().is_some_and(|key| seen.insert(key)))
        .collect();

    let temporal = !distinct.is_empty() && distinct.iter().all(|cell| cell.is_temporal());
    let derived_columns = if temporal {
        vec![MONTH_COLUMN.to_string(), YEAR_COLUMN.to_string()]
    } else {
        Vec::new()
    };

    let mut dimension = DimensionTable::new(attribute, derived_columns);
    for cell in distinct {
        let derived = match cell.month_year() {
            Some((month, year)) if temporal => {
                vec![Cell::Int(i64::from(month)), Cell::Int(i64::from(year))]
            }
            _ => Vec::new(),
        };
        dimension.push(cell.clone(), derived);
    }
    dimension
}
