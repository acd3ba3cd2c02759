//! Star-schema types: dimension tables, key maps, and the fact table.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::cell::{Cell, CellKey};
use crate::error::Result;
use crate::table::Table;

/// Name of the surrogate-key column for a dimension attribute.
pub fn key_column_name(attribute: &str) -> String {
    format!("{attribute}_id")
}

/// Name under which a dimension is persisted.
pub fn dimension_table_name(attribute: &str) -> String {
    format!("{attribute}_dim")
}

/// One distinct attribute value and its surrogate key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionRow {
    pub key: usize,
    pub value: Cell,
    /// Values for the dimension's derived columns, in column order.
    pub derived: Vec<Cell>,
}

/// Distinct values of one attribute with dense, zero-based surrogate keys.
///
/// Keys are assigned by [`DimensionTable::push`] in call order, so they are
/// always `0..len` without gaps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionTable {
    attribute: String,
    derived_columns: Vec<String>,
    rows: Vec<DimensionRow>,
}

impl DimensionTable {
    pub fn new(attribute: impl Into<String>, derived_columns: Vec<String>) -> Self {
        Self {
            attribute: attribute.into(),
            derived_columns,
            rows: Vec::new(),
        }
    }

    /// Append a value and return the key assigned to it.
    ///
    /// Callers are responsible for deduplication.
    pub fn push(&mut self, value: Cell, derived: Vec<Cell>) -> usize {
        let key = self.rows.len();
        self.rows.push(DimensionRow {
            key,
            value,
            derived,
        });
        key
    }

    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    pub fn table_name(&self) -> String {
        dimension_table_name(&self.attribute)
    }

    pub fn key_column(&self) -> String {
        key_column_name(&self.attribute)
    }

    pub fn derived_columns(&self) -> &[String] {
        &self.derived_columns
    }

    pub fn rows(&self) -> &[DimensionRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Persisted column order: attribute, derived columns, surrogate key.
    pub fn columns(&self) -> Vec<String> {
        let mut columns = Vec::with_capacity(self.derived_columns.len() + 2);
        columns.push(self.attribute.clone());
        columns.extend(self.derived_columns.iter().cloned());
        columns.push(self.key_column());
        columns
    }

    pub fn key_map(&self) -> KeyMap {
        let keys = self
            .rows
            .iter()
            .filter_map(|row| row.value.key().map(|key| (key, row.key)))
            .collect();
        KeyMap {
            attribute: self.attribute.clone(),
            keys,
        }
    }

    /// Render as a plain table for loading.
    ///
    /// Fails only when the attribute name collides with a derived column.
    pub fn to_table(&self) -> Result<Table> {
        let rows = self
            .rows
            .iter()
            .map(|row| {
                let mut cells = Vec::with_capacity(row.derived.len() + 2);
                cells.push(row.value.clone());
                cells.extend(row.derived.iter().cloned());
                cells.push(Cell::Int(row.key as i64));
                cells
            })
            .collect();
        Table::from_rows(self.columns(), rows)
    }
}

/// Lookup from a dimension's natural value to its surrogate key.
#[derive(Debug, Clone)]
pub struct KeyMap {
    attribute: String,
    keys: HashMap<CellKey, usize>,
}

impl KeyMap {
    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    pub fn get(&self, value: &Cell) -> Option<usize> {
        value.key().and_then(|key| self.keys.get(&key).copied())
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Fact rows with dimension attributes replaced by surrogate keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactTable {
    name: String,
    table: Table,
}

impl FactTable {
    pub fn new(name: impl Into<String>, table: Table) -> Self {
        Self {
            name: name.into(),
            table,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn height(&self) -> usize {
        self.table.height()
    }
}

/// The dimension tables plus the fact table of one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StarSchema {
    pub dimensions: Vec<DimensionTable>,
    pub fact: FactTable,
}

impl StarSchema {
    pub fn dimension(&self, attribute: &str) -> Option<&DimensionTable> {
        self.dimensions
            .iter()
            .find(|dimension| dimension.attribute() == attribute)
    }

    /// Every table in load order: dimensions first, then the fact table.
    pub fn named_tables(&self) -> Result<Vec<(String, Table)>> {
        let mut tables = Vec::with_capacity(self.dimensions.len() + 1);
        for dimension in &self.dimensions {
            tables.push((dimension.table_name(), dimension.to_table()?));
        }
        tables.push((self.fact.name().to_string(), self.fact.table().clone()));
        Ok(tables)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn push_assigns_dense_keys() {
        let mut dim = DimensionTable::new("home_ownership", Vec::new());
        assert_eq!(dim.push(Cell::text("RENT"), Vec::new()), 0);
        assert_eq!(dim.push(Cell::text("OWN"), Vec::new()), 1);
        assert_eq!(dim.table_name(), "home_ownership_dim");
        assert_eq!(dim.key_column(), "home_ownership_id");
        let keys: Vec<usize> = dim.rows().iter().map(|row| row.key).collect();
        assert_eq!(keys, vec![0, 1]);
    }

    #[test]
    fn key_map_resolves_values() {
        let mut dim = DimensionTable::new("loan_status", Vec::new());
        dim.push(Cell::text("Current"), Vec::new());
        dim.push(Cell::text("Fully Paid"), Vec::new());
        let map = dim.key_map();
        assert_eq!(map.get(&Cell::text("Fully Paid")), Some(1));
        assert_eq!(map.get(&Cell::text("Charged Off")), None);
        assert_eq!(map.get(&Cell::Missing), None);
    }

    #[test]
    fn to_table_places_derived_columns_before_key() {
        let mut dim = DimensionTable::new("issue_d", vec!["month".into(), "year".into()]);
        let date = NaiveDate::from_ymd_opt(2019, 1, 1).unwrap();
        dim.push(Cell::Date(date), vec![Cell::Int(1), Cell::Int(2019)]);
        let table = dim.to_table().unwrap();
        assert_eq!(
            table.columns(),
            ["issue_d", "month", "year", "issue_d_id"].map(String::from)
        );
        assert_eq!(
            table.rows()[0],
            vec![Cell::Date(date), Cell::Int(1), Cell::Int(2019), Cell::Int(0)]
        );
    }
}
