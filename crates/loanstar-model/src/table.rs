//! In-memory table of typed cells.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::cell::Cell;
use crate::error::{ModelError, Result};

/// An ordered set of named columns and positional rows.
///
/// Every row holds exactly one [`Cell`] per column. Operations that reshape a
/// table (`select`, `filter_rows`, `map_column`) return a new table and leave
/// the receiver untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Create an empty table, rejecting duplicate column names.
    pub fn new(columns: Vec<String>) -> Result<Self> {
        let mut seen = BTreeSet::new();
        for column in &columns {
            if !seen.insert(column.as_str()) {
                return Err(ModelError::DuplicateColumn {
                    column: column.clone(),
                });
            }
        }
        Ok(Self {
            columns,
            rows: Vec::new(),
        })
    }

    pub fn from_rows(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Result<Self> {
        let mut table = Self::new(columns)?;
        table.rows.reserve(rows.len());
        for row in rows {
            table.push_row(row)?;
        }
        Ok(table)
    }

    pub fn push_row(&mut self, row: Vec<Cell>) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(ModelError::RowWidth {
                expected: self.columns.len(),
                found: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&Cell> {
        self.rows.get(row).and_then(|cells| cells.get(column))
    }

    /// Iterate the cells of one column, top to bottom.
    pub fn column_cells(&self, index: usize) -> impl Iterator<Item = &Cell> + '_ {
        self.rows.iter().filter_map(move |row| row.get(index))
    }

    pub fn missing_count(&self, index: usize) -> usize {
        self.column_cells(index)
            .filter(|cell| cell.is_missing())
            .count()
    }

    /// Total number of missing cells in the table.
    pub fn total_missing(&self) -> usize {
        self.rows
            .iter()
            .flatten()
            .filter(|cell| cell.is_missing())
            .count()
    }

    /// Project the named columns, in the given order, into a new table.
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<Self> {
        let indices = names
            .iter()
            .map(|name| {
                self.column_index(name.as_ref())
                    .ok_or_else(|| ModelError::UnknownColumn {
                        column: name.as_ref().to_string(),
                    })
            })
            .collect::<Result<Vec<_>>>()?;
        let columns = names.iter().map(|name| name.as_ref().to_string()).collect();
        let rows = self
            .rows
            .iter()
            .map(|row| indices.iter().map(|&idx| row[idx].clone()).collect())
            .collect();
        Self::from_rows(columns, rows)
    }

    /// Keep the rows for which `keep` returns true.
    pub fn filter_rows<F>(&self, mut keep: F) -> Self
    where
        F: FnMut(&[Cell]) -> bool,
    {
        Self {
            columns: self.columns.clone(),
            rows: self
                .rows
                .iter()
                .filter(|row| keep(row))
                .cloned()
                .collect(),
        }
    }

    /// Rewrite one column cell by cell into a new table.
    ///
    /// The closure receives the row index and the current cell. The first
    /// error aborts the rewrite.
    pub fn map_column<F, E>(&self, index: usize, mut f: F) -> std::result::Result<Self, E>
    where
        F: FnMut(usize, &Cell) -> std::result::Result<Cell, E>,
    {
        if index >= self.columns.len() {
            return Ok(self.clone());
        }
        let mut rows = Vec::with_capacity(self.rows.len());
        for (row_idx, row) in self.rows.iter().enumerate() {
            let mut next = row.clone();
            next[index] = f(row_idx, &row[index])?;
            rows.push(next);
        }
        Ok(Self {
            columns: self.columns.clone(),
            rows,
        })
    }
}
