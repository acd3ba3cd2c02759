//! CSV directory sink backed by polars.

use std::path::{Path, PathBuf};

use loanstar_model::{Cell, Table};
use polars::prelude::{
    Column, CsvWriter, DataFrame, IntoColumn, NamedFrom, SerWriter, Series,
};
use tracing::debug;

use crate::error::SinkError;
use crate::sink::{ColumnKind, TableSink, column_kind, table_path, write_atomically};

/// Writes each table to `<dir>/<name>.csv`.
#[derive(Debug, Clone)]
pub struct CsvDirectorySink {
    dir: PathBuf,
}

impl CsvDirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl TableSink for CsvDirectorySink {
    fn replace_table(&mut self, name: &str, table: &Table) -> Result<(), SinkError> {
        let path = table_path(&self.dir, name, "csv")?;
        let mut df = table_to_dataframe(table)?;
        write_atomically(&path, |file| {
            CsvWriter::new(file)
                .include_header(true)
                .finish(&mut df)?;
            Ok(())
        })?;
        debug!(path = %path.display(), rows = df.height(), "csv table written");
        Ok(())
    }

    fn describe(&self) -> String {
        format!("csv:{}", self.dir.display())
    }
}

/// Convert a table into a dataframe with one typed column per table column.
///
/// Integer, float, and boolean columns keep their types; anything else,
/// dates included, is written as text. Missing cells become nulls.
pub fn table_to_dataframe(table: &Table) -> Result<DataFrame, SinkError> {
    let columns: Vec<Column> = table
        .columns()
        .iter()
        .enumerate()
        .map(|(idx, name)| column_series(name, table.column_cells(idx).collect()).into_column())
        .collect();
    Ok(DataFrame::new(columns)?)
}

fn column_series(name: &str, cells: Vec<&Cell>) -> Series {
    match column_kind(cells.iter().copied()) {
        ColumnKind::Int => {
            let values: Vec<Option<i64>> = cells
                .iter()
                .map(|cell| match cell {
                    Cell::Int(value) => Some(*value),
                    _ => None,
                })
                .collect();
            Series::new(name.into(), values)
        }
        ColumnKind::Float => {
            let values: Vec<Option<f64>> = cells.iter().map(|cell| cell.as_f64()).collect();
            Series::new(name.into(), values)
        }
        ColumnKind::Bool => {
            let values: Vec<Option<bool>> = cells
                .iter()
                .map(|cell| match cell {
                    Cell::Bool(value) => Some(*value),
                    _ => None,
                })
                .collect();
            Series::new(name.into(), values)
        }
        ColumnKind::Date | ColumnKind::DateTime | ColumnKind::Text => {
            let values: Vec<Option<String>> = cells
                .iter()
                .map(|cell| (!cell.is_missing()).then(|| cell.to_string()))
                .collect();
            Series::new(name.into(), values)
        }
    }
}
