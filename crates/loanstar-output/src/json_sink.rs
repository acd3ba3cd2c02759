//! JSON directory sink: one array of row objects per table.

use std::io::Write;
use std::path::{Path, PathBuf};

use loanstar_model::{Cell, Table};
use serde_json::{Map, Number, Value};
use tracing::debug;

use crate::error::SinkError;
use crate::sink::{TableSink, table_path, write_atomically};

/// Writes each table to `<dir>/<name>.json`.
#[derive(Debug, Clone)]
pub struct JsonDirectorySink {
    dir: PathBuf,
}

impl JsonDirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl TableSink for JsonDirectorySink {
    fn replace_table(&mut self, name: &str, table: &Table) -> Result<(), SinkError> {
        let path = table_path(&self.dir, name, "json")?;
        let bytes = serde_json::to_vec_pretty(&table_to_json(table))?;
        write_atomically(&path, |file| {
            file.write_all(&bytes).map_err(|e| SinkError::Io {
                operation: "write",
                path: path.clone(),
                source: e,
            })
        })?;
        debug!(path = %path.display(), rows = table.height(), "json table written");
        Ok(())
    }

    fn describe(&self) -> String {
        format!("json:{}", self.dir.display())
    }
}

fn cell_to_json(cell: &Cell) -> Value {
    match cell {
        Cell::Missing => Value::Null,
        Cell::Bool(value) => Value::Bool(*value),
        Cell::Int(value) => Value::Number((*value).into()),
        Cell::Float(value) => Number::from_f64(*value).map_or(Value::Null, Value::Number),
        Cell::Text(_) | Cell::Date(_) | Cell::DateTime(_) => Value::String(cell.to_string()),
    }
}

/// Render a table as an array of `{column: value}` objects.
pub fn table_to_json(table: &Table) -> Value {
    let rows = table
        .rows()
        .iter()
        .map(|row| {
            let object: Map<String, Value> = table
                .columns()
                .iter()
                .cloned()
                .zip(row.iter().map(cell_to_json))
                .collect();
            Value::Object(object)
        })
        .collect();
    Value::Array(rows)
}
