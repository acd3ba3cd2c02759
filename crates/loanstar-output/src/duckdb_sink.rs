//! DuckDB database sink.

use std::fs;
use std::path::Path;

use duckdb::types::Value;
use duckdb::{Connection, params_from_iter};
use loanstar_model::{Cell, Table};
use tracing::debug;

use crate::error::SinkError;
use crate::sink::{ColumnKind, TableSink, check_table_name, column_kind};

/// Writes each table into a DuckDB database.
///
/// `replace_table` drops, recreates and fills the table inside a single
/// transaction; a failed write leaves the previous table in place.
pub struct DuckDbSink {
    location: String,
    conn: Connection,
}

impl DuckDbSink {
    /// Open (or create) the database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SinkError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| SinkError::Io {
                operation: "create directory",
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        let conn = Connection::open(path).map_err(database("open database"))?;
        Ok(Self {
            location: path.display().to_string(),
            conn,
        })
    }

    pub fn open_in_memory() -> Result<Self, SinkError> {
        let conn = Connection::open_in_memory().map_err(database("open database"))?;
        Ok(Self {
            location: ":memory:".to_string(),
            conn,
        })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl TableSink for DuckDbSink {
    fn replace_table(&mut self, name: &str, table: &Table) -> Result<(), SinkError> {
        check_table_name(name)?;
        if table.width() == 0 {
            return Err(SinkError::NoColumns {
                name: name.to_string(),
            });
        }
        let kinds: Vec<ColumnKind> = (0..table.width())
            .map(|idx| column_kind(table.column_cells(idx)))
            .collect();

        let tx = self
            .conn
            .transaction()
            .map_err(database("begin transaction"))?;
        tx.execute_batch(&create_table_sql(name, table.columns(), &kinds))
            .map_err(database("create table"))?;
        {
            let mut insert = tx
                .prepare(&insert_sql(name, table.columns(), &kinds))
                .map_err(database("prepare insert"))?;
            for row in table.rows() {
                let values = row.iter().zip(&kinds).map(|(cell, kind)| sql_value(cell, *kind));
                insert
                    .execute(params_from_iter(values))
                    .map_err(database("insert row"))?;
            }
        }
        tx.commit().map_err(database("commit"))?;

        debug!(database = %self.location, table = name, rows = table.height(), "table replaced");
        Ok(())
    }

    fn describe(&self) -> String {
        format!("duckdb:{}", self.location)
    }
}

fn database(operation: &'static str) -> impl FnOnce(duckdb::Error) -> SinkError {
    move |source| SinkError::Database { operation, source }
}

fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

const fn sql_type(kind: ColumnKind) -> &'static str {
    match kind {
        ColumnKind::Int => "BIGINT",
        ColumnKind::Float => "DOUBLE",
        ColumnKind::Bool => "BOOLEAN",
        ColumnKind::Date => "DATE",
        ColumnKind::DateTime => "TIMESTAMP",
        ColumnKind::Text => "VARCHAR",
    }
}

/// `DROP TABLE IF EXISTS` followed by `CREATE TABLE` with one typed column per table column.
fn create_table_sql(name: &str, columns: &[String], kinds: &[ColumnKind]) -> String {
    let table = quote_identifier(name);
    let definitions: Vec<String> = columns
        .iter()
        .zip(kinds)
        .map(|(column, kind)| format!("{} {}", quote_identifier(column), sql_type(*kind)))
        .collect();
    format!(
        "DROP TABLE IF EXISTS {table};\nCREATE TABLE {table} ({});",
        definitions.join(", ")
    )
}

/// Temporal values are bound as text and cast by the database.
fn insert_sql(name: &str, columns: &[String], kinds: &[ColumnKind]) -> String {
    let names: Vec<String> = columns.iter().map(|column| quote_identifier(column)).collect();
    let placeholders: Vec<&str> = kinds
        .iter()
        .map(|kind| match kind {
            ColumnKind::Date => "CAST(? AS DATE)",
            ColumnKind::DateTime => "CAST(? AS TIMESTAMP)",
            _ => "?",
        })
        .collect();
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quote_identifier(name),
        names.join(", "),
        placeholders.join(", ")
    )
}

fn sql_value(cell: &Cell, kind: ColumnKind) -> Value {
    match (kind, cell) {
        (_, Cell::Missing) => Value::Null,
        (ColumnKind::Int, Cell::Int(value)) => Value::BigInt(*value),
        (ColumnKind::Float, _) => cell.as_f64().map_or(Value::Null, Value::Double),
        (ColumnKind::Bool, Cell::Bool(value)) => Value::Boolean(*value),
        _ => Value::Text(cell.to_string()),
    }
}
