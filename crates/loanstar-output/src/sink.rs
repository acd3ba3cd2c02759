//! The sink abstraction and its in-memory implementation.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use loanstar_model::{Cell, Table};

use crate::error::SinkError;

/// Destination for named tables.
///
/// `replace_table` must leave exactly the given rows under `name`, replacing
/// whatever was stored there before.
pub trait TableSink {
    fn replace_table(&mut self, name: &str, table: &Table) -> Result<(), SinkError>;

    /// Short description for logs, e.g. the target directory.
    fn describe(&self) -> String;
}

/// Keeps replaced tables in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    tables: BTreeMap<String, Table>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.tables.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

impl TableSink for MemorySink {
    fn replace_table(&mut self, name: &str, table: &Table) -> Result<(), SinkError> {
        self.tables.insert(name.to_string(), table.clone());
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

/// Storage type shared by every non-missing cell of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ColumnKind {
    Int,
    Float,
    Bool,
    Date,
    DateTime,
    Text,
}

/// Narrowest [`ColumnKind`] holding all cells. Missing cells do not count.
pub(crate) fn column_kind<'a>(cells: impl IntoIterator<Item = &'a Cell>) -> ColumnKind {
    let present: Vec<&Cell> = cells.into_iter().filter(|cell| !cell.is_missing()).collect();
    let all = |pred: fn(&Cell) -> bool| present.iter().all(|cell| pred(cell));
    if all(|cell| matches!(cell, Cell::Int(_))) {
        ColumnKind::Int
    } else if all(|cell| matches!(cell, Cell::Int(_) | Cell::Float(_))) {
        ColumnKind::Float
    } else if all(|cell| matches!(cell, Cell::Bool(_))) {
        ColumnKind::Bool
    } else if all(|cell| matches!(cell, Cell::Date(_))) {
        ColumnKind::Date
    } else if all(|cell| matches!(cell, Cell::DateTime(_))) {
        ColumnKind::DateTime
    } else {
        ColumnKind::Text
    }
}

/// Reject names other than ASCII letters, digits, `_` and `-`.
pub(crate) fn check_table_name(name: &str) -> Result<(), SinkError> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-'));
    if valid {
        Ok(())
    } else {
        Err(SinkError::InvalidName {
            name: name.to_string(),
        })
    }
}

/// Path of `<dir>/<name>.<extension>`, rejecting names that would escape `dir`.
pub(crate) fn table_path(dir: &Path, name: &str, extension: &str) -> Result<PathBuf, SinkError> {
    check_table_name(name)?;
    Ok(dir.join(format!("{name}.{extension}")))
}

/// Write `path` through a sibling temporary file renamed into place.
pub(crate) fn write_atomically<F>(path: &Path, write: F) -> Result<(), SinkError>
where
    F: FnOnce(&mut File) -> Result<(), SinkError>,
{
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| SinkError::Io {
            operation: "create directory",
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    let mut temp_name = path.as_os_str().to_owned();
    temp_name.push(".tmp");
    let temp_path = PathBuf::from(temp_name);

    let mut file = File::create(&temp_path).map_err(|e| SinkError::Io {
        operation: "create",
        path: temp_path.clone(),
        source: e,
    })?;
    let written = write(&mut file).and_then(|()| {
        file.flush().map_err(|e| SinkError::Io {
            operation: "write",
            path: temp_path.clone(),
            source: e,
        })?;
        file.sync_all().map_err(|e| SinkError::Io {
            operation: "sync",
            path: temp_path.clone(),
            source: e,
        })
    });
    drop(file);
    if let Err(err) = written {
        let _ = fs::remove_file(&temp_path);
        return Err(err);
    }

    fs::rename(&temp_path, path).map_err(|e| SinkError::AtomicWriteFailed {
        temp_path: temp_path.clone(),
        target_path: path.to_path_buf(),
        source: e,
    })
}
