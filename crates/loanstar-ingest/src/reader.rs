//! Delimited file reading into a table of raw scalar cells.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use loanstar_model::{Cell, DEFAULT_MISSING_MARKERS, InputConfig, Table};
use tracing::debug;

use crate::error::{IngestError, Result};

/// Options controlling how a delimited file is split and scalars are parsed.
#[derive(Debug, Clone)]
pub struct ReadOptions {
    pub delimiter: u8,
    pub has_headers: bool,
    /// Trimmed field values treated as missing, in addition to the empty string.
    pub missing_markers: Vec<String>,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            has_headers: true,
            missing_markers: DEFAULT_MISSING_MARKERS
                .iter()
                .map(ToString::to_string)
                .collect(),
        }
    }
}

impl ReadOptions {
    pub fn from_input(input: &InputConfig) -> Result<Self> {
        Ok(Self {
            delimiter: input.delimiter_byte()?,
            has_headers: input.has_headers,
            ..Self::default()
        })
    }
}

/// Normalizes a header value by trimming whitespace and a leading BOM.
fn normalize_header(value: &str) -> String {
    value.trim().trim_start_matches('\u{feff}').trim().to_string()
}

fn csv_error(path: &Path, error: &csv::Error) -> IngestError {
    IngestError::CsvParse {
        path: path.to_path_buf(),
        line: error.position().map(csv::Position::line),
        message: error.to_string(),
    }
}

/// Read the file named by `input` into a table of raw cells.
pub fn read_input_table(input: &InputConfig) -> Result<Table> {
    let options = ReadOptions::from_input(input)?;
    read_table(&input.path, &options)
}

/// Read a delimited file into a table of raw cells.
///
/// Without a header row, columns are named by position (`0`, `1`, ...).
pub fn read_table(path: &Path, options: &ReadOptions) -> Result<Table> {
    let file = File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            IngestError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IngestError::FileRead {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;
    let table = read_table_from_reader(file, path, options)?;
    debug!(
        path = %path.display(),
        rows = table.height(),
        columns = table.width(),
        "input table read"
    );
    Ok(table)
}

/// Read delimited text from any reader. `path` is only used in errors.
pub fn read_table_from_reader<R: Read>(
    source: R,
    path: &Path,
    options: &ReadOptions,
) -> Result<Table> {
    let mut reader = ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(options.has_headers)
        .flexible(false)
        .from_reader(source);

    let first = reader
        .headers()
        .map_err(|e| csv_error(path, &e))?
        .clone();
    if first.is_empty() {
        return Err(IngestError::EmptyCsv {
            path: path.to_path_buf(),
        });
    }
    let columns = column_names(&first, options.has_headers);
    let markers: Vec<&str> = options.missing_markers.iter().map(String::as_str).collect();

    let mut table = Table::new(columns).map_err(|source| IngestError::Table {
        path: path.to_path_buf(),
        source,
    })?;
    let mut record = StringRecord::new();
    loop {
        let more = reader
            .read_record(&mut record)
            .map_err(|e| csv_error(path, &e))?;
        if !more {
            break;
        }
        let row = record
            .iter()
            .map(|field| Cell::parse_scalar(field, &markers))
            .collect();
        table.push_row(row).map_err(|source| IngestError::Table {
            path: path.to_path_buf(),
            source,
        })?;
    }
    Ok(table)
}

fn column_names(first: &StringRecord, has_headers: bool) -> Vec<String> {
    if has_headers {
        first.iter().map(normalize_header).collect()
    } else {
        (0..first.len()).map(|idx| idx.to_string()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn test_read_table_with_header() {
        let file = create_temp_csv("loan_amnt,term\n5000, 36 months\n3000,\n");
        let table = read_table(file.path(), &ReadOptions::default()).unwrap();

        assert_eq!(table.columns(), ["loan_amnt".to_string(), "term".to_string()]);
        assert_eq!(table.height(), 2);
        assert_eq!(table.rows()[0], vec![Cell::Int(5000), Cell::text("36 months")]);
        assert_eq!(table.rows()[1], vec![Cell::Int(3000), Cell::Missing]);
    }

    #[test]
    fn test_read_table_without_header() {
        let file = create_temp_csv("RENT;10%\nOWN;5%\n");
        let options = ReadOptions {
            delimiter: b';',
            has_headers: false,
            ..ReadOptions::default()
        };
        let table = read_table(file.path(), &options).unwrap();

        assert_eq!(table.columns(), ["0".to_string(), "1".to_string()]);
        assert_eq!(table.height(), 2);
        assert_eq!(table.cell(0, 0), Some(&Cell::text("RENT")));
    }

    #[test]
    fn test_read_table_strips_bom() {
        let file = create_temp_csv("\u{feff}a,b\n1,2\n");
        let table = read_table(file.path(), &ReadOptions::default()).unwrap();
        assert_eq!(table.columns()[0], "a");
    }

    #[test]
    fn test_read_table_rejects_ragged_rows() {
        let file = create_temp_csv("a,b\n1,2\n3\n");
        let err = read_table(file.path(), &ReadOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            IngestError::CsvParse { line: Some(3), .. }
        ));
    }

    #[test]
    fn test_read_table_empty_file() {
        let file = create_temp_csv("");
        let err = read_table(file.path(), &ReadOptions::default()).unwrap_err();
        assert!(matches!(err, IngestError::EmptyCsv { .. }));
    }

    #[test]
    fn test_read_table_missing_file() {
        let err = read_table(Path::new("/nonexistent/loans.csv"), &ReadOptions::default())
            .unwrap_err();
        assert!(matches!(err, IngestError::FileNotFound { .. }));
    }

    #[test]
    fn test_read_table_duplicate_headers() {
        let file = create_temp_csv("a,a\n1,2\n");
        let err = read_table(file.path(), &ReadOptions::default()).unwrap_err();
        assert!(matches!(err, IngestError::Table { .. }));
    }
}
