//! Re-typing a raw table according to its inferred column types.

use chrono::{NaiveDate, NaiveDateTime};
use loanstar_model::{Cell, ColumnType, ColumnTypeMap, DATE_FORMAT, InferredKind, Table};
use tracing::debug;

/// Datetimes with optional fractional seconds.
const DATETIME_INPUT_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Produce a new table with pattern-typed columns converted to dates.
///
/// A `date` or `datetime` column is converted only when every non-missing
/// value is exactly a valid calendar date (or datetime). Columns whose values
/// merely start with a date, or hold an impossible date such as `2019-02-30`,
/// are kept as read. Integer cells in mixed integer/float columns are widened
/// to floats. Other columns are copied unchanged.
pub fn apply_column_types(table: &Table, types: &ColumnTypeMap) -> Table {
    let mut typed = table.clone();
    for (idx, name) in table.columns().iter().enumerate() {
        let Some(column_type) = types.get(name) else {
            continue;
        };
        let converted = match column_type {
            ColumnType::Date => convert_all(&typed, idx, parse_date),
            ColumnType::DateTime => convert_all(&typed, idx, parse_datetime),
            ColumnType::Inferred(InferredKind::MixedIntegerFloat) => {
                Some(typed.column_cells(idx).map(widen).collect())
            }
            ColumnType::Inferred(_) => continue,
        };
        match converted {
            Some(cells) => typed = replace_column(&typed, idx, cells),
            None => debug!(column = %name, %column_type, "column kept as text"),
        }
    }
    typed
}

/// Convert every cell of a column, or `None` if any non-missing value fails.
fn convert_all(table: &Table, idx: usize, parse: fn(&str) -> Option<Cell>) -> Option<Vec<Cell>> {
    table
        .column_cells(idx)
        .map(|cell| match cell {
            Cell::Missing => Some(Cell::Missing),
            other => parse(&other.to_string()),
        })
        .collect()
}

fn replace_column(table: &Table, idx: usize, cells: Vec<Cell>) -> Table {
    let result: Result<Table, std::convert::Infallible> =
        table.map_column(idx, |row, _| Ok(cells[row].clone()));
    let Ok(table) = result;
    table
}

fn parse_date(value: &str) -> Option<Cell> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .ok()
        .map(Cell::Date)
}

fn parse_datetime(value: &str) -> Option<Cell> {
    NaiveDateTime::parse_from_str(value, DATETIME_INPUT_FORMAT)
        .ok()
        .map(Cell::DateTime)
}

fn widen(cell: &Cell) -> Cell {
    match cell {
        Cell::Int(value) => Cell::Float(*value as f64),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn types(entries: &[(&str, ColumnType)]) -> ColumnTypeMap {
        ColumnTypeMap::new(
            entries
                .iter()
                .map(|(name, column_type)| (name.to_string(), *column_type))
                .collect(),
        )
    }

    fn single_column(name: &str, cells: Vec<Cell>) -> Table {
        Table::from_rows(
            vec![name.into()],
            cells.into_iter().map(|cell| vec![cell]).collect(),
        )
        .unwrap()
    }

    #[test]
    fn date_columns_become_calendar_dates() {
        let table = Table::from_rows(
            vec!["d".into(), "n".into()],
            vec![
                vec![Cell::text("2020-01-05"), Cell::Int(1)],
                vec![Cell::Missing, Cell::Float(2.5)],
            ],
        )
        .unwrap();
        let map = types(&[
            ("d", ColumnType::Date),
            ("n", ColumnType::Inferred(InferredKind::MixedIntegerFloat)),
        ]);

        let typed = apply_column_types(&table, &map);
        let date = NaiveDate::from_ymd_opt(2020, 1, 5).unwrap();
        assert_eq!(typed.rows()[0], vec![Cell::Date(date), Cell::Float(1.0)]);
        assert_eq!(typed.rows()[1], vec![Cell::Missing, Cell::Float(2.5)]);
        // the input table is left untouched
        assert_eq!(table.cell(0, 1), Some(&Cell::Int(1)));
    }

    #[test]
    fn datetime_columns_keep_fractional_seconds() {
        let table = single_column("ts", vec![Cell::text("2021-03-04 05:06:07.123")]);
        let typed = apply_column_types(&table, &types(&[("ts", ColumnType::DateTime)]));
        let expected = NaiveDate::from_ymd_opt(2021, 3, 4)
            .unwrap()
            .and_hms_milli_opt(5, 6, 7, 123)
            .unwrap();
        assert_eq!(typed.cell(0, 0), Some(&Cell::DateTime(expected)));
    }

    #[test]
    fn prefix_only_matches_keep_their_full_text() {
        let table = single_column(
            "term",
            vec![
                Cell::text("2019-01-01 plus 36 months"),
                Cell::text("2019-02-01"),
            ],
        );
        let typed = apply_column_types(&table, &types(&[("term", ColumnType::Date)]));
        assert_eq!(typed, table);
    }

    #[test]
    fn impossible_calendar_date_leaves_column_as_read() {
        let table = single_column("settle_d", vec![Cell::text("2019-02-30"), Cell::Missing]);
        let typed = apply_column_types(&table, &types(&[("settle_d", ColumnType::Date)]));
        assert_eq!(typed.cell(0, 0), Some(&Cell::text("2019-02-30")));
    }
}
