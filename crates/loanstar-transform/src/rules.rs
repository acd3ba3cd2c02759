//! Named, column-keyed value conversions.
//!
//! Each rule targets one column by name. A rule whose column is absent, or
//! whose column is already entirely in the target representation, does
//! nothing. Otherwise every non-missing cell of the column is converted.

use std::sync::LazyLock;

use chrono::NaiveDate;
use loanstar_model::{Cell, Table};
use regex::Regex;
use tracing::debug;

use crate::error::{Result, TransformError};

/// Three-letter month abbreviation, hyphen, four-digit year.
static MONTH_YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z]{3}-[0-9]{4}$").expect("Invalid month-year regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    /// `Jan-2019` text to the calendar date 2019-01-01.
    MonthYearDate,
    /// `10%` text to the fraction 0.10.
    PercentToFraction,
}

impl RuleKind {
    pub const fn name(self) -> &'static str {
        match self {
            Self::MonthYearDate => "month-year-date",
            Self::PercentToFraction => "percent-to-fraction",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformRule {
    pub column: String,
    pub kind: RuleKind,
}

impl TransformRule {
    pub fn new(column: impl Into<String>, kind: RuleKind) -> Self {
        Self {
            column: column.into(),
            kind,
        }
    }

    /// Whether every non-missing cell is already in the target representation.
    pub fn is_converted<'a>(&self, cells: impl IntoIterator<Item = &'a Cell>) -> bool {
        cells.into_iter().all(|cell| match self.kind {
            RuleKind::MonthYearDate => {
                matches!(cell, Cell::Missing | Cell::Date(_) | Cell::DateTime(_))
            }
            RuleKind::PercentToFraction => {
                matches!(cell, Cell::Missing | Cell::Int(_) | Cell::Float(_))
            }
        })
    }

    /// Convert one cell of a column that still needs converting.
    ///
    /// Missing cells pass through. Dates are kept by the month rule; numbers
    /// in a percentage column are percentages too and are divided by 100.
    pub fn apply_cell(&self, row: usize, cell: &Cell) -> Result<Cell> {
        match (self.kind, cell) {
            (_, Cell::Missing) => Ok(Cell::Missing),
            (RuleKind::MonthYearDate, Cell::Date(_) | Cell::DateTime(_)) => Ok(cell.clone()),
            (RuleKind::MonthYearDate, Cell::Text(value)) => parse_month_year(value)
                .map(Cell::Date)
                .ok_or_else(|| self.invalid(row, cell)),
            (RuleKind::PercentToFraction, Cell::Int(_) | Cell::Float(_)) => cell
                .as_f64()
                .map(|number| Cell::Float(number / 100.0))
                .ok_or_else(|| self.invalid(row, cell)),
            (RuleKind::PercentToFraction, Cell::Text(value)) => percent_to_fraction(value)
                .map(Cell::Float)
                .ok_or_else(|| self.invalid(row, cell)),
            _ => Err(self.invalid(row, cell)),
        }
    }

    fn invalid(&self, row: usize, cell: &Cell) -> TransformError {
        TransformError::InvalidValue {
            column: self.column.clone(),
            row,
            value: cell.to_string(),
            rule: self.kind.name(),
        }
    }
}

/// The loan extract's rules: `issue_d` dates and `int_rate` percentages.
pub fn default_rules() -> Vec<TransformRule> {
    vec![
        TransformRule::new("issue_d", RuleKind::MonthYearDate),
        TransformRule::new("int_rate", RuleKind::PercentToFraction),
    ]
}

fn parse_month_year(value: &str) -> Option<NaiveDate> {
    if !MONTH_YEAR.is_match(value) {
        return None;
    }
    NaiveDate::parse_from_str(&format!("01-{value}"), "%d-%b-%Y").ok()
}

fn percent_to_fraction(value: &str) -> Option<f64> {
    value
        .trim_end_matches('%')
        .trim()
        .parse::<f64>()
        .ok()
        .map(|number| number / 100.0)
}

/// Apply `rules` in order, returning a new table.
pub fn apply_rules(table: &Table, rules: &[TransformRule]) -> Result<Table> {
    let mut current = table.clone();
    for rule in rules {
        let Some(index) = current.column_index(&rule.column) else {
            debug!(column = %rule.column, rule = rule.kind.name(), "rule column absent");
            continue;
        };
        if rule.is_converted(current.column_cells(index)) {
            debug!(column = %rule.column, rule = rule.kind.name(), "column already converted");
            continue;
        }
        current = current.map_column(index, |row, cell| rule.apply_cell(row, cell))?;
        debug!(column = %rule.column, rule = rule.kind.name(), "rule applied");
    }
    Ok(current)
}
