use std::path::PathBuf;

use loanstar_cli::pipeline::PipelineOutcome;
use loanstar_output::LoadedTable;

pub struct DimensionSummary {
    pub attribute: String,
    pub table: String,
    pub records: usize,
}

/// Counts reported after a run.
pub struct RunSummary {
    pub input: PathBuf,
    /// `None` for dry runs.
    pub target: Option<String>,
    pub original_rows: usize,
    pub original_columns: usize,
    pub clean_rows: usize,
    pub clean_columns: usize,
    pub dropped_columns: usize,
    pub dimensions: Vec<DimensionSummary>,
    pub missing_dimensions: Vec<String>,
    pub fact_table: String,
    pub fact_rows: usize,
    pub loaded: Vec<LoadedTable>,
}

impl RunSummary {
    pub fn new(input: PathBuf, target: Option<String>, outcome: &PipelineOutcome) -> Self {
        let filter = &outcome.run.filter;
        let star = &outcome.run.star;
        Self {
            input,
            target,
            original_rows: outcome.input.typed.height(),
            original_columns: outcome.input.typed.width(),
            clean_rows: filter.table.height(),
            clean_columns: filter.table.width(),
            dropped_columns: filter.dropped_by_percentage.len() + filter.dropped_by_count.len(),
            dimensions: star
                .dimensions
                .iter()
                .map(|dimension| DimensionSummary {
                    attribute: dimension.attribute().to_string(),
                    table: dimension.table_name(),
                    records: dimension.len(),
                })
                .collect(),
            missing_dimensions: outcome.run.dimensions.missing.clone(),
            fact_table: star.fact.name().to_string(),
            fact_rows: star.fact.height(),
            loaded: outcome
                .load
                .as_ref()
                .map(|report| report.tables.clone())
                .unwrap_or_default(),
        }
    }
}
