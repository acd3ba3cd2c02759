//! In-memory star-schema build: filter, rules, dimensions, fact.

use std::time::Instant;

use loanstar_model::{PipelineConfig, StarSchema, Table};
use tracing::{info, info_span};

use crate::dimension::{DimensionSet, build_dimensions};
use crate::error::Result;
use crate::fact::assemble_fact;
use crate::filter::{FilterOutcome, filter_missing};
use crate::rules::{apply_rules, default_rules};

/// Everything produced by one star-schema build.
#[derive(Debug, Clone, PartialEq)]
pub struct StarRun {
    pub filter: FilterOutcome,
    /// The filtered table after the transform rules.
    pub transformed: Table,
    pub dimensions: DimensionSet,
    pub star: StarSchema,
}

/// Run the quality filter, transform rules, dimension builder and fact
/// assembler over a typed table. The input is not modified.
pub fn build_star_schema(table: &Table, config: &PipelineConfig) -> Result<StarRun> {
    let span = info_span!("star_schema", rows = table.height(), columns = table.width());
    let _guard = span.enter();
    let start = Instant::now();

    let filter = filter_missing(table, &config.quality)?;
    let transformed = apply_rules(&filter.table, &default_rules())?;
    let dimensions = build_dimensions(&transformed, &config.star.dimensions);
    let fact = assemble_fact(&transformed, &dimensions, &config.star)?;

    let star = StarSchema {
        dimensions: dimensions.tables.clone(),
        fact,
    };
    info!(
        dimensions = star.dimensions.len(),
        fact_rows = star.fact.height(),
        duration_ms = start.elapsed().as_millis(),
        "star schema built"
    );
    Ok(StarRun {
        filter,
        transformed,
        dimensions,
        star,
    })
}
