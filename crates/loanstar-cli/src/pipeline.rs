//! Staged pipeline run: ingest, star-schema build, integrity check, load.

use std::time::Instant;

use loanstar_ingest::{IngestError, LoadedTable, load_typed_table};
use loanstar_model::{ConfigError, PipelineConfig};
use loanstar_output::{LoadReport, OutputError, TableSink, load_star_schema};
use loanstar_transform::{StarRun, TransformError, build_star_schema, verify_referential_integrity};
use thiserror::Error;
use tracing::{info, info_span};

/// A fatal pipeline error, tagged with the stage that raised it.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("ingest: {0}")]
    Ingest(#[from] IngestError),

    #[error("transform: {0}")]
    Transform(#[from] TransformError),

    #[error("load: {0}")]
    Output(#[from] OutputError),
}

#[derive(Debug)]
pub struct PipelineOutcome {
    pub input: LoadedTable,
    pub run: StarRun,
    /// `None` for dry runs.
    pub load: Option<LoadReport>,
}

/// Run every stage. Without a sink the star schema is built and checked but
/// not persisted.
pub fn run_pipeline(
    config: &PipelineConfig,
    sink: Option<&mut dyn TableSink>,
) -> Result<PipelineOutcome, PipelineError> {
    config.validate()?;
    let start = Instant::now();

    let input = info_span!("ingest_stage").in_scope(|| -> Result<_, PipelineError> {
        let start = Instant::now();
        let input = load_typed_table(&config.input)?;
        info!(
            rows = input.typed.height(),
            columns = input.typed.width(),
            duration_ms = start.elapsed().as_millis(),
            "ingest complete"
        );
        Ok(input)
    })?;

    let run = info_span!("transform_stage").in_scope(|| -> Result<_, PipelineError> {
        let start = Instant::now();
        let run = build_star_schema(&input.typed, config)?;
        verify_referential_integrity(&run.star)?;
        info!(
            rows = run.transformed.height(),
            columns = run.transformed.width(),
            duration_ms = start.elapsed().as_millis(),
            "transform complete"
        );
        Ok(run)
    })?;

    let load = match sink {
        Some(sink) => Some(info_span!("load_stage").in_scope(|| {
            load_star_schema(sink, &run.star).map_err(PipelineError::from)
        })?),
        None => {
            info!("dry run, nothing loaded");
            None
        }
    };

    info!(
        duration_ms = start.elapsed().as_millis(),
        "pipeline complete"
    );
    Ok(PipelineOutcome { input, run, load })
}
