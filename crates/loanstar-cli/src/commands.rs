use anyhow::{Context, Result};
use comfy_table::{Cell, CellAlignment, Table};
use tracing::info_span;

use loanstar_cli::config::{
    ConfigFile, OutputFormat, Overrides, database_path, output_dir, resolve_config,
};
use loanstar_cli::pipeline::run_pipeline;
use loanstar_ingest::load_typed_table;
use loanstar_model::InputConfig;
use loanstar_output::{CsvDirectorySink, DuckDbSink, JsonDirectorySink, TableSink};

use crate::cli::{InputArgs, InspectArgs, OutputFormatArg, RunArgs};
use crate::summary::{align_column, apply_table_style, header_cell};
use crate::types::RunSummary;

fn overrides_from_args(args: &RunArgs) -> Overrides {
    Overrides {
        input: Some(args.input.input.clone()),
        delimiter: args.input.delimiter,
        no_header: args.input.no_header,
        max_missing_percent: args.max_missing_percent,
        max_missing_count: args.max_missing_count,
        dimensions: args.dimensions.clone(),
        fact_columns: args.fact_columns.clone(),
        output_dir: args.output_dir.clone(),
        format: args.format.map(|format| match format {
            OutputFormatArg::Csv => OutputFormat::Csv,
            OutputFormatArg::Json => OutputFormat::Json,
            OutputFormatArg::Duckdb => OutputFormat::Duckdb,
        }),
        database: args.database.clone(),
    }
}

fn build_sink(config: &ConfigFile) -> Result<Box<dyn TableSink>> {
    let dir = output_dir(config);
    let sink: Box<dyn TableSink> = match config.output.format {
        OutputFormat::Csv => Box::new(CsvDirectorySink::new(dir)),
        OutputFormat::Json => Box::new(JsonDirectorySink::new(dir)),
        OutputFormat::Duckdb => {
            let path = database_path(config);
            let sink = DuckDbSink::open(&path)
                .with_context(|| format!("open database {}", path.display()))?;
            Box::new(sink)
        }
    };
    Ok(sink)
}

fn target_description(config: &ConfigFile) -> String {
    match config.output.format {
        OutputFormat::Duckdb => database_path(config).display().to_string(),
        OutputFormat::Csv | OutputFormat::Json => output_dir(config).display().to_string(),
    }
}

pub fn run_etl(args: &RunArgs) -> Result<RunSummary> {
    let span = info_span!("run", input = %args.input.input.display());
    let _guard = span.enter();

    let config = resolve_config(args.config.as_deref(), overrides_from_args(args))
        .context("load configuration")?;

    let outcome = if args.dry_run {
        run_pipeline(&config.pipeline, None)?
    } else {
        let mut sink = build_sink(&config)?;
        run_pipeline(&config.pipeline, Some(sink.as_mut()))?
    };

    let target = (!args.dry_run).then(|| target_description(&config));
    Ok(RunSummary::new(
        config.pipeline.input.path.clone(),
        target,
        &outcome,
    ))
}

fn input_config(args: &InputArgs) -> InputConfig {
    let mut input = InputConfig {
        path: args.input.clone(),
        ..InputConfig::default()
    };
    if let Some(delimiter) = args.delimiter {
        input.delimiter = delimiter;
    }
    input.has_headers = !args.no_header;
    input
}

pub fn run_inspect(args: &InspectArgs) -> Result<()> {
    let input = input_config(&args.input);
    let loaded = load_typed_table(&input)
        .with_context(|| format!("load {}", input.path.display()))?;

    let rows = loaded.raw.height();
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Column"),
        header_cell("Type"),
        header_cell("Missing"),
        header_cell("Missing %"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    for (idx, (name, column_type)) in loaded.types.iter().enumerate() {
        let missing = loaded.raw.missing_count(idx);
        let percent = if rows == 0 {
            100.0
        } else {
            missing as f64 * 100.0 / rows as f64
        };
        table.add_row(vec![
            Cell::new(name),
            Cell::new(column_type),
            Cell::new(missing),
            Cell::new(format!("{percent:.1}")),
        ]);
    }
    println!("Input: {} ({rows} rows)", input.path.display());
    println!("{table}");
    Ok(())
}
