//! Integration tests for the staged pipeline.

use std::fs;
use std::path::{Path, PathBuf};

use loanstar_cli::config::{OutputFormat, Overrides, database_path, output_dir, resolve_config};
use loanstar_cli::pipeline::{PipelineError, run_pipeline};
use loanstar_model::{Cell, PipelineConfig};
use loanstar_output::{CsvDirectorySink, DuckDbSink, MemorySink};
use tempfile::TempDir;

const LOANS: &str = "\
home_ownership,loan_status,issue_d,int_rate,loan_amnt,funded_amnt,term,installment,application_type,desc
RENT,Current,Jan-2019,10%,5000,5000,36 months,150,Individual,
OWN,Current,Feb-2019,5%,3000,3000,36 months,90,Individual,
";

fn write_input(dir: &Path, contents: &str) -> PathBuf {
    let path = dir.join("loans.csv");
    fs::write(&path, contents).expect("write input");
    path
}

fn config_for(path: PathBuf) -> PipelineConfig {
    PipelineConfig::default().with_input(path)
}

#[test]
fn run_loads_every_table_into_sink() {
    let dir = TempDir::new().unwrap();
    let config = config_for(write_input(dir.path(), LOANS));
    let mut sink = MemorySink::new();

    let outcome = run_pipeline(&config, Some(&mut sink)).unwrap();

    assert_eq!(outcome.input.raw.width(), 10);
    // the empty `desc` column is dropped before rows are considered
    assert_eq!(outcome.run.filter.dropped_by_percentage[0].column, "desc");
    assert_eq!(outcome.run.filter.table.height(), 2);
    let names: Vec<&str> = sink.names().collect();
    assert_eq!(
        names,
        vec!["home_ownership_dim", "issue_d_dim", "loan_status_dim", "loans_fact"]
    );
    let fact = sink.table("loans_fact").unwrap();
    let rate = fact.column_index("int_rate").unwrap();
    assert_eq!(fact.cell(1, rate), Some(&Cell::Float(0.05)));
    assert_eq!(outcome.load.unwrap().tables.len(), 4);
}

#[test]
fn dry_run_builds_without_loading() {
    let dir = TempDir::new().unwrap();
    let config = config_for(write_input(dir.path(), LOANS));

    let outcome = run_pipeline(&config, None).unwrap();

    assert!(outcome.load.is_none());
    assert_eq!(outcome.run.star.fact.height(), 2);
}

#[test]
fn csv_sink_writes_next_to_input() {
    let dir = TempDir::new().unwrap();
    let input = write_input(dir.path(), LOANS);
    let overrides = Overrides {
        input: Some(input),
        ..Overrides::default()
    };
    let config = resolve_config(None, overrides).unwrap();
    let out = output_dir(&config);
    let mut sink = CsvDirectorySink::new(&out);

    run_pipeline(&config.pipeline, Some(&mut sink)).unwrap();

    let issued = fs::read_to_string(out.join("issue_d_dim.csv")).unwrap();
    insta::assert_snapshot!(issued, @r"
    issue_d,month,year,issue_d_id
    2019-01-01,1,2019,0
    2019-02-01,2,2019,1
    ");
}

#[test]
fn duckdb_format_loads_every_table_into_one_database() {
    let dir = TempDir::new().unwrap();
    let overrides = Overrides {
        input: Some(write_input(dir.path(), LOANS)),
        format: Some(OutputFormat::Duckdb),
        ..Overrides::default()
    };
    let config = resolve_config(None, overrides).unwrap();
    let path = database_path(&config);
    assert_eq!(path, dir.path().join("output").join("loanstar.duckdb"));
    let mut sink = DuckDbSink::open(&path).unwrap();

    run_pipeline(&config.pipeline, Some(&mut sink)).unwrap();

    let (loans, statuses): (i64, i64) = sink
        .connection()
        .query_row(
            "SELECT (SELECT count(*) FROM loans_fact), (SELECT count(*) FROM loan_status_dim)",
            duckdb::params![],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .unwrap();
    assert_eq!((loans, statuses), (2, 1));
}

#[test]
fn config_file_and_flags_are_layered() {
    let dir = TempDir::new().unwrap();
    let input = write_input(dir.path(), &LOANS.replace(',', ";"));
    let config_path = dir.path().join("loanstar.toml");
    fs::write(
        &config_path,
        "[input]\ndelimiter = \";\"\n\n[star]\ndimensions = [\"home_ownership\"]\n",
    )
    .unwrap();
    let overrides = Overrides {
        input: Some(input),
        fact_columns: vec!["loan_amnt".into(), "home_ownership_id".into()],
        ..Overrides::default()
    };
    let config = resolve_config(Some(&config_path), overrides).unwrap();

    let outcome = run_pipeline(&config.pipeline, None).unwrap();

    assert_eq!(outcome.run.star.dimensions.len(), 1);
    assert_eq!(
        outcome.run.star.fact.table().columns(),
        ["loan_amnt", "home_ownership_id"]
    );
}

#[test]
fn malformed_month_is_a_transform_error() {
    let dir = TempDir::new().unwrap();
    let config = config_for(write_input(
        dir.path(),
        &LOANS.replace("Feb-2019", "02/2019"),
    ));

    let err = run_pipeline(&config, None).unwrap_err();

    assert!(matches!(err, PipelineError::Transform(_)));
    assert!(err.to_string().starts_with("transform: rule 'month-year-date'"));
}

#[test]
fn impossible_date_in_dropped_column_does_not_stop_the_run() {
    let dir = TempDir::new().unwrap();
    let mut contents = String::from(
        "home_ownership,loan_status,issue_d,int_rate,loan_amnt,settle_d\n\
         RENT,Current,Jan-2019,10%,5000,2019-02-30\n",
    );
    for _ in 0..9 {
        contents.push_str("OWN,Current,Feb-2019,5,3000,\n");
    }
    let config = config_for(write_input(dir.path(), &contents));
    let mut sink = MemorySink::new();

    let outcome = run_pipeline(&config, Some(&mut sink)).unwrap();

    assert_eq!(outcome.run.filter.dropped_by_percentage[0].column, "settle_d");
    assert_eq!(outcome.run.star.fact.height(), 10);
    let fact = sink.table("loans_fact").unwrap();
    let rate = fact.column_index("int_rate").unwrap();
    assert_eq!(fact.cell(0, rate), Some(&Cell::Float(0.10)));
    assert_eq!(fact.cell(1, rate), Some(&Cell::Float(0.05)));
}

#[test]
fn missing_input_is_an_ingest_error() {
    let dir = TempDir::new().unwrap();
    let config = config_for(dir.path().join("absent.csv"));
    let err = run_pipeline(&config, None).unwrap_err();
    assert!(matches!(err, PipelineError::Ingest(_)));
}
