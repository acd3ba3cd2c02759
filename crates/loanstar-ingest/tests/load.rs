use std::fs;

use chrono::NaiveDate;
use loanstar_ingest::{IngestError, infer_column_type, load_typed_table};
use loanstar_model::{Cell, ColumnType, InferredKind, InputConfig};
use tempfile::TempDir;

fn input_file(dir: &TempDir, contents: &str) -> InputConfig {
    let path = dir.path().join("loans.csv");
    fs::write(&path, contents).expect("write input");
    InputConfig {
        path,
        ..InputConfig::default()
    }
}

#[test]
fn loads_and_types_loan_extract() {
    let dir = TempDir::new().expect("temp dir");
    let input = input_file(
        &dir,
        "loan_amnt,int_rate,issue_d,last_pymnt,installment,flag\n\
         5000,10%,Jan-2019,2019-03-01,150,true\n\
         3000,5%,Feb-2019,,90.5,false\n",
    );

    let loaded = load_typed_table(&input).expect("load");

    assert_eq!(loaded.raw.height(), 2);
    assert_eq!(
        loaded.types.get("loan_amnt"),
        Some(ColumnType::Inferred(InferredKind::Integer))
    );
    assert_eq!(
        loaded.types.get("int_rate"),
        Some(ColumnType::Inferred(InferredKind::String))
    );
    assert_eq!(loaded.types.get("last_pymnt"), Some(ColumnType::Date));
    assert_eq!(
        loaded.types.get("installment"),
        Some(ColumnType::Inferred(InferredKind::MixedIntegerFloat))
    );
    assert_eq!(
        loaded.types.get("flag"),
        Some(ColumnType::Inferred(InferredKind::Boolean))
    );

    let pymnt = loaded.typed.column_index("last_pymnt").unwrap();
    assert_eq!(
        loaded.typed.cell(0, pymnt),
        Some(&Cell::Date(NaiveDate::from_ymd_opt(2019, 3, 1).unwrap()))
    );
    assert_eq!(loaded.typed.cell(1, pymnt), Some(&Cell::Missing));
    let installment = loaded.typed.column_index("installment").unwrap();
    assert_eq!(loaded.typed.cell(0, installment), Some(&Cell::Float(150.0)));
    // raw cells are kept as read
    assert_eq!(loaded.raw.cell(0, installment), Some(&Cell::Int(150)));
}

#[test]
fn single_bad_value_demotes_date_column() {
    let cells = [Cell::text("2020-01-05"), Cell::text("2020-02-xx")];
    assert_eq!(
        infer_column_type(&cells),
        ColumnType::Inferred(InferredKind::String)
    );
}

#[test]
fn entirely_empty_column_is_labelled_empty() {
    let dir = TempDir::new().expect("temp dir");
    let input = input_file(&dir, "a,b\n1,\n2,NA\n");
    let loaded = load_typed_table(&input).expect("load");
    assert_eq!(
        loaded.types.get("b"),
        Some(ColumnType::Inferred(InferredKind::Empty))
    );
}

#[test]
fn header_only_file_has_zero_rows() {
    let dir = TempDir::new().expect("temp dir");
    let input = input_file(&dir, "a,b\n");
    let loaded = load_typed_table(&input).expect("load");
    assert_eq!(loaded.raw.height(), 0);
    assert_eq!(loaded.raw.width(), 2);
}

#[test]
fn ragged_input_is_a_parse_failure() {
    let dir = TempDir::new().expect("temp dir");
    let input = input_file(&dir, "a,b\n1,2\n3,4,5\n");
    let err = load_typed_table(&input).unwrap_err();
    assert!(matches!(err, IngestError::CsvParse { .. }), "{err:?}");
}

#[test]
fn non_ascii_delimiter_is_rejected_before_reading() {
    let dir = TempDir::new().expect("temp dir");
    let mut input = input_file(&dir, "a\n1\n");
    input.delimiter = '§';
    let err = load_typed_table(&input).unwrap_err();
    assert!(matches!(err, IngestError::Config(_)));
}

#[test]
fn impossible_date_in_sparse_column_still_loads() {
    let dir = TempDir::new().expect("temp dir");
    let mut contents = String::from("loan_amnt,settle_d\n5000,2019-02-30\n");
    for _ in 0..9 {
        contents.push_str("3000,\n");
    }
    let input = input_file(&dir, &contents);

    let loaded = load_typed_table(&input).expect("load");

    assert_eq!(loaded.types.get("settle_d"), Some(ColumnType::Date));
    let settle = loaded.typed.column_index("settle_d").unwrap();
    assert_eq!(loaded.typed.cell(0, settle), Some(&Cell::text("2019-02-30")));
}

#[test]
fn text_starting_with_a_date_is_not_truncated() {
    let dir = TempDir::new().expect("temp dir");
    let input = input_file(
        &dir,
        "term\n2019-01-01 plus 36 months\n2019-06-01 plus 60 months\n",
    );

    let loaded = load_typed_table(&input).expect("load");

    assert_eq!(loaded.types.get("term"), Some(ColumnType::Date));
    assert_eq!(
        loaded.typed.cell(1, 0),
        Some(&Cell::text("2019-06-01 plus 60 months"))
    );
}
