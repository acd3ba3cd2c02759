//! End-to-end star-schema builds over in-memory loan tables.

use loanstar_model::{Cell, PipelineConfig, Table};
use loanstar_transform::{TransformError, build_star_schema, verify_referential_integrity};

fn render(table: &Table) -> String {
    let mut lines = vec![table.columns().join(",")];
    for row in table.rows() {
        let cells: Vec<String> = row.iter().map(ToString::to_string).collect();
        lines.push(cells.join(","));
    }
    lines.join("\n")
}

/// The two-row extract as it comes out of loading: percentages and months are text.
fn two_loans() -> Table {
    Table::from_rows(
        [
            "home_ownership",
            "loan_status",
            "issue_d",
            "int_rate",
            "loan_amnt",
            "funded_amnt",
            "term",
            "installment",
            "application_type",
        ]
        .iter()
        .map(ToString::to_string)
        .collect(),
        vec![
            vec![
                Cell::text("RENT"),
                Cell::text("Current"),
                Cell::text("Jan-2019"),
                Cell::text("10%"),
                Cell::Int(5000),
                Cell::Int(5000),
                Cell::text("36 months"),
                Cell::Int(150),
                Cell::text("Individual"),
            ],
            vec![
                Cell::text("OWN"),
                Cell::text("Current"),
                Cell::text("Feb-2019"),
                Cell::text("5%"),
                Cell::Int(3000),
                Cell::Int(3000),
                Cell::text("36 months"),
                Cell::Int(90),
                Cell::text("Individual"),
            ],
        ],
    )
    .unwrap()
}

#[test]
fn two_loan_scenario() {
    let run = build_star_schema(&two_loans(), &PipelineConfig::default()).unwrap();

    assert_eq!(run.filter.rows_dropped, 0);
    assert!(run.dimensions.missing.is_empty());

    let home = run.star.dimension("home_ownership").unwrap().to_table().unwrap();
    insta::assert_snapshot!(render(&home), @r"
    home_ownership,home_ownership_id
    RENT,0
    OWN,1
    ");

    let issued = run.star.dimension("issue_d").unwrap().to_table().unwrap();
    insta::assert_snapshot!(render(&issued), @r"
    issue_d,month,year,issue_d_id
    2019-01-01,1,2019,0
    2019-02-01,2,2019,1
    ");

    let fact = run.star.fact.table();
    let rate = fact.column_index("int_rate").unwrap();
    assert_eq!(fact.cell(0, rate), Some(&Cell::Float(0.10)));
    assert_eq!(fact.cell(1, rate), Some(&Cell::Float(0.05)));
    insta::assert_snapshot!(render(fact), @r"
    application_type,loan_amnt,funded_amnt,term,int_rate,installment,home_ownership_id,loan_status_id,issue_d_id
    Individual,5000,5000,36 months,0.1,150,0,0,0
    Individual,3000,3000,36 months,0.05,90,1,0,1
    ");

    verify_referential_integrity(&run.star).unwrap();
}

#[test]
fn repeated_runs_are_identical() {
    let config = PipelineConfig::default();
    let first = build_star_schema(&two_loans(), &config).unwrap();
    let second = build_star_schema(&two_loans(), &config).unwrap();
    assert_eq!(first.star, second.star);
}

#[test]
fn sparse_dimension_column_is_reported_missing() {
    let mut table = two_loans();
    let mut rows: Vec<Vec<Cell>> = table.rows().to_vec();
    // loan_status half missing: dropped by the percentage stage
    rows[1][1] = Cell::Missing;
    table = Table::from_rows(table.columns().to_vec(), rows).unwrap();

    let run = build_star_schema(&table, &PipelineConfig::default()).unwrap();
    assert_eq!(run.dimensions.missing, vec!["loan_status"]);
    assert_eq!(run.filter.dropped_by_percentage[0].column, "loan_status");
    assert!(!run.star.fact.table().has_column("loan_status_id"));
    assert_eq!(run.star.fact.height(), 2);
}

#[test]
fn bad_issue_month_stops_the_build() {
    let table = two_loans();
    let mut rows: Vec<Vec<Cell>> = table.rows().to_vec();
    rows[1][2] = Cell::text("2019/02");
    let table = Table::from_rows(table.columns().to_vec(), rows).unwrap();

    let err = build_star_schema(&table, &PipelineConfig::default()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "rule 'month-year-date' failed on column 'issue_d' row 1: '2019/02'"
    );
    assert!(matches!(err, TransformError::InvalidValue { row: 1, .. }));
}

#[test]
fn mixed_int_rate_column_ends_up_in_one_unit() {
    let table = two_loans();
    let mut rows: Vec<Vec<Cell>> = table.rows().to_vec();
    rows[1][3] = Cell::Int(5);
    let table = Table::from_rows(table.columns().to_vec(), rows).unwrap();

    let run = build_star_schema(&table, &PipelineConfig::default()).unwrap();

    let fact = run.star.fact.table();
    let rate = fact.column_index("int_rate").unwrap();
    let rates: Vec<&Cell> = fact.column_cells(rate).collect();
    assert_eq!(rates, [&Cell::Float(0.10), &Cell::Float(0.05)]);
}

#[test]
fn date_like_text_passes_through_to_the_fact() {
    let table = two_loans();
    let mut rows: Vec<Vec<Cell>> = table.rows().to_vec();
    rows[0][6] = Cell::text("2019-01-01 plus 36 months");
    let table = Table::from_rows(table.columns().to_vec(), rows).unwrap();

    let run = build_star_schema(&table, &PipelineConfig::default()).unwrap();

    let fact = run.star.fact.table();
    let term = fact.column_index("term").unwrap();
    assert_eq!(fact.cell(0, term), Some(&Cell::text("2019-01-01 plus 36 months")));
}
