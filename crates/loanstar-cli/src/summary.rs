use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use crate::types::RunSummary;

pub fn print_summary(summary: &RunSummary) {
    println!("Input: {}", summary.input.display());
    match &summary.target {
        Some(target) => println!("Output: {target}"),
        None => println!("Output: (dry run, nothing written)"),
    }

    let mut table = Table::new();
    table.set_header(vec![header_cell("Stage"), header_cell("Rows"), header_cell("Columns")]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    table.add_row(vec![
        Cell::new("Original"),
        Cell::new(summary.original_rows),
        Cell::new(summary.original_columns),
    ]);
    table.add_row(vec![
        Cell::new("Clean"),
        Cell::new(summary.clean_rows),
        Cell::new(summary.clean_columns),
    ]);
    table.add_row(vec![
        Cell::new("Dropped"),
        count_cell(summary.original_rows - summary.clean_rows, Color::Yellow),
        count_cell(summary.dropped_columns, Color::Yellow),
    ]);
    println!("{table}");
    println!("{}", tables_table(summary));
}

/// One row per written table: dimensions, absent dimensions, then the fact table.
fn tables_table(summary: &RunSummary) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Table"),
        header_cell("Source column"),
        header_cell("Records"),
        header_cell("Loaded"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Center);
    for dimension in &summary.dimensions {
        table.add_row(vec![
            Cell::new(&dimension.table),
            Cell::new(&dimension.attribute),
            Cell::new(dimension.records),
            loaded_cell(summary, &dimension.table),
        ]);
    }
    for attribute in &summary.missing_dimensions {
        table.add_row(vec![
            dim_cell("-"),
            dim_cell(format!("{attribute} (not in clean data)")),
            dim_cell("-"),
            dim_cell("-"),
        ]);
    }
    table.add_row(vec![
        Cell::new(&summary.fact_table)
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        Cell::new(summary.fact_rows).add_attribute(Attribute::Bold),
        loaded_cell(summary, &summary.fact_table),
    ]);
    table
}

/// Condensed style used by `inspect`.
pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(100);
}

pub fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn loaded_cell(summary: &RunSummary, name: &str) -> Cell {
    if summary.loaded.iter().any(|table| table.name == name) {
        Cell::new("✓")
            .fg(Color::Green)
            .add_attribute(Attribute::Bold)
    } else {
        dim_cell("-")
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

pub fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
