use addr_cli::batch::BatchReport;
use addr_model::{
    AddressRecord, AuditRow, FieldError, InternationalAddressRecord, ParseOutcome, ZipInfo,
};
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

pub fn print_outcomes(outcomes: &[ParseOutcome]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Input"),
        header_cell("Source"),
        header_cell("Valid"),
        header_cell("Address 1"),
        header_cell("Address 2"),
        header_cell("City"),
        header_cell("State"),
        header_cell("ZIP"),
        header_cell("Notes"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Center);
    for outcome in outcomes {
        let address = outcome.address();
        let international = outcome.international_address();
        let city = address
            .and_then(AddressRecord::place_name)
            .or_else(|| international.and_then(InternationalAddressRecord::city));
        table.add_row(vec![
            Cell::new(outcome.raw_input()),
            Cell::new(outcome.source()),
            valid_cell(outcome.is_valid()),
            optional_cell(address.and_then(AddressRecord::address1)),
            optional_cell(address.and_then(AddressRecord::address2)),
            optional_cell(city),
            optional_cell(address.and_then(AddressRecord::state_name)),
            optional_cell(address.and_then(AddressRecord::zip_full).as_deref()),
            notes_cell(outcome),
        ]);
    }
    println!("{table}");
}

pub fn print_audit(outcome: &ParseOutcome, rows: &[AuditRow]) {
    println!("Input: {}", outcome.raw_input());
    println!("Source: {}", outcome.source());
    println!("Valid: {}", if outcome.is_valid() { "yes" } else { "no" });
    if let Some(full) = outcome
        .address()
        .map(AddressRecord::full_address)
        .filter(|full| !full.is_empty())
    {
        println!("Normalized: {full}");
    }
    if rows.is_empty() {
        println!("No transformations recorded.");
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Log"),
        header_cell("Kind"),
        header_cell("Field"),
        header_cell("Original"),
        header_cell("New"),
        header_cell("Message"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    for (index, row) in rows.iter().enumerate() {
        let kind = if row.kind == "error" {
            Cell::new(row.kind).fg(Color::Red)
        } else {
            Cell::new(row.kind)
        };
        table.add_row(vec![
            dim_cell(index + 1),
            Cell::new(row.source.as_str()),
            kind,
            Cell::new(&row.field),
            Cell::new(&row.original),
            optional_cell(row.new_value.as_deref()),
            Cell::new(&row.message),
        ]);
    }
    println!("{table}");
}

pub fn print_zips(results: &[(String, Option<ZipInfo>)]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("ZIP"),
        header_cell("City"),
        header_cell("State"),
        header_cell("State name"),
        header_cell("County"),
    ]);
    apply_table_style(&mut table);
    for (zip, info) in results {
        match info {
            Some(info) => table.add_row(vec![
                Cell::new(&info.zip),
                Cell::new(&info.city),
                Cell::new(&info.state_id),
                Cell::new(&info.state_name),
                Cell::new(&info.county_name),
            ]),
            None => table.add_row(vec![
                Cell::new(zip),
                Cell::new("not found").fg(Color::Yellow),
                dim_cell("-"),
                dim_cell("-"),
                dim_cell("-"),
            ]),
        };
    }
    println!("{table}");
}

pub fn print_batch_report(report: &BatchReport) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Rows"),
        header_cell("Parsed"),
        header_cell("Failed"),
        header_cell("Blank"),
    ]);
    apply_table_style(&mut table);
    for index in 0..4 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    table.add_row(vec![
        Cell::new(report.rows).add_attribute(Attribute::Bold),
        count_cell(report.parsed, Color::Green),
        count_cell(report.failed, Color::Red),
        dim_cell(report.blank),
    ]);
    eprintln!("{table}");
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value.to_string()).fg(Color::DarkGrey)
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count == 0 {
        dim_cell(count)
    } else {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    }
}

fn valid_cell(valid: bool) -> Cell {
    if valid {
        Cell::new("yes").fg(Color::Green)
    } else {
        Cell::new("no").fg(Color::Red)
    }
}

fn optional_cell(value: Option<&str>) -> Cell {
    match value {
        Some(value) => Cell::new(value),
        None => dim_cell("-"),
    }
}

fn notes_cell(outcome: &ParseOutcome) -> Cell {
    if let Some(failure) = outcome.failure() {
        return Cell::new(failure).fg(Color::Red);
    }
    let messages: Vec<&str> = outcome
        .validation()
        .errors()
        .iter()
        .map(FieldError::message)
        .collect();
    if messages.is_empty() {
        dim_cell("-")
    } else {
        Cell::new(messages.join("; ")).fg(Color::Yellow)
    }
}
