use std::fmt::Write as _;
use std::fs;

use addr_cli::batch::{CHUNK_ROWS, process_table, read_table, write_table};
use addr_core::{AddressService, ErrorMode, ServiceConfig, TableError, TableOptions};
use indicatif::ProgressBar;
use tempfile::TempDir;

const VALID: &str = "\"123 Main St, Austin TX 78749\"";

fn service() -> AddressService {
    AddressService::from_config(&ServiceConfig::default()).unwrap()
}

/// CSV with `rows` data rows; `cell` picks each address cell.
fn write_csv(
    dir: &TempDir,
    rows: usize,
    cell: impl Fn(usize) -> &'static str,
) -> std::path::PathBuf {
    let mut text = String::from("id,address\n");
    for row in 0..rows {
        writeln!(text, "{row},{}", cell(row)).unwrap();
    }
    let path = dir.path().join("input.csv");
    fs::write(&path, text).unwrap();
    path
}

#[test]
fn report_counts_span_chunks() {
    let dir = TempDir::new().unwrap();
    let rows = CHUNK_ROWS + 44;
    let path = write_csv(&dir, rows, |row| match row % 10 {
        3 => "",
        7 => "zzz",
        _ => VALID,
    });

    let df = read_table(&path).unwrap();
    let options = TableOptions::default().with_prefix("addr_");
    let (result, report) =
        process_table(&service(), &df, "address", &options, &ProgressBar::hidden()).unwrap();

    assert_eq!(result.height(), rows);
    assert_eq!(report.rows, rows);
    assert_eq!(report.blank, rows / 10);
    assert_eq!(report.failed, rows / 10);
    assert_eq!(report.parsed, rows - report.blank - report.failed);
    assert!(result.column("addr_ZipCode5").is_ok());
    assert!(result.column("id").is_ok());
}

#[test]
fn raise_mode_reports_the_table_row() {
    let dir = TempDir::new().unwrap();
    let failing = CHUNK_ROWS + 14;
    let path = write_csv(&dir, CHUNK_ROWS + 20, |row| {
        if row == failing { "zzz" } else { VALID }
    });

    let df = read_table(&path).unwrap();
    let options = TableOptions::default().with_errors(ErrorMode::Raise);
    let error = process_table(&service(), &df, "address", &options, &ProgressBar::hidden())
        .unwrap_err();
    match error {
        TableError::Row { row, .. } => assert_eq!(row, failing),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn missing_column_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(&dir, 3, |_| VALID);
    let df = read_table(&path).unwrap();
    let error = process_table(
        &service(),
        &df,
        "street",
        &TableOptions::default(),
        &ProgressBar::hidden(),
    )
    .unwrap_err();
    assert!(matches!(error, TableError::MissingColumn { column } if column == "street"));
}

#[test]
fn output_file_has_added_columns() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(&dir, 5, |_| VALID);
    let df = read_table(&path).unwrap();
    let options = TableOptions::default().with_prefix("out_");
    let (mut result, _) =
        process_table(&service(), &df, "address", &options, &ProgressBar::hidden()).unwrap();

    let output = dir.path().join("output.csv");
    write_table(&mut result, Some(&output)).unwrap();

    let written = fs::read_to_string(&output).unwrap();
    let header = written.lines().next().unwrap();
    assert!(header.starts_with("id,address,out_"));
    assert!(header.contains("out_FullAddress"));
    assert_eq!(written.lines().count(), 6);
    assert!(written.contains("Austin"));
}

#[test]
fn missing_input_file_names_the_path() {
    let dir = TempDir::new().unwrap();
    let error = read_table(&dir.path().join("nope.csv")).unwrap_err();
    assert!(format!("{error:#}").contains("nope.csv"));
}
