use std::sync::Arc;

use addr_core::{AddressService, ErrorMode, TableError, TableOptions, parse_dataframe};
use addr_standards::CsvDataSource;
use polars::prelude::*;

fn frame() -> DataFrame {
    DataFrame::new(vec![
        Series::new("id".into(), &[1i64, 2, 3, 4]).into(),
        Series::new(
            "address".into(),
            &[
                Some("123 Main St, Austin TX 78749"),
                None,
                Some("zzz"),
                Some("456 Oak Ave, Dallas TX 75201"),
            ],
        )
        .into(),
    ])
    .unwrap()
}

fn strings(df: &DataFrame, column: &str) -> Vec<Option<String>> {
    df.column(column)
        .unwrap()
        .str()
        .unwrap()
        .iter()
        .map(|value| value.map(str::to_string))
        .collect()
}

#[test]
fn coerce_mode_nulls_failed_rows() {
    let service = AddressService::new(Arc::new(CsvDataSource::embedded()));
    let options = TableOptions::default().with_prefix("addr_");
    let result = parse_dataframe(&service, &frame(), "address", &options).unwrap();

    assert_eq!(result.height(), 4);
    assert_eq!(
        strings(&result, "addr_PlaceName"),
        [
            Some("Austin".to_string()),
            None,
            None,
            Some("Dallas".to_string())
        ]
    );
    assert_eq!(
        strings(&result, "addr_Address1")[0].as_deref(),
        Some("123 Main St")
    );
    // Input columns are kept.
    assert!(result.column("id").is_ok());
}

#[test]
fn raise_mode_reports_the_row() {
    let service = AddressService::new(Arc::new(CsvDataSource::embedded()));
    let options = TableOptions::default().with_errors(ErrorMode::Raise);
    let err = parse_dataframe(&service, &frame(), "address", &options).unwrap_err();
    assert!(matches!(err, TableError::Row { row: 2, .. }));
}

#[test]
fn missing_column() {
    let service = AddressService::new(Arc::new(CsvDataSource::embedded()));
    let err = parse_dataframe(&service, &frame(), "street", &TableOptions::default()).unwrap_err();
    assert!(matches!(err, TableError::MissingColumn { .. }));
}
