//! CSV batch processing for the `batch` command.

use std::fs::File;
use std::io::{self, IsTerminal};
use std::path::Path;

use addr_core::{AddressService, TableError, TableOptions, parse_dataframe};
use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use polars::prelude::*;

/// Rows handed to the service per progress tick.
pub const CHUNK_ROWS: usize = 256;

/// Row counts for one processed table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub rows: usize,
    /// Null or whitespace-only input cells.
    pub blank: usize,
    pub parsed: usize,
    pub failed: usize,
}

pub fn read_table(path: &Path) -> Result<DataFrame> {
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(100))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .and_then(|reader| reader.finish())
        .with_context(|| format!("read {}", path.display()))
}

/// Writes `df` as CSV to `output`, or to stdout when no path is given.
pub fn write_table(df: &mut DataFrame, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            let mut file =
                File::create(path).with_context(|| format!("create {}", path.display()))?;
            CsvWriter::new(&mut file)
                .include_header(true)
                .finish(df)
                .with_context(|| format!("write {}", path.display()))
        }
        None => CsvWriter::new(io::stdout().lock())
            .include_header(true)
            .finish(df)
            .context("write CSV to stdout"),
    }
}

/// A bar over `rows`, hidden when stderr is not a terminal.
pub fn progress_bar(rows: usize) -> ProgressBar {
    if !io::stderr().is_terminal() {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(rows as u64);
    if let Ok(style) =
        ProgressStyle::default_bar().template("{spinner} [{bar:40}] {pos}/{len} rows ({eta})")
    {
        bar.set_style(style);
    }
    bar
}

/// Parses `column` chunk by chunk, advancing `progress` as rows complete.
///
/// Row indices in errors refer to the whole table.
pub fn process_table(
    service: &AddressService,
    df: &DataFrame,
    column: &str,
    options: &TableOptions,
    progress: &ProgressBar,
) -> Result<(DataFrame, BatchReport), TableError> {
    let height = df.height();
    if height == 0 {
        let result = parse_dataframe(service, df, column, options)?;
        return Ok((result, BatchReport::default()));
    }

    let mut combined: Option<DataFrame> = None;
    for offset in (0..height).step_by(CHUNK_ROWS) {
        let chunk = df.slice(offset as i64, CHUNK_ROWS);
        let parsed =
            parse_dataframe(service, &chunk, column, options).map_err(|error| match error {
                TableError::Row { row, source } => TableError::Row {
                    row: row + offset,
                    source,
                },
                other => other,
            })?;
        match combined.as_mut() {
            Some(acc) => {
                acc.vstack_mut(&parsed)?;
            }
            None => combined = Some(parsed),
        }
        progress.inc(chunk.height() as u64);
    }
    progress.finish_and_clear();

    let result = combined.unwrap_or_default();
    let report = summarize(&result, column, &options.prefix)?;
    tracing::info!(
        rows = report.rows,
        parsed = report.parsed,
        failed = report.failed,
        "batch complete"
    );
    Ok((result, report))
}

fn summarize(df: &DataFrame, column: &str, prefix: &str) -> Result<BatchReport, TableError> {
    let inputs = df.column(column)?.cast(&DataType::String)?;
    let inputs = inputs.str()?;
    let full = df.column(&format!("{prefix}FullAddress"))?;
    let full = full.str()?;

    let mut report = BatchReport {
        rows: df.height(),
        ..BatchReport::default()
    };
    for (input, output) in inputs.iter().zip(full.iter()) {
        match (input.map(str::trim).filter(|text| !text.is_empty()), output) {
            (None, _) => report.blank += 1,
            (Some(_), Some(_)) => report.parsed += 1,
            (Some(_), None) => report.failed += 1,
        }
    }
    Ok(report)
}
