//! Row-wise parsing of a polars `DataFrame` column.

use addr_model::{OUTPUT_COLUMNS, empty_map};
use polars::prelude::*;

use crate::error::TableError;
use crate::service::{AddressService, ErrorMode, outcome_map};

/// Which parse each row goes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableRoute {
    #[default]
    Domestic,
    /// The fallback policy.
    Auto,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TableOptions {
    /// Prepended to every output column name.
    pub prefix: String,
    pub errors: ErrorMode,
    pub route: TableRoute,
}

impl TableOptions {
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    #[must_use]
    pub fn with_errors(mut self, errors: ErrorMode) -> Self {
        self.errors = errors;
        self
    }

    #[must_use]
    pub fn with_route(mut self, route: TableRoute) -> Self {
        self.route = route;
        self
    }
}

/// Parses every cell of `column` and returns `df` with one string column
/// per output field appended.
///
/// Null and blank cells give null outputs. Rows that fail to parse give null
/// outputs under [`ErrorMode::Coerce`] and stop the whole call under
/// [`ErrorMode::Raise`].
///
/// # Errors
///
/// A missing column, a failing row under [`ErrorMode::Raise`], a dataset
/// failure, or a polars error while assembling the result.
pub fn parse_dataframe(
    service: &AddressService,
    df: &DataFrame,
    column: &str,
    options: &TableOptions,
) -> Result<DataFrame, TableError> {
    let source = df.column(column).map_err(|_| TableError::MissingColumn {
        column: column.to_string(),
    })?;
    let cells = source.cast(&DataType::String)?;
    let cells = cells.str()?;

    let mut outputs: Vec<Vec<Option<String>>> =
        vec![Vec::with_capacity(df.height()); OUTPUT_COLUMNS.len()];
    for (row, cell) in cells.iter().enumerate() {
        let map = match cell.map(str::trim).filter(|text| !text.is_empty()) {
            None => empty_map(),
            Some(text) => {
                let parsed = match options.route {
                    TableRoute::Domestic => service.parse(text, service.default_options()),
                    TableRoute::Auto => service.parse_auto(text),
                };
                parsed
                    .and_then(|outcome| outcome_map(&outcome, options.errors))
                    .map_err(|source| TableError::Row { row, source })?
            }
        };
        for (name, values) in OUTPUT_COLUMNS.iter().zip(outputs.iter_mut()) {
            values.push(map.get(*name).cloned().flatten());
        }
    }

    let mut result = df.clone();
    for (name, values) in OUTPUT_COLUMNS.iter().zip(outputs) {
        let series = Series::new(format!("{}{name}", options.prefix).into(), values);
        result.with_column(series)?;
    }
    tracing::debug!(rows = df.height(), column, "parsed address column");
    Ok(result)
}
