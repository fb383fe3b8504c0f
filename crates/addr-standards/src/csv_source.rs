//! CSV-backed [`DataSource`].

use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::embedded;
use crate::error::{DataSourceError, Result};
use crate::source::{DataSource, ZipIndex};

#[derive(Debug, Clone)]
enum Origin {
    Path(PathBuf),
    Text { name: String, content: String },
    Embedded,
}

/// Loads a ZIP dataset from CSV on first query and keeps it for its lifetime.
///
/// A failed load is cached too, so every caller sees the same error.
#[derive(Debug)]
pub struct CsvDataSource {
    name: String,
    origin: Origin,
    index: OnceLock<Result<ZipIndex>>,
}

impl CsvDataSource {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            name: path.display().to_string(),
            origin: Origin::Path(path),
            index: OnceLock::new(),
        }
    }

    /// Dataset held in memory, e.g. a test fixture.
    pub fn from_csv_str(name: impl Into<String>, content: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            origin: Origin::Text {
                name: name.clone(),
                content: content.into(),
            },
            name,
            index: OnceLock::new(),
        }
    }

    /// The sample dataset compiled into the crate.
    pub fn embedded() -> Self {
        Self {
            name: embedded::ZIP_SAMPLE_NAME.to_string(),
            origin: Origin::Embedded,
            index: OnceLock::new(),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        match &self.origin {
            Origin::Path(path) => Some(path),
            Origin::Text { .. } | Origin::Embedded => None,
        }
    }

    fn read(&self) -> Result<ZipIndex> {
        let index = match &self.origin {
            Origin::Path(path) => {
                let file = File::open(path).map_err(|error| match error.kind() {
                    io::ErrorKind::NotFound => DataSourceError::NotFound { path: path.clone() },
                    _ => DataSourceError::Read {
                        dataset: self.name.clone(),
                        message: error.to_string(),
                    },
                })?;
                ZipIndex::from_reader(BufReader::new(file), &self.name)?
            }
            Origin::Text { name, content } => ZipIndex::from_reader(content.as_bytes(), name)?,
            Origin::Embedded => {
                ZipIndex::from_reader(embedded::ZIP_SAMPLE.as_bytes(), &self.name)?
            }
        };
        tracing::info!(
            dataset = %self.name,
            zips = index.len(),
            states = index.state_ids().len(),
            "loaded ZIP dataset"
        );
        Ok(index)
    }
}

impl DataSource for CsvDataSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn index(&self) -> Result<&ZipIndex> {
        self.index
            .get_or_init(|| {
                self.read().inspect_err(|error| {
                    tracing::error!(dataset = %self.name, %error, "failed to load ZIP dataset");
                })
            })
            .as_ref()
            .map_err(Clone::clone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_sample_loads() {
        let source = CsvDataSource::embedded();
        assert!(source.is_valid_zip("78749").unwrap());
        assert!(source.index().unwrap().len() > 20);
    }

    #[test]
    fn missing_file_is_reported_on_every_query() {
        let source = CsvDataSource::from_path("/nonexistent/uszips.csv");
        let first = source.is_valid_zip("78749").unwrap_err();
        let second = source.get_zip_info("78749").unwrap_err();
        assert!(matches!(first, DataSourceError::NotFound { .. }));
        assert_eq!(first, second);
    }
}
