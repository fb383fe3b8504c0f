//! The data source contract and the in-memory ZIP index behind it.

use std::collections::{BTreeSet, HashMap};
use std::io::Read;

use addr_model::ZipInfo;
use serde::Deserialize;

use crate::error::{DataSourceError, LookupError, Result, StateError};
use crate::states;

/// Columns every ZIP dataset must provide.
pub const REQUIRED_COLUMNS: [&str; 4] = ["zip", "city", "state_id", "county_name"];

/// Canonical five digit lookup key: drops a `-NNNN` suffix and restores
/// leading zeros. `None` for anything that is not a ZIP.
pub fn clean_zip(zip: &str) -> Option<String> {
    let head = zip.split('-').next().unwrap_or_default().trim();
    if head.is_empty() || head.len() > 5 || !head.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(format!("{head:0>5}"))
}

#[derive(Debug, Deserialize)]
struct ZipRow {
    zip: String,
    city: String,
    state_id: String,
    #[serde(default)]
    state_name: Option<String>,
    county_name: String,
}

/// ZIP code to [`ZipInfo`] index with unique keys.
#[derive(Debug, Clone, Default)]
pub struct ZipIndex {
    by_zip: HashMap<String, ZipInfo>,
    state_ids: BTreeSet<String>,
}

impl ZipIndex {
    /// Reads a headed CSV dataset. Extra columns are ignored.
    ///
    /// # Errors
    ///
    /// Fails on a missing required column, an unreadable row, a malformed ZIP
    /// or a ZIP that appears twice.
    pub fn from_reader<R: Read>(reader: R, dataset: &str) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = reader.headers().map_err(|error| DataSourceError::Read {
            dataset: dataset.to_string(),
            message: error.to_string(),
        })?;
        for column in REQUIRED_COLUMNS {
            if !headers.iter().any(|header| header == column) {
                return Err(DataSourceError::MissingColumn {
                    dataset: dataset.to_string(),
                    column,
                });
            }
        }

        let mut index = Self::default();
        for (position, row) in reader.deserialize::<ZipRow>().enumerate() {
            // Header is line 1.
            let line = position as u64 + 2;
            let row = row.map_err(|error| DataSourceError::InvalidRow {
                dataset: dataset.to_string(),
                line,
                message: error.to_string(),
            })?;
            let Some(zip) = clean_zip(&row.zip) else {
                return Err(DataSourceError::InvalidRow {
                    dataset: dataset.to_string(),
                    line,
                    message: format!("malformed ZIP code `{}`", row.zip),
                });
            };
            if index.by_zip.contains_key(&zip) {
                return Err(DataSourceError::DuplicateZip {
                    dataset: dataset.to_string(),
                    zip,
                    line,
                });
            }

            let state_id = row.state_id.to_uppercase();
            let state_name = row
                .state_name
                .filter(|name| !name.is_empty())
                .or_else(|| states::name_for_abbreviation(&state_id).map(str::to_string))
                .unwrap_or_default();
            index.state_ids.insert(state_id.clone());
            index.by_zip.insert(
                zip.clone(),
                ZipInfo {
                    zip,
                    city: row.city,
                    state_id,
                    state_name,
                    county_name: row.county_name,
                },
            );
        }
        Ok(index)
    }

    pub fn get(&self, zip: &str) -> Option<&ZipInfo> {
        self.by_zip.get(zip)
    }

    pub fn contains(&self, zip: &str) -> bool {
        self.by_zip.contains_key(zip)
    }

    pub fn len(&self) -> usize {
        self.by_zip.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_zip.is_empty()
    }

    /// State abbreviations seen in the dataset.
    pub fn state_ids(&self) -> &BTreeSet<String> {
        &self.state_ids
    }

    pub fn zips(&self) -> impl Iterator<Item = &str> {
        self.by_zip.keys().map(String::as_str)
    }
}

/// Read-only reference data shared by validators and lookups.
///
/// Implementations load at most once and must be safe to query from several
/// threads. Lookups on missing data answer `None`/`false`; only a broken
/// dataset produces an error.
pub trait DataSource: Send + Sync {
    fn name(&self) -> &str;

    /// The loaded index, loading it on first use.
    ///
    /// # Errors
    ///
    /// Returns the load failure, on this and every later call.
    fn index(&self) -> Result<&ZipIndex>;

    /// Forces the dataset to load.
    ///
    /// # Errors
    ///
    /// See [`DataSource::index`].
    fn load(&self) -> Result<()> {
        self.index().map(|_| ())
    }

    fn get_zip_info(&self, zip: &str) -> Result<Option<ZipInfo>> {
        let Some(key) = clean_zip(zip) else {
            return Ok(None);
        };
        Ok(self.index()?.get(&key).cloned())
    }

    fn is_valid_zip(&self, zip: &str) -> Result<bool> {
        let Some(key) = clean_zip(zip) else {
            return Ok(false);
        };
        Ok(self.index()?.contains(&key))
    }

    /// Accepts an abbreviation or a full name.
    fn is_valid_state(&self, state: &str) -> Result<bool> {
        let index = self.index()?;
        let trimmed = state.trim();
        Ok(states::normalize_state(trimmed).is_ok()
            || index.state_ids().contains(&trimmed.to_uppercase()))
    }

    /// Upper-case abbreviation for an abbreviation or full name.
    ///
    /// # Errors
    ///
    /// [`LookupError::State`] for an unknown state, or the load failure.
    fn normalize_state(&self, state: &str) -> std::result::Result<String, LookupError> {
        let index = self.index()?;
        if let Ok(abbrev) = states::normalize_state(state) {
            return Ok(abbrev.to_string());
        }
        let upper = state.trim().to_uppercase();
        if index.state_ids().contains(&upper) {
            return Ok(upper);
        }
        Err(StateError::Unrecognized {
            value: state.to_string(),
        }
        .into())
    }

    /// Abbreviations from the state tables plus any extra ones in the dataset.
    fn valid_state_abbrevs(&self) -> Result<BTreeSet<String>> {
        let index = self.index()?;
        Ok(states::abbreviations()
            .map(str::to_string)
            .chain(index.state_ids().iter().cloned())
            .collect())
    }

    /// `(city, state_id)` for a ZIP.
    fn city_state_from_zip(&self, zip: &str) -> Result<Option<(String, String)>> {
        Ok(self
            .get_zip_info(zip)?
            .map(|info| (info.city, info.state_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_zip_handles_extensions_and_lost_zeros() {
        assert_eq!(clean_zip("78749-1234").as_deref(), Some("78749"));
        assert_eq!(clean_zip("601").as_deref(), Some("00601"));
        assert_eq!(clean_zip(" 02108 ").as_deref(), Some("02108"));
        assert_eq!(clean_zip("787491234"), None);
        assert_eq!(clean_zip("ABCDE"), None);
        assert_eq!(clean_zip(""), None);
    }

    #[test]
    fn index_fills_missing_state_names() {
        let csv = "zip,city,state_id,county_name\n601,Adjuntas,pr,Adjuntas\n";
        let index = ZipIndex::from_reader(csv.as_bytes(), "fixture").unwrap();
        let info = index.get("00601").unwrap();
        assert_eq!(info.state_id, "PR");
        assert_eq!(info.state_name, "Puerto Rico");
    }

    #[test]
    fn index_rejects_duplicates() {
        let csv = "zip,city,state_id,county_name\n78749,Austin,TX,Travis\n78749,Austin,TX,Travis\n";
        let error = ZipIndex::from_reader(csv.as_bytes(), "fixture").unwrap_err();
        assert_eq!(
            error,
            DataSourceError::DuplicateZip {
                dataset: "fixture".to_string(),
                zip: "78749".to_string(),
                line: 3,
            }
        );
    }

    #[test]
    fn index_rejects_missing_columns() {
        let csv = "zip,city,state_id\n78749,Austin,TX\n";
        let error = ZipIndex::from_reader(csv.as_bytes(), "fixture").unwrap_err();
        assert!(matches!(
            error,
            DataSourceError::MissingColumn {
                column: "county_name",
                ..
            }
        ));
    }
}
