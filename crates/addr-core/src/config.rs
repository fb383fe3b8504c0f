//! Service configuration, from code, a serde source or the environment.

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{Result, ServiceError};

pub const ENV_ZIP_DATASET: &str = "ADDRKIT_ZIP_DATASET";
pub const ENV_CHECK_STATE_MATCH: &str = "ADDRKIT_CHECK_STATE_MATCH";
pub const ENV_LIBPOSTAL_URL: &str = "ADDRKIT_LIBPOSTAL_URL";
pub const ENV_LIBPOSTAL_TIMEOUT_SECS: &str = "ADDRKIT_LIBPOSTAL_TIMEOUT_SECS";

const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Where ZIP reference data comes from.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DatasetConfig {
    /// The sample dataset compiled into the binary.
    #[default]
    Embedded,
    Csv { path: PathBuf },
}

impl DatasetConfig {
    /// Key of the data source registry entry that serves this dataset.
    pub fn registry_key(&self) -> &'static str {
        match self {
            Self::Embedded => "embedded",
            Self::Csv { .. } => "csv",
        }
    }
}

/// Remote international parser service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InternationalConfig {
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl InternationalConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    #[must_use]
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub dataset: DatasetConfig,
    /// Key into the parser registry for the domestic parser.
    pub parser: String,
    /// Treat a ZIP whose state differs from the record's state as invalid.
    pub check_state_match: bool,
    /// Run validators on every parse unless the call says otherwise.
    pub validate: bool,
    pub international: Option<InternationalConfig>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            dataset: DatasetConfig::Embedded,
            parser: "rules".to_string(),
            check_state_match: false,
            validate: true,
            international: None,
        }
    }
}

impl ServiceConfig {
    #[must_use]
    pub fn with_dataset_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.dataset = DatasetConfig::Csv { path: path.into() };
        self
    }

    #[must_use]
    pub fn with_parser(mut self, key: impl Into<String>) -> Self {
        self.parser = key.into();
        self
    }

    #[must_use]
    pub fn with_check_state_match(mut self, enabled: bool) -> Self {
        self.check_state_match = enabled;
        self
    }

    #[must_use]
    pub fn with_validate(mut self, enabled: bool) -> Self {
        self.validate = enabled;
        self
    }

    #[must_use]
    pub fn with_international(mut self, international: InternationalConfig) -> Self {
        self.international = Some(international);
        self
    }

    /// Defaults overridden by the `ADDRKIT_*` environment variables.
    ///
    /// # Errors
    ///
    /// When a variable holds a value that cannot be interpreted.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`ServiceConfig::from_env`], reading values through `lookup`.
    ///
    /// # Errors
    ///
    /// When a value cannot be interpreted.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut config = Self::default();

        if let Some(path) = value(ENV_ZIP_DATASET) {
            config = config.with_dataset_path(path);
        }
        if let Some(flag) = value(ENV_CHECK_STATE_MATCH) {
            config.check_state_match = parse_flag(ENV_CHECK_STATE_MATCH, &flag)?;
        }
        if let Some(url) = value(ENV_LIBPOSTAL_URL) {
            let mut international = InternationalConfig::new(url);
            if let Some(secs) = value(ENV_LIBPOSTAL_TIMEOUT_SECS) {
                international.timeout_secs = secs.parse().map_err(|_| ServiceError::Config {
                    key: ENV_LIBPOSTAL_TIMEOUT_SECS.to_string(),
                    message: format!("expected whole seconds, got `{secs}`"),
                })?;
            }
            config.international = Some(international);
        }
        Ok(config)
    }
}

fn parse_flag(key: &str, value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ServiceError::Config {
            key: key.to_string(),
            message: format!("expected a boolean, got `{value}`"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_gives_defaults() {
        let config = ServiceConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ServiceConfig::default());
        assert!(config.validate);
        assert!(!config.check_state_match);
    }

    #[test]
    fn environment_overrides() {
        let config = ServiceConfig::from_lookup(lookup(&[
            (ENV_ZIP_DATASET, "/data/uszips.csv"),
            (ENV_CHECK_STATE_MATCH, "yes"),
            (ENV_LIBPOSTAL_URL, "http://localhost:4400"),
            (ENV_LIBPOSTAL_TIMEOUT_SECS, "3"),
        ]))
        .unwrap();
        assert_eq!(
            config.dataset,
            DatasetConfig::Csv {
                path: PathBuf::from("/data/uszips.csv")
            }
        );
        assert!(config.check_state_match);
        let international = config.international.unwrap();
        assert_eq!(international.timeout(), Duration::from_secs(3));
    }

    #[test]
    fn bad_values_are_reported() {
        let err =
            ServiceConfig::from_lookup(lookup(&[(ENV_CHECK_STATE_MATCH, "maybe")])).unwrap_err();
        assert!(err.to_string().contains(ENV_CHECK_STATE_MATCH));
    }

    #[test]
    fn deserializes_with_defaults() {
        let json = r#"{
            "dataset": {"kind": "csv", "path": "zips.csv"},
            "international": {"base_url": "http://x"}
        }"#;
        let config: ServiceConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.dataset.registry_key(), "csv");
        assert_eq!(config.international.unwrap().timeout_secs, 10);
        assert_eq!(config.parser, "rules");
    }
}
