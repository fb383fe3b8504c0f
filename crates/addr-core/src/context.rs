use std::sync::Arc;

use addr_parse::{AddressParser, DomesticParser};
use addr_standards::{CsvDataSource, DataSource};

use crate::config::DatasetConfig;
use crate::error::ServiceError;
use crate::registry::Registry;

/// Registries the service is assembled from.
///
/// Owned by the caller and passed to
/// [`AddressService::from_context`](crate::AddressService::from_context);
/// there is no process-wide registry.
#[derive(Debug)]
pub struct ServiceContext {
    parsers: Registry<Box<dyn AddressParser>>,
    data_sources: Registry<Arc<dyn DataSource>>,
}

impl Default for ServiceContext {
    /// Parser `rules`; data sources `embedded` and `csv`.
    fn default() -> Self {
        let mut context = Self::empty();
        context.register_defaults();
        context
    }
}

impl ServiceContext {
    pub fn empty() -> Self {
        Self {
            parsers: Registry::new("parser"),
            data_sources: Registry::new("data source"),
        }
    }

    fn register_defaults(&mut self) {
        let results = [
            self.parsers.register("rules", |_| {
                Ok(Box::new(DomesticParser::new()) as Box<dyn AddressParser>)
            }),
            self.data_sources.register("embedded", |_| {
                Ok(Arc::new(CsvDataSource::embedded()) as Arc<dyn DataSource>)
            }),
            self.data_sources.register("csv", |config| match &config.dataset {
                DatasetConfig::Csv { path } => {
                    Ok(Arc::new(CsvDataSource::from_path(path.clone())) as Arc<dyn DataSource>)
                }
                DatasetConfig::Embedded => Err(ServiceError::Config {
                    key: "dataset".to_string(),
                    message: "the csv data source needs a dataset path".to_string(),
                }),
            }),
        ];
        for error in results.into_iter().filter_map(Result::err) {
            tracing::warn!(%error, "default component not registered");
        }
    }

    pub fn parsers(&self) -> &Registry<Box<dyn AddressParser>> {
        &self.parsers
    }

    pub fn parsers_mut(&mut self) -> &mut Registry<Box<dyn AddressParser>> {
        &mut self.parsers
    }

    pub fn data_sources(&self) -> &Registry<Arc<dyn DataSource>> {
        &self.data_sources
    }

    pub fn data_sources_mut(&mut self) -> &mut Registry<Arc<dyn DataSource>> {
        &mut self.data_sources
    }
}
