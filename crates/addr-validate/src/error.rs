use addr_standards::DataSourceError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ValidatorError {
    #[error("reference data unavailable: {0}")]
    DataSource(#[from] DataSourceError),
}

pub type Result<T> = std::result::Result<T, ValidatorError>;
