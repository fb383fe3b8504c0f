//! Reference data for US addresses: state and territory tables plus the ZIP
//! dataset used by validators and lookups.

pub mod countries;
pub mod csv_source;
pub mod embedded;
pub mod error;
pub mod source;
pub mod states;

pub use csv_source::CsvDataSource;
pub use error::{DataSourceError, LookupError, Result, StateError};
pub use source::{DataSource, ZipIndex, clean_zip};
