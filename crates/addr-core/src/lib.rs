//! Address normalization service.
//!
//! [`AddressService`] sequences parsing, tracked normalization and validation
//! for one input at a time, and routes inputs between the domestic and
//! international parsers through the [`FallbackPolicy`]. Parsers and data
//! sources are created from a [`ServiceContext`] holding string-keyed
//! registries, so callers can plug in their own.

pub mod config;
pub mod context;
pub mod error;
pub mod heuristics;
pub mod policy;
pub mod registry;
pub mod service;
pub mod table;

pub use config::{DatasetConfig, InternationalConfig, ServiceConfig};
pub use context::ServiceContext;
pub use error::{RegistryError, Result, ServiceError, TableError};
pub use heuristics::is_probably_international;
pub use policy::{FallbackPolicy, RouteState, RouteSteps, RouteTrace};
pub use registry::Registry;
pub use service::{AddressService, ErrorMode, ParseOptions, outcome_map};
pub use table::{TableOptions, TableRoute, parse_dataframe};
