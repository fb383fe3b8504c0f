//! Validators that check parsed records against the ZIP reference dataset.
//!
//! Invalid input never produces an `Err`: it is reported through the
//! [`ValidationVerdict`](addr_model::ValidationVerdict). Only a broken dataset
//! surfaces as [`ValidatorError`].

pub mod composite;
pub mod error;
pub mod state;
pub mod validator;
pub mod zip;

pub use composite::{CompositeValidator, default_validators};
pub use error::{Result, ValidatorError};
pub use state::StateValidator;
pub use validator::Validator;
pub use zip::ZipValidator;
