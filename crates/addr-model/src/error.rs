use thiserror::Error;

use crate::verdict::FieldError;

/// Errors raised while constructing or strictly validating address records.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum AddressError {
    #[error("invalid ZIP code `{value}`: {reason}")]
    InvalidZip { value: String, reason: String },

    #[error("unknown address field `{name}`")]
    UnknownField { name: String },

    #[error("missing required address components: {}", .missing.join(", "))]
    MissingComponents { missing: Vec<String> },

    #[error("address failed validation: {}", summarize(.errors))]
    Validation { errors: Vec<FieldError> },
}

fn summarize(errors: &[FieldError]) -> String {
    if errors.is_empty() {
        return "no details".to_string();
    }
    errors
        .iter()
        .map(|error| format!("{}: {}", error.field(), error.message()))
        .collect::<Vec<_>>()
        .join("; ")
}

pub type Result<T> = std::result::Result<T, AddressError>;
