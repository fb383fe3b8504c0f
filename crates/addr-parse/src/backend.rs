//! Contracts for the parser backends wrapped by the adapters.

use crate::error::BackendError;

/// A piece of input text and the component label a backend gave it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabeledToken {
    pub text: String,
    pub label: String,
}

impl LabeledToken {
    pub fn new(text: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            label: label.into(),
        }
    }
}

/// Labels US addresses with [`addr_model::AddressField`] names.
pub trait DomesticBackend: Send + Sync {
    fn name(&self) -> &str;

    /// Tokens in input order. May be empty or partial.
    ///
    /// # Errors
    ///
    /// When the backend cannot process the input at all.
    fn tag(&self, input: &str) -> Result<Vec<LabeledToken>, BackendError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Availability {
    Available,
    Unavailable { reason: String },
}

impl Availability {
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available)
    }
}

/// Labels addresses from any country (`road`, `city`, `postcode`, ...).
pub trait InternationalBackend: Send + Sync {
    fn name(&self) -> &str;

    /// Whether the backend is installed or configured in this environment.
    fn availability(&self) -> Availability;

    /// # Errors
    ///
    /// [`BackendError::Unavailable`] or [`BackendError::Timeout`] when the
    /// backend cannot be reached, [`BackendError::NoMatch`] when it finds
    /// nothing.
    fn parse(&self, input: &str) -> Result<Vec<LabeledToken>, BackendError>;
}

/// Stand-in used when no international backend is configured.
#[derive(Debug, Clone, Default)]
pub struct UnavailableBackend;

impl InternationalBackend for UnavailableBackend {
    fn name(&self) -> &str {
        "none"
    }

    fn availability(&self) -> Availability {
        Availability::Unavailable {
            reason: "no international backend configured".to_string(),
        }
    }

    fn parse(&self, _input: &str) -> Result<Vec<LabeledToken>, BackendError> {
        Err(BackendError::Unavailable {
            reason: "no international backend configured".to_string(),
        })
    }
}
