use serde::{Deserialize, Serialize};

/// One field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    field: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<String>,
}

impl FieldError {
    pub fn new(
        field: impl Into<String>,
        message: impl Into<String>,
        value: Option<String>,
    ) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            value,
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }
}

/// Pass/fail result of one validation pass, with its field errors in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationVerdict {
    is_valid: bool,
    errors: Vec<FieldError>,
}

impl Default for ValidationVerdict {
    fn default() -> Self {
        Self::valid()
    }
}

impl ValidationVerdict {
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
        }
    }

    /// An invalid verdict. `errors` may be empty when nothing could be checked.
    pub fn invalid(errors: Vec<FieldError>) -> Self {
        Self {
            is_valid: false,
            errors,
        }
    }

    /// Valid exactly when `errors` is empty.
    pub fn from_errors(errors: Vec<FieldError>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }

    /// Valid only if every verdict is valid; errors are concatenated in order.
    pub fn merge_all<I>(verdicts: I) -> Self
    where
        I: IntoIterator<Item = ValidationVerdict>,
    {
        let mut merged = Self::valid();
        for verdict in verdicts {
            merged.is_valid &= verdict.is_valid;
            merged.errors.extend(verdict.errors);
        }
        merged
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<FieldError> {
        self.errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_requires_all_valid_and_keeps_order() {
        let merged = ValidationVerdict::merge_all([
            ValidationVerdict::from_errors(vec![FieldError::new("ZipCode", "bad zip", None)]),
            ValidationVerdict::valid(),
            ValidationVerdict::from_errors(vec![FieldError::new("StateName", "bad state", None)]),
        ]);
        assert!(!merged.is_valid());
        let fields: Vec<_> = merged.errors().iter().map(FieldError::field).collect();
        assert_eq!(fields, ["ZipCode", "StateName"]);
    }

    #[test]
    fn empty_merge_is_valid() {
        assert!(ValidationVerdict::merge_all(Vec::new()).is_valid());
    }
}
