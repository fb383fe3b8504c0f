use std::sync::Arc;

use addr_model::{AddressField, AddressRecord, FieldError, ValidationVerdict};
use addr_standards::{DataSource, states};

use crate::error::Result;
use crate::validator::Validator;

/// Checks the record's ZIP against the dataset and, when enabled, that the ZIP
/// lies in the record's state.
pub struct ZipValidator {
    source: Arc<dyn DataSource>,
    check_state_match: bool,
}

impl ZipValidator {
    pub fn new(source: Arc<dyn DataSource>) -> Self {
        Self {
            source,
            check_state_match: false,
        }
    }

    #[must_use]
    pub fn with_state_match(mut self, enabled: bool) -> Self {
        self.check_state_match = enabled;
        self
    }
}

impl Validator for ZipValidator {
    fn name(&self) -> &str {
        "zip"
    }

    fn validate(&self, record: &AddressRecord) -> Result<ValidationVerdict> {
        let Some(zip) = record.zip5() else {
            return Ok(ValidationVerdict::valid());
        };
        let field = AddressField::ZipCode.as_str();
        let Some(info) = self.source.get_zip_info(zip)? else {
            return Ok(ValidationVerdict::from_errors(vec![FieldError::new(
                field,
                format!("Invalid US ZIP code: {zip}"),
                Some(zip.to_string()),
            )]));
        };

        let mut errors = Vec::new();
        if self.check_state_match
            && let Some(state) = record.state_name()
            // An unknown state is the state validator's finding, not ours.
            && let Ok(expected) = states::normalize_state(state)
            && info.state_id != expected
        {
            errors.push(FieldError::new(
                field,
                format!("ZIP code {zip} is in {}, not {expected}", info.state_id),
                Some(zip.to_string()),
            ));
        }
        Ok(ValidationVerdict::from_errors(errors))
    }
}
