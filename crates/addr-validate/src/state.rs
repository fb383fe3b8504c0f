use std::sync::Arc;

use addr_model::{AddressField, AddressRecord, FieldError, ValidationVerdict};
use addr_standards::DataSource;

use crate::error::Result;
use crate::validator::Validator;

/// Requires the state to be a known abbreviation or full name.
pub struct StateValidator {
    source: Arc<dyn DataSource>,
}

impl StateValidator {
    pub fn new(source: Arc<dyn DataSource>) -> Self {
        Self { source }
    }
}

impl Validator for StateValidator {
    fn name(&self) -> &str {
        "state"
    }

    fn validate(&self, record: &AddressRecord) -> Result<ValidationVerdict> {
        let Some(state) = record.state_name() else {
            return Ok(ValidationVerdict::valid());
        };
        if self.source.is_valid_state(state)? {
            return Ok(ValidationVerdict::valid());
        }
        Ok(ValidationVerdict::from_errors(vec![FieldError::new(
            AddressField::StateName.as_str(),
            format!("Invalid US state: {state}"),
            Some(state.to_string()),
        )]))
    }
}
