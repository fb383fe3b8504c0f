use std::sync::Arc;

use addr_model::{AddressRecord, ValidationVerdict};
use addr_standards::DataSource;

use crate::error::Result;
use crate::state::StateValidator;
use crate::validator::Validator;
use crate::zip::ZipValidator;

/// Runs validators in order and merges their verdicts.
///
/// The merged verdict is valid only when every member is; errors keep member
/// order. A composite is itself a [`Validator`] and can be nested.
pub struct CompositeValidator {
    name: String,
    validators: Vec<Box<dyn Validator>>,
}

impl CompositeValidator {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            validators: Vec::new(),
        }
    }

    #[must_use]
    pub fn with(mut self, validator: impl Validator + 'static) -> Self {
        self.add(Box::new(validator));
        self
    }

    pub fn add(&mut self, validator: Box<dyn Validator>) {
        self.validators.push(validator);
    }

    /// Removes the first validator called `name`.
    pub fn remove(&mut self, name: &str) -> Option<Box<dyn Validator>> {
        let position = self
            .validators
            .iter()
            .position(|validator| validator.name() == name)?;
        Some(self.validators.remove(position))
    }

    pub fn names(&self) -> Vec<&str> {
        self.validators
            .iter()
            .map(|validator| validator.name())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }
}

impl Validator for CompositeValidator {
    fn name(&self) -> &str {
        &self.name
    }

    fn validate(&self, record: &AddressRecord) -> Result<ValidationVerdict> {
        let mut verdicts = Vec::with_capacity(self.validators.len());
        for validator in &self.validators {
            let verdict = validator.validate(record)?;
            if !verdict.is_valid() {
                tracing::debug!(
                    validator = validator.name(),
                    errors = verdict.errors().len(),
                    "validation failed"
                );
            }
            verdicts.push(verdict);
        }
        Ok(ValidationVerdict::merge_all(verdicts))
    }
}

/// ZIP then state validation over `source`.
pub fn default_validators(
    source: &Arc<dyn DataSource>,
    check_state_match: bool,
) -> CompositeValidator {
    CompositeValidator::new("default")
        .with(ZipValidator::new(Arc::clone(source)).with_state_match(check_state_match))
        .with(StateValidator::new(Arc::clone(source)))
}
