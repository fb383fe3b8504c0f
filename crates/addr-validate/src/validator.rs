use addr_model::{AddressRecord, ValidationVerdict};

use crate::error::Result;

/// A single validation pass over a record.
pub trait Validator: Send + Sync {
    fn name(&self) -> &str;

    /// # Errors
    ///
    /// Only when the reference data cannot be read; invalid records yield an
    /// invalid verdict.
    fn validate(&self, record: &AddressRecord) -> Result<ValidationVerdict>;
}
