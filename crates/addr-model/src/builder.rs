use std::collections::BTreeMap;

use crate::error::{AddressError, Result};
use crate::field::AddressField;
use crate::record::AddressRecord;

/// Fluent, component-by-component construction of an [`AddressRecord`].
///
/// ```
/// use addr_model::AddressBuilder;
///
/// let record = AddressBuilder::new()
///     .with_address_number("123")
///     .with_street_name("Main")
///     .with_street_type("St")
///     .with_place_name("Austin")
///     .with_state("TX")
///     .with_zip("78749")
///     .build()
///     .unwrap();
/// assert_eq!(record.full_address(), "123 Main St, Austin, TX 78749");
/// ```
#[derive(Debug, Clone, Default)]
pub struct AddressBuilder {
    components: BTreeMap<AddressField, String>,
}

impl AddressBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, field: AddressField, value: impl Into<String>) -> Self {
        self.components.insert(field, value.into());
        self
    }

    /// Sets a component by its label.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::UnknownField`] for a label that names no field.
    pub fn with_field(self, name: &str, value: impl Into<String>) -> Result<Self> {
        let field: AddressField = name.parse()?;
        Ok(self.with(field, value))
    }

    #[must_use]
    pub fn with_address_number(self, value: impl Into<String>) -> Self {
        self.with(AddressField::AddressNumber, value)
    }

    #[must_use]
    pub fn with_pre_directional(self, value: impl Into<String>) -> Self {
        self.with(AddressField::StreetNamePreDirectional, value)
    }

    #[must_use]
    pub fn with_street_name(self, value: impl Into<String>) -> Self {
        self.with(AddressField::StreetName, value)
    }

    #[must_use]
    pub fn with_street_type(self, value: impl Into<String>) -> Self {
        self.with(AddressField::StreetNamePostType, value)
    }

    #[must_use]
    pub fn with_post_directional(self, value: impl Into<String>) -> Self {
        self.with(AddressField::StreetNamePostDirectional, value)
    }

    #[must_use]
    pub fn with_unit(self, unit_type: impl Into<String>, identifier: impl Into<String>) -> Self {
        self.with(AddressField::OccupancyType, unit_type)
            .with(AddressField::OccupancyIdentifier, identifier)
    }

    #[must_use]
    pub fn with_po_box(self, identifier: impl Into<String>) -> Self {
        self.with(AddressField::UspsBoxType, "PO Box")
            .with(AddressField::UspsBoxId, identifier)
    }

    #[must_use]
    pub fn with_place_name(self, value: impl Into<String>) -> Self {
        self.with(AddressField::PlaceName, value)
    }

    #[must_use]
    pub fn with_state(self, value: impl Into<String>) -> Self {
        self.with(AddressField::StateName, value)
    }

    #[must_use]
    pub fn with_zip(self, value: impl Into<String>) -> Self {
        self.with(AddressField::ZipCode, value)
    }

    pub fn reset(&mut self) {
        self.components.clear();
    }

    /// Builds the record. A street name or a PO box number is required.
    ///
    /// # Errors
    ///
    /// [`AddressError::MissingComponents`] when neither is set, or
    /// [`AddressError::InvalidZip`] for a malformed ZIP.
    pub fn build(&self) -> Result<AddressRecord> {
        let has = |field: AddressField| {
            self.components
                .get(&field)
                .is_some_and(|value| !value.trim().is_empty())
        };
        if !has(AddressField::StreetName) && !has(AddressField::UspsBoxId) {
            return Err(AddressError::MissingComponents {
                missing: vec![
                    AddressField::StreetName.to_string(),
                    AddressField::UspsBoxId.to_string(),
                ],
            });
        }
        AddressRecord::from_components(
            self.components
                .iter()
                .map(|(field, value)| (*field, value.clone())),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_requires_a_deliverable_line() {
        let error = AddressBuilder::new()
            .with_place_name("Austin")
            .with_state("TX")
            .build()
            .unwrap_err();
        assert!(matches!(error, AddressError::MissingComponents { .. }));
    }

    #[test]
    fn with_field_rejects_unknown_names() {
        let error = AddressBuilder::new().with_field("Galaxy", "Milky Way").unwrap_err();
        assert_eq!(
            error,
            AddressError::UnknownField {
                name: "Galaxy".to_string()
            }
        );
    }

    #[test]
    fn po_box_builds_without_a_street() {
        let record = AddressBuilder::new()
            .with_po_box("1234")
            .with_place_name("Austin")
            .with_state("TX")
            .with_zip("78749")
            .build()
            .unwrap();
        assert_eq!(record.full_address(), "PO Box 1234, Austin, TX 78749");
    }

    #[test]
    fn reset_clears_components() {
        let mut builder = AddressBuilder::new().with_street_name("Main");
        builder.reset();
        assert!(builder.build().is_err());
    }
}
