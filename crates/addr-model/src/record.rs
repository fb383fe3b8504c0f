//! Domestic address record and its external view.

use std::collections::BTreeMap;

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::error::Result;
use crate::field::AddressField;
use crate::log::TransformationLog;
use crate::zip::{ZipCode, parse_zip};

/// Column names produced by [`AddressRecord::to_map`], in output order.
pub const OUTPUT_COLUMNS: [&str; 33] = [
    "AddressNumberPrefix",
    "AddressNumber",
    "AddressNumberSuffix",
    "StreetNamePreModifier",
    "StreetNamePreDirectional",
    "StreetNamePreType",
    "StreetName",
    "StreetNamePostType",
    "StreetNamePostDirectional",
    "SubaddressType",
    "SubaddressIdentifier",
    "BuildingName",
    "OccupancyType",
    "OccupancyIdentifier",
    "CornerOf",
    "LandmarkName",
    "PlaceName",
    "StateName",
    "ZipCode",
    "USPSBoxType",
    "USPSBoxID",
    "USPSBoxGroupType",
    "USPSBoxGroupID",
    "IntersectionSeparator",
    "Recipient",
    "NotAddress",
    "Address1",
    "Address2",
    "FullAddress",
    "ZipCode5",
    "ZipCode4",
    "FullZipcode",
    "AddressHash",
];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Derived {
    address1: Option<String>,
    address2: Option<String>,
    full_address: String,
    hash: Option<String>,
}

/// A parsed domestic address.
///
/// Components are only reachable through accessors, and every constructor or
/// `with_*` method recomputes the derived lines, so derived values can never
/// drift from the components they come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressRecord {
    components: BTreeMap<AddressField, String>,
    zip: Option<ZipCode>,
    international: bool,
    derived: Derived,
    log: TransformationLog,
}

impl AddressRecord {
    /// Builds a record from labeled values. Blank values are ignored.
    ///
    /// # Errors
    ///
    /// Fails with [`crate::AddressError::InvalidZip`] when the `ZipCode`
    /// component is malformed.
    pub fn from_components<I, S>(components: I) -> Result<Self>
    where
        I: IntoIterator<Item = (AddressField, S)>,
        S: Into<String>,
    {
        let mut record = Self {
            components: BTreeMap::new(),
            zip: None,
            international: false,
            derived: Derived::default(),
            log: TransformationLog::new(),
        };
        for (field, value) in components {
            record.set(field, value.into())?;
        }
        record.recompute();
        Ok(record)
    }

    /// Returns a copy with `field` replaced; an empty value removes it.
    ///
    /// # Errors
    ///
    /// Fails when `field` is `ZipCode` and `value` is malformed.
    pub fn with_component(mut self, field: AddressField, value: impl Into<String>) -> Result<Self> {
        self.components.remove(&field);
        if field == AddressField::ZipCode {
            self.zip = None;
        }
        self.set(field, value.into())?;
        self.recompute();
        Ok(self)
    }

    /// Returns a copy with `field` removed.
    #[must_use]
    pub fn without_component(mut self, field: AddressField) -> Self {
        self.components.remove(&field);
        if field == AddressField::ZipCode {
            self.zip = None;
        }
        self.recompute();
        self
    }

    #[must_use]
    pub fn mark_international(mut self) -> Self {
        self.international = true;
        self
    }

    #[must_use]
    pub fn with_log(mut self, log: TransformationLog) -> Self {
        self.log.append(log);
        self
    }

    fn set(&mut self, field: AddressField, value: String) -> Result<()> {
        let value = value.trim();
        if value.is_empty() {
            return Ok(());
        }
        if field == AddressField::ZipCode {
            let parsed = parse_zip(value)?;
            self.components
                .insert(field, parsed.zip.zip5().to_string());
            self.zip = Some(parsed.zip);
        } else {
            self.components.insert(field, value.to_string());
        }
        Ok(())
    }

    fn recompute(&mut self) {
        let address1 = self.compute_address1();
        let address2 = self.compute_address2();

        let state_zip = join_present(
            [
                self.component(AddressField::StateName),
                self.zip.as_ref().map(ZipCode::full).as_deref(),
            ],
            " ",
        );
        let locality = join_present(
            [self.component(AddressField::PlaceName), state_zip.as_deref()],
            ", ",
        );
        let full_address = join_present(
            [address1.as_deref(), address2.as_deref(), locality.as_deref()],
            ", ",
        )
        .unwrap_or_default();

        let hash = (!full_address.is_empty()).then(|| {
            let digest = Sha256::digest(full_address.to_uppercase().as_bytes());
            hex::encode(digest)
        });

        self.derived = Derived {
            address1,
            address2,
            full_address,
            hash,
        };
    }

    fn compute_address1(&self) -> Option<String> {
        if let (Some(box_type), Some(box_id)) = (
            self.component(AddressField::UspsBoxType),
            self.component(AddressField::UspsBoxId),
        ) {
            return Some(format!("{box_type} {box_id}"));
        }
        join_present(
            AddressField::STREET_LINE
                .iter()
                .map(|field| self.component(*field)),
            " ",
        )
    }

    fn compute_address2(&self) -> Option<String> {
        let subaddress = join_present(
            [
                self.component(AddressField::SubaddressType),
                self.component(AddressField::SubaddressIdentifier),
            ],
            " ",
        );
        let occupancy = join_present(
            [
                self.component(AddressField::OccupancyType),
                self.component(AddressField::OccupancyIdentifier),
            ],
            " ",
        );
        join_present(
            [
                subaddress.as_deref(),
                self.component(AddressField::BuildingName),
                occupancy.as_deref(),
            ],
            ", ",
        )
    }

    pub fn component(&self, field: AddressField) -> Option<&str> {
        self.components.get(&field).map(String::as_str)
    }

    /// Present components in field order.
    pub fn components(&self) -> impl Iterator<Item = (AddressField, &str)> {
        self.components
            .iter()
            .map(|(field, value)| (*field, value.as_str()))
    }

    pub fn address_number(&self) -> Option<&str> {
        self.component(AddressField::AddressNumber)
    }

    pub fn street_name(&self) -> Option<&str> {
        self.component(AddressField::StreetName)
    }

    pub fn place_name(&self) -> Option<&str> {
        self.component(AddressField::PlaceName)
    }

    pub fn state_name(&self) -> Option<&str> {
        self.component(AddressField::StateName)
    }

    pub fn zip(&self) -> Option<&ZipCode> {
        self.zip.as_ref()
    }

    pub fn zip5(&self) -> Option<&str> {
        self.zip.as_ref().map(ZipCode::zip5)
    }

    pub fn zip4(&self) -> Option<&str> {
        self.zip.as_ref().and_then(ZipCode::zip4)
    }

    pub fn zip_full(&self) -> Option<String> {
        self.zip.as_ref().map(ZipCode::full)
    }

    pub fn address1(&self) -> Option<&str> {
        self.derived.address1.as_deref()
    }

    pub fn address2(&self) -> Option<&str> {
        self.derived.address2.as_deref()
    }

    pub fn full_address(&self) -> &str {
        &self.derived.full_address
    }

    /// SHA-256 of the upper-cased full address, hex encoded.
    pub fn address_hash(&self) -> Option<&str> {
        self.derived.hash.as_deref()
    }

    pub fn is_international(&self) -> bool {
        self.international
    }

    pub fn log(&self) -> &TransformationLog {
        &self.log
    }

    /// Flat column map over [`OUTPUT_COLUMNS`]; absent values are `None`.
    pub fn to_map(&self) -> BTreeMap<String, Option<String>> {
        let mut map: BTreeMap<String, Option<String>> = OUTPUT_COLUMNS
            .iter()
            .map(|column| ((*column).to_string(), None))
            .collect();
        for (field, value) in &self.components {
            map.insert(field.as_str().to_string(), Some(value.clone()));
        }
        let derived = [
            ("Address1", self.derived.address1.clone()),
            ("Address2", self.derived.address2.clone()),
            (
                "FullAddress",
                Some(self.derived.full_address.clone()).filter(|value| !value.is_empty()),
            ),
            ("ZipCode5", self.zip5().map(str::to_string)),
            ("ZipCode4", self.zip4().map(str::to_string)),
            ("FullZipcode", self.zip_full()),
            ("AddressHash", self.derived.hash.clone()),
        ];
        for (column, value) in derived {
            map.insert(column.to_string(), value);
        }
        map
    }

    /// Serializable view without the transformation log.
    pub fn view(&self) -> AddressView {
        AddressView {
            components: self
                .components
                .iter()
                .map(|(field, value)| (field.as_str().to_string(), value.clone()))
                .collect(),
            address1: self.derived.address1.clone(),
            address2: self.derived.address2.clone(),
            full_address: self.derived.full_address.clone(),
            zip5: self.zip5().map(str::to_string),
            zip4: self.zip4().map(str::to_string),
            full_zipcode: self.zip_full(),
            address_hash: self.derived.hash.clone(),
            is_international: self.international,
        }
    }
}

/// External representation of an [`AddressRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddressView {
    #[serde(flatten)]
    pub components: BTreeMap<String, String>,
    #[serde(rename = "Address1", skip_serializing_if = "Option::is_none")]
    pub address1: Option<String>,
    #[serde(rename = "Address2", skip_serializing_if = "Option::is_none")]
    pub address2: Option<String>,
    #[serde(rename = "FullAddress")]
    pub full_address: String,
    #[serde(rename = "ZipCode5", skip_serializing_if = "Option::is_none")]
    pub zip5: Option<String>,
    #[serde(rename = "ZipCode4", skip_serializing_if = "Option::is_none")]
    pub zip4: Option<String>,
    #[serde(rename = "FullZipcode", skip_serializing_if = "Option::is_none")]
    pub full_zipcode: Option<String>,
    #[serde(rename = "AddressHash", skip_serializing_if = "Option::is_none")]
    pub address_hash: Option<String>,
    #[serde(rename = "IsInternational")]
    pub is_international: bool,
}

pub(crate) fn join_present<'a, I>(parts: I, separator: &str) -> Option<String>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let joined = parts
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(separator);
    (!joined.is_empty()).then_some(joined)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn main_street() -> AddressRecord {
        AddressRecord::from_components([
            (AddressField::AddressNumber, "123"),
            (AddressField::StreetName, "Main"),
            (AddressField::StreetNamePostType, "St"),
            (AddressField::PlaceName, "Austin"),
            (AddressField::StateName, "TX"),
            (AddressField::ZipCode, "78749-1234"),
        ])
        .unwrap()
    }

    #[test]
    fn derives_lines_and_zip_parts() {
        let record = main_street();
        assert_eq!(record.address1(), Some("123 Main St"));
        assert_eq!(record.address2(), None);
        assert_eq!(record.zip5(), Some("78749"));
        assert_eq!(record.zip4(), Some("1234"));
        assert_eq!(record.full_address(), "123 Main St, Austin, TX 78749-1234");
        assert_eq!(record.address_hash().map(str::len), Some(64));
    }

    #[test]
    fn derived_fields_follow_component_changes() {
        let record = main_street()
            .with_component(AddressField::StreetName, "Oak")
            .unwrap()
            .with_component(AddressField::ZipCode, "75201")
            .unwrap();
        assert_eq!(record.full_address(), "123 Oak St, Austin, TX 75201");
        assert_eq!(record.zip4(), None);

        let without_city = record.without_component(AddressField::PlaceName);
        assert_eq!(without_city.full_address(), "123 Oak St, TX 75201");
    }

    #[test]
    fn po_box_takes_the_first_line() {
        let record = AddressRecord::from_components([
            (AddressField::UspsBoxType, "PO Box"),
            (AddressField::UspsBoxId, "1234"),
            (AddressField::PlaceName, "Austin"),
            (AddressField::StateName, "TX"),
            (AddressField::ZipCode, "78749"),
        ])
        .unwrap();
        assert_eq!(record.address1(), Some("PO Box 1234"));
    }

    #[test]
    fn second_line_joins_unit_building_and_occupancy() {
        let record = AddressRecord::from_components([
            (AddressField::AddressNumber, "1"),
            (AddressField::StreetName, "Congress"),
            (AddressField::StreetNamePostType, "Ave"),
            (AddressField::SubaddressType, "Suite"),
            (AddressField::SubaddressIdentifier, "200"),
            (AddressField::OccupancyType, "Apt"),
            (AddressField::OccupancyIdentifier, "4B"),
        ])
        .unwrap();
        assert_eq!(record.address2(), Some("Suite 200, Apt 4B"));
    }

    #[test]
    fn malformed_zip_is_rejected() {
        let result = AddressRecord::from_components([(AddressField::ZipCode, "78749-12")]);
        assert!(result.is_err());
    }

    #[test]
    fn map_covers_every_output_column() {
        let map = main_street().to_map();
        assert_eq!(map.len(), OUTPUT_COLUMNS.len());
        assert_eq!(map["FullZipcode"].as_deref(), Some("78749-1234"));
        assert_eq!(map["ZipCode"].as_deref(), Some("78749"));
        assert_eq!(map["Recipient"], None);
    }

    #[test]
    fn view_omits_the_log() {
        let json = serde_json::to_value(main_street().view()).unwrap();
        assert_eq!(json["StreetName"], "Main");
        assert_eq!(json["FullAddress"], "123 Main St, Austin, TX 78749-1234");
        assert!(json.get("log").is_none());
    }
}
