//! Records for addresses outside the domestic convention.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::Result;
use crate::field::AddressField;
use crate::log::{OperationType, TransformationLog};
use crate::record::{AddressRecord, join_present};

/// Labels used in place of a missing `road`, in preference order.
pub const ROAD_FALLBACK_LABELS: [&str; 9] = [
    "po_box",
    "suburb",
    "city_district",
    "neighbourhood",
    "building",
    "unit",
    "level",
    "staircase",
    "entrance",
];

/// Component names that satisfy the location half of the acceptance rule.
pub const LOCATION_COMPONENTS: [&str; 4] = ["city", "region", "postal_code", "country"];

/// A parsed non-domestic address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InternationalAddressRecord {
    house_number: Option<String>,
    road: Option<String>,
    city: Option<String>,
    region: Option<String>,
    postal_code: Option<String>,
    country: Option<String>,
    country_code: Option<String>,
    components: BTreeMap<String, Vec<String>>,
    full_address: String,
    log: TransformationLog,
}

impl InternationalAddressRecord {
    /// Builds a record from backend labels (`road`, `city`, `postcode`, ...).
    ///
    /// Repeated labels keep every value; the first one is used for the named
    /// fields. Fallbacks used for road, city and region are logged on the
    /// record.
    pub fn from_components(
        components: BTreeMap<String, Vec<String>>,
        country_code: Option<String>,
    ) -> Self {
        let mut log = TransformationLog::new();
        let first = |label: &str| -> Option<String> {
            components
                .get(label)
                .and_then(|values| {
                    values
                        .iter()
                        .map(String::as_str)
                        .map(str::trim)
                        .find(|value| !value.is_empty())
                })
                .map(str::to_string)
        };

        let house_number = first("house_number");
        let road = match first("road") {
            Some(road) => Some(road),
            None => ROAD_FALLBACK_LABELS.iter().find_map(|label| {
                first(label).map(|value| {
                    log.record_cleaning(
                        "road",
                        "",
                        value.clone(),
                        format!("Road taken from `{label}`"),
                        OperationType::Parsing,
                    );
                    value
                })
            }),
        };
        let city = first("city").or_else(|| {
            first("suburb").inspect(|value| {
                log.record_cleaning(
                    "city",
                    "",
                    value.clone(),
                    "City taken from `suburb`",
                    OperationType::Parsing,
                );
            })
        });
        let region = first("state").or_else(|| {
            first("state_district").inspect(|value| {
                log.record_cleaning(
                    "region",
                    "",
                    value.clone(),
                    "Region taken from `state_district`",
                    OperationType::Parsing,
                );
            })
        });
        let postal_code = first("postcode");
        let country = first("country");

        let street = join_present([house_number.as_deref(), road.as_deref()], " ");
        let full_address = join_present(
            [
                street.as_deref(),
                city.as_deref(),
                region.as_deref(),
                postal_code.as_deref(),
                country.as_deref(),
            ],
            ", ",
        )
        .unwrap_or_default();

        Self {
            house_number,
            road,
            city,
            region,
            postal_code,
            country,
            country_code,
            components,
            full_address,
            log,
        }
    }

    pub fn house_number(&self) -> Option<&str> {
        self.house_number.as_deref()
    }

    pub fn road(&self) -> Option<&str> {
        self.road.as_deref()
    }

    pub fn city(&self) -> Option<&str> {
        self.city.as_deref()
    }

    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    pub fn postal_code(&self) -> Option<&str> {
        self.postal_code.as_deref()
    }

    pub fn country(&self) -> Option<&str> {
        self.country.as_deref()
    }

    pub fn country_code(&self) -> Option<&str> {
        self.country_code.as_deref()
    }

    /// Raw backend output, label to values.
    pub fn components(&self) -> &BTreeMap<String, Vec<String>> {
        &self.components
    }

    pub fn full_address(&self) -> &str {
        &self.full_address
    }

    pub fn log(&self) -> &TransformationLog {
        &self.log
    }

    pub fn has_road(&self) -> bool {
        self.road.is_some()
    }

    pub fn has_location(&self) -> bool {
        self.city.is_some()
            || self.region.is_some()
            || self.postal_code.is_some()
            || self.country.is_some()
    }

    /// Parts of the acceptance rule this record does not meet.
    pub fn missing_for_acceptance(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if !self.has_road() {
            missing.push("road");
        }
        if !self.has_location() {
            missing.push("location");
        }
        missing
    }

    /// Road plus at least one of city, region, postal code or country.
    pub fn meets_acceptance_rule(&self) -> bool {
        self.has_road() && self.has_location()
    }

    /// Projects onto the domestic schema, flagged as international.
    ///
    /// # Errors
    ///
    /// Never fails in practice: the postal code is not carried over, so no ZIP
    /// parsing happens. The signature matches [`AddressRecord::from_components`].
    pub fn to_address_record(&self) -> Result<AddressRecord> {
        let fields = [
            (AddressField::AddressNumber, self.house_number.clone()),
            (AddressField::StreetName, self.road.clone()),
            (AddressField::PlaceName, self.city.clone()),
            (AddressField::StateName, self.region.clone()),
        ];
        let record = AddressRecord::from_components(
            fields
                .into_iter()
                .filter_map(|(field, value)| value.map(|value| (field, value))),
        )?;
        Ok(record.mark_international())
    }

    pub fn view(&self) -> InternationalView {
        InternationalView {
            house_number: self.house_number.clone(),
            road: self.road.clone(),
            city: self.city.clone(),
            region: self.region.clone(),
            postal_code: self.postal_code.clone(),
            country: self.country.clone(),
            country_code: self.country_code.clone(),
            full_address: self.full_address.clone(),
            components: self.components.clone(),
        }
    }
}

/// External representation of an [`InternationalAddressRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InternationalView {
    #[serde(rename = "HouseNumber", skip_serializing_if = "Option::is_none")]
    pub house_number: Option<String>,
    #[serde(rename = "Road", skip_serializing_if = "Option::is_none")]
    pub road: Option<String>,
    #[serde(rename = "City", skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(rename = "Region", skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(rename = "PostalCode", skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(rename = "Country", skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(rename = "CountryCode", skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    #[serde(rename = "FullAddress")]
    pub full_address: String,
    #[serde(rename = "Components")]
    pub components: BTreeMap<String, Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn components(pairs: &[(&str, &str)]) -> BTreeMap<String, Vec<String>> {
        let mut map: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (label, value) in pairs {
            map.entry((*label).to_string())
                .or_default()
                .push((*value).to_string());
        }
        map
    }

    #[test]
    fn full_address_joins_in_fixed_order() {
        let record = InternationalAddressRecord::from_components(
            components(&[
                ("house_number", "10"),
                ("road", "downing street"),
                ("city", "london"),
                ("postcode", "sw1a 2aa"),
                ("country", "united kingdom"),
            ]),
            Some("GB".to_string()),
        );
        assert_eq!(
            record.full_address(),
            "10 downing street, london, sw1a 2aa, united kingdom"
        );
        assert!(record.meets_acceptance_rule());
        assert!(record.log().is_empty());
    }

    #[test]
    fn full_address_skips_a_missing_street() {
        let record = InternationalAddressRecord::from_components(
            components(&[("city", "paris"), ("country", "france")]),
            Some("FR".to_string()),
        );
        assert_eq!(record.full_address(), "paris, france");

        let record = InternationalAddressRecord::from_components(
            components(&[("road", "rue de rivoli"), ("city", "paris")]),
            None,
        );
        assert_eq!(record.full_address(), "rue de rivoli, paris");
    }

    #[test]
    fn country_alone_is_not_acceptable() {
        let record = InternationalAddressRecord::from_components(
            components(&[("country", "france")]),
            None,
        );
        assert!(record.has_location());
        assert!(!record.meets_acceptance_rule());
        assert_eq!(record.missing_for_acceptance(), ["road"]);
    }

    #[test]
    fn fallbacks_are_logged() {
        let record = InternationalAddressRecord::from_components(
            components(&[("suburb", "shibuya"), ("state_district", "tokyo")]),
            None,
        );
        assert_eq!(record.road(), Some("shibuya"));
        assert_eq!(record.city(), Some("shibuya"));
        assert_eq!(record.region(), Some("tokyo"));
        assert_eq!(record.log().cleaning().len(), 3);
    }

    #[test]
    fn projection_is_flagged_international() {
        let record = InternationalAddressRecord::from_components(
            components(&[("road", "rue de rivoli"), ("city", "paris"), ("postcode", "75001")]),
            None,
        );
        let projected = record.to_address_record().unwrap();
        assert!(projected.is_international());
        assert_eq!(projected.street_name(), Some("rue de rivoli"));
        assert_eq!(projected.zip5(), None);
    }
}
