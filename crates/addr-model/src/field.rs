use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AddressError;

/// Named components of a domestic address.
///
/// Names follow the labels used by US address taggers and are stable: they
/// appear in transformation logs and as column names in table output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AddressField {
    AddressNumberPrefix,
    AddressNumber,
    AddressNumberSuffix,
    StreetNamePreModifier,
    StreetNamePreDirectional,
    StreetNamePreType,
    StreetName,
    StreetNamePostType,
    StreetNamePostDirectional,
    SubaddressType,
    SubaddressIdentifier,
    BuildingName,
    OccupancyType,
    OccupancyIdentifier,
    CornerOf,
    LandmarkName,
    PlaceName,
    StateName,
    ZipCode,
    #[serde(rename = "USPSBoxType")]
    UspsBoxType,
    #[serde(rename = "USPSBoxID")]
    UspsBoxId,
    #[serde(rename = "USPSBoxGroupType")]
    UspsBoxGroupType,
    #[serde(rename = "USPSBoxGroupID")]
    UspsBoxGroupId,
    IntersectionSeparator,
    Recipient,
    NotAddress,
}

impl AddressField {
    pub const ALL: [AddressField; 26] = [
        Self::AddressNumberPrefix,
        Self::AddressNumber,
        Self::AddressNumberSuffix,
        Self::StreetNamePreModifier,
        Self::StreetNamePreDirectional,
        Self::StreetNamePreType,
        Self::StreetName,
        Self::StreetNamePostType,
        Self::StreetNamePostDirectional,
        Self::SubaddressType,
        Self::SubaddressIdentifier,
        Self::BuildingName,
        Self::OccupancyType,
        Self::OccupancyIdentifier,
        Self::CornerOf,
        Self::LandmarkName,
        Self::PlaceName,
        Self::StateName,
        Self::ZipCode,
        Self::UspsBoxType,
        Self::UspsBoxId,
        Self::UspsBoxGroupType,
        Self::UspsBoxGroupId,
        Self::IntersectionSeparator,
        Self::Recipient,
        Self::NotAddress,
    ];

    /// Street line components in the order they are joined into `Address1`.
    pub const STREET_LINE: [AddressField; 9] = [
        Self::AddressNumberPrefix,
        Self::AddressNumber,
        Self::AddressNumberSuffix,
        Self::StreetNamePreModifier,
        Self::StreetNamePreDirectional,
        Self::StreetNamePreType,
        Self::StreetName,
        Self::StreetNamePostType,
        Self::StreetNamePostDirectional,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AddressNumberPrefix => "AddressNumberPrefix",
            Self::AddressNumber => "AddressNumber",
            Self::AddressNumberSuffix => "AddressNumberSuffix",
            Self::StreetNamePreModifier => "StreetNamePreModifier",
            Self::StreetNamePreDirectional => "StreetNamePreDirectional",
            Self::StreetNamePreType => "StreetNamePreType",
            Self::StreetName => "StreetName",
            Self::StreetNamePostType => "StreetNamePostType",
            Self::StreetNamePostDirectional => "StreetNamePostDirectional",
            Self::SubaddressType => "SubaddressType",
            Self::SubaddressIdentifier => "SubaddressIdentifier",
            Self::BuildingName => "BuildingName",
            Self::OccupancyType => "OccupancyType",
            Self::OccupancyIdentifier => "OccupancyIdentifier",
            Self::CornerOf => "CornerOf",
            Self::LandmarkName => "LandmarkName",
            Self::PlaceName => "PlaceName",
            Self::StateName => "StateName",
            Self::ZipCode => "ZipCode",
            Self::UspsBoxType => "USPSBoxType",
            Self::UspsBoxId => "USPSBoxID",
            Self::UspsBoxGroupType => "USPSBoxGroupType",
            Self::UspsBoxGroupId => "USPSBoxGroupID",
            Self::IntersectionSeparator => "IntersectionSeparator",
            Self::Recipient => "Recipient",
            Self::NotAddress => "NotAddress",
        }
    }

    /// Looks a field up by its label, ignoring ASCII case.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|field| field.as_str().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for AddressField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AddressField {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| AddressError::UnknownField {
            name: s.to_string(),
        })
    }
}
