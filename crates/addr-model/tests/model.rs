//! Tests for addr-model records, builder and outcomes.

use addr_model::{
    AddressBuilder, AddressField, InternationalAddressRecord, ParseOutcome, ParseSource,
};
use proptest::prelude::*;
use std::collections::BTreeMap;

#[test]
fn builder_and_components_agree() {
    let built = AddressBuilder::new()
        .with_address_number("100")
        .with_pre_directional("N")
        .with_street_name("Main")
        .with_street_type("St")
        .with_post_directional("S")
        .with_unit("Apt", "4")
        .with_place_name("Austin")
        .with_state("TX")
        .with_zip("78749")
        .build()
        .expect("build record");
    insta::assert_snapshot!(built.full_address(), @"100 N Main St S, Apt 4, Austin, TX 78749");
    assert_eq!(built.address2(), Some("Apt 4"));
}

#[test]
fn international_outcome_carries_projection() {
    let mut components = BTreeMap::new();
    components.insert("road".to_string(), vec!["baker street".to_string()]);
    components.insert("house_number".to_string(), vec!["221b".to_string()]);
    components.insert("city".to_string(), vec!["london".to_string()]);
    let record = InternationalAddressRecord::from_components(components, Some("GB".to_string()));

    let outcome = ParseOutcome::international("221b baker street, london", record);
    assert_eq!(outcome.source(), ParseSource::International);
    assert!(outcome.is_international());
    let projected = outcome.address().expect("projected record");
    assert_eq!(projected.address1(), Some("221b baker street"));
    assert_eq!(outcome.to_map()["PlaceName"].as_deref(), Some("london"));
}

#[test]
fn outcome_view_serializes_without_logs() {
    let record = AddressBuilder::new()
        .with_street_name("Main")
        .with_zip("78749")
        .build()
        .expect("build record");
    let json = serde_json::to_value(ParseOutcome::domestic("Main 78749", record).view())
        .expect("serialize view");
    assert_eq!(json["source"], "us");
    assert_eq!(json["address"]["ZipCode5"], "78749");
    assert!(json.get("log").is_none());
}

fn word() -> impl Strategy<Value = String> {
    "[A-Z][a-z]{1,8}"
}

proptest! {
    #[test]
    fn full_address_reflects_assembled_components(
        number in "[1-9][0-9]{0,4}",
        street in word(),
        street_type in prop::sample::select(vec!["St", "Ave", "Blvd", "Rd"]),
        city in word(),
        state in prop::sample::select(vec!["TX", "CA", "NY", "WA"]),
        zip in "[0-9]{5}",
    ) {
        let build = || {
            AddressBuilder::new()
                .with_zip(zip.clone())
                .with_state(state)
                .with_place_name(city.clone())
                .with_street_type(street_type)
                .with_street_name(street.clone())
                .with_address_number(number.clone())
                .build()
        };
        let first = build().unwrap();
        let second = build().unwrap();
        let expected = format!("{number} {street} {street_type}, {city}, {state} {zip}");
        prop_assert_eq!(first.full_address(), expected.as_str());
        prop_assert_eq!(first, second);
    }
}

#[test]
fn with_field_accepts_every_label() {
    let mut builder = AddressBuilder::new();
    for field in AddressField::ALL {
        let value = if field == AddressField::ZipCode { "78749" } else { "x" };
        builder = builder.with_field(field.as_str(), value).expect("known label");
    }
    assert!(builder.build().is_ok());
}
