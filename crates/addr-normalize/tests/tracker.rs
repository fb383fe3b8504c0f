//! Tests for the transformation tracker over whole records.

use addr_model::{AddressBuilder, AddressField, AddressRecord};
use addr_normalize::TransformationTracker;
use proptest::prelude::*;

fn parsed_record() -> AddressRecord {
    AddressRecord::from_components([
        (AddressField::AddressNumber, "123"),
        (AddressField::StreetName, "Main"),
        (AddressField::StreetNamePostType, "St"),
        (AddressField::PlaceName, "Austin"),
        (AddressField::StateName, "TX"),
        (AddressField::ZipCode, "787491234"),
    ])
    .expect("record")
}

#[test]
fn cascading_changes_get_one_entry_per_detector() {
    let mut tracker = TransformationTracker::new();
    let raw = "123  Main St.,, Austin ,  texas 787491234";
    tracker.track_all(&parsed_record(), raw);

    let messages: Vec<_> = tracker
        .log()
        .cleaning()
        .iter()
        .map(|entry| (entry.field(), entry.message()))
        .collect();
    assert_eq!(
        messages,
        [
            ("FullAddress", "Collapsed repeated whitespace"),
            ("StreetNamePostType", "Removed abbreviation period"),
            ("StateName", "Abbreviated state name"),
            ("ZipCode", "Hyphenated ZIP+4"),
            ("FullAddress", "Removed empty comma-separated segments"),
        ]
    );
}

#[test]
fn normalized_input_produces_no_entries() {
    let record = parsed_record();
    let mut tracker = TransformationTracker::new();
    assert_eq!(tracker.track_all(&record, record.full_address()), 0);
    assert_eq!(tracker.track_all(&record, record.full_address()), 0);
    assert!(tracker.log().is_empty());
}

#[test]
fn repeated_runs_repeat_entries() {
    let mut tracker = TransformationTracker::new();
    let raw = "123 Main St, Austin, Texas 78749-1234";
    let first = tracker.track_all(&parsed_record(), raw);
    let second = tracker.track_all(&parsed_record(), raw);
    assert_eq!(first, 1);
    assert_eq!(second, 1);
    assert_eq!(tracker.log().cleaning().len(), 2);
}

proptest! {
    #[test]
    fn tracking_a_normalized_record_is_idempotent(
        number in "[1-9][0-9]{0,4}",
        street in "[A-Z][a-z]{2,8}",
        city in "[A-Z][a-z]{2,8}",
        state in prop::sample::select(vec!["TX", "CA", "NY", "MA", "WA"]),
        zip in "[0-9]{5}",
        plus4 in prop::option::of("[0-9]{4}"),
    ) {
        let zip = match plus4 {
            Some(plus4) => format!("{zip}-{plus4}"),
            None => zip,
        };
        let record = AddressBuilder::new()
            .with_address_number(number)
            .with_street_name(street)
            .with_street_type("Ave")
            .with_place_name(city)
            .with_state(state)
            .with_zip(zip)
            .build()
            .unwrap();
        let mut tracker = TransformationTracker::new();
        prop_assert_eq!(tracker.track_all(&record, record.full_address()), 0);
        prop_assert_eq!(tracker.track_all(&record, record.full_address()), 0);
    }
}
