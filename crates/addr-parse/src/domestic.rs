//! Adapter that turns domestic backend labels into an [`AddressRecord`].

use addr_model::{AddressField, AddressRecord, ParseFailure, ParseOutcome, ParseSource};
use addr_standards::states;

use crate::adapter::{BackendAdapter, ParserStats};
use crate::backend::{DomesticBackend, LabeledToken};
use crate::tagger::RuleBasedTagger;

/// US address parser over a [`DomesticBackend`], rule-based by default.
#[derive(Debug, Default)]
pub struct DomesticParser<B = RuleBasedTagger> {
    backend: B,
    stats: ParserStats,
}

impl DomesticParser<RuleBasedTagger> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<B: DomesticBackend> DomesticParser<B> {
    pub fn with_backend(backend: B) -> Self {
        Self {
            backend,
            stats: ParserStats::default(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

impl<B: DomesticBackend> BackendAdapter for DomesticParser<B> {
    type Raw = Vec<LabeledToken>;

    fn backend_name(&self) -> &str {
        self.backend.name()
    }

    fn source(&self) -> ParseSource {
        ParseSource::Domestic
    }

    fn counters(&self) -> &ParserStats {
        &self.stats
    }

    fn invoke(&self, input: &str) -> Result<Self::Raw, ParseFailure> {
        let tokens = self
            .backend
            .tag(input)
            .map_err(|error| self.backend_failure(error))?;
        if tokens.is_empty() {
            return Err(ParseFailure::NoComponents {
                backend: self.backend_name().to_string(),
            });
        }
        Ok(tokens)
    }

    fn build(&self, raw_input: &str, raw: Self::Raw) -> Result<ParseOutcome, ParseFailure> {
        let components = merge_labels(&raw)
            .into_iter()
            .map(|(field, value)| (field, clean_component(field, &value)))
            .filter(|(_, value)| !value.is_empty());

        let record = AddressRecord::from_components(components).map_err(|error| {
            ParseFailure::Construction {
                message: error.to_string(),
            }
        })?;

        // A lone city or unit is not an address.
        if record.address1().is_none() && record.zip().is_none() && record.state_name().is_none() {
            return Err(ParseFailure::NoComponents {
                backend: self.backend_name().to_string(),
            });
        }

        tracing::trace!(
            backend = self.backend_name(),
            components = record.components().count(),
            "domestic record built"
        );
        Ok(ParseOutcome::domestic(raw_input, record))
    }
}

/// Joins tokens sharing a label, in order of first appearance.
fn merge_labels(tokens: &[LabeledToken]) -> Vec<(AddressField, String)> {
    let mut merged: Vec<(AddressField, String)> = Vec::new();
    for token in tokens {
        let Some(field) = AddressField::from_name(&token.label) else {
            tracing::trace!(label = %token.label, "skipping label outside the address schema");
            continue;
        };
        let text = token.text.trim().trim_end_matches(',');
        if text.is_empty() {
            continue;
        }
        match merged.iter_mut().find(|(existing, _)| *existing == field) {
            Some((_, value)) => {
                value.push(' ');
                value.push_str(text);
            }
            None => merged.push((field, text.to_string())),
        }
    }
    merged
}

fn clean_component(field: AddressField, value: &str) -> String {
    let cleaned = value
        .split_whitespace()
        .map(drop_abbreviation_period)
        .collect::<Vec<_>>()
        .join(" ");
    let cleaned = cleaned.trim_end_matches([',', ';']).to_string();

    match field {
        AddressField::StateName => match states::normalize_state(&cleaned) {
            Ok(abbrev) => abbrev.to_string(),
            // Left as written; validation reports it.
            Err(_) => cleaned,
        },
        AddressField::ZipCode => cleaned.split_whitespace().collect(),
        _ => cleaned,
    }
}

/// "St." becomes "St"; "P.O." and "4." are left alone.
fn drop_abbreviation_period(word: &str) -> &str {
    match word.strip_suffix('.') {
        Some(stem)
            if !stem.is_empty()
                && stem.len() <= 5
                && stem.chars().all(|c| c.is_ascii_alphabetic()) =>
        {
            stem
        }
        _ => word,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BackendError;
    use crate::AddressParser;

    struct FixedBackend(Vec<LabeledToken>);

    impl DomesticBackend for FixedBackend {
        fn name(&self) -> &str {
            "fixed"
        }

        fn tag(&self, _input: &str) -> Result<Vec<LabeledToken>, BackendError> {
            Ok(self.0.clone())
        }
    }

    struct FailingBackend;

    impl DomesticBackend for FailingBackend {
        fn name(&self) -> &str {
            "failing"
        }

        fn tag(&self, _input: &str) -> Result<Vec<LabeledToken>, BackendError> {
            Err(BackendError::Failed("tagger crashed".to_string()))
        }
    }

    #[test]
    fn repeated_labels_are_joined() {
        let parser = DomesticParser::with_backend(FixedBackend(vec![
            LabeledToken::new("123", "AddressNumber"),
            LabeledToken::new("Martin", "StreetName"),
            LabeledToken::new("Luther", "StreetName"),
            LabeledToken::new("King", "StreetName"),
            LabeledToken::new("Blvd.", "StreetNamePostType"),
            LabeledToken::new("texas", "StateName"),
        ]));
        let outcome = parser.parse("anything");
        let record = outcome.address().unwrap();
        assert_eq!(record.street_name(), Some("Martin Luther King"));
        assert_eq!(record.component(AddressField::StreetNamePostType), Some("Blvd"));
        assert_eq!(record.state_name(), Some("TX"));
    }

    #[test]
    fn unknown_labels_are_skipped() {
        let parser = DomesticParser::with_backend(FixedBackend(vec![
            LabeledToken::new("Austin", "PlaceName"),
            LabeledToken::new("TX", "StateName"),
            LabeledToken::new("USA", "CountryName"),
        ]));
        let outcome = parser.parse("Austin TX USA");
        assert!(outcome.is_parsed());
        let record = outcome.address().unwrap();
        assert_eq!(record.components().count(), 2);
        assert_eq!(record.to_map().get("Recipient"), Some(&None));
        assert!(!record.to_map().contains_key("CountryName"));
    }

    #[test]
    fn city_alone_is_no_components() {
        let parser = DomesticParser::with_backend(FixedBackend(vec![LabeledToken::new(
            "Austin",
            "PlaceName",
        )]));
        let outcome = parser.parse("Austin");
        assert!(matches!(outcome.failure(), Some(ParseFailure::NoComponents { .. })));
    }

    #[test]
    fn malformed_zip_is_a_construction_failure() {
        let parser = DomesticParser::with_backend(FixedBackend(vec![
            LabeledToken::new("1 Main St", "StreetName"),
            LabeledToken::new("78749-12", "ZipCode"),
        ]));
        let outcome = parser.parse("1 Main St 78749-12");
        assert!(matches!(outcome.failure(), Some(ParseFailure::Construction { .. })));
        assert_eq!(parser.stats().error_count, 1);
    }

    #[test]
    fn backend_errors_become_failed_outcomes() {
        let parser = DomesticParser::with_backend(FailingBackend);
        let outcome = parser.parse("123 Main St");
        assert!(!outcome.is_parsed());
        assert!(!outcome.is_valid());
        assert_eq!(outcome.raw_input(), "123 Main St");
        assert!(matches!(outcome.failure(), Some(ParseFailure::Backend { .. })));
    }

    #[test]
    fn abbreviation_periods() {
        assert_eq!(drop_abbreviation_period("St."), "St");
        assert_eq!(drop_abbreviation_period("P.O."), "P.O.");
        assert_eq!(drop_abbreviation_period("4."), "4.");
    }
}
