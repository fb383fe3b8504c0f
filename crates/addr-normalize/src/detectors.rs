//! Detectors run by [`crate::TransformationTracker::track_all`], in order:
//! whitespace, punctuation, state name, ZIP format, comma segments.
//!
//! Whitespace and comma detectors clean a working copy of the input as they
//! go, so a later detector only sees what earlier ones left behind.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use addr_model::{AddressField, AddressRecord, OperationType, TransformationLog, parse_zip};
use addr_standards::states;
use regex::Regex;

const FULL_ADDRESS: &str = "FullAddress";

static ABBREVIATION_PERIOD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b([A-Za-z]{1,5})\.").expect("Invalid abbreviation regex")
});

static ZIP_CANDIDATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(\d{5}\s*-\s*\d{4}|\d{9}|\d{3,5})\b").expect("Invalid ZIP regex")
});

/// Case-insensitive abbreviation and full-name patterns for one state.
struct StatePatterns {
    abbreviation: Regex,
    names: Vec<Regex>,
}

static STATE_PATTERNS: LazyLock<BTreeMap<&'static str, StatePatterns>> = LazyLock::new(|| {
    states::abbreviations()
        .map(|abbrev| {
            let abbreviation = Regex::new(&format!(r"(?i)\b{}\b", regex::escape(abbrev)))
                .expect("Invalid state regex");
            let names = states::names_for(abbrev)
                .into_iter()
                .map(|name| {
                    let words: Vec<_> = name.split_whitespace().map(regex::escape).collect();
                    Regex::new(&format!(r"(?i)\b{}\b", words.join(r"\s+")))
                        .expect("Invalid state regex")
                })
                .collect();
            (abbrev, StatePatterns { abbreviation, names })
        })
        .collect()
});

/// Input and record under inspection.
pub struct DetectionContext<'a> {
    record: &'a AddressRecord,
    raw: &'a str,
    text: String,
}

impl<'a> DetectionContext<'a> {
    pub fn new(record: &'a AddressRecord, raw: &'a str) -> Self {
        Self {
            record,
            raw,
            text: raw.to_string(),
        }
    }

    pub fn record(&self) -> &AddressRecord {
        self.record
    }

    /// The input exactly as received.
    pub fn raw(&self) -> &str {
        self.raw
    }

    /// The input after the detectors that ran so far.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: String) {
        self.text = text;
    }
}

pub trait Detector: Send + Sync {
    fn name(&self) -> &'static str;

    /// Appends one entry per change found and returns how many were added.
    fn detect(&self, context: &mut DetectionContext<'_>, log: &mut TransformationLog) -> usize;
}

pub fn default_detectors() -> Vec<Box<dyn Detector>> {
    vec![
        Box::new(WhitespaceDetector),
        Box::new(PunctuationDetector),
        Box::new(StateNameDetector),
        Box::new(ZipFormatDetector),
        Box::new(CommaSegmentDetector),
    ]
}

/// Surrounding whitespace and runs of whitespace.
pub struct WhitespaceDetector;

impl Detector for WhitespaceDetector {
    fn name(&self) -> &'static str {
        "whitespace"
    }

    fn detect(&self, context: &mut DetectionContext<'_>, log: &mut TransformationLog) -> usize {
        let mut found = 0;
        let before = context.text().to_string();
        let trimmed = before.trim();
        if trimmed != before {
            log.record_cleaning(
                FULL_ADDRESS,
                before.as_str(),
                trimmed,
                "Trimmed surrounding whitespace",
                OperationType::Cleaning,
            );
            found += 1;
        }
        let collapsed = trimmed.split_whitespace().collect::<Vec<_>>().join(" ");
        if collapsed != trimmed {
            log.record_cleaning(
                FULL_ADDRESS,
                trimmed,
                collapsed.as_str(),
                "Collapsed repeated whitespace",
                OperationType::Cleaning,
            );
            found += 1;
        }
        context.set_text(collapsed);
        found
    }
}

/// Periods dropped from abbreviations such as `St.` or `N.`.
pub struct PunctuationDetector;

impl Detector for PunctuationDetector {
    fn name(&self) -> &'static str {
        "punctuation"
    }

    fn detect(&self, context: &mut DetectionContext<'_>, log: &mut TransformationLog) -> usize {
        let mut found = 0;
        for captures in ABBREVIATION_PERIOD.captures_iter(context.text()) {
            let word = &captures[1];
            let Some(field) = field_holding_token(context.record(), word) else {
                continue;
            };
            log.record_cleaning(
                field.as_str(),
                &captures[0],
                word,
                "Removed abbreviation period",
                OperationType::Formatting,
            );
            found += 1;
        }
        found
    }
}

fn field_holding_token(record: &AddressRecord, word: &str) -> Option<AddressField> {
    let dotted = format!("{word}.");
    record
        .components()
        .find(|(_, value)| {
            let mut tokens = value.split_whitespace();
            tokens.clone().any(|token| token == word) && !tokens.any(|token| token == dotted)
        })
        .map(|(field, _)| field)
}

/// State names mapped to abbreviations, and abbreviations upper-cased.
pub struct StateNameDetector;

impl Detector for StateNameDetector {
    fn name(&self) -> &'static str {
        "state_name"
    }

    fn detect(&self, context: &mut DetectionContext<'_>, log: &mut TransformationLog) -> usize {
        let Some(abbrev) = context.record().state_name() else {
            return 0;
        };
        let Some(patterns) = STATE_PATTERNS.get(abbrev.trim().to_ascii_uppercase().as_str())
        else {
            return 0;
        };
        let text = context.text();
        let spellings: Vec<&str> =
            patterns.abbreviation.find_iter(text).map(|found| found.as_str()).collect();
        if spellings.contains(&abbrev) {
            return 0;
        }

        if let Some(&found) = spellings.last() {
            log.record_cleaning(
                AddressField::StateName.as_str(),
                found,
                abbrev,
                "Upper-cased state abbreviation",
                OperationType::Normalization,
            );
            return 1;
        }

        for name in &patterns.names {
            if let Some(found) = name.find_iter(text).last() {
                log.record_cleaning(
                    AddressField::StateName.as_str(),
                    found.as_str(),
                    abbrev,
                    "Abbreviated state name",
                    OperationType::Normalization,
                );
                return 1;
            }
        }
        0
    }
}

/// ZIP+4 hyphenation, restored leading zeros and spacing around the hyphen.
pub struct ZipFormatDetector;

impl Detector for ZipFormatDetector {
    fn name(&self) -> &'static str {
        "zip_format"
    }

    fn detect(&self, context: &mut DetectionContext<'_>, log: &mut TransformationLog) -> usize {
        let Some(zip) = context.record().zip() else {
            return 0;
        };
        let Some(candidate) = ZIP_CANDIDATE.find_iter(context.text()).last() else {
            return 0;
        };
        let original = candidate.as_str();
        let compact: String = original.chars().filter(|c| !c.is_whitespace()).collect();
        let Ok(parsed) = parse_zip(&compact) else {
            return 0;
        };
        // The last number in the input is not the ZIP the record holds.
        if &parsed.zip != zip {
            return 0;
        }
        let normalized = zip.full();
        if original == normalized {
            return 0;
        }
        let (message, operation) = if parsed.hyphenated {
            ("Hyphenated ZIP+4", OperationType::Formatting)
        } else if parsed.padded {
            ("Restored leading zeros to ZIP code", OperationType::Normalization)
        } else {
            ("Reformatted ZIP code", OperationType::Formatting)
        };
        log.record_cleaning(
            AddressField::ZipCode.as_str(),
            original,
            normalized.as_str(),
            message,
            operation,
        );
        1
    }
}

/// Empty segments and irregular spacing around commas.
pub struct CommaSegmentDetector;

impl Detector for CommaSegmentDetector {
    fn name(&self) -> &'static str {
        "comma_segments"
    }

    fn detect(&self, context: &mut DetectionContext<'_>, log: &mut TransformationLog) -> usize {
        let before = context.text().to_string();
        let segments: Vec<&str> = before.split(',').map(str::trim).collect();
        let has_empty = segments.iter().any(|segment| segment.is_empty());
        let after = segments
            .into_iter()
            .filter(|segment| !segment.is_empty())
            .collect::<Vec<_>>()
            .join(", ");
        if after == before {
            return 0;
        }
        let message = if has_empty {
            "Removed empty comma-separated segments"
        } else {
            "Normalized spacing around commas"
        };
        log.record_cleaning(
            FULL_ADDRESS,
            before.as_str(),
            after.as_str(),
            message,
            OperationType::Formatting,
        );
        context.set_text(after);
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pairs: &[(AddressField, &str)]) -> AddressRecord {
        AddressRecord::from_components(pairs.iter().map(|(field, value)| (*field, *value))).unwrap()
    }

    fn run(detector: &dyn Detector, record: &AddressRecord, raw: &str) -> TransformationLog {
        let mut log = TransformationLog::new();
        let mut context = DetectionContext::new(record, raw);
        detector.detect(&mut context, &mut log);
        log
    }

    #[test]
    fn whitespace_trim_and_collapse_are_separate_entries() {
        let rec = record(&[(AddressField::StreetName, "Main")]);
        let log = run(&WhitespaceDetector, &rec, "  123  Main St ");
        let messages: Vec<_> = log.cleaning().iter().map(|entry| entry.message()).collect();
        assert_eq!(messages, ["Trimmed surrounding whitespace", "Collapsed repeated whitespace"]);
        assert_eq!(log.cleaning()[1].new_value(), Some("123 Main St"));
    }

    #[test]
    fn abbreviation_periods_point_at_their_field() {
        let rec = record(&[
            (AddressField::StreetNamePreDirectional, "N"),
            (AddressField::StreetName, "Lamar"),
            (AddressField::StreetNamePostType, "Blvd"),
        ]);
        let log = run(&PunctuationDetector, &rec, "100 N. Lamar Blvd.");
        let fields: Vec<_> = log.cleaning().iter().map(|entry| entry.field()).collect();
        assert_eq!(fields, ["StreetNamePreDirectional", "StreetNamePostType"]);
    }

    #[test]
    fn state_abbreviation_case_is_reported() {
        let rec = record(&[(AddressField::StateName, "TX")]);
        let log = run(&StateNameDetector, &rec, "Austin tx 78749");
        assert_eq!(log.cleaning()[0].original(), "tx");
        assert_eq!(log.cleaning()[0].message(), "Upper-cased state abbreviation");
    }

    #[test]
    fn state_abbreviation_in_input_wins_over_street_names() {
        let rec = record(&[
            (AddressField::StreetName, "Washington"),
            (AddressField::StateName, "WA"),
        ]);
        assert!(run(&StateNameDetector, &rec, "1 Washington Ave, Seattle WA").is_empty());
    }

    #[test]
    fn multi_word_state_names_match_across_spaces() {
        let rec = record(&[(AddressField::StateName, "NY")]);
        let log = run(&StateNameDetector, &rec, "New York, new york 10001");
        assert_eq!(log.cleaning()[0].original(), "new york");
    }

    #[test]
    fn every_abbreviation_has_compiled_patterns() {
        assert_eq!(STATE_PATTERNS.len(), states::abbreviations().count());
        assert!(STATE_PATTERNS.values().all(|patterns| !patterns.names.is_empty()));
    }

    #[test]
    fn dotted_alias_is_abbreviated() {
        let rec = record(&[(AddressField::StateName, "VI")]);
        let log = run(&StateNameDetector, &rec, "St Thomas, U.S. Virgin Islands 00802");
        assert_eq!(log.cleaning()[0].original(), "U.S. Virgin Islands");
        let again = run(&StateNameDetector, &rec, "St Thomas, U.S. Virgin Islands 00802");
        assert_eq!(again.cleaning()[0].original(), log.cleaning()[0].original());
    }

    #[test]
    fn continuous_zip_plus_four_is_hyphenated() {
        let rec = record(&[(AddressField::ZipCode, "787491234")]);
        let log = run(&ZipFormatDetector, &rec, "Austin TX 787491234");
        let entry = &log.cleaning()[0];
        assert_eq!(entry.original(), "787491234");
        assert_eq!(entry.new_value(), Some("78749-1234"));
        assert_eq!(entry.operation(), Some("formatting"));
    }

    #[test]
    fn padded_zip_is_reported() {
        let rec = record(&[(AddressField::ZipCode, "2108")]);
        let log = run(&ZipFormatDetector, &rec, "12 Beacon St, Boston MA 2108");
        assert_eq!(log.cleaning()[0].new_value(), Some("02108"));
        assert_eq!(log.cleaning()[0].operation(), Some("normalization"));
    }

    #[test]
    fn house_numbers_are_not_mistaken_for_zips() {
        let rec = record(&[(AddressField::ZipCode, "78749")]);
        assert!(run(&ZipFormatDetector, &rec, "12345 Hwy 290, Austin TX 78749").is_empty());
    }

    #[test]
    fn comma_cleanup_reports_empty_segments() {
        let rec = record(&[(AddressField::StreetName, "Main")]);
        let log = run(&CommaSegmentDetector, &rec, "123 Main St,, Austin ,TX");
        let entry = &log.cleaning()[0];
        assert_eq!(entry.message(), "Removed empty comma-separated segments");
        assert_eq!(entry.new_value(), Some("123 Main St, Austin, TX"));
    }
}
