//! US state and territory names.

use crate::error::StateError;

/// The 50 states and the District of Columbia.
pub const STATES: [(&str, &str); 51] = [
    ("AL", "Alabama"),
    ("AK", "Alaska"),
    ("AZ", "Arizona"),
    ("AR", "Arkansas"),
    ("CA", "California"),
    ("CO", "Colorado"),
    ("CT", "Connecticut"),
    ("DE", "Delaware"),
    ("DC", "District of Columbia"),
    ("FL", "Florida"),
    ("GA", "Georgia"),
    ("HI", "Hawaii"),
    ("ID", "Idaho"),
    ("IL", "Illinois"),
    ("IN", "Indiana"),
    ("IA", "Iowa"),
    ("KS", "Kansas"),
    ("KY", "Kentucky"),
    ("LA", "Louisiana"),
    ("ME", "Maine"),
    ("MD", "Maryland"),
    ("MA", "Massachusetts"),
    ("MI", "Michigan"),
    ("MN", "Minnesota"),
    ("MS", "Mississippi"),
    ("MO", "Missouri"),
    ("MT", "Montana"),
    ("NE", "Nebraska"),
    ("NV", "Nevada"),
    ("NH", "New Hampshire"),
    ("NJ", "New Jersey"),
    ("NM", "New Mexico"),
    ("NY", "New York"),
    ("NC", "North Carolina"),
    ("ND", "North Dakota"),
    ("OH", "Ohio"),
    ("OK", "Oklahoma"),
    ("OR", "Oregon"),
    ("PA", "Pennsylvania"),
    ("RI", "Rhode Island"),
    ("SC", "South Carolina"),
    ("SD", "South Dakota"),
    ("TN", "Tennessee"),
    ("TX", "Texas"),
    ("UT", "Utah"),
    ("VT", "Vermont"),
    ("VA", "Virginia"),
    ("WA", "Washington"),
    ("WV", "West Virginia"),
    ("WI", "Wisconsin"),
    ("WY", "Wyoming"),
];

/// Inhabited territories that receive ZIP codes.
pub const TERRITORIES: [(&str, &str); 5] = [
    ("PR", "Puerto Rico"),
    ("VI", "Virgin Islands"),
    ("GU", "Guam"),
    ("AS", "American Samoa"),
    ("MP", "Northern Mariana Islands"),
];

/// Alternate spellings that map onto a table entry.
const ALIASES: [(&str, &str); 3] = [
    ("US Virgin Islands", "VI"),
    ("U.S. Virgin Islands", "VI"),
    ("Washington DC", "DC"),
];

fn all_entries() -> impl Iterator<Item = (&'static str, &'static str)> {
    STATES.iter().chain(TERRITORIES.iter()).copied()
}

fn collapse(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Every known abbreviation, states first.
pub fn abbreviations() -> impl Iterator<Item = &'static str> {
    all_entries().map(|(abbrev, _)| abbrev)
}

pub fn is_abbreviation(value: &str) -> bool {
    let value = value.trim();
    abbreviations().any(|abbrev| abbrev.eq_ignore_ascii_case(value))
}

/// Abbreviation for a full name or alias, ignoring case and extra spaces.
pub fn abbreviation_for_name(name: &str) -> Option<&'static str> {
    let name = collapse(name);
    all_entries()
        .find(|(_, full)| full.eq_ignore_ascii_case(&name))
        .or_else(|| {
            ALIASES
                .iter()
                .copied()
                .find(|(alias, _)| alias.eq_ignore_ascii_case(&name))
                .map(|(alias, abbrev)| (abbrev, alias))
        })
        .map(|(abbrev, _)| abbrev)
}

pub fn name_for_abbreviation(abbrev: &str) -> Option<&'static str> {
    let abbrev = abbrev.trim();
    all_entries()
        .find(|(code, _)| code.eq_ignore_ascii_case(abbrev))
        .map(|(_, name)| name)
}

/// Full names and aliases that map to `abbrev`, longest first.
pub fn names_for(abbrev: &str) -> Vec<&'static str> {
    let abbrev = abbrev.trim();
    let mut names: Vec<&'static str> = all_entries()
        .filter(|(code, _)| code.eq_ignore_ascii_case(abbrev))
        .map(|(_, name)| name)
        .chain(
            ALIASES
                .iter()
                .filter(|(_, code)| code.eq_ignore_ascii_case(abbrev))
                .map(|(alias, _)| *alias),
        )
        .collect();
    names.sort_by_key(|name| std::cmp::Reverse(name.len()));
    names
}

/// Canonical upper-case abbreviation for an abbreviation or full name.
///
/// # Errors
///
/// [`StateError::Unrecognized`] when the value names no state or territory.
pub fn normalize_state(value: &str) -> Result<&'static str, StateError> {
    let trimmed = value.trim();
    abbreviations()
        .find(|abbrev| abbrev.eq_ignore_ascii_case(trimmed))
        .or_else(|| abbreviation_for_name(trimmed))
        .ok_or_else(|| StateError::Unrecognized {
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_names_and_abbreviations() {
        assert_eq!(normalize_state("Texas"), Ok("TX"));
        assert_eq!(normalize_state("tx"), Ok("TX"));
        assert_eq!(normalize_state("  new   york "), Ok("NY"));
        assert_eq!(normalize_state("us virgin islands"), Ok("VI"));
        assert!(normalize_state("Atlantis").is_err());
    }

    #[test]
    fn names_for_lists_aliases_longest_first() {
        assert_eq!(
            names_for("VI"),
            ["U.S. Virgin Islands", "US Virgin Islands", "Virgin Islands"]
        );
        assert_eq!(names_for("TX"), ["Texas"]);
    }

    #[test]
    fn territories_are_abbreviations() {
        assert!(is_abbreviation("pr"));
        assert_eq!(name_for_abbreviation("GU"), Some("Guam"));
        assert_eq!(abbreviations().count(), 56);
    }
}
