//! Names of countries outside the US, used to spot international input.

/// Lower-case names and common aliases with their ISO 3166-1 alpha-2 codes.
pub const COUNTRIES: [(&str, &str); 40] = [
    ("united kingdom", "GB"),
    ("great britain", "GB"),
    ("uk", "GB"),
    ("england", "GB"),
    ("scotland", "GB"),
    ("wales", "GB"),
    ("northern ireland", "GB"),
    ("ireland", "IE"),
    ("germany", "DE"),
    ("deutschland", "DE"),
    ("france", "FR"),
    ("japan", "JP"),
    ("russia", "RU"),
    ("россия", "RU"),
    ("india", "IN"),
    ("australia", "AU"),
    ("new zealand", "NZ"),
    ("brazil", "BR"),
    ("canada", "CA"),
    ("mexico", "MX"),
    ("méxico", "MX"),
    ("spain", "ES"),
    ("españa", "ES"),
    ("portugal", "PT"),
    ("italy", "IT"),
    ("netherlands", "NL"),
    ("belgium", "BE"),
    ("switzerland", "CH"),
    ("austria", "AT"),
    ("poland", "PL"),
    ("sweden", "SE"),
    ("norway", "NO"),
    ("denmark", "DK"),
    ("finland", "FI"),
    ("china", "CN"),
    ("south korea", "KR"),
    ("singapore", "SG"),
    ("south africa", "ZA"),
    ("united arab emirates", "AE"),
    ("uae", "AE"),
];

/// Spellings that name the US itself.
pub const DOMESTIC_NAMES: [&str; 5] = [
    "united states",
    "united states of america",
    "usa",
    "u.s.a.",
    "us",
];

/// ISO code for a country name or alias, ignoring case and extra spaces.
pub fn country_code(name: &str) -> Option<&'static str> {
    let name = normalize(name);
    COUNTRIES
        .iter()
        .find(|(country, _)| *country == name)
        .map(|(_, code)| *code)
}

pub fn is_domestic_name(name: &str) -> bool {
    let name = normalize(name);
    DOMESTIC_NAMES.contains(&name.as_str())
}

/// The country named in `text` as whole words, if any. Longer names win, so
/// "northern ireland" is not reported as Ireland.
pub fn find_country(text: &str) -> Option<(&'static str, &'static str)> {
    let words = words(text);
    let mut best: Option<(usize, (&'static str, &'static str))> = None;
    for entry in COUNTRIES {
        let needle: Vec<&str> = entry.0.split(' ').collect();
        let found = words
            .windows(needle.len())
            .any(|window| window.iter().zip(&needle).all(|(word, part)| word.as_str() == *part));
        if found && best.is_none_or(|(len, _)| needle.len() > len) {
            best = Some((needle.len(), entry));
        }
    }
    best.map(|(_, entry)| entry)
}

/// True when `text` names the US as whole words.
pub fn mentions_domestic_country(text: &str) -> bool {
    let words = words(text);
    let joined = words.join(" ");
    words.iter().any(|word| word == "usa" || word == "u.s.a.")
        || joined.contains("united states")
}

fn normalize(value: &str) -> String {
    value
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn words(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| c.is_whitespace() || c == ',' || c == ';')
        .filter(|word| !word.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_resolve_from_aliases() {
        assert_eq!(country_code("United Kingdom"), Some("GB"));
        assert_eq!(country_code(" UK "), Some("GB"));
        assert_eq!(country_code("Atlantis"), None);
    }

    #[test]
    fn finds_whole_word_mentions_only() {
        assert_eq!(find_country("10 Downing St, London, UK").map(|c| c.1), Some("GB"));
        assert_eq!(find_country("1 Dukes Rd, Austin TX"), None);
        assert_eq!(
            find_country("2 Main St, Belfast, Northern Ireland").map(|c| c.0),
            Some("northern ireland")
        );
    }

    #[test]
    fn domestic_mentions() {
        assert!(mentions_domestic_country("123 Main St, Austin TX, USA"));
        assert!(mentions_domestic_country("Austin, Texas, United States"));
        assert!(!mentions_domestic_country("Paris, France"));
        assert!(is_domestic_name("U.S.A."));
    }
}
