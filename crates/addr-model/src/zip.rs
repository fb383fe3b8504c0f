//! ZIP code normalization.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{AddressError, Result};

/// A validated ZIP code: five digits plus an optional four digit extension.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ZipCode {
    zip5: String,
    zip4: Option<String>,
}

impl ZipCode {
    pub fn zip5(&self) -> &str {
        &self.zip5
    }

    pub fn zip4(&self) -> Option<&str> {
        self.zip4.as_deref()
    }

    /// `12345` or `12345-6789`.
    pub fn full(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ZipCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.zip4 {
            Some(zip4) => write!(f, "{}-{}", self.zip5, zip4),
            None => f.write_str(&self.zip5),
        }
    }
}

/// Result of [`parse_zip`], noting what was changed to reach the canonical form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedZip {
    pub zip: ZipCode,
    /// Leading zeros were restored.
    pub padded: bool,
    /// A continuous nine digit value was split into ZIP+4.
    pub hyphenated: bool,
}

/// Parses `12345`, `12345-6789`, `123456789`, or a 3-4 digit ZIP that lost its
/// leading zeros.
///
/// # Errors
///
/// Returns [`AddressError::InvalidZip`] when either part is malformed.
pub fn parse_zip(raw: &str) -> Result<ParsedZip> {
    let value = raw.trim();
    let invalid = |reason: &str| AddressError::InvalidZip {
        value: value.to_string(),
        reason: reason.to_string(),
    };

    let (head, tail, hyphenated) = match value.split_once('-') {
        Some((head, tail)) => (head.trim(), Some(tail.trim()), false),
        None if value.len() == 9 && is_digits(value) => (&value[..5], Some(&value[5..]), true),
        None => (value, None, false),
    };

    if !is_digits(head) {
        return Err(invalid("ZIP5 must be numeric"));
    }
    let (zip5, padded) = match head.len() {
        5 => (head.to_string(), false),
        3 | 4 => (format!("{head:0>5}"), true),
        _ => return Err(invalid("ZIP5 must be exactly 5 digits")),
    };

    let zip4 = match tail {
        Some(tail) if tail.len() == 4 && is_digits(tail) => Some(tail.to_string()),
        Some(_) => return Err(invalid("ZIP+4 extension must be exactly 4 digits")),
        None => None,
    };

    Ok(ParsedZip {
        zip: ZipCode { zip5, zip4 },
        padded,
        hyphenated,
    })
}

fn is_digits(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_and_extended() {
        let parsed = parse_zip("78749").unwrap();
        assert_eq!(parsed.zip.zip5(), "78749");
        assert_eq!(parsed.zip.zip4(), None);

        let parsed = parse_zip("78749-1234").unwrap();
        assert_eq!(parsed.zip.full(), "78749-1234");
        assert!(!parsed.hyphenated);
    }

    #[test]
    fn splits_continuous_nine_digits() {
        let parsed = parse_zip("787491234").unwrap();
        assert_eq!(parsed.zip.zip5(), "78749");
        assert_eq!(parsed.zip.zip4(), Some("1234"));
        assert!(parsed.hyphenated);
    }

    #[test]
    fn pads_short_zips() {
        let parsed = parse_zip("2134").unwrap();
        assert_eq!(parsed.zip.zip5(), "02134");
        assert!(parsed.padded);
    }

    #[test]
    fn rejects_malformed_parts() {
        assert!(parse_zip("78749-12").is_err());
        assert!(parse_zip("7874A").is_err());
        assert!(parse_zip("12").is_err());
        assert!(parse_zip("").is_err());
    }
}
