//! Append-only audit trail of normalization steps.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const OPERATION_TYPE_KEY: &str = "operation_type";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Cleaning,
    Error,
}

impl EntryKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cleaning => "cleaning",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category of a cleaning step, stored in the entry context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationType {
    Normalization,
    Formatting,
    Expansion,
    Cleaning,
    Parsing,
}

impl OperationType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Normalization => "normalization",
            Self::Formatting => "formatting",
            Self::Expansion => "expansion",
            Self::Cleaning => "cleaning",
            Self::Parsing => "parsing",
        }
    }
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single recorded transformation or validation failure.
///
/// Entries are built once and then handed to a [`TransformationLog`], which
/// only gives out shared references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformationEntry {
    kind: EntryKind,
    field: String,
    message: String,
    original: String,
    new_value: Option<String>,
    timestamp: DateTime<Utc>,
    context: BTreeMap<String, String>,
}

impl TransformationEntry {
    pub fn cleaning(
        field: impl Into<String>,
        original: impl Into<String>,
        new_value: impl Into<String>,
        message: impl Into<String>,
        operation: OperationType,
    ) -> Self {
        Self::new(
            EntryKind::Cleaning,
            field.into(),
            message.into(),
            original.into(),
            Some(new_value.into()),
        )
        .with_context(OPERATION_TYPE_KEY, operation.as_str())
    }

    pub fn error(
        field: impl Into<String>,
        message: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::new(
            EntryKind::Error,
            field.into(),
            message.into(),
            value.into(),
            None,
        )
    }

    fn new(
        kind: EntryKind,
        field: String,
        message: String,
        original: String,
        new_value: Option<String>,
    ) -> Self {
        Self {
            kind,
            field,
            message,
            original,
            new_value,
            timestamp: Utc::now(),
            context: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn original(&self) -> &str {
        &self.original
    }

    pub fn new_value(&self) -> Option<&str> {
        self.new_value.as_deref()
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn context(&self) -> &BTreeMap<String, String> {
        &self.context
    }

    pub fn operation(&self) -> Option<&str> {
        self.context.get(OPERATION_TYPE_KEY).map(String::as_str)
    }
}

/// Cleaning entries and errors, each kept in the order they were appended.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransformationLog {
    cleaning: Vec<TransformationEntry>,
    errors: Vec<TransformationEntry>,
}

impl TransformationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: TransformationEntry) {
        match entry.kind {
            EntryKind::Cleaning => self.cleaning.push(entry),
            EntryKind::Error => self.errors.push(entry),
        }
    }

    pub fn record_cleaning(
        &mut self,
        field: impl Into<String>,
        original: impl Into<String>,
        new_value: impl Into<String>,
        message: impl Into<String>,
        operation: OperationType,
    ) {
        self.push(TransformationEntry::cleaning(
            field, original, new_value, message, operation,
        ));
    }

    pub fn record_error(
        &mut self,
        field: impl Into<String>,
        message: impl Into<String>,
        value: impl Into<String>,
    ) {
        self.push(TransformationEntry::error(field, message, value));
    }

    /// Moves every entry of `other` to the end of this log, keeping its order.
    pub fn append(&mut self, other: TransformationLog) {
        self.cleaning.extend(other.cleaning);
        self.errors.extend(other.errors);
    }

    pub fn cleaning(&self) -> &[TransformationEntry] {
        &self.cleaning
    }

    pub fn errors(&self) -> &[TransformationEntry] {
        &self.errors
    }

    /// All entries, cleaning first, then errors.
    pub fn entries(&self) -> impl Iterator<Item = &TransformationEntry> {
        self.cleaning.iter().chain(self.errors.iter())
    }

    pub fn len(&self) -> usize {
        self.cleaning.len() + self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cleaning.is_empty() && self.errors.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_are_routed_by_kind() {
        let mut log = TransformationLog::new();
        log.record_cleaning(
            "StateName",
            "texas",
            "TX",
            "State name abbreviated",
            OperationType::Normalization,
        );
        log.record_error("ZipCode", "Invalid US ZIP code: 99999", "99999");
        log.record_cleaning(
            "ZipCode",
            "787491234",
            "78749-1234",
            "ZIP+4 hyphenated",
            OperationType::Formatting,
        );

        assert_eq!(log.cleaning().len(), 2);
        assert_eq!(log.errors().len(), 1);
        assert_eq!(log.len(), 3);
        assert_eq!(log.cleaning()[1].field(), "ZipCode");
        assert_eq!(log.cleaning()[0].operation(), Some("normalization"));
        assert_eq!(log.errors()[0].new_value(), None);
    }

    #[test]
    fn identical_records_are_kept() {
        let mut log = TransformationLog::new();
        for _ in 0..2 {
            log.record_cleaning(
                "StreetName",
                " Main",
                "Main",
                "Whitespace trimmed",
                OperationType::Cleaning,
            );
        }
        assert_eq!(log.cleaning().len(), 2);
    }
}
