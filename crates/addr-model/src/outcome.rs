//! The result of parsing one input string.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::international::{InternationalAddressRecord, InternationalView};
use crate::log::{TransformationEntry, TransformationLog};
use crate::record::{AddressRecord, AddressView, OUTPUT_COLUMNS};
use crate::verdict::ValidationVerdict;

/// Which backend produced the record an outcome carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ParseSource {
    #[serde(rename = "us")]
    Domestic,
    #[serde(rename = "international")]
    International,
}

impl ParseSource {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Domestic => "us",
            Self::International => "international",
        }
    }
}

impl fmt::Display for ParseSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a parse produced no usable record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ParseFailure {
    #[error("empty address input")]
    EmptyInput,

    #[error("{backend} backend failed: {message}")]
    Backend { backend: String, message: String },

    #[error("{backend} backend is unavailable: {reason}")]
    BackendUnavailable { backend: String, reason: String },

    #[error("{backend} backend timed out after {millis} ms")]
    Timeout { backend: String, millis: u64 },

    #[error("no components parsed by {backend} backend")]
    NoComponents { backend: String },

    #[error("could not build address record: {message}")]
    Construction { message: String },
}

impl ParseFailure {
    /// True when the backend could not be reached at all, as opposed to
    /// answering with nothing useful.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::BackendUnavailable { .. } | Self::Timeout { .. })
    }
}

/// Component a log entry came from when logs are aggregated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LogSource {
    #[serde(rename = "parse_result")]
    ParseOutcome,
    #[serde(rename = "address")]
    Address,
    #[serde(rename = "international_address")]
    InternationalAddress,
}

impl LogSource {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ParseOutcome => "parse_result",
            Self::Address => "address",
            Self::InternationalAddress => "international_address",
        }
    }
}

/// One line of an aggregated audit trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditRow {
    pub source: LogSource,
    pub kind: &'static str,
    pub field: String,
    pub message: String,
    pub original: String,
    pub new_value: Option<String>,
    pub timestamp: String,
    pub context: BTreeMap<String, String>,
}

impl AuditRow {
    fn from_entry(source: LogSource, entry: &TransformationEntry) -> Self {
        Self {
            source,
            kind: entry.kind().as_str(),
            field: entry.field().to_string(),
            message: entry.message().to_string(),
            original: entry.original().to_string(),
            new_value: entry.new_value().map(str::to_string),
            timestamp: entry.timestamp().to_rfc3339(),
            context: entry.context().clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOutcome {
    raw_input: String,
    address: Option<AddressRecord>,
    international: Option<InternationalAddressRecord>,
    failure: Option<ParseFailure>,
    validation: ValidationVerdict,
    source: ParseSource,
    is_international: bool,
    log: TransformationLog,
}

impl ParseOutcome {
    pub fn domestic(raw_input: impl Into<String>, record: AddressRecord) -> Self {
        Self {
            raw_input: raw_input.into(),
            address: Some(record),
            international: None,
            failure: None,
            validation: ValidationVerdict::valid(),
            source: ParseSource::Domestic,
            is_international: false,
            log: TransformationLog::new(),
        }
    }

    /// Carries the international record plus its domestic-schema projection.
    pub fn international(raw_input: impl Into<String>, record: InternationalAddressRecord) -> Self {
        Self {
            raw_input: raw_input.into(),
            address: record.to_address_record().ok(),
            international: Some(record),
            failure: None,
            validation: ValidationVerdict::valid(),
            source: ParseSource::International,
            is_international: true,
            log: TransformationLog::new(),
        }
    }

    /// A failed outcome is never valid, even though its verdict lists no errors.
    pub fn failed(
        raw_input: impl Into<String>,
        source: ParseSource,
        failure: ParseFailure,
    ) -> Self {
        Self {
            raw_input: raw_input.into(),
            address: None,
            international: None,
            failure: Some(failure),
            validation: ValidationVerdict::invalid(Vec::new()),
            source,
            is_international: source == ParseSource::International,
            log: TransformationLog::new(),
        }
    }

    #[must_use]
    pub fn with_validation(mut self, verdict: ValidationVerdict) -> Self {
        self.validation = verdict;
        self
    }

    /// Appends process-level entries after the ones already present.
    #[must_use]
    pub fn with_log(mut self, log: TransformationLog) -> Self {
        self.log.append(log);
        self
    }

    /// Appends `log` to the domestic record's own log, if there is one.
    #[must_use]
    pub fn with_record_log(mut self, log: TransformationLog) -> Self {
        if let Some(record) = self.address.take() {
            self.address = Some(record.with_log(log));
        }
        self
    }

    pub fn raw_input(&self) -> &str {
        &self.raw_input
    }

    pub fn address(&self) -> Option<&AddressRecord> {
        self.address.as_ref()
    }

    pub fn international_address(&self) -> Option<&InternationalAddressRecord> {
        self.international.as_ref()
    }

    pub fn failure(&self) -> Option<&ParseFailure> {
        self.failure.as_ref()
    }

    pub fn validation(&self) -> &ValidationVerdict {
        &self.validation
    }

    pub fn source(&self) -> ParseSource {
        self.source
    }

    pub fn is_international(&self) -> bool {
        self.is_international
    }

    pub fn log(&self) -> &TransformationLog {
        &self.log
    }

    pub fn is_parsed(&self) -> bool {
        self.failure.is_none() && (self.address.is_some() || self.international.is_some())
    }

    pub fn is_valid(&self) -> bool {
        self.is_parsed() && self.validation.is_valid()
    }

    /// Every log entry reachable from this outcome, oldest first.
    ///
    /// Entries with equal timestamps keep their order: process log first, then
    /// the domestic record, then the international record.
    pub fn aggregate(&self) -> Vec<AuditRow> {
        let mut tagged: Vec<(LogSource, &TransformationEntry)> = self
            .log
            .entries()
            .map(|entry| (LogSource::ParseOutcome, entry))
            .collect();
        if let Some(address) = &self.address {
            tagged.extend(address.log().entries().map(|entry| (LogSource::Address, entry)));
        }
        if let Some(international) = &self.international {
            tagged.extend(
                international
                    .log()
                    .entries()
                    .map(|entry| (LogSource::InternationalAddress, entry)),
            );
        }
        tagged.sort_by_key(|(_, entry)| entry.timestamp());
        tagged
            .into_iter()
            .map(|(source, entry)| AuditRow::from_entry(source, entry))
            .collect()
    }

    /// Domestic-shaped column map; every column is `None` when nothing parsed.
    pub fn to_map(&self) -> BTreeMap<String, Option<String>> {
        match &self.address {
            Some(address) => address.to_map(),
            None => empty_map(),
        }
    }

    pub fn view(&self) -> OutcomeView {
        OutcomeView {
            raw_input: self.raw_input.clone(),
            source: self.source,
            is_international: self.is_international,
            is_valid: self.is_valid(),
            error: self.failure.as_ref().map(ToString::to_string),
            address: self.address.as_ref().map(AddressRecord::view),
            international_address: self
                .international
                .as_ref()
                .map(InternationalAddressRecord::view),
            validation: self.validation.clone(),
        }
    }
}

/// All output columns set to `None`.
pub fn empty_map() -> BTreeMap<String, Option<String>> {
    OUTPUT_COLUMNS
        .iter()
        .map(|column| ((*column).to_string(), None))
        .collect()
}

/// External representation of a [`ParseOutcome`], without logs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutcomeView {
    pub raw_input: String,
    pub source: ParseSource,
    pub is_international: bool,
    pub is_valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<AddressView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub international_address: Option<InternationalView>,
    pub validation: ValidationVerdict,
}
