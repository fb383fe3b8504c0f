//! Adapter for international backends, with a per-call timeout.

use std::collections::BTreeMap;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use addr_model::{
    FieldError, InternationalAddressRecord, ParseFailure, ParseOutcome, ParseSource,
    ValidationVerdict,
};
use addr_standards::countries;

use crate::adapter::{BackendAdapter, ParserStats};
use crate::backend::{Availability, InternationalBackend, LabeledToken, UnavailableBackend};
use crate::error::BackendError;

/// Default per-call timeout for international backends.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Parses any-country addresses through an [`InternationalBackend`].
///
/// Outcomes carry a verdict for the acceptance rule: a road plus at least one
/// of city, region, postal code or country. A record that misses it is still
/// returned, marked invalid.
pub struct InternationalParser {
    backend: Arc<dyn InternationalBackend>,
    timeout: Duration,
    stats: ParserStats,
}

impl std::fmt::Debug for InternationalParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InternationalParser")
            .field("backend", &self.backend.name())
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl Default for InternationalParser {
    fn default() -> Self {
        Self::new(Arc::new(UnavailableBackend))
    }
}

impl InternationalParser {
    pub fn new(backend: Arc<dyn InternationalBackend>) -> Self {
        Self {
            backend,
            timeout: DEFAULT_TIMEOUT,
            stats: ParserStats::default(),
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn availability(&self) -> Availability {
        self.backend.availability()
    }

    pub fn is_available(&self) -> bool {
        self.availability().is_available()
    }
}

impl BackendAdapter for InternationalParser {
    type Raw = Vec<LabeledToken>;

    fn backend_name(&self) -> &str {
        self.backend.name()
    }

    fn source(&self) -> ParseSource {
        ParseSource::International
    }

    fn counters(&self) -> &ParserStats {
        &self.stats
    }

    fn invoke(&self, input: &str) -> Result<Self::Raw, ParseFailure> {
        if let Availability::Unavailable { reason } = self.availability() {
            return Err(ParseFailure::BackendUnavailable {
                backend: self.backend_name().to_string(),
                reason,
            });
        }
        let tokens = call_with_timeout(&self.backend, input, self.timeout)
            .map_err(|error| self.backend_failure(error))?;
        if tokens.is_empty() {
            return Err(ParseFailure::NoComponents {
                backend: self.backend_name().to_string(),
            });
        }
        Ok(tokens)
    }

    fn build(&self, raw_input: &str, raw: Self::Raw) -> Result<ParseOutcome, ParseFailure> {
        let mut components: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for token in raw {
            let label = token.label.trim().to_lowercase();
            let value = token.text.trim();
            if label.is_empty() || value.is_empty() {
                continue;
            }
            components.entry(label).or_default().push(value.to_string());
        }
        if components.is_empty() {
            return Err(ParseFailure::NoComponents {
                backend: self.backend_name().to_string(),
            });
        }

        let country_code = first_value(&components, "country_code")
            .map(str::to_uppercase)
            .or_else(|| {
                first_value(&components, "country")
                    .and_then(countries::country_code)
                    .map(str::to_string)
            });
        let record = InternationalAddressRecord::from_components(components, country_code);
        let verdict = acceptance_verdict(&record);
        if !verdict.is_valid() {
            tracing::debug!(
                backend = self.backend_name(),
                missing = ?record.missing_for_acceptance(),
                "international record does not meet the acceptance rule"
            );
        }
        Ok(ParseOutcome::international(raw_input, record).with_validation(verdict))
    }
}

fn first_value<'a>(components: &'a BTreeMap<String, Vec<String>>, label: &str) -> Option<&'a str> {
    components
        .get(label)
        .and_then(|values| values.first())
        .map(String::as_str)
}

fn acceptance_verdict(record: &InternationalAddressRecord) -> ValidationVerdict {
    let errors = record
        .missing_for_acceptance()
        .into_iter()
        .map(|part| match part {
            "road" => FieldError::new("road", "International address missing road component", None),
            _ => FieldError::new(
                "location",
                "International address missing location components",
                None,
            ),
        })
        .collect();
    ValidationVerdict::from_errors(errors)
}

/// Runs the backend on a worker thread and stops waiting after `timeout`.
/// A backend that overruns is left to finish on its own.
fn call_with_timeout(
    backend: &Arc<dyn InternationalBackend>,
    input: &str,
    timeout: Duration,
) -> Result<Vec<LabeledToken>, BackendError> {
    let (sender, receiver) = mpsc::sync_channel(1);
    let worker_backend = Arc::clone(backend);
    let owned_input = input.to_string();
    thread::Builder::new()
        .name("intl-parse".to_string())
        .spawn(move || {
            // The receiver is gone when the caller already timed out.
            let _ = sender.send(worker_backend.parse(&owned_input));
        })
        .map_err(|e| BackendError::Failed(format!("failed to start backend worker: {e}")))?;

    match receiver.recv_timeout(timeout) {
        Ok(result) => result,
        Err(RecvTimeoutError::Timeout) => Err(BackendError::Timeout {
            millis: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        }),
        Err(RecvTimeoutError::Disconnected) => Err(BackendError::Failed(
            "backend worker stopped without a result".to_string(),
        )),
    }
}
