//! The parse lifecycle shared by every adapter.

use std::sync::atomic::{AtomicU64, Ordering};

use addr_model::{ParseFailure, ParseOutcome, ParseSource};

use crate::error::BackendError;

/// Uniform parsing contract the orchestrator depends on.
pub trait AddressParser: Send + Sync {
    fn name(&self) -> &str;

    fn source(&self) -> ParseSource;

    /// Never fails: problems come back as a failed outcome.
    fn parse(&self, input: &str) -> ParseOutcome;

    /// One outcome per input, in input order.
    fn parse_batch(&self, inputs: &[&str]) -> Vec<ParseOutcome> {
        inputs.iter().map(|input| self.parse(input)).collect()
    }

    fn stats(&self) -> StatsSnapshot;

    fn reset_stats(&self);
}

/// The two steps an adapter supplies; [`AddressParser`] is implemented for
/// every `BackendAdapter` and runs them in order:
/// reject blank input, [`invoke`](Self::invoke), [`build`](Self::build).
pub trait BackendAdapter: Send + Sync {
    /// Backend output handed from `invoke` to `build`.
    type Raw;

    fn backend_name(&self) -> &str;

    fn source(&self) -> ParseSource;

    fn counters(&self) -> &ParserStats;

    /// Calls the backend with trimmed, non-empty input.
    ///
    /// # Errors
    ///
    /// The failure recorded on the outcome.
    fn invoke(&self, input: &str) -> Result<Self::Raw, ParseFailure>;

    /// Maps backend output onto records and wraps them in an outcome.
    ///
    /// # Errors
    ///
    /// The failure recorded on the outcome.
    fn build(&self, raw_input: &str, raw: Self::Raw) -> Result<ParseOutcome, ParseFailure>;

    fn backend_failure(&self, error: BackendError) -> ParseFailure {
        let backend = self.backend_name().to_string();
        match error {
            BackendError::Unavailable { reason } => {
                ParseFailure::BackendUnavailable { backend, reason }
            }
            BackendError::Timeout { millis } => ParseFailure::Timeout { backend, millis },
            BackendError::NoMatch => ParseFailure::NoComponents { backend },
            other => ParseFailure::Backend {
                backend,
                message: other.to_string(),
            },
        }
    }
}

impl<T: BackendAdapter> AddressParser for T {
    fn name(&self) -> &str {
        self.backend_name()
    }

    fn source(&self) -> ParseSource {
        BackendAdapter::source(self)
    }

    fn parse(&self, input: &str) -> ParseOutcome {
        let stats = self.counters();
        stats.record_parse();

        let trimmed = input.trim();
        let result = if trimmed.is_empty() {
            Err(ParseFailure::EmptyInput)
        } else {
            self.invoke(trimmed)
                .and_then(|raw| self.build(input, raw))
        };

        match result {
            Ok(outcome) => outcome,
            Err(failure) => {
                stats.record_error();
                tracing::debug!(backend = self.backend_name(), %failure, "parse failed");
                ParseOutcome::failed(input, BackendAdapter::source(self), failure)
            }
        }
    }

    fn stats(&self) -> StatsSnapshot {
        self.counters().snapshot()
    }

    fn reset_stats(&self) {
        self.counters().reset();
    }
}

/// Parse and error counters, safe to bump from concurrent batch workers.
#[derive(Debug, Default)]
pub struct ParserStats {
    parses: AtomicU64,
    errors: AtomicU64,
}

impl ParserStats {
    pub fn record_parse(&self) {
        self.parses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_error(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            parse_count: self.parses.load(Ordering::Relaxed),
            error_count: self.errors.load(Ordering::Relaxed),
        }
    }

    pub fn reset(&self) {
        self.parses.store(0, Ordering::Relaxed);
        self.errors.store(0, Ordering::Relaxed);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatsSnapshot {
    pub parse_count: u64,
    pub error_count: u64,
}

impl StatsSnapshot {
    pub fn success_count(&self) -> u64 {
        self.parse_count.saturating_sub(self.error_count)
    }
}
