//! The normalization orchestrator.

use std::collections::BTreeMap;
use std::sync::Arc;

use addr_model::{
    AddressError, AddressRecord, OperationType, ParseFailure, ParseOutcome, TransformationLog,
    ValidationVerdict, ZipInfo, empty_map,
};
use addr_normalize::TransformationTracker;
use addr_parse::{AddressParser, DomesticParser, InternationalParser, RemoteInternationalBackend};
use addr_standards::DataSource;
use addr_validate::{CompositeValidator, Validator, default_validators};

use crate::config::ServiceConfig;
use crate::context::ServiceContext;
use crate::error::{Result, ServiceError};
use crate::policy::{FallbackPolicy, RouteSteps, RouteTrace};

const PREVIEW_CHARS: usize = 50;

/// Per-call parse switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    pub validate: bool,
    /// Turn an invalid result into [`ServiceError::Address`].
    pub strict: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            validate: true,
            strict: false,
        }
    }
}

impl ParseOptions {
    pub fn strict() -> Self {
        Self {
            validate: true,
            strict: true,
        }
    }

    pub fn without_validation() -> Self {
        Self {
            validate: false,
            strict: false,
        }
    }
}

/// What to do with an input that does not parse when a flat map is wanted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Return the parse failure as an error.
    Raise,
    /// Return a map with every column `None`.
    #[default]
    Coerce,
}

/// Parses, normalizes and validates addresses against one reference dataset.
///
/// Safe to share across threads: parsers, validators and the dataset are
/// read-only once built.
pub struct AddressService {
    source: Arc<dyn DataSource>,
    domestic: Box<dyn AddressParser>,
    international: InternationalParser,
    validator: CompositeValidator,
    policy: FallbackPolicy,
    validate_by_default: bool,
}

impl std::fmt::Debug for AddressService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AddressService")
            .field("source", &self.source.name())
            .field("domestic", &self.domestic.name())
            .field("international", &self.international)
            .field("validators", &self.validator.names())
            .finish_non_exhaustive()
    }
}

impl AddressService {
    /// Rule-based domestic parser, no international backend, ZIP and state
    /// validators without the state-match check.
    pub fn new(source: Arc<dyn DataSource>) -> Self {
        let validator = default_validators(&source, false);
        Self {
            source,
            domestic: Box::new(DomesticParser::new()),
            international: InternationalParser::default(),
            validator,
            policy: FallbackPolicy::default(),
            validate_by_default: true,
        }
    }

    /// # Errors
    ///
    /// See [`AddressService::from_context`].
    pub fn from_config(config: &ServiceConfig) -> Result<Self> {
        Self::from_context(&ServiceContext::default(), config)
    }

    /// Builds the service from the registries in `context`.
    ///
    /// The dataset is loaded here so a broken one fails fast.
    ///
    /// # Errors
    ///
    /// Unknown registry keys, a dataset that cannot be loaded, or an HTTP
    /// client that cannot be created.
    pub fn from_context(context: &ServiceContext, config: &ServiceConfig) -> Result<Self> {
        let source = context
            .data_sources()
            .create(config.dataset.registry_key(), config)?;
        source.load()?;
        let domestic = context.parsers().create(&config.parser, config)?;

        let international = match &config.international {
            Some(international) => {
                let timeout = international.timeout();
                let backend = RemoteInternationalBackend::new(&international.base_url, timeout)?;
                InternationalParser::new(Arc::new(backend)).with_timeout(timeout)
            }
            None => InternationalParser::default(),
        };

        tracing::info!(
            dataset = source.name(),
            parser = domestic.name(),
            international = international.is_available(),
            check_state_match = config.check_state_match,
            "address service ready"
        );

        Ok(Self {
            validator: default_validators(&source, config.check_state_match),
            source,
            domestic,
            international,
            policy: FallbackPolicy::default(),
            validate_by_default: config.validate,
        })
    }

    #[must_use]
    pub fn with_domestic_parser(mut self, parser: Box<dyn AddressParser>) -> Self {
        self.domestic = parser;
        self
    }

    #[must_use]
    pub fn with_international_parser(mut self, parser: InternationalParser) -> Self {
        self.international = parser;
        self
    }

    #[must_use]
    pub fn with_validator(mut self, validator: CompositeValidator) -> Self {
        self.validator = validator;
        self
    }

    /// Replaces the validators with the defaults, state-match check as given.
    #[must_use]
    pub fn with_check_state_match(mut self, enabled: bool) -> Self {
        self.validator = default_validators(&self.source, enabled);
        self
    }

    #[must_use]
    pub fn with_policy(mut self, policy: FallbackPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn data_source(&self) -> &Arc<dyn DataSource> {
        &self.source
    }

    pub fn domestic_parser(&self) -> &dyn AddressParser {
        self.domestic.as_ref()
    }

    pub fn international_parser(&self) -> &InternationalParser {
        &self.international
    }

    pub fn validator(&self) -> &CompositeValidator {
        &self.validator
    }

    /// Options used by batch, auto and map parsing.
    pub fn default_options(&self) -> ParseOptions {
        ParseOptions {
            validate: self.validate_by_default,
            strict: false,
        }
    }

    /// Domestic parse, tracked and optionally validated.
    ///
    /// # Errors
    ///
    /// Dataset failures, or [`ServiceError::Address`] for an invalid result
    /// in strict mode.
    pub fn parse(&self, input: &str, options: ParseOptions) -> Result<ParseOutcome> {
        let outcome = self.run_domestic(input, options.validate)?;
        if options.strict {
            ensure_valid(&outcome)?;
        }
        Ok(outcome)
    }

    /// One outcome per input, in order; a bad input fails only its own slot.
    ///
    /// # Errors
    ///
    /// Dataset failures, which would fail every slot alike.
    pub fn parse_batch(&self, inputs: &[&str]) -> Result<Vec<ParseOutcome>> {
        let options = self.default_options();
        let outcomes = inputs
            .iter()
            .map(|input| self.parse(input, options))
            .collect::<Result<Vec<_>>>()?;
        tracing::debug!(
            inputs = inputs.len(),
            parsed = outcomes.iter().filter(|outcome| outcome.is_parsed()).count(),
            "parsed batch"
        );
        Ok(outcomes)
    }

    /// International parser only. Unavailability comes back as a failed
    /// outcome.
    pub fn parse_international(&self, input: &str) -> ParseOutcome {
        let mut process_log = trim_log(input);
        let outcome = self.international.parse(input);
        record_verdict_errors(&mut process_log, outcome.validation());
        log_outcome(input, &outcome);
        outcome.with_log(process_log)
    }

    /// Routes `input` through the fallback policy.
    ///
    /// # Errors
    ///
    /// Dataset failures.
    pub fn parse_auto(&self, input: &str) -> Result<ParseOutcome> {
        self.parse_auto_traced(input).map(|(outcome, _)| outcome)
    }

    /// [`AddressService::parse_auto`] plus the states the policy went
    /// through.
    ///
    /// # Errors
    ///
    /// Dataset failures.
    pub fn parse_auto_traced(&self, input: &str) -> Result<(ParseOutcome, RouteTrace)> {
        let (outcome, trace) = self.policy.route(self, input)?;
        tracing::debug!(source = %outcome.source(), route = %trace, "routed address");
        Ok((outcome, trace))
    }

    /// Flat column map of the domestic parse, for table integration.
    ///
    /// # Errors
    ///
    /// Dataset failures, or the parse failure under [`ErrorMode::Raise`].
    pub fn parse_to_map(
        &self,
        input: &str,
        mode: ErrorMode,
    ) -> Result<BTreeMap<String, Option<String>>> {
        let outcome = self.parse(input, self.default_options())?;
        outcome_map(&outcome, mode)
    }

    /// # Errors
    ///
    /// Dataset failures.
    pub fn lookup_zip(&self, zip: &str) -> Result<Option<ZipInfo>> {
        Ok(self.source.get_zip_info(zip)?)
    }

    /// # Errors
    ///
    /// Dataset failures.
    pub fn city_state_from_zip(&self, zip: &str) -> Result<Option<(String, String)>> {
        Ok(self.source.city_state_from_zip(zip)?)
    }

    /// # Errors
    ///
    /// Dataset failures.
    pub fn is_valid_zip(&self, zip: &str) -> Result<bool> {
        Ok(self.source.is_valid_zip(zip)?)
    }

    /// # Errors
    ///
    /// Dataset failures.
    pub fn is_valid_state(&self, state: &str) -> Result<bool> {
        Ok(self.source.is_valid_state(state)?)
    }

    /// Upper-case abbreviation for a state name or abbreviation.
    ///
    /// # Errors
    ///
    /// [`ServiceError::Lookup`] for an unknown state or a dataset failure.
    pub fn normalize_state(&self, state: &str) -> Result<String> {
        Ok(self.source.normalize_state(state)?)
    }

    /// # Errors
    ///
    /// Dataset failures.
    pub fn validate(&self, record: &AddressRecord) -> Result<ValidationVerdict> {
        Ok(self.validator.validate(record)?)
    }

    fn run_domestic(&self, input: &str, validate: bool) -> Result<ParseOutcome> {
        let mut process_log = trim_log(input);
        let outcome = self.domestic.parse(input);
        let Some(record) = outcome.address() else {
            log_outcome(input, &outcome);
            return Ok(outcome.with_log(process_log));
        };

        let mut tracker = TransformationTracker::new();
        tracker.track_all(record, input.trim());
        let verdict = if validate {
            self.validator.validate(record)?
        } else {
            ValidationVerdict::valid()
        };
        record_verdict_errors(&mut process_log, &verdict);

        let outcome = outcome
            .with_record_log(tracker.into_log())
            .with_validation(verdict)
            .with_log(process_log);
        log_outcome(input, &outcome);
        Ok(outcome)
    }
}

impl RouteSteps for AddressService {
    fn international_available(&self) -> bool {
        self.international.is_available()
    }

    fn attempt_domestic(&self, input: &str) -> Result<ParseOutcome> {
        self.run_domestic(input, self.validate_by_default)
    }

    fn attempt_international(&self, input: &str) -> ParseOutcome {
        self.parse_international(input)
    }
}

/// The outcome's column map, or its failure under [`ErrorMode::Raise`].
///
/// # Errors
///
/// [`ServiceError::Parse`] when the outcome did not parse and `mode` is
/// [`ErrorMode::Raise`].
pub fn outcome_map(
    outcome: &ParseOutcome,
    mode: ErrorMode,
) -> Result<BTreeMap<String, Option<String>>> {
    if outcome.is_parsed() {
        return Ok(outcome.to_map());
    }
    match (mode, outcome.failure()) {
        (ErrorMode::Raise, Some(failure)) => Err(ServiceError::Parse(failure.clone())),
        (ErrorMode::Raise, None) => Err(ServiceError::Parse(ParseFailure::EmptyInput)),
        (ErrorMode::Coerce, _) => Ok(empty_map()),
    }
}

fn ensure_valid(outcome: &ParseOutcome) -> Result<()> {
    if outcome.is_valid() {
        return Ok(());
    }
    if let Some(failure) = outcome.failure() {
        return Err(ServiceError::Parse(failure.clone()));
    }
    Err(AddressError::Validation {
        errors: outcome.validation().errors().to_vec(),
    }
    .into())
}

fn trim_log(input: &str) -> TransformationLog {
    let mut log = TransformationLog::new();
    let trimmed = input.trim();
    if trimmed != input && !trimmed.is_empty() {
        log.record_cleaning(
            "raw_input",
            input,
            trimmed,
            "Trimmed surrounding whitespace",
            OperationType::Cleaning,
        );
    }
    log
}

fn record_verdict_errors(log: &mut TransformationLog, verdict: &ValidationVerdict) {
    for error in verdict.errors() {
        log.record_error(error.field(), error.message(), error.value().unwrap_or_default());
    }
}

fn log_outcome(input: &str, outcome: &ParseOutcome) {
    tracing::trace!(
        input = %input.chars().take(PREVIEW_CHARS).collect::<String>(),
        source = %outcome.source(),
        parsed = outcome.is_parsed(),
        valid = outcome.is_valid(),
        "address processed"
    );
}
