//! Domestic/international fallback policy.
//!
//! ```text
//! Start -> [gate] -> InternationalAttempt -> InternationalValid -> Terminal
//!                                         \-> (unavailable) -> DomesticAttempt
//! Start -> DomesticAttempt -> Valid -> Terminal
//!                          \-> DomesticInvalid -> [InternationalAttempt] -> Terminal
//! ```
//!
//! The gate sends input straight to the international parser when it looks
//! foreign (see [`is_probably_international`]). A valid domestic result always
//! wins, and the international backend is never called when it is
//! unavailable.

use std::fmt;

use addr_model::{ParseFailure, ParseOutcome};

use crate::error::Result;
use crate::heuristics::is_probably_international;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteState {
    Start,
    DomesticAttempt,
    Valid,
    DomesticInvalid,
    InternationalAttempt,
    InternationalValid,
    InternationalInvalid,
    Terminal,
}

impl RouteState {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Start => "Start",
            Self::DomesticAttempt => "DomesticAttempt",
            Self::Valid => "Valid",
            Self::DomesticInvalid => "DomesticInvalid",
            Self::InternationalAttempt => "InternationalAttempt",
            Self::InternationalValid => "InternationalValid",
            Self::InternationalInvalid => "InternationalInvalid",
            Self::Terminal => "Terminal",
        }
    }
}

impl fmt::Display for RouteState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// States visited while routing one input, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteTrace {
    states: Vec<RouteState>,
}

impl RouteTrace {
    fn push(&mut self, state: RouteState) {
        tracing::trace!(%state, "route");
        self.states.push(state);
    }

    pub fn states(&self) -> &[RouteState] {
        &self.states
    }

    pub fn visited(&self, state: RouteState) -> bool {
        self.states.contains(&state)
    }
}

impl fmt::Display for RouteTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, state) in self.states.iter().enumerate() {
            if index > 0 {
                f.write_str(" -> ")?;
            }
            f.write_str(state.as_str())?;
        }
        Ok(())
    }
}

/// The work the policy sequences. Implemented by
/// [`AddressService`](crate::AddressService).
pub trait RouteSteps {
    fn international_available(&self) -> bool;

    /// Domestic parse, tracked, and validated unless the service disables it.
    ///
    /// # Errors
    ///
    /// Dataset failures only.
    fn attempt_domestic(&self, input: &str) -> Result<ParseOutcome>;

    /// International parse with its acceptance verdict.
    fn attempt_international(&self, input: &str) -> ParseOutcome;
}

#[derive(Debug, Clone, Copy)]
pub struct FallbackPolicy {
    gate: bool,
}

impl Default for FallbackPolicy {
    fn default() -> Self {
        Self { gate: true }
    }
}

impl FallbackPolicy {
    /// Policy without the heuristic gate: always domestic first.
    pub fn without_gate() -> Self {
        Self { gate: false }
    }

    /// Routes `input` and returns the terminal outcome with the path taken.
    ///
    /// # Errors
    ///
    /// Dataset failures from the domestic attempt.
    pub fn route<S>(&self, steps: &S, input: &str) -> Result<(ParseOutcome, RouteTrace)>
    where
        S: RouteSteps + ?Sized,
    {
        let mut trace = RouteTrace::default();
        trace.push(RouteState::Start);
        let available = steps.international_available();
        let mut tried_international = false;

        if self.gate && available && is_probably_international(input) {
            trace.push(RouteState::InternationalAttempt);
            let international = steps.attempt_international(input);
            if international.is_valid() {
                return Ok(finish(international, RouteState::InternationalValid, trace));
            }
            trace.push(RouteState::InternationalInvalid);
            if !international.failure().is_some_and(ParseFailure::is_unavailable) {
                trace.push(RouteState::Terminal);
                return Ok((international, trace));
            }
            tracing::debug!("international backend unreachable, trying domestic parser");
            tried_international = true;
        }

        trace.push(RouteState::DomesticAttempt);
        let domestic = steps.attempt_domestic(input)?;
        if domestic.is_valid() {
            return Ok(finish(domestic, RouteState::Valid, trace));
        }
        trace.push(RouteState::DomesticInvalid);
        if !available || tried_international {
            trace.push(RouteState::Terminal);
            return Ok((domestic, trace));
        }

        trace.push(RouteState::InternationalAttempt);
        let international = steps.attempt_international(input);
        if international.is_valid() {
            return Ok(finish(international, RouteState::InternationalValid, trace));
        }
        trace.push(RouteState::InternationalInvalid);
        trace.push(RouteState::Terminal);

        let chosen = if international.is_parsed() || !domestic.is_parsed() {
            international
        } else {
            domestic
        };
        Ok((chosen, trace))
    }
}

fn finish(
    outcome: ParseOutcome,
    state: RouteState,
    mut trace: RouteTrace,
) -> (ParseOutcome, RouteTrace) {
    trace.push(state);
    trace.push(RouteState::Terminal);
    (outcome, trace)
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use addr_model::{
        AddressField, AddressRecord, FieldError, ParseFailure, ParseSource, ValidationVerdict,
    };

    use super::*;

    /// Scripted steps counting international calls.
    struct Script {
        available: bool,
        domestic_valid: bool,
        international: fn(&str) -> ParseOutcome,
        international_calls: Cell<usize>,
    }

    impl Script {
        fn new(
            available: bool,
            domestic_valid: bool,
            international: fn(&str) -> ParseOutcome,
        ) -> Self {
            Self {
                available,
                domestic_valid,
                international,
                international_calls: Cell::new(0),
            }
        }
    }

    impl RouteSteps for Script {
        fn international_available(&self) -> bool {
            self.available
        }

        fn attempt_domestic(&self, input: &str) -> Result<ParseOutcome> {
            let record = AddressRecord::from_components([(AddressField::StreetName, "Main")])?;
            let verdict = if self.domestic_valid {
                ValidationVerdict::valid()
            } else {
                let error = FieldError::new("ZipCode", "Invalid US ZIP code: 00000", None);
                ValidationVerdict::invalid(vec![error])
            };
            Ok(ParseOutcome::domestic(input, record).with_validation(verdict))
        }

        fn attempt_international(&self, input: &str) -> ParseOutcome {
            self.international_calls.set(self.international_calls.get() + 1);
            (self.international)(input)
        }
    }

    fn unreachable_backend(input: &str) -> ParseOutcome {
        ParseOutcome::failed(
            input,
            ParseSource::International,
            ParseFailure::Timeout {
                backend: "remote".to_string(),
                millis: 10,
            },
        )
    }

    fn no_match(input: &str) -> ParseOutcome {
        ParseOutcome::failed(
            input,
            ParseSource::International,
            ParseFailure::NoComponents {
                backend: "remote".to_string(),
            },
        )
    }

    #[test]
    fn valid_domestic_result_stops_the_route() {
        let script = Script::new(true, true, no_match);
        let (outcome, trace) = FallbackPolicy::default().route(&script, "123 Main St").unwrap();
        assert_eq!(outcome.source(), ParseSource::Domestic);
        assert_eq!(trace.to_string(), "Start -> DomesticAttempt -> Valid -> Terminal");
        assert_eq!(script.international_calls.get(), 0);
    }

    #[test]
    fn unavailable_backend_is_never_called() {
        let script = Script::new(false, false, no_match);
        let (outcome, trace) = FallbackPolicy::default()
            .route(&script, "10 Downing Street, London, United Kingdom")
            .unwrap();
        assert_eq!(outcome.source(), ParseSource::Domestic);
        assert!(!outcome.is_valid());
        assert_eq!(trace.to_string(), "Start -> DomesticAttempt -> DomesticInvalid -> Terminal");
        assert_eq!(script.international_calls.get(), 0);
    }

    #[test]
    fn unparsed_international_falls_back_to_domestic_record() {
        let script = Script::new(true, false, no_match);
        let (outcome, trace) = FallbackPolicy::default().route(&script, "123 Main St").unwrap();
        assert_eq!(outcome.source(), ParseSource::Domestic);
        assert!(trace.visited(RouteState::InternationalInvalid));
        assert_eq!(script.international_calls.get(), 1);
    }

    #[test]
    fn gated_input_with_unreachable_backend_tries_domestic_once() {
        let script = Script::new(true, false, unreachable_backend);
        let (outcome, trace) =
            FallbackPolicy::default().route(&script, "Friedrichstraße 43, Berlin").unwrap();
        assert_eq!(outcome.source(), ParseSource::Domestic);
        assert_eq!(
            trace.states(),
            [
                RouteState::Start,
                RouteState::InternationalAttempt,
                RouteState::InternationalInvalid,
                RouteState::DomesticAttempt,
                RouteState::DomesticInvalid,
                RouteState::Terminal,
            ]
        );
        assert_eq!(script.international_calls.get(), 1);
    }

    #[test]
    fn without_gate_domestic_goes_first() {
        let script = Script::new(true, true, no_match);
        let (_, trace) = FallbackPolicy::without_gate()
            .route(&script, "Friedrichstraße 43, Berlin")
            .unwrap();
        assert_eq!(trace.states()[1], RouteState::DomesticAttempt);
    }
}
