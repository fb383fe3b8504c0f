use thiserror::Error;

/// Failure reported by a parser backend.
///
/// `Unavailable` and `Timeout` mean the backend could not answer;
/// `NoMatch` means it answered with nothing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum BackendError {
    #[error("backend unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("backend timed out after {millis} ms")]
    Timeout { millis: u64 },

    #[error("backend returned no components")]
    NoMatch,

    #[error("backend returned HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("{0}")]
    Failed(String),
}
