//! Parser backends and the adapters that turn their output into records.
//!
//! A backend only knows how to label text. Adapters ([`DomesticParser`],
//! [`InternationalParser`]) own the shared lifecycle: reject empty input,
//! invoke the backend, map labels onto the record schema and wrap everything
//! in a [`ParseOutcome`](addr_model::ParseOutcome). Failures never escape an
//! adapter; they come back as failed outcomes.

pub mod adapter;
pub mod backend;
pub mod domestic;
pub mod error;
pub mod international;
pub mod remote;
pub mod tagger;

pub use adapter::{AddressParser, BackendAdapter, ParserStats, StatsSnapshot};
pub use backend::{
    Availability, DomesticBackend, InternationalBackend, LabeledToken, UnavailableBackend,
};
pub use domestic::DomesticParser;
pub use error::BackendError;
pub use international::{DEFAULT_TIMEOUT, InternationalParser};
pub use remote::RemoteInternationalBackend;
pub use tagger::RuleBasedTagger;
