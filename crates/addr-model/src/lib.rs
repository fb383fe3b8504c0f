//! Data model for parsed postal addresses.
//!
//! Records are immutable once built: derived fields (address lines, full
//! address, ZIP variants, hash) are recomputed by the record itself whenever a
//! component changes, and every record owns the transformation log produced
//! while it was constructed.

pub mod builder;
pub mod error;
pub mod field;
pub mod international;
pub mod log;
pub mod outcome;
pub mod record;
pub mod verdict;
pub mod zip;
pub mod zip_info;

pub use builder::AddressBuilder;
pub use error::{AddressError, Result};
pub use field::AddressField;
pub use international::{InternationalAddressRecord, InternationalView};
pub use log::{EntryKind, OperationType, TransformationEntry, TransformationLog};
pub use outcome::{
    AuditRow, LogSource, OutcomeView, ParseFailure, ParseOutcome, ParseSource, empty_map,
};
pub use record::{AddressRecord, AddressView, OUTPUT_COLUMNS};
pub use verdict::{FieldError, ValidationVerdict};
pub use zip::{ParsedZip, ZipCode, parse_zip};
pub use zip_info::ZipInfo;
