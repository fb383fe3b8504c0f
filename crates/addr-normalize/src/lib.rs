//! Records every normalization applied to an address as an audit entry.
//!
//! [`TransformationTracker::track_all`] compares a freshly parsed record with
//! the input it came from and runs an ordered set of detectors; each detector
//! reports only the change made by its own normalization step.

pub mod detectors;
pub mod tracker;

pub use detectors::{
    CommaSegmentDetector, DetectionContext, Detector, PunctuationDetector, StateNameDetector,
    WhitespaceDetector, ZipFormatDetector, default_detectors,
};
pub use tracker::TransformationTracker;
