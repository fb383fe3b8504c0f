use addr_model::{AddressRecord, OperationType, TransformationLog};

use crate::detectors::{DetectionContext, Detector, default_detectors};

/// Append-only recorder of cleaning steps and errors.
///
/// Every call appends; identical calls produce identical, repeated entries.
pub struct TransformationTracker {
    log: TransformationLog,
    detectors: Vec<Box<dyn Detector>>,
}

impl Default for TransformationTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl TransformationTracker {
    /// Tracker running [`default_detectors`].
    pub fn new() -> Self {
        Self::with_detectors(default_detectors())
    }

    /// Tracker running `detectors` in the given order.
    pub fn with_detectors(detectors: Vec<Box<dyn Detector>>) -> Self {
        Self {
            log: TransformationLog::new(),
            detectors,
        }
    }

    pub fn record_cleaning(
        &mut self,
        field: &str,
        original: &str,
        new_value: &str,
        reason: &str,
        operation: OperationType,
    ) {
        self.log
            .record_cleaning(field, original, new_value, reason, operation);
    }

    pub fn record_error(&mut self, field: &str, message: &str, value: &str) {
        self.log.record_error(field, message, value);
    }

    /// Runs every detector against `record` and the input it was parsed from.
    /// Returns the number of entries added.
    pub fn track_all(&mut self, record: &AddressRecord, raw: &str) -> usize {
        let before = self.log.len();
        let mut context = DetectionContext::new(record, raw);
        for detector in &self.detectors {
            let found = detector.detect(&mut context, &mut self.log);
            if found > 0 {
                tracing::trace!(
                    detector = detector.name(),
                    entries = found,
                    "detected transformations"
                );
            }
        }
        let added = self.log.len() - before;
        tracing::debug!(entries = added, "tracked normalization");
        added
    }

    pub fn log(&self) -> &TransformationLog {
        &self.log
    }

    pub fn into_log(self) -> TransformationLog {
        self.log
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use addr_model::AddressField;

    fn record() -> AddressRecord {
        AddressRecord::from_components([
            (AddressField::AddressNumber, "123"),
            (AddressField::StreetName, "main"),
            (AddressField::StreetNamePostType, "st"),
            (AddressField::PlaceName, "austin"),
            (AddressField::StateName, "TX"),
            (AddressField::ZipCode, "78749"),
        ])
        .unwrap()
    }

    #[test]
    fn state_name_is_attributed() {
        let mut tracker = TransformationTracker::new();
        let added = tracker.track_all(&record(), "123 main st, austin texas 78749");
        assert_eq!(added, 1);
        let entry = &tracker.log().cleaning()[0];
        assert_eq!(entry.field(), "StateName");
        assert_eq!(entry.original(), "texas");
        assert_eq!(entry.new_value(), Some("TX"));
        assert_eq!(entry.operation(), Some("normalization"));
    }

    #[test]
    fn manual_records_are_appended_without_dedup() {
        let mut tracker = TransformationTracker::with_detectors(Vec::new());
        tracker.record_error("ZipCode", "Invalid US ZIP code: 00000", "00000");
        tracker.record_error("ZipCode", "Invalid US ZIP code: 00000", "00000");
        assert_eq!(tracker.log().errors().len(), 2);
        assert_eq!(tracker.track_all(&record(), "anything"), 0);
    }
}
