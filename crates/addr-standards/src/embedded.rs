//! Datasets compiled into the binary.

/// Sample of the ZIP dataset covering major cities in every region.
///
/// Production deployments load a full dataset from disk; the sample keeps the
/// library usable offline and in tests.
pub const ZIP_SAMPLE: &str = include_str!("../data/uszips_sample.csv");

/// Display name used in logs and errors for [`ZIP_SAMPLE`].
pub const ZIP_SAMPLE_NAME: &str = "embedded:uszips_sample.csv";
