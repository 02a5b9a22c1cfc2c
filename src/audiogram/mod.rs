// Audiogram module - hearing test data model and record codec
//
// This module provides the persisted model of a hearing test:
// 1. FrequencyPoint: one measured (frequency, hearing level) pair
// 2. TestResult: both ears' audiograms plus their classification labels
// 3. classification: the severity scale used to compare the two ears
// 4. record: typed field access over untyped document-store records

pub mod classification;
pub mod frequency_point;
pub mod record;
pub mod test_result;

pub use classification::{severity_rank, HearingClassification};
pub use frequency_point::FrequencyPoint;
pub use record::{parse_record, Record};
pub use test_result::{
    TestResult, TestResultSummary, ASYMMETRY_THRESHOLD_DB, DATA_POINT_TOLERANCE_HZ,
};
