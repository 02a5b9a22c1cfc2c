// TestResult - a completed two-ear hearing test
//
// Holds the left and right audiograms together with the classification label
// assigned to each ear, and converts to and from the document-store record
// format. Record decoding is strict for top-level fields and permissive for
// individual points: a malformed top-level field rejects the whole record,
// while a malformed point is skipped.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};

use crate::audio::Ear;
use crate::audiogram::classification::severity_rank;
use crate::audiogram::frequency_point::FrequencyPoint;
use crate::audiogram::record::{
    number_field, record_list_field, string_field, timestamp_field, timestamp_value, Record,
};
use crate::config::AudiogramConfig;
use crate::error::RecordError;

/// Maximum distance (Hz) at which a stored point answers a frequency lookup
pub const DATA_POINT_TOLERANCE_HZ: f64 = 10.0;

/// Average-level difference (dB) above which hearing counts as asymmetric
pub const ASYMMETRY_THRESHOLD_DB: f64 = 15.0;

pub const FIELD_TEST_DATE: &str = "testDate";
pub const FIELD_RIGHT_CLASSIFICATION: &str = "rightEarClassification";
pub const FIELD_LEFT_CLASSIFICATION: &str = "leftEarClassification";
pub const FIELD_RIGHT_DATA: &str = "rightEarData";
pub const FIELD_LEFT_DATA: &str = "leftEarData";
pub const FIELD_FREQUENCY: &str = "frequency";
pub const FIELD_HEARING_LEVEL: &str = "hearingLevel";

/// Result of one hearing test
///
/// Immutable once built; updating a stored result means replacing it.
#[derive(Debug, Clone, PartialEq)]
pub struct TestResult {
    id: String,
    test_date: DateTime<Utc>,
    right_ear_classification: String,
    left_ear_classification: String,
    right_ear_data: Vec<FrequencyPoint>,
    left_ear_data: Vec<FrequencyPoint>,
}

/// Derived figures for display and export
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestResultSummary {
    pub id: String,
    pub test_date: DateTime<Utc>,
    pub right_ear_classification: String,
    pub left_ear_classification: String,
    pub right_ear_average_level: f64,
    pub left_ear_average_level: f64,
    pub overall_hearing_status: String,
    pub has_asymmetric_hearing: bool,
    pub right_ear_points: usize,
    pub left_ear_points: usize,
}

impl TestResult {
    /// Build a result from already-validated parts
    ///
    /// No checks are performed here.
    pub fn new(
        id: impl Into<String>,
        test_date: DateTime<Utc>,
        right_ear_classification: impl Into<String>,
        left_ear_classification: impl Into<String>,
        right_ear_data: Vec<FrequencyPoint>,
        left_ear_data: Vec<FrequencyPoint>,
    ) -> Self {
        Self {
            id: id.into(),
            test_date,
            right_ear_classification: right_ear_classification.into(),
            left_ear_classification: left_ear_classification.into(),
            right_ear_data,
            left_ear_data,
        }
    }

    /// Rebuild a result from a stored record
    ///
    /// Returns `None` when a required top-level field is missing or has the
    /// wrong shape. Use [`TestResult::try_from_record`] to learn which one.
    pub fn from_record(id: impl Into<String>, record: &Record) -> Option<Self> {
        let id = id.into();
        match Self::try_from_record(id.clone(), record) {
            Ok(result) => Some(result),
            Err(err) => {
                log::debug!("[TestResult] Could not parse record {}: {}", id, err);
                None
            }
        }
    }

    /// Rebuild a result from a stored record, reporting the failing field
    ///
    /// Ear-data entries without numeric `frequency` and `hearingLevel` are
    /// dropped without error.
    pub fn try_from_record(id: impl Into<String>, record: &Record) -> Result<Self, RecordError> {
        let test_date = timestamp_field(record, FIELD_TEST_DATE)?;
        let right_ear_classification = string_field(record, FIELD_RIGHT_CLASSIFICATION)?;
        let left_ear_classification = string_field(record, FIELD_LEFT_CLASSIFICATION)?;
        let right_entries = record_list_field(record, FIELD_RIGHT_DATA)?;
        let left_entries = record_list_field(record, FIELD_LEFT_DATA)?;

        Ok(Self::new(
            id,
            test_date,
            right_ear_classification,
            left_ear_classification,
            decode_points(&right_entries, Ear::Right),
            decode_points(&left_entries, Ear::Left),
        ))
    }

    /// Encode for storage
    ///
    /// The id is not part of the body; the store keeps it as the document key.
    pub fn to_record(&self) -> Record {
        let mut record = Record::new();
        record.insert(FIELD_TEST_DATE.to_string(), timestamp_value(&self.test_date));
        record.insert(
            FIELD_RIGHT_CLASSIFICATION.to_string(),
            Value::String(self.right_ear_classification.clone()),
        );
        record.insert(
            FIELD_LEFT_CLASSIFICATION.to_string(),
            Value::String(self.left_ear_classification.clone()),
        );
        record.insert(FIELD_RIGHT_DATA.to_string(), encode_points(&self.right_ear_data));
        record.insert(FIELD_LEFT_DATA.to_string(), encode_points(&self.left_ear_data));
        record
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn test_date(&self) -> DateTime<Utc> {
        self.test_date
    }

    pub fn right_ear_classification(&self) -> &str {
        &self.right_ear_classification
    }

    pub fn left_ear_classification(&self) -> &str {
        &self.left_ear_classification
    }

    pub fn right_ear_data(&self) -> &[FrequencyPoint] {
        &self.right_ear_data
    }

    pub fn left_ear_data(&self) -> &[FrequencyPoint] {
        &self.left_ear_data
    }

    /// Audiogram for one ear
    pub fn ear_data(&self, ear: Ear) -> &[FrequencyPoint] {
        match ear {
            Ear::Right => &self.right_ear_data,
            Ear::Left => &self.left_ear_data,
        }
    }

    /// Mean right-ear hearing level, 0 when no points were recorded
    pub fn right_ear_average_level(&self) -> f64 {
        average_level(&self.right_ear_data)
    }

    /// Mean left-ear hearing level, 0 when no points were recorded
    pub fn left_ear_average_level(&self) -> f64 {
        average_level(&self.left_ear_data)
    }

    /// First point within 10 Hz of `frequency` on the given ear
    pub fn data_point(&self, frequency: f64, ear: Ear) -> Option<&FrequencyPoint> {
        self.data_point_within(frequency, ear, DATA_POINT_TOLERANCE_HZ)
    }

    /// First point, in recorded order, within `tolerance_hz` of `frequency`
    ///
    /// The boundary is inclusive. When several points qualify the earliest
    /// one wins even if a later one is closer.
    pub fn data_point_within(
        &self,
        frequency: f64,
        ear: Ear,
        tolerance_hz: f64,
    ) -> Option<&FrequencyPoint> {
        self.ear_data(ear)
            .iter()
            .find(|point| (point.frequency - frequency).abs() <= tolerance_hz)
    }

    /// The more severe of the two ear classifications
    ///
    /// Labels are compared by severity rank; unknown labels rank as normal
    /// hearing. On equal rank the right-ear label is returned.
    pub fn overall_hearing_status(&self) -> &str {
        let right = severity_rank(&self.right_ear_classification);
        let left = severity_rank(&self.left_ear_classification);
        if left > right {
            &self.left_ear_classification
        } else {
            &self.right_ear_classification
        }
    }

    /// True when the ear averages differ by more than 15 dB
    pub fn has_asymmetric_hearing(&self) -> bool {
        self.is_asymmetric_beyond(ASYMMETRY_THRESHOLD_DB)
    }

    /// True when the ear averages differ by strictly more than `threshold_db`
    pub fn is_asymmetric_beyond(&self, threshold_db: f64) -> bool {
        (self.right_ear_average_level() - self.left_ear_average_level()).abs() > threshold_db
    }

    /// Summary using the fixed tolerances
    pub fn summary(&self) -> TestResultSummary {
        self.summary_with(&AudiogramConfig::default())
    }

    /// Summary using configured thresholds
    pub fn summary_with(&self, config: &AudiogramConfig) -> TestResultSummary {
        TestResultSummary {
            id: self.id.clone(),
            test_date: self.test_date,
            right_ear_classification: self.right_ear_classification.clone(),
            left_ear_classification: self.left_ear_classification.clone(),
            right_ear_average_level: self.right_ear_average_level(),
            left_ear_average_level: self.left_ear_average_level(),
            overall_hearing_status: self.overall_hearing_status().to_string(),
            has_asymmetric_hearing: self.is_asymmetric_beyond(config.asymmetry_threshold_db),
            right_ear_points: self.right_ear_data.len(),
            left_ear_points: self.left_ear_data.len(),
        }
    }
}

fn average_level(points: &[FrequencyPoint]) -> f64 {
    if points.is_empty() {
        return 0.0;
    }
    let sum: f64 = points.iter().map(|p| p.hearing_level).sum();
    sum / points.len() as f64
}

fn decode_points(entries: &[&Record], ear: Ear) -> Vec<FrequencyPoint> {
    entries
        .iter()
        .enumerate()
        .filter_map(|(index, entry)| {
            let frequency = number_field(entry, FIELD_FREQUENCY);
            let hearing_level = number_field(entry, FIELD_HEARING_LEVEL);
            match (frequency, hearing_level) {
                (Some(frequency), Some(hearing_level)) => {
                    Some(FrequencyPoint::new(frequency, hearing_level))
                }
                _ => {
                    log::trace!("[TestResult] Skipping malformed {} ear point {}", ear, index);
                    None
                }
            }
        })
        .collect()
}

fn encode_points(points: &[FrequencyPoint]) -> Value {
    Value::Array(
        points
            .iter()
            .map(|point| {
                json!({
                    FIELD_FREQUENCY: point.frequency,
                    FIELD_HEARING_LEVEL: point.hearing_level,
                })
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 250_000_000).unwrap()
    }

    fn points(levels: &[(f64, f64)]) -> Vec<FrequencyPoint> {
        levels
            .iter()
            .map(|&(f, l)| FrequencyPoint::new(f, l))
            .collect()
    }

    fn sample_result() -> TestResult {
        TestResult::new(
            "abc123",
            date(),
            "Mild Hearing Loss",
            "Severe Hearing Loss",
            points(&[(500.0, 10.0), (1000.0, 20.0), (2000.0, 30.0)]),
            points(&[(500.0, 60.0), (1000.0, 70.0)]),
        )
    }

    fn record(value: Value) -> Record {
        match value {
            Value::Object(map) => map,
            _ => panic!("test record must be an object"),
        }
    }

    fn valid_record() -> Record {
        record(json!({
            "testDate": { "seconds": 1_700_000_000, "nanoseconds": 0 },
            "rightEarClassification": "Normal Hearing",
            "leftEarClassification": "Mild Hearing Loss",
            "rightEarData": [{ "frequency": 1000, "hearingLevel": 20 }],
            "leftEarData": [{ "frequency": 1000.0, "hearingLevel": 35.5 }],
        }))
    }

    #[test]
    fn test_record_roundtrip_is_exact() {
        let result = sample_result();
        let parsed = TestResult::from_record("abc123", &result.to_record()).unwrap();
        assert_eq!(parsed, result);
    }

    #[test]
    fn test_leap_second_date_survives_roundtrip() {
        let leap = DateTime::from_timestamp(1_483_228_799, 1_500_000_000).unwrap();
        let result = TestResult::new(
            "leap",
            leap,
            "Normal Hearing",
            "Normal Hearing",
            points(&[(1000.0, 15.0)]),
            vec![],
        );

        let rec = result.to_record();
        assert_eq!(rec["testDate"]["nanoseconds"], 500_000_000u32);

        let parsed = TestResult::from_record("leap", &rec).unwrap();
        assert_eq!(
            parsed.test_date(),
            DateTime::from_timestamp(1_483_228_800, 500_000_000).unwrap()
        );
        assert_eq!(parsed.right_ear_data(), result.right_ear_data());
    }

    #[test]
    fn test_to_record_shape() {
        let rec = sample_result().to_record();
        assert_eq!(rec.len(), 5);
        assert_eq!(rec["rightEarClassification"], "Mild Hearing Loss");
        assert_eq!(rec["testDate"]["seconds"], 1_700_000_000i64);
        assert_eq!(rec["testDate"]["nanoseconds"], 250_000_000u32);
        assert_eq!(rec["rightEarData"][2]["frequency"], 2000.0);
        assert_eq!(rec["rightEarData"][2]["hearingLevel"], 30.0);
        assert!(!rec.contains_key("id"));
    }

    #[test]
    fn test_from_record_accepts_integer_numbers() {
        let parsed = TestResult::from_record("id", &valid_record()).unwrap();
        assert_eq!(parsed.id(), "id");
        assert_eq!(parsed.right_ear_data(), &[FrequencyPoint::new(1000.0, 20.0)]);
        assert_eq!(parsed.left_ear_data(), &[FrequencyPoint::new(1000.0, 35.5)]);
    }

    #[test]
    fn test_from_record_missing_fields() {
        for field in [
            FIELD_TEST_DATE,
            FIELD_RIGHT_CLASSIFICATION,
            FIELD_LEFT_CLASSIFICATION,
            FIELD_RIGHT_DATA,
            FIELD_LEFT_DATA,
        ] {
            let mut rec = valid_record();
            rec.remove(field);
            assert!(
                TestResult::from_record("id", &rec).is_none(),
                "record without {} should not parse",
                field
            );
            assert_eq!(
                TestResult::try_from_record("id", &rec),
                Err(RecordError::MissingField { field })
            );
        }
    }

    #[test]
    fn test_from_record_mistyped_fields() {
        let mut rec = valid_record();
        rec.insert(FIELD_LEFT_CLASSIFICATION.to_string(), json!(3));
        assert!(TestResult::from_record("id", &rec).is_none());

        let mut rec = valid_record();
        rec.insert(FIELD_RIGHT_DATA.to_string(), json!({ "frequency": 1000 }));
        assert!(TestResult::from_record("id", &rec).is_none());

        let mut rec = valid_record();
        rec.insert(FIELD_LEFT_DATA.to_string(), json!([{ "frequency": 1000 }, "x"]));
        assert!(TestResult::from_record("id", &rec).is_none());

        let mut rec = valid_record();
        rec.insert(FIELD_TEST_DATE.to_string(), json!("2024-05-01"));
        assert!(TestResult::from_record("id", &rec).is_none());
    }

    #[test]
    fn test_from_record_drops_malformed_points() {
        let mut rec = valid_record();
        rec.insert(
            FIELD_RIGHT_DATA.to_string(),
            json!([
                { "frequency": 1000, "hearingLevel": 20 },
                { "frequency": "bad" },
                { "hearingLevel": 40 },
                { "frequency": 2000, "hearingLevel": null },
            ]),
        );
        let parsed = TestResult::from_record("id", &rec).unwrap();
        assert_eq!(parsed.right_ear_data(), &[FrequencyPoint::new(1000.0, 20.0)]);
    }

    #[test]
    fn test_from_record_accepts_empty_lists() {
        let mut rec = valid_record();
        rec.insert(FIELD_RIGHT_DATA.to_string(), json!([]));
        rec.insert(FIELD_LEFT_DATA.to_string(), json!([]));
        let parsed = TestResult::from_record("id", &rec).unwrap();
        assert!(parsed.right_ear_data().is_empty());
        assert_eq!(parsed.left_ear_average_level(), 0.0);
    }

    #[test]
    fn test_non_finite_point_is_lost_on_roundtrip() {
        let result = TestResult::new(
            "id",
            date(),
            "Normal Hearing",
            "Normal Hearing",
            points(&[(f64::NAN, 10.0), (1000.0, 15.0)]),
            vec![],
        );
        let rec = result.to_record();
        assert!(rec["rightEarData"][0]["frequency"].is_null());
        let parsed = TestResult::from_record("id", &rec).unwrap();
        assert_eq!(parsed.right_ear_data(), &[FrequencyPoint::new(1000.0, 15.0)]);
    }

    #[test]
    fn test_average_levels() {
        let result = sample_result();
        assert!((result.right_ear_average_level() - 20.0).abs() < 1e-9);
        assert!((result.left_ear_average_level() - 65.0).abs() < 1e-9);

        let empty = TestResult::new("id", date(), "", "", vec![], vec![]);
        assert_eq!(empty.right_ear_average_level(), 0.0);
        assert_eq!(empty.left_ear_average_level(), 0.0);
    }

    #[test]
    fn test_data_point_tolerance_boundary() {
        let at_1010 = TestResult::new(
            "id",
            date(),
            "",
            "",
            points(&[(1010.0, 20.0)]),
            vec![],
        );
        assert!(at_1010.data_point(1000.0, Ear::Right).is_some());

        let at_1011 = TestResult::new(
            "id",
            date(),
            "",
            "",
            points(&[(1011.0, 20.0)]),
            vec![],
        );
        assert!(at_1011.data_point(1000.0, Ear::Right).is_none());

        let result = sample_result();
        assert_eq!(
            result.data_point(1005.0, Ear::Right),
            Some(&FrequencyPoint::new(1000.0, 20.0))
        );
        assert_eq!(
            result.data_point(1005.0, Ear::Left),
            Some(&FrequencyPoint::new(1000.0, 70.0))
        );
        assert!(result.data_point(4000.0, Ear::Left).is_none());
    }

    #[test]
    fn test_data_point_first_match_wins() {
        let result = TestResult::new(
            "id",
            date(),
            "",
            "",
            points(&[(992.0, 5.0), (1000.0, 25.0)]),
            vec![],
        );
        // 1000 is closer to the query but 992 comes first
        assert_eq!(
            result.data_point(999.0, Ear::Right),
            Some(&FrequencyPoint::new(992.0, 5.0))
        );
    }

    #[test]
    fn test_data_point_within_custom_tolerance() {
        let result = sample_result();
        assert!(result.data_point_within(1025.0, Ear::Right, 10.0).is_none());
        assert!(result.data_point_within(1025.0, Ear::Right, 25.0).is_some());
    }

    #[test]
    fn test_overall_status_picks_more_severe() {
        let result = sample_result();
        assert_eq!(result.overall_hearing_status(), "Severe Hearing Loss");

        let reversed = TestResult::new(
            "id",
            date(),
            "Profound Hearing Loss",
            "Mild Hearing Loss",
            vec![],
            vec![],
        );
        assert_eq!(reversed.overall_hearing_status(), "Profound Hearing Loss");
    }

    #[test]
    fn test_overall_status_ties_prefer_right_ear() {
        let same = TestResult::new(
            "id",
            date(),
            "Moderate Hearing Loss",
            "Moderate Hearing Loss",
            vec![],
            vec![],
        );
        assert_eq!(same.overall_hearing_status(), "Moderate Hearing Loss");

        // Unknown label ranks as normal, so it ties with "Normal Hearing"
        let unknown = TestResult::new(
            "id",
            date(),
            "Inconclusive",
            "Normal Hearing",
            vec![],
            vec![],
        );
        assert_eq!(unknown.overall_hearing_status(), "Inconclusive");

        let unknown_left = TestResult::new(
            "id",
            date(),
            "Mild Hearing Loss",
            "Inconclusive",
            vec![],
            vec![],
        );
        assert_eq!(unknown_left.overall_hearing_status(), "Mild Hearing Loss");
    }

    #[test]
    fn test_asymmetric_hearing_boundary() {
        let diff_20 = TestResult::new(
            "id",
            date(),
            "",
            "",
            points(&[(1000.0, 10.0)]),
            points(&[(1000.0, 30.0)]),
        );
        assert!(diff_20.has_asymmetric_hearing());

        let diff_15 = TestResult::new(
            "id",
            date(),
            "",
            "",
            points(&[(1000.0, 10.0)]),
            points(&[(1000.0, 25.0)]),
        );
        assert!(!diff_15.has_asymmetric_hearing());
        assert!(diff_15.is_asymmetric_beyond(10.0));
    }

    #[test]
    fn test_summary() {
        let summary = sample_result().summary();
        assert_eq!(summary.id, "abc123");
        assert_eq!(summary.overall_hearing_status, "Severe Hearing Loss");
        assert!(summary.has_asymmetric_hearing);
        assert_eq!(summary.right_ear_points, 3);
        assert_eq!(summary.left_ear_points, 2);

        let lenient = AudiogramConfig {
            asymmetry_threshold_db: 50.0,
            ..AudiogramConfig::default()
        };
        assert!(!sample_result().summary_with(&lenient).has_asymmetric_hearing);
    }
}
