// Public API for flutter_rust_bridge integration
// This module provides FFI functions for Flutter to decode, encode and summarize
// hearing test results exchanged with the remote document store as JSON text.

#![allow(dead_code)] // FFI functions are called from Dart, not detected by Rust analyzer

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use serde_json::Value;

use crate::audio::Ear;
use crate::audiogram::{
    parse_record, FrequencyPoint, HearingClassification, TestResult, TestResultSummary,
};
use crate::config::AppConfig;
use crate::error::{log_record_error, RecordError};

// Re-export error code constants for FFI exposure
pub use crate::error::RecordErrorCodes;

/// Configuration shared by all FFI calls, loaded on first use
static APP_CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::load);

/// Initialize logging and configuration
///
/// Safe to call more than once. Returns the configured collection name so the
/// Dart side can address the same documents.
#[flutter_rust_bridge::frb(sync)]
pub fn init_app() -> Result<String> {
    crate::init_logging();
    Ok(APP_CONFIG.storage.collection.clone())
}

/// Get the version of the hearing test core
#[flutter_rust_bridge::frb(sync)]
pub fn get_version() -> Result<String> {
    Ok(env!("CARGO_PKG_VERSION").to_string())
}

/// Decode a stored document into a test result
///
/// # Arguments
/// * `id` - Document identifier assigned by the store
/// * `record_json` - Document body as JSON text
///
/// # Returns
/// * `Ok(Some(TestResult))` - Record decoded
/// * `Ok(None)` - Record is a JSON object but lacks a required field
/// * `Err` - Text is not a JSON object
#[flutter_rust_bridge::frb(sync)]
pub fn decode_test_result(id: String, record_json: String) -> Result<Option<TestResult>> {
    let record = parse_record(&record_json).map_err(|err| {
        log_record_error(&err, "decode_test_result");
        err
    })?;
    Ok(TestResult::from_record(id, &record))
}

/// Decode a stored document, reporting which field made it unreadable
#[flutter_rust_bridge::frb(sync)]
pub fn decode_test_result_strict(
    id: String,
    record_json: String,
) -> Result<TestResult, RecordError> {
    let record = parse_record(&record_json)?;
    TestResult::try_from_record(id, &record).map_err(|err| {
        log_record_error(&err, "decode_test_result_strict");
        err
    })
}

/// Encode a test result as document JSON ready to be written to the store
#[flutter_rust_bridge::frb(sync)]
pub fn encode_test_result(result: &TestResult) -> Result<String> {
    serde_json::to_string(&Value::Object(result.to_record()))
        .context("Failed to serialize test result record")
}

/// Decode a stored document and compute its summary figures
///
/// Uses the configured asymmetry threshold.
#[flutter_rust_bridge::frb(sync)]
pub fn summarize_test_result(
    id: String,
    record_json: String,
) -> Result<Option<TestResultSummary>> {
    let result = decode_test_result(id, record_json)?;
    Ok(result.map(|r| r.summary_with(&APP_CONFIG.audiogram)))
}

/// First measured point within the configured tolerance of `frequency`
#[flutter_rust_bridge::frb(sync)]
pub fn lookup_data_point(result: &TestResult, frequency: f64, ear: Ear) -> Option<FrequencyPoint> {
    result
        .data_point_within(frequency, ear, APP_CONFIG.audiogram.match_tolerance_hz)
        .copied()
}

/// Label for an average hearing level in dB HL
#[flutter_rust_bridge::frb(sync)]
pub fn classify_average_level(level_db: f64) -> String {
    HearingClassification::from_average_level(level_db)
        .label()
        .to_string()
}
