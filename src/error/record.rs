// Record decoding error types and constants

use crate::error::ErrorCode;
use flutter_rust_bridge::frb;
use log::error;
use std::fmt;

/// Record error code constants exposed to Dart via FFI
///
/// Error code range: 3001-3004
#[frb(unignore)]
pub struct RecordErrorCodes {}

#[frb]
impl RecordErrorCodes {
    /// Required top-level field absent from the record
    pub const MISSING_FIELD: i32 = 3001;

    /// Field present but of the wrong shape
    pub const INVALID_FIELD: i32 = 3002;

    /// Timestamp components out of range
    pub const INVALID_TIMESTAMP: i32 = 3003;

    /// Record text is not a JSON object
    pub const MALFORMED_JSON: i32 = 3004;

    // Getter methods for FFI exposure (flutter_rust_bridge requires methods not const)

    /// Get MISSING_FIELD error code
    #[flutter_rust_bridge::frb(sync, getter)]
    pub fn missing_field() -> i32 {
        Self::MISSING_FIELD
    }

    /// Get INVALID_FIELD error code
    #[flutter_rust_bridge::frb(sync, getter)]
    pub fn invalid_field() -> i32 {
        Self::INVALID_FIELD
    }

    /// Get INVALID_TIMESTAMP error code
    #[flutter_rust_bridge::frb(sync, getter)]
    pub fn invalid_timestamp() -> i32 {
        Self::INVALID_TIMESTAMP
    }

    /// Get MALFORMED_JSON error code
    #[flutter_rust_bridge::frb(sync, getter)]
    pub fn malformed_json() -> i32 {
        Self::MALFORMED_JSON
    }
}

/// Log a record error with structured context
///
/// Logs the numeric code, the decoding component and the message
/// alongside the caller-supplied context.
pub fn log_record_error(err: &RecordError, context: &str) {
    error!(
        "Record error in {}: code={}, component=TestResultRecord, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Errors raised while decoding a persisted test result record
///
/// Only structural failures of required top-level fields are reported here.
/// Malformed entries inside the ear-data lists are dropped, never raised.
///
/// Error code ranges: 3001-3004
#[derive(Debug, Clone, PartialEq)]
pub enum RecordError {
    /// Required field is absent
    MissingField { field: &'static str },

    /// Field exists but does not have the expected shape
    InvalidField {
        field: &'static str,
        expected: &'static str,
    },

    /// Timestamp object could not be turned into a date
    InvalidTimestamp { seconds: i64, nanoseconds: u32 },

    /// Input text could not be parsed as a JSON object
    MalformedJson { reason: String },
}

impl ErrorCode for RecordError {
    fn code(&self) -> i32 {
        match self {
            RecordError::MissingField { .. } => RecordErrorCodes::MISSING_FIELD,
            RecordError::InvalidField { .. } => RecordErrorCodes::INVALID_FIELD,
            RecordError::InvalidTimestamp { .. } => RecordErrorCodes::INVALID_TIMESTAMP,
            RecordError::MalformedJson { .. } => RecordErrorCodes::MALFORMED_JSON,
        }
    }

    fn message(&self) -> String {
        match self {
            RecordError::MissingField { field } => {
                format!("Missing required field '{}'", field)
            }
            RecordError::InvalidField { field, expected } => {
                format!("Field '{}' is not {}", field, expected)
            }
            RecordError::InvalidTimestamp {
                seconds,
                nanoseconds,
            } => {
                format!(
                    "Timestamp out of range: seconds={}, nanoseconds={}",
                    seconds, nanoseconds
                )
            }
            RecordError::MalformedJson { reason } => {
                format!("Malformed record JSON: {}", reason)
            }
        }
    }
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RecordError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for RecordError {}

impl From<serde_json::Error> for RecordError {
    fn from(err: serde_json::Error) -> Self {
        RecordError::MalformedJson {
            reason: err.to_string(),
        }
    }
}
