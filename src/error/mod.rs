// Error types for the hearing test core
//
// This module defines custom error types for persisted record decoding,
// providing structured error handling with error codes suitable for FFI communication.

mod record;

pub use record::{log_record_error, RecordError, RecordErrorCodes};

/// Error codes for structured error reporting
///
/// This trait provides a standard way to get error codes and messages
/// from custom error types, enabling consistent error handling across
/// the FFI boundary.
pub trait ErrorCode {
    /// Get the numeric error code
    fn code(&self) -> i32;

    /// Get the human-readable error message
    fn message(&self) -> String;
}
