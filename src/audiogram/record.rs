// Typed access to untyped document-store records
//
// A record is the key-value map the remote document store hands back for a
// document. Each helper pulls one field out with a concrete type and reports
// a RecordError when the field is absent or has the wrong shape, so callers
// can compose them with `?`.

use chrono::{DateTime, Utc};
use serde_json::{json, Map, Value};

use crate::error::RecordError;

/// Untyped document body as stored remotely
pub type Record = Map<String, Value>;

/// Parse a JSON object into a record
pub fn parse_record(text: &str) -> Result<Record, RecordError> {
    match serde_json::from_str::<Value>(text)? {
        Value::Object(map) => Ok(map),
        other => Err(RecordError::MalformedJson {
            reason: format!("expected a JSON object, found {}", json_kind(&other)),
        }),
    }
}

fn required<'a>(record: &'a Record, field: &'static str) -> Result<&'a Value, RecordError> {
    record
        .get(field)
        .ok_or(RecordError::MissingField { field })
}

/// Extract a string field
pub fn string_field<'a>(record: &'a Record, field: &'static str) -> Result<&'a str, RecordError> {
    required(record, field)?
        .as_str()
        .ok_or(RecordError::InvalidField {
            field,
            expected: "a string",
        })
}

/// Extract a list whose entries are all records
///
/// A single non-record entry makes the whole field invalid.
pub fn record_list_field<'a>(
    record: &'a Record,
    field: &'static str,
) -> Result<Vec<&'a Record>, RecordError> {
    let invalid = RecordError::InvalidField {
        field,
        expected: "a list of records",
    };
    required(record, field)?
        .as_array()
        .ok_or_else(|| invalid.clone())?
        .iter()
        .map(|entry| entry.as_object().ok_or_else(|| invalid.clone()))
        .collect()
}

/// Extract a numeric field, integer or floating point
pub fn number_field(record: &Record, field: &str) -> Option<f64> {
    record.get(field).and_then(Value::as_f64)
}

/// Extract a native timestamp (`{"seconds", "nanoseconds"}`)
pub fn timestamp_field(
    record: &Record,
    field: &'static str,
) -> Result<DateTime<Utc>, RecordError> {
    let invalid = RecordError::InvalidField {
        field,
        expected: "a timestamp",
    };
    let timestamp = required(record, field)?
        .as_object()
        .ok_or_else(|| invalid.clone())?;

    let seconds = timestamp
        .get("seconds")
        .and_then(Value::as_i64)
        .ok_or_else(|| invalid.clone())?;
    let nanoseconds = timestamp
        .get("nanoseconds")
        .and_then(Value::as_u64)
        .and_then(|n| u32::try_from(n).ok())
        .ok_or(invalid)?;

    let out_of_range = RecordError::InvalidTimestamp {
        seconds,
        nanoseconds,
    };
    // Leap-second nanosecond values are not produced by the store
    if nanoseconds >= 1_000_000_000 {
        return Err(out_of_range);
    }
    DateTime::from_timestamp(seconds, nanoseconds).ok_or(out_of_range)
}

/// Encode a date as a native timestamp value
///
/// A leap-second instant carries 1e9 or more sub-second nanoseconds; the
/// overflow is folded into the next whole second so the stored nanoseconds
/// stay below 1e9.
pub fn timestamp_value(date: &DateTime<Utc>) -> Value {
    let mut seconds = date.timestamp();
    let mut nanoseconds = date.timestamp_subsec_nanos();
    if nanoseconds >= 1_000_000_000 {
        seconds += 1;
        nanoseconds -= 1_000_000_000;
    }
    json!({
        "seconds": seconds,
        "nanoseconds": nanoseconds,
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
