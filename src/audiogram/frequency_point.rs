// FrequencyPoint - one measured threshold on an audiogram

use serde::{Deserialize, Serialize};

/// A single audiometric measurement: hearing level (dB) at a frequency (Hz)
///
/// Within one ear's sequence the frequency acts as the key; callers must not
/// store two points with the same frequency.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrequencyPoint {
    /// Test tone frequency in Hz
    pub frequency: f64,
    /// Measured hearing level in dB
    pub hearing_level: f64,
}

impl FrequencyPoint {
    pub fn new(frequency: f64, hearing_level: f64) -> Self {
        Self {
            frequency,
            hearing_level,
        }
    }

    /// Axis label for the frequency
    ///
    /// Frequencies of 1000 Hz and above render as whole kHz with the
    /// fraction truncated (1500 -> "1k"); lower ones as whole Hz.
    pub fn frequency_label(&self) -> String {
        if self.frequency >= 1000.0 {
            format!("{}k", (self.frequency / 1000.0) as i64)
        } else {
            format!("{}", self.frequency as i64)
        }
    }
}
