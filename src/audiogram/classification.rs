// Hearing loss severity scale
//
// Classification labels are stored as free-form strings on a test result.
// This module ranks them on a fixed 0-5 scale so the two ears can be
// compared, and maps average hearing levels onto the same scale.

use serde::{Deserialize, Serialize};

/// Severity grades, ordered from least to most severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HearingClassification {
    Normal,
    Mild,
    Moderate,
    ModeratelySevere,
    Severe,
    Profound,
}

impl HearingClassification {
    pub const ALL: [HearingClassification; 6] = [
        HearingClassification::Normal,
        HearingClassification::Mild,
        HearingClassification::Moderate,
        HearingClassification::ModeratelySevere,
        HearingClassification::Severe,
        HearingClassification::Profound,
    ];

    /// Label as stored in persisted records
    pub fn label(self) -> &'static str {
        match self {
            HearingClassification::Normal => "Normal Hearing",
            HearingClassification::Mild => "Mild Hearing Loss",
            HearingClassification::Moderate => "Moderate Hearing Loss",
            HearingClassification::ModeratelySevere => "Moderately Severe Hearing Loss",
            HearingClassification::Severe => "Severe Hearing Loss",
            HearingClassification::Profound => "Profound Hearing Loss",
        }
    }

    pub fn rank(self) -> u8 {
        self as u8
    }

    /// Exact-match lookup of a stored label
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.label() == label)
    }

    /// Grade a pure-tone average (dB HL) using the standard audiometric ranges
    ///
    /// Upper bounds are inclusive: <=25 Normal, <=40 Mild, <=55 Moderate,
    /// <=70 Moderately Severe, <=90 Severe, above that Profound.
    pub fn from_average_level(level_db: f64) -> Self {
        if level_db <= 25.0 {
            HearingClassification::Normal
        } else if level_db <= 40.0 {
            HearingClassification::Mild
        } else if level_db <= 55.0 {
            HearingClassification::Moderate
        } else if level_db <= 70.0 {
            HearingClassification::ModeratelySevere
        } else if level_db <= 90.0 {
            HearingClassification::Severe
        } else {
            HearingClassification::Profound
        }
    }
}

/// Rank of a stored classification label
///
/// Labels outside the table rank 0, the same as normal hearing.
pub fn severity_rank(label: &str) -> u8 {
    match HearingClassification::from_label(label) {
        Some(classification) => classification.rank(),
        None => {
            log::debug!("[Classification] Unknown label {:?} ranked as normal", label);
            0
        }
    }
}
