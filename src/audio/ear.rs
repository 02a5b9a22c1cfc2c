// Ear selector shared with the audio subsystem

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which ear an audiogram belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ear {
    Left,
    Right,
}

impl fmt::Display for Ear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ear::Left => f.pad("left"),
            Ear::Right => f.pad("right"),
        }
    }
}
