//! Configuration management for audiogram analysis
//!
//! This module provides runtime configuration loading from JSON files so
//! lookup tolerances and the asymmetry threshold can be tuned without
//! recompilation. Missing sections fall back to their defaults.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::audiogram::{ASYMMETRY_THRESHOLD_DB, DATA_POINT_TOLERANCE_HZ};

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub audiogram: AudiogramConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Audiogram analysis parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AudiogramConfig {
    /// Maximum distance in Hz between a queried and a stored frequency
    pub match_tolerance_hz: f64,
    /// Ear-average difference in dB above which hearing is asymmetric
    pub asymmetry_threshold_db: f64,
}

impl Default for AudiogramConfig {
    fn default() -> Self {
        Self {
            match_tolerance_hz: DATA_POINT_TOLERANCE_HZ,
            asymmetry_threshold_db: ASYMMETRY_THRESHOLD_DB,
        }
    }
}

/// Document store settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Collection holding test result documents
    pub collection: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            collection: "testResults".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from JSON file
    ///
    /// # Arguments
    /// * `path` - Path to JSON config file
    ///
    /// # Returns
    /// The loaded configuration, or the defaults when the file is missing or
    /// its JSON is invalid
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    log::info!("[Config] Loaded configuration from {:?}", path.as_ref());
                    config
                }
                Err(err) => {
                    log::warn!(
                        "[Config] Failed to parse JSON from {:?}: {}. Using defaults.",
                        path.as_ref(),
                        err
                    );
                    Self::default()
                }
            },
            Err(err) => {
                log::warn!(
                    "[Config] Failed to read config file {:?}: {}. Using defaults.",
                    path.as_ref(),
                    err
                );
                Self::default()
            }
        }
    }

    /// Load configuration from the bundled assets directory
    pub fn load() -> Self {
        Self::load_from_file("assets/hearing_config.json")
    }
}
