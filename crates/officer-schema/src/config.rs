//! # Validation Configuration
//!
//! [`OfficerConfig`] holds the knobs that affect how a validation run is
//! reported, not what it accepts. Every field has a default, so a configuration
//! file only needs the keys it changes.

use std::path::Path;

use officer_core::OfficerError;
use serde::{Deserialize, Serialize};

/// Name of the root path segment when none is configured.
pub const DEFAULT_ROOT: &str = "root";

/// Reporting options for a validation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OfficerConfig {
    /// Root path segment, also the name of the top-level reports.
    pub root: String,
    /// Mirror every report message to `tracing` at `DEBUG` level.
    pub echo_messages: bool,
}

impl Default for OfficerConfig {
    fn default() -> Self {
        Self {
            root: DEFAULT_ROOT.to_string(),
            echo_messages: false,
        }
    }
}

impl OfficerConfig {
    /// Load a configuration from a YAML or JSON file.
    ///
    /// # Errors
    ///
    /// Returns `OfficerError::Document` if the file cannot be read or does
    /// not describe a configuration.
    pub fn from_file(path: &Path) -> Result<Self, OfficerError> {
        let content = std::fs::read_to_string(path).map_err(|e| OfficerError::Document {
            path: path.display().to_string(),
            reason: format!("cannot read file: {e}"),
        })?;
        // YAML is a superset of JSON, so one parser covers both.
        serde_yaml::from_str(&content).map_err(|e| OfficerError::Document {
            path: path.display().to_string(),
            reason: format!("invalid configuration: {e}"),
        })
    }
}
