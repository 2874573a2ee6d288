//! # officer-cli: Command-Line Validation
//!
//! Provides the `officer` command-line interface over `officer-schema`.
//!
//! ## Subcommands
//!
//! - `officer validate`: Validate a document against a schema file.
//! - `officer schema`: List the fields a schema file declares.
//!
//! ```bash
//! officer validate --schema order.yaml order.json
//! officer validate --schema order.yaml --format json --normalized-out clean.json order.json
//! officer -v schema order.yaml
//! ```
//!
//! ## Exit Codes
//!
//! `0` valid, `1` invalid, `2` the run itself failed (unreadable file,
//! malformed schema, failing hook).

pub mod inspect;
pub mod validate;

use std::path::Path;

use anyhow::{Context, Result};
use officer_core::Value;
use officer_schema::OfficerConfig;

/// The document satisfied the schema.
pub const EXIT_VALID: u8 = 0;
/// The document failed at least one check.
pub const EXIT_INVALID: u8 = 1;
/// The run could not complete.
pub const EXIT_OPERATIONAL: u8 = 2;

/// Load the configuration file, or the defaults when none is given.
pub fn load_config(path: Option<&Path>) -> Result<OfficerConfig> {
    match path {
        Some(path) => {
            let config = OfficerConfig::from_file(path)
                .with_context(|| format!("failed to load config {}", path.display()))?;
            tracing::debug!(path = %path.display(), root = %config.root, "loaded configuration");
            Ok(config)
        }
        None => Ok(OfficerConfig::default()),
    }
}

/// True for `.yaml` and `.yml` paths.
fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml" | "yml")
    )
}

/// Load a JSON or YAML document, choosing the format by file extension.
pub fn load_document(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    if is_yaml(path) {
        let yaml: serde_yaml::Value = serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse YAML {}", path.display()))?;
        Value::from_yaml(&yaml)
            .map_err(anyhow::Error::msg)
            .with_context(|| format!("unsupported YAML in {}", path.display()))
    } else {
        let json: serde_json::Value = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse JSON {}", path.display()))?;
        Ok(Value::from(json))
    }
}

/// Write a document as JSON, or as YAML for `.yaml`/`.yml` paths.
pub fn write_document(path: &Path, document: &Value) -> Result<()> {
    let json = document.to_json();
    let content = if is_yaml(path) {
        serde_yaml::to_string(&json).context("failed to render YAML")?
    } else {
        let mut text = serde_json::to_string_pretty(&json).context("failed to render JSON")?;
        text.push('\n');
        text
    };
    std::fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
}
