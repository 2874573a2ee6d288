//! # Validate Subcommand
//!
//! Validates one document against one schema file and prints the error
//! report, as an indented outline or as JSON. The normalized document can be
//! written out with `--normalized-out`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use serde::Serialize;

use officer_core::{Report, Value};
use officer_schema::{descriptor, Officer, OfficerConfig, Verdict};

use crate::{load_document, write_document, EXIT_INVALID, EXIT_VALID};

/// Report rendering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Indented outline.
    #[default]
    Text,
    /// One JSON object with the verdict, reports, and normalized document.
    Json,
}

/// Arguments for the `officer validate` subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Schema file (JSON, or YAML by `.yaml`/`.yml` extension).
    #[arg(long, value_name = "FILE")]
    pub schema: PathBuf,

    /// Report format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Write the normalized document here.
    #[arg(long, value_name = "FILE")]
    pub normalized_out: Option<PathBuf>,

    /// Include informational messages in the report.
    #[arg(long)]
    pub explain: bool,

    /// Document to validate.
    #[arg(value_name = "DOCUMENT")]
    pub document: PathBuf,
}

/// JSON shape of a validation run.
#[derive(Serialize)]
struct JsonReport<'a> {
    valid: bool,
    errors: &'a Report,
    #[serde(skip_serializing_if = "Option::is_none")]
    info: Option<&'a Report>,
    document: &'a Value,
}

/// Execute the validate subcommand.
///
/// Returns exit code: 0 when valid, 1 when invalid. Operational failures are
/// returned as `Err`.
pub fn run_validate(args: &ValidateArgs, config: &OfficerConfig) -> Result<u8> {
    let schema = descriptor::load_schema(&args.schema)
        .with_context(|| format!("failed to load schema {}", args.schema.display()))?;
    tracing::info!(schema = %args.schema.display(), fields = schema.len(), "loaded schema");

    let document = load_document(&args.document)?;
    let verdict = Officer::with_config(&schema, config)
        .validate(document)
        .with_context(|| format!("validation of {} aborted", args.document.display()))?;

    tracing::info!(
        document = %args.document.display(),
        valid = verdict.is_valid(),
        errors = verdict.err.count(),
        "validated document"
    );

    if let Some(out) = &args.normalized_out {
        write_document(out, &verdict.document)?;
        tracing::info!(path = %out.display(), "wrote normalized document");
    }

    println!("{}", render(&verdict, args)?);

    Ok(if verdict.is_valid() { EXIT_VALID } else { EXIT_INVALID })
}

/// Render the verdict in the requested format.
fn render(verdict: &Verdict, args: &ValidateArgs) -> Result<String> {
    match args.format {
        OutputFormat::Json => {
            let report = JsonReport {
                valid: verdict.is_valid(),
                errors: &verdict.err,
                info: args.explain.then_some(&verdict.info),
                document: &verdict.document,
            };
            serde_json::to_string_pretty(&report).context("failed to render JSON report")
        }
        OutputFormat::Text => {
            let mut out = String::new();
            if verdict.is_valid() {
                out.push_str(&format!("VALID: {}", args.document.display()));
            } else {
                out.push_str(&format!(
                    "INVALID: {} ({} error(s))\n{}",
                    args.document.display(),
                    verdict.err.count(),
                    verdict.err
                ));
            }
            if args.explain {
                out.push_str(&format!("\nInfo:\n{}", verdict.info));
            }
            Ok(out.trim_end().to_string())
        }
    }
}
