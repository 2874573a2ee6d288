//! # Schema Subcommand
//!
//! Loads a schema file and lists every field it declares, one per line, with
//! its flattened path, kind, and flags. Fields of nested documents are
//! listed under their parent's path.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use officer_core::{flatten, DocPath};
use officer_schema::{descriptor, Node, Schema};

use crate::EXIT_VALID;

/// Arguments for the `officer schema` subcommand.
#[derive(Args, Debug)]
pub struct SchemaArgs {
    /// Schema file (JSON, or YAML by `.yaml`/`.yml` extension).
    #[arg(value_name = "FILE")]
    pub path: PathBuf,
}

/// One declared field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSummary {
    /// Flattened path from the schema root.
    pub path: String,
    /// Kind name, or `document` for nested schemas.
    pub kind: String,
    /// Flags set on the field, in a fixed order.
    pub flags: Vec<&'static str>,
}

/// Execute the schema subcommand.
pub fn run_schema(args: &SchemaArgs) -> Result<u8> {
    let schema = descriptor::load_schema(&args.path)
        .with_context(|| format!("failed to load schema {}", args.path.display()))?;

    let summaries = summarize(&schema);
    let width = summaries.iter().map(|s| s.path.len()).max().unwrap_or(0);
    for summary in &summaries {
        println!(
            "{:width$}  {:10}  {}",
            summary.path,
            summary.kind,
            summary.flags.join(",")
        );
    }
    tracing::info!(fields = summaries.len(), "listed schema fields");
    Ok(EXIT_VALID)
}

/// Every field of `schema`, depth first in declaration order.
pub fn summarize(schema: &Schema) -> Vec<FieldSummary> {
    let mut out = Vec::new();
    collect(schema, &DocPath::default(), &mut out);
    out
}

fn collect(schema: &Schema, parent: &DocPath, out: &mut Vec<FieldSummary>) {
    for (key, field) in schema.iter() {
        let path = parent.child(key);

        let mut flags = Vec::new();
        if field.optional {
            flags.push("optional");
        }
        if field.collection {
            flags.push("collection");
        }

        match &field.node {
            Node::Leaf(rule) => {
                for (set, flag) in [
                    (rule.coerce, "coerce"),
                    (rule.default.is_some(), "default"),
                    (rule.before.is_some(), "before"),
                    (rule.after.is_some(), "after"),
                    (rule.pattern.is_some(), "pattern"),
                    (rule.range.is_some(), "range"),
                ] {
                    if set {
                        flags.push(flag);
                    }
                }
                out.push(FieldSummary {
                    path: flatten(&path),
                    kind: rule.kind.to_string(),
                    flags,
                });
            }
            Node::Nested(nested) => {
                out.push(FieldSummary {
                    path: flatten(&path),
                    kind: "document".to_string(),
                    flags,
                });
                collect(nested, &path, out);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use officer_schema::{Field, Range, Rule};

    #[test]
    fn test_summarize_nested_schema() {
        let schema = Schema::new()
            .field("name", Rule::text().coerce())
            .field(
                "lines",
                Field::nested(
                    Schema::new()
                        .field("sku", Rule::text())
                        .field("qty", Field::from(Rule::number().range(Range::at_least(1))).optional()),
                )
                .collection(),
            );

        let summaries = summarize(&schema);
        let rows: Vec<(&str, &str)> = summaries
            .iter()
            .map(|s| (s.path.as_str(), s.kind.as_str()))
            .collect();
        assert_eq!(
            rows,
            [
                ("name", "string"),
                ("lines", "document"),
                ("lines.sku", "string"),
                ("lines.qty", "number"),
            ]
        );
        assert_eq!(summaries[0].flags, ["coerce"]);
        assert_eq!(summaries[1].flags, ["collection"]);
        assert_eq!(summaries[3].flags, ["optional", "range"]);
    }

    #[test]
    fn test_run_schema_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schema.json");
        std::fs::write(&path, r#"{"name": {"type": "string"}}"#).unwrap();
        assert_eq!(run_schema(&SchemaArgs { path }).unwrap(), EXIT_VALID);
    }

    #[test]
    fn test_run_schema_rejects_bad_descriptor() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schema.json");
        std::fs::write(&path, r#"{"name": {"type": "widget"}}"#).unwrap();
        let err = run_schema(&SchemaArgs { path }).unwrap_err();
        assert!(format!("{err:#}").contains("unknown type `widget`"));
    }
}
