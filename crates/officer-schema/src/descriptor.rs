//! # Schema Descriptors
//!
//! Builds a [`Schema`] from its data form, as found in JSON or YAML schema
//! files:
//!
//! ```yaml
//! name:
//!   type: string
//!   name: full name
//!   before: trim
//!   regExp: { rule: "^[A-Z]", error: "Must start with a capital" }
//! age:
//!   type: number
//!   coerce: true
//!   range: [0, 150]
//! addresses:
//!   type: { street: { type: string } }
//!   collection: true
//!   optional: true
//! ```
//!
//! A `type` that is a mapping declares a nested document. Leaf options on a
//! nested field are rejected, as are unknown option names and unknown kind
//! names. Functions cannot be written in a file, so `before` and `after`
//! name one of the built-in transforms: `trim`, `lowercase`, `uppercase`,
//! `round`, `floor`, `ceil`.

use std::path::Path;

use officer_core::temporal::parse_date;
use officer_core::{Coercions, DocPath, HookError, OfficerError, Value, ValueKind};
use serde::Deserialize;

use crate::schema::{Field, Range, Rule, Schema};

/// One field as written in a schema file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
struct FieldDescriptor {
    #[serde(rename = "type")]
    kind: serde_json::Value,
    #[serde(default)]
    optional: bool,
    #[serde(default)]
    collection: bool,
    name: Option<String>,
    #[serde(default)]
    coerce: bool,
    default: Option<serde_json::Value>,
    before: Option<String>,
    after: Option<String>,
    reg_exp: Option<PatternDescriptor>,
    range: Option<Vec<serde_json::Value>>,
}

impl FieldDescriptor {
    /// Names of the leaf-only options that are set.
    fn leaf_options(&self) -> Vec<&'static str> {
        let mut set = Vec::new();
        if self.coerce {
            set.push("coerce");
        }
        if self.default.is_some() {
            set.push("default");
        }
        if self.before.is_some() {
            set.push("before");
        }
        if self.after.is_some() {
            set.push("after");
        }
        if self.reg_exp.is_some() {
            set.push("regExp");
        }
        if self.range.is_some() {
            set.push("range");
        }
        set
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PatternDescriptor {
    rule: String,
    error: String,
}

/// Build a schema from its data form, resolving kinds against the standard
/// registry.
///
/// # Errors
///
/// Returns `OfficerError::Descriptor` naming the offending field.
pub fn parse_schema(descriptor: &serde_json::Value) -> Result<Schema, OfficerError> {
    parse_schema_with(descriptor, &Coercions::standard())
}

/// Build a schema from its data form. Kind names that are not built in must
/// be registered in `coercions`.
///
/// # Errors
///
/// Returns `OfficerError::Descriptor` naming the offending field.
pub fn parse_schema_with(
    descriptor: &serde_json::Value,
    coercions: &Coercions,
) -> Result<Schema, OfficerError> {
    parse_level(descriptor, &DocPath::default(), coercions)
}

/// Load a schema file. `.yaml`/`.yml` files are read as YAML, anything else
/// as JSON.
///
/// # Errors
///
/// Returns `OfficerError::Io` if the file cannot be read and
/// `OfficerError::Descriptor` if it does not describe a schema.
pub fn load_schema(path: &Path) -> Result<Schema, OfficerError> {
    load_schema_with(path, &Coercions::standard())
}

/// [`load_schema`] with custom kinds resolved against `coercions`.
///
/// # Errors
///
/// As [`load_schema`].
pub fn load_schema_with(path: &Path, coercions: &Coercions) -> Result<Schema, OfficerError> {
    let content = std::fs::read_to_string(path)?;
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    let descriptor: serde_json::Value = match ext {
        "yaml" | "yml" => serde_yaml::from_str(&content).map_err(|e| OfficerError::Descriptor {
            path: path.display().to_string(),
            reason: format!("YAML parse error: {e}"),
        })?,
        _ => serde_json::from_str(&content).map_err(|e| OfficerError::Descriptor {
            path: path.display().to_string(),
            reason: format!("JSON parse error: {e}"),
        })?,
    };

    tracing::debug!(path = %path.display(), "loaded schema descriptor");
    parse_schema_with(&descriptor, coercions)
}

fn descriptor_error(path: &DocPath, reason: impl Into<String>) -> OfficerError {
    OfficerError::Descriptor {
        path: path.to_string(),
        reason: reason.into(),
    }
}

fn parse_level(
    descriptor: &serde_json::Value,
    path: &DocPath,
    coercions: &Coercions,
) -> Result<Schema, OfficerError> {
    let serde_json::Value::Object(entries) = descriptor else {
        return Err(descriptor_error(path, "a schema must be a mapping of field names"));
    };

    let mut schema = Schema::new();
    for (key, entry) in entries {
        let field_path = path.child(key.as_str());
        let field: FieldDescriptor = serde_json::from_value(entry.clone())
            .map_err(|e| descriptor_error(&field_path, e.to_string()))?;
        schema.insert(key.as_str(), parse_field(field, &field_path, coercions)?);
    }
    Ok(schema)
}

fn parse_field(
    descriptor: FieldDescriptor,
    path: &DocPath,
    coercions: &Coercions,
) -> Result<Field, OfficerError> {
    let mut field = match &descriptor.kind {
        serde_json::Value::Object(_) => {
            let leaf_options = descriptor.leaf_options();
            if !leaf_options.is_empty() {
                return Err(descriptor_error(
                    path,
                    format!("nested documents do not accept: {}", leaf_options.join(", ")),
                ));
            }
            Field::nested(parse_level(&descriptor.kind, path, coercions)?)
        }
        serde_json::Value::String(name) => {
            let kind = resolve_kind(name, coercions)
                .ok_or_else(|| descriptor_error(path, format!("unknown type `{name}`")))?;
            Field::leaf(parse_rule(kind, &descriptor, path)?)
        }
        other => {
            return Err(descriptor_error(
                path,
                format!("`type` must be a kind name or a mapping, not {other}"),
            ))
        }
    };

    if descriptor.optional {
        field = field.optional();
    }
    if descriptor.collection {
        field = field.collection();
    }
    if let Some(label) = descriptor.name {
        field = field.label(label);
    }
    Ok(field)
}

fn resolve_kind(name: &str, coercions: &Coercions) -> Option<ValueKind> {
    ValueKind::from_name(name).or_else(|| coercions.has_kind(name).then(|| ValueKind::Custom(name.to_string())))
}

fn parse_rule(kind: ValueKind, descriptor: &FieldDescriptor, path: &DocPath) -> Result<Rule, OfficerError> {
    let mut rule = Rule::new(kind);

    if descriptor.coerce {
        rule = rule.coerce();
    }
    if let Some(default) = &descriptor.default {
        if !default.is_null() {
            let value = literal(default, &rule.kind);
            rule = rule.default_value(value);
        }
    }
    if let Some(name) = &descriptor.before {
        let transform = named_transform(name)
            .ok_or_else(|| descriptor_error(path, format!("unknown transform `{name}` for before")))?;
        rule = rule.before(transform);
    }
    if let Some(name) = &descriptor.after {
        let transform = named_transform(name)
            .ok_or_else(|| descriptor_error(path, format!("unknown transform `{name}` for after")))?;
        rule = rule.after(transform);
    }
    if let Some(pattern) = &descriptor.reg_exp {
        rule = rule
            .pattern(&pattern.rule, pattern.error.as_str())
            .map_err(|e| descriptor_error(path, format!("invalid regExp: {e}")))?;
    }
    if let Some(bounds) = &descriptor.range {
        let range = parse_range(bounds, &rule.kind, path)?;
        rule = rule.range(range);
    }
    Ok(rule)
}

/// A literal from a file. Date strings become dates on date fields.
fn literal(value: &serde_json::Value, kind: &ValueKind) -> Value {
    match (kind, value) {
        (ValueKind::Date, serde_json::Value::String(s)) => {
            parse_date(s).map_or_else(|| Value::from(s.as_str()), Value::Date)
        }
        _ => Value::from(value.clone()),
    }
}

fn parse_range(bounds: &[serde_json::Value], kind: &ValueKind, path: &DocPath) -> Result<Range, OfficerError> {
    if bounds.len() > 2 {
        return Err(descriptor_error(path, "range takes at most two bounds"));
    }

    let mut parsed = bounds.iter().map(|bound| parse_bound(bound, kind, path));
    let min = parsed.next().transpose()?.flatten();
    let max = parsed.next().transpose()?.flatten();
    Ok(Range { min, max })
}

fn parse_bound(bound: &serde_json::Value, kind: &ValueKind, path: &DocPath) -> Result<Option<Value>, OfficerError> {
    match bound {
        serde_json::Value::Null => Ok(None),
        serde_json::Value::Number(n) => n
            .as_f64()
            .map(|n| Some(Value::Number(n)))
            .ok_or_else(|| descriptor_error(path, format!("range bound {n} is out of range"))),
        serde_json::Value::String(s) if *kind == ValueKind::Date => parse_date(s)
            .map(|d| Some(Value::Date(d)))
            .ok_or_else(|| descriptor_error(path, format!("range bound `{s}` is not a date"))),
        other => Err(descriptor_error(
            path,
            format!("range bound must be a number or, for dates, a date string; got {other}"),
        )),
    }
}

type NamedTransform = fn(Value) -> Result<Value, HookError>;

/// The built-in transform called `name`. Values of a kind a transform does
/// not apply to pass through unchanged.
fn named_transform(name: &str) -> Option<NamedTransform> {
    let transform: NamedTransform = match name {
        "trim" => |v: Value| Ok(map_text(v, |s| s.trim().to_string())),
        "lowercase" => |v: Value| Ok(map_text(v, |s| s.to_lowercase())),
        "uppercase" => |v: Value| Ok(map_text(v, |s| s.to_uppercase())),
        // Halves round up, towards positive infinity.
        "round" => |v: Value| Ok(map_number(v, |n| (n + 0.5).floor())),
        "floor" => |v: Value| Ok(map_number(v, f64::floor)),
        "ceil" => |v: Value| Ok(map_number(v, f64::ceil)),
        _ => return None,
    };
    Some(transform)
}

fn map_text(value: Value, f: impl FnOnce(&str) -> String) -> Value {
    match value {
        Value::Text(s) => Value::Text(f(&s)),
        other => other,
    }
}

fn map_number(value: Value, f: impl FnOnce(f64) -> f64) -> Value {
    match value {
        Value::Number(n) => Value::Number(f(n)),
        other => other,
    }
}
