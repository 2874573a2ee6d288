//! # Document Walker
//!
//! [`Officer`] validates a mapping against a [`Schema`], recursing into
//! nested documents and collections of documents, and delegating leaves to
//! [`PropertyValidator`].
//!
//! ## Passes
//!
//! 1. **Filter**: every document key the schema does not declare is
//!    removed. Driven by the document's keys.
//! 2. **Examine**: every schema key, in declaration order, is validated.
//!    Driven by the schema, so keys absent from the document are still
//!    checked for presence.
//!
//! The normalized document keeps the input's key order. Keys filled from
//! defaults are appended in schema order.
//!
//! Child reports are merged into this officer's reports under the key's
//! name; collection elements are merged under their index.
//!
//! ## Ownership
//!
//! The document is taken by value and the normalized document is returned
//! in the [`Verdict`]. Callers who need the original keep a clone.

use std::sync::OnceLock;

use officer_core::kind::article;
use officer_core::{Coercions, DocPath, Map, OfficerError, Report, Segment, Value};

use crate::config::{OfficerConfig, DEFAULT_ROOT};
use crate::property::PropertyValidator;
use crate::schema::{Field, Node, Schema};

/// Registry used when none is supplied.
fn standard_coercions() -> &'static Coercions {
    static STANDARD: OnceLock<Coercions> = OnceLock::new();
    STANDARD.get_or_init(Coercions::standard)
}

/// Result of validating a document.
#[derive(Debug, Clone)]
pub struct Verdict {
    /// The normalized document.
    pub document: Value,
    /// Error report tree.
    pub err: Report,
    /// Informational report tree.
    pub info: Report,
}

impl Verdict {
    /// True when the error tree holds no message anywhere.
    pub fn is_valid(&self) -> bool {
        self.err.is_empty()
    }
}

/// Validates documents against one schema level.
///
/// An `Officer` is transient: build one, call [`Officer::validate`], read
/// the [`Verdict`].
pub struct Officer<'a> {
    schema: &'a Schema,
    path: DocPath,
    coercions: &'a Coercions,
    echo: bool,
    err: Report,
    info: Report,
}

impl<'a> Officer<'a> {
    /// An officer for `schema` rooted at `root`.
    pub fn new(schema: &'a Schema) -> Self {
        Self::at(schema, DocPath::root(DEFAULT_ROOT))
    }

    /// An officer for `schema` at `path`. Reports are named after the
    /// path's last segment.
    pub fn at(schema: &'a Schema, path: DocPath) -> Self {
        let name = path.leaf_name();
        Self {
            schema,
            path,
            coercions: standard_coercions(),
            echo: false,
            err: Report::new(name.clone()),
            info: Report::new(name),
        }
    }

    /// An officer configured by `config`.
    pub fn with_config(schema: &'a Schema, config: &OfficerConfig) -> Self {
        let mut officer = Self::at(schema, DocPath::root(config.root.clone()));
        officer.set_echo(config.echo_messages);
        officer
    }

    /// Use `coercions` for kind tests and conversions.
    pub fn with_coercions(mut self, coercions: &'a Coercions) -> Self {
        self.coercions = coercions;
        self
    }

    fn set_echo(&mut self, echo: bool) {
        self.echo = echo;
        self.err = Report::echoing(self.err.name(), echo);
        self.info = Report::echoing(self.info.name(), echo);
    }

    /// An officer for a nested schema, sharing this one's settings.
    fn child(&self, schema: &'a Schema, path: DocPath) -> Officer<'a> {
        let mut officer = Officer::at(schema, path).with_coercions(self.coercions);
        officer.set_echo(self.echo);
        officer
    }

    fn report(&self, name: &str) -> Report {
        Report::echoing(name, self.echo)
    }

    fn note_info(&mut self, key: &str, message: impl Into<String>) {
        let mut report = self.report(key);
        report.add_message(message);
        self.info.add_child(report);
    }

    fn note_err(&mut self, key: &str, message: impl Into<String>) {
        let mut report = self.report(key);
        report.add_message(message);
        self.err.add_child(report);
    }

    /// Validate `document`.
    ///
    /// # Errors
    ///
    /// Validation failures are reported in [`Verdict::err`], not here. The
    /// only error is `OfficerError::Hook`, returned when a transform or
    /// default producer fails anywhere in the document.
    pub fn validate(mut self, document: Value) -> Result<Verdict, OfficerError> {
        let _span = tracing::debug_span!("validate_document", path = %self.path).entered();

        let document = match document {
            Value::Map(map) => {
                let map = self.filter(map);
                Value::Map(self.examine(map)?)
            }
            other => {
                let actual = other.kind();
                self.err.add_message(format!(
                    "Expecting an object but got {} {actual}",
                    article(actual.name())
                ));
                other
            }
        };

        tracing::debug!(path = %self.path, errors = self.err.count(), "document validated");
        Ok(Verdict {
            document,
            err: self.err,
            info: self.info,
        })
    }

    /// Remove keys the schema does not declare.
    fn filter(&mut self, mut map: Map) -> Map {
        let undeclared: Vec<String> = map
            .keys()
            .filter(|key| !self.schema.contains_key(key))
            .cloned()
            .collect();

        for key in undeclared {
            map.shift_remove(&key);
            tracing::debug!(path = %self.path.child(key.as_str()), "filtered undeclared property");
            self.info.add_parts(["Filtered out property:", key.as_str()]);
        }
        map
    }

    /// Validate every schema key against the document.
    fn examine(&mut self, mut map: Map) -> Result<Map, OfficerError> {
        let schema = self.schema;
        for (key, field) in schema.iter() {
            self.note_info(key, format!("Examining document property: {key}"));
            let value = map.get_mut(key).map(std::mem::take);

            let output = match &field.node {
                Node::Nested(_) if !has_usable_value(value.as_ref()) => {
                    if field.optional {
                        self.note_info(key, "Optional document not present");
                    } else {
                        self.note_err(key, "Required document missing");
                        tracing::debug!(path = %self.path.child(key), "required document missing");
                    }
                    value
                }
                Node::Nested(nested) if field.collection => {
                    Some(self.validate_collection(key, nested, value.unwrap_or_default())?)
                }
                Node::Nested(nested) => {
                    Some(self.validate_child_document(key, nested, value.unwrap_or_default())?)
                }
                Node::Leaf(_) => self.validate_property(key, field, value)?,
            };

            // insert keeps an existing key in place
            match output {
                Some(output) => {
                    map.insert(key.to_string(), output);
                }
                None => {
                    map.shift_remove(key);
                }
            }
        }
        Ok(map)
    }

    fn validate_child_document(
        &mut self,
        key: &str,
        schema: &'a Schema,
        value: Value,
    ) -> Result<Value, OfficerError> {
        self.note_info(key, format!("Validating child document {key}"));

        let verdict = self.child(schema, self.path.child(key)).validate(value)?;
        self.err.add_child(verdict.err);
        self.info.add_child(verdict.info);
        Ok(verdict.document)
    }

    /// Validate every element of a document collection, wrapping a single
    /// value into a one-element sequence first.
    fn validate_collection(
        &mut self,
        key: &str,
        schema: &'a Schema,
        value: Value,
    ) -> Result<Value, OfficerError> {
        let mut collection_info = self.report(key);
        let mut collection_err = self.report(key);
        collection_info.add_message(format!("Validating document collection {key}"));

        let items = match value {
            Value::List(items) => items,
            single => {
                collection_info.add_message("Document is not a collection: wrapping value.");
                vec![single]
            }
        };

        let path = self.path.child(key);
        let mut normalized = Vec::with_capacity(items.len());
        for (index, item) in items.into_iter().enumerate() {
            let verdict = self.child(schema, path.child(index)).validate(item)?;
            collection_err.add_child(verdict.err);
            collection_info.add_child(verdict.info);
            normalized.push(verdict.document);
        }

        self.err.add_child(collection_err);
        self.info.add_child(collection_info);
        Ok(Value::List(normalized))
    }

    fn validate_property(
        &mut self,
        key: &str,
        field: &'a Field,
        value: Option<Value>,
    ) -> Result<Option<Value>, OfficerError> {
        let Some(leaf) = field.as_leaf() else {
            return Ok(value);
        };
        self.note_info(key, format!("Validating document property: {key}"));

        let outcome = PropertyValidator::new(
            Segment::from(key),
            leaf,
            value,
            self.path.child(key),
            self.coercions,
        )
        .echo(self.echo)
        .validate()?;

        self.err.add_child(outcome.err);
        self.info.add_child(outcome.info);
        Ok(outcome.value)
    }
}

/// Absent, null, and empty containers carry no usable nested document.
fn has_usable_value(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Map(map)) => !map.is_empty(),
        Some(Value::List(items)) => !items.is_empty(),
        Some(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Range, Rule};
    use serde_json::json;

    fn doc(json: serde_json::Value) -> Value {
        Value::from(json)
    }

    fn person() -> Schema {
        Schema::new()
            .field("name", Field::from(Rule::text()).label("name"))
            .field("age", Field::from(Rule::number().range(Range::between(0, 150))).optional())
    }

    #[test]
    fn test_valid_document() {
        let verdict = Officer::new(&person()).validate(doc(json!({"name": "Ada", "age": 36}))).unwrap();
        assert!(verdict.is_valid(), "unexpected errors: {}", verdict.err);
        assert_eq!(verdict.document.to_json(), json!({"name": "Ada", "age": 36}));
    }

    #[test]
    fn test_filters_undeclared_keys() {
        let verdict = Officer::new(&person())
            .validate(doc(json!({"name": "Ada", "admin": true})))
            .unwrap();
        assert_eq!(verdict.document.to_json(), json!({"name": "Ada"}));
        assert_eq!(verdict.info.own_messages(), ["Filtered out property: admin"]);
        assert!(verdict.is_valid());
    }

    #[test]
    fn test_normalized_document_keeps_input_order() {
        let schema = Schema::new()
            .field("alpha", Rule::number())
            .field("zeta", Rule::number())
            .field("added", Rule::text().default_value("filled"));
        let verdict = Officer::new(&schema)
            .validate(doc(json!({"zeta": 1, "extra": 2, "alpha": 3, "other": 4})))
            .unwrap();

        let keys: Vec<&str> = verdict.document.as_map().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, ["zeta", "alpha", "added"]);
        assert_eq!(
            verdict.info.own_messages(),
            ["Filtered out property: extra", "Filtered out property: other"]
        );
    }

    #[test]
    fn test_missing_required_leaf() {
        let verdict = Officer::new(&person()).validate(doc(json!({}))).unwrap();
        assert!(!verdict.is_valid());
        let name_err = verdict.err.child("name").unwrap();
        assert_eq!(name_err.own_messages(), ["A name is required."]);
        assert!(verdict.err.child("age").map_or(true, Report::is_empty));
    }

    #[test]
    fn test_non_mapping_document() {
        let verdict = Officer::new(&person()).validate(Value::Number(3.0)).unwrap();
        assert_eq!(verdict.err.own_messages(), ["Expecting an object but got a number"]);
        assert_eq!(verdict.document, Value::Number(3.0));
    }

    #[test]
    fn test_required_nested_missing() {
        let schema = Schema::new().field("address", Field::nested(Schema::new().field("city", Rule::text())));
        let verdict = Officer::new(&schema).validate(doc(json!({"address": {}}))).unwrap();
        assert_eq!(
            verdict.err.child("address").unwrap().own_messages(),
            ["Required document missing"]
        );
        // Not recursed into: no complaint about the missing city.
        assert!(verdict.err.child("address").unwrap().children().is_empty());
    }

    #[test]
    fn test_optional_nested_missing() {
        let schema = Schema::new().field(
            "address",
            Field::nested(Schema::new().field("city", Rule::text())).optional(),
        );
        let verdict = Officer::new(&schema).validate(doc(json!({}))).unwrap();
        assert!(verdict.is_valid());
        let info = verdict.info.child("address").unwrap().own_messages();
        assert!(info.iter().any(|m| m == "Optional document not present"));
    }

    #[test]
    fn test_nested_errors_merge_under_key() {
        let schema = Schema::new().field(
            "address",
            Field::nested(Schema::new().field("city", Field::from(Rule::text()).label("city"))),
        );
        let verdict = Officer::new(&schema)
            .validate(doc(json!({"address": {"street": "Main"}})))
            .unwrap();
        let address = verdict.err.child("address").unwrap();
        assert_eq!(address.child("city").unwrap().own_messages(), ["A city is required."]);
        assert_eq!(verdict.document.to_json(), json!({"address": {}}));
        assert_eq!(verdict.err.children().iter().filter(|c| c.name() == "address").count(), 1);
    }

    #[test]
    fn test_nested_non_mapping_is_type_mismatch() {
        let schema = Schema::new().field("address", Field::nested(Schema::new().field("city", Rule::text())));
        let verdict = Officer::new(&schema).validate(doc(json!({"address": "Main St"}))).unwrap();
        assert_eq!(
            verdict.err.child("address").unwrap().own_messages(),
            ["Expecting an object but got a string"]
        );
        assert_eq!(verdict.document.to_json(), json!({"address": "Main St"}));
    }

    #[test]
    fn test_document_collection_wraps_single_value() {
        let schema = Schema::new().field(
            "items",
            Field::nested(Schema::new().field("sku", Rule::text())).collection(),
        );
        let verdict = Officer::new(&schema).validate(doc(json!({"items": 5}))).unwrap();
        assert_eq!(verdict.document.to_json(), json!({"items": [5]}));
        let info = verdict.info.child("items").unwrap().own_messages();
        assert!(info.iter().any(|m| m == "Document is not a collection: wrapping value."));
    }

    #[test]
    fn test_document_collection_reports_by_index() {
        let schema = Schema::new().field(
            "items",
            Field::nested(Schema::new().field("sku", Field::from(Rule::text()).label("SKU"))).collection(),
        );
        let verdict = Officer::new(&schema)
            .validate(doc(json!({"items": [{"sku": "a"}, {"qty": 2}]})))
            .unwrap();
        assert!(!verdict.is_valid());
        let items = verdict.err.child("items").unwrap();
        assert!(items.child("0").unwrap().is_empty());
        assert_eq!(
            items.child("1").unwrap().child("sku").unwrap().own_messages(),
            ["A SKU is required."]
        );
        assert_eq!(verdict.document.to_json(), json!({"items": [{"sku": "a"}, {}]}));
    }

    #[test]
    fn test_with_config_names_root() {
        let config = OfficerConfig {
            root: "order".to_string(),
            echo_messages: true,
        };
        let verdict = Officer::with_config(&person(), &config)
            .validate(doc(json!({"name": "x"})))
            .unwrap();
        assert_eq!(verdict.err.name(), "order");
        assert_eq!(verdict.info.name(), "order");
    }

    #[test]
    fn test_has_usable_value() {
        assert!(!has_usable_value(None));
        assert!(!has_usable_value(Some(&Value::Null)));
        assert!(!has_usable_value(Some(&doc(json!({})))));
        assert!(!has_usable_value(Some(&doc(json!([])))));
        assert!(has_usable_value(Some(&Value::Number(0.0))));
    }
}
