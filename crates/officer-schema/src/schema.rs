//! # Schema Model
//!
//! A [`Schema`] maps keys, in declaration order, to [`Field`]s. A field is
//! either a leaf described by a [`Rule`] or a nested [`Schema`]; either kind
//! may be flagged as a collection.
//!
//! ```
//! use officer_schema::{Field, Range, Rule, Schema};
//!
//! let address = Schema::new()
//!     .field("street", Rule::text())
//!     .field("zip", Rule::text().pattern(r"^\d{5}$", "Zip must be five digits").unwrap());
//!
//! let person = Schema::new()
//!     .field("name", Field::from(Rule::text()).label("name"))
//!     .field("age", Rule::number().coerce().range(Range::between(0, 150)))
//!     .field("addresses", Field::nested(address).collection().optional());
//!
//! assert_eq!(person.len(), 3);
//! ```

use std::fmt;
use std::sync::Arc;

use officer_core::{HookError, Value, ValueKind};
use regex::Regex;

/// A unary transform applied before or after validation of a leaf value.
pub type Transform = Arc<dyn Fn(Value) -> Result<Value, HookError> + Send + Sync>;

/// A zero-argument producer of default values.
pub type Producer = Arc<dyn Fn() -> Result<Value, HookError> + Send + Sync>;

/// The value used when a leaf is missing.
#[derive(Clone)]
pub enum DefaultValue {
    /// A fixed value.
    Literal(Value),
    /// A value computed each time it is needed.
    Producer(Producer),
}

impl DefaultValue {
    /// The default value.
    ///
    /// # Errors
    ///
    /// Returns whatever error the producer returns.
    pub fn resolve(&self) -> Result<Value, HookError> {
        match self {
            Self::Literal(value) => Ok(value.clone()),
            Self::Producer(produce) => produce(),
        }
    }
}

impl fmt::Debug for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            Self::Producer(_) => f.write_str("Producer(<fn>)"),
        }
    }
}

/// A regular expression tested against the stringified value, with the
/// error message reported when it does not match.
#[derive(Debug, Clone)]
pub struct Pattern {
    rule: Regex,
    error: String,
}

impl Pattern {
    /// Compile `rule`.
    ///
    /// # Errors
    ///
    /// Returns the regex compilation error for an invalid pattern.
    pub fn new(rule: &str, error: impl Into<String>) -> Result<Self, regex::Error> {
        Ok(Self::from_regex(Regex::new(rule)?, error))
    }

    /// Wrap an already compiled regex.
    pub fn from_regex(rule: Regex, error: impl Into<String>) -> Self {
        Self {
            rule,
            error: error.into(),
        }
    }

    /// True if `text` matches.
    pub fn is_match(&self, text: &str) -> bool {
        self.rule.is_match(text)
    }

    /// The pattern source.
    pub fn as_str(&self) -> &str {
        self.rule.as_str()
    }

    /// The error message reported on mismatch.
    pub fn error(&self) -> &str {
        &self.error
    }
}

/// Inclusive `[min, max]` bounds for numbers and dates. A missing bound is
/// unbounded on that side.
///
/// Bounds are numbers, dates, or text that parses as either, such as
/// `"2001-01-01"`. Any other bound is reported as an error when checked.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Range {
    /// Lower bound.
    pub min: Option<Value>,
    /// Upper bound.
    pub max: Option<Value>,
}

impl Range {
    /// Both bounds. They may be given in either order.
    pub fn between(min: impl Into<Value>, max: impl Into<Value>) -> Self {
        Self {
            min: Some(min.into()),
            max: Some(max.into()),
        }
    }

    /// Only a lower bound.
    pub fn at_least(min: impl Into<Value>) -> Self {
        Self {
            min: Some(min.into()),
            max: None,
        }
    }

    /// Only an upper bound.
    pub fn at_most(max: impl Into<Value>) -> Self {
        Self {
            min: None,
            max: Some(max.into()),
        }
    }
}

/// Constraints and transforms for a leaf value.
#[derive(Clone)]
pub struct Rule {
    /// Expected kind.
    pub kind: ValueKind,
    /// Used when the value is missing.
    pub default: Option<DefaultValue>,
    /// Whether a value of another kind may be converted.
    pub coerce: bool,
    /// Applied to a present value before any check.
    pub before: Option<Transform>,
    /// Applied to the value after all checks ran.
    pub after: Option<Transform>,
    /// Pattern the stringified value must match.
    pub pattern: Option<Pattern>,
    /// Numeric or date bounds.
    pub range: Option<Range>,
}

impl Rule {
    /// A rule expecting `kind` with no other constraints.
    pub fn new(kind: ValueKind) -> Self {
        Self {
            kind,
            default: None,
            coerce: false,
            before: None,
            after: None,
            pattern: None,
            range: None,
        }
    }

    /// A text rule.
    pub fn text() -> Self {
        Self::new(ValueKind::Text)
    }

    /// A number rule.
    pub fn number() -> Self {
        Self::new(ValueKind::Number)
    }

    /// A boolean rule.
    pub fn boolean() -> Self {
        Self::new(ValueKind::Boolean)
    }

    /// A date rule.
    pub fn date() -> Self {
        Self::new(ValueKind::Date)
    }

    /// A rule for a custom kind registered in [`officer_core::Coercions`].
    pub fn custom(name: impl Into<String>) -> Self {
        Self::new(ValueKind::Custom(name.into()))
    }

    /// Allow conversion from other kinds.
    pub fn coerce(mut self) -> Self {
        self.coerce = true;
        self
    }

    /// Fill missing values with `value`.
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(DefaultValue::Literal(value.into()));
        self
    }

    /// Fill missing values with the result of `produce`.
    pub fn default_with<F>(mut self, produce: F) -> Self
    where
        F: Fn() -> Result<Value, HookError> + Send + Sync + 'static,
    {
        self.default = Some(DefaultValue::Producer(Arc::new(produce)));
        self
    }

    /// Transform present values before validation.
    pub fn before<F>(mut self, transform: F) -> Self
    where
        F: Fn(Value) -> Result<Value, HookError> + Send + Sync + 'static,
    {
        self.before = Some(Arc::new(transform));
        self
    }

    /// Transform values after validation.
    pub fn after<F>(mut self, transform: F) -> Self
    where
        F: Fn(Value) -> Result<Value, HookError> + Send + Sync + 'static,
    {
        self.after = Some(Arc::new(transform));
        self
    }

    /// Require the stringified value to match `rule`.
    ///
    /// # Errors
    ///
    /// Returns the regex compilation error for an invalid pattern.
    pub fn pattern(mut self, rule: &str, error: impl Into<String>) -> Result<Self, regex::Error> {
        self.pattern = Some(Pattern::new(rule, error)?);
        Ok(self)
    }

    /// Bound the numeric value.
    pub fn range(mut self, range: Range) -> Self {
        self.range = Some(range);
        self
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("kind", &self.kind)
            .field("default", &self.default)
            .field("coerce", &self.coerce)
            .field("before", &self.before.as_ref().map(|_| "<fn>"))
            .field("after", &self.after.as_ref().map(|_| "<fn>"))
            .field("pattern", &self.pattern)
            .field("range", &self.range)
            .finish()
    }
}

/// What a field holds.
#[derive(Debug, Clone)]
pub enum Node {
    /// A scalar described by a rule.
    Leaf(Rule),
    /// A nested document.
    Nested(Schema),
}

/// A key's declaration inside a [`Schema`].
#[derive(Debug, Clone)]
pub struct Field {
    /// Leaf rule or nested schema.
    pub node: Node,
    /// Whether a missing value is acceptable.
    pub optional: bool,
    /// Whether the value is a sequence of `node`-shaped entries.
    pub collection: bool,
    /// Display name used in the "is required" message.
    pub label: Option<String>,
}

impl Field {
    /// A leaf field.
    pub fn leaf(rule: Rule) -> Self {
        Self {
            node: Node::Leaf(rule),
            optional: false,
            collection: false,
            label: None,
        }
    }

    /// A nested-document field.
    pub fn nested(schema: Schema) -> Self {
        Self {
            node: Node::Nested(schema),
            optional: false,
            collection: false,
            label: None,
        }
    }

    /// Accept a missing value.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Expect a sequence of entries.
    pub fn collection(mut self) -> Self {
        self.collection = true;
        self
    }

    /// Name the field in the "is required" message.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// The leaf view of this field, or `None` for nested fields.
    pub fn as_leaf(&self) -> Option<LeafField<'_>> {
        match &self.node {
            Node::Leaf(rule) => Some(LeafField {
                rule,
                optional: self.optional,
                collection: self.collection,
                label: self.label.as_deref(),
            }),
            Node::Nested(_) => None,
        }
    }
}

impl From<Rule> for Field {
    fn from(rule: Rule) -> Self {
        Self::leaf(rule)
    }
}

impl From<Schema> for Field {
    fn from(schema: Schema) -> Self {
        Self::nested(schema)
    }
}

/// A borrowed view of a leaf field: its rule plus the field-level flags.
///
/// Collection elements are validated with a copy whose `collection` flag is
/// cleared.
#[derive(Debug, Clone, Copy)]
pub struct LeafField<'a> {
    /// The rule.
    pub rule: &'a Rule,
    /// Whether a missing value is acceptable.
    pub optional: bool,
    /// Whether the value is a sequence of scalars.
    pub collection: bool,
    /// Display name used in the "is required" message.
    pub label: Option<&'a str>,
}

impl<'a> LeafField<'a> {
    /// The same leaf describing a single element.
    pub fn element(self) -> Self {
        Self {
            collection: false,
            ..self
        }
    }
}

/// Ordered mapping from keys to fields.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: Vec<(String, Field)>,
}

impl Schema {
    /// An empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Schema::insert`].
    pub fn field(mut self, key: impl Into<String>, field: impl Into<Field>) -> Self {
        self.insert(key, field);
        self
    }

    /// Declare `key`. Redeclaring a key replaces its field and keeps its
    /// position.
    pub fn insert(&mut self, key: impl Into<String>, field: impl Into<Field>) {
        let key = key.into();
        let field = field.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = field,
            None => self.fields.push((key, field)),
        }
    }

    /// The field declared for `key`.
    pub fn get(&self, key: &str) -> Option<&Field> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, f)| f)
    }

    /// True if `key` is declared.
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Keys and fields in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Field)> {
        self.fields.iter().map(|(k, f)| (k.as_str(), f))
    }

    /// Keys in declaration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    /// Number of declared keys.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True if no key is declared.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
