//! # Coercions: Kind Tests and Registered Conversions
//!
//! A [`Coercions`] registry answers two questions for the validator:
//!
//! - does this value have the expected kind? ([`Coercions::matches`])
//! - can it be converted into that kind? ([`Coercions::coerce`])
//!
//! Built-in kinds are compared directly. Custom kinds are registered with a
//! classifier. Conversions are registered per `(from, to)` pair; a
//! conversion only counts as successful when its result passes the kind
//! test for the target.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::kind::ValueKind;
use crate::temporal;
use crate::value::Value;

/// A conversion from one kind to another. `None` means the value could not
/// be converted.
pub type Conversion = Arc<dyn Fn(&Value) -> Option<Value> + Send + Sync>;

/// Decides whether a value belongs to a custom kind.
pub type Classifier = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// Registry of custom kinds and kind-to-kind conversions.
#[derive(Clone)]
pub struct Coercions {
    kinds: HashMap<String, Classifier>,
    conversions: HashMap<(ValueKind, ValueKind), Conversion>,
}

impl Coercions {
    /// A registry with no custom kinds and no conversions.
    pub fn empty() -> Self {
        Self {
            kinds: HashMap::new(),
            conversions: HashMap::new(),
        }
    }

    /// A registry with the standard conversions between built-in scalar
    /// kinds.
    ///
    /// | from → to | conversion |
    /// |---|---|
    /// | number, boolean, date → string | display text |
    /// | string → number | trimmed text parsed as a finite float |
    /// | boolean → number | 1 / 0 |
    /// | date → number | epoch milliseconds |
    /// | string → date | RFC 3339 or `YYYY-MM-DD` |
    /// | number → date | epoch milliseconds |
    /// | string → boolean | `"true"` / `"false"` |
    /// | number → boolean | non-zero |
    pub fn standard() -> Self {
        use ValueKind::{Boolean, Date, Number, Text};

        let mut registry = Self::empty();
        for from in [Number, Boolean, Date] {
            registry.register(from, Text, |v| Some(Value::Text(v.to_string())));
        }
        registry
            .register(Text, Number, |v| {
                let n: f64 = v.as_str()?.trim().parse().ok()?;
                n.is_finite().then_some(Value::Number(n))
            })
            .register(Boolean, Number, |v| v.as_number().map(Value::Number))
            .register(Date, Number, |v| v.as_number().map(Value::Number))
            .register(Text, Date, |v| temporal::parse_date(v.as_str()?).map(Value::Date))
            .register(Number, Date, |v| match v {
                Value::Number(n) => temporal::from_epoch_millis(*n).map(Value::Date),
                _ => None,
            })
            .register(Text, Boolean, |v| match v.as_str()?.trim() {
                "true" => Some(Value::Bool(true)),
                "false" => Some(Value::Bool(false)),
                _ => None,
            })
            .register(Number, Boolean, |v| match v {
                Value::Number(n) if !n.is_nan() => Some(Value::Bool(*n != 0.0)),
                _ => None,
            });
        registry
    }

    /// Register a custom kind under `name`.
    pub fn register_kind<F>(&mut self, name: impl Into<String>, classifier: F) -> &mut Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.kinds.insert(name.into(), Arc::new(classifier));
        self
    }

    /// Register the conversion used to turn `from` values into `to` values.
    /// Replaces any previous conversion for the pair.
    pub fn register<F>(&mut self, from: ValueKind, to: ValueKind, conversion: F) -> &mut Self
    where
        F: Fn(&Value) -> Option<Value> + Send + Sync + 'static,
    {
        self.conversions.insert((from, to), Arc::new(conversion));
        self
    }

    /// True if a custom kind named `name` is registered.
    pub fn has_kind(&self, name: &str) -> bool {
        self.kinds.contains_key(name)
    }

    /// Does `value` have kind `kind`?
    ///
    /// Unregistered custom kinds match nothing.
    pub fn matches(&self, kind: &ValueKind, value: &Value) -> bool {
        match kind {
            ValueKind::Custom(name) => self.kinds.get(name).is_some_and(|classify| classify(value)),
            builtin => value.kind() == *builtin,
        }
    }

    /// Convert `value` into kind `to`.
    ///
    /// Returns `None` if no conversion is registered for the value's kind,
    /// the conversion declines, or its result does not match `to`.
    pub fn coerce(&self, value: &Value, to: &ValueKind) -> Option<Value> {
        let conversion = self.conversions.get(&(value.kind(), to.clone()))?;
        conversion(value).filter(|converted| self.matches(to, converted))
    }
}

impl Default for Coercions {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Debug for Coercions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds: Vec<&str> = self.kinds.keys().map(String::as_str).collect();
        kinds.sort_unstable();
        let mut pairs: Vec<String> = self
            .conversions
            .keys()
            .map(|(from, to)| format!("{from}->{to}"))
            .collect();
        pairs.sort_unstable();
        f.debug_struct("Coercions")
            .field("kinds", &kinds)
            .field("conversions", &pairs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_to_text() {
        let c = Coercions::standard();
        assert_eq!(c.coerce(&Value::Number(42.0), &ValueKind::Text), Some(Value::from("42")));
    }

    #[test]
    fn test_text_to_number() {
        let c = Coercions::standard();
        assert_eq!(c.coerce(&Value::from(" 3.5 "), &ValueKind::Number), Some(Value::Number(3.5)));
        assert_eq!(c.coerce(&Value::from("abc"), &ValueKind::Number), None);
        assert_eq!(c.coerce(&Value::from("inf"), &ValueKind::Number), None);
    }

    #[test]
    fn test_text_to_date() {
        let c = Coercions::standard();
        let coerced = c.coerce(&Value::from("2020-01-05"), &ValueKind::Date).unwrap();
        assert_eq!(coerced.to_string(), "2020-01-05T00:00:00Z");
        assert_eq!(c.coerce(&Value::from("yesterday"), &ValueKind::Date), None);
    }

    #[test]
    fn test_number_to_date_uses_millis() {
        let c = Coercions::standard();
        let coerced = c.coerce(&Value::Number(86_400_000.0), &ValueKind::Date).unwrap();
        assert_eq!(coerced.to_string(), "1970-01-02T00:00:00Z");
    }

    #[test]
    fn test_text_to_boolean() {
        let c = Coercions::standard();
        assert_eq!(c.coerce(&Value::from("true"), &ValueKind::Boolean), Some(Value::Bool(true)));
        assert_eq!(c.coerce(&Value::from("yes"), &ValueKind::Boolean), None);
    }

    #[test]
    fn test_no_conversion_registered() {
        let c = Coercions::standard();
        assert_eq!(c.coerce(&Value::List(vec![]), &ValueKind::Text), None);
        assert_eq!(Coercions::empty().coerce(&Value::Number(1.0), &ValueKind::Text), None);
    }

    #[test]
    fn test_custom_kind_classifier() {
        let mut c = Coercions::standard();
        c.register_kind("email", |v| v.as_str().is_some_and(|s| s.contains('@')));
        let email = ValueKind::Custom("email".into());
        assert!(c.has_kind("email"));
        assert!(c.matches(&email, &Value::from("a@b.c")));
        assert!(!c.matches(&email, &Value::from("abc")));
        assert!(!c.matches(&ValueKind::Custom("unknown".into()), &Value::from("a@b.c")));
    }

    #[test]
    fn test_custom_conversion_must_satisfy_classifier() {
        let mut c = Coercions::standard();
        c.register_kind("email", |v| v.as_str().is_some_and(|s| s.contains('@')))
            .register(ValueKind::Text, ValueKind::Custom("email".into()), |v| {
                Some(Value::Text(v.as_str()?.to_lowercase()))
            });
        let email = ValueKind::Custom("email".into());
        assert_eq!(c.coerce(&Value::from("A@B.C"), &email), Some(Value::from("a@b.c")));
        assert_eq!(c.coerce(&Value::from("nope"), &email), None);
    }

    #[test]
    fn test_debug_lists_pairs() {
        let text = format!("{:?}", Coercions::standard());
        assert!(text.contains("number->string"));
    }
}
