//! # Document Values
//!
//! [`Value`] is the document model validated by officer: JSON's shapes plus
//! a first-class date variant.
//!
//! ## Conversions
//!
//! - From `serde_json::Value`: numbers become `f64`, strings stay text.
//!   Strings are never guessed to be dates; a date rule with coercion
//!   enabled turns them into dates during validation.
//! - From `serde_yaml::Value`: same as JSON. YAML tags are ignored and
//!   scalar map keys are stringified.
//! - Mappings keep the document's key order through every conversion.
//! - To JSON: dates become ISO 8601 strings, integral numbers become JSON
//!   integers.

use std::fmt;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::kind::ValueKind;
use crate::temporal;

/// Largest magnitude at which every integral `f64` is exactly an integer.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Mapping in insertion order.
pub type Map = IndexMap<String, Value>;

/// A document value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Null. Treated the same as an absent key.
    #[default]
    Null,
    /// Boolean.
    Bool(bool),
    /// Number.
    Number(f64),
    /// Text.
    Text(String),
    /// UTC date.
    Date(DateTime<Utc>),
    /// Ordered sequence.
    List(Vec<Value>),
    /// Mapping with keys in document order.
    Map(Map),
}

impl Value {
    /// The built-in kind of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Null => ValueKind::Null,
            Self::Bool(_) => ValueKind::Boolean,
            Self::Number(_) => ValueKind::Number,
            Self::Text(_) => ValueKind::Text,
            Self::Date(_) => ValueKind::Date,
            Self::List(_) => ValueKind::List,
            Self::Map(_) => ValueKind::Map,
        }
    }

    /// True for `Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// The numeric interpretation of this value, if it has one.
    ///
    /// Numbers are themselves, dates are epoch milliseconds, booleans are
    /// 0 or 1, and text is parsed after trimming. NaN is never a number.
    pub fn as_number(&self) -> Option<f64> {
        let n = match self {
            Self::Number(n) => *n,
            Self::Date(dt) => temporal::epoch_millis(dt),
            Self::Bool(b) => f64::from(u8::from(*b)),
            Self::Text(s) => s.trim().parse::<f64>().ok()?,
            Self::Null | Self::List(_) | Self::Map(_) => return None,
        };
        (!n.is_nan()).then_some(n)
    }

    /// Borrow the text, if this is text.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Borrow the mapping, if this is a mapping.
    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Borrow the sequence, if this is a sequence.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Look up a key in a mapping. `None` for non-mappings.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_map().and_then(|map| map.get(key))
    }

    /// Convert to a `serde_json::Value`.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Null => serde_json::Value::Null,
            Self::Bool(b) => serde_json::Value::Bool(*b),
            Self::Number(n) => number_to_json(*n),
            Self::Text(s) => serde_json::Value::String(s.clone()),
            Self::Date(dt) => serde_json::Value::String(temporal::to_iso8601(dt)),
            Self::List(items) => serde_json::Value::Array(items.iter().map(Self::to_json).collect()),
            Self::Map(map) => serde_json::Value::Object(
                map.iter().map(|(k, v)| (k.clone(), v.to_json())).collect(),
            ),
        }
    }

    /// Convert a `serde_yaml::Value`.
    ///
    /// Documents use only the JSON-compatible subset of YAML. Tags are
    /// dropped in favor of the tagged value; map keys must be scalars.
    pub fn from_yaml(yaml: &serde_yaml::Value) -> Result<Self, String> {
        match yaml {
            serde_yaml::Value::Null => Ok(Self::Null),
            serde_yaml::Value::Bool(b) => Ok(Self::Bool(*b)),
            serde_yaml::Value::Number(n) => n
                .as_f64()
                .map(Self::Number)
                .ok_or_else(|| format!("unsupported YAML number: {n:?}")),
            serde_yaml::Value::String(s) => Ok(Self::Text(s.clone())),
            serde_yaml::Value::Sequence(seq) => {
                let items: Result<Vec<Value>, String> = seq.iter().map(Self::from_yaml).collect();
                Ok(Self::List(items?))
            }
            serde_yaml::Value::Mapping(mapping) => {
                let mut map = Map::with_capacity(mapping.len());
                for (k, v) in mapping {
                    let key = match k {
                        serde_yaml::Value::String(s) => s.clone(),
                        serde_yaml::Value::Number(n) => n.to_string(),
                        serde_yaml::Value::Bool(b) => b.to_string(),
                        other => return Err(format!("unsupported YAML map key type: {other:?}")),
                    };
                    map.insert(key, Self::from_yaml(v)?);
                }
                Ok(Self::Map(map))
            }
            serde_yaml::Value::Tagged(tagged) => Self::from_yaml(&tagged.value),
        }
    }
}

/// Render a number the way messages show it: integral values without a
/// fractional part, infinities as `Infinity` / `-Infinity`.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n == f64::INFINITY {
        "Infinity".to_string()
    } else if n == f64::NEG_INFINITY {
        "-Infinity".to_string()
    } else if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

fn number_to_json(n: f64) -> serde_json::Value {
    if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
        serde_json::Value::Number(serde_json::Number::from(n as i64))
    } else {
        serde_json::Number::from_f64(n)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => f.write_str(&format_number(*n)),
            Self::Text(s) => f.write_str(s),
            Self::Date(dt) => f.write_str(&temporal::to_iso8601(dt)),
            Self::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
            Self::Map(_) => write!(f, "{}", self.to_json()),
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => n.as_f64().map(Self::Number).unwrap_or(Self::Null),
            serde_json::Value::String(s) => Self::Text(s),
            serde_json::Value::Array(items) => Self::List(items.into_iter().map(Self::from).collect()),
            serde_json::Value::Object(map) => {
                Self::Map(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Number(n as f64)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(dt: DateTime<Utc>) -> Self {
        Self::Date(dt)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Self::List(items)
    }
}

impl From<Map> for Value {
    fn from(map: Map) -> Self {
        Self::Map(map)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(Self::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_shapes() {
        let value = Value::from(json!({"a": 1, "b": ["x", true, null]}));
        assert_eq!(value.get("a"), Some(&Value::Number(1.0)));
        let b = value.get("b").and_then(Value::as_list).unwrap();
        assert_eq!(b, &[Value::from("x"), Value::Bool(true), Value::Null]);
    }

    #[test]
    fn test_to_json_integral_numbers_are_integers() {
        assert_eq!(Value::Number(42.0).to_json(), json!(42));
        assert_eq!(Value::Number(1.5).to_json(), json!(1.5));
        assert_eq!(Value::Number(f64::NAN).to_json(), json!(null));
    }

    #[test]
    fn test_to_json_dates_are_iso8601() {
        let dt = temporal::parse_date("2026-01-15T12:00:00Z").unwrap();
        assert_eq!(Value::Date(dt).to_json(), json!("2026-01-15T12:00:00Z"));
    }

    #[test]
    fn test_as_number() {
        assert_eq!(Value::Number(7.0).as_number(), Some(7.0));
        assert_eq!(Value::from(" 12.5 ").as_number(), Some(12.5));
        assert_eq!(Value::Bool(true).as_number(), Some(1.0));
        assert_eq!(Value::from("twelve").as_number(), None);
        assert_eq!(Value::Number(f64::NAN).as_number(), None);
        assert_eq!(Value::List(vec![]).as_number(), None);
        let dt = temporal::parse_date("1970-01-01T00:00:01Z").unwrap();
        assert_eq!(Value::Date(dt).as_number(), Some(1000.0));
    }

    #[test]
    fn test_display_stringifies() {
        assert_eq!(Value::Number(42.0).to_string(), "42");
        assert_eq!(Value::Number(0.25).to_string(), "0.25");
        assert_eq!(Value::from("abc").to_string(), "abc");
        assert_eq!(
            Value::List(vec![Value::Number(1.0), Value::from("b")]).to_string(),
            "1,b"
        );
    }

    #[test]
    fn test_format_number_infinities() {
        assert_eq!(format_number(f64::INFINITY), "Infinity");
        assert_eq!(format_number(f64::NEG_INFINITY), "-Infinity");
        assert_eq!(format_number(-3.0), "-3");
    }

    #[test]
    fn test_yaml_order_document_conversion() {
        let yaml_str = r#"
customer: Acme
placed: "2026-03-01"
rush: false
lines:
  - sku: !code abc-1
    qty: 2
404: lost
"#;
        let yaml_value: serde_yaml::Value = serde_yaml::from_str(yaml_str).unwrap();
        let value = Value::from_yaml(&yaml_value).unwrap();

        assert_eq!(value.get("customer"), Some(&Value::from("Acme")));
        // Quoted dates stay text until a date rule coerces them.
        assert_eq!(value.get("placed"), Some(&Value::from("2026-03-01")));
        assert_eq!(value.get("rush"), Some(&Value::Bool(false)));
        assert_eq!(value.get("404"), Some(&Value::from("lost")));

        let lines = value.get("lines").and_then(Value::as_list).unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].get("qty"), Some(&Value::Number(2.0)));
        // Tags are dropped in favor of the tagged value.
        assert_eq!(lines[0].get("sku"), Some(&Value::from("abc-1")));
    }

    #[test]
    fn test_yaml_complex_key_rejected() {
        let yaml_value: serde_yaml::Value = serde_yaml::from_str("? [a, b]
: pair
").unwrap();
        assert!(Value::from_yaml(&yaml_value).unwrap_err().contains("unsupported YAML map key"));
    }

    #[test]
    fn test_maps_keep_document_order() {
        let from_json = Value::from(json!({"zeta": 1, "alpha": 2, "mid": 3}));
        let keys: Vec<&str> = from_json.as_map().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, ["zeta", "alpha", "mid"]);

        let yaml_value: serde_yaml::Value = serde_yaml::from_str("zeta: 1
alpha: 2
mid: 3
").unwrap();
        let from_yaml = Value::from_yaml(&yaml_value).unwrap();
        let keys: Vec<&str> = from_yaml.as_map().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, ["zeta", "alpha", "mid"]);

        assert_eq!(from_json.to_string(), r#"{"zeta":1,"alpha":2,"mid":3}"#);
    }

    #[test]
    fn test_serde_roundtrip_through_json() {
        let value = Value::from(json!({"name": "x", "tags": [1, 2]}));
        let text = serde_json::to_string(&value).unwrap();
        let back: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value, back);
    }
}
