//! # Value Kinds
//!
//! [`ValueKind`] is the kind a rule expects and the kind a value has. The
//! built-in kinds mirror the variants of [`Value`](crate::Value); custom
//! kinds are named and resolved through a classifier registered in
//! [`Coercions`](crate::Coercions).

use std::fmt;

/// The kind of a document value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ValueKind {
    /// Text values. Displays as `string`.
    Text,
    /// Numeric values.
    Number,
    /// `true` / `false`.
    Boolean,
    /// UTC dates.
    Date,
    /// Sequences. Displays as `array`.
    List,
    /// Mappings. Displays as `object`.
    Map,
    /// The null value.
    Null,
    /// A user-registered kind.
    Custom(String),
}

impl ValueKind {
    /// Resolve a kind name as written in schema descriptors.
    ///
    /// Built-in names are matched case-insensitively and include the aliases
    /// `text`, `bool`, `list`, `map`. Anything else is `None`; custom kinds
    /// are resolved by the caller against its registry.
    pub fn from_name(name: &str) -> Option<Self> {
        let kind = match name.to_ascii_lowercase().as_str() {
            "string" | "text" => Self::Text,
            "number" => Self::Number,
            "boolean" | "bool" => Self::Boolean,
            "date" => Self::Date,
            "array" | "list" => Self::List,
            "object" | "map" => Self::Map,
            "null" => Self::Null,
            _ => return None,
        };
        Some(kind)
    }

    /// The name used in messages.
    pub fn name(&self) -> &str {
        match self {
            Self::Text => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Date => "date",
            Self::List => "array",
            Self::Map => "object",
            Self::Null => "null",
            Self::Custom(name) => name,
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Indefinite article for `word`: `an` before a vowel, `a` otherwise.
pub fn article(word: &str) -> &'static str {
    match word.chars().next().map(|c| c.to_ascii_lowercase()) {
        Some('a' | 'e' | 'i' | 'o' | 'u') => "an",
        _ => "a",
    }
}
