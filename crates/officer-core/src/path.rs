//! # Document Paths
//!
//! A [`DocPath`] is the sequence of keys and indices leading from the root
//! of a document to the value being validated. Validators thread paths down
//! through every recursive call; they show up in log events and hook
//! errors as flattened strings like `root.addresses[0].street`.

use std::fmt;

/// One step into a document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// A mapping key.
    Key(String),
    /// A sequence index.
    Index(usize),
}

impl Segment {
    /// True for indices and for keys made only of ASCII digits.
    pub fn is_integer_like(&self) -> bool {
        match self {
            Self::Index(_) => true,
            Self::Key(key) => !key.is_empty() && key.bytes().all(|b| b.is_ascii_digit()),
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => f.write_str(key),
            Self::Index(index) => write!(f, "{index}"),
        }
    }
}

impl From<&str> for Segment {
    fn from(key: &str) -> Self {
        Self::Key(key.to_string())
    }
}

impl From<String> for Segment {
    fn from(key: String) -> Self {
        Self::Key(key)
    }
}

impl From<usize> for Segment {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

/// A location inside a document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct DocPath {
    segments: Vec<Segment>,
}

impl DocPath {
    /// A one-segment path naming the document root.
    pub fn root(name: impl Into<String>) -> Self {
        Self {
            segments: vec![Segment::Key(name.into())],
        }
    }

    /// A new path with `segment` appended. `self` is left untouched.
    pub fn child(&self, segment: impl Into<Segment>) -> Self {
        current_path(self, segment)
    }

    /// The segments, root first.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// The last segment rendered as text; empty for an empty path.
    ///
    /// Reports created for a path are named after this.
    pub fn leaf_name(&self) -> String {
        self.segments.last().map(Segment::to_string).unwrap_or_default()
    }
}

impl fmt::Display for DocPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&flatten(self))
    }
}

impl<S: Into<Segment>> FromIterator<S> for DocPath {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            segments: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Return a copy of `path` with `segment` appended.
pub fn current_path(path: &DocPath, segment: impl Into<Segment>) -> DocPath {
    let mut segments = path.segments.clone();
    segments.push(segment.into());
    DocPath { segments }
}

/// Render a path as one string: integer-like segments as `[n]`, the rest as
/// `.name`, with the leading `.` dropped.
pub fn flatten(path: &DocPath) -> String {
    let mut out = String::new();
    for segment in &path.segments {
        if segment.is_integer_like() {
            out.push('[');
            out.push_str(&segment.to_string());
            out.push(']');
        } else {
            out.push('.');
            out.push_str(&segment.to_string());
        }
    }
    match out.strip_prefix('.') {
        Some(rest) => rest.to_string(),
        None => out,
    }
}
