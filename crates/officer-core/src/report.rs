//! # Message Report Tree
//!
//! A [`Report`] is a named node holding an ordered list of messages and an
//! ordered set of uniquely named children. Validators build one report for
//! errors and one for informational messages, then merge child reports into
//! their parent under the child's name.
//!
//! ## Merge Invariant
//!
//! Adding a child whose name is already present never creates a duplicate:
//! the new child's messages are appended to the existing child and its own
//! children are merged recursively. Repeatedly validating same-named
//! elements therefore accumulates instead of overwriting.

use std::fmt;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// One entry of [`Report::messages`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// A message added directly to the report.
    Text(String),
    /// The messages of a non-empty child report.
    Block {
        /// The child's name.
        name: String,
        /// The child's messages.
        messages: Vec<Message>,
    },
}

impl Message {
    /// Total number of text messages in this entry, including nested blocks.
    pub fn count(&self) -> usize {
        match self {
            Self::Text(_) => 1,
            Self::Block { messages, .. } => messages.iter().map(Message::count).sum(),
        }
    }
}

/// Serializes as a string, or as `{"<name>": [...]}` for blocks.
impl Serialize for Message {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Text(text) => serializer.serialize_str(text),
            Self::Block { name, messages } => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(name, messages)?;
                map.end()
            }
        }
    }
}

/// A named, mergeable tree of messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    name: String,
    messages: Vec<String>,
    children: Vec<Report>,
    echo: bool,
}

impl Report {
    /// An empty report.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            messages: Vec::new(),
            children: Vec::new(),
            echo: false,
        }
    }

    /// An empty report that mirrors every added message to `tracing` at
    /// `DEBUG` level when `echo` is true.
    pub fn echoing(name: impl Into<String>, echo: bool) -> Self {
        Self {
            echo,
            ..Self::new(name)
        }
    }

    /// The report's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Messages added directly to this report, excluding children.
    pub fn own_messages(&self) -> &[String] {
        &self.messages
    }

    /// Children in insertion order.
    pub fn children(&self) -> &[Report] {
        &self.children
    }

    /// The child named `name`.
    pub fn child(&self, name: &str) -> Option<&Report> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Append one message.
    pub fn add_message(&mut self, message: impl Into<String>) -> &mut Self {
        let message = message.into();
        if self.echo {
            tracing::debug!(report = %self.name, "{message}");
        }
        self.messages.push(message);
        self
    }

    /// Append one message made of `parts` joined by single spaces.
    pub fn add_parts<I>(&mut self, parts: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: fmt::Display,
    {
        let joined = parts
            .into_iter()
            .map(|part| part.to_string())
            .collect::<Vec<_>>()
            .join(" ");
        self.add_message(joined)
    }

    /// Add `child`, merging into an existing child of the same name.
    pub fn add_child(&mut self, child: Report) -> &mut Self {
        match self.children.iter_mut().find(|c| c.name == child.name) {
            Some(existing) => existing.merge(child),
            None => self.children.push(child),
        }
        self
    }

    fn merge(&mut self, other: Report) {
        for message in other.messages {
            self.add_message(message);
        }
        for grandchild in other.children {
            self.add_child(grandchild);
        }
    }

    /// Own messages first, then one block per child with messages.
    pub fn messages(&self) -> Vec<Message> {
        let mut out: Vec<Message> = self.messages.iter().cloned().map(Message::Text).collect();
        for child in &self.children {
            let messages = child.messages();
            if !messages.is_empty() {
                out.push(Message::Block {
                    name: child.name.clone(),
                    messages,
                });
            }
        }
        out
    }

    /// True when [`Report::messages`] would be empty anywhere in the tree.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty() && self.children.iter().all(Report::is_empty)
    }

    /// Total number of messages in the tree.
    pub fn count(&self) -> usize {
        self.messages.len() + self.children.iter().map(Report::count).sum::<usize>()
    }
}

impl Serialize for Report {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.messages().serialize(serializer)
    }
}

impl fmt::Display for Report {
    /// Indented outline: messages as `- text`, children as `name:` headings.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn write_level(f: &mut fmt::Formatter<'_>, messages: &[Message], depth: usize) -> fmt::Result {
            for message in messages {
                match message {
                    Message::Text(text) => writeln!(f, "{:indent$}- {text}", "", indent = depth * 2)?,
                    Message::Block { name, messages } => {
                        writeln!(f, "{:indent$}{name}:", "", indent = depth * 2)?;
                        write_level(f, messages, depth + 1)?;
                    }
                }
            }
            Ok(())
        }
        write_level(f, &self.messages(), 0)
    }
}
