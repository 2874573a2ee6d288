//! # officer-core: Foundational Types for officer
//!
//! Everything the validation engine in `officer-schema` builds on, with no
//! knowledge of schemas itself.
//!
//! ## Key Design Principles
//!
//! 1. **Owned document values.** [`Value`] is an owned tree. Validation takes
//!    a document by value and hands back the normalized one, so nothing the
//!    caller holds is ever mutated behind its back.
//!
//! 2. **Explicit value kinds.** [`ValueKind`] names the kind a rule expects.
//!    Kind checks are enum comparisons, and conversions between kinds are
//!    registered functions in [`Coercions`], one per `(from, to)` pair.
//!
//! 3. **Reports are data.** [`Report`] is a named, mergeable tree of messages
//!    built bottom-up and returned by value. Adding a child whose name
//!    already exists merges it into the existing child.
//!
//! 4. **UTC dates.** Dates are `DateTime<Utc>` and render the same way on
//!    every machine.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `officer-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod coerce;
pub mod error;
pub mod kind;
pub mod path;
pub mod report;
pub mod temporal;
pub mod value;

// Re-export primary types for ergonomic imports.
pub use coerce::{Classifier, Coercions, Conversion};
pub use error::{HookError, OfficerError};
pub use kind::ValueKind;
pub use path::{current_path, flatten, DocPath, Segment};
pub use report::{Message, Report};
pub use value::{Map, Value};
