//! # officer-schema: Schema-Driven Document Validation
//!
//! Validates documents against declarative schemas, producing a normalized
//! document plus two report trees: errors and the reasoning behind every
//! decision.
//!
//! ## Architecture
//!
//! - [`schema`]: the schema model. [`Rule`]s describe leaves, [`Schema`]s
//!   map keys to [`Field`]s, which may nest further schemas.
//! - [`property`]: [`PropertyValidator`], the per-leaf pipeline of trim,
//!   hooks, presence, kind, pattern, and range.
//! - [`officer`]: [`Officer`], the recursive walker that filters undeclared
//!   keys and dispatches each declared key.
//! - [`descriptor`]: schemas from JSON or YAML files.
//! - [`config`]: [`OfficerConfig`], reporting options.
//!
//! ```
//! use officer_schema::{Field, Officer, Rule, Schema};
//! use officer_core::Value;
//!
//! let schema = Schema::new()
//!     .field("name", Field::from(Rule::text()).label("name"))
//!     .field("age", Rule::number().coerce());
//!
//! let document = Value::from(serde_json::json!({"name": "  Ada ", "age": "36", "admin": true}));
//! let verdict = Officer::new(&schema).validate(document).unwrap();
//!
//! assert!(verdict.is_valid());
//! assert_eq!(verdict.document.to_json(), serde_json::json!({"name": "Ada", "age": 36}));
//! ```
//!
//! ## Crate Policy
//!
//! - Validation failures are report messages, never `Err`.
//! - `Err` means a hook failed or a file could not be understood.
//! - No `.unwrap()` outside tests.

pub mod config;
pub mod descriptor;
pub mod officer;
pub mod property;
pub mod schema;

pub use config::OfficerConfig;
pub use descriptor::{load_schema, parse_schema};
pub use officer::{Officer, Verdict};
pub use property::{PropertyOutcome, PropertyValidator};
pub use schema::{DefaultValue, Field, LeafField, Node, Pattern, Range, Rule, Schema};
