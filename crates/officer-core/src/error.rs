//! # Error Types
//!
//! Validation failures are never errors in the `Result` sense: they are
//! messages in a [`Report`](crate::Report). The types here cover the
//! operational failures around validation: a hook that fails, a schema
//! descriptor that cannot be understood, a document that cannot be loaded.

use thiserror::Error;

/// Error type returned by user-supplied hooks (`before`, `after`, default
/// producers).
pub type HookError = Box<dyn std::error::Error + Send + Sync>;

/// Top-level error type for officer.
#[derive(Error, Debug)]
pub enum OfficerError {
    /// A transform hook or default producer failed. The validation call that
    /// ran it is aborted.
    #[error("{hook} hook failed at '{path}': {source}")]
    Hook {
        /// Flattened location of the property being validated.
        path: String,
        /// Which hook failed (`before`, `after`, or `default`).
        hook: &'static str,
        /// The error returned by the hook.
        #[source]
        source: HookError,
    },

    /// A schema descriptor could not be turned into a schema.
    #[error("schema descriptor error at '{path}': {reason}")]
    Descriptor {
        /// Flattened location inside the descriptor.
        path: String,
        /// What was wrong with it.
        reason: String,
    },

    /// A document or schema file could not be read or parsed.
    #[error("document load error for '{path}': {reason}")]
    Document {
        /// Path to the file that failed to load.
        path: String,
        /// Reason the file could not be loaded.
        reason: String,
    },

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
