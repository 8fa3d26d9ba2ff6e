//! Error handling for the scope core
//!
//! This module defines the error type shared by every table lookup and
//! configuration mutator, plus a Result alias used throughout the crate.
//!
//! A failed trigger or next-edge search is *not* an error: it is an expected
//! runtime condition and is modelled as `Option` ("no result") by the
//! detector and the frequency estimator.

use thiserror::Error;

/// Main error type for scope core operations
#[derive(Error, Debug)]
pub enum ScopeError {
    /// An index into one of the static tables is out of bounds
    #[error("{table} index {index} out of range (table has {len} entries)")]
    OutOfRange {
        table: &'static str,
        index: usize,
        len: usize,
    },

    /// A channel number does not name a configured channel
    #[error("channel {index} out of range ({count} channels configured)")]
    Channel { index: usize, count: usize },

    /// Errors in static table or geometry configuration
    ///
    /// These are contract violations caught at construction time, never
    /// runtime-recoverable conditions.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Errors reported by the external acquisition facility
    #[error("Acquisition error: {0}")]
    Acquisition(String),

    /// Generic errors with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<ScopeError>,
    },
}

impl ScopeError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        ScopeError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }
}

/// Result type alias for scope core operations
pub type Result<T> = std::result::Result<T, ScopeError>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error result
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context lazily to an error result
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.with_context(f()))
    }
}
