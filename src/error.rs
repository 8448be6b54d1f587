//! Error types for the truss toolkit.
//!
//! This module provides a unified error type [`TrussError`] for the failures
//! that stop an operation: reading a definition file, a failed or malformed
//! solve response, and analytics preconditions that the input does not meet.
//!
//! Line-level problems in a structure definition are *not* reported through
//! [`TrussError`]. The parser collects them as [`ParseError`](crate::dsl::ParseError)
//! values next to the model it managed to build, and the caller decides whether
//! they are fatal.

use thiserror::Error;

use crate::solution::SolveFailure;

/// Result type alias using [`TrussError`].
pub type Result<T> = std::result::Result<T, TrussError>;

/// Unified error type for all truss operations.
#[derive(Error, Debug)]
pub enum TrussError {
    // ============ Definition Errors ============
    /// The definition has line errors and the caller chose to treat them as fatal
    #[error("Structure definition has {count} error(s), first at line {line}: {message}")]
    Definition {
        count: usize,
        line: usize,
        message: String,
    },

    // ============ Solve Errors ============
    /// The external solver answered with an error payload
    #[error("Solve failed: {0}")]
    Solve(SolveFailure),

    /// The solver answered with a payload that is not a solution
    #[error("Malformed solution payload: {source}")]
    SolutionDecode {
        #[source]
        source: serde_json::Error,
    },

    // ============ Analytics Errors ============
    /// Not enough data to compute a statistic or a scale
    #[error("Insufficient data: {message}")]
    InsufficientData { message: String },

    // ============ I/O Errors ============
    /// Error reading a definition or solution file
    #[error("Failed to read file '{path}': {source}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    // ============ WASM Errors ============
    /// WASM-specific error
    #[cfg(feature = "wasm")]
    #[error("WASM error: {message}")]
    WasmError { message: String },
}

impl TrussError {
    /// Create an insufficient data error
    pub fn insufficient_data(message: impl Into<String>) -> Self {
        Self::InsufficientData {
            message: message.into(),
        }
    }

    /// Create a definition error from the collected parse errors.
    ///
    /// Returns `None` when there is nothing to report.
    pub fn from_parse_errors(errors: &[crate::dsl::ParseError]) -> Option<Self> {
        let first = errors.first()?;
        Some(Self::Definition {
            count: errors.len(),
            line: first.line,
            message: first.message.clone(),
        })
    }
}

impl From<SolveFailure> for TrussError {
    fn from(failure: SolveFailure) -> Self {
        Self::Solve(failure)
    }
}

impl From<serde_json::Error> for TrussError {
    fn from(source: serde_json::Error) -> Self {
        Self::SolutionDecode { source }
    }
}
