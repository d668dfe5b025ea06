//! Shared primitives for all Rust crates in Phonebook.

#![forbid(unsafe_code)]

use thiserror::Error;

/// Result type used across Phonebook crates.
pub type AppResult<T> = Result<T, AppError>;

/// Common application error categories.
///
/// Every operation returns one of these kinds; the API crate owns the single
/// boundary translating them into HTTP responses.
#[derive(Debug, Error)]
pub enum AppError {
    /// Invalid input or violated invariant.
    #[error("validation error: {0}")]
    Validation(String),

    /// Request body could not be parsed.
    #[error("malformed request: {0}")]
    Malformed(String),

    /// Requested resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Write operation conflicts with existing state.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Internal unexpected error.
    #[error("internal error: {0}")]
    Internal(String),
}
