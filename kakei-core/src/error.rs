//! Error taxonomy shared across the service boundary.
//!
//! Every service entry point returns these as values; nothing is thrown past
//! the boundary. Store failures stay opaque inside `Persistence`.

use thiserror::Error;

/// A single invalid input field, reported alongside its siblings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[derive(Debug, Error)]
pub enum Error {
    /// Mutation attempted without an authenticated owner.
    #[error("authentication required")]
    AuthRequired,

    /// One or more input fields failed validation.
    #[error("invalid input: {}", join_fields(.0))]
    Validation(Vec<FieldError>),

    /// Uniqueness violation surfaced by the store (e.g. duplicate category name).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Underlying store failure. The prior value stands; callers re-read.
    #[error("persistence failure: {0}")]
    Persistence(String),
}

impl Error {
    /// Shorthand for a single-field validation failure.
    pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Error::Validation(vec![FieldError::new(field, message)])
    }
}

fn join_fields(fields: &[FieldError]) -> String {
    fields
        .iter()
        .map(|f| f.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
