//! Core error types for taskcal-core.
//!
//! Errors are split by who can recover from them:
//! - [`ValidationError`]: malformed task input, identified by field. The caller
//!   re-prompts.
//! - [`InvariantViolation`]: a collection-level precondition is broken. This is
//!   a contract failure on the caller's side and must be surfaced, not coerced.
//!
//! "No slot available" is a legitimate negative answer and lives in
//! [`crate::scheduler::SlotSuggestion`], not here.

use thiserror::Error;

/// Core error type for taskcal-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Broken collection preconditions
    #[error("Invariant violation: {0}")]
    Invariant(#[from] InvariantViolation),

    /// No task with the given id exists in the collection
    #[error("Task not found: {0}")]
    TaskNotFound(String),
}

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Title is empty or whitespace only
    #[error("title must not be empty")]
    EmptyTitle,

    /// Importance outside 1..=10
    #[error("importance must be between 1 and 10, got {value}")]
    ImportanceOutOfRange { value: i64 },

    /// Estimated duration is zero or negative
    #[error("estimated time must be a positive number of minutes, got {value}")]
    NonPositiveDuration { value: i64 },

    /// Category name is not one of the known categories
    #[error("unknown category '{value}' (expected one of Work, Personal, School, Errands, Health)")]
    UnknownCategory { value: String },

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

impl ValidationError {
    /// Name of the offending input field.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::EmptyTitle => "title",
            ValidationError::ImportanceOutOfRange { .. } => "importance",
            ValidationError::NonPositiveDuration { .. } => "estimated_minutes",
            ValidationError::UnknownCategory { .. } => "category",
            ValidationError::InvalidValue { field, .. } => field.as_str(),
        }
    }
}

/// Collection-level precondition failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    /// Two tasks in the collection share an id
    #[error("duplicate task id '{id}' in collection")]
    DuplicateId { id: String },

    /// A task carries a zero estimate
    #[error("task '{id}' has a non-positive estimated time")]
    NonPositiveDuration { id: String },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
