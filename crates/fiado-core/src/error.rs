//! # Error Types
//!
//! Domain-specific error types for fiado-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  fiado-core errors (this file)                                         │
//! │  ├── CoreError        - Admin workflow and domain failures             │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  fiado-db errors (separate crate)                                      │
//! │  └── DbError          - Store failures, constraint violations          │
//! │                                                                         │
//! │  fiado-app errors                                                      │
//! │  └── ApiError         - What the presentation shell sees               │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError ← DbError                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No administrator has been configured yet.
    ///
    /// ## When This Occurs
    /// - Login attempted on a fresh (or factory-reset) ledger
    /// - Settings change attempted before setup
    #[error("Administrator setup is required")]
    SetupRequired,

    /// Administrator already configured; setup cannot run twice.
    #[error("Administrator is already configured")]
    AlreadyConfigured,

    /// The administrator password did not match.
    #[error("Incorrect administrator password")]
    InvalidCredentials,

    /// The typed reset confirmation phrase was wrong.
    #[error("Type exactly \"{expected}\" to confirm")]
    ConfirmationMismatch { expected: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before anything reaches the store.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be strictly positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value may be zero but not negative.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Amount above the largest value the ledger accepts.
    #[error("{field} must be at most {max} cents")]
    TooLarge { field: String, max: i64 },

    /// Invalid format (e.g. unparseable amount).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Two fields that must agree do not (password and confirmation).
    #[error("{field} does not match its confirmation")]
    Mismatch { field: String },
}

impl ValidationError {
    pub(crate) fn required(field: &str) -> Self {
        ValidationError::Required {
            field: field.to_string(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;
