//! # API Error Type
//!
//! Unified error type for commands. Every command returns
//! `Result<T, ApiError>`; nothing panics and no failure is fatal to the
//! process.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Shell                         Command Layer                            │
//! │  ─────                         ─────────────                            │
//! │                                                                         │
//! │  register_sale(...)                                                     │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Validation? ── ValidationError ────────────► VALIDATION_ERROR  │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Store ──┬── UniqueViolation ───────────────► CONFLICT          │  │
//! │  │          ├── ForeignKeyViolation ───────────► REFERENCE_ERROR   │  │
//! │  │          ├── HasDependents ─────────────────► CONSTRAINT_ERROR  │  │
//! │  │          ├── NotFound ──────────────────────► NOT_FOUND         │  │
//! │  │          └── connection/query/... (logged) ─► STORAGE_ERROR     │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  The shell shows `message` in a dismissible notification and may      │
//! │  branch on `code`.                                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;

use fiado_core::{CoreError, ValidationError};
use fiado_db::DbError;

/// API error returned from commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "CONSTRAINT_ERROR",
///   "message": "Client 3 still has 2 sale(s) and 1 payment(s)"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Malformed or missing input, rejected before the store is touched
    ValidationError,

    /// A name (or the admin singleton) already exists
    Conflict,

    /// A sale or payment names a client/product that does not exist
    ReferenceError,

    /// Delete blocked by dependent rows
    ConstraintError,

    /// The store itself failed
    StorageError,

    /// Row to delete or read does not exist
    NotFound,

    /// Administrator setup has not happened yet
    SetupRequired,

    /// Wrong administrator password
    Unauthorized,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: impl std::fmt::Display) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates a storage error.
    pub fn storage(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::StorageError, message)
    }
}

/// Names the entity behind a `table.column` constraint field.
fn entity_for_field(field: &str) -> &str {
    match field.split('.').next().unwrap_or(field) {
        "clients" => "Client",
        "products" => "Product",
        "admin_settings" => "Administrator",
        other => other,
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, id),
            DbError::UniqueViolation { field, value } => {
                let entity = entity_for_field(&field);
                let message = if value.is_empty() || value == "unknown" {
                    format!("{} already exists", entity)
                } else {
                    format!("{} '{}' already exists", entity, value)
                };
                ApiError::new(ErrorCode::Conflict, message)
            }
            DbError::ForeignKeyViolation { message } => {
                tracing::warn!("Foreign key violation: {}", message);
                ApiError::new(
                    ErrorCode::ReferenceError,
                    "The selected client or product does not exist",
                )
            }
            DbError::HasDependents {
                entity,
                id,
                sales,
                payments,
            } => ApiError::new(
                ErrorCode::ConstraintError,
                format!(
                    "{} {} still has {} sale(s) and {} payment(s)",
                    entity, id, sales, payments
                ),
            ),
            DbError::ConnectionFailed(e) => {
                tracing::error!("Database connection failed: {}", e);
                ApiError::storage("Database connection failed")
            }
            DbError::MigrationFailed(e) => {
                tracing::error!("Database migration failed: {}", e);
                ApiError::storage("Database migration failed")
            }
            DbError::QueryFailed(e) => {
                // Log the actual error but return a generic message
                tracing::error!("Database query failed: {}", e);
                ApiError::storage("Database operation failed")
            }
            DbError::TransactionFailed(e) => {
                tracing::error!("Transaction failed: {}", e);
                ApiError::storage("Database transaction failed")
            }
            DbError::PoolExhausted => {
                tracing::error!("Database pool exhausted");
                ApiError::storage("Database is busy")
            }
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                ApiError::storage("Database operation failed")
            }
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::SetupRequired => ApiError::new(
                ErrorCode::SetupRequired,
                "Administrator setup is required first",
            ),
            CoreError::AlreadyConfigured => ApiError::new(
                ErrorCode::Conflict,
                "Administrator is already configured",
            ),
            CoreError::InvalidCredentials => {
                ApiError::new(ErrorCode::Unauthorized, "Incorrect administrator password")
            }
            e @ CoreError::ConfirmationMismatch { .. } => ApiError::validation(e.to_string()),
            CoreError::Validation(e) => e.into(),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

/// Serialization failures while writing the export file.
impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        tracing::error!("Export serialization failed: {}", err);
        ApiError::storage("Could not serialize the export document")
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        tracing::error!("File write failed: {}", err);
        ApiError::storage(format!("Could not write file: {}", err.kind()))
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_taxonomy_mapping() {
        let conflict: ApiError = DbError::UniqueViolation {
            field: "clients.name".to_string(),
            value: "Ana".to_string(),
        }
        .into();
        assert_eq!(conflict.code, ErrorCode::Conflict);
        assert_eq!(conflict.message, "Client 'Ana' already exists");

        let reference: ApiError = DbError::ForeignKeyViolation {
            message: "FOREIGN KEY constraint failed".to_string(),
        }
        .into();
        assert_eq!(reference.code, ErrorCode::ReferenceError);

        let constraint: ApiError = DbError::HasDependents {
            entity: "Product".to_string(),
            id: 4,
            sales: 2,
            payments: 0,
        }
        .into();
        assert_eq!(constraint.code, ErrorCode::ConstraintError);
    }

    #[test]
    fn test_storage_details_are_hidden() {
        let err: ApiError = DbError::QueryFailed("disk I/O error at page 7".to_string()).into();
        assert_eq!(err.code, ErrorCode::StorageError);
        assert!(!err.message.contains("page 7"));
    }

    #[test]
    fn test_core_mapping() {
        assert_eq!(ApiError::from(CoreError::SetupRequired).code, ErrorCode::SetupRequired);
        assert_eq!(ApiError::from(CoreError::AlreadyConfigured).code, ErrorCode::Conflict);
        assert_eq!(
            ApiError::from(CoreError::InvalidCredentials).code,
            ErrorCode::Unauthorized
        );
        let mismatch = CoreError::ConfirmationMismatch {
            expected: "RESETAR".to_string(),
        };
        assert_eq!(ApiError::from(mismatch).code, ErrorCode::ValidationError);
    }

    #[test]
    fn test_serialized_shape() {
        let err = ApiError::not_found("Sale", 9);
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "NOT_FOUND");
        assert_eq!(json["message"], "Sale not found: 9");
    }
}
