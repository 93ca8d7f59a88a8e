//! # Database Error Types
//!
//! Storage errors and the engine's public error surface.
//!
//! ## Error Flow
//! ```text
//! SQLite error (sqlx::Error)
//!      │
//!      ▼
//! DbError (this module)       categorized storage fault
//!      │
//!      ▼
//! EngineError                 DbError | CoreError, what callers match on
//! ```
//!
//! Business outcomes (`InsufficientStock`, `PermissionDenied`, ...) travel as
//! [`CoreError`]; `DbError` is reserved for genuine storage faults.

use thiserror::Error;

use batido_core::{CoreError, ValidationError};

// =============================================================================
// DbError
// =============================================================================

/// Database operation errors, wrapping sqlx errors with categorization.
#[derive(Debug, Error)]
pub enum DbError {
    /// Unique constraint violation (duplicate recipe edge, reused id).
    #[error("duplicate {field}: already exists")]
    UniqueViolation { field: String },

    /// Foreign key constraint violation (recipe edge to a missing row).
    #[error("foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// Database connection failed.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("query failed: {0}")]
    QueryFailed(String),

    /// Pool exhausted (all connections in use).
    #[error("connection pool exhausted")]
    PoolExhausted,

    /// Internal database error.
    #[error("internal database error: {0}")]
    Internal(String),
}

/// Convert sqlx errors to DbError.
///
/// SQLite reports constraint failures as database errors with a message
/// prefix; we inspect the message to categorize them.
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                if msg.contains("UNIQUE constraint failed") {
                    let field = msg
                        .split("UNIQUE constraint failed: ")
                        .nth(1)
                        .unwrap_or("unknown")
                        .to_string();
                    DbError::UniqueViolation { field }
                } else if msg.contains("FOREIGN KEY constraint failed") {
                    DbError::ForeignKeyViolation {
                        message: msg.to_string(),
                    }
                } else {
                    DbError::QueryFailed(msg.to_string())
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("pool is closed".to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Result type for internal database operations.
pub type DbResult<T> = Result<T, DbError>;

// =============================================================================
// EngineError
// =============================================================================

/// The engine's public error surface: a business outcome or a storage fault.
///
/// ## Matching
/// ```rust,ignore
/// match db.coordinator().sell(&pid, None, 1, true).await {
///     Err(EngineError::Core(CoreError::InsufficientStock { ingredient_id })) => ...,
///     Err(EngineError::Db(fault)) => ...,
///     Ok(sale) => ...,
/// }
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Db(#[from] DbError),
}

impl From<sqlx::Error> for EngineError {
    fn from(err: sqlx::Error) -> Self {
        EngineError::Db(DbError::from(err))
    }
}

impl From<ValidationError> for EngineError {
    fn from(err: ValidationError) -> Self {
        EngineError::Core(CoreError::Validation(err))
    }
}

impl EngineError {
    /// Shorthand for a business-level NotFound.
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        EngineError::Core(CoreError::not_found(entity, id))
    }

    /// True when the error is the business rule "not enough stock".
    pub fn is_insufficient_stock(&self) -> bool {
        matches!(
            self,
            EngineError::Core(CoreError::InsufficientStock { .. })
        )
    }
}

/// Result type for the engine's public operations.
pub type EngineResult<T> = Result<T, EngineError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_error_from_core() {
        let err: EngineError = CoreError::ConfirmationRequired.into();
        assert!(matches!(
            err,
            EngineError::Core(CoreError::ConfirmationRequired)
        ));
    }

    #[test]
    fn test_insufficient_stock_helper() {
        let err: EngineError = CoreError::insufficient_stock("i-1").into();
        assert!(err.is_insufficient_stock());

        let err: EngineError = DbError::PoolExhausted.into();
        assert!(!err.is_insufficient_stock());
    }
}
