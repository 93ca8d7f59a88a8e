//! # Error Types
//!
//! Domain-specific error types for batido-core.
//!
//! ## Error Hierarchy
//! ```text
//! batido-core errors (this file)
//! ├── CoreError        - Business rule violations
//! └── ValidationError  - Input validation failures
//!
//! batido-db errors (separate crate)
//! ├── DbError          - Storage operation failures
//! └── EngineError      - CoreError | DbError, the public surface
//!
//! Flow: ValidationError → CoreError → EngineError → caller
//! ```
//!
//! ## Propagation Policy
//! `NotFound`, `PermissionDenied`, `InsufficientStock`, `ConfirmationRequired`
//! and `Validation` are terminal: retrying does not change the outcome, so the
//! engine reports them verbatim. `Recording` is produced only after the
//! coordinator has exhausted its bounded retries AND run stock compensation.

use thiserror::Error;

use crate::types::Role;

// =============================================================================
// Core Error
// =============================================================================

/// Business rule violations and domain logic failures.
#[derive(Debug, Error)]
pub enum CoreError {
    /// An entity id did not resolve.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// The caller's role does not permit the operation.
    ///
    /// ## When This Occurs
    /// - Customer or anonymous caller attempts an ingredient/product mutation
    /// - Non-admin requests cost or profitability aggregates
    ///
    /// Selling never produces this error; sales are open to every caller.
    #[error("role {role:?} is not permitted to perform {operation}")]
    PermissionDenied {
        operation: crate::policy::Operation,
        role: Option<Role>,
    },

    /// A sale required more stock than an ingredient had.
    ///
    /// When several ingredients are short at once, the reported id is the
    /// lowest one (deterministic tie-break).
    #[error("insufficient stock for ingredient {ingredient_id}")]
    InsufficientStock { ingredient_id: String },

    /// An anonymous sale was attempted without explicit confirmation.
    ///
    /// The boundary layer prompts the user; the engine only checks the flag.
    #[error("anonymous sale requires explicit confirmation")]
    ConfirmationRequired,

    /// Appending the sale record failed after stock was already reserved.
    ///
    /// By the time this surfaces, the decremented stock has been released
    /// again: the net effect of the failed sale is zero.
    #[error("sale recording failed after {attempts} attempts: {message}")]
    Recording { attempts: u32, message: String },

    /// Validation error (wraps ValidationError).
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Creates a NotFound error for a given entity type and id.
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        CoreError::NotFound {
            entity,
            id: id.into(),
        }
    }

    /// Creates an InsufficientStock error.
    pub fn insufficient_stock(ingredient_id: impl Into<String>) -> Self {
        CoreError::InsufficientStock {
            ingredient_id: ingredient_id.into(),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors, raised before any business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: &'static str },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange {
        field: &'static str,
        min: i64,
        max: i64,
    },

    /// Value must be strictly positive.
    #[error("{field} must be positive")]
    MustBePositive { field: &'static str },

    /// Invalid format (e.g., malformed UUID).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat {
        field: &'static str,
        reason: &'static str,
    },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
