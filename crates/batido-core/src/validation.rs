//! # Validation Module
//!
//! Input validation for the engine's public operations.
//!
//! ## Validation Strategy
//! ```text
//! Layer 1: boundary (UI/CLI)     basic format checks, immediate feedback
//! Layer 2: THIS MODULE           business rule validation before any I/O
//! Layer 3: database (SQLite)     NOT NULL / CHECK / foreign key constraints
//! ```
//! Defense in depth: the CHECK (stock >= 0) constraint backs up the ledger's
//! conditional updates, but validation failures here are the errors callers
//! actually see.

use crate::error::ValidationError;
use crate::types::{IngredientFields, ProductFields};
use crate::MAX_SALE_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Scalar Validators
// =============================================================================

/// Validates a display name (ingredient or product).
pub fn validate_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required { field: "name" });
    }

    if name.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "name",
            max: 200,
        });
    }

    Ok(())
}

/// Validates a price in cents. Zero is allowed (free items).
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: "price",
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a calorie count (non-negative).
pub fn validate_calories(calories: i64) -> ValidationResult<()> {
    if calories < 0 {
        return Err(ValidationError::OutOfRange {
            field: "calories",
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a stock counter (non-negative).
pub fn validate_stock(stock: i64) -> ValidationResult<()> {
    if stock < 0 {
        return Err(ValidationError::OutOfRange {
            field: "stock",
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a sale quantity: 1 ..= MAX_SALE_QUANTITY.
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive { field: "quantity" });
    }

    if qty > MAX_SALE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity",
            min: 1,
            max: MAX_SALE_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a restock amount (strictly positive).
pub fn validate_restock_amount(amount: i64) -> ValidationResult<()> {
    if amount <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "restock amount",
        });
    }

    Ok(())
}

/// Validates a UUID string format.
pub fn validate_uuid(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required { field: "id" });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: "id",
        reason: "must be a valid UUID",
    })?;

    Ok(())
}

// =============================================================================
// Field-Bundle Validators
// =============================================================================

/// Validates every field of an ingredient create/update.
pub fn validate_ingredient_fields(fields: &IngredientFields) -> ValidationResult<()> {
    validate_name(&fields.name)?;
    validate_price_cents(fields.price_cents)?;
    validate_calories(fields.calories)?;
    validate_stock(fields.stock)?;
    Ok(())
}

/// Validates every field of a product create/update.
pub fn validate_product_fields(fields: &ProductFields) -> ValidationResult<()> {
    validate_name(&fields.name)?;
    validate_price_cents(fields.price_cents)?;
    if let Some(volume) = fields.volume_oz {
        if volume <= 0 {
            return Err(ValidationError::MustBePositive { field: "volume_oz" });
        }
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::IngredientKind;

    #[test]
    fn test_validate_name() {
        assert!(validate_name("chocolate").is_ok());
        assert!(validate_name("").is_err());
        assert!(validate_name("   ").is_err());
        assert!(validate_name(&"A".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(1000).is_err());
    }

    #[test]
    fn test_validate_restock_amount() {
        assert!(validate_restock_amount(10).is_ok());
        assert!(validate_restock_amount(1).is_ok());
        assert!(validate_restock_amount(0).is_err());
        assert!(validate_restock_amount(-5).is_err());
    }

    #[test]
    fn test_validate_price_and_calories() {
        assert!(validate_price_cents(0).is_ok());
        assert!(validate_price_cents(-1).is_err());
        assert!(validate_calories(0).is_ok());
        assert!(validate_calories(-10).is_err());
    }

    #[test]
    fn test_validate_uuid() {
        assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
        assert!(validate_uuid("").is_err());
        assert!(validate_uuid("not-a-uuid").is_err());
    }

    #[test]
    fn test_validate_ingredient_fields() {
        let mut fields = IngredientFields {
            name: "vainilla".into(),
            price_cents: 80,
            calories: 30,
            stock: 5,
            vegetarian: true,
            healthy: true,
            kind: IngredientKind::Complement,
            flavor: None,
        };
        assert!(validate_ingredient_fields(&fields).is_ok());

        fields.stock = -1;
        assert!(validate_ingredient_fields(&fields).is_err());
    }
}
