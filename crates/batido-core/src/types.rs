//! # Domain Types
//!
//! Core domain types for the sale transaction engine.
//!
//! ## Type Overview
//! ```text
//! ┌────────────────┐    ┌─────────────────────┐    ┌────────────────┐
//! │   Ingredient   │    │  product_ingredients│    │    Product     │
//! │  ────────────  │◄───│   (recipe edges)    │───►│  ────────────  │
//! │  id (UUID)     │    │  product_id         │    │  id (UUID)     │
//! │  stock  >= 0   │    │  ingredient_id      │    │  price_cents   │
//! │  price_cents   │    └─────────────────────┘    │  container     │
//! │  kind          │                               └───────┬────────┘
//! └────────────────┘                                       │
//!                                                  ┌───────▼────────┐
//! ┌────────────────┐                               │      Sale      │
//! │   Principal    │──────────── records ─────────►│  ────────────  │
//! │  id, email,    │        (nullable link)        │  append-only   │
//! │  role          │                               │  total_cents   │
//! └────────────────┘                               └────────────────┘
//! ```
//!
//! A recipe is an explicit many-to-many edge table, never embedded
//! references: lookups by product id or ingredient id are index queries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Role & Principal
// =============================================================================

/// Role carried by an authenticated principal.
///
/// Anonymous callers have no principal at all (`Option<&Principal>::None`);
/// there is deliberately no `Anonymous` variant to forget to handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Employee,
    Customer,
}

/// The identity performing an action, as resolved by the identity
/// collaborator. The engine consumes this shape and never persists it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Principal {
    pub id: String,
    pub email: String,
    pub role: Role,
}

impl Principal {
    pub fn new(id: impl Into<String>, email: impl Into<String>, role: Role) -> Self {
        Principal {
            id: id.into(),
            email: email.into(),
            role,
        }
    }
}

// =============================================================================
// Ingredient
// =============================================================================

/// Classification of an ingredient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum IngredientKind {
    /// A base (milk, fruit, ice cream); may carry a flavor.
    Base,
    /// A complement (toppings, syrups); zeroed by the renew operation.
    Complement,
}

/// A stocked component consumed by product sales.
///
/// Invariant: `stock` is never negative. Only the inventory ledger mutates it
/// during sales/restocks/renews, always through conditional batch updates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Ingredient {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name ("leche", "chocolate", ...).
    pub name: String,

    /// Unit cost in cents; feeds the cost/profitability aggregates.
    pub price_cents: i64,

    /// Calories contributed per unit (>= 0).
    pub calories: i64,

    /// Current stock counter (>= 0, never negative).
    pub stock: i64,

    /// Dietary flag: suitable for vegetarians.
    pub vegetarian: bool,

    /// Dietary flag: considered healthy.
    pub healthy: bool,

    /// Base or complement.
    pub kind: IngredientKind,

    /// Flavor, meaningful only for `kind == Base`.
    pub flavor: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Ingredient {
    /// Returns the unit cost as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

/// Field bundle for creating or updating an ingredient.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngredientFields {
    pub name: String,
    pub price_cents: i64,
    pub calories: i64,
    pub stock: i64,
    pub vegetarian: bool,
    pub healthy: bool,
    pub kind: IngredientKind,
    pub flavor: Option<String>,
}

// =============================================================================
// Product
// =============================================================================

/// A sellable catalog entry. Read-mostly; the coordinator only reads it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name ("Malteada de chocolate", ...).
    pub name: String,

    /// Free-form category ("malteada", "jugo", ...).
    pub kind: String,

    /// Public price in cents.
    pub price_cents: i64,

    /// Container type ("vaso grande", ...).
    pub container: String,

    /// Volume in ounces, when applicable.
    pub volume_oz: Option<i64>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the public price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

/// Field bundle for creating or updating a product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductFields {
    pub name: String,
    pub kind: String,
    pub price_cents: i64,
    pub container: String,
    pub volume_oz: Option<i64>,
}

// =============================================================================
// Sale
// =============================================================================

/// An immutable record of one product-selling event.
///
/// Append-only ledger entry: the engine exposes no update or delete path.
/// `principal_id` is `None` for confirmed anonymous sales.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Sale {
    pub id: String,
    pub product_id: String,
    pub principal_id: Option<String>,
    /// Units sold (>= 1).
    pub quantity: i64,
    /// `product.price_cents * quantity` at the time of sale.
    pub total_cents: i64,
    pub created_at: DateTime<Utc>,
}

impl Sale {
    /// Returns the sale total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn ingredient() -> Ingredient {
        let now = Utc::now();
        Ingredient {
            id: "i-1".into(),
            name: "chocolate".into(),
            price_cents: 120,
            calories: 90,
            stock: 4,
            vegetarian: true,
            healthy: false,
            kind: IngredientKind::Base,
            flavor: Some("chocolate".into()),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_ingredient_price_as_money() {
        assert_eq!(ingredient().price(), Money::from_cents(120));
    }

    #[test]
    fn test_kind_serializes_lowercase() {
        let json = serde_json::to_string(&IngredientKind::Complement).unwrap();
        assert_eq!(json, "\"complement\"");
        let back: IngredientKind = serde_json::from_str("\"base\"").unwrap();
        assert_eq!(back, IngredientKind::Base);
    }

    #[test]
    fn test_sale_round_trips_through_json() {
        let sale = Sale {
            id: "s-1".into(),
            product_id: "p-1".into(),
            principal_id: None,
            quantity: 2,
            total_cents: 1000,
            created_at: Utc::now(),
        };
        let json = serde_json::to_string(&sale).unwrap();
        let back: Sale = serde_json::from_str(&json).unwrap();
        assert_eq!(back.total(), Money::from_cents(1000));
        assert!(back.principal_id.is_none());
    }
}
