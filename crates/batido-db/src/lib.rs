//! # batido-db: Database Layer for Batido POS
//!
//! SQLite-backed storage and orchestration for the sale transaction engine.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                UI / CLI boundary (out of scope)                 │
//! └───────────────────────────────┬─────────────────────────────────┘
//!                                 │
//! ┌───────────────────────────────▼─────────────────────────────────┐
//! │                    batido-db (THIS CRATE)                       │
//! │                                                                 │
//! │   ┌──────────────┐   ┌──────────────┐   ┌──────────────────┐   │
//! │   │  Database    │   │ Repositories │   │ InventoryLedger  │   │
//! │   │  (pool.rs)   │◄──│ ingredient   │   │ atomic batch     │   │
//! │   │  SqlitePool  │   │ product      │   │ check+decrement  │   │
//! │   │  migrations  │   │ recipe, sale │   │ restock / renew  │   │
//! │   └──────────────┘   └──────────────┘   └────────┬─────────┘   │
//! │                                                  │             │
//! │   ┌──────────────────────────────────────────────▼─────────┐   │
//! │   │ SaleCoordinator: recipe → reserve stock → record sale, │   │
//! │   │ with bounded retries and compensating release          │   │
//! │   └────────────────────────────────────────────────────────┘   │
//! │                                                                 │
//! │   ReportingView: calories / cost / profitability (on demand)   │
//! └───────────────────────────────┬─────────────────────────────────┘
//!                                 │
//! ┌───────────────────────────────▼─────────────────────────────────┐
//! │                       SQLite (WAL mode)                         │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Storage errors and the public `EngineError`
//! - [`repository`] - Repository implementations (ingredient, product, ...)
//! - [`ledger`] - The inventory ledger, sole owner of stock mutation
//! - [`coordinator`] - The sale transaction coordinator
//! - [`reporting`] - Read-only aggregates
//!
//! ## Usage
//!
//! ```rust,ignore
//! use batido_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/batido.db")).await?;
//! let sale = db.coordinator().sell(&product_id, Some(&cashier), 1, false).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod coordinator;
pub mod error;
pub mod ledger;
pub mod migrations;
pub mod pool;
pub mod reporting;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use coordinator::SaleCoordinator;
pub use error::{DbError, EngineError, EngineResult};
pub use ledger::InventoryLedger;
pub use pool::{Database, DbConfig};
pub use reporting::ReportingView;

pub use repository::ingredient::IngredientRepository;
pub use repository::product::ProductRepository;
pub use repository::recipe::RecipeRepository;
pub use repository::sale::SaleRepository;

// =============================================================================
// Test Support
// =============================================================================

#[cfg(test)]
pub(crate) mod testing {
    //! Shared fixtures for the in-file test modules.

    use batido_core::{
        IngredientFields, IngredientKind, Principal, ProductFields, Role,
    };

    use crate::pool::{Database, DbConfig};

    pub async fn setup_db() -> Database {
        Database::new(DbConfig::in_memory())
            .await
            .expect("in-memory database")
    }

    pub fn admin() -> Principal {
        Principal::new("u-admin", "admin@batido.test", Role::Admin)
    }

    pub fn employee() -> Principal {
        Principal::new("u-emp", "emp@batido.test", Role::Employee)
    }

    pub fn customer() -> Principal {
        Principal::new("u-cust", "cust@batido.test", Role::Customer)
    }

    pub fn ingredient_fields(name: &str, stock: i64, kind: IngredientKind) -> IngredientFields {
        IngredientFields {
            name: name.to_string(),
            price_cents: 100,
            calories: 50,
            stock,
            vegetarian: true,
            healthy: true,
            kind,
            flavor: None,
        }
    }

    pub fn product_fields(name: &str, price_cents: i64) -> ProductFields {
        ProductFields {
            name: name.to_string(),
            kind: "malteada".to_string(),
            price_cents,
            container: "vaso grande".to_string(),
            volume_oz: Some(16),
        }
    }

    /// Creates an ingredient and returns its id.
    pub async fn seed_ingredient(
        db: &Database,
        name: &str,
        stock: i64,
        kind: IngredientKind,
    ) -> String {
        db.ingredients()
            .create(Some(&admin()), &ingredient_fields(name, stock, kind))
            .await
            .expect("seed ingredient")
            .id
    }

    /// Creates a product and returns its id.
    pub async fn seed_product(db: &Database, name: &str, price_cents: i64) -> String {
        db.products()
            .create(Some(&admin()), &product_fields(name, price_cents))
            .await
            .expect("seed product")
            .id
    }

    /// Links an ingredient into a product's recipe.
    pub async fn require_ingredient(db: &Database, product_id: &str, ingredient_id: &str) {
        db.recipes()
            .require(Some(&admin()), product_id, ingredient_id)
            .await
            .expect("recipe edge");
    }
}
