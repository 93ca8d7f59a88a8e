//! # Reporting View
//!
//! Read-only aggregates over the recipe index, ingredient store and sale
//! history. Every query recomputes from current state on demand; nothing is
//! cached and nothing here mutates.
//!
//! ## Gating
//! Calories are public information. Cost and profitability reveal margins
//! and are admin-only, checked through the same policy gate as mutations.

use sqlx::SqlitePool;

use batido_core::{policy, Money, Operation, Principal};

use crate::error::EngineResult;

/// One row of the profitability ranking.
#[derive(Debug, Clone, sqlx::FromRow, serde::Serialize)]
pub struct ProductProfit {
    pub product_id: String,
    pub name: String,
    /// `price_cents - recipe cost`; negative when the recipe costs more
    /// than the public price.
    pub profit_cents: i64,
}

impl ProductProfit {
    /// Returns the profitability as Money.
    #[inline]
    pub fn profit(&self) -> Money {
        Money::from_cents(self.profit_cents)
    }
}

/// The read-only reporting view.
#[derive(Debug, Clone)]
pub struct ReportingView {
    pool: SqlitePool,
}

impl ReportingView {
    /// Creates a new ReportingView.
    pub fn new(pool: SqlitePool) -> Self {
        ReportingView { pool }
    }

    /// Sum of ingredient calories over a product's recipe. Unrestricted.
    pub async fn calories_for(&self, product_id: &str) -> EngineResult<i64> {
        self.ensure_product(product_id).await?;

        let calories: i64 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(i.calories), 0)
            FROM product_ingredients pi
            JOIN ingredients i ON i.id = pi.ingredient_id
            WHERE pi.product_id = ?1
            "#,
        )
        .bind(product_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(calories)
    }

    /// Sum of ingredient unit prices over a product's recipe. Admin only.
    pub async fn cost_for(
        &self,
        principal: Option<&Principal>,
        product_id: &str,
    ) -> EngineResult<Money> {
        policy::ensure(principal, Operation::ViewCost)?;
        self.ensure_product(product_id).await?;

        let cost_cents: i64 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(i.price_cents), 0)
            FROM product_ingredients pi
            JOIN ingredients i ON i.id = pi.ingredient_id
            WHERE pi.product_id = ?1
            "#,
        )
        .bind(product_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(Money::from_cents(cost_cents))
    }

    /// Public price minus recipe cost. Admin only.
    pub async fn profitability_for(
        &self,
        principal: Option<&Principal>,
        product_id: &str,
    ) -> EngineResult<Money> {
        policy::ensure(principal, Operation::ViewProfitability)?;

        let row: Option<i64> = sqlx::query_scalar(
            r#"
            SELECT p.price_cents - COALESCE(SUM(i.price_cents), 0)
            FROM products p
            LEFT JOIN product_ingredients pi ON pi.product_id = p.id
            LEFT JOIN ingredients i ON i.id = pi.ingredient_id
            WHERE p.id = ?1
            GROUP BY p.id
            "#,
        )
        .bind(product_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Money::from_cents)
            .ok_or_else(|| crate::error::EngineError::not_found("Product", product_id))
    }

    /// The product with the highest profitability, tie-break by lowest
    /// product id. `None` when the catalog is empty. Admin only.
    pub async fn most_profitable(
        &self,
        principal: Option<&Principal>,
    ) -> EngineResult<Option<ProductProfit>> {
        policy::ensure(principal, Operation::ViewProfitability)?;

        let row = sqlx::query_as::<_, ProductProfit>(
            r#"
            SELECT p.id AS product_id,
                   p.name AS name,
                   p.price_cents - COALESCE(SUM(i.price_cents), 0) AS profit_cents
            FROM products p
            LEFT JOIN product_ingredients pi ON pi.product_id = p.id
            LEFT JOIN ingredients i ON i.id = pi.ingredient_id
            GROUP BY p.id
            ORDER BY profit_cents DESC, p.id ASC
            LIMIT 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn ensure_product(&self, product_id: &str) -> EngineResult<()> {
        let exists: Option<i64> = sqlx::query_scalar("SELECT 1 FROM products WHERE id = ?1")
            .bind(product_id)
            .fetch_optional(&self.pool)
            .await?;

        match exists {
            Some(_) => Ok(()),
            None => Err(crate::error::EngineError::not_found("Product", product_id)),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
