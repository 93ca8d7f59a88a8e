//! # Sale Repository
//!
//! The append-only sale ledger. Sales are inserted exactly once by the
//! coordinator and never updated or deleted; this repository deliberately
//! exposes no mutation beyond `insert`.

use sqlx::SqlitePool;
use tracing::debug;

use batido_core::Sale;

use crate::error::{EngineError, EngineResult};

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Appends a sale record.
    pub async fn insert(&self, sale: &Sale) -> EngineResult<()> {
        debug!(id = %sale.id, product_id = %sale.product_id, total = %sale.total_cents, "Appending sale");

        sqlx::query(
            r#"
            INSERT INTO sales (
                id, product_id, principal_id, quantity, total_cents, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&sale.id)
        .bind(&sale.product_id)
        .bind(&sale.principal_id)
        .bind(sale.quantity)
        .bind(sale.total_cents)
        .bind(sale.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Gets a sale by id.
    pub async fn get(&self, id: &str) -> EngineResult<Sale> {
        let sale = sqlx::query_as::<_, Sale>(
            r#"
            SELECT id, product_id, principal_id, quantity, total_cents, created_at
            FROM sales
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        sale.ok_or_else(|| EngineError::not_found("Sale", id))
    }

    /// Lists sales of one product, oldest first.
    pub async fn list_for_product(&self, product_id: &str) -> EngineResult<Vec<Sale>> {
        let sales = sqlx::query_as::<_, Sale>(
            r#"
            SELECT id, product_id, principal_id, quantity, total_cents, created_at
            FROM sales
            WHERE product_id = ?1
            ORDER BY created_at, id
            "#,
        )
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(sales)
    }

    /// Counts all sale records.
    pub async fn count(&self) -> EngineResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
