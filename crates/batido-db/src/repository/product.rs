//! # Product Repository
//!
//! Database operations for catalog products. Read-mostly: the coordinator
//! and reporting view only read products; mutations are staff-gated exactly
//! like ingredients.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use batido_core::{policy, validation, Operation, Principal, Product, ProductFields};

use crate::error::{EngineError, EngineResult};
use crate::repository::generate_id;

/// Repository for product database operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Gets a product by id.
    pub async fn get(&self, id: &str) -> EngineResult<Product> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, kind, price_cents, container, volume_oz,
                   created_at, updated_at
            FROM products
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        product.ok_or_else(|| EngineError::not_found("Product", id))
    }

    /// Lists all products ordered by id.
    pub async fn list(&self) -> EngineResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, kind, price_cents, container, volume_oz,
                   created_at, updated_at
            FROM products
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Creates a new product. Staff only.
    pub async fn create(
        &self,
        principal: Option<&Principal>,
        fields: &ProductFields,
    ) -> EngineResult<Product> {
        policy::ensure(principal, Operation::CreateProduct)?;
        validation::validate_product_fields(fields)?;

        let now = Utc::now();
        let product = Product {
            id: generate_id(),
            name: fields.name.trim().to_string(),
            kind: fields.kind.clone(),
            price_cents: fields.price_cents,
            container: fields.container.clone(),
            volume_oz: fields.volume_oz,
            created_at: now,
            updated_at: now,
        };

        debug!(id = %product.id, name = %product.name, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (
                id, name, kind, price_cents, container, volume_oz,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.kind)
        .bind(product.price_cents)
        .bind(&product.container)
        .bind(product.volume_oz)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(product)
    }

    /// Updates an existing product. Staff only.
    pub async fn update(
        &self,
        principal: Option<&Principal>,
        id: &str,
        fields: &ProductFields,
    ) -> EngineResult<()> {
        policy::ensure(principal, Operation::UpdateProduct)?;
        validation::validate_product_fields(fields)?;

        debug!(id = %id, "Updating product");

        let result = sqlx::query(
            r#"
            UPDATE products SET
                name = ?2,
                kind = ?3,
                price_cents = ?4,
                container = ?5,
                volume_oz = ?6,
                updated_at = ?7
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(fields.name.trim())
        .bind(&fields.kind)
        .bind(fields.price_cents)
        .bind(&fields.container)
        .bind(fields.volume_oz)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(EngineError::not_found("Product", id));
        }

        Ok(())
    }

    /// Deletes a product. Staff only. Recipe edges cascade away; historical
    /// sales keep referencing the id, so deletion fails while sales exist.
    pub async fn delete(&self, principal: Option<&Principal>, id: &str) -> EngineResult<()> {
        policy::ensure(principal, Operation::DeleteProduct)?;

        debug!(id = %id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(EngineError::not_found("Product", id));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use batido_core::{CoreError, Money};

    use crate::error::EngineError;
    use crate::testing::{admin, customer, product_fields, setup_db};

    #[tokio::test]
    async fn test_create_and_get() {
        let db = setup_db().await;
        let repo = db.products();

        let created = repo
            .create(Some(&admin()), &product_fields("Malteada", 500))
            .await
            .unwrap();

        let fetched = repo.get(&created.id).await.unwrap();
        assert_eq!(fetched.name, "Malteada");
        assert_eq!(fetched.price(), Money::from_cents(500));
        assert_eq!(fetched.volume_oz, Some(16));
    }

    #[tokio::test]
    async fn test_mutations_are_gated() {
        let db = setup_db().await;
        let repo = db.products();

        let err = repo
            .create(Some(&customer()), &product_fields("Jugo", 300))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::Core(CoreError::PermissionDenied { .. })
        ));
        assert!(repo.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let db = setup_db().await;
        let repo = db.products();

        let product = repo
            .create(Some(&admin()), &product_fields("Jugo", 300))
            .await
            .unwrap();

        let mut fields = product_fields("Jugo de fresa", 350);
        fields.kind = "jugo".into();
        repo.update(Some(&admin()), &product.id, &fields)
            .await
            .unwrap();

        let updated = repo.get(&product.id).await.unwrap();
        assert_eq!(updated.name, "Jugo de fresa");
        assert_eq!(updated.price_cents, 350);

        repo.delete(Some(&admin()), &product.id).await.unwrap();
        assert!(repo.get(&product.id).await.is_err());
    }
}
