//! # Ingredient Store
//!
//! Database operations for ingredients.
//!
//! ## Contract
//! - `get` / `list` are open to every caller
//! - `create` / `update` / `delete` require role ∈ {admin, employee} and
//!   fail with `PermissionDenied` otherwise, leaving the store unchanged
//! - stock changes during sales, restocks and renews do NOT go through this
//!   repository; they belong to the inventory ledger

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use batido_core::{policy, validation, Ingredient, IngredientFields, Operation, Principal};

use crate::error::{EngineError, EngineResult};
use crate::repository::generate_id;

/// Repository for ingredient database operations.
#[derive(Debug, Clone)]
pub struct IngredientRepository {
    pool: SqlitePool,
}

impl IngredientRepository {
    /// Creates a new IngredientRepository.
    pub fn new(pool: SqlitePool) -> Self {
        IngredientRepository { pool }
    }

    /// Gets an ingredient by id.
    pub async fn get(&self, id: &str) -> EngineResult<Ingredient> {
        let ingredient = sqlx::query_as::<_, Ingredient>(
            r#"
            SELECT id, name, price_cents, calories, stock,
                   vegetarian, healthy, kind, flavor,
                   created_at, updated_at
            FROM ingredients
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        ingredient.ok_or_else(|| EngineError::not_found("Ingredient", id))
    }

    /// Lists all ingredients ordered by id.
    pub async fn list(&self) -> EngineResult<Vec<Ingredient>> {
        let ingredients = sqlx::query_as::<_, Ingredient>(
            r#"
            SELECT id, name, price_cents, calories, stock,
                   vegetarian, healthy, kind, flavor,
                   created_at, updated_at
            FROM ingredients
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(ingredients)
    }

    /// Creates a new ingredient. Staff only.
    pub async fn create(
        &self,
        principal: Option<&Principal>,
        fields: &IngredientFields,
    ) -> EngineResult<Ingredient> {
        policy::ensure(principal, Operation::CreateIngredient)?;
        validation::validate_ingredient_fields(fields)?;

        let now = Utc::now();
        let ingredient = Ingredient {
            id: generate_id(),
            name: fields.name.trim().to_string(),
            price_cents: fields.price_cents,
            calories: fields.calories,
            stock: fields.stock,
            vegetarian: fields.vegetarian,
            healthy: fields.healthy,
            kind: fields.kind,
            flavor: fields.flavor.clone(),
            created_at: now,
            updated_at: now,
        };

        debug!(id = %ingredient.id, name = %ingredient.name, "Inserting ingredient");

        sqlx::query(
            r#"
            INSERT INTO ingredients (
                id, name, price_cents, calories, stock,
                vegetarian, healthy, kind, flavor,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
        )
        .bind(&ingredient.id)
        .bind(&ingredient.name)
        .bind(ingredient.price_cents)
        .bind(ingredient.calories)
        .bind(ingredient.stock)
        .bind(ingredient.vegetarian)
        .bind(ingredient.healthy)
        .bind(ingredient.kind)
        .bind(&ingredient.flavor)
        .bind(ingredient.created_at)
        .bind(ingredient.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(ingredient)
    }

    /// Updates an existing ingredient. Staff only.
    pub async fn update(
        &self,
        principal: Option<&Principal>,
        id: &str,
        fields: &IngredientFields,
    ) -> EngineResult<()> {
        policy::ensure(principal, Operation::UpdateIngredient)?;
        validation::validate_ingredient_fields(fields)?;

        debug!(id = %id, "Updating ingredient");

        let result = sqlx::query(
            r#"
            UPDATE ingredients SET
                name = ?2,
                price_cents = ?3,
                calories = ?4,
                stock = ?5,
                vegetarian = ?6,
                healthy = ?7,
                kind = ?8,
                flavor = ?9,
                updated_at = ?10
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(fields.name.trim())
        .bind(fields.price_cents)
        .bind(fields.calories)
        .bind(fields.stock)
        .bind(fields.vegetarian)
        .bind(fields.healthy)
        .bind(fields.kind)
        .bind(&fields.flavor)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(EngineError::not_found("Ingredient", id));
        }

        Ok(())
    }

    /// Deletes an ingredient. Staff only.
    ///
    /// Recipe edges referencing it are removed by ON DELETE CASCADE.
    pub async fn delete(&self, principal: Option<&Principal>, id: &str) -> EngineResult<()> {
        policy::ensure(principal, Operation::DeleteIngredient)?;

        debug!(id = %id, "Deleting ingredient");

        let result = sqlx::query("DELETE FROM ingredients WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(EngineError::not_found("Ingredient", id));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use batido_core::{CoreError, IngredientKind};

    use crate::error::EngineError;
    use crate::testing::{admin, customer, employee, ingredient_fields, setup_db};

    #[tokio::test]
    async fn test_create_get_list() {
        let db = setup_db().await;
        let repo = db.ingredients();

        let leche = repo
            .create(
                Some(&admin()),
                &ingredient_fields("leche", 5, IngredientKind::Base),
            )
            .await
            .unwrap();
        let vainilla = repo
            .create(
                Some(&employee()),
                &ingredient_fields("vainilla", 3, IngredientKind::Complement),
            )
            .await
            .unwrap();

        let fetched = repo.get(&leche.id).await.unwrap();
        assert_eq!(fetched.name, "leche");
        assert_eq!(fetched.stock, 5);
        assert_eq!(fetched.kind, IngredientKind::Base);

        let all = repo.list().await.unwrap();
        assert_eq!(all.len(), 2);
        // ordered by id
        let mut ids = vec![leche.id.clone(), vainilla.id.clone()];
        ids.sort();
        assert_eq!(all[0].id, ids[0]);
        assert_eq!(all[1].id, ids[1]);
    }

    #[tokio::test]
    async fn test_mutations_denied_for_customer_and_anonymous() {
        let db = setup_db().await;
        let repo = db.ingredients();
        let fields = ingredient_fields("chocolate", 4, IngredientKind::Base);

        for principal in [Some(customer()), None] {
            let err = repo.create(principal.as_ref(), &fields).await.unwrap_err();
            assert!(matches!(
                err,
                EngineError::Core(CoreError::PermissionDenied { .. })
            ));
        }

        // nothing was written
        assert!(repo.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let db = setup_db().await;
        let repo = db.ingredients();

        let ing = repo
            .create(
                Some(&admin()),
                &ingredient_fields("fresa", 2, IngredientKind::Base),
            )
            .await
            .unwrap();

        let mut fields = ingredient_fields("fresa", 8, IngredientKind::Base);
        fields.flavor = Some("fresa".into());
        repo.update(Some(&admin()), &ing.id, &fields).await.unwrap();

        let updated = repo.get(&ing.id).await.unwrap();
        assert_eq!(updated.stock, 8);
        assert_eq!(updated.flavor.as_deref(), Some("fresa"));

        repo.delete(Some(&admin()), &ing.id).await.unwrap();
        let err = repo.get(&ing.id).await.unwrap_err();
        assert!(matches!(
            err,
            EngineError::Core(CoreError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_validation_rejects_bad_fields() {
        let db = setup_db().await;
        let repo = db.ingredients();

        let mut fields = ingredient_fields("leche", 5, IngredientKind::Base);
        fields.price_cents = -1;

        let err = repo.create(Some(&admin()), &fields).await.unwrap_err();
        assert!(matches!(
            err,
            EngineError::Core(CoreError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_update_missing_ingredient_is_not_found() {
        let db = setup_db().await;
        let repo = db.ingredients();
        let fields = ingredient_fields("leche", 5, IngredientKind::Base);

        let err = repo
            .update(Some(&admin()), "missing-id", &fields)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::Core(CoreError::NotFound { .. })
        ));
    }
}
