//! # Recipe Index
//!
//! The many-to-many mapping from products to the ingredients they require,
//! stored as explicit edge rows (never embedded references).
//!
//! Read-only from the coordinator's viewpoint: a sale only ever calls
//! [`RecipeRepository::ingredients_for`]. The gated edge mutations exist for
//! catalog management and seeding.

use sqlx::SqlitePool;
use tracing::debug;

use batido_core::{policy, Operation, Principal};

use crate::error::{EngineError, EngineResult};

/// Repository for recipe edge operations.
#[derive(Debug, Clone)]
pub struct RecipeRepository {
    pool: SqlitePool,
}

impl RecipeRepository {
    /// Creates a new RecipeRepository.
    pub fn new(pool: SqlitePool) -> Self {
        RecipeRepository { pool }
    }

    /// Returns the ingredient ids a product requires, ordered ascending.
    ///
    /// A product with no declared recipe yields an empty vec, not an error:
    /// the coordinator treats it as "nothing to check on the inventory side".
    pub async fn ingredients_for(&self, product_id: &str) -> EngineResult<Vec<String>> {
        let ids: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT ingredient_id
            FROM product_ingredients
            WHERE product_id = ?1
            ORDER BY ingredient_id
            "#,
        )
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids)
    }

    /// Returns the product ids whose recipes require an ingredient.
    /// Index query on the reverse edge direction.
    pub async fn products_requiring(&self, ingredient_id: &str) -> EngineResult<Vec<String>> {
        let ids: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT product_id
            FROM product_ingredients
            WHERE ingredient_id = ?1
            ORDER BY product_id
            "#,
        )
        .bind(ingredient_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids)
    }

    /// Adds an ingredient to a product's recipe. Staff only; idempotent.
    ///
    /// Both endpoints must exist (foreign keys), otherwise the insert fails
    /// with a foreign key violation.
    pub async fn require(
        &self,
        principal: Option<&Principal>,
        product_id: &str,
        ingredient_id: &str,
    ) -> EngineResult<()> {
        policy::ensure(principal, Operation::DefineRecipe)?;

        debug!(product_id = %product_id, ingredient_id = %ingredient_id, "Adding recipe edge");

        sqlx::query(
            r#"
            INSERT OR IGNORE INTO product_ingredients (product_id, ingredient_id)
            VALUES (?1, ?2)
            "#,
        )
        .bind(product_id)
        .bind(ingredient_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Removes an ingredient from a product's recipe. Staff only.
    pub async fn remove_requirement(
        &self,
        principal: Option<&Principal>,
        product_id: &str,
        ingredient_id: &str,
    ) -> EngineResult<()> {
        policy::ensure(principal, Operation::DefineRecipe)?;

        let result = sqlx::query(
            r#"
            DELETE FROM product_ingredients
            WHERE product_id = ?1 AND ingredient_id = ?2
            "#,
        )
        .bind(product_id)
        .bind(ingredient_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(EngineError::not_found("Recipe edge", product_id));
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
    use crate::testing::{admin, customer, seed_ingredient, seed_product, setup_db};

    #[tokio::test]
    async fn test_empty_recipe_is_empty_vec_not_error() {
        let db = setup_db().await;
        let product_id = seed_product(&db, "Agua", 100).await;

        let ids = db.recipes().ingredients_for(&product_id).await.unwrap();
        assert!(ids.is_empty());

        // even for ids that don't exist at all
        let ids = db.recipes().ingredients_for("no-such-product").await.unwrap();
        assert!(ids.is_empty());
    }

    #[tokio::test]
    async fn test_edges_both_directions() {
        let db = setup_db().await;
        let recipes = db.recipes();

        let malteada = seed_product(&db, "Malteada", 500).await;
        let jugo = seed_product(&db, "Jugo", 300).await;
        let leche = seed_ingredient(&db, "leche", 5, IngredientKind::Base).await;
        let fresa = seed_ingredient(&db, "fresa", 5, IngredientKind::Base).await;

        recipes.require(Some(&admin()), &malteada, &leche).await.unwrap();
        recipes.require(Some(&admin()), &malteada, &fresa).await.unwrap();
        recipes.require(Some(&admin()), &jugo, &fresa).await.unwrap();
        // idempotent
        recipes.require(Some(&admin()), &jugo, &fresa).await.unwrap();

        let mut expected = vec![leche.clone(), fresa.clone()];
        expected.sort();
        assert_eq!(recipes.ingredients_for(&malteada).await.unwrap(), expected);

        let mut products = vec![malteada.clone(), jugo.clone()];
        products.sort();
        assert_eq!(recipes.products_requiring(&fresa).await.unwrap(), products);

        recipes
            .remove_requirement(Some(&admin()), &jugo, &fresa)
            .await
            .unwrap();
        assert_eq!(
            recipes.products_requiring(&fresa).await.unwrap(),
            vec![malteada]
        );
    }

    #[tokio::test]
    async fn test_edge_mutations_are_gated() {
        let db = setup_db().await;
        let product_id = seed_product(&db, "Malteada", 500).await;
        let leche = seed_ingredient(&db, "leche", 5, IngredientKind::Base).await;

        let err = db
            .recipes()
            .require(Some(&customer()), &product_id, &leche)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::Core(CoreError::PermissionDenied { .. })
        ));
    }
}
