//! # Inventory Ledger
//!
//! Sole owner of the `ingredients.stock` counter. Every stock change — sale
//! decrements, compensating releases, restocks, renews — goes through this
//! module, always as a conditional update inside one transaction.
//!
//! ## Why Conditional Batch Updates?
//! ```text
//! WRONG: read stock, decide, write stock-1       (race: two sellers both
//!                                                 read 1, both write 0 or
//!                                                 drive stock negative)
//!
//! RIGHT: UPDATE ... SET stock = stock - n
//!        WHERE id = ? AND stock >= n             (check+apply indivisible;
//!        then verify rows_affected                a zero row count means
//!        inside the same transaction)             insufficient → rollback)
//! ```
//! The whole batch commits or none of it does: a later ingredient running
//! short rolls back every earlier decrement in the same call.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, warn};

use batido_core::{policy, validation, CoreError, Operation, Principal, DEFAULT_RESTOCK_AMOUNT};

use crate::error::EngineResult;

/// The inventory ledger.
#[derive(Debug, Clone)]
pub struct InventoryLedger {
    pool: SqlitePool,
}

impl InventoryLedger {
    /// Creates a new InventoryLedger.
    pub fn new(pool: SqlitePool) -> Self {
        InventoryLedger { pool }
    }

    /// Atomically verifies and decrements stock for a set of ingredients.
    ///
    /// Either every listed ingredient has `stock >= per_item_amount` and all
    /// are decremented by it, or none are and the failure is reported. Ids
    /// are processed in ascending order, so when several ingredients are
    /// short at once the reported one is deterministically the lowest id.
    ///
    /// An empty set succeeds immediately (recipe-less products always sell).
    pub async fn check_and_decrement(
        &self,
        ingredient_ids: &[String],
        per_item_amount: i64,
    ) -> EngineResult<()> {
        if per_item_amount <= 0 {
            return Err(batido_core::ValidationError::MustBePositive { field: "amount" }.into());
        }

        if ingredient_ids.is_empty() {
            return Ok(());
        }

        let mut ids: Vec<&String> = ingredient_ids.iter().collect();
        ids.sort();
        ids.dedup();

        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        for id in ids {
            let result = sqlx::query(
                r#"
                UPDATE ingredients
                SET stock = stock - ?2, updated_at = ?3
                WHERE id = ?1 AND stock >= ?2
                "#,
            )
            .bind(id)
            .bind(per_item_amount)
            .bind(now)
            .execute(&mut *tx)
            .await?;

            if result.rows_affected() == 0 {
                // Not decremented: either the row is missing or it is short.
                let stock: Option<i64> =
                    sqlx::query_scalar("SELECT stock FROM ingredients WHERE id = ?1")
                        .bind(id)
                        .fetch_optional(&mut *tx)
                        .await?;

                tx.rollback().await?;

                return Err(match stock {
                    Some(available) => {
                        debug!(ingredient_id = %id, available, requested = per_item_amount, "Insufficient stock");
                        CoreError::insufficient_stock(id.clone()).into()
                    }
                    None => CoreError::not_found("Ingredient", id.clone()).into(),
                });
            }
        }

        tx.commit().await?;
        Ok(())
    }

    /// Compensating re-increment: undoes a prior `check_and_decrement` with
    /// the same arguments. Used when sale recording fails after stock was
    /// reserved.
    pub async fn release(
        &self,
        ingredient_ids: &[String],
        per_item_amount: i64,
    ) -> EngineResult<()> {
        if ingredient_ids.is_empty() {
            return Ok(());
        }

        warn!(count = ingredient_ids.len(), amount = per_item_amount, "Releasing reserved stock");

        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        for id in ingredient_ids {
            sqlx::query(
                r#"
                UPDATE ingredients
                SET stock = stock + ?2, updated_at = ?3
                WHERE id = ?1
                "#,
            )
            .bind(id)
            .bind(per_item_amount)
            .bind(now)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Increases an ingredient's stock. Staff only.
    ///
    /// `amount` defaults to [`DEFAULT_RESTOCK_AMOUNT`] and must be positive.
    /// Returns the new stock level.
    pub async fn restock(
        &self,
        principal: Option<&Principal>,
        ingredient_id: &str,
        amount: Option<i64>,
    ) -> EngineResult<i64> {
        policy::ensure(principal, Operation::Restock)?;

        let amount = amount.unwrap_or(DEFAULT_RESTOCK_AMOUNT);
        validation::validate_restock_amount(amount)?;

        debug!(ingredient_id = %ingredient_id, amount, "Restocking");

        let result = sqlx::query(
            r#"
            UPDATE ingredients
            SET stock = stock + ?2, updated_at = ?3
            WHERE id = ?1
            "#,
        )
        .bind(ingredient_id)
        .bind(amount)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::not_found("Ingredient", ingredient_id).into());
        }

        let stock: i64 = sqlx::query_scalar("SELECT stock FROM ingredients WHERE id = ?1")
            .bind(ingredient_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(stock)
    }

    /// Renews an ingredient: stock becomes 0 when `kind == complement`,
    /// bases keep their stock unchanged.
    ///
    /// The base no-op mirrors the storefront requirement "renovar el
    /// inventario (poner a 0 si es complemento)" literally; it is documented
    /// behavior, not a bug to fix here.
    pub async fn renew(
        &self,
        principal: Option<&Principal>,
        ingredient_id: &str,
    ) -> EngineResult<()> {
        policy::ensure(principal, Operation::Renew)?;

        debug!(ingredient_id = %ingredient_id, "Renewing");

        let result = sqlx::query(
            r#"
            UPDATE ingredients
            SET stock = CASE WHEN kind = 'complement' THEN 0 ELSE stock END,
                updated_at = ?2
            WHERE id = ?1
            "#,
        )
        .bind(ingredient_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::not_found("Ingredient", ingredient_id).into());
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
    use crate::testing::{admin, customer, seed_ingredient, setup_db};

    #[tokio::test]
    async fn test_decrement_all_or_nothing() {
        let db = setup_db().await;
        let plenty = seed_ingredient(&db, "leche", 10, IngredientKind::Base).await;
        let short = seed_ingredient(&db, "chocolate", 1, IngredientKind::Base).await;

        let ids = vec![plenty.clone(), short.clone()];
        let err = db.ledger().check_and_decrement(&ids, 2).await.unwrap_err();
        match err {
            EngineError::Core(CoreError::InsufficientStock { ingredient_id }) => {
                assert_eq!(ingredient_id, short);
            }
            other => panic!("unexpected error: {other}"),
        }

        // the plentiful ingredient was rolled back too
        assert_eq!(db.ingredients().get(&plenty).await.unwrap().stock, 10);
        assert_eq!(db.ingredients().get(&short).await.unwrap().stock, 1);
    }

    #[tokio::test]
    async fn test_decrement_success_and_release() {
        let db = setup_db().await;
        let a = seed_ingredient(&db, "leche", 5, IngredientKind::Base).await;
        let b = seed_ingredient(&db, "fresa", 5, IngredientKind::Base).await;

        let ids = vec![a.clone(), b.clone()];
        db.ledger().check_and_decrement(&ids, 2).await.unwrap();
        assert_eq!(db.ingredients().get(&a).await.unwrap().stock, 3);
        assert_eq!(db.ingredients().get(&b).await.unwrap().stock, 3);

        db.ledger().release(&ids, 2).await.unwrap();
        assert_eq!(db.ingredients().get(&a).await.unwrap().stock, 5);
        assert_eq!(db.ingredients().get(&b).await.unwrap().stock, 5);
    }

    #[tokio::test]
    async fn test_insufficient_reports_lowest_id() {
        let db = setup_db().await;
        let x = seed_ingredient(&db, "azucar", 0, IngredientKind::Complement).await;
        let y = seed_ingredient(&db, "granola", 0, IngredientKind::Complement).await;

        let lowest = x.clone().min(y.clone());
        // pass the ids in the "wrong" order on purpose
        let ids = vec![x.max(y.clone()), lowest.clone()];
        let err = db.ledger().check_and_decrement(&ids, 1).await.unwrap_err();
        match err {
            EngineError::Core(CoreError::InsufficientStock { ingredient_id }) => {
                assert_eq!(ingredient_id, lowest);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_unknown_ingredient_is_not_found() {
        let db = setup_db().await;
        let ids = vec!["no-such-id".to_string()];
        let err = db.ledger().check_and_decrement(&ids, 1).await.unwrap_err();
        assert!(matches!(
            err,
            EngineError::Core(CoreError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_empty_set_succeeds() {
        let db = setup_db().await;
        db.ledger().check_and_decrement(&[], 1).await.unwrap();
    }

    #[tokio::test]
    async fn test_restock_defaults_to_ten() {
        let db = setup_db().await;
        let id = seed_ingredient(&db, "leche", 5, IngredientKind::Base).await;

        let stock = db.ledger().restock(Some(&admin()), &id, None).await.unwrap();
        assert_eq!(stock, 15);

        let stock = db
            .ledger()
            .restock(Some(&admin()), &id, Some(3))
            .await
            .unwrap();
        assert_eq!(stock, 18);
    }

    #[tokio::test]
    async fn test_restock_rejects_non_positive_amount() {
        let db = setup_db().await;
        let id = seed_ingredient(&db, "leche", 5, IngredientKind::Base).await;

        let err = db
            .ledger()
            .restock(Some(&admin()), &id, Some(0))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::Core(CoreError::Validation(_))
        ));
        assert_eq!(db.ingredients().get(&id).await.unwrap().stock, 5);
    }

    #[tokio::test]
    async fn test_restock_denied_for_customer_leaves_stock_unchanged() {
        // Scenario: customer calls restock → PermissionDenied, no change.
        let db = setup_db().await;
        let id = seed_ingredient(&db, "leche", 5, IngredientKind::Base).await;

        let err = db
            .ledger()
            .restock(Some(&customer()), &id, Some(10))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::Core(CoreError::PermissionDenied { .. })
        ));
        assert_eq!(db.ingredients().get(&id).await.unwrap().stock, 5);
    }

    #[tokio::test]
    async fn test_renew_zeroes_complements_only() {
        let db = setup_db().await;
        let vainilla = seed_ingredient(&db, "vainilla", 5, IngredientKind::Complement).await;
        let leche = seed_ingredient(&db, "leche", 5, IngredientKind::Base).await;

        db.ledger().renew(Some(&admin()), &vainilla).await.unwrap();
        assert_eq!(db.ingredients().get(&vainilla).await.unwrap().stock, 0);

        db.ledger().renew(Some(&admin()), &leche).await.unwrap();
        // bases keep their stock: documented quirk, not a bug fix
        assert_eq!(db.ingredients().get(&leche).await.unwrap().stock, 5);
    }
}
