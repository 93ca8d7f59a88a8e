//! # Sale Transaction Coordinator
//!
//! Orchestrates a full sale as one logical transaction.
//!
//! ## Sale Lifecycle
//! ```text
//! Started
//!    │  validate quantity, confirmation, product lookup
//!    ▼
//! RecipeResolved          empty recipe is valid: proceeds unconditionally
//!    │  ledger.check_and_decrement(ids, quantity)
//!    │      └── InsufficientStock → terminal, zero side effects
//!    ▼
//! StockReserved
//!    │  append sale record (bounded retries with backoff)
//!    │      └── exhausted → ledger.release(ids, quantity), then
//!    │          Recording error: failed sale nets zero stock change
//!    ▼
//! Recorded (terminal success)
//! ```
//!
//! Within one sale the decrement happens-before the record insert; across
//! sales no ordering is guaranteed beyond the ledger's per-batch atomicity.

use chrono::Utc;
use sqlx::SqlitePool;
use tokio::time::{sleep, Duration};
use tracing::{debug, error, info, warn};

use batido_core::{validation, CoreError, Principal, Sale, RECORDING_ATTEMPTS};

use crate::error::{EngineError, EngineResult};
use crate::ledger::InventoryLedger;
use crate::repository::generate_id;
use crate::repository::product::ProductRepository;
use crate::repository::recipe::RecipeRepository;
use crate::repository::sale::SaleRepository;

/// Backoff base between recording attempts; attempt n waits n × this.
const RECORDING_BACKOFF: Duration = Duration::from_millis(50);

/// The sale transaction coordinator.
///
/// Selling is open to every caller, anonymous included; the access policy
/// gate is never consulted here. An anonymous sale does require the boundary
/// layer to have obtained explicit confirmation, passed in as a flag.
#[derive(Debug, Clone)]
pub struct SaleCoordinator {
    pool: SqlitePool,
}

impl SaleCoordinator {
    /// Creates a new SaleCoordinator.
    pub fn new(pool: SqlitePool) -> Self {
        SaleCoordinator { pool }
    }

    /// Sells `quantity` units of a product on behalf of `principal`.
    ///
    /// ## Arguments
    /// * `product_id` - the product being sold
    /// * `principal` - the acting identity, or `None` for anonymous callers
    /// * `quantity` - units sold (>= 1); the total is price × quantity
    /// * `anonymous_confirmed` - set by the boundary layer after prompting
    ///   the user; ignored when a principal is present
    ///
    /// ## Errors
    /// * `Validation` - non-positive or oversized quantity
    /// * `ConfirmationRequired` - anonymous and not confirmed (no side effects)
    /// * `NotFound` - unknown product
    /// * `InsufficientStock` - some recipe ingredient is short; no stock was
    ///   mutated
    /// * `Recording` - the sale row could not be appended after bounded
    ///   retries; reserved stock has been released again
    pub async fn sell(
        &self,
        product_id: &str,
        principal: Option<&Principal>,
        quantity: i64,
        anonymous_confirmed: bool,
    ) -> EngineResult<Sale> {
        validation::validate_quantity(quantity)?;

        if principal.is_none() && !anonymous_confirmed {
            return Err(CoreError::ConfirmationRequired.into());
        }

        let product = ProductRepository::new(self.pool.clone()).get(product_id).await?;

        let ingredient_ids = RecipeRepository::new(self.pool.clone())
            .ingredients_for(product_id)
            .await?;
        debug!(
            product_id = %product_id,
            ingredients = ingredient_ids.len(),
            quantity,
            "Recipe resolved"
        );

        let ledger = InventoryLedger::new(self.pool.clone());
        ledger.check_and_decrement(&ingredient_ids, quantity).await?;

        let sale = Sale {
            id: generate_id(),
            product_id: product.id.clone(),
            principal_id: principal.map(|p| p.id.clone()),
            quantity,
            total_cents: product.price_cents * quantity,
            created_at: Utc::now(),
        };

        // From here on the decrement is committed. Record-or-release runs in
        // a spawned task awaited below: a caller dropped mid-way can no
        // longer strand the decrement without either a sale record or a
        // compensating release.
        let pool = self.pool.clone();
        let record = sale.clone();
        let ids = ingredient_ids.clone();
        let outcome = tokio::spawn(record_or_release(pool, record, ids, quantity)).await;

        match outcome {
            Ok(Ok(())) => {
                info!(sale_id = %sale.id, total = %sale.total(), "Sale recorded");
                Ok(sale)
            }
            Ok(Err(err)) => Err(err),
            // The task itself never panics; a join error still must not be
            // swallowed silently.
            Err(join_err) => Err(EngineError::Db(crate::error::DbError::Internal(
                join_err.to_string(),
            ))),
        }
    }
}

/// Appends the sale record with bounded retries; on exhaustion releases the
/// reserved stock before surfacing the failure.
async fn record_or_release(
    pool: SqlitePool,
    sale: Sale,
    ingredient_ids: Vec<String>,
    quantity: i64,
) -> EngineResult<()> {
    let sales = SaleRepository::new(pool.clone());

    let mut last_error = String::new();
    for attempt in 1..=RECORDING_ATTEMPTS {
        match sales.insert(&sale).await {
            Ok(()) => return Ok(()),
            Err(err) => {
                warn!(sale_id = %sale.id, attempt, %err, "Sale recording attempt failed");
                last_error = err.to_string();
                if attempt < RECORDING_ATTEMPTS {
                    sleep(RECORDING_BACKOFF * attempt).await;
                }
            }
        }
    }

    // Mandatory compensation: without it a storage fault after the decrement
    // silently leaks inventory.
    let ledger = InventoryLedger::new(pool);
    if let Err(release_err) = ledger.release(&ingredient_ids, quantity).await {
        error!(
            sale_id = %sale.id,
            %release_err,
            "Compensating release failed; stock decrement is stranded"
        );
    }

    Err(CoreError::Recording {
        attempts: RECORDING_ATTEMPTS,
        message: last_error,
    }
    .into())
}

// =============================================================================
// Unit Tests
// =============================================================================
