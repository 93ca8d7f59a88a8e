//! # Access Policy Gate
//!
//! Pure mapping from a caller's role to permitted operations.
//!
//! ## Policy Table
//! ```text
//! ┌────────────────────────────┬───────┬──────────┬──────────┬───────────┐
//! │ operation                  │ admin │ employee │ customer │ anonymous │
//! ├────────────────────────────┼───────┼──────────┼──────────┼───────────┤
//! │ ingredient/product/recipe  │  yes  │   yes    │    no    │    no     │
//! │ mutations, restock, renew  │       │          │          │           │
//! │ sell                       │  yes  │   yes    │   yes    │   yes*    │
//! │ view calories              │  yes  │   yes    │   yes    │   yes     │
//! │ view cost / profitability  │  yes  │    no    │    no    │    no     │
//! └────────────────────────────┴───────┴──────────┴──────────┴───────────┘
//! * anonymous sales additionally require an explicit confirmation flag,
//!   checked by the coordinator, not here.
//! ```
//!
//! The gate is consulted before every mutating ingredient/product operation.
//! It is never consulted for selling: per product policy any principal,
//! including anonymous, may sell.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{Principal, Role};

// =============================================================================
// Operations
// =============================================================================

/// Every operation the policy gate can be asked about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    CreateIngredient,
    UpdateIngredient,
    DeleteIngredient,
    Restock,
    Renew,
    CreateProduct,
    UpdateProduct,
    DeleteProduct,
    DefineRecipe,
    Sell,
    ViewCalories,
    ViewCost,
    ViewProfitability,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::CreateIngredient => "create_ingredient",
            Operation::UpdateIngredient => "update_ingredient",
            Operation::DeleteIngredient => "delete_ingredient",
            Operation::Restock => "restock",
            Operation::Renew => "renew",
            Operation::CreateProduct => "create_product",
            Operation::UpdateProduct => "update_product",
            Operation::DeleteProduct => "delete_product",
            Operation::DefineRecipe => "define_recipe",
            Operation::Sell => "sell",
            Operation::ViewCalories => "view_calories",
            Operation::ViewCost => "view_cost",
            Operation::ViewProfitability => "view_profitability",
        };
        f.write_str(name)
    }
}

// =============================================================================
// The Gate
// =============================================================================

/// Returns whether `role` may perform `operation`.
///
/// `None` is an anonymous caller. Pure function: same inputs, same answer.
pub fn permits(role: Option<Role>, operation: Operation) -> bool {
    use Operation::*;

    match operation {
        // Selling and calorie info are open to everyone, anonymous included.
        Sell | ViewCalories => true,

        // Cost and profitability reveal margins: admin only.
        ViewCost | ViewProfitability => matches!(role, Some(Role::Admin)),

        // Every mutation of ingredients, products or recipes is staff-only.
        CreateIngredient | UpdateIngredient | DeleteIngredient | Restock | Renew
        | CreateProduct | UpdateProduct | DeleteProduct | DefineRecipe => {
            matches!(role, Some(Role::Admin | Role::Employee))
        }
    }
}

/// Checks the gate for `principal` and converts a refusal into
/// [`CoreError::PermissionDenied`].
pub fn ensure(principal: Option<&Principal>, operation: Operation) -> Result<(), CoreError> {
    let role = principal.map(|p| p.role);
    if permits(role, operation) {
        Ok(())
    } else {
        Err(CoreError::PermissionDenied { operation, role })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const MUTATIONS: &[Operation] = &[
        Operation::CreateIngredient,
        Operation::UpdateIngredient,
        Operation::DeleteIngredient,
        Operation::Restock,
        Operation::Renew,
        Operation::CreateProduct,
        Operation::UpdateProduct,
        Operation::DeleteProduct,
        Operation::DefineRecipe,
    ];

    #[test]
    fn test_mutations_require_staff() {
        for op in MUTATIONS {
            assert!(permits(Some(Role::Admin), *op));
            assert!(permits(Some(Role::Employee), *op));
            assert!(!permits(Some(Role::Customer), *op));
            assert!(!permits(None, *op));
        }
    }

    #[test]
    fn test_selling_is_never_gated() {
        assert!(permits(Some(Role::Admin), Operation::Sell));
        assert!(permits(Some(Role::Employee), Operation::Sell));
        assert!(permits(Some(Role::Customer), Operation::Sell));
        assert!(permits(None, Operation::Sell));
    }

    #[test]
    fn test_calories_open_cost_admin_only() {
        assert!(permits(None, Operation::ViewCalories));
        assert!(permits(Some(Role::Customer), Operation::ViewCalories));

        assert!(permits(Some(Role::Admin), Operation::ViewCost));
        assert!(!permits(Some(Role::Employee), Operation::ViewCost));
        assert!(!permits(Some(Role::Customer), Operation::ViewProfitability));
        assert!(!permits(None, Operation::ViewProfitability));
    }

    #[test]
    fn test_ensure_reports_role_and_operation() {
        let customer = Principal::new("u-1", "c@example.com", Role::Customer);
        let err = ensure(Some(&customer), Operation::Restock).unwrap_err();
        match err {
            CoreError::PermissionDenied { operation, role } => {
                assert_eq!(operation, Operation::Restock);
                assert_eq!(role, Some(Role::Customer));
            }
            other => panic!("unexpected error: {other}"),
        }

        assert!(ensure(None, Operation::ViewCalories).is_ok());
    }
}
