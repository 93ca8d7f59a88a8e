//! # batido-core: Pure Business Logic for Batido POS
//!
//! This crate is the heart of the sale transaction engine. It contains all
//! business logic as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                UI / CLI boundary (out of scope)                 │
//! │   renders forms, obtains anonymous-sale confirmation, shows     │
//! │   errors; passes a resolved principal into every call           │
//! └───────────────────────────────┬─────────────────────────────────┘
//!                                 │
//! ┌───────────────────────────────▼─────────────────────────────────┐
//! │               ★ batido-core (THIS CRATE) ★                      │
//! │                                                                 │
//! │   ┌───────────┐ ┌───────────┐ ┌───────────┐ ┌───────────┐      │
//! │   │   types   │ │   money   │ │  policy   │ │ validation│      │
//! │   │ Ingredient│ │   Money   │ │  permits  │ │   rules   │      │
//! │   │ Sale, ... │ │  (cents)  │ │ role gate │ │   checks  │      │
//! │   └───────────┘ └───────────┘ └───────────┘ └───────────┘      │
//! │                                                                 │
//! │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS            │
//! └───────────────────────────────┬─────────────────────────────────┘
//!                                 │
//! ┌───────────────────────────────▼─────────────────────────────────┐
//! │                   batido-db (Database Layer)                    │
//! │    SQLite repositories, inventory ledger, sale coordinator      │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Ingredient, Product, Sale, Principal, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`policy`] - The access policy gate: `permits(role, operation)`
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: every function is deterministic
//! 2. **No I/O**: database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: all monetary values are in cents (i64)
//! 4. **Explicit Principal**: role checks take the caller as an argument,
//!    never read from ambient/session state

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod policy;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use policy::{permits, Operation};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Amount added by a restock when the caller does not supply one.
///
/// ## Business Reason
/// The storefront exposes a one-click "restock +10" action; the engine keeps
/// the default here so every boundary agrees on it.
pub const DEFAULT_RESTOCK_AMOUNT: i64 = 10;

/// Maximum quantity of a product in a single sale.
///
/// ## Business Reason
/// Prevents accidental over-selling (e.g., typing 1000 instead of 10).
pub const MAX_SALE_QUANTITY: i64 = 999;

/// Bounded attempts for appending the sale record after stock was reserved.
///
/// Recording failures are assumed transient storage faults; business-rule
/// errors are never retried.
pub const RECORDING_ATTEMPTS: u32 = 3;
