//! # Repository Module
//!
//! Repository implementations for database entities.
//!
//! ## Repository Pattern
//! Each repository wraps the shared `SqlitePool` and exposes typed
//! operations for one entity:
//!
//! - [`ingredient`] - The ingredient store (gated CRUD; stock is mutated
//!   only by the ledger)
//! - [`product`] - Catalog products (gated CRUD)
//! - [`recipe`] - The product→ingredient edge index
//! - [`sale`] - The append-only sale ledger
//!
//! Mutating operations take the acting principal explicitly and consult the
//! access policy gate before touching the database; there is no ambient
//! session state anywhere in the engine.

pub mod ingredient;
pub mod product;
pub mod recipe;
pub mod sale;

/// Helper to generate a new entity id.
pub fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
