//! Domain models for the web crate.
//!
//! Rows read from the `pantry` schema, converted from internal sqlx row types
//! in the `db` module.

pub mod inventory;
pub mod session;

pub use inventory::{CartLine, InventoryItem, LogEntry};
