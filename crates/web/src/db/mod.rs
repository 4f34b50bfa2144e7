//! Database operations for the Pantry `PostgreSQL` database.
//!
//! ## Tables (schema `pantry`)
//!
//! - `grocery_inventory` - Store stock, one row per item name
//! - `shopper_cart` - Per-shopper cart lines, keyed by (shopper, item)
//! - `inventory_log` - Append-only record of every stock movement
//!
//! Browser sessions live in `tower_sessions.session`, created by the session
//! store's own migration.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/web/migrations/` and run via:
//! ```bash
//! cargo run -p pantry-cli -- migrate
//! ```

pub mod cart;
pub mod inventory;
pub mod log;
pub mod transfer;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use crate::config::DatabaseSettings;

pub use cart::CartRepository;
pub use inventory::InventoryRepository;
pub use log::ActionLogRepository;
pub use transfer::{CartCleanup, TransferRepository};

/// Schema migrations for the `pantry` schema.
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),
}

/// Create a `PostgreSQL` connection pool.
///
/// Each request acquires one connection from the pool for its statement
/// sequence and returns it when the handler finishes.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
/// * `settings` - Pool size and acquire timeout
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(
    database_url: &secrecy::SecretString,
    settings: &DatabaseSettings,
) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .min_connections(1)
        .acquire_timeout(settings.connect_timeout)
        .connect(database_url.expose_secret())
        .await
}
