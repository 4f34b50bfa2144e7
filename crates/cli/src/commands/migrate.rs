//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! pantry-cli migrate
//! ```
//!
//! Applies the `pantry` schema migrations from `crates/web/migrations/`,
//! then creates the `tower_sessions` table used for browser sessions.

use tower_sessions_sqlx_store::PostgresStore;

use super::{CommandError, connect};

/// Run all database migrations.
pub async fn run() -> Result<(), CommandError> {
    let pool = connect().await?;

    tracing::info!("Running pantry migrations...");
    pantry_web::db::MIGRATOR.run(&pool).await?;

    tracing::info!("Creating session store table...");
    PostgresStore::new(pool.clone()).migrate().await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
