//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::PantryConfig;
use crate::db::{
    ActionLogRepository, CartRepository, InventoryRepository, TransferRepository,
};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the database pool, configuration and the repositories built on them.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: PantryConfig,
    pool: PgPool,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: PantryConfig, pool: PgPool) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, pool }),
        }
    }

    /// Get a reference to the configuration.
    #[must_use]
    pub fn config(&self) -> &PantryConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    #[must_use]
    pub fn inventory(&self) -> InventoryRepository<'_> {
        InventoryRepository::new(self.pool())
    }

    #[must_use]
    pub fn carts(&self) -> CartRepository<'_> {
        CartRepository::new(self.pool())
    }

    #[must_use]
    pub fn transfers(&self) -> TransferRepository<'_> {
        TransferRepository::new(self.pool(), self.config().cart_cleanup)
    }

    #[must_use]
    pub fn action_log(&self) -> ActionLogRepository<'_> {
        ActionLogRepository::new(self.pool())
    }
}
