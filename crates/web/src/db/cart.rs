//! Shopper cart repository (read side).
//!
//! Cart lines are only written by the transfer protocol in
//! [`super::transfer`].

use sqlx::PgPool;

use pantry_core::{ItemName, ShopperName};

use super::RepositoryError;
use crate::models::CartLine;

/// Internal row type for cart queries.
#[derive(Debug, sqlx::FromRow)]
struct CartLineRow {
    shopper_name: ShopperName,
    item: ItemName,
    quantity: i32,
}

impl From<CartLineRow> for CartLine {
    fn from(row: CartLineRow) -> Self {
        Self {
            shopper: row.shopper_name,
            item: row.item,
            quantity: row.quantity,
        }
    }
}

/// Repository for reading shopper carts.
pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List the cart lines belonging to one shopper.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_shopper(
        &self,
        shopper: &ShopperName,
    ) -> Result<Vec<CartLine>, RepositoryError> {
        let rows = sqlx::query_as::<_, CartLineRow>(
            r"
            SELECT shopper_name, item, quantity
            FROM pantry.shopper_cart
            WHERE shopper_name = $1
            ORDER BY item
            ",
        )
        .bind(shopper)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(CartLine::from).collect())
    }

    /// Total units of `item` held across every shopper's cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn units_in_carts(&self, item: &ItemName) -> Result<i64, RepositoryError> {
        let total: i64 = sqlx::query_scalar(
            r"
            SELECT COALESCE(SUM(quantity), 0)::BIGINT
            FROM pantry.shopper_cart
            WHERE item = $1
            ",
        )
        .bind(item)
        .fetch_one(self.pool)
        .await?;

        Ok(total)
    }
}
