//! The inventory transfer protocol: moving single units between the store
//! inventory and a shopper's cart.
//!
//! Every transfer is one transaction. The precondition check and the
//! decrement are a single guarded `UPDATE ... WHERE quantity > 0`, which
//! takes the row lock, so two concurrent transfers on the same row cannot
//! both pass the check. A failed precondition rolls back and writes nothing.
//!
//! Both directions lock the inventory row before the cart line, so a buy and
//! a return on the same line queue behind each other instead of deadlocking.

use sqlx::{PgConnection, PgPool};

use pantry_core::{ItemName, LogAction, ShopperName, TransferAction, TransferOutcome};

use super::{RepositoryError, inventory, log};

/// Which zero-quantity cart rows a return deletes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CartCleanup {
    /// Delete only the cart line that just reached zero.
    #[default]
    Line,
    /// Delete every zero-quantity cart line, for any shopper.
    Global,
}

impl std::fmt::Display for CartCleanup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Line => write!(f, "line"),
            Self::Global => write!(f, "global"),
        }
    }
}

impl std::str::FromStr for CartCleanup {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "line" => Ok(Self::Line),
            "global" => Ok(Self::Global),
            _ => Err(format!("expected 'line' or 'global', got '{s}'")),
        }
    }
}

/// Repository for buy and return transfers.
pub struct TransferRepository<'a> {
    pool: &'a PgPool,
    cleanup: CartCleanup,
}

impl<'a> TransferRepository<'a> {
    /// Create a new transfer repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool, cleanup: CartCleanup) -> Self {
        Self { pool, cleanup }
    }

    /// Run the transfer named by `action`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any statement fails; the
    /// transaction is rolled back.
    pub async fn apply(
        &self,
        action: TransferAction,
        shopper: &ShopperName,
        item: &ItemName,
    ) -> Result<TransferOutcome, RepositoryError> {
        match action {
            TransferAction::Buy => self.buy(shopper, item).await,
            TransferAction::Return => self.return_item(shopper, item).await,
        }
    }

    /// Move one unit of `item` from the inventory into `shopper`'s cart.
    ///
    /// Returns [`TransferOutcome::OutOfStock`] without writing anything if
    /// the item is unknown or has no stock.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any statement fails.
    pub async fn buy(
        &self,
        shopper: &ShopperName,
        item: &ItemName,
    ) -> Result<TransferOutcome, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let Some(remaining) = take_from_stock(&mut tx, item).await? else {
            tx.rollback().await?;
            tracing::info!(shopper = %shopper, item = %item, "Buy refused: out of stock");
            return Ok(TransferOutcome::OutOfStock);
        };

        let in_cart = add_to_cart(&mut tx, shopper, item).await?;
        log::append(&mut tx, LogAction::Sold, item, Some(shopper)).await?;
        tx.commit().await?;

        tracing::info!(shopper = %shopper, item = %item, remaining, in_cart, "Item sold");
        Ok(TransferOutcome::Bought)
    }

    /// Move one unit of `item` from `shopper`'s cart back to the inventory.
    ///
    /// Returns [`TransferOutcome::NothingToReturn`] without writing anything
    /// if the shopper has none of the item.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any statement fails.
    pub async fn return_item(
        &self,
        shopper: &ShopperName,
        item: &ItemName,
    ) -> Result<TransferOutcome, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        // Inventory row before cart line, the same order `buy` takes them in
        inventory::lock_stock(&mut tx, item).await?;

        let Some(in_cart) = take_from_cart(&mut tx, shopper, item).await? else {
            tx.rollback().await?;
            tracing::info!(shopper = %shopper, item = %item, "Return refused: not in cart");
            return Ok(TransferOutcome::NothingToReturn);
        };

        if in_cart == 0 {
            let removed = self.remove_empty_lines(&mut tx, shopper, item).await?;
            tracing::debug!(removed, cleanup = %self.cleanup, "Removed empty cart lines");
        }

        let stock = inventory::increment_stock(&mut tx, item).await?;
        log::append(&mut tx, LogAction::Returned, item, Some(shopper)).await?;
        tx.commit().await?;

        tracing::info!(shopper = %shopper, item = %item, in_cart, stock, "Item returned");
        Ok(TransferOutcome::Returned)
    }

    /// Delete zero-quantity cart lines according to the cleanup scope.
    async fn remove_empty_lines(
        &self,
        conn: &mut PgConnection,
        shopper: &ShopperName,
        item: &ItemName,
    ) -> Result<u64, sqlx::Error> {
        let result = match self.cleanup {
            CartCleanup::Line => {
                sqlx::query(
                    r"
                    DELETE FROM pantry.shopper_cart
                    WHERE shopper_name = $1 AND item = $2 AND quantity = 0
                    ",
                )
                .bind(shopper)
                .bind(item)
                .execute(conn)
                .await?
            }
            CartCleanup::Global => {
                sqlx::query("DELETE FROM pantry.shopper_cart WHERE quantity = 0")
                    .execute(conn)
                    .await?
            }
        };

        Ok(result.rows_affected())
    }
}

/// Decrement stock if any is left. Returns the remaining quantity, or `None`
/// if the item is unknown or out of stock.
async fn take_from_stock(
    conn: &mut PgConnection,
    item: &ItemName,
) -> Result<Option<i32>, sqlx::Error> {
    sqlx::query_scalar(
        r"
        UPDATE pantry.grocery_inventory
        SET quantity = quantity - 1
        WHERE item = $1 AND quantity > 0
        RETURNING quantity
        ",
    )
    .bind(item)
    .fetch_optional(conn)
    .await
}

/// Add one unit to a cart line, creating it if needed. Returns the new quantity.
async fn add_to_cart(
    conn: &mut PgConnection,
    shopper: &ShopperName,
    item: &ItemName,
) -> Result<i32, sqlx::Error> {
    sqlx::query_scalar(
        r"
        INSERT INTO pantry.shopper_cart (shopper_name, item, quantity)
        VALUES ($1, $2, 1)
        ON CONFLICT (shopper_name, item)
        DO UPDATE SET quantity = pantry.shopper_cart.quantity + 1
        RETURNING quantity
        ",
    )
    .bind(shopper)
    .bind(item)
    .fetch_one(conn)
    .await
}

/// Decrement a cart line if it holds any units. Returns the remaining
/// quantity, or `None` if the shopper has none of the item.
async fn take_from_cart(
    conn: &mut PgConnection,
    shopper: &ShopperName,
    item: &ItemName,
) -> Result<Option<i32>, sqlx::Error> {
    sqlx::query_scalar(
        r"
        UPDATE pantry.shopper_cart
        SET quantity = quantity - 1
        WHERE shopper_name = $1 AND item = $2 AND quantity > 0
        RETURNING quantity
        ",
    )
    .bind(shopper)
    .bind(item)
    .fetch_optional(conn)
    .await
}
