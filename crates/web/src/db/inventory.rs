//! Inventory repository: listing stock and ingesting new items.

use sqlx::{Connection, PgConnection, PgPool};

use pantry_core::{IngestOutcome, IngestReport, ItemName, LogAction, normalize_items};

use super::{RepositoryError, log};
use crate::models::InventoryItem;

/// Skip reason shown when the database rejects an item.
const DATABASE_SKIP_REASON: &str = "the database rejected this item";

/// Internal row type for inventory queries.
#[derive(Debug, sqlx::FromRow)]
struct InventoryRow {
    item: ItemName,
    quantity: i32,
}

impl From<InventoryRow> for InventoryItem {
    fn from(row: InventoryRow) -> Self {
        Self {
            item: row.item,
            quantity: row.quantity,
        }
    }
}

/// Add one unit of `item` to the inventory, creating the row if needed.
///
/// Returns the new quantity.
pub(crate) async fn increment_stock(
    conn: &mut PgConnection,
    item: &ItemName,
) -> Result<i32, sqlx::Error> {
    sqlx::query_scalar(
        r"
        INSERT INTO pantry.grocery_inventory (item, quantity)
        VALUES ($1, 1)
        ON CONFLICT (item)
        DO UPDATE SET quantity = pantry.grocery_inventory.quantity + 1
        RETURNING quantity
        ",
    )
    .bind(item)
    .fetch_one(conn)
    .await
}

/// Lock the inventory row of `item` until the transaction ends.
///
/// Returns the current quantity, or `None` if the item has never been stocked.
pub(crate) async fn lock_stock(
    conn: &mut PgConnection,
    item: &ItemName,
) -> Result<Option<i32>, sqlx::Error> {
    sqlx::query_scalar(
        r"
        SELECT quantity
        FROM pantry.grocery_inventory
        WHERE item = $1
        FOR UPDATE
        ",
    )
    .bind(item)
    .fetch_optional(conn)
    .await
}

/// Repository for inventory database operations.
pub struct InventoryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> InventoryRepository<'a> {
    /// Create a new inventory repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List every inventory item, including those with zero stock.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<InventoryItem>, RepositoryError> {
        let rows = sqlx::query_as::<_, InventoryRow>(
            r"
            SELECT item, quantity
            FROM pantry.grocery_inventory
            ORDER BY item
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(InventoryItem::from).collect())
    }

    /// Get a single inventory item.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, item: &ItemName) -> Result<Option<InventoryItem>, RepositoryError> {
        let row = sqlx::query_as::<_, InventoryRow>(
            r"
            SELECT item, quantity
            FROM pantry.grocery_inventory
            WHERE item = $1
            ",
        )
        .bind(item)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(InventoryItem::from))
    }

    /// Add one unit per entry to the inventory, logging each addition.
    ///
    /// Entries are normalized with [`normalize_items`] (at most five, blanks
    /// dropped). Each item runs in its own savepoint: if its upsert or log
    /// insert fails, only that item is rolled back and reported as skipped.
    /// The batch commits once at the end.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the transaction itself cannot
    /// be started or committed. Per-item failures are not errors.
    pub async fn ingest<I, S>(&self, inputs: I) -> Result<IngestReport, RepositoryError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut report = IngestReport::new();
        let mut tx = self.pool.begin().await?;

        for entry in normalize_items(inputs) {
            let item = match entry {
                Ok(item) => item,
                Err(invalid) => {
                    tracing::info!(input = %invalid.input, error = %invalid.error, "Skipping invalid item");
                    report.push(IngestOutcome::invalid(&invalid));
                    continue;
                }
            };

            let mut savepoint = Connection::begin(&mut *tx).await?;
            match add_one(&mut savepoint, &item).await {
                Ok(quantity) => {
                    savepoint.commit().await?;
                    tracing::info!(item = %item, quantity, "Item added to inventory");
                    report.push(IngestOutcome::Added { item });
                }
                Err(e) => {
                    savepoint.rollback().await?;
                    tracing::warn!(item = %item, error = %e, "Failed to add item");
                    report.push(IngestOutcome::Skipped {
                        input: item.into_inner(),
                        reason: DATABASE_SKIP_REASON.to_string(),
                    });
                }
            }
        }

        tx.commit().await?;
        Ok(report)
    }
}

/// Upsert one unit of `item` and log the addition.
async fn add_one(conn: &mut PgConnection, item: &ItemName) -> Result<i32, sqlx::Error> {
    let quantity = increment_stock(conn, item).await?;
    log::append(conn, LogAction::Added, item, None).await?;
    Ok(quantity)
}
