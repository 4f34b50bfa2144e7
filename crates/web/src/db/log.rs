//! Action log repository.
//!
//! Entries are only ever inserted, always inside the transaction of the
//! mutation they describe, so a rolled-back mutation leaves no entry.

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};

use pantry_core::{ItemName, LogAction, ShopperName};

use super::RepositoryError;
use crate::models::LogEntry;

/// Internal row type for log queries.
#[derive(Debug, sqlx::FromRow)]
struct LogEntryRow {
    id: i64,
    logged_at: DateTime<Utc>,
    action: LogAction,
    item: ItemName,
    shopper: Option<ShopperName>,
}

impl TryFrom<LogEntryRow> for LogEntry {
    type Error = RepositoryError;

    fn try_from(row: LogEntryRow) -> Result<Self, Self::Error> {
        if row.action.has_shopper() != row.shopper.is_some() {
            return Err(RepositoryError::DataCorruption(format!(
                "log entry {} has action {} but shopper {:?}",
                row.id, row.action, row.shopper
            )));
        }
        Ok(Self {
            id: row.id,
            logged_at: row.logged_at,
            action: row.action,
            item: row.item,
            shopper: row.shopper,
        })
    }
}

/// Append one entry to the action log.
///
/// Takes a connection rather than the pool so callers can run it inside the
/// transaction of the mutation being logged.
pub(crate) async fn append(
    conn: &mut PgConnection,
    action: LogAction,
    item: &ItemName,
    shopper: Option<&ShopperName>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r"
        INSERT INTO pantry.inventory_log (action, item, shopper)
        VALUES ($1, $2, $3)
        ",
    )
    .bind(action)
    .bind(item)
    .bind(shopper)
    .execute(conn)
    .await?;

    Ok(())
}

/// Repository for reading the action log.
pub struct ActionLogRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ActionLogRepository<'a> {
    /// Create a new action log repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List log entries, newest first.
    ///
    /// Entries written in the same instant are ordered by insertion, newest
    /// first. `limit` of `None` returns the whole log.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a row breaks the shopper rule.
    pub async fn list(&self, limit: Option<i64>) -> Result<Vec<LogEntry>, RepositoryError> {
        let rows = sqlx::query_as::<_, LogEntryRow>(
            r"
            SELECT id, logged_at, action, item, shopper
            FROM pantry.inventory_log
            ORDER BY logged_at DESC, id DESC
            LIMIT $1
            ",
        )
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(LogEntry::try_from).collect()
    }
}
