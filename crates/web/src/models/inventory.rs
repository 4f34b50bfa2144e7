//! Inventory, cart and action log records.

use chrono::{DateTime, Utc};
use serde::Serialize;

use pantry_core::{ItemName, LogAction, ShopperName};

/// One item in the store inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InventoryItem {
    pub item: ItemName,
    pub quantity: i32,
}

/// One line in a shopper's cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartLine {
    pub shopper: ShopperName,
    pub item: ItemName,
    pub quantity: i32,
}

/// An entry in the append-only action log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    pub id: i64,
    pub logged_at: DateTime<Utc>,
    pub action: LogAction,
    pub item: ItemName,
    /// `None` for [`LogAction::Added`].
    pub shopper: Option<ShopperName>,
}
