//! Action log entry kinds.

use serde::{Deserialize, Serialize};

/// Error returned when parsing an unknown [`LogAction`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid log action: {0}")]
pub struct LogActionError(String);

/// The kind of inventory-affecting action recorded in the action log.
///
/// Stored as the `pantry.log_action` enum in `PostgreSQL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "pantry.log_action", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum LogAction {
    /// A manager added one unit of an item to the inventory.
    Added,
    /// A shopper moved one unit from the inventory into their cart.
    Sold,
    /// A shopper moved one unit from their cart back to the inventory.
    Returned,
}

impl LogAction {
    /// Human-readable label shown in the log table.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Added => "Added to Inventory",
            Self::Sold => "Sold",
            Self::Returned => "Returned",
        }
    }

    /// Whether entries of this kind carry a shopper name.
    #[must_use]
    pub const fn has_shopper(self) -> bool {
        !matches!(self, Self::Added)
    }
}

impl std::fmt::Display for LogAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Added => write!(f, "added"),
            Self::Sold => write!(f, "sold"),
            Self::Returned => write!(f, "returned"),
        }
    }
}

impl std::str::FromStr for LogAction {
    type Err = LogActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "added" => Ok(Self::Added),
            "sold" => Ok(Self::Sold),
            "returned" => Ok(Self::Returned),
            _ => Err(LogActionError(s.to_owned())),
        }
    }
}
