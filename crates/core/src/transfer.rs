//! Stock transfer actions between the store inventory and a shopper's cart.

use serde::{Deserialize, Serialize};

/// Error returned when a shopping form names an unknown action.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown shopping action: {0}")]
pub struct UnknownTransferAction(pub String);

/// A single-unit transfer requested from the shopping page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferAction {
    /// Move one unit from the inventory into the shopper's cart.
    Buy,
    /// Move one unit from the shopper's cart back to the inventory.
    Return,
}

impl std::fmt::Display for TransferAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Buy => write!(f, "buy"),
            Self::Return => write!(f, "return"),
        }
    }
}

impl std::str::FromStr for TransferAction {
    type Err = UnknownTransferAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "buy" => Ok(Self::Buy),
            "return" => Ok(Self::Return),
            _ => Err(UnknownTransferAction(s.to_owned())),
        }
    }
}

/// Result of a transfer.
///
/// Failed preconditions are ordinary outcomes, not errors: nothing was
/// written and the shopper is told why.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferOutcome {
    /// One unit moved into the cart.
    Bought,
    /// The item is unknown or its inventory quantity is zero.
    OutOfStock,
    /// One unit moved back to the inventory.
    Returned,
    /// The shopper has none of the item in their cart.
    NothingToReturn,
}

impl TransferOutcome {
    /// Whether the transfer changed any state.
    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Bought | Self::Returned)
    }

    /// The notice shown to the shopper.
    #[must_use]
    pub fn message(self, item: &str) -> String {
        match self {
            Self::Bought => format!("{item} added to your cart."),
            Self::OutOfStock => format!("{item} is out of stock."),
            Self::Returned => format!("{item} returned to store."),
            Self::NothingToReturn => "You don't have that item to return.".to_string(),
        }
    }
}
