//! Item and shopper name types.
//!
//! Names are the keys of every table: inventory rows are keyed by item name,
//! cart lines by (shopper, item), and log entries reference both by name.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing an [`ItemName`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ItemNameError {
    /// The input is empty after trimming.
    #[error("item name cannot be empty")]
    Empty,
    /// The input is too long.
    #[error("item name must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input contains a control character.
    #[error("item name cannot contain control characters")]
    ControlCharacter,
}

/// Errors that can occur when parsing a [`ShopperName`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ShopperNameError {
    /// The input is empty after trimming.
    #[error("shopper name cannot be empty")]
    Empty,
    /// The input is too long.
    #[error("shopper name must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input contains a control character or a `/`.
    #[error("shopper name cannot contain '{0}'")]
    InvalidCharacter(char),
}

/// The name of a grocery item.
///
/// Surrounding whitespace is trimmed; case is preserved and comparisons are
/// exact, so `"Apple"` and `"apple"` are different items.
///
/// ## Constraints
///
/// - Length: 1-100 characters after trimming
/// - No control characters
///
/// ## Examples
///
/// ```
/// use pantry_core::ItemName;
///
/// assert_eq!(ItemName::parse("  Apple ").unwrap().as_str(), "Apple");
/// assert!(ItemName::parse("   ").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(try_from = "String", into = "String")]
pub struct ItemName(String);

impl ItemName {
    /// Maximum length of an item name, in characters.
    pub const MAX_LENGTH: usize = 100;

    /// Parse an `ItemName`, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns an error if the trimmed input is empty, longer than
    /// [`Self::MAX_LENGTH`] characters, or contains a control character.
    pub fn parse(s: &str) -> Result<Self, ItemNameError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ItemNameError::Empty);
        }
        if trimmed.chars().count() > Self::MAX_LENGTH {
            return Err(ItemNameError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }
        if trimmed.chars().any(char::is_control) {
            return Err(ItemNameError::ControlCharacter);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `ItemName` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

/// The name a shopper enters on the shop page.
///
/// Shopper names appear as a URL path segment (`/shopping/{shopper}`), so in
/// addition to the item name rules they may not contain `/`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(try_from = "String", into = "String")]
pub struct ShopperName(String);

impl ShopperName {
    /// Maximum length of a shopper name, in characters.
    pub const MAX_LENGTH: usize = 64;

    /// Parse a `ShopperName`, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns an error if the trimmed input is empty, too long, or contains
    /// a control character or `/`.
    pub fn parse(s: &str) -> Result<Self, ShopperNameError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ShopperNameError::Empty);
        }
        if trimmed.chars().count() > Self::MAX_LENGTH {
            return Err(ShopperNameError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }
        if let Some(c) = trimmed.chars().find(|c| c.is_control() || *c == '/') {
            return Err(ShopperNameError::InvalidCharacter(c));
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `ShopperName` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

macro_rules! impl_name_traits {
    ($name:ident, $err:ident) => {
        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = $err;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl TryFrom<String> for $name {
            type Error = $err;

            fn try_from(s: String) -> Result<Self, Self::Error> {
                Self::parse(&s)
            }
        }

        impl From<$name> for String {
            fn from(name: $name) -> Self {
                name.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        super::impl_text_sqlx!($name);
    };
}

impl_name_traits!(ItemName, ItemNameError);
impl_name_traits!(ShopperName, ShopperNameError);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_item_name_trims_whitespace() {
        let name = ItemName::parse("  Green Apple\t").unwrap();
        assert_eq!(name.as_str(), "Green Apple");
    }

    #[test]
    fn test_item_name_preserves_case() {
        let upper = ItemName::parse("Apple").unwrap();
        let lower = ItemName::parse("apple").unwrap();
        assert_ne!(upper, lower);
    }

    #[test]
    fn test_item_name_empty() {
        assert_eq!(ItemName::parse(""), Err(ItemNameError::Empty));
        assert_eq!(ItemName::parse("   "), Err(ItemNameError::Empty));
    }

    #[test]
    fn test_item_name_too_long() {
        let long = "a".repeat(ItemName::MAX_LENGTH + 1);
        assert!(matches!(
            ItemName::parse(&long),
            Err(ItemNameError::TooLong { max: 100 })
        ));
        assert!(ItemName::parse(&"a".repeat(ItemName::MAX_LENGTH)).is_ok());
    }

    #[test]
    fn test_item_name_counts_characters_not_bytes() {
        // 100 two-byte characters is within the limit
        let accented = "é".repeat(ItemName::MAX_LENGTH);
        assert!(ItemName::parse(&accented).is_ok());
    }

    #[test]
    fn test_item_name_control_character() {
        assert_eq!(
            ItemName::parse("Bad\u{0007}Bell"),
            Err(ItemNameError::ControlCharacter)
        );
    }

    #[test]
    fn test_shopper_name_rejects_slash() {
        assert_eq!(
            ShopperName::parse("alice/bob"),
            Err(ShopperNameError::InvalidCharacter('/'))
        );
    }

    #[test]
    fn test_shopper_name_allows_spaces() {
        let name = ShopperName::parse(" Mary Jane ").unwrap();
        assert_eq!(name.to_string(), "Mary Jane");
    }

    #[test]
    fn test_shopper_name_empty() {
        assert_eq!(ShopperName::parse(" "), Err(ShopperNameError::Empty));
    }

    #[test]
    fn test_serde_validates_on_deserialize() {
        let name: ItemName = serde_json::from_str("\" Milk \"").unwrap();
        assert_eq!(name.as_str(), "Milk");
        assert_eq!(serde_json::to_string(&name).unwrap(), "\"Milk\"");

        let bad: Result<ItemName, _> = serde_json::from_str("\"\"");
        assert!(bad.is_err());
    }

    #[test]
    fn test_from_str() {
        let name: ShopperName = "Alice".parse().unwrap();
        assert_eq!(name.as_ref(), "Alice");
    }
}
