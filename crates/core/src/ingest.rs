//! Inventory ingestion: normalizing a manager's item list and reporting what
//! happened to each entry.
//!
//! Ingestion is item-by-item. Each non-empty entry produces exactly one
//! [`IngestOutcome`], in input order, so a failure on one entry never hides
//! the result of another.

use serde::Serialize;

use crate::types::{ItemName, ItemNameError};

/// Maximum number of entries accepted in one ingestion batch.
pub const MAX_INGEST_ITEMS: usize = 5;

/// An entry that could not be turned into an [`ItemName`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidItem {
    /// The entry as submitted, trimmed.
    pub input: String,
    /// Why it was rejected.
    pub error: ItemNameError,
}

/// Normalize up to [`MAX_INGEST_ITEMS`] raw entries.
///
/// Entries past the limit are ignored. Each entry is trimmed and blank
/// entries are dropped; the rest are validated. Duplicates are kept, since
/// each occurrence adds one unit.
///
/// ```
/// use pantry_core::normalize_items;
///
/// let items = normalize_items(["Apple", " ", " Milk "]);
/// assert_eq!(items.len(), 2);
/// assert_eq!(items[1].as_ref().unwrap().as_str(), "Milk");
/// ```
pub fn normalize_items<I, S>(inputs: I) -> Vec<Result<ItemName, InvalidItem>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    inputs
        .into_iter()
        .take(MAX_INGEST_ITEMS)
        .filter_map(|raw| {
            let trimmed = raw.as_ref().trim();
            if trimmed.is_empty() {
                return None;
            }
            Some(ItemName::parse(trimmed).map_err(|error| InvalidItem {
                input: trimmed.to_owned(),
                error,
            }))
        })
        .collect()
}

/// What happened to one ingestion entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum IngestOutcome {
    /// One unit was added to the inventory and logged.
    Added {
        /// The item that was added.
        item: ItemName,
    },
    /// The entry was skipped; nothing was written for it.
    Skipped {
        /// The entry as submitted.
        input: String,
        /// Human-readable reason.
        reason: String,
    },
}

impl IngestOutcome {
    /// Build a skip outcome for an invalid entry.
    #[must_use]
    pub fn invalid(item: &InvalidItem) -> Self {
        Self::Skipped {
            input: item.input.clone(),
            reason: item.error.to_string(),
        }
    }
}

/// Per-entry results of an ingestion batch, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    outcomes: Vec<IngestOutcome>,
}

impl IngestReport {
    /// Create an empty report.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            outcomes: Vec::new(),
        }
    }

    /// Record the outcome of the next entry.
    pub fn push(&mut self, outcome: IngestOutcome) {
        self.outcomes.push(outcome);
    }

    /// All outcomes, in input order.
    #[must_use]
    pub fn outcomes(&self) -> &[IngestOutcome] {
        &self.outcomes
    }

    /// Items that were added, in input order (duplicates included).
    pub fn added(&self) -> impl Iterator<Item = &ItemName> {
        self.outcomes.iter().filter_map(|o| match o {
            IngestOutcome::Added { item } => Some(item),
            IngestOutcome::Skipped { .. } => None,
        })
    }

    /// Skipped entries as `(input, reason)` pairs.
    pub fn skipped(&self) -> impl Iterator<Item = (&str, &str)> {
        self.outcomes.iter().filter_map(|o| match o {
            IngestOutcome::Skipped { input, reason } => Some((input.as_str(), reason.as_str())),
            IngestOutcome::Added { .. } => None,
        })
    }

    /// Whether no entries were submitted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// One-line summary of the added items, e.g. `Inserted: Apple, Milk`.
    #[must_use]
    pub fn inserted_summary(&self) -> String {
        let names: Vec<&str> = self.added().map(ItemName::as_str).collect();
        format!("Inserted: {}", names.join(", "))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn item(s: &str) -> ItemName {
        ItemName::parse(s).unwrap()
    }

    #[test]
    fn test_normalize_drops_blank_entries() {
        let items = normalize_items(["", "Apple", "   ", "Bread", ""]);
        let names: Vec<_> = items.into_iter().map(|r| r.unwrap()).collect();
        assert_eq!(names, vec![item("Apple"), item("Bread")]);
    }

    #[test]
    fn test_normalize_limits_to_five_entries() {
        let items = normalize_items(["a", "b", "c", "d", "e", "f", "g"]);
        assert_eq!(items.len(), MAX_INGEST_ITEMS);
        assert_eq!(items[4].as_ref().unwrap().as_str(), "e");
    }

    #[test]
    fn test_normalize_counts_blank_entries_toward_limit() {
        // Five form fields, the sixth value never arrives from the form
        let items = normalize_items(["", "", "", "", "", "Late"]);
        assert!(items.is_empty());
    }

    #[test]
    fn test_normalize_keeps_duplicates() {
        let items = normalize_items(["Apple", "Apple"]);
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn test_normalize_reports_invalid_entries_in_place() {
        let long = "x".repeat(ItemName::MAX_LENGTH + 1);
        let items = normalize_items(["Apple", long.as_str(), "Milk"]);
        assert!(items[0].is_ok());
        let invalid = items[1].as_ref().unwrap_err();
        assert_eq!(invalid.input, long);
        assert!(matches!(invalid.error, ItemNameError::TooLong { .. }));
        assert!(items[2].is_ok());
    }

    #[test]
    fn test_report_summary_and_skips() {
        let mut report = IngestReport::new();
        report.push(IngestOutcome::Added { item: item("Apple") });
        report.push(IngestOutcome::Skipped {
            input: "Bad".to_string(),
            reason: "constraint violation".to_string(),
        });
        report.push(IngestOutcome::Added { item: item("Milk") });

        assert_eq!(report.inserted_summary(), "Inserted: Apple, Milk");
        let skipped: Vec<_> = report.skipped().collect();
        assert_eq!(skipped, vec![("Bad", "constraint violation")]);
        assert_eq!(report.outcomes().len(), 3);
    }

    #[test]
    fn test_empty_report() {
        let report = IngestReport::default();
        assert!(report.is_empty());
        assert_eq!(report.inserted_summary(), "Inserted: ");
    }

    #[test]
    fn test_invalid_outcome_uses_error_message() {
        let invalid = InvalidItem {
            input: "x".to_string(),
            error: ItemNameError::ControlCharacter,
        };
        assert_eq!(
            IngestOutcome::invalid(&invalid),
            IngestOutcome::Skipped {
                input: "x".to_string(),
                reason: "item name cannot contain control characters".to_string(),
            }
        );
    }
}
