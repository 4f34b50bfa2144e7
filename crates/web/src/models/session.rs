//! Browser session keys.

/// Session keys used by the web crate.
pub mod keys {
    /// Key for pending flash messages.
    pub const FLASH: &str = "flash";
}
