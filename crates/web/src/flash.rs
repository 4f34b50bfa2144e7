//! Flash messages: short notices stored in the browser session and shown on
//! the next rendered page.
//!
//! Flashing is best-effort. A session store failure is logged and the
//! request carries on without the notice.

use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::models::session::keys;

/// Severity of a flash message, used for styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlashLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl FlashLevel {
    /// CSS class for the notice box.
    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Info => "flash flash-info",
            Self::Success => "flash flash-success",
            Self::Warning => "flash flash-warning",
            Self::Error => "flash flash-error",
        }
    }
}

/// A single pending notice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashMessage {
    pub level: FlashLevel,
    pub text: String,
}

impl FlashMessage {
    #[must_use]
    pub fn new(level: FlashLevel, text: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
        }
    }
}

/// Queue a notice for the next rendered page.
pub async fn push(session: &Session, level: FlashLevel, text: impl Into<String>) {
    let message = FlashMessage::new(level, text);

    let mut pending = match session.get::<Vec<FlashMessage>>(keys::FLASH).await {
        Ok(pending) => pending.unwrap_or_default(),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read flash messages from session");
            Vec::new()
        }
    };
    pending.push(message);

    if let Err(e) = session.insert(keys::FLASH, pending).await {
        tracing::warn!(error = %e, "Failed to save flash message to session");
    }
}

/// Drain all pending notices.
pub async fn take(session: &Session) -> Vec<FlashMessage> {
    match session.remove::<Vec<FlashMessage>>(keys::FLASH).await {
        Ok(pending) => pending.unwrap_or_default(),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read flash messages from session");
            Vec::new()
        }
    }
}
