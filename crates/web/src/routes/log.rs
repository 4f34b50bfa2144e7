//! Action log route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::redirect_home_with_notice;
use crate::filters;
use crate::flash::{self, FlashMessage};
use crate::models::LogEntry;
use crate::state::AppState;

/// Log entry display data for templates.
pub struct LogEntryView {
    pub logged_at: String,
    pub action: &'static str,
    pub item: String,
    pub shopper: String,
}

impl From<&LogEntry> for LogEntryView {
    fn from(entry: &LogEntry) -> Self {
        Self {
            logged_at: entry.logged_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            action: entry.action.label(),
            item: entry.item.to_string(),
            shopper: entry
                .shopper
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default(),
        }
    }
}

/// Action log template.
#[derive(Template, WebTemplate)]
#[template(path = "log.html")]
pub struct LogTemplate {
    pub flashes: Vec<FlashMessage>,
    pub entries: Vec<LogEntryView>,
}

/// Display the action log, newest first.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Response {
    match state.action_log().list(None).await {
        Ok(entries) => LogTemplate {
            flashes: flash::take(&session).await,
            entries: entries.iter().map(LogEntryView::from).collect(),
        }
        .into_response(),
        Err(e) => redirect_home_with_notice(&session, &e, "Error fetching log.").await,
    }
}
