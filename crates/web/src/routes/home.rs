//! Landing page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::IntoResponse;
use tower_sessions::Session;
use tracing::instrument;

use crate::filters;
use crate::flash::{self, FlashMessage};

/// Landing page template.
#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub flashes: Vec<FlashMessage>,
}

/// Display the landing page.
#[instrument(skip(session))]
pub async fn index(session: Session) -> impl IntoResponse {
    IndexTemplate {
        flashes: flash::take(&session).await,
    }
}
