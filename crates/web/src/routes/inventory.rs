//! Inventory route handlers for the store manager.

use std::collections::HashMap;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Response},
};
use tower_sessions::Session;
use tracing::instrument;

use pantry_core::{IngestReport, MAX_INGEST_ITEMS};

use crate::error::redirect_home_with_notice;
use crate::filters;
use crate::flash::{self, FlashLevel, FlashMessage};
use crate::models::InventoryItem;
use crate::state::AppState;

/// Notice shown when the inventory cannot be loaded.
pub const FETCH_INVENTORY_NOTICE: &str = "Error fetching grocery items.";

/// Add-items form template.
#[derive(Template, WebTemplate)]
#[template(path = "query.html")]
pub struct AddItemsTemplate {
    pub flashes: Vec<FlashMessage>,
    /// Field numbers, rendered as inputs `item1`..`itemN`.
    pub slots: Vec<usize>,
}

/// Inventory table template.
#[derive(Template, WebTemplate)]
#[template(path = "inventory.html")]
pub struct InventoryTemplate {
    pub flashes: Vec<FlashMessage>,
    pub items: Vec<InventoryItem>,
}

/// Extract the `item1`..`item5` fields, in order.
///
/// Missing fields count as blank entries.
#[must_use]
pub fn item_fields(form: &HashMap<String, String>) -> Vec<String> {
    (1..=MAX_INGEST_ITEMS)
        .map(|n| form.get(&format!("item{n}")).cloned().unwrap_or_default())
        .collect()
}

/// Queue the flash notices describing an ingestion batch.
async fn flash_report(session: &Session, report: &IngestReport) {
    for (input, reason) in report.skipped() {
        flash::push(
            session,
            FlashLevel::Warning,
            format!("Item '{input}' could not be added ({reason})."),
        )
        .await;
    }

    if report.added().next().is_some() {
        flash::push(session, FlashLevel::Success, report.inserted_summary()).await;
    } else if report.is_empty() {
        flash::push(session, FlashLevel::Info, "No items were entered.").await;
    }
}

/// Display the add-items form.
#[instrument(skip(session))]
pub async fn add_form(session: Session) -> impl IntoResponse {
    AddItemsTemplate {
        flashes: flash::take(&session).await,
        slots: (1..=MAX_INGEST_ITEMS).collect(),
    }
}

/// Add the submitted items to the inventory and show the result.
#[instrument(skip(state, session, form))]
pub async fn add_items(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    let report = match state.inventory().ingest(item_fields(&form)).await {
        Ok(report) => report,
        Err(e) => return redirect_home_with_notice(&session, &e, "Could not add items.").await,
    };
    flash_report(&session, &report).await;

    render_inventory(&state, &session).await
}

/// Display the full inventory.
#[instrument(skip(state, session))]
pub async fn list(State(state): State<AppState>, session: Session) -> Response {
    render_inventory(&state, &session).await
}

async fn render_inventory(state: &AppState, session: &Session) -> Response {
    match state.inventory().list().await {
        Ok(items) => InventoryTemplate {
            flashes: flash::take(session).await,
            items,
        }
        .into_response(),
        Err(e) => redirect_home_with_notice(session, &e, FETCH_INVENTORY_NOTICE).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_fields_in_order_with_blanks() {
        let form: HashMap<String, String> = [
            ("item3", "Milk"),
            ("item1", "Apple"),
            ("item9", "Ignored"),
            ("other", "x"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        assert_eq!(item_fields(&form), vec!["Apple", "", "Milk", "", ""]);
    }
}
