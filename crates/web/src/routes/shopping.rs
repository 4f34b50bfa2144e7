//! Shopper route handlers: choosing a shopper, viewing stock and cart, and
//! buying or returning items.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use pantry_core::{ItemName, ShopperName, TransferAction, TransferOutcome};

use crate::error::{AppError, Result, redirect_home_with_notice};
use crate::filters;
use crate::flash::{self, FlashLevel, FlashMessage};
use crate::models::{CartLine, InventoryItem};
use crate::routes::inventory::FETCH_INVENTORY_NOTICE;
use crate::state::AppState;

/// Shopper name form data.
#[derive(Debug, Deserialize)]
pub struct ShopForm {
    #[serde(default)]
    pub shopper: String,
}

/// Buy/return form data.
#[derive(Debug, Deserialize)]
pub struct TransferForm {
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub item: String,
}

/// Shopper name form template.
#[derive(Template, WebTemplate)]
#[template(path = "shop.html")]
pub struct ShopTemplate {
    pub flashes: Vec<FlashMessage>,
}

/// Shopping page template.
#[derive(Template, WebTemplate)]
#[template(path = "shopping.html")]
pub struct ShoppingTemplate {
    pub flashes: Vec<FlashMessage>,
    pub shopper: ShopperName,
    pub inventory: Vec<InventoryItem>,
    pub cart: Vec<CartLine>,
}

/// Path of a shopper's page, with the name percent-encoded.
#[must_use]
pub fn shopping_path(shopper: &ShopperName) -> String {
    format!("/shopping/{}", urlencoding::encode(shopper.as_str()))
}

fn parse_shopper(raw: &str) -> Result<ShopperName> {
    ShopperName::parse(raw).map_err(|e| AppError::BadRequest(e.to_string()))
}

/// Display the shopper name form.
#[instrument(skip(session))]
pub async fn shop_form(session: Session) -> impl IntoResponse {
    ShopTemplate {
        flashes: flash::take(&session).await,
    }
}

/// Send the shopper to their page.
#[instrument(skip(session))]
pub async fn choose_shopper(session: Session, Form(form): Form<ShopForm>) -> Redirect {
    match ShopperName::parse(&form.shopper) {
        Ok(shopper) => Redirect::to(&shopping_path(&shopper)),
        Err(e) => {
            tracing::debug!(error = %e, "Rejected shopper name");
            flash::push(&session, FlashLevel::Warning, "Please enter a valid name.").await;
            Redirect::to("/shop")
        }
    }
}

/// Display the inventory and the shopper's cart.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    Path(shopper): Path<String>,
) -> Result<Response> {
    let shopper = parse_shopper(&shopper)?;

    let inventory = match state.inventory().list().await {
        Ok(items) => items,
        Err(e) => return Ok(redirect_home_with_notice(&session, &e, FETCH_INVENTORY_NOTICE).await),
    };
    let cart = match state.carts().list_for_shopper(&shopper).await {
        Ok(lines) => lines,
        Err(e) => return Ok(redirect_home_with_notice(&session, &e, FETCH_INVENTORY_NOTICE).await),
    };

    Ok(ShoppingTemplate {
        flashes: flash::take(&session).await,
        shopper,
        inventory,
        cart,
    }
    .into_response())
}

/// Buy or return one unit, then redirect back to the shopper's page.
///
/// Answers `303 See Other` to `/shopping/{shopper}` rather than rendering the
/// page directly, so a browser refresh does not repeat the transfer. The
/// outcome travels to the re-rendered page as a flash notice.
#[instrument(skip(state, session))]
pub async fn transfer(
    State(state): State<AppState>,
    session: Session,
    Path(shopper): Path<String>,
    Form(form): Form<TransferForm>,
) -> Result<Redirect> {
    let shopper = parse_shopper(&shopper)?;
    let back = Redirect::to(&shopping_path(&shopper));

    let Ok(action) = form.action.parse::<TransferAction>() else {
        flash::push(&session, FlashLevel::Warning, "Unknown action.").await;
        return Ok(back);
    };

    let outcome = match ItemName::parse(&form.item) {
        Ok(item) => match state.transfers().apply(action, &shopper, &item).await {
            Ok(outcome) => outcome,
            Err(e) => {
                let event_id = sentry::capture_error(&e);
                tracing::error!(error = %e, sentry_event_id = %event_id, "Transfer failed");
                flash::push(
                    &session,
                    FlashLevel::Error,
                    "Something went wrong, please try again.",
                )
                .await;
                return Ok(back);
            }
        },
        // A name that cannot exist is simply not in stock or not in the cart
        Err(_) => match action {
            TransferAction::Buy => TransferOutcome::OutOfStock,
            TransferAction::Return => TransferOutcome::NothingToReturn,
        },
    };

    let level = if outcome.is_success() {
        FlashLevel::Success
    } else {
        FlashLevel::Warning
    };
    flash::push(&session, level, outcome.message(form.item.trim())).await;

    Ok(back)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_shopping_path_encodes_name() {
        let shopper = ShopperName::parse("Mary Jane").unwrap();
        assert_eq!(shopping_path(&shopper), "/shopping/Mary%20Jane");
    }

    #[test]
    fn test_shopping_path_encodes_reserved_characters() {
        let shopper = ShopperName::parse("a?b#c").unwrap();
        assert_eq!(shopping_path(&shopper), "/shopping/a%3Fb%23c");
    }
}
