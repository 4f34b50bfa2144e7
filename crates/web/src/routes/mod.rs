//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                    - Landing page
//!
//! # Manager
//! GET  /query               - Add-items form
//! POST /query               - Add up to five items, show inventory
//! GET  /query2              - Inventory table
//!
//! # Shoppers
//! GET  /shop                - Shopper name form
//! POST /shop                - Redirect to the shopper's page
//! GET  /shopping/{shopper}  - Inventory and the shopper's cart
//! POST /shopping/{shopper}  - Buy or return one unit, redirect back
//!
//! # Audit
//! GET  /log                 - Action log, newest first
//! ```

pub mod home;
pub mod inventory;
pub mod log;
pub mod shopping;

use axum::{Router, routing::get};

use crate::error::AppError;
use crate::state::AppState;

/// Create all page routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::index))
        .route("/query", get(inventory::add_form).post(inventory::add_items))
        .route("/query2", get(inventory::list))
        .route("/shop", get(shopping::shop_form).post(shopping::choose_shopper))
        .route(
            "/shopping/{shopper}",
            get(shopping::show).post(shopping::transfer),
        )
        .route("/log", get(log::show))
        .fallback(not_found)
}

async fn not_found() -> AppError {
    AppError::NotFound("page".to_string())
}
