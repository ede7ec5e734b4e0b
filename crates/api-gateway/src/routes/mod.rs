//! # Routes
//!
//! Route tables for the public and admin surfaces. Handlers stay thin:
//! normalize the body, call one service, wrap the view in the envelope.

pub mod escrow;
pub mod properties;
pub mod transactions;
pub mod users;

use crate::AppState;
use axum::routing::{get, post};
use axum::Router;

/// Routes that require no authentication.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/escrow/validate", post(escrow::validate))
        .route("/escrow/calculate-cost", post(escrow::calculate_cost))
        .route("/escrow/deal/:token_id", get(escrow::get_deal))
        .route("/escrow/user/:address", get(escrow::deals_for_user))
        .route("/properties", post(properties::submit).get(properties::list))
        .route("/properties/:id", get(properties::get_property))
        .route("/users/register", post(users::register))
        .route("/users/:address", get(users::get_user))
        .route("/transactions", get(transactions::list))
        .route("/transactions/:hash", get(transactions::get_by_hash))
}

/// Routes behind the admin bearer-token layer.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/escrow/transaction", post(escrow::record_transaction))
        .route("/properties/:id/review", post(properties::review))
        .route("/properties/:id/mint", post(properties::mint))
        .route("/users", get(users::list_users))
        .route("/users/:address/review", post(users::review_user))
}
