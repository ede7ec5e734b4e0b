//! Escrow endpoints: pre-flight validation, cost quotes, deal reads, and the
//! confirmed-transaction intake.

use crate::envelope::ApiResponse;
use crate::error::ApiError;
use crate::normalize::{normalize_create, normalize_transaction, AliasedObject};
use crate::views::{CostView, DealView, LedgerEntryView, ValidationView};
use crate::AppState;
use axum::extract::{Path, State};
use axum::Json;
use escrow_engine::EscrowApi;
use serde_json::Value;
use shared_types::{Address, TokenId};
use tracing::warn;

/// `POST /escrow/validate` - run every create guard, collecting violations
/// instead of stopping at the first.
pub async fn validate(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<ApiResponse<ValidationView>>, ApiError> {
    let q = normalize_create(body)?;
    let errors = state
        .escrow
        .validate_create(q.seller, q.token_id, q.buyer, q.price)
        .await?;
    Ok(Json(ApiResponse::ok(ValidationView {
        is_valid: errors.is_empty(),
        errors,
    })))
}

/// `POST /escrow/calculate-cost` - quote price, fee, and total at the
/// current fee rate.
pub async fn calculate_cost(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<ApiResponse<CostView>>, ApiError> {
    let mut obj = AliasedObject::new(body)?;
    let price = obj.amount(&["price", "amount"])?;
    let quote = state.escrow.calculate_cost(price).await?;
    Ok(Json(ApiResponse::ok(CostView::from(&quote))))
}

/// `GET /escrow/deal/:token_id` - the authoritative deal, with the mirror
/// reconciled as a side effect of the read.
pub async fn get_deal(
    State(state): State<AppState>,
    Path(token_id): Path<u64>,
) -> Result<Json<ApiResponse<DealView>>, ApiError> {
    let deal = state
        .escrow
        .get_deal(TokenId(token_id))
        .await?
        .ok_or_else(|| ApiError::not_found(format!("No deal for token {}", token_id)))?;
    Ok(Json(ApiResponse::ok(DealView::from(&deal))))
}

/// `GET /escrow/user/:address` - every deal the address participates in.
pub async fn deals_for_user(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<Json<ApiResponse<Vec<DealView>>>, ApiError> {
    let address: Address = address.parse()?;
    let deals = state.escrow.deals_for(address).await?;
    Ok(Json(ApiResponse::ok(
        deals.iter().map(DealView::from).collect(),
    )))
}

/// `POST /escrow/transaction` (admin) - record a contract event into the
/// mirror and the ledger table. Reverted transactions are recorded in the
/// ledger only; the mirror never sees them. Idempotent: a duplicate
/// transaction hash returns the stored entry as success.
pub async fn record_transaction(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<ApiResponse<LedgerEntryView>>, ApiError> {
    let report = normalize_transaction(body)?;

    // Resolve the property binding unless the client supplied one.
    let property_id = match report.property_id {
        Some(id) => Some(id),
        None => state
            .registry
            .property_for_token(report.event.token_id)
            .await?
            .map(|p| p.property_id),
    };
    let Some(property_id) = property_id else {
        return Err(ApiError::not_found(format!(
            "No property bound to token {}",
            report.event.token_id
        )));
    };

    if !report.confirmed {
        let outcome = state
            .ledger
            .record_failed_event(&report.event, Some(property_id))
            .await?;
        return Ok(Json(ApiResponse::ok(LedgerEntryView::from(outcome.entry()))));
    }

    state
        .escrow
        .record_confirmed_event(report.event.clone())
        .await?;

    // The ledger insert is idempotent on transaction hash, so recording here
    // after the engine's own fan-out is safe and yields the stored entry.
    let outcome = state
        .ledger
        .record_event(&report.event, Some(property_id))
        .await?;
    if !outcome.was_inserted() {
        warn!(
            tx_hash = %report.event.tx_hash,
            "Transaction already recorded; returning stored entry"
        );
    }
    Ok(Json(ApiResponse::ok(LedgerEntryView::from(outcome.entry()))))
}
