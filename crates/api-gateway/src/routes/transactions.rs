//! Transaction-ledger read endpoints.

use crate::envelope::ApiResponse;
use crate::error::ApiError;
use crate::views::LedgerEntryView;
use crate::AppState;
use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use shared_types::{Address, TokenId, TxHash};

/// Optional entry filters; `address` wins when both are given.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Only entries where this address is payer or payee.
    pub address: Option<String>,
    /// Only entries for this token.
    pub token_id: Option<u64>,
}

/// `GET /transactions` - entries newest first, optionally filtered.
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<Vec<LedgerEntryView>>>, ApiError> {
    let entries = if let Some(address) = query.address {
        let address: Address = address.parse()?;
        state.ledger.list_for_address(address).await?
    } else if let Some(token_id) = query.token_id {
        state.ledger.list_for_token(TokenId(token_id)).await?
    } else {
        state.ledger.list().await?
    };
    Ok(Json(ApiResponse::ok(
        entries.iter().map(LedgerEntryView::from).collect(),
    )))
}

/// `GET /transactions/:hash` - one entry by transaction hash.
pub async fn get_by_hash(
    State(state): State<AppState>,
    Path(hash): Path<String>,
) -> Result<Json<ApiResponse<LedgerEntryView>>, ApiError> {
    let hash: TxHash = hash.parse()?;
    let entry = state.ledger.get_by_hash(hash).await?;
    Ok(Json(ApiResponse::ok(LedgerEntryView::from(&entry))))
}
