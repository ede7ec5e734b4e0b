//! Property endpoints: listing lifecycle and admin review/mint.

use crate::envelope::ApiResponse;
use crate::error::ApiError;
use crate::normalize::{normalize_submit_property, parse_owner, AliasedObject};
use crate::views::PropertyView;
use crate::AppState;
use axum::extract::{Path, Query, State};
use axum::Json;
use property_registry::PropertyStatus;
use serde::Deserialize;
use serde_json::Value;
use shared_types::PropertyId;

/// Optional listing filter.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Owner identity (wallet address or internal user id).
    pub owner: Option<String>,
}

/// `POST /properties` - submit a new listing.
pub async fn submit(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<ApiResponse<PropertyView>>, ApiError> {
    let req = normalize_submit_property(body)?;
    let property = state.registry.submit(req.owner, req.name, req.images).await?;
    Ok(Json(ApiResponse::ok(PropertyView::from(&property))))
}

/// `GET /properties` - all listings, optionally filtered by owner.
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<Vec<PropertyView>>>, ApiError> {
    let properties = match query.owner {
        Some(owner) => state.registry.list_by_owner(parse_owner(&owner)?).await?,
        None => state.registry.list().await?,
    };
    Ok(Json(ApiResponse::ok(
        properties.iter().map(PropertyView::from).collect(),
    )))
}

/// `GET /properties/:id` - one listing.
pub async fn get_property(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<PropertyView>>, ApiError> {
    let property = state.registry.get(&PropertyId::new(id)).await?;
    Ok(Json(ApiResponse::ok(PropertyView::from(&property))))
}

/// `POST /properties/:id/review` (admin) - approve or reject a pending
/// listing. Body: `{"decision": "approved" | "rejected"}`.
pub async fn review(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<ApiResponse<PropertyView>>, ApiError> {
    let mut obj = AliasedObject::new(body)?;
    let decision = parse_review_decision(&obj.required_str(&["decision", "status"])?)?;
    let property = state.registry.review(&PropertyId::new(id), decision).await?;
    Ok(Json(ApiResponse::ok(PropertyView::from(&property))))
}

/// `POST /properties/:id/mint` (admin) - bind an approved listing to its
/// token. Body: `{"tokenId": <u64>}`.
pub async fn mint(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<ApiResponse<PropertyView>>, ApiError> {
    let mut obj = AliasedObject::new(body)?;
    let token_id = obj.token_id(&["tokenId", "token_id"])?;
    let property = state.registry.mint(&PropertyId::new(id), token_id).await?;
    Ok(Json(ApiResponse::ok(PropertyView::from(&property))))
}

fn parse_review_decision(s: &str) -> Result<PropertyStatus, ApiError> {
    match s.to_ascii_lowercase().as_str() {
        "approved" => Ok(PropertyStatus::Approved),
        "rejected" => Ok(PropertyStatus::Rejected),
        other => Err(ApiError::bad_request(format!(
            "Decision must be 'approved' or 'rejected', got '{}'",
            other
        ))),
    }
}
