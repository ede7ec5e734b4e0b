//! User endpoints: registration, profile reads, and admin review.

use crate::envelope::ApiResponse;
use crate::error::ApiError;
use crate::normalize::{normalize_register, AliasedObject};
use crate::views::UserView;
use crate::AppState;
use axum::extract::{Path, State};
use axum::Json;
use kyc_gate::{KycStatus, UserRecord};
use serde_json::Value;
use shared_types::Address;

/// `POST /users/register` - create a pending record (or re-register after
/// rejection).
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<ApiResponse<UserRecord>>, ApiError> {
    let req = normalize_register(body)?;
    let record = state.kyc.register(req.address, req.documents).await?;
    Ok(Json(ApiResponse::ok(record)))
}

/// `GET /users/:address` - the record plus the on-chain verification flag.
/// The flag may come from the short-lived cache; a registry outage reads as
/// unverified rather than failing the profile view.
pub async fn get_user(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<Json<ApiResponse<UserView>>, ApiError> {
    let address: Address = address.parse()?;
    let record = state.kyc.get_user(address).await?;
    let verified = state.kyc.is_verified_cached(address).await.unwrap_or(false);
    Ok(Json(ApiResponse::ok(UserView { record, verified })))
}

/// `GET /users` (admin) - every record.
pub async fn list_users(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<UserRecord>>>, ApiError> {
    Ok(Json(ApiResponse::ok(state.kyc.list_users().await?)))
}

/// `POST /users/:address/review` (admin) - verify or reject a pending
/// record. Body: `{"decision": "verified" | "rejected"}`.
pub async fn review_user(
    State(state): State<AppState>,
    Path(address): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<ApiResponse<UserRecord>>, ApiError> {
    let address: Address = address.parse()?;
    let mut obj = AliasedObject::new(body)?;
    let decision = parse_review_decision(&obj.required_str(&["decision", "status"])?)?;
    let record = state.kyc.review(address, decision).await?;
    Ok(Json(ApiResponse::ok(record)))
}

fn parse_review_decision(s: &str) -> Result<KycStatus, ApiError> {
    match s.to_ascii_lowercase().as_str() {
        "verified" => Ok(KycStatus::Verified),
        "rejected" => Ok(KycStatus::Rejected),
        other => Err(ApiError::bad_request(format!(
            "Decision must be 'verified' or 'rejected', got '{}'",
            other
        ))),
    }
}
