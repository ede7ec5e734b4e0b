//! # Error Mapping
//!
//! Domain errors become HTTP statuses here; handlers just use `?`.
//! Guard and validation failures keep their specific message; internal
//! failures are logged in full and returned as a generic message.

use crate::envelope::ApiResponse;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use escrow_engine::{EscrowError, GuardViolation};
use kyc_gate::KycError;
use property_registry::PropertyError;
use shared_types::ParseError;
use tracing::error;
use tx_ledger::TxLedgerError;

/// An error ready to leave the gateway.
#[derive(Debug)]
pub struct ApiError {
    /// HTTP status.
    pub status: StatusCode,
    /// Message placed in the response envelope.
    pub message: String,
}

impl ApiError {
    /// A 400 with the given message.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    /// A 404 with the given message.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    /// A 500 carrying a generic message; the detail goes to the log only.
    pub fn internal(detail: impl std::fmt::Display) -> Self {
        error!(error = %detail, "Internal error");
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ApiResponse::<()>::fail(self.message))).into_response()
    }
}

impl From<ParseError> for ApiError {
    fn from(e: ParseError) -> Self {
        Self::bad_request(e.to_string())
    }
}

impl From<EscrowError> for ApiError {
    fn from(e: EscrowError) -> Self {
        let status = match &e {
            EscrowError::Validation(_) | EscrowError::AmountOverflow(_) => StatusCode::BAD_REQUEST,
            EscrowError::Guard(GuardViolation::NotVerified { .. }) => StatusCode::FORBIDDEN,
            EscrowError::Guard(_) => StatusCode::BAD_REQUEST,
            EscrowError::DealNotFound(_) | EscrowError::TokenNotFound(_) => StatusCode::NOT_FOUND,
            EscrowError::LedgerUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            EscrowError::Mirror(_) | EscrowError::EventSink(_) => {
                return Self::internal(e);
            }
        };
        Self {
            status,
            message: e.to_string(),
        }
    }
}

impl From<KycError> for ApiError {
    fn from(e: KycError) -> Self {
        let status = match &e {
            KycError::UserNotFound(_) => StatusCode::NOT_FOUND,
            KycError::AlreadyRegistered(_) => StatusCode::CONFLICT,
            KycError::InvalidStatusTransition { .. } => StatusCode::BAD_REQUEST,
            KycError::LedgerUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            KycError::Store(_) => return Self::internal(e),
        };
        Self {
            status,
            message: e.to_string(),
        }
    }
}

impl From<PropertyError> for ApiError {
    fn from(e: PropertyError) -> Self {
        let status = match &e {
            PropertyError::NotFound(_) | PropertyError::NoPropertyForToken(_) => {
                StatusCode::NOT_FOUND
            }
            PropertyError::InvalidStatusTransition { .. } | PropertyError::NoOpenEscrow(_) => {
                StatusCode::BAD_REQUEST
            }
            PropertyError::TokenAlreadyBound(_) => StatusCode::CONFLICT,
            PropertyError::Store(_) => return Self::internal(e),
        };
        Self {
            status,
            message: e.to_string(),
        }
    }
}

impl From<TxLedgerError> for ApiError {
    fn from(e: TxLedgerError) -> Self {
        match &e {
            TxLedgerError::NotFound(_) => Self::not_found(e.to_string()),
            TxLedgerError::Store(_) => Self::internal(e),
        }
    }
}
