//! # API Gateway
//!
//! The REST surface over the escrow engine, KYC gate, property registry, and
//! transaction ledger. The gateway validates shape, normalizes legacy field
//! aliases into the canonical schema, maps domain errors to HTTP statuses,
//! and owns no invariants of its own.
//!
//! Every response uses the `{success, data | message}` envelope. Admin
//! routes sit behind a bearer-token layer with constant-time comparison.
//!
//! ## Module Structure
//!
//! ```text
//! api-gateway/
//! ├── envelope.rs      # {success, data|message} response shape
//! ├── error.rs         # domain error -> HTTP status mapping
//! ├── normalize.rs     # alias field names -> canonical schema
//! ├── views.rs         # response DTOs (amounts as decimal strings)
//! ├── middleware/      # admin bearer auth, CORS
//! └── routes/          # escrow, properties, users, transactions
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod envelope;
pub mod error;
pub mod middleware;
pub mod normalize;
pub mod routes;
pub mod views;

pub use error::ApiError;
pub use middleware::auth::AdminAuthLayer;

use escrow_engine::EscrowApi;
use kyc_gate::KycGate;
use property_registry::PropertyRegistry;
use std::sync::Arc;
use tx_ledger::TxLedger;

/// Shared application state for all handlers.
#[derive(Clone)]
pub struct AppState {
    /// The escrow engine.
    pub escrow: Arc<dyn EscrowApi>,
    /// The KYC gate.
    pub kyc: Arc<KycGate>,
    /// The property registry.
    pub registry: Arc<PropertyRegistry>,
    /// The transaction ledger.
    pub ledger: Arc<TxLedger>,
}

/// Build the full router: public routes, admin routes behind the auth layer,
/// CORS and request tracing applied to everything.
pub fn build_router(state: AppState, admin_token: Option<String>) -> axum::Router {
    let admin = routes::admin_routes().layer(AdminAuthLayer::new(admin_token));

    routes::public_routes()
        .merge(admin)
        .layer(middleware::cors::permissive_cors_layer())
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}
