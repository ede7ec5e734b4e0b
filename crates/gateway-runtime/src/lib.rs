//! # Gateway Runtime
//!
//! Wires the EstateChain components into a running gateway: opens the mirror
//! store, builds the services, starts the contract event listener, and hands
//! the assembled router to the server binary.
//!
//! ## Module Structure
//!
//! ```text
//! gateway-runtime/
//! ├── config.rs        # environment configuration
//! ├── kyc_registry.rs  # store-backed verification registry
//! ├── sink.rs          # property-resolving ledger sink
//! ├── lib.rs           # component wiring
//! └── main.rs          # server entry point
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod kyc_registry;
pub mod sink;

pub use config::{ConfigError, RuntimeConfig};
pub use kyc_registry::StoreBackedKycRegistry;
pub use sink::PropertyResolvingSink;

use api_gateway::{build_router, AppState};
use escrow_engine::{spawn_event_listener, EscrowService, MockEscrowLedger};
use kyc_gate::KycGate;
use mirror_store::{
    MirrorDb, MirrorStoreError, RocksLedgerStore, RocksPropertyStore, RocksUserStore,
};
use property_registry::PropertyRegistry;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::info;
use tx_ledger::TxLedger;

/// The wired gateway, ready to serve.
pub struct Runtime {
    /// Shared handler state; also useful for seeding in development.
    pub state: AppState,
    /// The full router with middleware applied.
    pub router: axum::Router,
    db: Arc<MirrorDb>,
    listener: Option<JoinHandle<()>>,
}

impl Runtime {
    /// Stop the event listener and flush the store.
    pub fn shutdown(self) -> Result<(), MirrorStoreError> {
        if let Some(listener) = self.listener {
            listener.abort();
        }
        self.db.close()?;
        info!("Gateway runtime shut down");
        Ok(())
    }
}

/// Open the store and wire every component.
///
/// The escrow contract is the in-memory development ledger until a chain
/// client is configured; its event stream feeds the listener, which applies
/// events to the mirror and the transaction ledger (at-least-once, both
/// deduplicate on transaction hash).
pub fn build(config: &RuntimeConfig) -> Result<Runtime, MirrorStoreError> {
    let db = MirrorDb::open(&config.db_config())?;

    let user_store = Arc::new(RocksUserStore::new(db.clone()));
    let kyc = Arc::new(KycGate::new(
        Arc::new(StoreBackedKycRegistry::new(user_store.clone())),
        user_store,
    ));
    let registry = Arc::new(PropertyRegistry::new(Arc::new(RocksPropertyStore::new(
        db.clone(),
    ))));
    let ledger = Arc::new(TxLedger::new(Arc::new(RocksLedgerStore::new(db.clone()))));

    let contract = Arc::new(MockEscrowLedger::new(config.fee_bps, config.fee_recipient));
    let sink = Arc::new(PropertyResolvingSink::new(ledger.clone(), registry.clone()));

    let listener = contract.take_event_source().map(|source| {
        spawn_event_listener(Arc::new(source), registry.clone(), sink.clone())
    });

    let escrow = Arc::new(EscrowService::new(
        contract,
        kyc.clone(),
        registry.clone(),
        sink,
    ));

    let state = AppState {
        escrow,
        kyc,
        registry,
        ledger,
    };
    let router = build_router(state.clone(), config.admin_token.clone());

    info!(
        fee_bps = config.fee_bps,
        admin_enabled = config.admin_token.is_some(),
        "Gateway runtime wired"
    );

    Ok(Runtime {
        state,
        router,
        db,
        listener,
    })
}
