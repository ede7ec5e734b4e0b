//! Background listener that drains confirmed contract events into the
//! mirror and the transaction ledger.

use crate::ports::outbound::{DealMirror, EventSink, EventSource};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Spawn a task that consumes events from `source` until the stream closes.
///
/// Delivery is at-least-once, so both targets must be idempotent: the mirror
/// finalizes by transaction hash and the sink deduplicates on it.
pub fn spawn_event_listener(
    source: Arc<dyn EventSource>,
    mirror: Arc<dyn DealMirror>,
    sink: Arc<dyn EventSink>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("Escrow event listener started");
        while let Some(event) = source.next_event().await {
            if let Err(e) = mirror.apply_event(&event).await {
                warn!(token_id = %event.token_id, tx_hash = %event.tx_hash, error = %e,
                    "Mirror write failed for contract event");
            }
            if let Err(e) = sink.record(&event).await {
                warn!(token_id = %event.token_id, tx_hash = %event.tx_hash, error = %e,
                    "Ledger-entry append failed for contract event");
            }
        }
        info!("Escrow event listener stopped: source closed");
    })
}
