//! Ports: traits the gate consumes, with in-memory mocks for tests.

pub mod outbound;

pub use outbound::{InMemoryUserStore, KycLedger, MockKycLedger, UserStore};
