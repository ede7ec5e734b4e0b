//! Domain layer: user records, verification status, errors.

pub mod entities;
pub mod errors;

pub use entities::{Document, KycStatus, UserRecord};
pub use errors::KycError;
