//! Middleware: admin bearer auth and CORS.

pub mod auth;
pub mod cors;

pub use auth::AdminAuthLayer;
