//! HTTP API
//!
//! Thin adapter over [`Mailer`](crate::service::Mailer):
//! - `GET /send`: render a registry template by slug
//! - `POST /send`: render inline template source
//! - `GET /health`: queue and worker status

pub mod handlers;
pub mod server;

pub use handlers::{ApiError, AppState};
pub use server::ApiServer;
