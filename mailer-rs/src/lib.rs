//! mailer-rs: Asynchronous outbound email dispatcher
//!
//! Callers submit a message addressed by template slug or carrying inline
//! template source. The body is rendered on the request path, queued in a
//! bounded buffer, and delivered to an SMTP relay by a fixed pool of
//! workers, so request latency never depends on relay latency.
//!
//! # Flow
//!
//! ```text
//! request → Mailer (validate, render) → DispatchQueue → workers → Relay
//!                   ↓ error                  ↓ full          ↓ failure
//!              4xx / 5xx reply         QueueFull reply    logged, dropped
//! ```
//!
//! # Example
//!
//! ```no_run
//! use mailer_rs::config::Config;
//! use mailer_rs::dispatch::{DispatchQueue, Dispatcher};
//! use mailer_rs::service::{Mailer, SlugRequest};
//! use mailer_rs::smtp::SmtpRelay;
//! use mailer_rs::templates::{TemplateRegistry, TemplateRenderer};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!     let registry = TemplateRegistry::load(&config.templates.dir, "html")?;
//!
//!     let queue = Arc::new(DispatchQueue::new(config.dispatch.queue_capacity));
//!     let dispatcher = Arc::new(Dispatcher::new(
//!         queue,
//!         Arc::new(SmtpRelay::new(config.relay.clone())),
//!     ));
//!     dispatcher.start(config.dispatch.workers);
//!
//!     let mailer = Mailer::new(TemplateRenderer::new(Arc::new(registry)), dispatcher.clone());
//!     mailer.send_by_slug(SlugRequest {
//!         to: "jane@example.com".to_string(),
//!         slug: "welcome".to_string(),
//!         ..Default::default()
//!     })?;
//!
//!     dispatcher.stop().await;
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! - [`config`]: Configuration management
//! - [`error`]: Error types and handling
//! - [`templates`]: Template registry and rendering
//! - [`dispatch`]: Queue, worker pool and lifecycle
//! - [`smtp`]: Relay client and message envelope
//! - [`service`]: Request path shared by every front end
//! - [`api`]: HTTP endpoints
//! - [`utils`]: Address validation and one-time codes

pub mod api;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod service;
pub mod smtp;
pub mod templates;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::{MailError, Result};
