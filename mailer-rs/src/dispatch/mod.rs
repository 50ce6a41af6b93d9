//! Asynchronous dispatch engine
//!
//! Request handlers push rendered [`Message`]s into a bounded
//! [`DispatchQueue`]; a pool of workers owned by the [`Dispatcher`] pulls
//! them off and hands each one to the relay exactly once.
//!
//! - [`types`]: the message unit of work
//! - [`queue`]: bounded, closable FIFO (the only backpressure point)
//! - [`pool`]: worker pool and start/stop lifecycle
//! - [`policy`]: what happens to a message the relay rejects

pub mod policy;
pub mod pool;
pub mod queue;
pub mod types;

pub use policy::{DeliveryFailurePolicy, LogAndDrop};
pub use pool::{Dispatcher, DEFAULT_WORKERS};
pub use queue::{DispatchQueue, DEFAULT_CAPACITY};
pub use types::{Message, RelayCredentials};
