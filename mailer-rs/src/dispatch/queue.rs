//! Bounded, closable FIFO shared by request handlers and workers
//!
//! # Architecture
//! ```text
//! ┌──────────┐  try_enqueue   ┌─────────────────┐   dequeue   ┌──────────┐
//! │ Handlers │ ─────────────→ │ [m1][m2][m3]... │ ──────────→ │ Workers  │
//! └──────────┘  (never waits) └─────────────────┘  (waits)    └──────────┘
//!                   ↓ full / closed                   ↓ closed + empty
//!              QueueFull / QueueClosed               None
//! ```
//!
//! Closing refuses new entries but leaves buffered ones in place: `dequeue`
//! keeps returning them and only reports end-of-stream once the buffer is
//! empty.

use crate::dispatch::types::Message;
use crate::error::{MailError, Result};
use async_channel::{Receiver, Sender, TrySendError};

/// Default number of messages the queue holds
pub const DEFAULT_CAPACITY: usize = 100;

/// Fixed-capacity multi-producer, multi-consumer message queue
///
/// Both channel halves live here so the queue stays open for as long as it
/// exists; only [`close`](Self::close) ends it.
pub struct DispatchQueue {
    tx: Sender<Message>,
    rx: Receiver<Message>,
    capacity: usize,
}

impl DispatchQueue {
    /// Create a queue holding up to `capacity` messages (at least one)
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (tx, rx) = async_channel::bounded(capacity);
        Self { tx, rx, capacity }
    }

    /// Append a message without waiting
    ///
    /// # Errors
    /// - [`MailError::QueueFull`] if `capacity` messages are already buffered
    /// - [`MailError::QueueClosed`] once [`close`](Self::close) has been called
    pub fn try_enqueue(&self, message: Message) -> Result<()> {
        self.tx.try_send(message).map_err(|e| match e {
            TrySendError::Full(_) => MailError::QueueFull,
            TrySendError::Closed(_) => MailError::QueueClosed,
        })
    }

    /// Take the oldest message, waiting until one arrives
    ///
    /// Returns `None` once the queue is closed and fully drained. The future
    /// is cancel safe: dropping it never loses a message.
    pub async fn dequeue(&self) -> Option<Message> {
        self.rx.recv().await.ok()
    }

    /// Refuse further enqueues and wake every waiting consumer
    ///
    /// Calling it more than once has no further effect.
    pub fn close(&self) {
        self.tx.close();
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    pub fn len(&self) -> usize {
        self.tx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tx.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for DispatchQueue {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
