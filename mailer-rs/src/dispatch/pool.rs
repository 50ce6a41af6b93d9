//! Worker pool and its lifecycle
//!
//! ```text
//! Running ──(dequeue → send → on failure: policy)*──→ Stopped
//!                                                     ↑
//!                         queue closed and drained ───┤
//!                         cancelled while idle ───────┘
//! ```

use crate::dispatch::policy::{DeliveryFailurePolicy, LogAndDrop};
use crate::dispatch::queue::DispatchQueue;
use crate::dispatch::types::Message;
use crate::error::Result;
use crate::smtp::Relay;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, info, warn};

/// Default number of concurrent workers
pub const DEFAULT_WORKERS: usize = 5;

/// Owns the dispatch queue consumers from start until shutdown completes
pub struct Dispatcher {
    queue: Arc<DispatchQueue>,
    relay: Arc<dyn Relay>,
    policy: Arc<dyn DeliveryFailurePolicy>,
    cancel: CancellationToken,
    tracker: TaskTracker,
    workers: AtomicUsize,
}

impl Dispatcher {
    /// Create a dispatcher that drops messages the relay rejects
    pub fn new(queue: Arc<DispatchQueue>, relay: Arc<dyn Relay>) -> Self {
        Self {
            queue,
            relay,
            policy: Arc::new(LogAndDrop),
            cancel: CancellationToken::new(),
            tracker: TaskTracker::new(),
            workers: AtomicUsize::new(0),
        }
    }

    /// Replace the delivery failure strategy
    pub fn with_policy(mut self, policy: Arc<dyn DeliveryFailurePolicy>) -> Self {
        self.policy = policy;
        self
    }

    /// Spawn `worker_count` workers against the shared queue
    ///
    /// Has no effect once [`stop`](Self::stop) has begun.
    pub fn start(&self, worker_count: usize) {
        if self.tracker.is_closed() {
            warn!("Dispatcher already stopped, not starting workers");
            return;
        }

        let first = self.workers.fetch_add(worker_count, Ordering::SeqCst);
        for id in first..first + worker_count {
            let queue = Arc::clone(&self.queue);
            let relay = Arc::clone(&self.relay);
            let policy = Arc::clone(&self.policy);
            let cancel = self.cancel.clone();

            self.tracker
                .spawn(run_worker(id, queue, relay, policy, cancel));
        }

        info!("Started {} email workers", worker_count);
    }

    /// Queue a rendered message for delivery without waiting
    pub fn enqueue(&self, message: Message) -> Result<()> {
        let id = message.id();
        let to = message.to().to_string();
        self.queue.try_enqueue(message)?;
        debug!(id = %id, to = %to, depth = self.queue.len(), "Email queued");
        Ok(())
    }

    /// Shut the pool down, draining buffered messages first
    ///
    /// The queue is closed before workers are cancelled, so nothing accepted
    /// is stranded; workers only honour cancellation while the buffer is
    /// empty. A send already in progress is never interrupted, so the relay
    /// timeout (`relay.timeout_secs`) is the only bound on how long this
    /// waits. Returns once every worker has stopped. Safe to call repeatedly.
    pub async fn stop(&self) {
        if !self.tracker.is_closed() {
            info!(pending = self.queue.len(), "Stopping email workers");
        }

        self.queue.close();
        self.cancel.cancel();
        self.tracker.close();
        self.tracker.wait().await;

        info!("All email workers stopped");
    }

    pub fn queue(&self) -> &Arc<DispatchQueue> {
        &self.queue
    }

    /// Number of workers started so far
    pub fn worker_count(&self) -> usize {
        self.workers.load(Ordering::SeqCst)
    }

    /// Workers that have not reached `Stopped` yet
    pub fn running_workers(&self) -> usize {
        self.tracker.len()
    }

    /// Whether new messages are still accepted
    pub fn is_accepting(&self) -> bool {
        !self.queue.is_closed()
    }
}

async fn run_worker(
    id: usize,
    queue: Arc<DispatchQueue>,
    relay: Arc<dyn Relay>,
    policy: Arc<dyn DeliveryFailurePolicy>,
    cancel: CancellationToken,
) {
    info!(worker = id, "Email worker started");

    let reason = loop {
        tokio::select! {
            // Buffered messages win over cancellation so shutdown drains
            biased;

            next = queue.dequeue() => match next {
                Some(message) => deliver(id, message, relay.as_ref(), policy.as_ref()).await,
                None => break "queue closed",
            },
            _ = cancel.cancelled() => break "cancelled",
        }
    };

    info!(worker = id, "Email worker stopping: {}", reason);
}

async fn deliver(
    worker: usize,
    message: Message,
    relay: &dyn Relay,
    policy: &dyn DeliveryFailurePolicy,
) {
    debug!(worker, id = %message.id(), to = %message.to(), "Sending email");

    match relay.send(&message).await {
        Ok(()) => debug!(worker, id = %message.id(), to = %message.to(), "Email sent"),
        Err(e) => policy.on_failure(message, e).await,
    }
}
