//! What a worker does with a message the relay refused

use crate::dispatch::types::Message;
use crate::error::MailError;
use async_trait::async_trait;
use tracing::error;

/// Strategy applied after a failed delivery attempt
///
/// The worker hands over ownership of the message, so a strategy may keep
/// it (dead-letter store, delayed retry) without the worker loop changing.
#[async_trait]
pub trait DeliveryFailurePolicy: Send + Sync {
    async fn on_failure(&self, message: Message, error: MailError);
}

/// Log the failure and discard the message
///
/// Messages are attempted at most once; callers already got an accepted
/// response and are never told about the failure.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogAndDrop;

#[async_trait]
impl DeliveryFailurePolicy for LogAndDrop {
    async fn on_failure(&self, message: Message, error: MailError) {
        error!(
            id = %message.id(),
            to = %message.to(),
            subject = %message.subject(),
            "Failed to send email, dropping it: {}",
            error
        );
    }
}
