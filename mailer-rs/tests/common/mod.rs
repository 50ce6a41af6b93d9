//! Shared helpers for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use mailer_rs::dispatch::{DispatchQueue, Dispatcher, Message};
use mailer_rs::error::{MailError, Result};
use mailer_rs::smtp::Relay;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Relay that records every message instead of talking SMTP
#[derive(Default)]
pub struct RecordingRelay {
    sent: Mutex<Vec<Message>>,
    delay: Option<Duration>,
    fail_subject: Option<String>,
}

impl RecordingRelay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hold every send for `delay` before recording it
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Reject messages with this subject
    pub fn failing_on(mut self, subject: &str) -> Self {
        self.fail_subject = Some(subject.to_string());
        self
    }

    pub fn sent(&self) -> Vec<Message> {
        self.sent.lock().unwrap().clone()
    }

    pub fn subjects(&self) -> Vec<String> {
        self.sent()
            .iter()
            .map(|m| m.subject().to_string())
            .collect()
    }
}

#[async_trait]
impl Relay for RecordingRelay {
    async fn send(&self, message: &Message) -> Result<()> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_subject.as_deref() == Some(message.subject()) {
            return Err(MailError::Delivery("550 mailbox unavailable".to_string()));
        }
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}

/// Dispatcher over a fresh queue, workers not started yet
pub fn dispatcher(capacity: usize, relay: Arc<RecordingRelay>) -> Arc<Dispatcher> {
    let queue = Arc::new(DispatchQueue::new(capacity));
    Arc::new(Dispatcher::new(queue, relay))
}

pub fn message(subject: &str) -> Message {
    Message::new("jane@example.com", subject, format!("<p>{}</p>", subject))
}
