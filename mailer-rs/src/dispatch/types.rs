//! Units of work flowing through the dispatch queue

use crate::templates::Placeholders;
use chrono::{DateTime, Utc};
use std::fmt;
use uuid::Uuid;

/// Per-message relay override
///
/// `server` is always set; any other field left as `None` falls back to the
/// process-wide relay configuration.
#[derive(Clone, PartialEq, Eq)]
pub struct RelayCredentials {
    pub server: String,
    pub port: Option<u16>,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl fmt::Debug for RelayCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelayCredentials")
            .field("server", &self.server)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// A rendered email waiting for delivery
///
/// Built by a request handler right before enqueueing and never modified
/// afterwards. A worker consumes it exactly once, whatever the outcome.
#[derive(Debug, Clone)]
pub struct Message {
    id: Uuid,
    to: String,
    subject: String,
    body: String,
    credentials: Option<RelayCredentials>,
    placeholders: Placeholders,
    created_at: DateTime<Utc>,
}

impl Message {
    pub fn new(to: impl Into<String>, subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            to: to.into(),
            subject: subject.into(),
            body: body.into(),
            credentials: None,
            placeholders: Placeholders::new(),
            created_at: Utc::now(),
        }
    }

    /// Route this message through a specific relay instead of the default
    pub fn with_credentials(mut self, credentials: RelayCredentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Keep the values the body was rendered from, for logging
    pub fn with_placeholders(mut self, placeholders: Placeholders) -> Self {
        self.placeholders = placeholders;
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn to(&self) -> &str {
        &self.to
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn credentials(&self) -> Option<&RelayCredentials> {
        self.credentials.as_ref()
    }

    pub fn placeholders(&self) -> &Placeholders {
        &self.placeholders
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
