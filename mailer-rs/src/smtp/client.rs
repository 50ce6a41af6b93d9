//! Relay client for handing messages to the outbound mail server
//!
//! Every send opens its own connection, authenticates, transmits one
//! message and quits; nothing is shared between calls.

use crate::config::{RelayConfig, TlsMode};
use crate::dispatch::{Message, RelayCredentials};
use crate::error::{MailError, Result};
use crate::smtp::envelope::build_email;
use async_trait::async_trait;
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::client::{Tls, TlsParameters};
use lettre::{AsyncSmtpTransport, AsyncTransport, Tokio1Executor};
use std::time::Duration;
use tracing::debug;

/// Delivers one message to a mail relay
#[async_trait]
pub trait Relay: Send + Sync {
    /// Deliver `message`, reporting any connection, auth or protocol
    /// failure as [`MailError::Delivery`]
    async fn send(&self, message: &Message) -> Result<()>;
}

/// Relay endpoint and login used for a single send
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayTarget {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
}

/// SMTP relay client backed by lettre
pub struct SmtpRelay {
    config: RelayConfig,
}

impl SmtpRelay {
    pub fn new(config: RelayConfig) -> Self {
        Self { config }
    }

    /// Pick the relay for a message: its override where given, the
    /// process-wide defaults for anything the override leaves out
    pub fn resolve(&self, credentials: Option<&RelayCredentials>) -> RelayTarget {
        match credentials {
            Some(c) => RelayTarget {
                host: c.server.clone(),
                port: c.port.unwrap_or(self.config.port),
                username: c.username.clone().unwrap_or_else(|| self.config.username.clone()),
                password: c.password.clone().unwrap_or_else(|| self.config.password.clone()),
            },
            None => RelayTarget {
                host: self.config.host.clone(),
                port: self.config.port,
                username: self.config.username.clone(),
                password: self.config.password.clone(),
            },
        }
    }

    fn transport(&self, target: &RelayTarget) -> Result<AsyncSmtpTransport<Tokio1Executor>> {
        let tls_parameters = || {
            TlsParameters::new(target.host.clone())
                .map_err(|e| MailError::Delivery(format!("TLS configuration error: {}", e)))
        };

        let tls = match self.config.tls {
            TlsMode::None => Tls::None,
            TlsMode::Opportunistic => Tls::Opportunistic(tls_parameters()?),
            TlsMode::Required => Tls::Required(tls_parameters()?),
            TlsMode::Wrapper => Tls::Wrapper(tls_parameters()?),
        };

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&target.host)
            .port(target.port)
            .tls(tls)
            .timeout(Some(Duration::from_secs(self.config.timeout_secs)));

        if !target.username.is_empty() {
            builder = builder.credentials(Credentials::new(
                target.username.clone(),
                target.password.clone(),
            ));
        }

        Ok(builder.build())
    }
}

#[async_trait]
impl Relay for SmtpRelay {
    async fn send(&self, message: &Message) -> Result<()> {
        let target = self.resolve(message.credentials());
        debug!(
            id = %message.id(),
            "Sending mail from {} to {} via {}:{}",
            self.config.sender,
            message.to(),
            target.host,
            target.port
        );

        let email = build_email(&self.config.sender, message)?;

        self.transport(&target)?
            .send(email)
            .await
            .map_err(|e| MailError::Delivery(e.to_string()))?;

        Ok(())
    }
}
