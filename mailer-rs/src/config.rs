//! Configuration for mailer-rs
//!
//! Loaded once at startup (TOML file or defaults, then environment
//! overrides) and shared read-only afterwards.

use crate::error::{MailError, Result};
use crate::utils::validate_email;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Longest one-time code the generator will produce
const MAX_OTP_LENGTH: usize = 18;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub server: ServerConfig,
    pub relay: RelayConfig,
    #[serde(default)]
    pub dispatch: DispatchConfig,
    #[serde(default)]
    pub templates: TemplatesConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// HTTP listen address (e.g., "0.0.0.0:7979")
    pub listen_addr: String,
}

/// Process-wide default relay settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RelayConfig {
    pub host: String,
    #[serde(default = "default_relay_port")]
    pub port: u16,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    /// Address placed in the From header and the SMTP envelope
    pub sender: String,
    #[serde(default)]
    pub tls: TlsMode,
    /// Transport-level timeout for one relay conversation
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

/// How the relay connection is secured
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TlsMode {
    /// Plain text connection
    None,
    /// Upgrade with STARTTLS when the relay offers it
    #[default]
    Opportunistic,
    /// Fail unless STARTTLS succeeds
    Required,
    /// Implicit TLS from the first byte (SMTPS)
    Wrapper,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DispatchConfig {
    #[serde(default = "default_workers")]
    pub workers: usize,
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TemplatesConfig {
    #[serde(default = "default_templates_dir")]
    pub dir: PathBuf,
    /// File extension (without the dot) recognized as a template
    #[serde(default = "default_extension")]
    pub extension: String,
    #[serde(default = "default_otp_length")]
    pub otp_length: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

fn default_relay_port() -> u16 {
    587
}

fn default_timeout() -> u64 {
    30
}

fn default_workers() -> usize {
    5
}

fn default_queue_capacity() -> usize {
    100
}

fn default_templates_dir() -> PathBuf {
    PathBuf::from("./templates")
}

fn default_extension() -> String {
    "html".to_string()
}

fn default_otp_length() -> usize {
    6
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            queue_capacity: default_queue_capacity(),
        }
    }
}

impl Default for TemplatesConfig {
    fn default() -> Self {
        Self {
            dir: default_templates_dir(),
            extension: default_extension(),
            otp_length: default_otp_length(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| MailError::Config(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| MailError::Config(format!("Failed to parse config: {}", e)))
    }

    /// Override fields from the process environment
    pub fn apply_env(self) -> Result<Self> {
        self.apply_vars(|key| std::env::var(key).ok())
    }

    /// Override fields from an arbitrary variable source
    ///
    /// Empty values are treated as unset.
    pub fn apply_vars<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(host) = var("SMTP_HOST") {
            self.relay.host = host;
        }
        if let Some(port) = var("SMTP_PORT") {
            self.relay.port = parse_var("SMTP_PORT", &port)?;
        }
        if let Some(user) = var("SMTP_USER") {
            self.relay.username = user;
        }
        if let Some(pass) = var("SMTP_PASS") {
            self.relay.password = pass;
        }
        if let Some(sender) = var("SENDER_EMAIL") {
            self.relay.sender = sender;
        }
        if let Some(port) = var("EMAIL_SERVICE_PORT") {
            let port: u16 = parse_var("EMAIL_SERVICE_PORT", &port)?;
            let host = self
                .server
                .listen_addr
                .rsplit_once(':')
                .map(|(host, _)| host.to_string())
                .unwrap_or_else(|| "0.0.0.0".to_string());
            self.server.listen_addr = format!("{}:{}", host, port);
        }
        if let Some(dir) = var("TEMPLATES_DIR") {
            self.templates.dir = PathBuf::from(dir);
        }
        if let Some(workers) = var("EMAIL_WORKERS") {
            self.dispatch.workers = parse_var("EMAIL_WORKERS", &workers)?;
        }
        if let Some(capacity) = var("EMAIL_QUEUE_CAPACITY") {
            self.dispatch.queue_capacity = parse_var("EMAIL_QUEUE_CAPACITY", &capacity)?;
        }

        Ok(self)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.dispatch.workers == 0 {
            return Err(MailError::Config("dispatch.workers must be at least 1".to_string()));
        }
        if self.dispatch.queue_capacity == 0 {
            return Err(MailError::Config(
                "dispatch.queue_capacity must be at least 1".to_string(),
            ));
        }
        if self.relay.host.is_empty() {
            return Err(MailError::Config("relay.host is not set".to_string()));
        }
        if self.relay.sender.is_empty() {
            return Err(MailError::Config("relay.sender is not set".to_string()));
        }
        validate_email(&self.relay.sender)
            .map_err(|e| MailError::Config(format!("relay.sender: {}", e)))?;
        if self.templates.otp_length == 0 || self.templates.otp_length > MAX_OTP_LENGTH {
            return Err(MailError::Config(format!(
                "templates.otp_length must be between 1 and {}",
                MAX_OTP_LENGTH
            )));
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                listen_addr: "0.0.0.0:7979".to_string(),
            },
            relay: RelayConfig {
                host: "localhost".to_string(),
                port: default_relay_port(),
                username: String::new(),
                password: String::new(),
                sender: "noreply@localhost.localdomain".to_string(),
                tls: TlsMode::default(),
                timeout_secs: default_timeout(),
            },
            dispatch: DispatchConfig::default(),
            templates: TemplatesConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| MailError::Config(format!("{} has an invalid value: {}", key, value)))
}
