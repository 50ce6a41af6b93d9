//! Request path: validate, render, enqueue
//!
//! Everything here runs synchronously inside the caller's request. Errors
//! are returned straight away and no message reaches the queue unless
//! rendering succeeded; delivery itself happens later on a worker.

use crate::dispatch::{Dispatcher, Message, RelayCredentials};
use crate::error::{MailError, Result};
use crate::templates::{PlaceholderValue, Placeholders, TemplateRenderer};
use crate::utils::validate_email;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Send using a template from the registry
#[derive(Debug, Clone, Default)]
pub struct SlugRequest {
    pub to: String,
    pub slug: String,
    /// Defaults to `"Email for {slug}"`
    pub subject: Option<String>,
    pub placeholders: Placeholders,
}

/// Send using template source supplied with the request
#[derive(Debug, Clone, Default)]
pub struct InlineRequest {
    pub to: String,
    pub template: String,
    /// Defaults to `"Email Notification"`
    pub subject: Option<String>,
    /// Later pairs overwrite earlier ones with the same key
    pub placeholders: Vec<(String, PlaceholderValue)>,
    pub credentials: Option<RelayCredentials>,
}

/// Front door of the dispatcher for request handlers
#[derive(Clone)]
pub struct Mailer {
    renderer: TemplateRenderer,
    dispatcher: Arc<Dispatcher>,
}

impl Mailer {
    pub fn new(renderer: TemplateRenderer, dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            renderer,
            dispatcher,
        }
    }

    pub fn renderer(&self) -> &TemplateRenderer {
        &self.renderer
    }

    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    /// Render a registry template and queue the result
    ///
    /// Returns the id of the queued message.
    pub fn send_by_slug(&self, request: SlugRequest) -> Result<Uuid> {
        require("to", &request.to)?;
        require("slug", &request.slug)?;
        validate_email(&request.to)?;

        let subject = non_empty(request.subject)
            .unwrap_or_else(|| format!("Email for {}", request.slug));
        let body = self
            .renderer
            .render_by_slug(&request.slug, &request.placeholders)?;

        let message =
            Message::new(request.to, subject, body).with_placeholders(request.placeholders);
        let id = self.queue(message)?;
        info!(id = %id, slug = %request.slug, "Email accepted");
        Ok(id)
    }

    /// Compile caller-supplied template source, render it and queue the result
    ///
    /// Returns the id of the queued message.
    pub fn send_inline(&self, request: InlineRequest) -> Result<Uuid> {
        require("to", &request.to)?;
        require("template", &request.template)?;
        validate_email(&request.to)?;

        let subject =
            non_empty(request.subject).unwrap_or_else(|| "Email Notification".to_string());
        let placeholders: Placeholders = request.placeholders.into_iter().collect();
        let body = self.renderer.render_inline(&request.template, &placeholders)?;

        let mut message = Message::new(request.to, subject, body).with_placeholders(placeholders);
        if let Some(credentials) = request.credentials {
            message = message.with_credentials(credentials);
        }
        let id = self.queue(message)?;
        info!(id = %id, "Email accepted from inline template");
        Ok(id)
    }

    fn queue(&self, message: Message) -> Result<Uuid> {
        let id = message.id();
        self.dispatcher.enqueue(message)?;
        Ok(id)
    }
}

fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(MailError::Validation(format!("Missing '{}' field", field)));
    }
    Ok(())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
