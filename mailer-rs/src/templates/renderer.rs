//! Message body rendering
//!
//! Two paths produce a body: a registry template looked up by slug, or
//! inline template source compiled for a single request.

use crate::error::{MailError, Result};
use crate::templates::registry::{environment, TemplateRegistry};
use crate::templates::types::Placeholders;
use minijinja::{Template, Value};
use std::sync::Arc;

/// Renders message bodies from templates and placeholder values
#[derive(Clone)]
pub struct TemplateRenderer {
    registry: Arc<TemplateRegistry>,
}

impl TemplateRenderer {
    pub fn new(registry: Arc<TemplateRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &TemplateRegistry {
        &self.registry
    }

    /// Render the registry template stored under `slug`
    ///
    /// # Errors
    /// - [`MailError::TemplateNotFound`] if no template is registered under `slug`
    /// - [`MailError::Render`] if execution fails against `placeholders`
    pub fn render_by_slug(&self, slug: &str, placeholders: &Placeholders) -> Result<String> {
        let template = self.registry.get(slug)?;
        execute(&template, placeholders)
    }

    /// Compile caller-supplied template source and render it once
    ///
    /// # Errors
    /// - [`MailError::Compile`] if `source` is not a valid template
    /// - [`MailError::Render`] if execution fails against `placeholders`
    pub fn render_inline(&self, source: &str, placeholders: &Placeholders) -> Result<String> {
        let env = environment();
        let template = env
            .template_from_str(source)
            .map_err(|e| MailError::Compile(e.to_string()))?;
        execute(&template, placeholders)
    }
}

fn execute(template: &Template<'_, '_>, placeholders: &Placeholders) -> Result<String> {
    template
        .render(Value::from_serialize(placeholders))
        .map_err(|e| MailError::Render(e.to_string()))
}
