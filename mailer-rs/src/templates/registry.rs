//! Slug-keyed registry of precompiled templates
//!
//! Built once at startup from a directory of template files and never
//! mutated afterwards, so it can be shared behind an `Arc` without locking.

use crate::error::{MailError, Result};
use minijinja::{AutoEscape, Environment, Template};
use std::collections::BTreeSet;
use std::path::Path;
use tracing::{debug, info, warn};

/// Instruction budget for one render; running out is a render error
pub const RENDER_FUEL: u64 = 200_000;

/// Build a template environment with the settings every template in the
/// service shares: HTML escaping, trailing newlines kept and a bounded
/// amount of work per render.
pub(crate) fn environment() -> Environment<'static> {
    let mut env = Environment::new();
    env.set_auto_escape_callback(|_| AutoEscape::Html);
    env.set_keep_trailing_newline(true);
    env.set_fuel(Some(RENDER_FUEL));
    env
}

/// Registry of compiled templates keyed by slug
pub struct TemplateRegistry {
    env: Environment<'static>,
    slugs: BTreeSet<String>,
}

impl TemplateRegistry {
    /// Create a registry with no templates
    pub fn empty() -> Self {
        Self {
            env: environment(),
            slugs: BTreeSet::new(),
        }
    }

    /// Load every `*.{extension}` file in `dir`
    ///
    /// The slug is the file name with the extension stripped. Files that
    /// cannot be read or compiled are logged and skipped; only an unreadable
    /// directory fails the load.
    pub fn load<P: AsRef<Path>>(dir: P, extension: &str) -> Result<Self> {
        let dir = dir.as_ref();
        let mut entries: Vec<_> = std::fs::read_dir(dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .filter(|path| path.extension().and_then(|e| e.to_str()) == Some(extension))
            .collect();
        entries.sort();

        let mut registry = Self::empty();

        for path in entries {
            let Some(slug) = path.file_stem().and_then(|s| s.to_str()) else {
                warn!("Skipping template with non UTF-8 name: {}", path.display());
                continue;
            };

            let source = match std::fs::read_to_string(&path) {
                Ok(source) => source,
                Err(e) => {
                    warn!("Failed to read template {}: {}", path.display(), e);
                    continue;
                }
            };

            if let Err(e) = registry.insert(slug, source) {
                warn!("Failed to parse template {}: {}", path.display(), e);
            }
        }

        info!("Loaded {} email templates from {}", registry.len(), dir.display());
        Ok(registry)
    }

    /// Build a registry from in-memory `(slug, source)` pairs
    ///
    /// Compile failures are logged and the slug is left out.
    pub fn from_sources<I, S, T>(sources: I) -> Self
    where
        I: IntoIterator<Item = (S, T)>,
        S: Into<String>,
        T: Into<String>,
    {
        let mut registry = Self::empty();
        for (slug, source) in sources {
            let slug = slug.into();
            if let Err(e) = registry.insert(&slug, source) {
                warn!(slug = %slug, "Failed to parse template: {}", e);
            }
        }
        registry
    }

    /// Compile and add one template
    ///
    /// Only callable while the registry is still exclusively owned, which is
    /// what keeps it immutable once shared.
    pub fn insert(&mut self, slug: &str, source: impl Into<String>) -> Result<()> {
        self.env
            .add_template_owned(slug.to_string(), source.into())
            .map_err(|e| MailError::Compile(e.to_string()))?;
        self.slugs.insert(slug.to_string());
        debug!(slug = %slug, "Registered template");
        Ok(())
    }

    /// Look up a compiled template
    pub fn get(&self, slug: &str) -> Result<Template<'_, '_>> {
        if !self.slugs.contains(slug) {
            return Err(MailError::TemplateNotFound(slug.to_string()));
        }
        self.env
            .get_template(slug)
            .map_err(|_| MailError::TemplateNotFound(slug.to_string()))
    }

    pub fn contains(&self, slug: &str) -> bool {
        self.slugs.contains(slug)
    }

    pub fn len(&self) -> usize {
        self.slugs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slugs.is_empty()
    }

    /// Registered slugs in sorted order
    pub fn slugs(&self) -> impl Iterator<Item = &str> {
        self.slugs.iter().map(String::as_str)
    }
}

impl Default for TemplateRegistry {
    fn default() -> Self {
        Self::empty()
    }
}
