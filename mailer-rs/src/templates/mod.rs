//! Email templates
//!
//! - [`registry`]: slug-keyed templates loaded once at startup
//! - [`renderer`]: renders bodies by slug or from inline source
//! - [`types`]: placeholder values handed to template execution

pub mod registry;
pub mod renderer;
pub mod types;

pub use registry::TemplateRegistry;
pub use renderer::TemplateRenderer;
pub use types::{PlaceholderValue, Placeholders};
