//! Page template rendering.
//!
//! Templates live in `templates/` and use Jinja2 syntax. Handlers render them
//! through [`TemplateEngine`] and get an [`Html`] response back.

pub mod engine;

pub use engine::{TemplateEngine, TemplateError};

use axum::response::Html;
use minijinja::Value;

use crate::core::error::AppError;

impl From<TemplateError> for AppError {
    fn from(e: TemplateError) -> Self {
        AppError::Internal(e.to_string())
    }
}

impl TemplateEngine {
    /// Render a page straight into an HTML response
    pub fn page(&self, template_name: &str, ctx: Value) -> Result<Html<String>, AppError> {
        Ok(Html(self.render(template_name, ctx)?))
    }
}
