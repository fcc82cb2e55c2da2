//! HTML page templates using Jinja2 syntax.
//!
//! Templates are read once at startup; a missing directory or a missing page
//! template is a startup error rather than a per-request one.

use minijinja::{Environment, Value};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Directories searched when no explicit template directory is configured
const TEMPLATE_SEARCH_PATHS: &[&str] = &["templates", "../templates"];

/// Page templates every deployment must ship
pub const REQUIRED_TEMPLATES: &[&str] = &[
    "login.html",
    "index.html",
    "fax_show.html",
    "faxes.html",
    "settings.html",
];

/// Errors that can occur during template operations
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template '{0}' not found")]
    NotFound(String),

    #[error("No template directory found (searched: {0})")]
    DirectoryNotFound(String),

    #[error("Failed to load template '{0}': {1}")]
    LoadError(String, String),

    #[error("Failed to render template: {0}")]
    RenderError(String),
}

/// Loaded page templates
pub struct TemplateEngine {
    env: Environment<'static>,
}

impl TemplateEngine {
    /// Load templates from `explicit_dir`, or from the first search path that exists.
    pub fn discover(explicit_dir: Option<&Path>) -> Result<Self, TemplateError> {
        let candidates: Vec<PathBuf> = match explicit_dir {
            Some(dir) => vec![dir.to_path_buf()],
            None => TEMPLATE_SEARCH_PATHS.iter().map(PathBuf::from).collect(),
        };

        let dir = candidates.iter().find(|p| p.is_dir()).ok_or_else(|| {
            TemplateError::DirectoryNotFound(
                candidates
                    .iter()
                    .map(|p| p.display().to_string())
                    .collect::<Vec<_>>()
                    .join(", "),
            )
        })?;

        let engine = Self::from_dir(dir)?;
        tracing::info!("Loaded templates from: {}", dir.display());
        Ok(engine)
    }

    /// Load every `.html` file in `dir` and check the required pages exist.
    pub fn from_dir(dir: &Path) -> Result<Self, TemplateError> {
        let mut env = Environment::new();

        let entries = std::fs::read_dir(dir)
            .map_err(|e| TemplateError::LoadError(dir.display().to_string(), e.to_string()))?;

        for entry in entries.flatten() {
            let path = entry.path();
            if !path.extension().is_some_and(|ext| ext == "html") {
                continue;
            }
            let Some(name) = path.file_name().map(|n| n.to_string_lossy().to_string()) else {
                continue;
            };
            let content = std::fs::read_to_string(&path)
                .map_err(|e| TemplateError::LoadError(name.clone(), e.to_string()))?;
            env.add_template_owned(name.clone(), content)
                .map_err(|e| TemplateError::LoadError(name.clone(), e.to_string()))?;
            tracing::debug!("Loaded template: {}", name);
        }

        for required in REQUIRED_TEMPLATES {
            if env.get_template(required).is_err() {
                return Err(TemplateError::NotFound(required.to_string()));
            }
        }

        Ok(Self { env })
    }

    /// Value visible to every template, e.g. whether to show a logout link
    pub fn set_global(&mut self, name: &'static str, value: impl Into<Value>) {
        self.env.add_global(name, value.into());
    }

    /// Render a page template with the given context
    pub fn render(&self, template_name: &str, ctx: Value) -> Result<String, TemplateError> {
        let template = self
            .env
            .get_template(template_name)
            .map_err(|_| TemplateError::NotFound(template_name.to_string()))?;

        template
            .render(ctx)
            .map_err(|e| TemplateError::RenderError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use minijinja::context;

    fn project_templates() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("templates")
    }

    #[test]
    fn test_loads_project_templates() {
        let engine = TemplateEngine::from_dir(&project_templates()).unwrap();
        let html = engine
            .render(
                "login.html",
                context! { error => "invalid", redirect => "/faxes", has_password => true },
            )
            .unwrap();
        assert!(html.contains("&#x2f;faxes"));
        assert!(html.contains("Invalid password."));
    }

    #[test]
    fn test_escapes_html() {
        let engine = TemplateEngine::from_dir(&project_templates()).unwrap();
        let html = engine
            .render(
                "login.html",
                context! { redirect => "\"><script>", has_password => true },
            )
            .unwrap();
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_globals_reach_every_page() {
        let mut engine = TemplateEngine::from_dir(&project_templates()).unwrap();
        engine.set_global("auth_enabled", true);
        let html = engine
            .render(
                "faxes.html",
                context! { faxes => Vec::<String>::new(), page_number => 1, page_size => 10 },
            )
            .unwrap();
        assert!(html.contains("/logout"));
    }

    #[test]
    fn test_missing_required_template_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("login.html"), "hi").unwrap();
        assert!(matches!(
            TemplateEngine::from_dir(dir.path()),
            Err(TemplateError::NotFound(_))
        ));
    }

    #[test]
    fn test_discover_reports_searched_directories() {
        let missing = Path::new("/definitely/not/here");
        assert!(matches!(
            TemplateEngine::discover(Some(missing)),
            Err(TemplateError::DirectoryNotFound(_))
        ));
    }
}
