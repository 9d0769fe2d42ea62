//! Embedded templates and their optional on-disk overrides.

use rust_embed::RustEmbed;
use std::fmt;
use std::fs;
use std::path::Path;
use tera::{Context, Tera};
use tracing::debug;

use crate::error::{Error, Result};

pub const BASE_CLASS: &str = "BaseClass.java.tera";
pub const IMPL_CLASS: &str = "ImplClass.java.tera";
pub const CONNECTOR: &str = "Connector.js.tera";

/// Every template rendered per component.
pub const TEMPLATE_NAMES: [&str; 3] = [BASE_CLASS, IMPL_CLASS, CONNECTOR];

#[derive(RustEmbed)]
#[folder = "templates/"]
struct EmbeddedTemplates;

/// The three compiled component templates.
pub struct Templates {
    tera: Tera,
}

impl fmt::Debug for Templates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Templates")
            .field("names", &TEMPLATE_NAMES)
            .finish()
    }
}

impl Templates {
    /// Compile the embedded templates. A file in `overrides` with the same
    /// name as an embedded template is used instead of it.
    pub fn load(overrides: Option<&Path>) -> Result<Self> {
        let mut tera = Tera::default();
        tera.autoescape_on(vec![]);
        for name in TEMPLATE_NAMES {
            let body = template_body(name, overrides)?;
            tera.add_raw_template(name, &body)
                .map_err(|err| Error::template(name, &err))?;
        }
        Ok(Self { tera })
    }

    pub fn render(&self, name: &str, context: &Context) -> Result<String> {
        self.tera
            .render(name, context)
            .map_err(|err| Error::template(name, &err))
    }
}

fn template_body(name: &str, overrides: Option<&Path>) -> Result<String> {
    if let Some(dir) = overrides {
        let path = dir.join(name);
        if path.is_file() {
            debug!(template = name, path = %path.display(), "Using template override.");
            return fs::read_to_string(&path).map_err(|err| Error::filesystem(&path, err));
        }
    }
    let file = EmbeddedTemplates::get(name).ok_or_else(|| Error::Template {
        name: name.to_string(),
        message: "template is not embedded".to_string(),
    })?;
    Ok(String::from_utf8_lossy(&file.data).into_owned())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_templates_compile() {
        let templates = Templates::load(None).unwrap();
        assert!(format!("{templates:?}").contains(BASE_CLASS));
    }

    #[test]
    fn test_override_replaces_embedded_template() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(IMPL_CLASS), "custom {{ component_name }}").unwrap();

        let templates = Templates::load(Some(dir.path())).unwrap();
        let mut context = Context::new();
        context.insert("component_name", "Slider");
        assert_eq!(templates.render(IMPL_CLASS, &context).unwrap(), "custom Slider");
    }

    #[test]
    fn test_broken_override_is_template_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONNECTOR), "{% for x in %}").unwrap();
        let err = Templates::load(Some(dir.path())).unwrap_err();
        match err {
            Error::Template { name, .. } => assert_eq!(name, CONNECTOR),
            other => unreachable!("unexpected error: {other}"),
        }
    }
}
