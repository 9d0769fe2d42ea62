//! Emission: rendering view models to text and writing the artifact set.

pub mod bundler;
pub mod layout;
pub mod runtime;
pub mod templates;

use std::fs;
use std::path::{Path, PathBuf};
use tera::Context;
use tracing::debug;

use crate::error::{Error, Result};
use crate::view_model::ComponentViewModel;
use layout::{OutputLayout, RUNTIME_PACKAGE, ensure_dir};
use templates::{BASE_CLASS, CONNECTOR, IMPL_CLASS, Templates};

/// A file rendered in memory, not yet written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFile {
    pub path: PathBuf,
    pub contents: String,
}

impl RenderedFile {
    /// Write the file, creating its parent directories as needed.
    pub fn write(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            ensure_dir(parent)?;
        }
        fs::write(&self.path, &self.contents).map_err(|err| Error::filesystem(&self.path, err))
    }
}

/// The rendered artifacts of one component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedComponent {
    pub component_name: String,
    pub source: PathBuf,
    pub base_class: RenderedFile,
    pub impl_class: RenderedFile,
    pub simple_connector: RenderedFile,
    /// Destination of the bundled connector; its contents come from the bundler.
    pub bundled_connector: PathBuf,
}

impl RenderedComponent {
    /// The files rendered from templates, in write order.
    pub fn files(&self) -> [&RenderedFile; 3] {
        [&self.base_class, &self.impl_class, &self.simple_connector]
    }
}

/// Renders and writes artifacts into one [`OutputLayout`].
#[derive(Debug)]
pub struct Emitter {
    layout: OutputLayout,
    templates: Templates,
}

impl Emitter {
    pub fn new(layout: OutputLayout, templates: Templates) -> Self {
        Self { layout, templates }
    }

    pub fn layout(&self) -> &OutputLayout {
        &self.layout
    }

    /// Render the three templates for `view_model`. Nothing is written.
    pub fn render(
        &self,
        view_model: &ComponentViewModel,
        source: &Path,
    ) -> Result<RenderedComponent> {
        let name = &view_model.component_name;
        let context = self.context(view_model)?;
        Ok(RenderedComponent {
            component_name: name.clone(),
            source: source.to_path_buf(),
            base_class: RenderedFile {
                path: self.layout.base_class(name),
                contents: self.templates.render(BASE_CLASS, &context)?,
            },
            impl_class: RenderedFile {
                path: self.layout.impl_class(name),
                contents: self.templates.render(IMPL_CLASS, &context)?,
            },
            simple_connector: RenderedFile {
                path: self.layout.simple_connector(name),
                contents: self.templates.render(CONNECTOR, &context)?,
            },
            bundled_connector: self.layout.bundled_connector(name),
        })
    }

    /// Write the rendered sources and the simple connector.
    pub fn write(&self, rendered: &RenderedComponent) -> Result<()> {
        ensure_dir(self.layout.sources_dir())?;
        ensure_dir(self.layout.resources_dir())?;
        for file in rendered.files() {
            file.write()?;
        }
        debug!(
            component = %rendered.component_name,
            dir = %self.layout.sources_dir().display(),
            "Wrote component sources."
        );
        Ok(())
    }

    /// The shared runtime files for this layout. Writing them is safe to repeat.
    pub fn runtime_files(&self) -> Vec<RenderedFile> {
        runtime::runtime_files(&self.layout)
    }

    fn context(&self, view_model: &ComponentViewModel) -> Result<Context> {
        let mut context =
            Context::from_serialize(view_model).map_err(|err| Error::template("context", &err))?;
        context.insert("runtime_package", RUNTIME_PACKAGE);
        context.insert("runtime_script", &self.layout.runtime_script_require());
        context.insert(
            "connector_function",
            &connector_function(&view_model.target_package, &view_model.component_name),
        );
        Ok(context)
    }
}

/// Global name of the client connector for `<package>.<Name>_Base`: the
/// fully qualified class name with dots replaced by underscores.
pub fn connector_function(package: &str, component: &str) -> String {
    format!("{}_{component}_Base", package.replace('.', "_"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::analyzer::{ComponentDescriptor, PropDescriptor};
    use indexmap::IndexMap;

    fn slider() -> ComponentViewModel {
        let mut props = IndexMap::new();
        for (name, ty, required) in [
            ("value", "number", true),
            ("onChange", "func", true),
            ("label", "string", false),
            ("icon", "element", false),
            ("kind", "symbol", false),
        ] {
            props.insert(
                name.to_string(),
                PropDescriptor {
                    declared_type: ty.to_string(),
                    required,
                },
            );
        }
        let descriptor = ComponentDescriptor {
            display_name: Some("Slider".to_string()),
            props,
        };
        ComponentViewModel::build(&descriptor, Path::new("/app/Slider.js"), "com.example").unwrap()
    }

    fn emitter(output: &Path) -> Emitter {
        Emitter::new(
            OutputLayout::new(output, "com.example"),
            Templates::load(None).unwrap(),
        )
    }

    #[test]
    fn test_connector_function() {
        assert_eq!(
            connector_function("com.example.ui", "Slider"),
            "com_example_ui_Slider_Base"
        );
    }

    #[test]
    fn test_render_base_class() {
        let emitter = emitter(Path::new("/proj"));
        let rendered = emitter.render(&slider(), Path::new("/app/Slider.js")).unwrap();
        let base = &rendered.base_class.contents;

        assert!(base.starts_with("package com.example;"));
        assert!(base.contains("public abstract class Slider_Base extends ReactComponent"));
        assert!(base.contains("public Slider_Base(double value, JavaScriptFunction onChange)"));
        assert!(base.contains("setValue(value);"));
        assert!(base.contains("setOnChange(onChange);"));
        assert!(base.contains("addFunction(\"onChangeHandler\""));
        assert!(base.contains("public String getLabel()"));
        assert!(base.contains("public void setIcon(ReactComponent icon)"));
        assert!(base.contains("public static class SliderState"));
        assert!(!base.contains("private JavaScriptFunction onChange;"));
    }

    #[test]
    fn test_render_impl_and_connector() {
        let emitter = emitter(Path::new("/proj"));
        let rendered = emitter.render(&slider(), Path::new("/app/Slider.js")).unwrap();

        let implementation = &rendered.impl_class.contents;
        assert!(implementation.contains("@JavaScript({\"SliderConnector.js\"})"));
        assert!(implementation.contains("public class SliderImpl extends Slider_Base"));
        assert!(implementation.contains("super(value, onChange);"));

        let connector = &rendered.simple_connector.contents;
        assert!(connector.contains("window.com_example_Slider_Base = function"));
        assert!(connector.contains("\"../../io/vrgen/runtime/vaadinComponentWrapper.js\""));
        assert!(connector.contains("\"/app/Slider.js\""));
        assert!(connector.contains("Symbol(state.kind)"));
    }

    #[test]
    fn test_render_targets_layout_paths() {
        let emitter = emitter(Path::new("/proj"));
        let rendered = emitter.render(&slider(), Path::new("/app/Slider.js")).unwrap();
        assert_eq!(rendered.base_class.path, emitter.layout().base_class("Slider"));
        assert_eq!(rendered.impl_class.path, emitter.layout().impl_class("Slider"));
        assert_eq!(
            rendered.simple_connector.path,
            emitter.layout().simple_connector("Slider")
        );
        assert_eq!(
            rendered.bundled_connector,
            emitter.layout().bundled_connector("Slider")
        );
    }

    #[test]
    fn test_write_twice_is_identical() {
        let dir = tempfile::tempdir().unwrap();
        let emitter = emitter(dir.path());
        let rendered = emitter.render(&slider(), Path::new("/app/Slider.js")).unwrap();

        emitter.write(&rendered).unwrap();
        let first = fs::read_to_string(&rendered.base_class.path).unwrap();
        emitter.write(&rendered).unwrap();
        let second = fs::read_to_string(&rendered.base_class.path).unwrap();
        assert_eq!(first, second);

        for _ in 0..2 {
            for file in emitter.runtime_files() {
                file.write().unwrap();
            }
        }
        assert!(emitter.layout().runtime_sources_dir().join("ReactComponent.java").is_file());
    }
}
