//! Prop schema extraction.
//!
//! An analyzer turns the contents of one component file into a
//! [`ComponentDescriptor`]: an optional display name plus the props in
//! declaration order. Which analyzer runs is decided by the file extension.

mod docgen_json;
mod prop_types;

pub use docgen_json::DocgenJsonAnalyzer;
pub use prop_types::PropTypesAnalyzer;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::error::{Error, Result};

/// One declared prop as reported by an analyzer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropDescriptor {
    /// Validator name, e.g. `string`, `func` or `enum`
    pub declared_type: String,
    pub required: bool,
}

/// Extracted schema of a single component.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentDescriptor {
    pub display_name: Option<String>,
    /// Props keyed by name, in declaration order
    pub props: IndexMap<String, PropDescriptor>,
}

impl ComponentDescriptor {
    /// The display name, or the file name without its extension when the
    /// component does not provide one.
    pub fn component_name(&self, path: &Path) -> String {
        match self.display_name.as_deref() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default(),
        }
    }
}

/// Extracts a [`ComponentDescriptor`] from source text.
pub trait ComponentAnalyzer: Send + Sync + fmt::Debug {
    fn analyze(&self, path: &Path, source: &str) -> Result<ComponentDescriptor>;
}

static PROP_TYPES: PropTypesAnalyzer = PropTypesAnalyzer;
static DOCGEN_JSON: DocgenJsonAnalyzer = DocgenJsonAnalyzer;

/// Pick the analyzer for a file: `.json` files are react-docgen output,
/// everything else is JavaScript source.
pub fn analyzer_for(path: &Path) -> &'static dyn ComponentAnalyzer {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => &DOCGEN_JSON,
        _ => &PROP_TYPES,
    }
}

/// Read a component file and extract its schema.
pub fn extract(path: &Path) -> Result<ComponentDescriptor> {
    let bytes = fs::read(path).map_err(|err| Error::filesystem(path, err))?;
    let source = String::from_utf8(bytes)
        .map_err(|err| Error::parse(path, format!("file is not valid UTF-8: {err}")))?;
    let analyzer = analyzer_for(path);
    let descriptor = analyzer.analyze(path, &source)?;
    debug!(
        path = %path.display(),
        analyzer = ?analyzer,
        display_name = ?descriptor.display_name,
        props = descriptor.props.len(),
        "Extracted component schema."
    );
    Ok(descriptor)
}
