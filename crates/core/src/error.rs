//! Error taxonomy for the generation pipeline.

use std::path::{Path, PathBuf};

use crate::mapping::UnsupportedTypeError;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Every failure is fatal for the run; the variants carry the identifier an
/// operator needs to find the offending path, component or prop.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Filesystem error at {}: {source}", .path.display())]
    Filesystem {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse component {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },
    #[error("{} (component '{component}', prop '{prop}' in {})", .source, .file.display())]
    UnsupportedType {
        file: PathBuf,
        component: String,
        prop: String,
        source: UnsupportedTypeError,
    },
    #[error("{role} name '{name}' in {} is not a valid Java identifier", .file.display())]
    InvalidName {
        file: PathBuf,
        /// `component` or `prop`
        role: &'static str,
        name: String,
    },
    #[error(
        "Component '{name}' is defined by both {} and {}",
        .first.display(),
        .second.display()
    )]
    DuplicateComponent {
        name: String,
        first: PathBuf,
        second: PathBuf,
    },
    #[error("Failed to render template '{name}': {message}")]
    Template { name: String, message: String },
    #[error("Failed to bundle {}: {message}", .path.display())]
    Bundle { path: PathBuf, message: String },
    #[error(transparent)]
    Config(#[from] vrgen_common::ConfigError),
}

impl Error {
    pub(crate) fn filesystem(path: &Path, source: std::io::Error) -> Self {
        Error::Filesystem {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn parse(path: &Path, message: impl Into<String>) -> Self {
        Error::Parse {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }

    pub(crate) fn template(name: &str, err: &tera::Error) -> Self {
        // tera keeps the useful detail in the source chain
        let mut message = err.to_string();
        let mut cause = std::error::Error::source(err);
        while let Some(inner) = cause {
            message.push_str(": ");
            message.push_str(&inner.to_string());
            cause = inner.source();
        }
        Error::Template {
            name: name.to_string(),
            message,
        }
    }
}
