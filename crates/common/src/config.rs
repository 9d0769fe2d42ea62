//! Project configuration file.
//!
//! The file names the Java package to generate into and the directories that
//! hold React component sources. JSON and TOML are both accepted; the format is
//! picked from the file extension.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::identifier::is_java_identifier;

/// Config file names looked up, in order, when no explicit path is given.
pub const CONFIG_FILENAMES: [&str; 2] = ["vrgen.json", "vrgen.toml"];

const DEFAULT_EXTENSION: &str = "js";

/// Errors raised while locating, reading or validating the configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },
    #[error("Invalid config {}: {message}", .path.display())]
    Invalid { path: PathBuf, message: String },
    #[error(
        "No config file found in {} (looked for {})",
        .dir.display(),
        CONFIG_FILENAMES.join(", ")
    )]
    NotFound { dir: PathBuf },
}

/// Which external tool turns the simple connector into a self-contained script.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BundlerKind {
    /// `bun build <entry> --target browser`
    #[default]
    Bun,
    /// `browserify <entry>`
    Browserify,
    /// Copy the simple connector unchanged
    None,
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    package: String,
    components: Vec<PathBuf>,
    #[serde(default)]
    extensions: Option<Vec<String>>,
    #[serde(default)]
    templates: Option<PathBuf>,
    #[serde(default)]
    bundler: BundlerKind,
    #[serde(default)]
    output: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Toml,
}

impl Format {
    fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Format::Toml,
            _ => Format::Json,
        }
    }
}

/// Validated generator configuration with every path resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Dotted Java package for generated classes, e.g. `com.example.widgets`
    pub package: String,
    /// Component source roots (files or directories)
    pub components: Vec<PathBuf>,
    /// File extensions picked up by the component locator, without the dot
    pub extensions: Vec<String>,
    /// Optional directory of template overrides
    pub templates: Option<PathBuf>,
    pub bundler: BundlerKind,
    /// Directory under which the `target/` trees are written
    pub output_dir: PathBuf,
}

impl GeneratorConfig {
    /// Find a config file in `dir` and load it.
    pub fn discover(dir: &Path) -> Result<Self, ConfigError> {
        let path = CONFIG_FILENAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|candidate| candidate.is_file())
            .ok_or_else(|| ConfigError::NotFound {
                dir: dir.to_path_buf(),
            })?;
        Self::load(&path)
    }

    /// Load the config file at `path`. Relative paths inside it are resolved
    /// against the file's own directory.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let base_dir = path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        Self::parse(&contents, path, base_dir)
    }

    fn parse(contents: &str, path: &Path, base_dir: &Path) -> Result<Self, ConfigError> {
        let raw: RawConfig = match Format::from_path(path) {
            Format::Json => serde_json::from_str(contents).map_err(|err| ConfigError::Parse {
                path: path.to_path_buf(),
                message: err.to_string(),
            })?,
            Format::Toml => toml::from_str(contents).map_err(|err| ConfigError::Parse {
                path: path.to_path_buf(),
                message: err.to_string(),
            })?,
        };

        let invalid = |message: String| ConfigError::Invalid {
            path: path.to_path_buf(),
            message,
        };

        validate_package(&raw.package).map_err(invalid)?;
        if raw.components.is_empty() {
            return Err(invalid("`components` must list at least one path".to_string()));
        }

        let extensions: Vec<String> = raw
            .extensions
            .unwrap_or_else(|| vec![DEFAULT_EXTENSION.to_string()])
            .into_iter()
            .map(|ext| ext.trim_start_matches('.').to_string())
            .filter(|ext| !ext.is_empty())
            .collect();
        if extensions.is_empty() {
            return Err(invalid("`extensions` must not be empty".to_string()));
        }

        Ok(Self {
            package: raw.package,
            components: raw
                .components
                .iter()
                .map(|component| base_dir.join(component))
                .collect(),
            extensions,
            templates: raw.templates.map(|dir| base_dir.join(dir)),
            bundler: raw.bundler,
            output_dir: raw
                .output
                .map_or_else(|| base_dir.to_path_buf(), |out| base_dir.join(out)),
        })
    }
}

fn validate_package(package: &str) -> Result<(), String> {
    if package.is_empty() {
        return Err("`package` must not be empty".to_string());
    }
    if let Some(segment) = package.split('.').find(|segment| !is_java_identifier(segment)) {
        return Err(format!(
            "`package` segment '{segment}' in '{package}' is not a valid Java identifier"
        ));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn parse_json(contents: &str) -> Result<GeneratorConfig, ConfigError> {
        GeneratorConfig::parse(contents, Path::new("/app/vrgen.json"), Path::new("/app"))
    }

    #[test]
    fn test_parse_minimal_json() {
        let config =
            parse_json(r#"{"package": "com.example.ui", "components": ["src/widgets"]}"#).unwrap();
        assert_eq!(config.package, "com.example.ui");
        assert_eq!(config.components, vec![PathBuf::from("/app/src/widgets")]);
        assert_eq!(config.extensions, vec!["js".to_string()]);
        assert_eq!(config.bundler, BundlerKind::Bun);
        assert_eq!(config.output_dir, PathBuf::from("/app"));
        assert!(config.templates.is_none());
    }

    #[test]
    fn test_parse_toml_with_options() {
        let contents = r#"
package = "org.demo"
components = ["a", "b"]
extensions = [".js", "jsx"]
bundler = "none"
output = "build"
templates = "tpl"
"#;
        let config = GeneratorConfig::parse(
            contents,
            Path::new("/proj/vrgen.toml"),
            Path::new("/proj"),
        )
        .unwrap();
        assert_eq!(config.components.len(), 2);
        assert_eq!(config.extensions, vec!["js".to_string(), "jsx".to_string()]);
        assert_eq!(config.bundler, BundlerKind::None);
        assert_eq!(config.output_dir, PathBuf::from("/proj/build"));
        assert_eq!(config.templates, Some(PathBuf::from("/proj/tpl")));
    }

    #[test]
    fn test_rejects_bad_package() {
        for package in ["", "com..example", "com.1abc", "com.ex-ample", "com.class"] {
            let contents = format!(r#"{{"package": "{package}", "components": ["src"]}}"#);
            assert!(
                matches!(parse_json(&contents), Err(ConfigError::Invalid { .. })),
                "package '{package}' should be rejected"
            );
        }
    }

    #[test]
    fn test_rejects_empty_components() {
        let err = parse_json(r#"{"package": "com.example", "components": []}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn test_missing_field_is_parse_error() {
        let err = parse_json(r#"{"components": ["src"]}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_discover_prefers_json() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("vrgen.json"),
            r#"{"package": "a.b", "components": ["src"]}"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("vrgen.toml"),
            "package = \"c.d\"\ncomponents = [\"src\"]\n",
        )
        .unwrap();
        let config = GeneratorConfig::discover(dir.path()).unwrap();
        assert_eq!(config.package, "a.b");
        assert_eq!(config.components, vec![dir.path().join("src")]);
    }

    #[test]
    fn test_discover_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = GeneratorConfig::discover(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound { .. }));
    }
}
