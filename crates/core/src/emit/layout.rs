//! Output directory layout.
//!
//! Two trees mirror the target package: generated Java sources and packaged
//! resources. The runtime support files live at a fixed package under both.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Generated Java sources, relative to the output directory.
pub const SOURCES_ROOT: &str = "target/generated-sources/vaadin-react";
/// Packaged resources, relative to the output directory.
pub const RESOURCES_ROOT: &str = "target/classes";
/// Package of the shared runtime classes and script.
pub const RUNTIME_PACKAGE: &str = "io.vrgen.runtime";
/// File name of the client-side runtime script.
pub const RUNTIME_SCRIPT: &str = "vaadinComponentWrapper.js";

const SOURCE_EXT: &str = "java";
const SCRIPT_EXT: &str = "js";

/// Translate a dotted package name into a relative directory path.
pub fn package_path(package: &str) -> PathBuf {
    package.split('.').collect()
}

/// Create `path` and every missing ancestor. Existing directories are fine;
/// anything else in the way is a filesystem error.
pub fn ensure_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|err| Error::filesystem(path, err))
}

/// Where every artifact of a run lands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    package: String,
    sources_dir: PathBuf,
    resources_dir: PathBuf,
    runtime_sources_dir: PathBuf,
    runtime_resources_dir: PathBuf,
}

impl OutputLayout {
    pub fn new(output_dir: &Path, package: &str) -> Self {
        let sources_root = output_dir.join(SOURCES_ROOT);
        let resources_root = output_dir.join(RESOURCES_ROOT);
        let package_dir = package_path(package);
        let runtime_dir = package_path(RUNTIME_PACKAGE);
        Self {
            package: package.to_string(),
            sources_dir: sources_root.join(&package_dir),
            resources_dir: resources_root.join(&package_dir),
            runtime_sources_dir: sources_root.join(&runtime_dir),
            runtime_resources_dir: resources_root.join(runtime_dir),
        }
    }

    pub fn package(&self) -> &str {
        &self.package
    }

    pub fn sources_dir(&self) -> &Path {
        &self.sources_dir
    }

    pub fn resources_dir(&self) -> &Path {
        &self.resources_dir
    }

    pub fn runtime_sources_dir(&self) -> &Path {
        &self.runtime_sources_dir
    }

    pub fn runtime_resources_dir(&self) -> &Path {
        &self.runtime_resources_dir
    }

    /// `<Name>_Base.java`
    pub fn base_class(&self, component: &str) -> PathBuf {
        self.sources_dir.join(format!("{component}_Base.{SOURCE_EXT}"))
    }

    /// `<Name>Impl.java`
    pub fn impl_class(&self, component: &str) -> PathBuf {
        self.sources_dir.join(format!("{component}Impl.{SOURCE_EXT}"))
    }

    /// `<Name>SimpleConnector.js`
    pub fn simple_connector(&self, component: &str) -> PathBuf {
        self.resources_dir.join(format!("{component}SimpleConnector.{SCRIPT_EXT}"))
    }

    /// `<Name>Connector.js`
    pub fn bundled_connector(&self, component: &str) -> PathBuf {
        self.resources_dir.join(format!("{component}Connector.{SCRIPT_EXT}"))
    }

    /// Relative path from a connector in the component package to the runtime
    /// script, always with `/` separators.
    pub fn runtime_script_require(&self) -> String {
        let depth = self.package.split('.').count();
        let mut require = "../".repeat(depth);
        for segment in RUNTIME_PACKAGE.split('.') {
            require.push_str(segment);
            require.push('/');
        }
        require.push_str(RUNTIME_SCRIPT);
        require
    }
}
