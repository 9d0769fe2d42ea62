//! Module bundler integration.
//!
//! A [`Bundler`] turns the simple connector into a readable stream of the
//! bundled script; the emitter pipes that stream into `<Name>Connector.js`.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::process::{Child, Command};
use tracing::debug;
use vrgen_common::BundlerKind;

use crate::error::{Error, Result};

/// Produces a bundled script from an entry point.
pub trait Bundler: Send + Sync + fmt::Debug {
    /// Start bundling `entry`. The returned stream yields the bundled output.
    fn bundle(&self, entry: &Path) -> Result<BundleStream>;
}

/// Bundled output being produced, plus the process producing it, if any.
pub struct BundleStream {
    entry: PathBuf,
    program: String,
    reader: Box<dyn AsyncRead + Send + Unpin>,
    child: Option<Child>,
}

impl fmt::Debug for BundleStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BundleStream")
            .field("entry", &self.entry)
            .field("program", &self.program)
            .field("child", &self.child.as_ref().and_then(Child::id))
            .finish_non_exhaustive()
    }
}

impl BundleStream {
    /// Copy the stream into `dest` and wait for the bundler to exit.
    /// Returns the number of bytes written.
    pub async fn copy_to(self, dest: &Path) -> Result<u64> {
        let BundleStream {
            entry,
            program,
            mut reader,
            mut child,
        } = self;
        let mut file = tokio::fs::File::create(dest)
            .await
            .map_err(|err| Error::filesystem(dest, err))?;

        let stderr = child.as_mut().and_then(|child| child.stderr.take());
        let drain_stderr = async move {
            let mut captured = String::new();
            if let Some(mut stderr) = stderr {
                // a failed read only loses diagnostics
                let _ = stderr.read_to_string(&mut captured).await;
            }
            captured
        };
        let copy = async {
            let written = tokio::io::copy(&mut reader, &mut file).await?;
            file.flush().await?;
            Ok::<u64, std::io::Error>(written)
        };
        let (copied, stderr) = tokio::join!(copy, drain_stderr);
        let written = copied.map_err(|err| Error::filesystem(dest, err))?;

        if let Some(mut child) = child {
            let status = child.wait().await.map_err(|err| Error::Bundle {
                path: entry.clone(),
                message: format!("failed to wait for {program}: {err}"),
            })?;
            if !status.success() {
                let mut message =
                    format!("{program} exited with code {}", status.code().unwrap_or(-1));
                let stderr = stderr.trim();
                if !stderr.is_empty() {
                    message.push_str("\n\nStderr:\n");
                    message.push_str(stderr);
                }
                return Err(Error::Bundle {
                    path: entry,
                    message,
                });
            }
        }

        debug!(
            entry = %entry.display(),
            dest = %dest.display(),
            bytes = written,
            "Bundle written."
        );
        Ok(written)
    }
}

/// An external bundler executable that writes the bundle to stdout.
#[derive(Debug, Clone)]
pub struct CommandBundler {
    name: &'static str,
    program: PathBuf,
    args_before: &'static [&'static str],
    args_after: &'static [&'static str],
}

impl CommandBundler {
    /// `bun build <entry> --target browser`
    pub fn bun() -> Result<Self> {
        Ok(Self {
            name: "bun",
            program: resolve("bun")?,
            args_before: &["build"],
            args_after: &["--target", "browser"],
        })
    }

    /// `browserify <entry>`
    pub fn browserify() -> Result<Self> {
        Ok(Self {
            name: "browserify",
            program: resolve("browserify")?,
            args_before: &[],
            args_after: &[],
        })
    }
}

impl Bundler for CommandBundler {
    fn bundle(&self, entry: &Path) -> Result<BundleStream> {
        debug!(
            bundler = self.name,
            program = %self.program.display(),
            entry = %entry.display(),
            "Spawning bundler."
        );
        let mut child = Command::new(&self.program)
            .args(self.args_before)
            .arg(entry)
            .args(self.args_after)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|err| Error::Bundle {
                path: entry.to_path_buf(),
                message: format!("failed to spawn {}: {err}", self.name),
            })?;
        let stdout = child.stdout.take().ok_or_else(|| Error::Bundle {
            path: entry.to_path_buf(),
            message: format!("{} stdout was not captured", self.name),
        })?;
        Ok(BundleStream {
            entry: entry.to_path_buf(),
            program: self.name.to_string(),
            reader: Box::new(stdout),
            child: Some(child),
        })
    }
}

/// Streams the entry point unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct Passthrough;

impl Bundler for Passthrough {
    fn bundle(&self, entry: &Path) -> Result<BundleStream> {
        let file = std::fs::File::open(entry).map_err(|err| Error::filesystem(entry, err))?;
        Ok(BundleStream {
            entry: entry.to_path_buf(),
            program: "passthrough".to_string(),
            reader: Box::new(tokio::fs::File::from_std(file)),
            child: None,
        })
    }
}

/// Build the bundler selected in configuration.
pub fn bundler_for(kind: BundlerKind) -> Result<Box<dyn Bundler>> {
    Ok(match kind {
        BundlerKind::Bun => Box::new(CommandBundler::bun()?),
        BundlerKind::Browserify => Box::new(CommandBundler::browserify()?),
        BundlerKind::None => Box::new(Passthrough),
    })
}

fn resolve(program: &str) -> Result<PathBuf> {
    which::which(program).map_err(|err| Error::Bundle {
        path: PathBuf::from(program),
        message: format!("{program} was not found on PATH: {err}"),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_passthrough_copies_entry_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let entry = dir.path().join("SliderSimpleConnector.js");
        let dest = dir.path().join("SliderConnector.js");
        std::fs::write(&entry, "window.x = 1;\n").unwrap();

        let written = Passthrough.bundle(&entry).unwrap().copy_to(&dest).await.unwrap();
        assert_eq!(written, 14);
        assert_eq!(std::fs::read_to_string(&dest).unwrap(), "window.x = 1;\n");
    }

    #[test]
    fn test_passthrough_missing_entry_is_filesystem_error() {
        let err = Passthrough
            .bundle(Path::new("/definitely/not/here.js"))
            .unwrap_err();
        assert!(matches!(err, Error::Filesystem { .. }));
    }

    #[test]
    fn test_bundler_for_none_needs_no_executable() {
        let bundler = bundler_for(BundlerKind::None).unwrap();
        assert_eq!(format!("{bundler:?}"), "Passthrough");
    }
}
