use clap::{Args, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::debug;
use vrgen_common::{BundlerKind, GeneratorConfig};

/// Options shared by every command that reads the project configuration.
#[derive(Args, Debug, Clone)]
pub struct TargetArgs {
    #[arg(
        long = "config",
        short = 'c',
        value_name = "CONFIG",
        help = "Path to vrgen.json or vrgen.toml. Defaults to the one in the current directory"
    )]
    pub config: Option<PathBuf>,
    #[arg(
        long = "out-dir",
        value_name = "DIR",
        help = "Directory that receives the target/ trees. Overrides `output` from the config"
    )]
    pub out_dir: Option<PathBuf>,
}

impl TargetArgs {
    /// Load the configuration and apply the command-line overrides.
    pub fn load(&self, bundler: Option<BundlerArg>) -> Result<GeneratorConfig, String> {
        let mut config = match &self.config {
            Some(path) => GeneratorConfig::load(path),
            None => {
                let cwd = std::env::current_dir()
                    .map_err(|err| format!("Failed to read current directory: {err}"))?;
                GeneratorConfig::discover(&cwd)
            }
        }
        .map_err(|err| err.to_string())?;

        if let Some(out_dir) = &self.out_dir {
            config.output_dir.clone_from(out_dir);
        }
        if let Some(bundler) = bundler {
            config.bundler = bundler.into();
        }
        debug!(
            package = %config.package,
            roots = config.components.len(),
            output = %config.output_dir.display(),
            bundler = ?config.bundler,
            "Loaded configuration."
        );
        Ok(config)
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BundlerArg {
    Bun,
    Browserify,
    None,
}

impl From<BundlerArg> for BundlerKind {
    fn from(arg: BundlerArg) -> Self {
        match arg {
            BundlerArg::Bun => BundlerKind::Bun,
            BundlerArg::Browserify => BundlerKind::Browserify,
            BundlerArg::None => BundlerKind::None,
        }
    }
}

// Spinner utilities for CLI operations
pub fn spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner.set_message(message.to_string());
    spinner
}

pub fn format_elapsed_ms(start: Instant) -> String {
    let elapsed = start.elapsed();
    if elapsed.as_secs() == 0 {
        return format!("{}ms", elapsed.as_millis());
    }
    let seconds = elapsed.as_secs();
    let remaining_ms = elapsed.subsec_millis();
    format!("{seconds}s {remaining_ms}ms")
}
