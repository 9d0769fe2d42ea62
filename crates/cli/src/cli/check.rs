use clap::Args;
use similar::{ChangeTag, TextDiff};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;
use vrgen_core::{Generator, Passthrough, RenderedFile};

use crate::cli::run_cli_async;
use crate::common::TargetArgs;

#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    #[command(flatten)]
    pub target: TargetArgs,
}

pub async fn run(args: CheckArgs) -> i32 {
    run_cli_async(|| async move { run_inner(&args) }).await
}

/// A rendered file compared against what is on disk
#[derive(Debug)]
struct FileCheck {
    rel_path: String,
    expected: String,
    /// None if the file doesn't exist
    existing: Option<String>,
}

impl FileCheck {
    fn new(file: &RenderedFile, root: &Path) -> Result<Self, String> {
        let existing = match fs::read_to_string(&file.path) {
            Ok(contents) => Some(contents),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => None,
            Err(err) => return Err(format!("Failed to read {}: {err}", file.path.display())),
        };
        let rel_path = file
            .path
            .strip_prefix(root)
            .unwrap_or(&file.path)
            .to_string_lossy()
            .replace('\\', "/");
        Ok(Self {
            rel_path,
            expected: file.contents.clone(),
            existing,
        })
    }

    fn is_missing(&self) -> bool {
        self.existing.is_none()
    }

    fn is_stale(&self) -> bool {
        self.existing
            .as_ref()
            .is_some_and(|existing| existing != &self.expected)
    }

    /// Unified diff from the file on disk to the freshly rendered contents
    fn generate_diff(&self) -> Option<String> {
        let existing = self.existing.as_ref()?;
        if existing == &self.expected {
            return None;
        }

        let diff = TextDiff::from_lines(existing, &self.expected);
        let mut output = String::new();

        output.push_str(&format!("\x1b[1m--- {} (on disk)\x1b[0m\n", self.rel_path));
        output.push_str(&format!("\x1b[1m+++ {} (generated)\x1b[0m\n", self.rel_path));

        for (idx, group) in diff.grouped_ops(3).iter().enumerate() {
            if idx > 0 {
                output.push_str("...\n");
            }
            for op in group {
                for change in diff.iter_changes(op) {
                    let (sign, color) = match change.tag() {
                        ChangeTag::Delete => ("-", "\x1b[31m"),
                        ChangeTag::Insert => ("+", "\x1b[32m"),
                        ChangeTag::Equal => (" ", ""),
                    };
                    output.push_str(color);
                    output.push_str(sign);
                    output.push_str(change.value());
                    if change.missing_newline() {
                        output.push('\n');
                    }
                    if !color.is_empty() {
                        output.push_str("\x1b[0m");
                    }
                }
            }
        }

        Some(output)
    }
}

fn run_inner(args: &CheckArgs) -> Result<(), String> {
    let config = args.target.load(None)?;
    let root = config.output_dir.clone();

    // bundled connectors are not compared, so no bundler is needed
    let generator =
        Generator::with_bundler(config, Arc::new(Passthrough)).map_err(|err| err.to_string())?;
    let plan = generator.plan().map_err(|err| err.to_string())?;

    let checks = plan
        .files()
        .map(|file| FileCheck::new(file, &root))
        .collect::<Result<Vec<_>, _>>()?;
    debug!(files = checks.len(), "Compared generated files.");

    let missing: Vec<_> = checks.iter().filter(|check| check.is_missing()).collect();
    let stale: Vec<_> = checks.iter().filter(|check| check.is_stale()).collect();
    let up_to_date = checks.len() - missing.len() - stale.len();

    if !missing.is_empty() {
        println!("\x1b[32mMissing files:\x1b[0m");
        for file in &missing {
            println!("  \x1b[32m+\x1b[0m {}", file.rel_path);
        }
        println!();
    }

    if !stale.is_empty() {
        println!("\x1b[33mStale files:\x1b[0m");
        for file in &stale {
            println!("  \x1b[33m~\x1b[0m {}", file.rel_path);
        }
        println!();

        println!("\x1b[1m--- Diffs ---\x1b[0m\n");
        for file in &stale {
            if let Some(diff) = file.generate_diff() {
                println!("{diff}");
            }
        }
    }

    println!(
        "Summary: {} missing, {} stale, {} up to date",
        missing.len(),
        stale.len(),
        up_to_date
    );

    if missing.is_empty() && stale.is_empty() {
        println!("All generated files are up to date.");
        return Ok(());
    }
    Err("Generated files are out of date; run `vrgen generate`".to_string())
}
