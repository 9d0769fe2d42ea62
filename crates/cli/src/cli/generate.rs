use clap::Args;
use std::time::Instant;
use tracing::debug;
use vrgen_core::Generator;

use crate::cli::run_cli_async;
use crate::common::{BundlerArg, TargetArgs, format_elapsed_ms, spinner};

#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub target: TargetArgs,
    #[arg(
        long = "bundler",
        value_enum,
        help = "Bundler for the connector script. Overrides `bundler` from the config"
    )]
    pub bundler: Option<BundlerArg>,
}

pub async fn run(args: GenerateArgs) -> i32 {
    run_cli_async(|| run_inner(args)).await
}

async fn run_inner(args: GenerateArgs) -> Result<(), String> {
    let config = args.target.load(args.bundler)?;
    println!(
        "Generating bindings for package {} into {}",
        config.package,
        config.output_dir.display()
    );

    let generator = Generator::new(config).map_err(|err| err.to_string())?;

    let start = Instant::now();
    let sp = spinner("⚙️  Generating bindings...");
    let result = generator.run().await;
    sp.finish_and_clear();

    let report = result.map_err(|err| err.to_string())?;
    debug!(?report, "Generation report.");
    println!(
        "✅ Generated {} component(s), {} file(s) and {} bundle(s) in {}",
        report.components.len(),
        report.files_written,
        report.bundles_written,
        format_elapsed_ms(start)
    );
    Ok(())
}
