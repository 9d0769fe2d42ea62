use clap::Args;
use std::path::PathBuf;
use vrgen_core::build_view_model;

use crate::cli::run_cli_async;

const DEFAULT_PACKAGE: &str = "generated";

#[derive(Args, Debug, Clone)]
pub struct InspectArgs {
    #[arg(value_name = "FILE", help = "Component source or react-docgen JSON file")]
    pub file: PathBuf,
    #[arg(
        long = "package",
        short = 'p',
        help = "Java package to place the component in. Defaults to `generated`"
    )]
    pub package: Option<String>,
}

pub async fn run(args: InspectArgs) -> i32 {
    run_cli_async(|| async move { run_inner(&args) }).await
}

fn run_inner(args: &InspectArgs) -> Result<(), String> {
    let package = args.package.as_deref().unwrap_or(DEFAULT_PACKAGE);
    let view_model = build_view_model(&args.file, package).map_err(|err| err.to_string())?;
    let json = serde_json::to_string_pretty(&view_model)
        .map_err(|err| format!("Failed to serialize view model: {err}"))?;
    println!("{json}");
    Ok(())
}
