use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

mod cli;
mod common;

#[derive(Parser)]
#[command(
    name = "vrgen",
    version,
    about = "\x1b[33mvrgen\x1b[0m generates Vaadin bindings for React components"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate bindings, connectors and runtime files
    Generate(cli::generate::GenerateArgs),
    /// Check that generated files are up to date
    Check(cli::check::CheckArgs),
    /// Print the view model of one component as JSON
    Inspect(cli::inspect::InspectArgs),
}

/// Parse `args` and run the selected command. Returns the process exit code.
pub fn run_cli(args: Vec<String>) -> i32 {
    init_tracing();

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            eprintln!("Failed to create tokio runtime: {err}");
            return 1;
        }
    };

    runtime.block_on(run_cli_async(args))
}

async fn run_cli_async(args: Vec<String>) -> i32 {
    match Cli::try_parse_from(args) {
        Ok(cli) => match cli.command {
            Some(Commands::Generate(args)) => cli::generate::run(args).await,
            Some(Commands::Check(args)) => cli::check::run(args).await,
            Some(Commands::Inspect(args)) => cli::inspect::run(args).await,
            None => {
                let mut cmd = Cli::command();
                let _ = cmd.print_help();
                println!();
                0
            }
        },
        Err(e) => {
            let code = e.exit_code();
            let _ = e.print();
            code
        }
    }
}

fn init_tracing() {
    // VRGEN_LOG takes a plain level ("debug") or a full filter spec
    // like "vrgen_core=trace,vrgen_cli=info"
    let filter = match std::env::var("VRGEN_LOG") {
        Ok(level) if is_plain_level(&level) => {
            format!("vrgen_core={level},vrgen_common={level},vrgen_cli={level}")
        }
        Ok(spec) => spec,
        Err(_) => "vrgen_core=info,vrgen_common=info,vrgen_cli=info".to_string(),
    };

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .with_file(true)
        .with_filter(EnvFilter::new(filter));

    if tracing_subscriber::registry()
        .with(fmt_layer)
        .try_init()
        .is_err()
    {
        eprintln!("Warning: tracing subscriber already initialized");
    }
}

fn is_plain_level(s: &str) -> bool {
    matches!(
        s.to_ascii_lowercase().as_str(),
        "trace" | "debug" | "info" | "warn" | "error"
    )
}
