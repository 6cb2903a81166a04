//! devmentor-engine CLI entry point

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use devmentor_engine::cli::{Cli, Commands};
use devmentor_engine::commands::{
    run_analyze, run_detect, run_docs, run_ghost_write, run_impact, run_serve, CommandContext,
};
use devmentor_engine::EngineConfig;

fn main() -> ExitCode {
    match run() {
        Ok(output) => {
            print!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            e.exit_code()
        }
    }
}

fn run() -> devmentor_engine::Result<String> {
    let cli = Cli::parse();

    let mut config = EngineConfig::load(cli.config.as_deref())?;
    if cli.offline {
        config.completion.api_key = None;
    }

    init_tracing(&config.logging.level, cli.verbose);

    let ctx = CommandContext::new(config, cli.verbose);
    match &cli.command {
        Commands::Serve(args) => run_serve(args, &ctx),
        Commands::Analyze(args) => run_analyze(args, &ctx),
        Commands::GhostWrite(args) => run_ghost_write(args, &ctx),
        Commands::Docs(args) => run_docs(args, &ctx),
        Commands::Impact(args) => run_impact(args, &ctx),
        Commands::Detect(args) => run_detect(args, &ctx),
    }
}

/// Logs go to stderr; `RUST_LOG` takes precedence over the configured level
fn init_tracing(level: &str, verbose: bool) {
    let level = if verbose { "debug" } else { level };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("devmentor_engine={},tower_http={}", level, level)));

    // Note: This may fail if already initialized, which is fine
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
