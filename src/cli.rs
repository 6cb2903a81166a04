//! CLI argument definitions using clap with subcommand architecture

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::lang::Lang;

/// Code review, generation, documentation and impact estimation
#[derive(Parser, Debug)]
#[command(name = "devmentor-engine")]
#[command(about = "Code intelligence backed by a completion service, with deterministic offline fallbacks")]
#[command(version)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Path to a TOML config file (default: ~/.config/devmentor/config.toml if present)
    #[arg(long, value_name = "PATH", global = true, env = "DEVMENTOR_CONFIG")]
    pub config: Option<PathBuf>,

    /// Ignore any configured credential and always use fallback results
    #[arg(long, global = true)]
    pub offline: bool,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server
    Serve(ServeArgs),

    /// Review a file for bugs, complexity and security issues
    #[command(visible_alias = "a")]
    Analyze(FileArgs),

    /// Generate boilerplate from a description
    #[command(name = "ghost-write", visible_alias = "g")]
    GhostWrite(GhostWriteArgs),

    /// Generate markdown documentation for a file
    Docs(FileArgs),

    /// Estimate the impact of a change
    Impact(FileArgs),

    /// Show language signature scores and the detector verdict
    Detect(FileArgs),
}

/// Arguments for the serve command
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Address to bind (overrides config)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind (overrides config and PORT)
    #[arg(short, long)]
    pub port: Option<u16>,
}

/// Arguments for commands operating on a source file
#[derive(Args, Debug)]
pub struct FileArgs {
    /// Source file to read
    #[arg(value_name = "FILE")]
    pub path: PathBuf,

    /// Claimed language (defaults to the file extension)
    #[arg(short, long, value_name = "LANG", value_parser = parse_lang)]
    pub lang: Option<Lang>,
}

/// Arguments for the ghost-write command
#[derive(Args, Debug)]
pub struct GhostWriteArgs {
    /// What to generate
    #[arg(value_name = "PROMPT")]
    pub prompt: String,

    /// Target language
    #[arg(short, long, value_name = "LANG", value_parser = parse_lang)]
    pub lang: Lang,
}

fn parse_lang(value: &str) -> Result<Lang, String> {
    Lang::from_name(value).map_err(|e| e.to_string())
}
