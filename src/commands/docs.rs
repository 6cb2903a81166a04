//! Docs command handler

use crate::cli::FileArgs;
use crate::commands::{block_on, read_submission, render_outcome, CommandContext};
use crate::engine::Engine;

/// Document a file and print the `DocResult` as JSON
pub fn run_docs(args: &FileArgs, ctx: &CommandContext) -> crate::Result<String> {
    let request = read_submission(args)?;
    let engine = Engine::from_config(&ctx.config);
    let outcome = block_on(engine.document(&request))?;
    render_outcome(ctx, outcome)
}
