//! Impact command handler

use crate::cli::FileArgs;
use crate::commands::{block_on, read_submission, render_outcome, CommandContext};
use crate::engine::Engine;

/// Estimate the impact of a file's contents and print the `ImpactReport` as JSON
pub fn run_impact(args: &FileArgs, ctx: &CommandContext) -> crate::Result<String> {
    let request = read_submission(args)?;
    let engine = Engine::from_config(&ctx.config);
    let outcome = block_on(engine.assess_impact(&request))?;
    render_outcome(ctx, outcome)
}
