//! Ghost-write command handler - boilerplate generation

use crate::cli::GhostWriteArgs;
use crate::commands::{block_on, render_outcome, CommandContext};
use crate::engine::Engine;
use crate::schema::GenerationRequest;

/// Generate boilerplate and print the `GeneratedCode` as JSON
pub fn run_ghost_write(args: &GhostWriteArgs, ctx: &CommandContext) -> crate::Result<String> {
    let request = GenerationRequest {
        prompt: args.prompt.clone(),
        language: args.lang,
    };

    let engine = Engine::from_config(&ctx.config);
    let outcome = block_on(engine.generate(&request))?;
    render_outcome(ctx, outcome)
}
