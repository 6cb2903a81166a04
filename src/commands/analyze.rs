//! Analyze command handler - review a single file

use crate::cli::FileArgs;
use crate::commands::{block_on, read_submission, render_outcome, CommandContext};
use crate::engine::Engine;

/// Review a file and print the `ReviewResult` as JSON
pub fn run_analyze(args: &FileArgs, ctx: &CommandContext) -> crate::Result<String> {
    let submission = read_submission(args)?;

    if ctx.verbose {
        eprintln!(
            "Reviewing {} as {} ({} bytes)",
            args.path.display(),
            submission.language,
            submission.code.len()
        );
    }

    let engine = Engine::from_config(&ctx.config);
    let outcome = block_on(engine.review(&submission))?;
    render_outcome(ctx, outcome)
}
