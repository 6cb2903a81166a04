//! Detect command handler
//!
//! Runs only the language detector; never contacts the completion service.

use std::fmt::Write;

use crate::cli::FileArgs;
use crate::commands::{read_submission, CommandContext};
use crate::detect::{DetectionVerdict, LanguageDetector, LanguageScoreTable};
use crate::lang::Lang;

/// Print the signature score table and the verdict for the claimed language
pub fn run_detect(args: &FileArgs, ctx: &CommandContext) -> crate::Result<String> {
    let submission = read_submission(args)?;
    let detector = LanguageDetector::new(ctx.config.detection);
    let scores = LanguageScoreTable::compute(&submission.code);
    let verdict = detector.verdict(&scores, submission.language);

    Ok(format_report(&scores, submission.language, &verdict))
}

fn format_report(scores: &LanguageScoreTable, claimed: Lang, verdict: &DetectionVerdict) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<12} score", "language");
    for (lang, score) in scores.iter() {
        let _ = writeln!(out, "{:<12} {}", lang.name(), score);
    }
    let _ = writeln!(out, "claimed: {}", claimed);

    match verdict.message(claimed) {
        None => {
            let _ = writeln!(out, "verdict: valid");
        }
        Some(message) => {
            let _ = writeln!(out, "verdict: mismatch");
            let _ = writeln!(out, "{}", message);
        }
    }
    out
}
