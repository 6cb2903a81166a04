//! Command modules for the devmentor-engine CLI
//!
//! Each command module implements a single top-level command:
//! - `serve` - Run the HTTP server
//! - `analyze` - Review a file
//! - `ghost_write` - Generate boilerplate
//! - `docs` - Generate documentation
//! - `impact` - Estimate change impact
//! - `detect` - Show detector scores without calling the completion service
//!
//! All command handlers take their `Args` struct from `cli.rs` and a shared
//! `CommandContext` carrying the loaded configuration.

pub mod analyze;
pub mod detect;
pub mod docs;
pub mod ghost_write;
pub mod impact;
pub mod serve;

pub use analyze::run_analyze;
pub use detect::run_detect;
pub use docs::run_docs;
pub use ghost_write::run_ghost_write;
pub use impact::run_impact;
pub use serve::run_serve;

use std::fs;
use std::future::Future;
use std::path::Path;

use serde::Serialize;

use crate::cli::FileArgs;
use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::lang::Lang;
use crate::schema::{CodeSubmission, Outcome};

/// Shared context passed to all command handlers
#[derive(Debug, Clone)]
pub struct CommandContext {
    /// Fully resolved configuration
    pub config: EngineConfig,
    /// Show verbose output
    pub verbose: bool,
}

impl CommandContext {
    pub fn new(config: EngineConfig, verbose: bool) -> Self {
        Self { config, verbose }
    }
}

/// Read a source file and pair it with the claimed (or extension-derived) language
pub fn read_submission(args: &FileArgs) -> Result<CodeSubmission> {
    let code = read_source(&args.path)?;
    let language = match args.lang {
        Some(lang) => lang,
        None => Lang::from_path(&args.path)?,
    };
    Ok(CodeSubmission::new(code, language))
}

fn read_source(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(EngineError::FileNotFound {
            path: path.display().to_string(),
        });
    }
    Ok(fs::read_to_string(path)?)
}

/// Run a future to completion on a fresh tokio runtime
pub fn block_on<F: Future>(future: F) -> Result<F::Output> {
    let runtime = tokio::runtime::Runtime::new().map_err(|e| EngineError::ConfigError {
        message: format!("Failed to create tokio runtime: {}", e),
    })?;
    Ok(runtime.block_on(future))
}

/// Pretty JSON for a capability result; provenance goes to stderr when verbose
pub fn render_outcome<T: Serialize>(ctx: &CommandContext, outcome: Outcome<T>) -> Result<String> {
    if ctx.verbose {
        eprintln!("provenance: {}", outcome.provenance.as_str());
    }
    let json = serde_json::to_string_pretty(&outcome.result).map_err(|e| {
        EngineError::ServerError {
            message: format!("JSON serialization failed: {}", e),
        }
    })?;
    Ok(format!("{}\n", json))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{DocResult, Provenance};
    use std::path::PathBuf;

    #[test]
    fn test_read_submission_infers_language() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("widget.py");
        fs::write(&path, "class Widget:\n    pass\n").unwrap();

        let submission = read_submission(&FileArgs {
            path: path.clone(),
            lang: None,
        })
        .unwrap();
        assert_eq!(submission.language, Lang::Python);
        assert!(submission.code.starts_with("class Widget"));

        let claimed = read_submission(&FileArgs {
            path,
            lang: Some(Lang::Java),
        })
        .unwrap();
        assert_eq!(claimed.language, Lang::Java);
    }

    #[test]
    fn test_read_submission_missing_file() {
        let err = read_submission(&FileArgs {
            path: PathBuf::from("/definitely/not/here.rs"),
            lang: None,
        })
        .unwrap_err();
        assert!(matches!(err, EngineError::FileNotFound { .. }));
    }

    #[test]
    fn test_render_outcome() {
        let ctx = CommandContext::new(EngineConfig::default(), false);
        let out = render_outcome(
            &ctx,
            Outcome::new(
                DocResult {
                    docs: "# Hi".to_string(),
                },
                Provenance::Service,
            ),
        )
        .unwrap();
        assert_eq!(out, "{\n  \"docs\": \"# Hi\"\n}\n");
    }
}
