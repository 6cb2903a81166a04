//! devmentor-engine: code intelligence with a validation and fallback layer
//!
//! The reasoning (review, boilerplate generation, documentation, impact
//! estimation) is delegated to an external chat-completions service. This crate
//! wraps that call:
//!
//! - [`detect`] rejects submissions whose code does not match the claimed language
//! - [`prompt`] builds the instruction/payload pair for each capability
//! - [`gateway`] sends it to the completion service
//! - [`extract`] strips code fences and decodes the reply into typed results
//! - [`fallback`] synthesizes a clearly marked, same-shaped result on any failure
//! - [`engine`] wires the stages together per capability
//!
//! # Example
//!
//! ```ignore
//! use devmentor_engine::{CodeSubmission, Engine, EngineConfig, Lang};
//!
//! let engine = Engine::from_config(&EngineConfig::default());
//! let submission = CodeSubmission::new("def foo():\n    print('x')", Lang::Cpp);
//! let outcome = engine.review(&submission).await;
//! assert_eq!(outcome.result.code_health_score, 0);
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod detect;
pub mod engine;
pub mod error;
pub mod extract;
pub mod fallback;
pub mod gateway;
pub mod lang;
pub mod prompt;
pub mod schema;
pub mod server;

// Re-export commonly used types
pub use config::EngineConfig;
pub use detect::{DetectionThresholds, DetectionVerdict, LanguageDetector, LanguageScoreTable};
pub use engine::Engine;
pub use error::{EngineError, ExtractionError, FailureStage, Result, UpstreamError};
pub use gateway::{CompletionGateway, OpenAiGateway};
pub use lang::Lang;
pub use prompt::Prompt;
pub use schema::{
    AffectedFile, CodeSubmission, DocRequest, DocResult, GeneratedCode, GenerationRequest,
    GraphEdge, GraphNode, ImpactReport, ImpactRequest, Issue, IssueSeverity, NodeKind, Outcome,
    Provenance, ReviewResult, RiskLevel, SecurityIssue, SecuritySeverity, VisualGraph,
};
