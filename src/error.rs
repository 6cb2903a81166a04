//! Error types and exit codes for devmentor-engine

use std::process::ExitCode;
use thiserror::Error;

/// Process-level error type for devmentor-engine operations
///
/// Capability failures never surface here: upstream and extraction failures are
/// recovered by the engine's fallback path. This type covers what is left for
/// the binary to report (bad files, bad config, server startup).
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Unsupported language: {name}")]
    UnsupportedLanguage { name: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Server error: {message}")]
    ServerError { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl EngineError {
    /// Convert error to exit code:
    /// - 0: Success
    /// - 1: File not found / IO error
    /// - 2: Unsupported language
    /// - 3: Configuration error
    /// - 4: Server error
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::FileNotFound { .. } => ExitCode::from(1),
            Self::UnsupportedLanguage { .. } => ExitCode::from(2),
            Self::ConfigError { .. } => ExitCode::from(3),
            Self::ServerError { .. } => ExitCode::from(4),
            Self::Io(_) => ExitCode::from(1),
        }
    }
}

/// Failure talking to the completion service
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UpstreamError {
    /// No API key configured; no call was attempted
    #[error("no completion service credential configured")]
    NoCredentials,

    #[error("transport error: {message}")]
    TransportError { message: String },

    #[error("completion service rejected request ({status}): {message}")]
    ServiceRejected { status: u16, message: String },
}

/// Failure turning raw model text into a structured result
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("malformed encoding: {message}")]
    MalformedEncoding { message: String },

    #[error("shape mismatch: {message}")]
    ShapeMismatch { message: String },
}

/// Where in the pipeline a capability request failed before falling back
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FailureStage {
    #[error("upstream: {0}")]
    Upstream(#[from] UpstreamError),

    #[error("extraction: {0}")]
    Extraction(#[from] ExtractionError),
}

/// Result type alias for devmentor-engine operations
pub type Result<T> = std::result::Result<T, EngineError>;
