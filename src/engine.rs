//! Capability orchestration
//!
//! Every capability runs the same linear pipeline, once per stage:
//!
//! ```text
//! Start -> [Detecting, review only] -> Prompting -> Calling -> Extracting -> Done
//!                                         \____________\___________\
//!                                                                   -> Fallback -> Done
//! ```
//!
//! Stage failures are explicit `Result`s; `Engine::settle` is the single place
//! that routes a failure to the fallback synthesizer. A detector mismatch skips
//! the pipeline and answers with a zero-score review. Callers therefore always
//! get a well-formed result.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tracing::Instrument;
use uuid::Uuid;

use crate::config::EngineConfig;
use crate::detect::{DetectionThresholds, LanguageDetector};
use crate::error::{FailureStage, UpstreamError};
use crate::extract::{extract_code, extract_json, extract_text};
use crate::fallback;
use crate::gateway::{CompletionGateway, OpenAiGateway};
use crate::prompt::{self, Prompt};
use crate::schema::{
    CodeSubmission, DocRequest, DocResult, GeneratedCode, GenerationRequest, ImpactReport,
    ImpactRequest, Outcome, Provenance, ReviewResult,
};

/// Pipeline position of a request, recorded in trace events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Detecting,
    Prompting,
    Calling,
    Extracting,
    Fallback,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Detecting => "detecting",
            Self::Prompting => "prompting",
            Self::Calling => "calling",
            Self::Extracting => "extracting",
            Self::Fallback => "fallback",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

fn enter(stage: Stage) {
    tracing::trace!(stage = %stage, "pipeline stage");
}

/// Orchestrates the four capabilities over a shared gateway
///
/// Holds only immutable state, so one instance serves concurrent requests.
pub struct Engine {
    gateway: Arc<dyn CompletionGateway>,
    detector: LanguageDetector,
    fallback_delay: Duration,
}

impl Engine {
    pub fn new(
        gateway: Arc<dyn CompletionGateway>,
        thresholds: DetectionThresholds,
        fallback_delay: Duration,
    ) -> Self {
        Self {
            gateway,
            detector: LanguageDetector::new(thresholds),
            fallback_delay,
        }
    }

    /// Engine backed by the OpenAI-compatible gateway described by `config`
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(
            Arc::new(OpenAiGateway::new(config.completion.clone())),
            config.detection,
            Duration::from_millis(config.fallback.delay_ms),
        )
    }

    /// Whether a completion credential is configured
    pub fn is_configured(&self) -> bool {
        self.gateway.is_configured()
    }

    /// Bug, performance and security review
    pub async fn review(&self, submission: &CodeSubmission) -> Outcome<ReviewResult> {
        let span = tracing::info_span!(
            "review",
            request_id = %Uuid::new_v4(),
            language = %submission.language
        );

        async {
            enter(Stage::Detecting);
            let verdict = self.detector.detect(&submission.code, submission.language);
            if let Some(message) = verdict.message(submission.language) {
                tracing::info!(%message, "claimed language rejected");
                enter(Stage::Done);
                return Outcome::new(
                    fallback::mismatch_review(submission, message),
                    Provenance::Detector,
                );
            }

            enter(Stage::Prompting);
            let attempt = match self.call(prompt::review(submission)).await {
                Ok(raw) => {
                    enter(Stage::Extracting);
                    extract_json::<ReviewResult>(&raw).map_err(FailureStage::from)
                }
                Err(stage) => Err(stage),
            };

            self.settle("review", attempt, || fallback::review(submission))
                .await
        }
        .instrument(span)
        .await
    }

    /// Boilerplate generation
    pub async fn generate(&self, request: &GenerationRequest) -> Outcome<GeneratedCode> {
        let span = tracing::info_span!(
            "generate",
            request_id = %Uuid::new_v4(),
            language = %request.language
        );

        async {
            enter(Stage::Prompting);
            let attempt = match self.call(prompt::generate(request)).await {
                Ok(raw) => {
                    enter(Stage::Extracting);
                    extract_code(&raw)
                        .map(|code| GeneratedCode { code })
                        .map_err(FailureStage::from)
                }
                Err(stage) => Err(stage),
            };

            self.settle("generate", attempt, || fallback::generate(request))
                .await
        }
        .instrument(span)
        .await
    }

    /// Markdown documentation
    pub async fn document(&self, request: &DocRequest) -> Outcome<DocResult> {
        let span = tracing::info_span!(
            "document",
            request_id = %Uuid::new_v4(),
            language = %request.language
        );

        async {
            enter(Stage::Prompting);
            let attempt = match self.call(prompt::document(request)).await {
                Ok(raw) => {
                    enter(Stage::Extracting);
                    extract_text(&raw)
                        .map(|docs| DocResult { docs })
                        .map_err(FailureStage::from)
                }
                Err(stage) => Err(stage),
            };

            self.settle("document", attempt, || fallback::document(request))
                .await
        }
        .instrument(span)
        .await
    }

    /// Change-impact estimate
    pub async fn assess_impact(&self, request: &ImpactRequest) -> Outcome<ImpactReport> {
        let span = tracing::info_span!(
            "impact",
            request_id = %Uuid::new_v4(),
            language = %request.language
        );

        async {
            enter(Stage::Prompting);
            let attempt = match self.call(prompt::impact(request)).await {
                Ok(raw) => {
                    enter(Stage::Extracting);
                    extract_json::<ImpactReport>(&raw).map_err(FailureStage::from)
                }
                Err(stage) => Err(stage),
            };

            self.settle("impact", attempt, || fallback::impact(request))
                .await
        }
        .instrument(span)
        .await
    }

    async fn call(&self, prompt: Prompt) -> Result<String, FailureStage> {
        enter(Stage::Calling);
        self.gateway
            .complete(&prompt)
            .await
            .map_err(FailureStage::from)
    }

    /// Route a pipeline attempt to its final result
    async fn settle<T, F>(
        &self,
        capability: &'static str,
        attempt: Result<T, FailureStage>,
        synthesize: F,
    ) -> Outcome<T>
    where
        F: FnOnce() -> T,
    {
        match attempt {
            Ok(result) => {
                enter(Stage::Done);
                Outcome::new(result, Provenance::Service)
            }
            Err(stage) => {
                enter(Stage::Fallback);
                match &stage {
                    FailureStage::Upstream(UpstreamError::NoCredentials) => {
                        tracing::debug!(capability, "no credential configured, synthesizing result");
                    }
                    _ => {
                        tracing::warn!(capability, error = %stage, "falling back to synthesized result");
                    }
                }

                if !self.fallback_delay.is_zero() {
                    tokio::time::sleep(self.fallback_delay).await;
                }

                enter(Stage::Done);
                Outcome::new(synthesize(), Provenance::Fallback)
            }
        }
    }
}
