//! Common test utilities for devmentor-engine integration tests
//!
//! This module provides:
//! - `ScriptedGateway`, a completion gateway that replays canned replies
//! - Helpers for building an engine/router around it and issuing requests

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use devmentor_engine::server::{create_router, AppState, PROVENANCE_HEADER};
use devmentor_engine::{CompletionGateway, DetectionThresholds, Engine, Prompt, UpstreamError};

/// Gateway that returns queued replies in order and records every prompt
///
/// Once the queue is empty every call fails with `NoCredentials`.
#[derive(Default)]
pub struct ScriptedGateway {
    replies: Mutex<VecDeque<Result<String, UpstreamError>>>,
    prompts: Mutex<Vec<Prompt>>,
}

impl ScriptedGateway {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn replying(reply: &str) -> Arc<Self> {
        let gateway = Self::new();
        gateway.push(Ok(reply.to_string()));
        gateway
    }

    pub fn failing(error: UpstreamError) -> Arc<Self> {
        let gateway = Self::new();
        gateway.push(Err(error));
        gateway
    }

    pub fn push(&self, reply: Result<String, UpstreamError>) {
        self.replies.lock().unwrap().push_back(reply);
    }

    pub fn prompts(&self) -> Vec<Prompt> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl CompletionGateway for ScriptedGateway {
    async fn complete(&self, prompt: &Prompt) -> Result<String, UpstreamError> {
        self.prompts.lock().unwrap().push(prompt.clone());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(UpstreamError::NoCredentials))
    }

    fn is_configured(&self) -> bool {
        true
    }
}

/// Engine over `gateway` with default thresholds and no fallback delay
pub fn engine_with(gateway: Arc<ScriptedGateway>) -> Engine {
    Engine::new(gateway, DetectionThresholds::default(), Duration::ZERO)
}

/// Router over `gateway`
pub fn router_with(gateway: Arc<ScriptedGateway>) -> Router {
    create_router(AppState::new(Arc::new(engine_with(gateway))))
}

/// Response pieces the tests look at
pub struct TestResponse {
    pub status: StatusCode,
    pub provenance: Option<String>,
    pub body: Value,
    pub text: String,
}

pub async fn send(app: Router, request: Request<Body>) -> TestResponse {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let provenance = response
        .headers()
        .get(PROVENANCE_HEADER)
        .map(|v| v.to_str().unwrap().to_string());
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8_lossy(&bytes).to_string();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

    TestResponse {
        status,
        provenance,
        body,
        text,
    }
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> TestResponse {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn get(app: Router, uri: &str) -> TestResponse {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

/// Sorted key names of a JSON object
pub fn keys(value: &Value) -> Vec<String> {
    let mut keys: Vec<String> = value
        .as_object()
        .map(|o| o.keys().cloned().collect())
        .unwrap_or_default();
    keys.sort();
    keys
}
