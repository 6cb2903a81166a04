//! Shared state for HTTP handlers

use std::sync::Arc;

use crate::engine::Engine;

/// Handler state; cloned per request, holds no mutable data
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<Engine>,
    pub version: &'static str,
}

impl AppState {
    pub fn new(engine: Arc<Engine>) -> Self {
        Self {
            engine,
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}
