//! HTTP surface for the engine
//!
//! Four JSON endpoints, one per capability, plus liveness routes:
//!
//! | Route | Body | Response |
//! |---|---|---|
//! | `POST /api/analyze` | `{code, language}` | `ReviewResult` |
//! | `POST /api/ghost-write` | `{prompt, language}` | `GeneratedCode` |
//! | `POST /api/generate-docs` | `{code, language}` | `DocResult` |
//! | `POST /api/impact-analysis` | `{code, language}` | `ImpactReport` |
//!
//! Capability responses carry an `x-devmentor-provenance` header
//! (`service`, `fallback` or `detector`); the body shape does not depend on it.

pub mod routes;
pub mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::engine::Engine;
use crate::error::{EngineError, Result};

pub use routes::{create_router, PROVENANCE_HEADER};
pub use state::AppState;

/// Engine HTTP server
pub struct Server {
    config: ServerConfig,
    engine: Arc<Engine>,
}

impl Server {
    pub fn new(config: ServerConfig, engine: Arc<Engine>) -> Self {
        Self { config, engine }
    }

    fn listen_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.config.host, self.config.port)
            .parse()
            .map_err(|e| EngineError::ConfigError {
                message: format!(
                    "Invalid listen address {}:{}: {}",
                    self.config.host, self.config.port, e
                ),
            })
    }

    /// Bind and serve until Ctrl+C or SIGTERM
    pub async fn run(self) -> Result<()> {
        let addr = self.listen_addr()?;
        let configured = self.engine.is_configured();
        let app = create_router(AppState::new(self.engine));

        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| EngineError::ServerError {
                message: format!("Failed to bind {}: {}", addr, e),
            })?;

        tracing::info!(
            "devmentor-engine v{} listening on {}",
            env!("CARGO_PKG_VERSION"),
            addr
        );
        if !configured {
            tracing::warn!("No completion credential configured; all requests use fallback results");
        }

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| EngineError::ServerError {
                message: e.to_string(),
            })?;

        tracing::info!("devmentor-engine shutting down");
        Ok(())
    }
}

/// Resolves on Ctrl+C or, on unix, SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received terminate signal, initiating graceful shutdown");
        }
    }
}
