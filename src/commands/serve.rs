//! Serve command handler
//!
//! Builds the engine once from the resolved configuration and runs the HTTP
//! server until shutdown.

use std::sync::Arc;

use crate::cli::ServeArgs;
use crate::commands::{block_on, CommandContext};
use crate::engine::Engine;
use crate::server::Server;

/// Run the HTTP server
pub fn run_serve(args: &ServeArgs, ctx: &CommandContext) -> crate::Result<String> {
    let mut server_config = ctx.config.server.clone();
    if let Some(host) = &args.host {
        server_config.host = host.clone();
    }
    if let Some(port) = args.port {
        server_config.port = port;
    }

    let engine = Arc::new(Engine::from_config(&ctx.config));
    tracing::info!(
        model = %ctx.config.completion.model,
        configured = engine.is_configured(),
        "completion service"
    );

    block_on(Server::new(server_config, engine).run())??;

    // Server exits cleanly - no output needed
    Ok(String::new())
}
