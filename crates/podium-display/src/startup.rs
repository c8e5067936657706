//! Background startup of the display server.
//!
//! The server binary calls [`spawn_display`] so the HTTP server runs next
//! to the periodic refresh loop.

use std::sync::Arc;

use podium_core::config::ServerConfig;
use tokio::task::JoinHandle;

use crate::server::{ServerError, listen_addr, start_server};
use crate::state::AppState;

/// Errors that can occur when spawning the display server.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    /// The server failed to bind or start.
    #[error("server start error: {0}")]
    Server(#[from] ServerError),
}

/// Spawn the display server on a background Tokio task.
///
/// The address is validated before spawning; bind failures after that
/// are logged by the task. The caller holds the returned handle and
/// aborts it on shutdown.
///
/// # Errors
///
/// Returns [`StartupError::Server`] if the configured address is invalid.
pub fn spawn_display(
    config: ServerConfig,
    state: Arc<AppState>,
) -> Result<JoinHandle<()>, StartupError> {
    let addr = listen_addr(&config)?;

    let handle = tokio::spawn(async move {
        if let Err(e) = start_server(&config, state).await {
            tracing::error!(error = %e, "Display server exited with error");
        }
    });

    tracing::info!(%addr, "Display server spawned on background task");

    Ok(handle)
}
