//! Display server lifecycle.
//!
//! [`start_server`] binds the configured address and serves the router
//! until the task is aborted or the listener fails.

use std::net::SocketAddr;
use std::sync::Arc;

use podium_core::config::ServerConfig;
use tokio::net::TcpListener;
use tracing::info;

use crate::router::build_router;
use crate::state::AppState;

/// Errors that can occur when starting or running the display server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Host and port do not form a socket address.
    #[error("invalid listen address {address}: {source}")]
    InvalidAddress {
        /// The rejected `host:port` string.
        address: String,
        /// The parse failure.
        source: std::net::AddrParseError,
    },

    /// The listener could not be bound.
    #[error("bind failed on {addr}: {source}")]
    Bind {
        /// The address that was requested.
        addr: SocketAddr,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The server stopped with an I/O error.
    #[error("serve error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Socket address for the configured host and port.
///
/// # Errors
///
/// Returns [`ServerError::InvalidAddress`] for a host that is not an IP
/// address.
pub fn listen_addr(config: &ServerConfig) -> Result<SocketAddr, ServerError> {
    let address = format!("{}:{}", config.host, config.port);
    address
        .parse()
        .map_err(|source| ServerError::InvalidAddress { address, source })
}

/// Bind the configured address and serve the display router.
///
/// # Errors
///
/// Returns an error if the address is invalid, the listener cannot bind,
/// or serving fails.
pub async fn start_server(config: &ServerConfig, state: Arc<AppState>) -> Result<(), ServerError> {
    let addr = listen_addr(config)?;
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;

    info!(%addr, "Display server listening");
    axum::serve(listener, build_router(state))
        .await
        .map_err(ServerError::Serve)
}
