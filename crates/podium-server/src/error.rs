//! Error types for the server binary.

/// Top-level error for the server binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum ServerAppError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: podium_core::config::ConfigError,
    },

    /// The competition document exists but could not be loaded.
    #[error("document error: {source}")]
    Document {
        /// The underlying document error.
        #[from]
        source: podium_core::document::DocumentError,
    },

    /// The display server failed to start.
    #[error("display error: {source}")]
    Display {
        /// The underlying startup error.
        #[from]
        source: podium_display::StartupError,
    },
}
