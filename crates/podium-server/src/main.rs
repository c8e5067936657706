//! Server binary for the Podium competition organizer.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `podium-config.yaml`
//! 2. Initialize structured logging (tracing)
//! 3. Load the competition document
//! 4. Spawn the display server
//! 5. Rebroadcast every stage view on a fixed interval until Ctrl-C

mod error;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use podium_core::clock::SystemClock;
use podium_core::config::PodiumConfig;
use podium_core::document::load_document;
use podium_display::state::AppState;
use podium_types::Competition;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::ServerAppError;

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration, the document or the display server
/// cannot be set up.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Config first so its log level can seed the filter; RUST_LOG wins.
    let config = load_config()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .init();

    info!(
        host = config.server.host,
        port = config.server.port,
        locale = ?config.display.locale,
        refresh_interval_ms = config.display.refresh_interval_ms,
        document = %config.document.path.display(),
        "podium-server starting"
    );

    let document = load_competition(&config.document.path)?;
    info!(
        name = document.name,
        stages = document.stages.len(),
        teams = document.teams.len(),
        "Competition document loaded"
    );

    let state = Arc::new(AppState::new(
        document,
        Arc::new(SystemClock),
        config.display.locale,
    ));
    let display_handle =
        podium_display::spawn_display(config.server.clone(), Arc::clone(&state))
            .map_err(ServerAppError::from)?;

    // Zero would make the interval panic.
    let period = Duration::from_millis(config.display.refresh_interval_ms.max(1));
    let mut refresh = tokio::time::interval(period);

    loop {
        tokio::select! {
            _ = refresh.tick() => {
                state.refresh().await;
            }
            result = tokio::signal::ctrl_c() => {
                if let Err(e) = result {
                    warn!(error = %e, "Failed to listen for Ctrl-C, shutting down");
                }
                break;
            }
        }
    }

    info!("Shutting down display server");
    display_handle.abort();
    Ok(())
}

/// Load configuration from `podium-config.yaml` in the working directory,
/// falling back to defaults when the file does not exist.
fn load_config() -> Result<PodiumConfig, ServerAppError> {
    let config_path = Path::new("podium-config.yaml");
    if config_path.exists() {
        Ok(PodiumConfig::from_file(config_path)?)
    } else {
        let mut config = PodiumConfig::default();
        config.apply_env_overrides();
        Ok(config)
    }
}

/// Load the competition document. A missing file starts an empty
/// competition; an unreadable or invalid one is an error.
fn load_competition(path: &Path) -> Result<Competition, ServerAppError> {
    if path.exists() {
        Ok(load_document(path)?)
    } else {
        warn!(path = %path.display(), "Competition document not found, starting empty");
        Ok(Competition::default())
    }
}
