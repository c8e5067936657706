//! Display and operator API server for Podium.
//!
//! This crate provides an Axum HTTP server that exposes:
//!
//! - **`WebSocket` endpoint** (`/ws/stages`) streaming a [`StageView`]
//!   whenever a stage changes or the periodic refresh runs
//! - **REST endpoints** for display screens: stage views, stage
//!   configuration, teams and the bar menu
//! - **Operator endpoints** for stepping progress and editing timelines
//! - **HTML board** (`GET /`) listing every stage
//!
//! The competition document lives in [`AppState`] behind a
//! [`tokio::sync::RwLock`]; every view is resolved from it on demand.
//!
//! [`StageView`]: state::StageView

pub mod board;
pub mod error;
pub mod handlers;
pub mod operator;
pub mod router;
pub mod server;
pub mod startup;
pub mod state;
pub mod ws;

// Re-export primary types for convenience.
pub use error::DisplayError;
pub use router::build_router;
pub use server::{ServerError, start_server};
pub use startup::{StartupError, spawn_display};
pub use state::{AppState, StageView, build_stage_view};
