//! Axum router construction for the display server.
//!
//! Assembles all routes (REST + `WebSocket`) into a single [`Router`]
//! with CORS middleware enabled so organizer UIs on other origins can
//! reach the operator endpoints.

use std::sync::Arc;

use axum::Router;
use axum::routing::{delete, get, post, put};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::{handlers, operator, ws};

/// Build the complete Axum router.
///
/// Read routes:
/// - `GET /` -- HTML board
/// - `GET /ws/stages` -- `WebSocket` stage view stream
/// - `GET /api/competition`, `/api/stages`, `/api/stages/{id}`,
///   `/api/stages/{id}/current`, `/api/teams`, `/api/menu`
///
/// Operator routes live under `/api/operator/stages/{id}/`.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Board
        .route("/", get(handlers::index))
        // WebSocket
        .route("/ws/stages", get(ws::ws_stages))
        // Read API
        .route("/api/competition", get(handlers::get_competition))
        .route("/api/stages", get(handlers::list_stages))
        .route("/api/stages/{id}", get(handlers::get_stage))
        .route("/api/stages/{id}/current", get(handlers::get_current))
        .route("/api/teams", get(handlers::list_teams))
        .route("/api/menu", get(handlers::get_menu))
        // Operator API
        .route("/api/operator/stages/{id}/advance", post(operator::advance))
        .route("/api/operator/stages/{id}/retreat", post(operator::retreat))
        .route("/api/operator/stages/{id}/reset", post(operator::reset))
        .route(
            "/api/operator/stages/{id}/rotations",
            post(operator::add_rotation),
        )
        .route("/api/operator/stages/{id}/pauses", post(operator::add_pause))
        .route(
            "/api/operator/stages/{id}/assignments",
            post(operator::assign_team),
        )
        .route(
            "/api/operator/stages/{id}/events/{event_id}",
            delete(operator::remove_event),
        )
        .route(
            "/api/operator/stages/{id}/apparatuses",
            put(operator::set_apparatuses),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
