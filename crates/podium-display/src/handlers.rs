//! Read-only endpoint handlers for display screens.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/` | HTML board with every stage |
//! | `GET` | `/api/competition` | Competition name and entity counts |
//! | `GET` | `/api/stages` | Current view of every stage |
//! | `GET` | `/api/stages/{id}` | Stage configuration and sorted timeline |
//! | `GET` | `/api/stages/{id}/current` | Current view of one stage |
//! | `GET` | `/api/teams` | Teams with category and player names |
//! | `GET` | `/api/menu` | Bar menu grouped by section |

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::response::{Html, IntoResponse};
use podium_core::document::{CompetitionDocument, apparatus_order_of, sorted_timeline_of};
use podium_core::timeline::total_budget;
use podium_types::{MenuItem, MenuSection, StageId};
use uuid::Uuid;

use crate::board::Board;
use crate::error::DisplayError;
use crate::state::{AppState, StageView};

/// Query parameters for the `GET /api/menu` endpoint.
#[derive(Debug, serde::Deserialize)]
pub struct MenuQuery {
    /// Include items that are currently unavailable.
    pub all: Option<bool>,
}

// ---------------------------------------------------------------------------
// GET / -- HTML board
// ---------------------------------------------------------------------------

/// Serve an HTML board listing every stage with its current event and
/// status line. Screens that can run scripts use `/ws/stages` instead.
pub async fn index(State(state): State<Arc<AppState>>) -> Result<Html<String>, DisplayError> {
    let title = state.document.read().await.name.clone();
    let views = state.stage_views().await;
    Board::new()?.render(&title, &views).map(Html)
}

// ---------------------------------------------------------------------------
// GET /api/competition
// ---------------------------------------------------------------------------

/// Competition name and entity counts.
pub async fn get_competition(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let doc = state.document.read().await;
    Json(serde_json::json!({
        "name": doc.name,
        "stages": doc.stages.len(),
        "teams": doc.teams.len(),
        "players": doc.players.len(),
        "categories": doc.categories.len(),
        "menuItems": doc.bar_menu.len(),
    }))
}

// ---------------------------------------------------------------------------
// GET /api/stages
// ---------------------------------------------------------------------------

/// Current view of every stage.
pub async fn list_stages(State(state): State<Arc<AppState>>) -> Json<Vec<StageView>> {
    Json(state.stage_views().await)
}

// ---------------------------------------------------------------------------
// GET /api/stages/{id}
// ---------------------------------------------------------------------------

/// Stage configuration: apparatus order, sorted timeline and progress.
pub async fn get_stage(
    State(state): State<Arc<AppState>>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, DisplayError> {
    let stage_id = parse_stage_id(&id_str)?;
    let doc = state.document.read().await;
    let stage = doc
        .stage(stage_id)
        .ok_or_else(|| DisplayError::NotFound(format!("stage {stage_id}")))?;

    let timeline: Vec<serde_json::Value> = sorted_timeline_of(&*doc, stage_id)
        .into_iter()
        .map(|(id, event)| {
            let mut value = serde_json::to_value(event)?;
            if let Some(object) = value.as_object_mut() {
                object.insert("id".to_owned(), serde_json::json!(id));
            }
            Ok(value)
        })
        .collect::<Result<_, serde_json::Error>>()?;

    Ok(Json(serde_json::json!({
        "id": stage_id,
        "name": stage.name,
        "timelineStartDate": stage
            .timeline_start_date
            .format(podium_types::timestamp::FORMAT)
            .to_string(),
        "progress": stage.progress,
        "totalBudget": total_budget(stage),
        "apparatusOrder": apparatus_order_of(&*doc, stage_id),
        "timeline": timeline,
    })))
}

// ---------------------------------------------------------------------------
// GET /api/stages/{id}/current
// ---------------------------------------------------------------------------

/// Current view of one stage.
pub async fn get_current(
    State(state): State<Arc<AppState>>,
    Path(id_str): Path<String>,
) -> Result<Json<StageView>, DisplayError> {
    let stage_id = parse_stage_id(&id_str)?;
    state
        .stage_view(stage_id)
        .await
        .map(Json)
        .ok_or_else(|| DisplayError::NotFound(format!("stage {stage_id}")))
}

// ---------------------------------------------------------------------------
// GET /api/teams
// ---------------------------------------------------------------------------

/// All registered teams with their category and player names.
pub async fn list_teams(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let doc = state.document.read().await;

    let teams: Vec<serde_json::Value> = doc
        .teams
        .iter()
        .map(|(id, team)| {
            let category = team
                .category
                .and_then(|c| doc.categories.get(&c))
                .map(|c| c.name.clone());
            let players: Vec<String> = team
                .players
                .iter()
                .filter_map(|p| doc.player(*p))
                .map(podium_types::Player::full_name)
                .collect();
            serde_json::json!({
                "id": id,
                "name": team.name,
                "category": category,
                "players": players,
            })
        })
        .collect();

    Json(serde_json::json!({
        "count": teams.len(),
        "teams": teams,
    }))
}

// ---------------------------------------------------------------------------
// GET /api/menu
// ---------------------------------------------------------------------------

/// The bar menu grouped by section, in document order within a section.
///
/// # Query Parameters
///
/// - `all`: include unavailable items (default: `false`)
pub async fn get_menu(
    State(state): State<Arc<AppState>>,
    Query(params): Query<MenuQuery>,
) -> Json<BTreeMap<MenuSection, Vec<MenuItem>>> {
    let include_unavailable = params.all.unwrap_or(false);
    let doc = state.document.read().await;

    let mut sections: BTreeMap<MenuSection, Vec<MenuItem>> = BTreeMap::new();
    for item in doc
        .bar_menu
        .iter()
        .filter(|item| include_unavailable || item.available)
    {
        sections.entry(item.section).or_default().push(item.clone());
    }
    Json(sections)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Parse a stage id from a path segment.
pub(crate) fn parse_stage_id(s: &str) -> Result<StageId, DisplayError> {
    parse_uuid(s).map(StageId::from)
}

/// Parse a UUID from a path segment.
pub(crate) fn parse_uuid(s: &str) -> Result<Uuid, DisplayError> {
    s.parse::<Uuid>()
        .map_err(|e| DisplayError::InvalidUuid(format!("{s}: {e}")))
}
