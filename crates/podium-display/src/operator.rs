//! Operator endpoints: the buttons at the judges' table.
//!
//! Every mutation takes the document write lock, applies one change to a
//! single stage, then rebuilds and broadcasts that stage's view before
//! releasing the lock. Concurrent operators are last-write-wins.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/api/operator/stages/{id}/advance` | Step progress forward |
//! | `POST` | `/api/operator/stages/{id}/retreat` | Step progress back |
//! | `POST` | `/api/operator/stages/{id}/reset` | Clear progress |
//! | `POST` | `/api/operator/stages/{id}/rotations` | Append a rotation |
//! | `POST` | `/api/operator/stages/{id}/pauses` | Append a pause |
//! | `POST` | `/api/operator/stages/{id}/assignments` | Put a team on an apparatus |
//! | `DELETE` | `/api/operator/stages/{id}/events/{event_id}` | Remove a timeline entry |
//! | `PUT` | `/api/operator/stages/{id}/apparatuses` | Replace the apparatus set |

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use podium_core::duration::parse_duration_minutes;
use podium_core::progress;
use podium_core::schedule;
use podium_types::{Apparatus, Stage, StageId, TeamId, TimelineEventId};
use tracing::info;

use crate::error::DisplayError;
use crate::handlers::{parse_stage_id, parse_uuid};
use crate::state::{AppState, StageView, build_stage_view};

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for appending a rotation or a pause.
#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DurationRequest {
    /// Duration as typed by the operator; coerced to whole minutes.
    pub duration_in_minutes: String,
}

/// Request body for `POST .../assignments`.
#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentRequest {
    /// Rotation to change.
    pub event_id: TimelineEventId,
    /// Apparatus the team starts on.
    pub apparatus: Apparatus,
    /// Team to assign.
    pub team_id: TeamId,
}

/// Request body for `PUT .../apparatuses`.
#[derive(Debug, serde::Deserialize)]
pub struct ApparatusesRequest {
    /// Configured apparatus with their order integer.
    pub apparatuses: BTreeMap<Apparatus, u32>,
}

/// Response of every operator mutation.
#[derive(Debug, serde::Serialize)]
pub struct OperatorResponse {
    /// Whether the operation succeeded.
    pub ok: bool,
    /// Human-readable message.
    pub message: String,
    /// The stage view after the change, as broadcast to screens.
    pub stage: StageView,
}

/// Apply `change` to one stage, then rebuild and broadcast its view.
async fn mutate_stage<F>(
    state: &AppState,
    stage_id: StageId,
    change: F,
) -> Result<Json<OperatorResponse>, DisplayError>
where
    F: FnOnce(&mut Stage) -> Result<String, DisplayError>,
{
    // Publish while still holding the write lock so screens see views in
    // the order the changes were applied.
    let (message, view, receivers) = {
        let mut doc = state.document.write().await;
        let stage = doc
            .stages
            .get_mut(&stage_id)
            .ok_or_else(|| DisplayError::NotFound(format!("stage {stage_id}")))?;
        let message = change(stage)?;
        let view = build_stage_view(&doc, stage_id, state.clock.now(), state.locale)
            .ok_or_else(|| DisplayError::Internal(format!("stage {stage_id} vanished")))?;
        let receivers = state.broadcast(&view);
        (message, view, receivers)
    };

    info!(
        stage = %view.name,
        progress = ?view.progress,
        current = view.current.kind(),
        receivers,
        "{message}"
    );

    Ok(Json(OperatorResponse {
        ok: true,
        message,
        stage: view,
    }))
}

// ---------------------------------------------------------------------------
// Progress
// ---------------------------------------------------------------------------

/// Step the stage's progress forward by one tick.
pub async fn advance(
    State(state): State<Arc<AppState>>,
    Path(id_str): Path<String>,
) -> Result<Json<OperatorResponse>, DisplayError> {
    let stage_id = parse_stage_id(&id_str)?;
    mutate_stage(&state, stage_id, |stage| {
        stage.progress = progress::advance(stage.progress);
        Ok("Progress advanced".to_owned())
    })
    .await
}

/// Step the stage's progress back by one tick.
pub async fn retreat(
    State(state): State<Arc<AppState>>,
    Path(id_str): Path<String>,
) -> Result<Json<OperatorResponse>, DisplayError> {
    let stage_id = parse_stage_id(&id_str)?;
    mutate_stage(&state, stage_id, |stage| {
        stage.progress = progress::retreat(stage.progress);
        Ok("Progress retreated".to_owned())
    })
    .await
}

/// Clear the stage's progress so it shows the start screen again.
pub async fn reset(
    State(state): State<Arc<AppState>>,
    Path(id_str): Path<String>,
) -> Result<Json<OperatorResponse>, DisplayError> {
    let stage_id = parse_stage_id(&id_str)?;
    mutate_stage(&state, stage_id, |stage| {
        stage.progress = None;
        Ok("Progress reset".to_owned())
    })
    .await
}

// ---------------------------------------------------------------------------
// Timeline editing
// ---------------------------------------------------------------------------

/// Append a rotation with empty assignments.
pub async fn add_rotation(
    State(state): State<Arc<AppState>>,
    Path(id_str): Path<String>,
    Json(body): Json<DurationRequest>,
) -> Result<Json<OperatorResponse>, DisplayError> {
    let stage_id = parse_stage_id(&id_str)?;
    let minutes = parse_duration_minutes(&body.duration_in_minutes);
    mutate_stage(&state, stage_id, |stage| {
        let id = schedule::add_rotation(stage, minutes);
        Ok(format!("Rotation {id} added ({minutes} min)"))
    })
    .await
}

/// Append a pause.
pub async fn add_pause(
    State(state): State<Arc<AppState>>,
    Path(id_str): Path<String>,
    Json(body): Json<DurationRequest>,
) -> Result<Json<OperatorResponse>, DisplayError> {
    let stage_id = parse_stage_id(&id_str)?;
    let minutes = parse_duration_minutes(&body.duration_in_minutes);
    mutate_stage(&state, stage_id, |stage| {
        let id = schedule::add_pause(stage, minutes);
        Ok(format!("Pause {id} added ({minutes} min)"))
    })
    .await
}

/// Put a registered team on an apparatus of a stored rotation.
pub async fn assign_team(
    State(state): State<Arc<AppState>>,
    Path(id_str): Path<String>,
    Json(body): Json<AssignmentRequest>,
) -> Result<Json<OperatorResponse>, DisplayError> {
    let stage_id = parse_stage_id(&id_str)?;
    if !state.document.read().await.teams.contains_key(&body.team_id) {
        return Err(DisplayError::NotFound(format!("team {}", body.team_id)));
    }
    mutate_stage(&state, stage_id, |stage| {
        let added = schedule::assign_team(stage, body.event_id, body.apparatus, body.team_id)?;
        Ok(if added {
            format!("Team {} assigned", body.team_id)
        } else {
            format!("Team {} was already assigned", body.team_id)
        })
    })
    .await
}

/// Remove a rotation or pause from the timeline.
pub async fn remove_event(
    State(state): State<Arc<AppState>>,
    Path((id_str, event_str)): Path<(String, String)>,
) -> Result<Json<OperatorResponse>, DisplayError> {
    let stage_id = parse_stage_id(&id_str)?;
    let event_id = TimelineEventId::from(parse_uuid(&event_str)?);
    mutate_stage(&state, stage_id, |stage| {
        schedule::remove_event(stage, event_id)?;
        Ok(format!("Timeline event {event_id} removed"))
    })
    .await
}

/// Replace the stage's apparatus configuration, backfilling rotations.
pub async fn set_apparatuses(
    State(state): State<Arc<AppState>>,
    Path(id_str): Path<String>,
    Json(body): Json<ApparatusesRequest>,
) -> Result<Json<OperatorResponse>, DisplayError> {
    let stage_id = parse_stage_id(&id_str)?;
    mutate_stage(&state, stage_id, |stage| {
        let backfilled = schedule::reconfigure_apparatuses(stage, body.apparatuses);
        Ok(format!(
            "Apparatus configuration updated ({backfilled} entries backfilled)"
        ))
    })
    .await
}
