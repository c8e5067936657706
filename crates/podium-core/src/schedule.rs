//! Editing operations on a stage timeline.
//!
//! These are the mutations the organizer UI performs on the shared
//! document: appending rotations and pauses, assigning teams, removing
//! entries and changing the apparatus set of a stage. The resolver never
//! calls them; it only reads what they leave behind.

use std::collections::BTreeMap;

use podium_types::{
    Apparatus, ApparatusAssignment, Pause, Rotation, Stage, TeamId, TimelineEvent, TimelineEventId,
};
use tracing::debug;

use crate::timeline::stage_apparatuses;

/// Errors from timeline editing.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ScheduleError {
    /// No timeline entry with this id exists on the stage.
    #[error("timeline event {0} not found")]
    EventNotFound(TimelineEventId),

    /// The entry exists but is a pause, so teams cannot be assigned to it.
    #[error("timeline event {0} is not a rotation")]
    NotARotation(TimelineEventId),
}

/// Order value for a new entry appended at the end of the timeline.
pub fn next_order(stage: &Stage) -> u32 {
    stage
        .timeline
        .values()
        .map(TimelineEvent::order)
        .max()
        .map_or(0, |max| max.saturating_add(1))
}

/// Append a rotation with an empty assignment for every configured
/// non-optional apparatus. Returns the new entry's id.
pub fn add_rotation(stage: &mut Stage, duration_in_minutes: u32) -> TimelineEventId {
    let apparatuses = stage_apparatuses(stage)
        .into_iter()
        .map(|apparatus| (apparatus, ApparatusAssignment::default()))
        .collect();
    let rotation = Rotation {
        order: next_order(stage),
        duration_in_minutes,
        apparatuses,
    };
    let id = TimelineEventId::new();
    stage.timeline.insert(id, TimelineEvent::Rotation(rotation));
    id
}

/// Append a pause. Returns the new entry's id.
pub fn add_pause(stage: &mut Stage, duration_in_minutes: u32) -> TimelineEventId {
    let pause = Pause {
        order: next_order(stage),
        duration_in_minutes,
    };
    let id = TimelineEventId::new();
    stage.timeline.insert(id, TimelineEvent::Pause(pause));
    id
}

/// Add a team to an apparatus of a stored rotation.
///
/// Returns `true` if the team was newly added.
///
/// # Errors
///
/// Returns [`ScheduleError::EventNotFound`] for an unknown id and
/// [`ScheduleError::NotARotation`] when the id names a pause.
pub fn assign_team(
    stage: &mut Stage,
    event_id: TimelineEventId,
    apparatus: Apparatus,
    team: TeamId,
) -> Result<bool, ScheduleError> {
    match stage.timeline.get_mut(&event_id) {
        None => Err(ScheduleError::EventNotFound(event_id)),
        Some(TimelineEvent::Pause(_)) => Err(ScheduleError::NotARotation(event_id)),
        Some(TimelineEvent::Rotation(rotation)) => Ok(rotation
            .apparatuses
            .entry(apparatus)
            .or_default()
            .teams
            .insert(team)),
    }
}

/// Remove a timeline entry. Orders of the remaining entries are kept.
///
/// # Errors
///
/// Returns [`ScheduleError::EventNotFound`] for an unknown id.
pub fn remove_event(
    stage: &mut Stage,
    event_id: TimelineEventId,
) -> Result<TimelineEvent, ScheduleError> {
    stage
        .timeline
        .remove(&event_id)
        .ok_or(ScheduleError::EventNotFound(event_id))
}

/// Replace the apparatus configuration of a stage.
///
/// Every stored rotation receives an empty entry for each newly configured
/// non-optional apparatus it does not have yet. Entries for apparatus that
/// are no longer configured stay in place; the resolver ignores them.
/// Returns the number of entries added.
pub fn reconfigure_apparatuses(stage: &mut Stage, apparatuses: BTreeMap<Apparatus, u32>) -> usize {
    stage.apparatuses = apparatuses;
    let required = stage_apparatuses(stage);

    let mut backfilled = 0_usize;
    for event in stage.timeline.values_mut() {
        if let TimelineEvent::Rotation(rotation) = event {
            for apparatus in &required {
                if !rotation.apparatuses.contains_key(apparatus) {
                    rotation
                        .apparatuses
                        .insert(*apparatus, ApparatusAssignment::default());
                    backfilled = backfilled.saturating_add(1);
                }
            }
        }
    }

    debug!(
        stage = %stage.name,
        apparatus_count = required.len(),
        backfilled,
        "Stage apparatus configuration replaced"
    );
    backfilled
}
