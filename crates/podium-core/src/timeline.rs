//! Stage timeline accessors and the current-event resolver.
//!
//! The resolver turns a stage and its progress counter into the event that
//! display screens should show right now. Nothing is stored between calls:
//! every call walks the sorted timeline from the start, so all clients that
//! see the same progress value derive the same view.
//!
//! # Budget accounting
//!
//! Each event consumes a number of progress ticks:
//!
//! - a pause consumes exactly 1,
//! - a rotation consumes one tick per apparatus in its effective apparatus
//!   list (see [`rotation_apparatuses`]), which is derived from the current
//!   stage configuration and not from the entries stored in the rotation.
//!
//! An event is active when the running budget after adding it exceeds the
//! progress value. For rotations the distance into the event's budget is
//! the rotation offset (how many times teams have moved on).

use std::collections::BTreeMap;

use chrono::{NaiveDateTime, TimeDelta};
use podium_types::{Apparatus, ApparatusAssignment, Rotation, Stage, TimelineEvent, TimelineEventId};
use serde::{Deserialize, Serialize};

use crate::rotation::compute_effective_rotation;

// ---------------------------------------------------------------------------
// Resolver output
// ---------------------------------------------------------------------------

/// Position of an event among all events of its stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupInfo {
    /// 0-based position in the sorted timeline.
    pub index: usize,
    /// Number of events in the timeline.
    pub count: usize,
}

/// Position within a rotation: how many passes have been completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionInfo {
    /// Current pass (0-based), equal to the rotation offset.
    pub index: u64,
    /// Number of passes in the rotation (its apparatus count).
    pub count: u64,
}

/// What a stage is doing at a given progress value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CurrentEvent {
    /// Progress is unset: the competition has not started.
    Start {
        /// Configured start of the stage timeline.
        #[serde(rename = "startDate", with = "podium_types::timestamp")]
        start_date: NaiveDateTime,
    },
    /// A rotation is running.
    Rotation {
        /// Id of the timeline entry.
        #[serde(rename = "eventId")]
        event_id: TimelineEventId,
        /// Start of this rotation.
        #[serde(rename = "startDate", with = "podium_types::timestamp")]
        start_date: NaiveDateTime,
        /// End of this rotation.
        #[serde(rename = "endDate", with = "podium_types::timestamp")]
        end_date: NaiveDateTime,
        /// Effective apparatus list in stage order.
        #[serde(rename = "apparatusOrder")]
        apparatus_order: Vec<Apparatus>,
        /// Displayed assignment with the rotation offset applied.
        apparatuses: BTreeMap<Apparatus, ApparatusAssignment>,
        /// Position among all events.
        group: GroupInfo,
        /// Position within this rotation.
        position: PositionInfo,
    },
    /// A pause is running.
    Pause {
        /// Id of the timeline entry.
        #[serde(rename = "eventId")]
        event_id: TimelineEventId,
        /// Start of this pause.
        #[serde(rename = "startDate", with = "podium_types::timestamp")]
        start_date: NaiveDateTime,
        /// End of this pause.
        #[serde(rename = "endDate", with = "podium_types::timestamp")]
        end_date: NaiveDateTime,
        /// Position among all events.
        group: GroupInfo,
    },
    /// Every event has been consumed.
    End {
        /// End of the last event.
        #[serde(rename = "endDate", with = "podium_types::timestamp")]
        end_date: NaiveDateTime,
    },
}

impl CurrentEvent {
    /// Start of the current window, if it has one.
    pub const fn start_date(&self) -> Option<NaiveDateTime> {
        match self {
            Self::Start { start_date }
            | Self::Rotation { start_date, .. }
            | Self::Pause { start_date, .. } => Some(*start_date),
            Self::End { .. } => None,
        }
    }

    /// End of the current window, if it has one.
    pub const fn end_date(&self) -> Option<NaiveDateTime> {
        match self {
            Self::Rotation { end_date, .. }
            | Self::Pause { end_date, .. }
            | Self::End { end_date } => Some(*end_date),
            Self::Start { .. } => None,
        }
    }

    /// Id of the active timeline entry, if one is active.
    pub const fn event_id(&self) -> Option<TimelineEventId> {
        match self {
            Self::Rotation { event_id, .. } | Self::Pause { event_id, .. } => Some(*event_id),
            Self::Start { .. } | Self::End { .. } => None,
        }
    }

    /// Short name of the state (`start`, `rotation`, `pause`, `end`).
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Start { .. } => "start",
            Self::Rotation { .. } => "rotation",
            Self::Pause { .. } => "pause",
            Self::End { .. } => "end",
        }
    }
}

// ---------------------------------------------------------------------------
// Accessors
// ---------------------------------------------------------------------------

/// All timeline entries of a stage, ascending by `order`.
///
/// Entries sharing an order value are sorted by id so the sequence is
/// deterministic on every client.
pub fn sorted_events(stage: &Stage) -> Vec<(TimelineEventId, &TimelineEvent)> {
    let mut events: Vec<(TimelineEventId, &TimelineEvent)> =
        stage.timeline.iter().map(|(id, event)| (*id, event)).collect();
    events.sort_by_key(|(id, event)| (event.order(), *id));
    events
}

/// Configured apparatus of a stage in their configured order, without
/// optional apparatus.
pub fn stage_apparatuses(stage: &Stage) -> Vec<Apparatus> {
    ordered_apparatuses(stage, |apparatus| !apparatus.is_optional())
}

/// Effective apparatus list of one rotation.
///
/// Every configured non-optional apparatus is included whether or not the
/// rotation stores an entry for it. An optional apparatus (rest) is
/// included only if it is configured for the stage and this rotation has
/// an entry for it.
pub fn rotation_apparatuses(stage: &Stage, rotation: &Rotation) -> Vec<Apparatus> {
    ordered_apparatuses(stage, |apparatus| {
        !apparatus.is_optional() || rotation.apparatuses.contains_key(&apparatus)
    })
}

/// Configured apparatus accepted by `include`, sorted by their order value.
pub(crate) fn ordered_apparatuses(
    stage: &Stage,
    include: impl Fn(Apparatus) -> bool,
) -> Vec<Apparatus> {
    let mut configured: Vec<(u32, Apparatus)> = stage
        .apparatuses
        .iter()
        .filter(|(apparatus, _)| include(**apparatus))
        .map(|(apparatus, order)| (*order, *apparatus))
        .collect();
    configured.sort_unstable();
    configured.into_iter().map(|(_, apparatus)| apparatus).collect()
}

/// Progress ticks consumed by one event.
pub fn event_budget(stage: &Stage, event: &TimelineEvent) -> u64 {
    match event {
        TimelineEvent::Pause(_) => 1,
        TimelineEvent::Rotation(rotation) => {
            u64::try_from(rotation_apparatuses(stage, rotation).len()).unwrap_or(u64::MAX)
        }
    }
}

/// Progress ticks consumed by the whole timeline.
///
/// Progress equal to this value resolves to [`CurrentEvent::End`].
pub fn total_budget(stage: &Stage) -> u64 {
    sorted_events(stage)
        .into_iter()
        .fold(0_u64, |acc, (_, event)| acc.saturating_add(event_budget(stage, event)))
}

/// Move a timestamp forward by a number of minutes.
///
/// Saturates at the largest representable timestamp.
pub fn add_minutes(at: NaiveDateTime, minutes: u32) -> NaiveDateTime {
    at.checked_add_signed(TimeDelta::minutes(i64::from(minutes)))
        .unwrap_or(NaiveDateTime::MAX)
}

// ---------------------------------------------------------------------------
// Resolver
// ---------------------------------------------------------------------------

/// Resolve the active event of a stage for a given progress value.
///
/// Absent or negative progress resolves to [`CurrentEvent::Start`].
/// Progress at or beyond the total budget resolves to
/// [`CurrentEvent::End`] with the accumulated end time. The function is
/// pure and total.
pub fn resolve_current_event(stage: &Stage, progress: Option<i64>) -> CurrentEvent {
    let Some(progress) = progress.and_then(|p| u64::try_from(p).ok()) else {
        return CurrentEvent::Start {
            start_date: stage.timeline_start_date,
        };
    };

    let events = sorted_events(stage);
    let count = events.len();
    let mut budget = 0_u64;
    let mut clock = stage.timeline_start_date;

    for (index, (event_id, event)) in events.into_iter().enumerate() {
        let start_date = clock;
        let end_date = add_minutes(clock, event.duration_in_minutes());
        let group = GroupInfo { index, count };

        match event {
            TimelineEvent::Pause(_) => {
                budget = budget.saturating_add(1);
                if budget > progress {
                    return CurrentEvent::Pause {
                        event_id,
                        start_date,
                        end_date,
                        group,
                    };
                }
            }
            TimelineEvent::Rotation(rotation) => {
                let apparatus_order = rotation_apparatuses(stage, rotation);
                let apparatus_count = u64::try_from(apparatus_order.len()).unwrap_or(u64::MAX);
                budget = budget.saturating_add(apparatus_count);
                if budget > progress {
                    // budget - count <= progress < budget, so offset < count.
                    let offset = progress.saturating_sub(budget.saturating_sub(apparatus_count));
                    let apparatuses = compute_effective_rotation(
                        rotation,
                        &apparatus_order,
                        i64::try_from(offset).unwrap_or(0),
                    );
                    return CurrentEvent::Rotation {
                        event_id,
                        start_date,
                        end_date,
                        apparatus_order,
                        apparatuses,
                        group,
                        position: PositionInfo {
                            index: offset,
                            count: apparatus_count,
                        },
                    };
                }
            }
        }

        clock = end_date;
    }

    CurrentEvent::End { end_date: clock }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::panic,
    clippy::arithmetic_side_effects,
    clippy::indexing_slicing
)]
mod tests {
    use std::collections::BTreeSet;

    use podium_types::{Pause, TeamId, timestamp};

    use super::*;

    fn at(s: &str) -> NaiveDateTime {
        timestamp::parse(s).unwrap()
    }

    fn pause(order: u32, minutes: u32) -> TimelineEvent {
        TimelineEvent::Pause(Pause {
            order,
            duration_in_minutes: minutes,
        })
    }

    fn rotation(order: u32, minutes: u32, entries: &[(Apparatus, TeamId)]) -> TimelineEvent {
        TimelineEvent::Rotation(Rotation {
            order,
            duration_in_minutes: minutes,
            apparatuses: entries
                .iter()
                .map(|(a, t)| {
                    (
                        *a,
                        ApparatusAssignment {
                            teams: BTreeSet::from([*t]),
                        },
                    )
                })
                .collect(),
        })
    }

    fn stage_with(apparatuses: &[(Apparatus, u32)], events: Vec<TimelineEvent>) -> Stage {
        let mut stage = Stage::new("Hall A", at("2024-01-01T10:00:00"));
        stage.apparatuses = apparatuses.iter().copied().collect();
        for event in events {
            stage.timeline.insert(TimelineEventId::new(), event);
        }
        stage
    }

    /// Pause(30) at order 0, then Rotation(60) over two apparatus at order 1.
    fn pause_then_rotation() -> (Stage, [TeamId; 2]) {
        let teams = [TeamId::new(), TeamId::new()];
        let stage = stage_with(
            &[(Apparatus::Floor, 0), (Apparatus::Vault, 1)],
            vec![
                rotation(
                    1,
                    60,
                    &[(Apparatus::Floor, teams[0]), (Apparatus::Vault, teams[1])],
                ),
                pause(0, 30),
            ],
        );
        (stage, teams)
    }

    // -- accessors ----------------------------------------------------------

    #[test]
    fn events_are_sorted_by_order() {
        let stage = stage_with(&[], vec![pause(5, 1), pause(1, 2), pause(3, 3)]);
        let orders: Vec<u32> = sorted_events(&stage)
            .iter()
            .map(|(_, e)| e.order())
            .collect();
        assert_eq!(orders, vec![1, 3, 5]);
    }

    #[test]
    fn empty_stage_yields_empty_lists() {
        let stage = stage_with(&[], vec![]);
        assert!(sorted_events(&stage).is_empty());
        assert!(stage_apparatuses(&stage).is_empty());
        assert_eq!(total_budget(&stage), 0);
    }

    #[test]
    fn stage_apparatuses_follow_configured_order_and_skip_rest() {
        let stage = stage_with(
            &[
                (Apparatus::Vault, 2),
                (Apparatus::Floor, 0),
                (Apparatus::Rest, 1),
                (Apparatus::Beam, 3),
            ],
            vec![],
        );
        assert_eq!(
            stage_apparatuses(&stage),
            vec![Apparatus::Floor, Apparatus::Vault, Apparatus::Beam]
        );
    }

    #[test]
    fn rest_joins_only_rotations_that_list_it() {
        let team = TeamId::new();
        let stage = stage_with(
            &[(Apparatus::Floor, 0), (Apparatus::Rest, 1), (Apparatus::Vault, 2)],
            vec![],
        );
        let with_rest = rotation(0, 30, &[(Apparatus::Rest, team)]);
        let without_rest = rotation(1, 30, &[(Apparatus::Floor, team)]);

        assert_eq!(
            rotation_apparatuses(&stage, with_rest.as_rotation().unwrap()),
            vec![Apparatus::Floor, Apparatus::Rest, Apparatus::Vault]
        );
        assert_eq!(
            rotation_apparatuses(&stage, without_rest.as_rotation().unwrap()),
            vec![Apparatus::Floor, Apparatus::Vault]
        );
        assert_eq!(event_budget(&stage, &with_rest), 3);
        assert_eq!(event_budget(&stage, &without_rest), 2);
    }

    #[test]
    fn rest_entry_without_stage_configuration_is_ignored() {
        let team = TeamId::new();
        let stage = stage_with(&[(Apparatus::Floor, 0)], vec![]);
        let event = rotation(0, 30, &[(Apparatus::Rest, team)]);
        assert_eq!(
            rotation_apparatuses(&stage, event.as_rotation().unwrap()),
            vec![Apparatus::Floor]
        );
    }

    // -- boundary transitions ------------------------------------------------

    #[test]
    fn unset_or_negative_progress_is_start() {
        let (stage, _) = pause_then_rotation();
        for progress in [None, Some(-1), Some(-42)] {
            let current = resolve_current_event(&stage, progress);
            assert_eq!(
                current,
                CurrentEvent::Start {
                    start_date: at("2024-01-01T10:00:00")
                }
            );
            assert!(current.end_date().is_none());
        }
    }

    #[test]
    fn boundary_transitions_pause_then_rotation() {
        let (stage, [t1, t2]) = pause_then_rotation();

        let CurrentEvent::Pause { group, .. } = resolve_current_event(&stage, Some(0)) else {
            panic!("expected pause at progress 0");
        };
        assert_eq!(group, GroupInfo { index: 0, count: 2 });

        let CurrentEvent::Rotation {
            position,
            apparatuses,
            group,
            ..
        } = resolve_current_event(&stage, Some(1))
        else {
            panic!("expected rotation at progress 1");
        };
        assert_eq!(position, PositionInfo { index: 0, count: 2 });
        assert_eq!(group, GroupInfo { index: 1, count: 2 });
        assert!(apparatuses[&Apparatus::Floor].teams.contains(&t1));
        assert!(apparatuses[&Apparatus::Vault].teams.contains(&t2));

        let CurrentEvent::Rotation {
            position,
            apparatuses,
            ..
        } = resolve_current_event(&stage, Some(2))
        else {
            panic!("expected rotation at progress 2");
        };
        assert_eq!(position, PositionInfo { index: 1, count: 2 });
        assert!(apparatuses[&Apparatus::Floor].teams.contains(&t2));
        assert!(apparatuses[&Apparatus::Vault].teams.contains(&t1));

        assert_eq!(resolve_current_event(&stage, Some(3)).kind(), "end");
        assert_eq!(resolve_current_event(&stage, Some(300)).kind(), "end");
    }

    #[test]
    fn time_windows_accumulate() {
        let (stage, _) = pause_then_rotation();

        let pause = resolve_current_event(&stage, Some(0));
        assert_eq!(pause.start_date(), Some(at("2024-01-01T10:00:00")));
        assert_eq!(pause.end_date(), Some(at("2024-01-01T10:30:00")));

        for progress in [1, 2] {
            let rotation = resolve_current_event(&stage, Some(progress));
            assert_eq!(rotation.start_date(), Some(at("2024-01-01T10:30:00")));
            assert_eq!(rotation.end_date(), Some(at("2024-01-01T11:30:00")));
        }

        let end = resolve_current_event(&stage, Some(3));
        assert_eq!(end.start_date(), None);
        assert_eq!(end.end_date(), Some(at("2024-01-01T11:30:00")));
    }

    #[test]
    fn empty_timeline_ends_at_start_time() {
        let stage = stage_with(&[(Apparatus::Floor, 0)], vec![]);
        assert_eq!(
            resolve_current_event(&stage, Some(0)),
            CurrentEvent::End {
                end_date: at("2024-01-01T10:00:00")
            }
        );
    }

    #[test]
    fn rotation_without_configured_apparatus_is_skipped() {
        let team = TeamId::new();
        let stage = stage_with(
            &[],
            vec![rotation(0, 45, &[(Apparatus::Floor, team)]), pause(1, 10)],
        );
        let current = resolve_current_event(&stage, Some(0));
        assert_eq!(current.kind(), "pause");
        // The skipped rotation still takes its time.
        assert_eq!(current.start_date(), Some(at("2024-01-01T10:45:00")));
    }

    // -- properties ----------------------------------------------------------

    fn mixed_stage() -> Stage {
        let t = [TeamId::new(), TeamId::new(), TeamId::new()];
        stage_with(
            &[
                (Apparatus::Floor, 0),
                (Apparatus::Rings, 1),
                (Apparatus::Vault, 2),
                (Apparatus::Rest, 3),
            ],
            vec![
                rotation(0, 40, &[(Apparatus::Floor, t[0]), (Apparatus::Rings, t[1])]),
                pause(1, 15),
                rotation(
                    2,
                    40,
                    &[(Apparatus::Floor, t[2]), (Apparatus::Vault, t[0]), (Apparatus::Rest, t[1])],
                ),
                pause(3, 60),
                rotation(4, 20, &[(Apparatus::Vault, t[1])]),
            ],
        )
    }

    #[test]
    fn budget_is_conserved_for_every_progress_value() {
        let stage = mixed_stage();
        let events = sorted_events(&stage);
        let total = total_budget(&stage);
        assert_eq!(total, 3 + 1 + 4 + 1 + 3);

        for progress in 0..total.saturating_add(3) {
            let current = resolve_current_event(&stage, Some(i64::try_from(progress).unwrap()));
            match current.event_id() {
                Some(active) => {
                    let mut before = 0_u64;
                    for (id, event) in &events {
                        if *id == active {
                            assert!(before <= progress);
                            assert!(before + event_budget(&stage, event) > progress);
                            break;
                        }
                        before += event_budget(&stage, event);
                    }
                }
                None => assert!(progress >= total, "progress {progress} ended early"),
            }
        }
    }

    #[test]
    fn resolver_is_idempotent() {
        let stage = mixed_stage();
        for progress in [None, Some(0), Some(4), Some(7), Some(100)] {
            assert_eq!(
                resolve_current_event(&stage, progress),
                resolve_current_event(&stage, progress)
            );
        }
    }

    #[test]
    fn budget_follows_current_stage_configuration() {
        // Rotations created before an apparatus was added still consume one
        // tick per currently configured apparatus, so every later event
        // shifts by one tick per rotation.
        let team = TeamId::new();
        let mut stage = stage_with(
            &[(Apparatus::Floor, 0), (Apparatus::Vault, 1)],
            vec![rotation(0, 30, &[(Apparatus::Floor, team)]), pause(1, 10)],
        );
        assert_eq!(resolve_current_event(&stage, Some(2)).kind(), "pause");

        stage.apparatuses.insert(Apparatus::Beam, 2);
        let current = resolve_current_event(&stage, Some(2));
        let CurrentEvent::Rotation {
            position,
            apparatus_order,
            ..
        } = current
        else {
            panic!("expected rotation after reconfiguration");
        };
        assert_eq!(position, PositionInfo { index: 2, count: 3 });
        assert_eq!(
            apparatus_order,
            vec![Apparatus::Floor, Apparatus::Vault, Apparatus::Beam]
        );
        assert_eq!(resolve_current_event(&stage, Some(3)).kind(), "pause");
    }

    #[test]
    fn current_event_serializes_with_type_tag() {
        let (stage, _) = pause_then_rotation();
        let json = serde_json::to_value(resolve_current_event(&stage, Some(0))).unwrap();
        assert_eq!(json["type"], "pause");
        assert_eq!(json["startDate"], "2024-01-01T10:00:00");
        assert_eq!(json["endDate"], "2024-01-01T10:30:00");
        assert_eq!(json["group"]["count"], 2);
    }
}
