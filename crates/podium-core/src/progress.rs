//! Progress counter stepping.
//!
//! The progress counter is the only mutable input of the resolver. The
//! operator buttons move it one tick at a time; retreat is the exact
//! inverse of advance, including the step back to "not started".

/// Step forward: unset becomes 0, otherwise add one (saturating).
pub const fn advance(progress: Option<i64>) -> Option<i64> {
    match progress {
        None => Some(0),
        Some(p) => Some(p.saturating_add(1)),
    }
}

/// Step back: 0 becomes unset, unset stays unset, otherwise subtract one.
pub const fn retreat(progress: Option<i64>) -> Option<i64> {
    match progress {
        None | Some(0) => None,
        Some(p) => Some(p.saturating_sub(1)),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use podium_types::{Apparatus, Pause, Rotation, Stage, TimelineEvent, TimelineEventId};

    use super::*;
    use crate::timeline::{CurrentEvent, resolve_current_event};

    #[test]
    fn advance_starts_at_zero() {
        assert_eq!(advance(None), Some(0));
        assert_eq!(advance(Some(0)), Some(1));
        assert_eq!(advance(Some(i64::MAX)), Some(i64::MAX));
    }

    #[test]
    fn retreat_from_zero_unsets() {
        assert_eq!(retreat(Some(2)), Some(1));
        assert_eq!(retreat(Some(0)), None);
        assert_eq!(retreat(None), None);
        assert_eq!(retreat(Some(-2)), Some(-3));
    }

    fn small_stage() -> Stage {
        let start = podium_types::timestamp::parse("2024-01-01T10:00").unwrap();
        let mut stage = Stage::new("Hall A", start);
        stage.apparatuses.insert(Apparatus::Floor, 0);
        stage.apparatuses.insert(Apparatus::Vault, 1);
        stage.timeline.insert(
            TimelineEventId::new(),
            TimelineEvent::Pause(Pause {
                order: 0,
                duration_in_minutes: 30,
            }),
        );
        stage.timeline.insert(
            TimelineEventId::new(),
            TimelineEvent::Rotation(Rotation {
                order: 1,
                duration_in_minutes: 60,
                ..Rotation::default()
            }),
        );
        stage
    }

    #[test]
    fn advance_then_retreat_round_trips_resolved_views() {
        let stage = small_stage();

        let mut progress = None;
        let mut forward = vec![resolve_current_event(&stage, progress)];
        for _ in 0..3 {
            progress = advance(progress);
            forward.push(resolve_current_event(&stage, progress));
        }
        assert_eq!(progress, Some(2));
        let kinds: Vec<&str> = forward.iter().map(CurrentEvent::kind).collect();
        assert_eq!(kinds, ["start", "pause", "rotation", "rotation"]);

        for expected in forward.iter().rev().skip(1) {
            progress = retreat(progress);
            assert_eq!(&resolve_current_event(&stage, progress), expected);
        }
        assert_eq!(progress, None);
    }

    #[test]
    fn advance_then_immediate_retreat_is_a_no_op() {
        let stage = small_stage();
        for start in [None, Some(0), Some(1), Some(2), Some(3)] {
            let before = resolve_current_event(&stage, start);
            let after = resolve_current_event(&stage, retreat(advance(start)));
            assert_eq!(before, after);
        }
    }
}
