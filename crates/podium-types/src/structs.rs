//! Document structs for a gymnastics competition.
//!
//! The whole competition lives in one [`Competition`] document that every
//! connected client shares. Stage timelines, registration data and the bar
//! menu are plain data here; all derived views are computed elsewhere.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{Apparatus, Gender, MenuSection};
use crate::ids::{CategoryId, MenuItemId, PlayerId, StageId, TeamId, TimelineEventId};

// ---------------------------------------------------------------------------
// Timeline
// ---------------------------------------------------------------------------

/// Teams assigned to one apparatus in a stored rotation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct ApparatusAssignment {
    /// Assigned teams. Insertion order carries no meaning.
    #[serde(default)]
    pub teams: BTreeSet<TeamId>,
}

/// A rotation slot: every configured apparatus is in use at the same time.
///
/// The stored assignment is always the assignment of the first pass. The
/// displayed assignment for later passes is derived by shifting it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Rotation {
    /// Position within the stage timeline.
    pub order: u32,
    /// Length of one pass in minutes.
    pub duration_in_minutes: u32,
    /// Stored assignment per apparatus.
    #[serde(default)]
    pub apparatuses: BTreeMap<Apparatus, ApparatusAssignment>,
}

/// A break in the timeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Pause {
    /// Position within the stage timeline.
    pub order: u32,
    /// Length of the break in minutes.
    pub duration_in_minutes: u32,
}

/// One entry of a stage timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "type", rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum TimelineEvent {
    /// Apparatus rotation.
    Rotation(Rotation),
    /// Break.
    Pause(Pause),
}

impl TimelineEvent {
    /// Position of this event within its stage timeline.
    pub const fn order(&self) -> u32 {
        match self {
            Self::Rotation(rotation) => rotation.order,
            Self::Pause(pause) => pause.order,
        }
    }

    /// Duration in minutes.
    pub const fn duration_in_minutes(&self) -> u32 {
        match self {
            Self::Rotation(rotation) => rotation.duration_in_minutes,
            Self::Pause(pause) => pause.duration_in_minutes,
        }
    }

    /// Borrow the rotation payload, if this is a rotation.
    pub const fn as_rotation(&self) -> Option<&Rotation> {
        match self {
            Self::Rotation(rotation) => Some(rotation),
            Self::Pause(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Stage
// ---------------------------------------------------------------------------

/// A named competition area with its own apparatus set and timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Stage {
    /// Display name (e.g. "Hall A").
    pub name: String,
    /// Configured apparatus with their order integer.
    #[serde(default)]
    pub apparatuses: BTreeMap<Apparatus, u32>,
    /// Wall-clock start of the first timeline event.
    #[serde(with = "crate::timestamp")]
    #[ts(as = "String")]
    pub timeline_start_date: NaiveDateTime,
    /// Timeline entries keyed by id.
    #[serde(default)]
    pub timeline: BTreeMap<TimelineEventId, TimelineEvent>,
    /// Number of elapsed progress ticks. Absent means "not started".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(as = "Option<i32>")]
    pub progress: Option<i64>,
}

impl Stage {
    /// Create an empty stage starting at the given time.
    pub fn new(name: impl Into<String>, timeline_start_date: NaiveDateTime) -> Self {
        Self {
            name: name.into(),
            apparatuses: BTreeMap::new(),
            timeline_start_date,
            timeline: BTreeMap::new(),
            progress: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Registration
// ---------------------------------------------------------------------------

/// A registered team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Team {
    /// Team name shown on display screens.
    pub name: String,
    /// Category the team competes in.
    #[serde(default)]
    pub category: Option<CategoryId>,
    /// Members of the team.
    #[serde(default)]
    pub players: BTreeSet<PlayerId>,
}

/// A registered gymnast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Player {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Registered gender.
    pub gender: Gender,
    /// Year of birth, used for age groups.
    #[serde(default)]
    pub birth_year: Option<u16>,
}

impl Player {
    /// "First Last".
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// A competition category (age group, league, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Category {
    /// Category name.
    pub name: String,
    /// Restricts the category to one gender, if set.
    #[serde(default)]
    pub gender: Option<Gender>,
}

// ---------------------------------------------------------------------------
// Bar menu
// ---------------------------------------------------------------------------

/// One item sold at the bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct MenuItem {
    /// Item id.
    pub id: MenuItemId,
    /// Item name.
    pub name: String,
    /// Menu section.
    pub section: MenuSection,
    /// Price in cents.
    pub price_cents: u32,
    /// Whether the item can currently be ordered.
    #[serde(default = "default_true")]
    pub available: bool,
}

const fn default_true() -> bool {
    true
}

// ---------------------------------------------------------------------------
// Competition document
// ---------------------------------------------------------------------------

/// The shared competition document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Competition {
    /// Competition title.
    #[serde(default)]
    pub name: String,
    /// Stages keyed by id.
    #[serde(default)]
    pub stages: BTreeMap<StageId, Stage>,
    /// Registered teams.
    #[serde(default)]
    pub teams: BTreeMap<TeamId, Team>,
    /// Registered players.
    #[serde(default)]
    pub players: BTreeMap<PlayerId, Player>,
    /// Categories.
    #[serde(default)]
    pub categories: BTreeMap<CategoryId, Category>,
    /// Bar menu, in display order.
    #[serde(default)]
    pub bar_menu: Vec<MenuItem>,
}
