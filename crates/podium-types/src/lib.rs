//! Shared type definitions for the Podium gymnastics competition organizer.
//!
//! This crate is the single source of truth for the shared competition
//! document. Types defined here flow downstream to `TypeScript` via `ts-rs`
//! for the display screens and the organizer UI.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for all entity identifiers
//! - [`enums`] -- Apparatus, locale, gender and menu section enums
//! - [`structs`] -- Stages, timelines, registration and the bar menu
//! - [`timestamp`] -- Naive local timestamp (de)serialization

pub mod enums;
pub mod ids;
pub mod structs;
pub mod timestamp;

// Re-export all public types at crate root for convenience.
pub use enums::{Apparatus, Gender, Locale, MenuSection};
pub use ids::{CategoryId, MenuItemId, PlayerId, StageId, TeamId, TimelineEventId};
pub use structs::{
    ApparatusAssignment, Category, Competition, MenuItem, Pause, Player, Rotation, Stage, Team,
    TimelineEvent,
};
