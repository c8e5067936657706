//! Timeline resolution and schedule logic for the Podium competition
//! organizer.
//!
//! Everything a display screen needs to decide "what happens on this stage
//! right now" is derived here from the shared document and a progress
//! counter. The computations are pure; the server crate owns the document
//! and decides when to call them.
//!
//! # Modules
//!
//! - [`clock`] -- [`Clock`] trait with system and fixed implementations.
//! - [`config`] -- Configuration loading from `podium-config.yaml`.
//! - [`document`] -- Lookups on the competition document and JSON loading.
//! - [`duration`] -- Coercion of user-entered durations.
//! - [`progress`] -- Advance and retreat of the progress counter.
//! - [`rotation`] -- Rotation offset transform (teams moving between
//!   apparatus).
//! - [`schedule`] -- Timeline editing: rotations, pauses, assignments,
//!   apparatus reconfiguration.
//! - [`status`] -- Localized status line and duration text.
//! - [`timeline`] -- Sorted timeline access and the current-event resolver.
//!
//! [`Clock`]: clock::Clock

pub mod clock;
pub mod config;
pub mod document;
pub mod duration;
pub mod progress;
pub mod rotation;
pub mod schedule;
pub mod status;
pub mod timeline;
