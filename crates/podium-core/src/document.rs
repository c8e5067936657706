//! Read access to the shared competition document.
//!
//! The document is owned by whoever syncs it (the display server keeps it
//! behind a lock). Core logic only needs lookups, so it is written against
//! the [`CompetitionDocument`] trait rather than the concrete struct.

use std::path::Path;

use podium_types::{
    Apparatus, Competition, Player, PlayerId, Stage, StageId, Team, TeamId, TimelineEvent,
    TimelineEventId,
};

use crate::timeline::{CurrentEvent, ordered_apparatuses, resolve_current_event, sorted_events};

/// Errors that can occur when loading a competition document.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// Failed to read the document file.
    #[error("failed to read competition document: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// The document is not valid competition JSON.
    #[error("failed to parse competition document: {source}")]
    Json {
        /// The underlying JSON error.
        #[from]
        source: serde_json::Error,
    },
}

/// Lookup access to a competition document.
pub trait CompetitionDocument {
    /// A stage by id.
    fn stage(&self, id: StageId) -> Option<&Stage>;

    /// Ids of all stages.
    fn stage_ids(&self) -> Vec<StageId>;

    /// A registered team by id.
    fn team(&self, id: TeamId) -> Option<&Team>;

    /// A registered player by id.
    fn player(&self, id: PlayerId) -> Option<&Player>;
}

impl CompetitionDocument for Competition {
    fn stage(&self, id: StageId) -> Option<&Stage> {
        self.stages.get(&id)
    }

    fn stage_ids(&self) -> Vec<StageId> {
        self.stages.keys().copied().collect()
    }

    fn team(&self, id: TeamId) -> Option<&Team> {
        self.teams.get(&id)
    }

    fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(&id)
    }
}

/// Resolve the current event of a stage from its stored progress.
///
/// `None` when the stage does not exist.
pub fn resolve_stage<D: CompetitionDocument + ?Sized>(
    doc: &D,
    id: StageId,
) -> Option<CurrentEvent> {
    doc.stage(id)
        .map(|stage| resolve_current_event(stage, stage.progress))
}

/// Sorted timeline of a stage; empty when the stage does not exist.
pub fn sorted_timeline_of<D: CompetitionDocument + ?Sized>(
    doc: &D,
    id: StageId,
) -> Vec<(TimelineEventId, &TimelineEvent)> {
    doc.stage(id).map(sorted_events).unwrap_or_default()
}

/// Every configured apparatus of a stage in configured order, optional
/// ones included; empty when the stage does not exist.
pub fn apparatus_order_of<D: CompetitionDocument + ?Sized>(doc: &D, id: StageId) -> Vec<Apparatus> {
    doc.stage(id)
        .map(|stage| ordered_apparatuses(stage, |_| true))
        .unwrap_or_default()
}

/// Display name of a team. Unknown ids are shown as the id itself.
pub fn team_name<D: CompetitionDocument + ?Sized>(doc: &D, id: TeamId) -> String {
    doc.team(id)
        .map_or_else(|| id.to_string(), |team| team.name.clone())
}

/// Parse a competition document from JSON.
///
/// # Errors
///
/// Returns [`DocumentError::Json`] if the text is not a valid document.
pub fn parse_document(json: &str) -> Result<Competition, DocumentError> {
    Ok(serde_json::from_str(json)?)
}

/// Load a competition document from a JSON file.
///
/// # Errors
///
/// Returns [`DocumentError::Io`] if the file cannot be read, or
/// [`DocumentError::Json`] if its content is not a valid document.
pub fn load_document(path: &Path) -> Result<Competition, DocumentError> {
    let contents = std::fs::read_to_string(path)?;
    parse_document(&contents)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic, clippy::indexing_slicing)]
mod tests {
    use super::*;

    const DOC: &str = r#"{
        "name": "Spring Cup",
        "stages": {
            "0190a6c4-0000-7000-8000-000000000001": {
                "name": "Hall A",
                "apparatuses": { "floor": 1, "vault": 0, "rest": 2 },
                "timelineStartDate": "2024-01-01T10:00:00",
                "progress": 2,
                "timeline": {
                    "0190a6c4-0000-7000-8000-0000000000e1": {
                        "type": "pause", "order": 0, "durationInMinutes": 30
                    },
                    "0190a6c4-0000-7000-8000-0000000000e2": {
                        "type": "rotation", "order": 1, "durationInMinutes": 60,
                        "apparatuses": {
                            "vault": { "teams": ["0190a6c4-0000-7000-8000-0000000000a1"] },
                            "floor": { "teams": [] }
                        }
                    }
                }
            }
        },
        "teams": {
            "0190a6c4-0000-7000-8000-0000000000a1": { "name": "TV Musterstadt" }
        }
    }"#;

    fn stage_id() -> StageId {
        serde_json::from_str(r#""0190a6c4-0000-7000-8000-000000000001""#).unwrap()
    }

    #[test]
    fn parses_document() {
        let doc = parse_document(DOC).unwrap();
        assert_eq!(doc.name, "Spring Cup");
        assert_eq!(doc.stage_ids(), vec![stage_id()]);
        assert!(doc.players.is_empty());
        assert!(doc.bar_menu.is_empty());
    }

    #[test]
    fn resolves_stage_from_stored_progress() {
        let doc = parse_document(DOC).unwrap();
        // Pause consumes 1, the rotation has vault + floor: progress 2 is offset 1.
        match resolve_stage(&doc, stage_id()).unwrap() {
            CurrentEvent::Rotation {
                apparatus_order,
                position,
                ..
            } => {
                assert_eq!(apparatus_order, vec![Apparatus::Vault, Apparatus::Floor]);
                assert_eq!(position.index, 1);
            }
            other => panic!("expected rotation, got {other:?}"),
        }
        assert!(resolve_stage(&doc, StageId::new()).is_none());
    }

    #[test]
    fn accessors_fall_back_to_empty() {
        let doc = parse_document(DOC).unwrap();
        assert_eq!(sorted_timeline_of(&doc, stage_id()).len(), 2);
        assert!(sorted_timeline_of(&doc, StageId::new()).is_empty());
        assert_eq!(
            apparatus_order_of(&doc, stage_id()),
            vec![Apparatus::Vault, Apparatus::Floor, Apparatus::Rest]
        );
        assert!(apparatus_order_of(&doc, StageId::new()).is_empty());
    }

    #[test]
    fn team_name_falls_back_to_id() {
        let doc = parse_document(DOC).unwrap();
        let known: TeamId =
            serde_json::from_str(r#""0190a6c4-0000-7000-8000-0000000000a1""#).unwrap();
        assert_eq!(team_name(&doc, known), "TV Musterstadt");
        let unknown = TeamId::new();
        assert_eq!(team_name(&doc, unknown), unknown.to_string());
    }

    #[test]
    fn invalid_json_is_an_error() {
        assert!(matches!(
            parse_document("{ not json"),
            Err(DocumentError::Json { .. })
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        assert!(matches!(
            load_document(Path::new("/nonexistent/competition.json")),
            Err(DocumentError::Io { .. })
        ));
    }
}
