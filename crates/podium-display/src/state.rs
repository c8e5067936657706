//! Shared application state for the display server.
//!
//! [`AppState`] owns the competition document, the broadcast channel that
//! feeds display screens, and the clock used for status texts. Screens
//! never receive the raw document: they get a [`StageView`], which is the
//! resolved current event plus everything needed to render it.

use std::sync::Arc;

use chrono::NaiveDateTime;
use podium_core::clock::Clock;
use podium_core::document::{CompetitionDocument, team_name};
use podium_core::status::format_status;
use podium_core::timeline::{CurrentEvent, resolve_current_event};
use podium_types::{Apparatus, Competition, Locale, StageId, TeamId};
use serde::{Deserialize, Serialize};
use tokio::sync::{RwLock, broadcast};
use tracing::debug;

/// Capacity of the broadcast channel for stage views.
///
/// If a subscriber falls behind by more than this many messages it will
/// receive a [`broadcast::error::RecvError::Lagged`] and skip to the
/// newest message.
const BROADCAST_CAPACITY: usize = 256;

/// A team as shown on a slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamRef {
    /// Team id.
    pub id: TeamId,
    /// Team name, or the id when the team is not registered.
    pub name: String,
}

/// One apparatus of the running rotation with the teams currently on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    /// The apparatus.
    pub apparatus: Apparatus,
    /// Localized apparatus name.
    pub label: String,
    /// Teams on this apparatus after the rotation offset.
    pub teams: Vec<TeamRef>,
}

/// Everything a display screen needs to render one stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageView {
    /// Stage id.
    pub stage_id: StageId,
    /// Stage name.
    pub name: String,
    /// Stored progress counter.
    pub progress: Option<i64>,
    /// Resolved current event.
    pub current: CurrentEvent,
    /// Localized status line.
    pub status: String,
    /// Apparatus slots of the running rotation, in apparatus order.
    /// Empty unless a rotation is running.
    pub slots: Vec<Slot>,
}

/// Build the view of one stage at `now`. `None` if the stage is unknown.
pub fn build_stage_view(
    doc: &Competition,
    stage_id: StageId,
    now: NaiveDateTime,
    locale: Locale,
) -> Option<StageView> {
    let stage = doc.stage(stage_id)?;
    let current = resolve_current_event(stage, stage.progress);
    let status = format_status(current.start_date(), current.end_date(), now, locale);

    let slots = match &current {
        CurrentEvent::Rotation {
            apparatus_order,
            apparatuses,
            ..
        } => apparatus_order
            .iter()
            .map(|apparatus| Slot {
                apparatus: *apparatus,
                label: apparatus.label(locale).to_owned(),
                teams: apparatuses
                    .get(apparatus)
                    .map(|assignment| {
                        assignment
                            .teams
                            .iter()
                            .map(|id| TeamRef {
                                id: *id,
                                name: team_name(doc, *id),
                            })
                            .collect()
                    })
                    .unwrap_or_default(),
            })
            .collect(),
        _ => Vec::new(),
    };

    Some(StageView {
        stage_id,
        name: stage.name.clone(),
        progress: stage.progress,
        current,
        status,
        slots,
    })
}

/// Shared state for the Axum application.
///
/// Wrapped in [`Arc`] and injected via Axum's `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Broadcast sender for stage view messages.
    pub tx: broadcast::Sender<StageView>,
    /// The competition document.
    pub document: Arc<RwLock<Competition>>,
    /// Source of "now" for status texts.
    pub clock: Arc<dyn Clock>,
    /// Language of labels and status texts.
    pub locale: Locale,
}

impl AppState {
    /// Create application state around a loaded document.
    pub fn new(document: Competition, clock: Arc<dyn Clock>, locale: Locale) -> Self {
        let (tx, _) = broadcast::channel(BROADCAST_CAPACITY);
        Self {
            tx,
            document: Arc::new(RwLock::new(document)),
            clock,
            locale,
        }
    }

    /// Subscribe to the stage view channel.
    pub fn subscribe(&self) -> broadcast::Receiver<StageView> {
        self.tx.subscribe()
    }

    /// Publish a stage view to all connected screens.
    ///
    /// Returns the number of receivers that received the message.
    /// Returns 0 if no screens are connected (this is not an error).
    pub fn broadcast(&self, view: &StageView) -> usize {
        self.tx.send(view.clone()).unwrap_or(0)
    }

    /// Current view of one stage.
    pub async fn stage_view(&self, stage_id: StageId) -> Option<StageView> {
        let doc = self.document.read().await;
        build_stage_view(&doc, stage_id, self.clock.now(), self.locale)
    }

    /// Current views of all stages, ordered by stage id.
    pub async fn stage_views(&self) -> Vec<StageView> {
        let doc = self.document.read().await;
        let now = self.clock.now();
        doc.stage_ids()
            .into_iter()
            .filter_map(|id| build_stage_view(&doc, id, now, self.locale))
            .collect()
    }

    /// Rebuild and broadcast every stage view. Returns the number of views
    /// published.
    pub async fn refresh(&self) -> usize {
        let views = self.stage_views().await;
        let receivers = views.iter().map(|view| self.broadcast(view)).max().unwrap_or(0);
        debug!(stages = views.len(), receivers, "Stage views refreshed");
        views.len()
    }
}
