//! Integration tests for the display and operator API endpoints.
//!
//! Tests use Axum's `Router` directly via `tower::ServiceExt` without
//! starting a TCP server. This validates handler logic and routing
//! without needing a live network connection.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::NaiveDateTime;
use podium_core::clock::FixedClock;
use podium_display::router::build_router;
use podium_display::state::AppState;
use podium_types::{
    Apparatus, ApparatusAssignment, Category, CategoryId, Competition, Gender, Locale, MenuItem,
    MenuItemId, MenuSection, Pause, Player, PlayerId, Rotation, Stage, StageId, Team, TeamId,
    TimelineEvent, TimelineEventId,
};
use serde_json::Value;
use tower::ServiceExt;

struct Fixture {
    state: Arc<AppState>,
    stage_id: StageId,
    pause_id: TimelineEventId,
    rotation_id: TimelineEventId,
    team_id: TeamId,
}

fn at(s: &str) -> NaiveDateTime {
    podium_types::timestamp::parse(s).unwrap()
}

/// One stage with Pause(30)@0 and Rotation(60)@1 on floor and vault,
/// starting at 10:00. The clock stands at 09:45.
fn make_fixture() -> Fixture {
    let team_id = TeamId::new();
    let player_id = PlayerId::new();
    let category_id = CategoryId::new();

    let pause_id = TimelineEventId::new();
    let rotation_id = TimelineEventId::new();
    let mut stage = Stage::new("Hall A", at("2024-01-01T10:00"));
    stage.apparatuses = BTreeMap::from([(Apparatus::Floor, 0), (Apparatus::Vault, 1)]);
    stage.timeline.insert(
        pause_id,
        TimelineEvent::Pause(Pause {
            order: 0,
            duration_in_minutes: 30,
        }),
    );
    stage.timeline.insert(
        rotation_id,
        TimelineEvent::Rotation(Rotation {
            order: 1,
            duration_in_minutes: 60,
            apparatuses: BTreeMap::from([
                (
                    Apparatus::Floor,
                    ApparatusAssignment {
                        teams: BTreeSet::from([team_id]),
                    },
                ),
                (Apparatus::Vault, ApparatusAssignment::default()),
            ]),
        }),
    );

    let stage_id = StageId::new();
    let mut doc = Competition {
        name: "Spring Cup".to_owned(),
        ..Competition::default()
    };
    doc.stages.insert(stage_id, stage);
    doc.teams.insert(
        team_id,
        Team {
            name: "TV Musterstadt".to_owned(),
            category: Some(category_id),
            players: BTreeSet::from([player_id]),
        },
    );
    doc.players.insert(
        player_id,
        Player {
            first_name: "Erika".to_owned(),
            last_name: "Muster".to_owned(),
            gender: Gender::Female,
            birth_year: Some(2010),
        },
    );
    doc.categories.insert(
        category_id,
        Category {
            name: "U14".to_owned(),
            gender: None,
        },
    );
    doc.bar_menu = vec![
        MenuItem {
            id: MenuItemId::new(),
            name: "Apple juice".to_owned(),
            section: MenuSection::Drinks,
            price_cents: 150,
            available: true,
        },
        MenuItem {
            id: MenuItemId::new(),
            name: "Cheesecake".to_owned(),
            section: MenuSection::Sweets,
            price_cents: 250,
            available: false,
        },
    ];

    let clock = Arc::new(FixedClock(at("2024-01-01T09:45")));
    Fixture {
        state: Arc::new(AppState::new(doc, clock, Locale::En)),
        stage_id,
        pause_id,
        rotation_id,
        team_id,
    }
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn get(state: &Arc<AppState>, uri: &str) -> (StatusCode, Body) {
    let response = build_router(Arc::clone(state))
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    (response.status(), response.into_body())
}

async fn send(
    state: &Arc<AppState>,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let request = match body {
        Some(json) => Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    };
    let response = build_router(Arc::clone(state)).oneshot(request).await.unwrap();
    let status = response.status();
    (status, body_to_json(response.into_body()).await)
}

// =========================================================================
// Read endpoints
// =========================================================================

#[tokio::test]
async fn test_index_returns_html() {
    let f = make_fixture();
    let (status, body) = get(&f.state, "/").await;
    assert_eq!(status, StatusCode::OK);

    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    let html = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(html.contains("Spring Cup"));
    assert!(html.contains("Hall A"));
    assert!(html.contains("starts in 15 minutes"));
}

#[tokio::test]
async fn test_index_escapes_names() {
    let f = make_fixture();
    f.state.document.write().await.name = "<i>Cup</i> & Co".to_owned();
    let (status, body) = get(&f.state, "/").await;
    assert_eq!(status, StatusCode::OK);

    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    let html = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(!html.contains("<i>Cup</i>"));
    assert!(html.contains("&lt;i&gt;Cup&lt;/i&gt; &amp; Co"));
}

#[tokio::test]
async fn test_get_competition() {
    let f = make_fixture();
    let (status, body) = get(&f.state, "/api/competition").await;
    assert_eq!(status, StatusCode::OK);
    let json = body_to_json(body).await;
    assert_eq!(json["name"], "Spring Cup");
    assert_eq!(json["stages"], 1);
    assert_eq!(json["teams"], 1);
    assert_eq!(json["menuItems"], 2);
}

#[tokio::test]
async fn test_list_stages_before_start() {
    let f = make_fixture();
    let (status, body) = get(&f.state, "/api/stages").await;
    assert_eq!(status, StatusCode::OK);
    let json = body_to_json(body).await;
    assert_eq!(json.as_array().unwrap().len(), 1);
    assert_eq!(json[0]["name"], "Hall A");
    assert_eq!(json[0]["current"]["type"], "start");
    assert_eq!(json[0]["current"]["startDate"], "2024-01-01T10:00:00");
    assert_eq!(json[0]["status"], "starts in 15 minutes");
}

#[tokio::test]
async fn test_get_stage_config() {
    let f = make_fixture();
    let (status, body) = get(&f.state, &format!("/api/stages/{}", f.stage_id)).await;
    assert_eq!(status, StatusCode::OK);
    let json = body_to_json(body).await;
    assert_eq!(json["totalBudget"], 3);
    assert_eq!(json["apparatusOrder"], serde_json::json!(["floor", "vault"]));
    assert_eq!(json["timeline"][0]["id"], f.pause_id.to_string());
    assert_eq!(json["timeline"][0]["type"], "pause");
    assert_eq!(json["timeline"][1]["id"], f.rotation_id.to_string());
    assert_eq!(json["timelineStartDate"], "2024-01-01T10:00:00");
}

#[tokio::test]
async fn test_get_current_not_found_and_invalid() {
    let f = make_fixture();
    let (status, _) = get(&f.state, &format!("/api/stages/{}/current", StageId::new())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = get(&f.state, "/api/stages/not-a-uuid/current").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let json = body_to_json(body).await;
    assert_eq!(json["status"], 400);
}

#[tokio::test]
async fn test_list_teams() {
    let f = make_fixture();
    let (status, body) = get(&f.state, "/api/teams").await;
    assert_eq!(status, StatusCode::OK);
    let json = body_to_json(body).await;
    assert_eq!(json["count"], 1);
    assert_eq!(json["teams"][0]["name"], "TV Musterstadt");
    assert_eq!(json["teams"][0]["category"], "U14");
    assert_eq!(json["teams"][0]["players"][0], "Erika Muster");
}

#[tokio::test]
async fn test_menu_hides_unavailable_items() {
    let f = make_fixture();
    let (_, body) = get(&f.state, "/api/menu").await;
    let json = body_to_json(body).await;
    assert_eq!(json["drinks"][0]["name"], "Apple juice");
    assert!(json.get("sweets").is_none());

    let (_, body) = get(&f.state, "/api/menu?all=true").await;
    let json = body_to_json(body).await;
    assert_eq!(json["sweets"][0]["name"], "Cheesecake");
    assert_eq!(json["sweets"][0]["available"], false);
}

#[tokio::test]
async fn test_nonexistent_route_returns_404() {
    let f = make_fixture();
    let (status, _) = get(&f.state, "/api/nonexistent").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// =========================================================================
// Operator endpoints
// =========================================================================

#[tokio::test]
async fn test_advance_walks_timeline_and_broadcasts() {
    let f = make_fixture();
    let mut rx = f.state.subscribe();
    let uri = format!("/api/operator/stages/{}/advance", f.stage_id);

    let (status, json) = send(&f.state, "POST", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["ok"], true);
    assert_eq!(json["stage"]["progress"], 0);
    assert_eq!(json["stage"]["current"]["type"], "pause");
    assert_eq!(json["stage"]["status"], "10:00 → 10:30");
    assert_eq!(rx.recv().await.unwrap().progress, Some(0));

    let (_, json) = send(&f.state, "POST", &uri, None).await;
    assert_eq!(json["stage"]["current"]["type"], "rotation");
    assert_eq!(json["stage"]["status"], "10:30 → 11:30");
    assert_eq!(json["stage"]["slots"][0]["label"], "Floor");
    assert_eq!(json["stage"]["slots"][0]["teams"][0]["name"], "TV Musterstadt");

    // Second pass of the rotation: the team moved on to vault.
    let (_, json) = send(&f.state, "POST", &uri, None).await;
    assert_eq!(json["stage"]["slots"][1]["teams"][0]["name"], "TV Musterstadt");
    assert_eq!(json["stage"]["current"]["position"]["index"], 1);

    let (_, json) = send(&f.state, "POST", &uri, None).await;
    assert_eq!(json["stage"]["current"]["type"], "end");
    assert_eq!(json["stage"]["current"]["endDate"], "2024-01-01T11:30:00");
    assert_eq!(json["stage"]["status"], "finished");
}

#[tokio::test]
async fn test_retreat_and_reset() {
    let f = make_fixture();
    let base = format!("/api/operator/stages/{}", f.stage_id);

    let (_, json) = send(&f.state, "POST", &format!("{base}/retreat"), None).await;
    assert!(json["stage"]["progress"].is_null());
    assert_eq!(json["stage"]["current"]["type"], "start");

    send(&f.state, "POST", &format!("{base}/advance"), None).await;
    send(&f.state, "POST", &format!("{base}/advance"), None).await;
    let (_, json) = send(&f.state, "POST", &format!("{base}/retreat"), None).await;
    assert_eq!(json["stage"]["progress"], 0);

    let (status, json) = send(&f.state, "POST", &format!("{base}/reset"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["stage"]["progress"].is_null());
}

#[tokio::test]
async fn test_operator_unknown_stage() {
    let f = make_fixture();
    let uri = format!("/api/operator/stages/{}/advance", StageId::new());
    let (status, json) = send(&f.state, "POST", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["status"], 404);
}

#[tokio::test]
async fn test_add_rotation_and_pause_coerce_duration() {
    let f = make_fixture();
    let base = format!("/api/operator/stages/{}", f.stage_id);

    let body = serde_json::json!({ "durationInMinutes": "45.7" });
    let (status, json) = send(&f.state, "POST", &format!("{base}/rotations"), Some(body)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["message"].as_str().unwrap().contains("(45 min)"));

    let body = serde_json::json!({ "durationInMinutes": "soon" });
    let (_, json) = send(&f.state, "POST", &format!("{base}/pauses"), Some(body)).await;
    assert!(json["message"].as_str().unwrap().contains("(0 min)"));

    let (_, body) = get(&f.state, &format!("/api/stages/{}", f.stage_id)).await;
    let config = body_to_json(body).await;
    // pause 1 + rotation 2 + new rotation 2 + new pause 1
    assert_eq!(config["totalBudget"], 6);
    assert_eq!(config["timeline"][2]["type"], "rotation");
    assert_eq!(config["timeline"][2]["durationInMinutes"], 45);
    assert_eq!(config["timeline"][3]["order"], 3);
}

#[tokio::test]
async fn test_assign_team() {
    let f = make_fixture();
    let uri = format!("/api/operator/stages/{}/assignments", f.stage_id);

    let body = serde_json::json!({
        "eventId": f.rotation_id,
        "apparatus": "vault",
        "teamId": f.team_id,
    });
    let (status, json) = send(&f.state, "POST", &uri, Some(body)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["message"].as_str().unwrap().ends_with("assigned"));

    let body = serde_json::json!({
        "eventId": f.pause_id,
        "apparatus": "vault",
        "teamId": f.team_id,
    });
    let (status, _) = send(&f.state, "POST", &uri, Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let body = serde_json::json!({
        "eventId": f.rotation_id,
        "apparatus": "vault",
        "teamId": TeamId::new(),
    });
    let (status, _) = send(&f.state, "POST", &uri, Some(body)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_remove_event() {
    let f = make_fixture();
    let uri = format!("/api/operator/stages/{}/events/{}", f.stage_id, f.pause_id);

    let (status, _) = send(&f.state, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&f.state, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = get(&f.state, &format!("/api/stages/{}", f.stage_id)).await;
    let config = body_to_json(body).await;
    assert_eq!(config["totalBudget"], 2);
}

#[tokio::test]
async fn test_set_apparatuses_backfills() {
    let f = make_fixture();
    let uri = format!("/api/operator/stages/{}/apparatuses", f.stage_id);
    let body = serde_json::json!({
        "apparatuses": { "floor": 0, "vault": 1, "beam": 2, "rest": 3 }
    });

    let (status, json) = send(&f.state, "PUT", &uri, Some(body)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["message"].as_str().unwrap().contains("1 entries backfilled"));

    let (_, body) = get(&f.state, &format!("/api/stages/{}", f.stage_id)).await;
    let config = body_to_json(body).await;
    // Rotation now spans floor, vault and beam; rest is not stored on it.
    assert_eq!(config["totalBudget"], 4);
    assert!(config["timeline"][1]["apparatuses"].get("beam").is_some());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_concurrent_advances_broadcast_in_order() {
    const OPERATORS: i64 = 100;

    let f = make_fixture();
    let mut rx = f.state.subscribe();
    let uri = format!("/api/operator/stages/{}/advance", f.stage_id);

    let handles: Vec<_> = (0..OPERATORS)
        .map(|_| {
            let state = Arc::clone(&f.state);
            let uri = uri.clone();
            tokio::spawn(async move { send(&state, "POST", &uri, None).await.0 })
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.await.unwrap(), StatusCode::OK);
    }

    let mut received = Vec::new();
    while let Ok(view) = rx.try_recv() {
        received.push(view.progress.unwrap());
    }
    let expected: Vec<i64> = (0..OPERATORS).collect();
    assert_eq!(received, expected);
}

#[tokio::test]
async fn test_broadcast_channel() {
    let f = make_fixture();
    let mut rx = f.state.subscribe();

    assert_eq!(f.state.refresh().await, 1);
    let view = rx.recv().await.unwrap();
    assert_eq!(view.stage_id, f.stage_id);
    assert_eq!(view.status, "starts in 15 minutes");
}
