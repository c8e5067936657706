//! `WebSocket` handler for live stage views.
//!
//! Clients connect to `GET /ws/stages`, receive the current view of every
//! stage once, then a JSON-encoded [`StageView`] each time a stage changes
//! or the periodic refresh runs.
//!
//! If a client falls behind, lagged messages are silently skipped and
//! the client resumes from the most recent view.
//!
//! [`StageView`]: crate::state::StageView

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use serde::Serialize;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};

use crate::state::AppState;

/// Upgrade an HTTP request to a `WebSocket` connection and begin
/// streaming stage views.
///
/// # Route
///
/// `GET /ws/stages`
pub async fn ws_stages(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_ws(socket, state))
}

/// Serialize and send one message. `false` when the client is gone.
async fn send_json<T: Serialize>(socket: &mut WebSocket, value: &T) -> bool {
    let json = match serde_json::to_string(value) {
        Ok(j) => j,
        Err(e) => {
            warn!("Failed to serialize stage view: {e}");
            return true;
        }
    };
    socket.send(Message::Text(json.into())).await.is_ok()
}

async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
    debug!("WebSocket client connected");

    // Subscribe before the snapshot so no change is lost in between.
    let mut rx = state.subscribe();

    for view in state.stage_views().await {
        if !send_json(&mut socket, &view).await {
            debug!("WebSocket client gone before initial snapshot was sent");
            return;
        }
    }

    loop {
        let keep_going = tokio::select! {
            result = rx.recv() => match result {
                Ok(view) => send_json(&mut socket, &view).await,
                Err(RecvError::Lagged(skipped)) => {
                    debug!(skipped, "WebSocket client lagged, skipping ahead");
                    true
                }
                Err(RecvError::Closed) => false,
            },
            frame = socket.recv() => on_client_frame(&mut socket, frame).await,
        };
        if !keep_going {
            debug!("WebSocket session closed");
            return;
        }
    }
}

/// React to a frame from the client. `false` ends the session.
async fn on_client_frame(
    socket: &mut WebSocket,
    frame: Option<Result<Message, axum::Error>>,
) -> bool {
    match frame {
        None | Some(Ok(Message::Close(_))) => false,
        Some(Ok(Message::Ping(data))) => socket.send(Message::Pong(data)).await.is_ok(),
        Some(Err(e)) => {
            debug!(error = %e, "WebSocket receive failed");
            false
        }
        // Screens only listen.
        Some(Ok(_)) => true,
    }
}
