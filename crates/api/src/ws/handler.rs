//! WebSocket connection lifecycle.
//!
//! Each connection registers as the sole subscriber for its user's channel;
//! a newer connection for the same user replaces the older one, whose send
//! loop then observes a closed channel and exits.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use serde::Deserialize;

use focusdesk_core::event::user_channel;
use focusdesk_core::types::DbId;
use focusdesk_events::Notifier;

use crate::state::AppState;

/// Query parameters for `GET /ws`.
#[derive(Debug, Deserialize)]
pub struct WsParams {
    /// Already-authenticated user whose events this connection receives.
    pub user_id: DbId,
}

/// HTTP handler that upgrades the connection to WebSocket.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(params): Query<WsParams>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let heartbeat = Duration::from_secs(state.config.ws_heartbeat_secs);
    ws.on_upgrade(move |socket| {
        handle_socket(socket, state.notifier, params.user_id, heartbeat)
    })
}

/// Manage a single WebSocket connection after upgrade.
///
/// Splits the socket into a sink (outbound) and stream (inbound), then:
///   1. Subscribes to the user's notification channel.
///   2. Spawns a sender task that forwards published events as JSON text
///      frames and pings on the heartbeat interval.
///   3. Processes inbound messages on the current task.
///   4. Unsubscribes on disconnect, token-scoped so a replacement
///      connection is left untouched.
async fn handle_socket(
    socket: WebSocket,
    notifier: Arc<Notifier>,
    user_id: DbId,
    heartbeat: Duration,
) {
    let channel = user_channel(user_id);
    let mut subscription = notifier.subscribe(channel.clone()).await;
    let token = subscription.token;
    tracing::info!(user_id, "WebSocket connected");

    let (mut sink, mut stream) = socket.split();

    // Sender task: forward published events, ping on the heartbeat interval.
    let send_task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(heartbeat);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        loop {
            tokio::select! {
                event = subscription.receiver.recv() => {
                    // None: unsubscribed, replaced, or server shutdown.
                    let Some(event) = event else { break };
                    let frame = match serde_json::to_string(&event) {
                        Ok(json) => Message::Text(json.into()),
                        Err(e) => {
                            tracing::error!(user_id, error = %e, "Failed to serialize event");
                            continue;
                        }
                    };
                    if sink.send(frame).await.is_err() {
                        tracing::debug!(user_id, "WebSocket sink closed");
                        break;
                    }
                }
                _ = ticker.tick() => {
                    if sink.send(Message::Ping(Vec::new().into())).await.is_err() {
                        break;
                    }
                }
            }
        }
    });

    // Receiver loop: process inbound messages.
    while let Some(result) = stream.next().await {
        match result {
            Ok(Message::Close(_)) => break,
            Ok(Message::Pong(_)) => {
                tracing::trace!(user_id, "Pong received");
            }
            Ok(_msg) => {
                // Push-only endpoint; inbound frames are ignored.
            }
            Err(e) => {
                tracing::debug!(user_id, error = %e, "WebSocket receive error");
                break;
            }
        }
    }

    notifier.unsubscribe(&channel, token).await;
    send_task.abort();
    tracing::info!(user_id, "WebSocket disconnected");
}
