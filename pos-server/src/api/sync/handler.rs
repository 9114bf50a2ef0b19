//! Sync WebSocket handler
//!
//! One-way push of [`shared::sync::SyncPayload`] to connected POS
//! terminals. Incoming text frames from the terminal are ignored except
//! for close; a terminal that falls behind the broadcast buffer is
//! disconnected and reconnects with a full fetch.

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use tokio::sync::broadcast::error::RecvError;

use crate::auth::CurrentUser;
use crate::core::ServerState;

/// GET /api/sync/ws — upgrade to WebSocket
pub async fn handle_sync_ws(
    State(state): State<ServerState>,
    user: CurrentUser,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_ws_connection(socket, state, user))
}

async fn handle_ws_connection(socket: WebSocket, state: ServerState, user: CurrentUser) {
    tracing::info!(user = %user.username, "sync WebSocket connected");

    let mut rx = state.sync.subscribe();
    let (mut ws_sink, mut ws_stream) = socket.split();

    loop {
        tokio::select! {
            payload = rx.recv() => {
                match payload {
                    Ok(payload) => {
                        let text = match serde_json::to_string(&payload) {
                            Ok(text) => text,
                            Err(e) => {
                                tracing::error!("could not serialize sync payload: {e}");
                                continue;
                            }
                        };
                        if ws_sink.send(Message::Text(text.into())).await.is_err() {
                            break;
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(
                            user = %user.username,
                            skipped,
                            "sync subscriber lagged, closing for full refetch"
                        );
                        break;
                    }
                    Err(RecvError::Closed) => break,
                }
            }
            incoming = ws_stream.next() => {
                match incoming {
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    Some(Ok(Message::Ping(data))) => {
                        if ws_sink.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(_)) => {}
                }
            }
        }
    }

    tracing::info!(user = %user.username, "sync WebSocket disconnected");
}
