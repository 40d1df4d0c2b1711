//! WebSocket handler: the multiplexed event channel.
//!
//! Every client (capture device, controller, plain observer) shares
//! this one endpoint. Frames are JSON tagged with an `event` field; see
//! [`dentacam_types::protocol`] for the wire shapes.

use std::sync::Arc;

use axum::{
    Router,
    extract::{
        State, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    response::IntoResponse,
    routing::get,
};
use futures::{Sink, SinkExt, StreamExt};
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info, warn};

use dentacam_core::ClientHandle;
use dentacam_types::{ClientEvent, ConnectionId, ServerEvent};

use crate::state::AppState;

/// Create the WebSocket router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/api/ws", get(ws_handler))
}

/// WebSocket upgrade handler.
async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle one channel connection from connect to disconnect.
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();

    let id = ConnectionId::new();
    let (tx, mut personal_rx) = mpsc::unbounded_channel::<ServerEvent>();
    let handle = ClientHandle::new(id, tx);

    // Subscribe to status updates FIRST (before reading the snapshot) so
    // no transition can slip between snapshot and subscription.
    let mut status_rx = state.coordinator.subscribe();

    info!(%id, "channel client connected");

    // Unicast the current status immediately: late joiners must see
    // correct state without waiting for the next transition.
    let snapshot = ServerEvent::status(state.coordinator.status().await);
    if send_event(&mut sender, &snapshot).await.is_err() {
        info!(%id, "channel client disconnected during handshake");
        return;
    }

    // Outbound pump: merge broadcast status updates with frames targeted
    // at this client (capture commands, targeted errors).
    let mut send_task = tokio::spawn(async move {
        loop {
            let event = tokio::select! {
                personal = personal_rx.recv() => match personal {
                    Some(event) => event,
                    None => break,
                },
                status = status_rx.recv() => match status {
                    Ok(event) => event,
                    Err(broadcast::error::RecvError::Lagged(missed)) => {
                        // Status delivery is at-most-once; a slow observer
                        // catches up on the next transition.
                        warn!(missed, "observer lagged behind status updates");
                        continue;
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                },
            };
            if send_event(&mut sender, &event).await.is_err() {
                break;
            }
        }
    });

    // Inbound pump: parse client frames and drive the coordinator.
    let recv_state = Arc::clone(&state);
    let recv_handle = handle.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(result) = receiver.next().await {
            match result {
                Ok(Message::Text(text)) => match serde_json::from_str::<ClientEvent>(&text) {
                    Ok(ClientEvent::RegisterPi) => {
                        recv_state.coordinator.register(recv_handle.clone()).await;
                    }
                    Ok(ClientEvent::UiAuthorizePi) => {
                        // On failure the requester already got the wire
                        // error frame; nothing else to do here.
                        if let Err(e) = recv_state.coordinator.authorize(&recv_handle).await {
                            debug!(id = %recv_handle.id(), %e, "authorize request failed");
                        }
                    }
                    Err(e) => {
                        // Malformed frames never terminate the connection.
                        warn!(id = %recv_handle.id(), %e, "ignoring unrecognized frame");
                    }
                },
                Ok(Message::Close(_)) => break,
                Ok(_) => {
                    // Binary, ping, pong: nothing to route.
                }
                Err(e) => {
                    warn!(id = %recv_handle.id(), %e, "websocket receive error");
                    break;
                }
            }
        }
    });

    // Wait for either task to finish, then abort the other.
    tokio::select! {
        _ = &mut send_task => {
            recv_task.abort();
        },
        _ = &mut recv_task => {
            send_task.abort();
        },
    }

    // A transport drop is an unconditional implicit unregister; handles
    // the coordinator never saw are a harmless no-op.
    state.coordinator.disconnect(id).await;

    info!(%id, "channel client disconnected");
}

/// Serialize and send one frame.
async fn send_event(
    sender: &mut (impl Sink<Message> + Unpin),
    event: &ServerEvent,
) -> Result<(), ()> {
    let json = match serde_json::to_string(event) {
        Ok(j) => j,
        Err(e) => {
            warn!(%e, "failed to serialize event");
            return Ok(());
        }
    };
    sender.send(Message::Text(json.into())).await.map_err(|_| ())
}
