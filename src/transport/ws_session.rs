use crate::relay::{Relay, OUTBOUND_QUEUE_CAPACITY};
use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

const FLUSH_TIMEOUT: Duration = Duration::from_secs(1);

/// Runs one relay connection. Inbound frames are handled in arrival order;
/// outbound payloads go through a channel so other sessions can fan out to
/// this socket.
pub async fn handle_socket(socket: WebSocket, relay: Arc<Relay>) {
    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::channel::<String>(OUTBOUND_QUEUE_CAPACITY);
    let session_id = relay.add_session(tx);
    tracing::debug!(session_id, "relay session opened");

    let send_task = tokio::spawn(async move {
        while let Some(payload) = rx.recv().await {
            if sender.send(Message::Text(payload)).await.is_err() {
                return;
            }
        }
        let _ = sender.send(Message::Close(None)).await;
    });

    while let Some(result) = receiver.next().await {
        let Ok(message) = result else { break };
        match message {
            Message::Text(text) => {
                if !relay.handle_text_message(&session_id, &text).await {
                    break;
                }
            }
            Message::Binary(_) => {
                tracing::debug!(session_id, "ignoring binary frame");
            }
            Message::Close(_) => break,
            _ => {}
        }
    }

    // Dropping the session's sender lets the writer flush what is queued
    // (an error reply, typically) and close the socket.
    relay.remove_session(&session_id).await;
    let abort = send_task.abort_handle();
    if tokio::time::timeout(FLUSH_TIMEOUT, send_task).await.is_err() {
        abort.abort();
    }
    tracing::debug!(session_id, "relay session closed");
}
