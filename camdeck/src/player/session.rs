//! WebSocket session loop for a dashboard player.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use futures::stream::SplitSink;
use futures::{SinkExt, StreamExt};
use playsync::SyncEngine;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::player::handle::RemoteHandle;
use crate::player::protocol::{ClientMessage, ServerCommand};

/// Drive one player session until its socket closes.
///
/// The player is registered with the engine on its `hello`; state reports
/// keep the handle current, and engine commands are forwarded by a writer
/// task. When the socket closes the command receiver is dropped, so an
/// in-flight pass sees the handle as detached instead of hanging.
pub async fn run(socket: WebSocket, engine: Arc<SyncEngine>) {
    let (sink, mut messages) = socket.split();

    // The first well-formed message must announce the carried stream.
    let stream = loop {
        match messages.next().await {
            Some(Ok(Message::Text(text))) => match serde_json::from_str::<ClientMessage>(&text) {
                Ok(ClientMessage::Hello { stream }) => break stream,
                Ok(ClientMessage::State { .. }) => {
                    warn!("player session sent state before hello");
                }
                Err(error) => warn!(%error, "malformed player message"),
            },
            Some(Ok(Message::Close(_))) | None => return,
            Some(Ok(_)) => {}
            Some(Err(error)) => {
                debug!(%error, "player socket error before hello");
                return;
            }
        }
    };

    let (handle, commands) = RemoteHandle::channel(stream.clone());
    engine.register(Arc::clone(&handle)).await;
    info!(stream = %stream, "player session registered");

    let writer = tokio::spawn(forward_commands(commands, sink));

    while let Some(message) = messages.next().await {
        match message {
            Ok(Message::Text(text)) => match serde_json::from_str::<ClientMessage>(&text) {
                Ok(ClientMessage::State {
                    current_time,
                    ready_state,
                    buffered,
                }) => {
                    handle.apply_report(current_time, ready_state, &buffered);
                }
                // The session is already bound to a stream.
                Ok(ClientMessage::Hello { .. }) => {}
                Err(error) => warn!(stream = %stream, %error, "malformed player message"),
            },
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(error) => {
                debug!(stream = %stream, %error, "player socket error");
                break;
            }
        }
    }

    writer.abort();
    info!(stream = %stream, "player session closed");
}

async fn forward_commands(
    mut commands: mpsc::Receiver<ServerCommand>,
    mut sink: SplitSink<WebSocket, Message>,
) {
    while let Some(command) = commands.recv().await {
        let payload = match serde_json::to_string(&command) {
            Ok(payload) => payload,
            Err(error) => {
                warn!(%error, "failed to encode player command");
                continue;
            }
        };

        if sink.send(Message::Text(payload.into())).await.is_err() {
            break;
        }
    }
}
