//! One engine per WebSocket connection.
//!
//! Frames from the browser are `UiEvent`s; frames to the browser are
//! `PageOp`s. The engine and its credential die with the connection, which
//! is what gives the credential its page lifetime: reloading the page tears
//! down the socket and starts a fresh, unauthenticated engine.

use std::sync::Arc;

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;

use taskdock::{Engine, HttpGateway, PageHandle, PageOp, UiEvent};

use crate::AppState;

pub(crate) async fn upgrade(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| connection(socket, state))
}

async fn connection(socket: WebSocket, state: Arc<AppState>) {
    if let Err(err) = connection_inner(socket, state).await {
        tracing::warn!("page connection closed with error: {err}");
    }
}

async fn connection_inner(socket: WebSocket, state: Arc<AppState>) -> anyhow::Result<()> {
    let (mut ws_tx, mut ws_rx) = socket.split();

    let (ops_tx, mut ops_rx) = mpsc::unbounded_channel::<PageOp>();
    let (event_tx, event_rx) = mpsc::channel::<UiEvent>(32);

    let gateway = HttpGateway::new(state.backend_url.clone());
    let engine = Engine::new(gateway, PageHandle::new(ops_tx), state.engine_config.clone());
    tokio::spawn(engine.run(event_rx));

    loop {
        tokio::select! {
            op = ops_rx.recv() => {
                let Some(op) = op else { break };
                ws_tx.send(Message::Text(serde_json::to_string(&op)?.into())).await?;
            }
            frame = ws_rx.next() => {
                let Some(frame) = frame else { break };
                match frame? {
                    Message::Text(text) => match serde_json::from_str::<UiEvent>(&text) {
                        Ok(event) => {
                            if event_tx.send(event).await.is_err() {
                                break;
                            }
                        }
                        Err(err) => tracing::debug!(%err, "ignoring malformed ui event"),
                    },
                    Message::Close(_) => break,
                    Message::Ping(payload) => ws_tx.send(Message::Pong(payload)).await?,
                    Message::Pong(_) | Message::Binary(_) => {}
                }
            }
        }
    }

    // Dropping our event sender is what stops the engine.
    Ok(())
}
