//! WebSocket connection handlers.
//!
//! Each socket gets two tasks: one pumps the client's outbound queue into the socket, the
//! other reads frames and dispatches them. Frames from one socket are handled one at a
//! time, in arrival order.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, StreamExt},
};
use tokio::sync::mpsc;

use crate::{
    domain::{ClientId, GameId, Move, PlayerName},
    infrastructure::dto::websocket::{GameEvent, WsMessage},
    ui::state::AppState,
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Spawns a task that receives messages from the rx channel and pushes them to the WebSocket sender.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (sender, mut receiver) = socket.split();
    let (tx, rx) = mpsc::unbounded_channel();

    // Registered and available are queued before the pusher starts.
    let client_id = state.connect_client_usecase.execute(tx).await;

    let state_clone = state.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::debug!("WebSocket error from '{}': {}", client_id, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => dispatch(&state_clone, client_id, text.as_str()).await,
                Message::Close(_) => {
                    tracing::debug!("Client '{}' requested close", client_id);
                    break;
                }
                // Ping/pong is handled by the WebSocket protocol layer
                _ => {}
            }
        }
    });

    let mut send_task = pusher_loop(rx, sender);

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    if let Err(e) = state.disconnect_client_usecase.execute(&client_id).await {
        tracing::warn!("Failed to clean up after '{}': {}", client_id, e);
    }
}

async fn dispatch(state: &AppState, client_id: ClientId, text: &str) {
    let message = match WsMessage::decode(text) {
        Ok(message) => message,
        Err(e) => {
            tracing::debug!("Dropped frame from '{}': {}", client_id, e);
            return;
        }
    };

    match message {
        WsMessage::Games(GameEvent::Create(payload)) => {
            let Some(player_name) = parse_player_name(client_id, payload.player_name) else {
                return;
            };
            if let Err(e) = state
                .create_game_usecase
                .execute(client_id, player_name)
                .await
            {
                tracing::warn!("Failed to create game for '{}': {}", client_id, e);
            }
        }
        WsMessage::Games(GameEvent::Join(payload)) => {
            let Some(game_id) = parse_game_id(client_id, payload.id) else {
                return;
            };
            let Some(player_name) = parse_player_name(client_id, payload.player_name) else {
                return;
            };
            if let Err(e) = state
                .join_game_usecase
                .execute(client_id, game_id, player_name)
                .await
            {
                tracing::warn!("Failed to join game '{}' for '{}': {}", game_id, client_id, e);
            }
        }
        WsMessage::Games(GameEvent::Play(payload)) => {
            let Some(game_id) = parse_game_id(client_id, payload.id) else {
                return;
            };
            if let Err(e) = state
                .play_move_usecase
                .execute(client_id, game_id, Move::from(payload.mv))
                .await
            {
                tracing::warn!("Failed to play in game '{}' for '{}': {}", game_id, client_id, e);
            }
        }
        other => {
            tracing::debug!("Ignored server-side message from '{}': {:?}", client_id, other);
        }
    }
}

fn parse_game_id(client_id: ClientId, value: String) -> Option<GameId> {
    match GameId::try_from(value) {
        Ok(game_id) => Some(game_id),
        Err(e) => {
            tracing::debug!("Dropped frame from '{}': {}", client_id, e);
            None
        }
    }
}

fn parse_player_name(client_id: ClientId, value: String) -> Option<PlayerName> {
    match PlayerName::new(value) {
        Ok(name) => Some(name),
        Err(e) => {
            tracing::debug!("Dropped frame from '{}': {}", client_id, e);
            None
        }
    }
}
