//! WebSocket-backed [`ConnectionRegistry`].
//!
//! The UI layer owns the socket and hands the sending half of its outbound queue to
//! [`ConnectionRegistry::register_client`]. This type only keeps those senders and
//! encodes [`OutboundMessage`]s into frames for them.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{
    domain::{ClientId, ClientIdFactory, ConnectionRegistry, OutboundMessage, PusherChannel},
    infrastructure::dto::websocket::WsMessage,
};

#[derive(Default)]
pub struct WebSocketConnectionRegistry {
    clients: Mutex<HashMap<ClientId, PusherChannel>>,
}

impl WebSocketConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

fn encode(message: &OutboundMessage) -> Option<String> {
    match WsMessage::from(message).encode() {
        Ok(frame) => Some(frame),
        Err(e) => {
            tracing::warn!("Failed to encode '{}' message: {}", message.event(), e);
            None
        }
    }
}

#[async_trait]
impl ConnectionRegistry for WebSocketConnectionRegistry {
    async fn register_client(&self, sender: PusherChannel) -> ClientId {
        let mut clients = self.clients.lock().await;
        let client_id = loop {
            let candidate = ClientIdFactory::generate();
            if !clients.contains_key(&candidate) {
                break candidate;
            }
        };
        clients.insert(client_id, sender);
        tracing::debug!(
            "Client '{}' registered ({} connected)",
            client_id,
            clients.len()
        );
        client_id
    }

    async fn unregister_client(&self, client_id: &ClientId) {
        let mut clients = self.clients.lock().await;
        if clients.remove(client_id).is_some() {
            tracing::debug!(
                "Client '{}' unregistered ({} connected)",
                client_id,
                clients.len()
            );
        }
    }

    async fn is_connected(&self, client_id: &ClientId) -> bool {
        self.clients.lock().await.contains_key(client_id)
    }

    async fn push_to(&self, client_id: &ClientId, message: &OutboundMessage) -> bool {
        let clients = self.clients.lock().await;
        let Some(sender) = clients.get(client_id) else {
            return false;
        };
        let Some(frame) = encode(message) else {
            return false;
        };

        match sender.send(frame) {
            Ok(()) => {
                tracing::debug!("Pushed '{}' to client '{}'", message.event(), client_id);
                true
            }
            Err(e) => {
                // The socket task is already gone; unregistering is its job.
                tracing::warn!("Failed to push to client '{}': {}", client_id, e);
                false
            }
        }
    }

    async fn broadcast_except(&self, excluded: &ClientId, message: &OutboundMessage) {
        let Some(frame) = encode(message) else {
            return;
        };
        let clients = self.clients.lock().await;
        let mut sent = 0;
        for (client_id, sender) in clients.iter().filter(|(id, _)| *id != excluded) {
            match sender.send(frame.clone()) {
                Ok(()) => sent += 1,
                Err(e) => tracing::warn!("Failed to push to client '{}': {}", client_id, e),
            }
        }
        tracing::debug!("Broadcasted '{}' to {} client(s)", message.event(), sent);
    }

    async fn broadcast_all(&self, message: &OutboundMessage) {
        let Some(frame) = encode(message) else {
            return;
        };
        let clients = self.clients.lock().await;
        for (client_id, sender) in clients.iter() {
            if let Err(e) = sender.send(frame.clone()) {
                tracing::warn!("Failed to push to client '{}': {}", client_id, e);
            }
        }
        tracing::debug!(
            "Broadcasted '{}' to {} client(s)",
            message.event(),
            clients.len()
        );
    }
}
