//! UseCase: client connection.

use std::sync::Arc;

use crate::domain::{ClientId, ConnectionRegistry, GameRepository, OutboundMessage, PusherChannel};

pub struct ConnectClientUseCase {
    repository: Arc<dyn GameRepository>,
    registry: Arc<dyn ConnectionRegistry>,
}

impl ConnectClientUseCase {
    pub fn new(repository: Arc<dyn GameRepository>, registry: Arc<dyn ConnectionRegistry>) -> Self {
        Self {
            repository,
            registry,
        }
    }

    /// Register the connection, then greet it with its id and the games it can join.
    pub async fn execute(&self, sender: PusherChannel) -> ClientId {
        let client_id = self.registry.register_client(sender).await;
        tracing::info!("Client '{}' connected", client_id);

        self.registry
            .push_to(&client_id, &OutboundMessage::Registered { id: client_id })
            .await;

        let games = match self.repository.list_available_games(&client_id).await {
            Ok(games) => games,
            Err(e) => {
                tracing::warn!("Failed to list available games for '{}': {}", client_id, e);
                Vec::new()
            }
        };
        self.registry
            .push_to(&client_id, &OutboundMessage::Available { games })
            .await;

        client_id
    }
}
