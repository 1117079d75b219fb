//! UseCase: client disconnection.

use std::sync::Arc;

use crate::domain::{
    ClientId, ConnectionRegistry, Game, GameRepository, Notification, NotificationPublisher,
};

use super::error::GameCommandError;

pub struct DisconnectClientUseCase {
    repository: Arc<dyn GameRepository>,
    registry: Arc<dyn ConnectionRegistry>,
    publisher: Arc<dyn NotificationPublisher>,
}

impl DisconnectClientUseCase {
    pub fn new(
        repository: Arc<dyn GameRepository>,
        registry: Arc<dyn ConnectionRegistry>,
        publisher: Arc<dyn NotificationPublisher>,
    ) -> Self {
        Self {
            repository,
            registry,
            publisher,
        }
    }

    /// Forget the connection and end every unfinished game the client sits in, so the
    /// opponent is not left waiting.
    ///
    /// Returns the games this call moved to `Done`.
    pub async fn execute(&self, client_id: &ClientId) -> Result<Vec<Game>, GameCommandError> {
        self.registry.unregister_client(client_id).await;
        tracing::info!("Client '{}' disconnected", client_id);

        let timed = self.repository.timeout_player_games(client_id).await?;
        for game in &timed {
            tracing::info!("Game '{}' timed out: '{}' left", game.id(), client_id);
            if let Err(e) = self
                .publisher
                .publish(&Notification::Timeout(game.clone()))
                .await
            {
                tracing::warn!("Failed to publish timeout of game '{}': {}", game.id(), e);
            }
        }

        Ok(timed)
    }
}
