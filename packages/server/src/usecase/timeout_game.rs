//! UseCase: forcing a game to its end.

use std::sync::Arc;

use crate::domain::{
    GameId, GameRepository, Notification, NotificationPublisher, TimeoutOutcome,
};

use super::error::GameCommandError;

pub struct TimeoutGameUseCase {
    repository: Arc<dyn GameRepository>,
    publisher: Arc<dyn NotificationPublisher>,
}

impl TimeoutGameUseCase {
    pub fn new(
        repository: Arc<dyn GameRepository>,
        publisher: Arc<dyn NotificationPublisher>,
    ) -> Self {
        Self {
            repository,
            publisher,
        }
    }

    /// Idempotent: a game that already ended reports `AlreadyDone` and publishes nothing.
    pub async fn execute(&self, game_id: &GameId) -> Result<TimeoutOutcome, GameCommandError> {
        let outcome = self.repository.timeout_game(game_id).await?;

        if let TimeoutOutcome::Timed(game) = &outcome {
            tracing::info!("Game '{}' timed out", game_id);
            self.publisher
                .publish(&Notification::Timeout(game.clone()))
                .await?;
        }

        Ok(outcome)
    }
}
