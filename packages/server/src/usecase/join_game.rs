//! UseCase: joining a waiting game.

use std::sync::Arc;

use crate::domain::{
    ClientId, GameId, GameRepository, JoinOutcome, Notification, NotificationPublisher, Player,
    PlayerName,
};

use super::error::GameCommandError;

pub struct JoinGameUseCase {
    repository: Arc<dyn GameRepository>,
    publisher: Arc<dyn NotificationPublisher>,
}

impl JoinGameUseCase {
    pub fn new(
        repository: Arc<dyn GameRepository>,
        publisher: Arc<dyn NotificationPublisher>,
    ) -> Self {
        Self {
            repository,
            publisher,
        }
    }

    /// Take the second seat of `game_id`.
    ///
    /// Nothing is sent to the joiner here; both seats hear about the join through the
    /// `games:joined` notification, wherever they are connected.
    pub async fn execute(
        &self,
        joiner_id: ClientId,
        game_id: GameId,
        player_name: PlayerName,
    ) -> Result<JoinOutcome, GameCommandError> {
        let outcome = self
            .repository
            .join_game(&game_id, Player::new(joiner_id, player_name))
            .await?;

        match &outcome {
            JoinOutcome::Joined(game) => {
                tracing::info!("Client '{}' joined game '{}'", joiner_id, game_id);
                self.publisher
                    .publish(&Notification::Joined(game.clone()))
                    .await?;
            }
            JoinOutcome::NotJoined => {
                tracing::debug!("Client '{}' could not join game '{}'", joiner_id, game_id);
            }
        }

        Ok(outcome)
    }
}
