//! UseCase: game creation.

use std::sync::Arc;

use crate::domain::{
    ClientId, ConnectionRegistry, Game, GameRepository, Notification, NotificationPublisher,
    OutboundMessage, Player, PlayerName,
};

use super::error::GameCommandError;

pub struct CreateGameUseCase {
    repository: Arc<dyn GameRepository>,
    registry: Arc<dyn ConnectionRegistry>,
    publisher: Arc<dyn NotificationPublisher>,
}

impl CreateGameUseCase {
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

    /// Open a game with the client in the first seat.
    ///
    /// The creator is acknowledged directly; everybody else learns about the game through
    /// the `games:created` notification.
    pub async fn execute(
        &self,
        creator_id: ClientId,
        player_name: PlayerName,
    ) -> Result<Game, GameCommandError> {
        let game = self
            .repository
            .create_game(Player::new(creator_id, player_name))
            .await?;
        tracing::info!("Game '{}' created by '{}'", game.id(), creator_id);

        self.registry
            .push_to(&creator_id, &OutboundMessage::Created { id: game.id() })
            .await;
        self.publisher
            .publish(&Notification::Created(game.clone()))
            .await?;

        Ok(game)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{GameState, RepositoryError, notification::MockNotificationPublisher, repository::MockGameRepository},
        infrastructure::{
            connection_registry::WebSocketConnectionRegistry, repository::InMemoryGameRepository,
        },
    };
    use tokio::sync::mpsc;

    fn name(value: &str) -> PlayerName {
        PlayerName::new(value.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_create_acknowledges_creator_and_publishes() {
        // given:
        let registry = Arc::new(WebSocketConnectionRegistry::new());
        let (tx, mut rx) = mpsc::unbounded_channel();
        let alice = registry.register_client(tx).await;
        let mut publisher = MockNotificationPublisher::new();
        publisher
            .expect_publish()
            .withf(move |n| {
                matches!(n, Notification::Created(game)
                    if game.first_player().id == alice && game.state() == GameState::WaitingForPlayer)
            })
            .times(1)
            .returning(|_| Ok(()));
        let usecase = CreateGameUseCase::new(
            Arc::new(InMemoryGameRepository::new()),
            registry,
            Arc::new(publisher),
        );

        // when:
        let game = usecase.execute(alice, name("Alice")).await.unwrap();

        // then:
        let frame: serde_json::Value = serde_json::from_str(&rx.try_recv().unwrap()).unwrap();
        assert_eq!(frame["event"], "created");
        assert_eq!(frame["payload"]["id"], game.id().to_string());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_create_failure_sends_nothing() {
        // given:
        let mut repository = MockGameRepository::new();
        repository
            .expect_create_game()
            .returning(|_| Err(RepositoryError::CorruptRow("broken".to_string())));
        let mut publisher = MockNotificationPublisher::new();
        publisher.expect_publish().never();
        let registry = Arc::new(WebSocketConnectionRegistry::new());
        let (tx, mut rx) = mpsc::unbounded_channel();
        let alice = registry.register_client(tx).await;
        let usecase = CreateGameUseCase::new(Arc::new(repository), registry, Arc::new(publisher));

        // when:
        let result = usecase.execute(alice, name("Alice")).await;

        // then:
        assert!(matches!(result, Err(GameCommandError::Repository(_))));
        assert!(rx.try_recv().is_err());
    }
}
