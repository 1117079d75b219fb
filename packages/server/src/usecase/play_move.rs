//! UseCase: playing a move.

use std::sync::Arc;

use crate::domain::{
    ClientId, GameId, GameRepository, Move, Notification, NotificationPublisher, PlayOutcome,
};

use super::error::GameCommandError;

pub struct PlayMoveUseCase {
    repository: Arc<dyn GameRepository>,
    publisher: Arc<dyn NotificationPublisher>,
}

impl PlayMoveUseCase {
    pub fn new(
        repository: Arc<dyn GameRepository>,
        publisher: Arc<dyn NotificationPublisher>,
    ) -> Self {
        Self {
            repository,
            publisher,
        }
    }

    pub async fn execute(
        &self,
        player_id: ClientId,
        game_id: GameId,
        mv: Move,
    ) -> Result<PlayOutcome, GameCommandError> {
        let outcome = self.repository.play_move(&game_id, &player_id, mv).await?;

        match &outcome {
            PlayOutcome::Played(game) => {
                tracing::info!(
                    "Client '{}' played {} in game '{}'{}",
                    player_id,
                    mv,
                    game_id,
                    if game.is_done() { ", game over" } else { "" }
                );
                self.publisher
                    .publish(&Notification::Played {
                        game: game.clone(),
                        player_id,
                        mv,
                    })
                    .await?;
            }
            PlayOutcome::NotPlayed => {
                tracing::debug!("Move of '{}' in game '{}' rejected", player_id, game_id);
            }
        }

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{
            ClientIdFactory, GameIdFactory, JoinOutcome, Player, PlayerName,
            notification::MockNotificationPublisher,
        },
        infrastructure::repository::InMemoryGameRepository,
    };

    fn player(value: &str) -> Player {
        Player::new(
            ClientIdFactory::generate(),
            PlayerName::new(value.to_string()).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_second_move_publishes_done_game() {
        // given:
        let repository = Arc::new(InMemoryGameRepository::new());
        let alice = player("Alice");
        let bob = player("Bob");
        let game = repository.create_game(alice.clone()).await.unwrap();
        let JoinOutcome::Joined(game) = repository.join_game(&game.id(), bob.clone()).await.unwrap()
        else {
            panic!("join should succeed");
        };

        let mut publisher = MockNotificationPublisher::new();
        let alice_id = alice.id;
        publisher
            .expect_publish()
            .withf(move |n| {
                matches!(n, Notification::Played { game, player_id, mv: Move::Rock }
                    if *player_id == alice_id && !game.is_done())
            })
            .times(1)
            .returning(|_| Ok(()));
        let bob_id = bob.id;
        publisher
            .expect_publish()
            .withf(move |n| {
                matches!(n, Notification::Played { game, player_id, mv: Move::Scissors }
                    if *player_id == bob_id && game.is_done())
            })
            .times(1)
            .returning(|_| Ok(()));
        let usecase = PlayMoveUseCase::new(repository, Arc::new(publisher));

        // when:
        usecase.execute(alice.id, game.id(), Move::Rock).await.unwrap();
        let outcome = usecase
            .execute(bob.id, game.id(), Move::Scissors)
            .await
            .unwrap();

        // then:
        let PlayOutcome::Played(game) = outcome else {
            panic!("move should be accepted");
        };
        assert_eq!(game.moves(), [Some(Move::Rock), Some(Move::Scissors)]);
    }

    #[tokio::test]
    async fn test_rejected_move_publishes_nothing() {
        // given: a game that does not exist
        let mut publisher = MockNotificationPublisher::new();
        publisher.expect_publish().never();
        let usecase = PlayMoveUseCase::new(
            Arc::new(InMemoryGameRepository::new()),
            Arc::new(publisher),
        );

        // when:
        let outcome = usecase
            .execute(ClientIdFactory::generate(), GameIdFactory::generate(), Move::Paper)
            .await
            .unwrap();

        // then:
        assert_eq!(outcome, PlayOutcome::NotPlayed);
    }
}
