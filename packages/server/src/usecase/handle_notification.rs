//! UseCase: delivering a committed state change to the clients of this process.
//!
//! Every process runs this for every notification, including the ones it published
//! itself. The registry only reaches local sockets, so each client hears about a change
//! exactly from the process it is connected to. Handlers work from the game carried in
//! the notification and tolerate duplicate delivery. A join is the one exception: it
//! starts countdowns, so its game is re-read first and a redelivered join of a finished
//! game is dropped.

use std::sync::Arc;

use crate::domain::{
    ClientId, ConnectionRegistry, Game, GameRepository, GameState, Move, Notification,
    OutboundMessage,
};

use super::countdown::CountdownScheduler;

pub struct HandleNotificationUseCase {
    repository: Arc<dyn GameRepository>,
    registry: Arc<dyn ConnectionRegistry>,
    countdown: Arc<CountdownScheduler>,
}

impl HandleNotificationUseCase {
    pub fn new(
        repository: Arc<dyn GameRepository>,
        registry: Arc<dyn ConnectionRegistry>,
        countdown: Arc<CountdownScheduler>,
    ) -> Self {
        Self {
            repository,
            registry,
            countdown,
        }
    }

    /// Handle one notification.
    ///
    /// Notifications must be handled one at a time: a Done notification handled after a
    /// join then always cancels the countdowns that join started.

    pub async fn execute(&self, notification: Notification) {
        match notification {
            Notification::Created(game) => self.on_created(game).await,
            Notification::Joined(game) => self.on_joined(game).await,
            Notification::Played {
                game,
                player_id,
                mv,
            } => self.on_played(game, player_id, mv).await,
            Notification::Timeout(game) => self.on_timeout(game).await,
        }
    }

    async fn on_created(&self, game: Game) {
        let creator = game.first_player().id;
        self.registry
            .broadcast_except(&creator, &OutboundMessage::Available { games: vec![game] })
            .await;
    }

    async fn on_joined(&self, game: Game) {
        let Some(joiner) = game.second_player().cloned() else {
            tracing::warn!("Joined notification for game '{}' without a second player", game.id());
            return;
        };

        match self.repository.game_state(&game.id()).await {
            Ok(Some(GameState::Done)) | Ok(None) => {
                tracing::debug!("Dropped join of game '{}': game is over", game.id());
                return;
            }
            Ok(Some(_)) => {}
            // Go ahead; the closing timeout is a no-op on a done game.
            Err(e) => tracing::warn!("Failed to read state of game '{}': {}", game.id(), e),
        }

        self.registry
            .broadcast_all(&OutboundMessage::Joined {
                game_id: game.id(),
                player: joiner,
            })
            .await;

        for participant in game.participant_ids() {
            if self.registry.is_connected(&participant).await {
                self.countdown.start(game.id(), participant).await;
            }
        }
    }

    async fn on_played(&self, game: Game, player_id: ClientId, mv: Move) {
        if !game.is_done() {
            let Some(opponent) = game.opponent_of(&player_id) else {
                tracing::warn!("Move of '{}' in game '{}' without opponent", player_id, game.id());
                return;
            };
            self.registry
                .push_to(
                    &opponent.id,
                    &OutboundMessage::Played {
                        game_id: game.id(),
                        player_id,
                        mv,
                    },
                )
                .await;
            return;
        }

        self.countdown.cancel(&game.id()).await;
        let participants = game.participant_ids();
        let done = OutboundMessage::Done { game };
        for participant in participants {
            self.registry.push_to(&participant, &done).await;
        }
    }

    async fn on_timeout(&self, game: Game) {
        self.countdown.cancel(&game.id()).await;
        self.registry
            .broadcast_all(&OutboundMessage::Done { game })
            .await;
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::{
        domain::{
            ClientIdFactory, GameRepository, GameState, JoinOutcome, PlayOutcome, Player,
            PlayerName, TimeoutOutcome,
            notification::MockNotificationPublisher,
        },
        infrastructure::{
            connection_registry::WebSocketConnectionRegistry, repository::InMemoryGameRepository,
        },
        usecase::{CountdownConfig, TimeoutGameUseCase},
    };
    use tokio::sync::mpsc;

    struct Client {
        id: ClientId,
        rx: mpsc::UnboundedReceiver<String>,
    }

    impl Client {
        fn frames(&mut self) -> Vec<serde_json::Value> {
            let mut frames = Vec::new();
            while let Ok(text) = self.rx.try_recv() {
                frames.push(serde_json::from_str(&text).unwrap());
            }
            frames
        }

        fn player(&self, name: &str) -> Player {
            Player::new(self.id, PlayerName::new(name.to_string()).unwrap())
        }
    }

    struct Fixture {
        usecase: HandleNotificationUseCase,
        countdown: Arc<CountdownScheduler>,
        registry: Arc<WebSocketConnectionRegistry>,
        repository: Arc<InMemoryGameRepository>,
    }

    impl Fixture {
        fn new() -> Self {
            let repository = Arc::new(InMemoryGameRepository::new());
            let registry = Arc::new(WebSocketConnectionRegistry::new());
            let mut publisher = MockNotificationPublisher::new();
            publisher.expect_publish().returning(|_| Ok(()));
            let countdown = Arc::new(CountdownScheduler::new(
                registry.clone(),
                Arc::new(TimeoutGameUseCase::new(
                    repository.clone(),
                    Arc::new(publisher),
                )),
                CountdownConfig {
                    interval: Duration::from_secs(60),
                    start_value: 3,
                },
            ));
            let usecase = HandleNotificationUseCase::new(
                repository.clone(),
                registry.clone(),
                countdown.clone(),
            );
            Self {
                usecase,
                countdown,
                registry,
                repository,
            }
        }

        async fn connect(&self) -> Client {
            let (tx, rx) = mpsc::unbounded_channel();
            let id = self.registry.register_client(tx).await;
            Client { id, rx }
        }

        async fn ongoing_game(&self, first: Player, second: Player) -> Game {
            let game = self.repository.create_game(first).await.unwrap();
            match self.repository.join_game(&game.id(), second).await.unwrap() {
                JoinOutcome::Joined(game) => game,
                JoinOutcome::NotJoined => panic!("join should succeed"),
            }
        }
    }

    async fn settle() {
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn test_created_offers_game_to_everyone_but_creator() {
        // given:
        let f = Fixture::new();
        let mut alice = f.connect().await;
        let mut bob = f.connect().await;
        let game = f.repository.create_game(alice.player("Alice")).await.unwrap();

        // when:
        f.usecase.execute(Notification::Created(game.clone())).await;

        // then:
        assert!(alice.frames().is_empty());
        let frames = bob.frames();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0]["event"], "available");
        assert_eq!(frames[0]["payload"][0]["id"], game.id().to_string());
        assert_eq!(frames[0]["payload"][0]["players"][1], serde_json::Value::Null);
    }

    #[tokio::test]
    async fn test_joined_broadcasts_and_counts_down_local_participants() {
        // given: Alice is local, Bob is connected elsewhere, Carol is a bystander
        let f = Fixture::new();
        let mut alice = f.connect().await;
        let mut carol = f.connect().await;
        let bob = Player::new(
            ClientIdFactory::generate(),
            PlayerName::new("Bob".to_string()).unwrap(),
        );
        let game = f.ongoing_game(alice.player("Alice"), bob.clone()).await;

        // when:
        f.usecase.execute(Notification::Joined(game.clone())).await;
        settle().await;

        // then:
        let frames = alice.frames();
        assert_eq!(frames[0]["event"], "joined");
        assert_eq!(frames[0]["payload"]["id"], game.id().to_string());
        assert_eq!(frames[0]["payload"]["playerId"], bob.id.to_string());
        assert_eq!(frames[0]["payload"]["playerName"], "Bob");
        assert_eq!(frames[1]["event"], "countdown");
        assert_eq!(frames[1]["payload"]["value"], 3);

        let frames = carol.frames();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0]["event"], "joined");
        assert!(f.countdown.is_running(&game.id()).await);
    }

    #[tokio::test]
    async fn test_played_forwards_to_opponent_only() {
        // given:
        let f = Fixture::new();
        let mut alice = f.connect().await;
        let mut bob = f.connect().await;
        let game = f
            .ongoing_game(alice.player("Alice"), bob.player("Bob"))
            .await;
        let PlayOutcome::Played(game) = f
            .repository
            .play_move(&game.id(), &alice.id, Move::Rock)
            .await
            .unwrap()
        else {
            panic!("move should be accepted");
        };

        // when:
        f.usecase
            .execute(Notification::Played {
                game: game.clone(),
                player_id: alice.id,
                mv: Move::Rock,
            })
            .await;

        // then:
        assert!(alice.frames().is_empty());
        let frames = bob.frames();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0]["event"], "played");
        assert_eq!(frames[0]["payload"]["playerId"], alice.id.to_string());
        assert_eq!(frames[0]["payload"]["move"], "rock");
    }

    #[tokio::test]
    async fn test_final_move_sends_done_to_both_seats_and_stops_countdown() {
        // given:
        let f = Fixture::new();
        let mut alice = f.connect().await;
        let mut bob = f.connect().await;
        let mut carol = f.connect().await;
        let game = f
            .ongoing_game(alice.player("Alice"), bob.player("Bob"))
            .await;
        f.usecase.execute(Notification::Joined(game.clone())).await;
        settle().await;
        alice.frames();
        bob.frames();
        carol.frames();
        f.repository
            .play_move(&game.id(), &alice.id, Move::Rock)
            .await
            .unwrap();
        let PlayOutcome::Played(game) = f
            .repository
            .play_move(&game.id(), &bob.id, Move::Scissors)
            .await
            .unwrap()
        else {
            panic!("move should be accepted");
        };
        assert_eq!(game.state(), GameState::Done);

        // when:
        f.usecase
            .execute(Notification::Played {
                game: game.clone(),
                player_id: bob.id,
                mv: Move::Scissors,
            })
            .await;

        // then:
        for client in [&mut alice, &mut bob] {
            let frames = client.frames();
            assert_eq!(frames.len(), 1);
            assert_eq!(frames[0]["event"], "done");
            assert_eq!(
                frames[0]["payload"]["moves"],
                serde_json::json!(["rock", "scissors"])
            );
        }
        assert!(carol.frames().is_empty());
        assert!(!f.countdown.is_running(&game.id()).await);
    }

    #[tokio::test]
    async fn test_timeout_broadcasts_done() {
        // given:
        let f = Fixture::new();
        let mut alice = f.connect().await;
        let mut bob = f.connect().await;
        let game = f
            .ongoing_game(alice.player("Alice"), bob.player("Bob"))
            .await;
        let TimeoutOutcome::Timed(game) =
            f.repository.timeout_game(&game.id()).await.unwrap()
        else {
            panic!("timeout should apply");
        };

        // when:
        f.usecase.execute(Notification::Timeout(game)).await;

        // then:
        for client in [&mut alice, &mut bob] {
            let frames = client.frames();
            assert_eq!(frames[0]["event"], "done");
            assert_eq!(frames[0]["payload"]["moves"], serde_json::json!([null, null]));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_redelivered_join_after_done_sends_nothing() {
        // given: a finished game whose players already got `done`
        let f = Fixture::new();
        let mut alice = f.connect().await;
        let mut bob = f.connect().await;
        let joined = f
            .ongoing_game(alice.player("Alice"), bob.player("Bob"))
            .await;
        f.usecase.execute(Notification::Joined(joined.clone())).await;
        settle().await;
        f.repository
            .play_move(&joined.id(), &alice.id, Move::Paper)
            .await
            .unwrap();
        let PlayOutcome::Played(done) = f
            .repository
            .play_move(&joined.id(), &bob.id, Move::Rock)
            .await
            .unwrap()
        else {
            panic!("move should be accepted");
        };
        f.usecase
            .execute(Notification::Played {
                game: done,
                player_id: bob.id,
                mv: Move::Rock,
            })
            .await;
        alice.frames();
        bob.frames();

        // when: the join is delivered a second time
        f.usecase.execute(Notification::Joined(joined.clone())).await;
        for _ in 0..5 {
            tokio::time::advance(Duration::from_secs(60)).await;
            settle().await;
        }

        // then:
        assert!(alice.frames().is_empty());
        assert!(bob.frames().is_empty());
        assert!(!f.countdown.is_running(&joined.id()).await);
    }

    #[tokio::test]
    async fn test_join_of_unknown_game_is_dropped() {
        // given: a join for a game this repository never stored
        let f = Fixture::new();
        let mut alice = f.connect().await;
        let other = InMemoryGameRepository::new();
        let created = other.create_game(alice.player("Alice")).await.unwrap();
        let bob = Player::new(
            ClientIdFactory::generate(),
            PlayerName::new("Bob".to_string()).unwrap(),
        );
        let JoinOutcome::Joined(game) = other.join_game(&created.id(), bob).await.unwrap() else {
            panic!("join should succeed");
        };

        // when:
        f.usecase.execute(Notification::Joined(game.clone())).await;
        settle().await;

        // then:
        assert!(alice.frames().is_empty());
        assert!(!f.countdown.is_running(&game.id()).await);
    }
}
