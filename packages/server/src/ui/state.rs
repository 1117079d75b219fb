//! Shared application state.

use std::sync::Arc;

use crate::{
    domain::{ConnectionRegistry, GameRepository, NotificationPublisher},
    infrastructure::connection_registry::WebSocketConnectionRegistry,
    usecase::{
        ConnectClientUseCase, CountdownConfig, CountdownScheduler, CreateGameUseCase,
        DisconnectClientUseCase, HandleNotificationUseCase, JoinGameUseCase, PlayMoveUseCase,
        TimeoutGameUseCase,
    },
};

pub struct AppState {
    pub connect_client_usecase: Arc<ConnectClientUseCase>,
    pub disconnect_client_usecase: Arc<DisconnectClientUseCase>,
    pub create_game_usecase: Arc<CreateGameUseCase>,
    pub join_game_usecase: Arc<JoinGameUseCase>,
    pub play_move_usecase: Arc<PlayMoveUseCase>,
    pub handle_notification_usecase: Arc<HandleNotificationUseCase>,
}

impl AppState {
    /// Wire the use cases of one server process.
    ///
    /// Every process gets its own connection registry; the repository and publisher are
    /// what processes share.
    pub fn build(
        repository: Arc<dyn GameRepository>,
        publisher: Arc<dyn NotificationPublisher>,
        countdown_config: CountdownConfig,
    ) -> Self {
        let registry: Arc<dyn ConnectionRegistry> = Arc::new(WebSocketConnectionRegistry::new());

        let timeout_game_usecase = Arc::new(TimeoutGameUseCase::new(
            repository.clone(),
            publisher.clone(),
        ));
        let countdown = Arc::new(CountdownScheduler::new(
            registry.clone(),
            timeout_game_usecase,
            countdown_config,
        ));

        Self {
            connect_client_usecase: Arc::new(ConnectClientUseCase::new(
                repository.clone(),
                registry.clone(),
            )),
            disconnect_client_usecase: Arc::new(DisconnectClientUseCase::new(
                repository.clone(),
                registry.clone(),
                publisher.clone(),
            )),
            create_game_usecase: Arc::new(CreateGameUseCase::new(
                repository.clone(),
                registry.clone(),
                publisher.clone(),
            )),
            join_game_usecase: Arc::new(JoinGameUseCase::new(
                repository.clone(),
                publisher.clone(),
            )),
            play_move_usecase: Arc::new(PlayMoveUseCase::new(repository.clone(), publisher)),
            handle_notification_usecase: Arc::new(HandleNotificationUseCase::new(
                repository,
                registry,
                countdown,
            )),
        }
    }
}
