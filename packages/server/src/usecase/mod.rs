//! UseCase layer.
//!
//! Inbound commands (create, join, play, connect, disconnect) change state through the
//! repository and publish what they committed. [`HandleNotificationUseCase`] is the
//! outbound half: it turns notifications into messages for local clients.

mod connect_client;
mod countdown;
mod create_game;
mod disconnect_client;
mod error;
mod handle_notification;
mod join_game;
mod play_move;
mod timeout_game;

pub use connect_client::ConnectClientUseCase;
pub use countdown::{CountdownConfig, CountdownScheduler};
pub use create_game::CreateGameUseCase;
pub use disconnect_client::DisconnectClientUseCase;
pub use error::GameCommandError;
pub use handle_notification::HandleNotificationUseCase;
pub use join_game::JoinGameUseCase;
pub use play_move::PlayMoveUseCase;
pub use timeout_game::TimeoutGameUseCase;
