//! Domain layer: value objects, entities and the ports the use cases depend on.
//!
//! Nothing in here knows about sqlx, axum or JSON. Infrastructure implements the
//! traits declared here (dependency inversion), the use case layer consumes them.

pub mod connection_registry;
pub mod entity;
pub mod error;
pub mod factory;
pub mod notification;
pub mod repository;
pub mod value_object;

pub use connection_registry::{ConnectionRegistry, OutboundMessage, PusherChannel};
pub use entity::{Game, GameState, Move, Player, Seat};
pub use error::{GameInvariantError, NotificationError, RepositoryError, ValueObjectError};
pub use factory::{ClientIdFactory, GameIdFactory};
pub use notification::{
    Channel, Notification, NotificationPublisher, NotificationSubscriber, RawNotification,
};
pub use repository::{GameRepository, JoinOutcome, PlayOutcome, TimeoutOutcome};
pub use value_object::{ClientId, GameId, PlayerName};
