//! Domain error types.

use thiserror::Error;

use super::entity::GameState;

/// Rejected value object construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("invalid client id: '{0}'")]
    InvalidClientId(String),
    #[error("invalid game id: '{0}'")]
    InvalidGameId(String),
    #[error("player name must not be empty")]
    PlayerNameEmpty,
    #[error("player name is {0} characters long, the limit is 50")]
    PlayerNameTooLong(usize),
    #[error("unknown move: '{0}'")]
    InvalidMove(String),
}

/// A game assembled from stored or received parts breaks the data-model invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameInvariantError {
    #[error("game in state {0:?} must not have a second player")]
    UnexpectedSecondPlayer(GameState),
    #[error("game in state {0:?} requires a second player")]
    MissingSecondPlayer(GameState),
    #[error("game in state {state:?} has {count} move(s) set")]
    MoveCount { state: GameState, count: usize },
    #[error("a player cannot hold both seats")]
    SamePlayerInBothSeats,
}

/// Failure talking to the game store.
///
/// A conditional update that matches no row is *not* an error; see the outcome enums in
/// [`super::repository`].
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("game store query failed: {reason}")]
    Query {
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
    #[error("stored game row is corrupt: {0}")]
    CorruptRow(String),
}

impl RepositoryError {
    pub fn query(
        reason: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Query {
            reason: reason.into(),
            source: Some(Box::new(source)),
        }
    }
}

/// Failure of the cross-process notification bus.
#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("failed to encode notification: {0}")]
    Encode(String),
    #[error("failed to publish on '{channel}': {reason}")]
    Publish { channel: String, reason: String },
    #[error("notification subscription failed: {0}")]
    Subscription(String),
    #[error("notification subscription connection lost")]
    ConnectionLost,
}
