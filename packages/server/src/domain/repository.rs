//! Game repository port.
//!
//! Every mutation is a single conditional update whose precondition encodes the state
//! transition. Losing a race is a normal negative outcome, reported through the outcome
//! enums below rather than as a [`RepositoryError`].

use async_trait::async_trait;

use super::{
    entity::{Game, GameState, Move, Player},
    error::RepositoryError,
    value_object::{ClientId, GameId},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinOutcome {
    /// The joiner took the second seat; the game is now Ongoing.
    Joined(Game),
    /// Game already taken, already started, unknown, or the joiner created it.
    NotJoined,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayOutcome {
    /// The move was recorded; the game is Done if the other seat had already played.
    Played(Game),
    /// Wrong state, not the caller's game, or the caller already played.
    NotPlayed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeoutOutcome {
    /// The game was forced to Done by this call.
    Timed(Game),
    /// The game was already Done (or does not exist).
    AlreadyDone,
}

/// Race-safe access to game rows.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GameRepository: Send + Sync {
    /// Insert a new game waiting for a second player, with a freshly generated id.
    async fn create_game(&self, creator: Player) -> Result<Game, RepositoryError>;

    /// Seat `joiner` in the second seat, only if the game is waiting, the seat is free and
    /// the joiner is not the creator.
    async fn join_game(
        &self,
        game_id: &GameId,
        joiner: Player,
    ) -> Result<JoinOutcome, RepositoryError>;

    /// Record `mv` in the caller's own seat, only while the game is Ongoing and that seat has
    /// not played yet. Moves the game to Done in the same statement when the other seat has
    /// already played.
    async fn play_move(
        &self,
        game_id: &GameId,
        player_id: &ClientId,
        mv: Move,
    ) -> Result<PlayOutcome, RepositoryError>;

    /// Current state of a game, or `None` if no such game exists.
    async fn game_state(&self, game_id: &GameId) -> Result<Option<GameState>, RepositoryError>;

    /// Force the game to Done unless it already is. Idempotent.
    async fn timeout_game(&self, game_id: &GameId) -> Result<TimeoutOutcome, RepositoryError>;

    /// Force every unfinished game in which `player_id` holds a seat to Done, returning the
    /// games this call transitioned.
    async fn timeout_player_games(
        &self,
        player_id: &ClientId,
    ) -> Result<Vec<Game>, RepositoryError>;

    /// Games waiting for a second player, oldest first, excluding those `excluding` created.
    async fn list_available_games(
        &self,
        excluding: &ClientId,
    ) -> Result<Vec<Game>, RepositoryError>;

    /// Force every unfinished game to Done. Run at startup, since no countdown survives a
    /// restart. Returns the number of games swept.
    async fn sweep_unfinished_games(&self) -> Result<u64, RepositoryError>;
}
