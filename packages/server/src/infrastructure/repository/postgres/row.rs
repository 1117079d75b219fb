//! Typed projection of a `games` row.
//!
//! The seat-indexed column layout stops here: [`GameRow`] is converted into a domain
//! [`Game`] before anything leaves the repository.

use uuid::Uuid;

use crate::domain::{ClientId, Game, GameId, GameState, Move, Player, PlayerName, RepositoryError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "game_state", rename_all = "snake_case")]
pub(super) enum GameStateColumn {
    WaitingForPlayer,
    Ongoing,
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "game_move", rename_all = "lowercase")]
pub(super) enum MoveColumn {
    Rock,
    Paper,
    Scissors,
}

impl From<Move> for MoveColumn {
    fn from(mv: Move) -> Self {
        match mv {
            Move::Rock => MoveColumn::Rock,
            Move::Paper => MoveColumn::Paper,
            Move::Scissors => MoveColumn::Scissors,
        }
    }
}

impl From<MoveColumn> for Move {
    fn from(column: MoveColumn) -> Self {
        match column {
            MoveColumn::Rock => Move::Rock,
            MoveColumn::Paper => Move::Paper,
            MoveColumn::Scissors => Move::Scissors,
        }
    }
}

impl From<GameStateColumn> for GameState {
    fn from(column: GameStateColumn) -> Self {
        match column {
            GameStateColumn::WaitingForPlayer => GameState::WaitingForPlayer,
            GameStateColumn::Ongoing => GameState::Ongoing,
            GameStateColumn::Done => GameState::Done,
        }
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub(super) struct GameRow {
    pub id: Uuid,
    pub first_player_id: Uuid,
    pub first_player_name: String,
    pub first_player_move: Option<MoveColumn>,
    pub second_player_id: Option<Uuid>,
    pub second_player_name: Option<String>,
    pub second_player_move: Option<MoveColumn>,
    pub state: GameStateColumn,
}

fn corrupt(id: Uuid, reason: impl std::fmt::Display) -> RepositoryError {
    RepositoryError::CorruptRow(format!("game {id}: {reason}"))
}

impl TryFrom<GameRow> for Game {
    type Error = RepositoryError;

    fn try_from(row: GameRow) -> Result<Self, Self::Error> {
        let id = row.id;
        let first = Player::new(
            ClientId::new(row.first_player_id),
            PlayerName::new(row.first_player_name).map_err(|e| corrupt(id, e))?,
        );
        let second = match (row.second_player_id, row.second_player_name) {
            (Some(player_id), Some(name)) => Some(Player::new(
                ClientId::new(player_id),
                PlayerName::new(name).map_err(|e| corrupt(id, e))?,
            )),
            (None, None) => None,
            _ => return Err(corrupt(id, "second seat is half filled")),
        };
        let moves = [
            row.first_player_move.map(Move::from),
            row.second_player_move.map(Move::from),
        ];

        Game::from_parts(GameId::new(id), first, second, moves, row.state.into())
            .map_err(|e| corrupt(id, e))
    }
}
