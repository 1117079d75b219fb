//! Entities: players, moves and games.

use std::{fmt, str::FromStr};

use super::{
    error::{GameInvariantError, ValueObjectError},
    value_object::{ClientId, GameId, PlayerName},
};

/// A move in rock/paper/scissors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Move {
    Rock,
    Paper,
    Scissors,
}

impl Move {
    pub fn as_str(&self) -> &'static str {
        match self {
            Move::Rock => "rock",
            Move::Paper => "paper",
            Move::Scissors => "scissors",
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Move {
    type Err = ValueObjectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rock" => Ok(Move::Rock),
            "paper" => Ok(Move::Paper),
            "scissors" => Ok(Move::Scissors),
            other => Err(ValueObjectError::InvalidMove(other.to_string())),
        }
    }
}

/// Lifecycle state of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameState {
    WaitingForPlayer,
    Ongoing,
    Done,
}

/// One of the two player slots of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Seat {
    First,
    Second,
}

impl Seat {
    pub const BOTH: [Seat; 2] = [Seat::First, Seat::Second];

    pub fn other(&self) -> Seat {
        match self {
            Seat::First => Seat::Second,
            Seat::Second => Seat::First,
        }
    }

    /// Position of the seat in two-element per-seat arrays.
    pub fn index(&self) -> usize {
        match self {
            Seat::First => 0,
            Seat::Second => 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub id: ClientId,
    pub name: PlayerName,
}

impl Player {
    pub fn new(id: ClientId, name: PlayerName) -> Self {
        Self { id, name }
    }
}

/// A game as seen past the repository boundary.
///
/// Construct it through [`Game::waiting`] or [`Game::from_parts`]; both uphold the
/// invariants of each [`GameState`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    id: GameId,
    first: Player,
    second: Option<Player>,
    moves: [Option<Move>; 2],
    state: GameState,
}

impl Game {
    /// A freshly created game with only the creator seated.
    pub fn waiting(id: GameId, creator: Player) -> Self {
        Self {
            id,
            first: creator,
            second: None,
            moves: [None, None],
            state: GameState::WaitingForPlayer,
        }
    }

    /// Assemble a game from stored or received parts, checking the invariants.
    pub fn from_parts(
        id: GameId,
        first: Player,
        second: Option<Player>,
        moves: [Option<Move>; 2],
        state: GameState,
    ) -> Result<Self, GameInvariantError> {
        let move_count = moves.iter().flatten().count();
        match state {
            GameState::WaitingForPlayer => {
                if second.is_some() {
                    return Err(GameInvariantError::UnexpectedSecondPlayer(state));
                }
                if move_count != 0 {
                    return Err(GameInvariantError::MoveCount {
                        state,
                        count: move_count,
                    });
                }
            }
            GameState::Ongoing => {
                if second.is_none() {
                    return Err(GameInvariantError::MissingSecondPlayer(state));
                }
                if move_count > 1 {
                    return Err(GameInvariantError::MoveCount {
                        state,
                        count: move_count,
                    });
                }
            }
            // A game timed out before anyone joined is Done with a single player and no
            // move, so Done accepts any combination.
            GameState::Done => {}
        }
        if second.as_ref().is_some_and(|p| p.id == first.id) {
            return Err(GameInvariantError::SamePlayerInBothSeats);
        }
        if second.is_none() && moves[Seat::Second.index()].is_some() {
            return Err(GameInvariantError::MissingSecondPlayer(state));
        }

        Ok(Self {
            id,
            first,
            second,
            moves,
            state,
        })
    }

    pub fn id(&self) -> GameId {
        self.id
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_done(&self) -> bool {
        self.state == GameState::Done
    }

    pub fn first_player(&self) -> &Player {
        &self.first
    }

    pub fn second_player(&self) -> Option<&Player> {
        self.second.as_ref()
    }

    pub fn player(&self, seat: Seat) -> Option<&Player> {
        match seat {
            Seat::First => Some(&self.first),
            Seat::Second => self.second.as_ref(),
        }
    }

    pub fn moves(&self) -> [Option<Move>; 2] {
        self.moves
    }

    pub fn move_of(&self, seat: Seat) -> Option<Move> {
        self.moves[seat.index()]
    }

    /// Seat held by `player_id`, if any.
    pub fn seat_of(&self, player_id: &ClientId) -> Option<Seat> {
        Seat::BOTH
            .into_iter()
            .find(|seat| self.player(*seat).is_some_and(|p| &p.id == player_id))
    }

    /// The player sitting opposite `player_id`.
    pub fn opponent_of(&self, player_id: &ClientId) -> Option<&Player> {
        self.seat_of(player_id)
            .and_then(|seat| self.player(seat.other()))
    }

    /// Ids of every seated player, first seat first.
    pub fn participant_ids(&self) -> Vec<ClientId> {
        Seat::BOTH
            .into_iter()
            .filter_map(|seat| self.player(seat).map(|p| p.id))
            .collect()
    }
}
