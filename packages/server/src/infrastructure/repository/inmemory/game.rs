//! In-memory game repository.
//!
//! Each operation checks its precondition and applies the transition under a single lock,
//! which gives the same all-or-nothing behaviour as the conditional statements of the
//! Postgres implementation. Games live only as long as the repository.

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    ClientId, Game, GameId, GameIdFactory, GameRepository, GameState, JoinOutcome, Move,
    PlayOutcome, Player, RepositoryError, TimeoutOutcome,
};

/// Games in creation order.
#[derive(Default)]
pub struct InMemoryGameRepository {
    games: Mutex<Vec<Game>>,
}

impl InMemoryGameRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current snapshot of a game, for inspection.
    pub async fn find_game(&self, game_id: &GameId) -> Option<Game> {
        let games = self.games.lock().await;
        games.iter().find(|g| &g.id() == game_id).cloned()
    }
}

fn rebuild(
    game: &Game,
    second: Option<Player>,
    moves: [Option<Move>; 2],
    state: GameState,
) -> Result<Game, RepositoryError> {
    Game::from_parts(game.id(), game.first_player().clone(), second, moves, state)
        .map_err(|e| RepositoryError::CorruptRow(e.to_string()))
}

fn force_done(game: &Game) -> Result<Game, RepositoryError> {
    rebuild(
        game,
        game.second_player().cloned(),
        game.moves(),
        GameState::Done,
    )
}

#[async_trait]
impl GameRepository for InMemoryGameRepository {
    async fn create_game(&self, creator: Player) -> Result<Game, RepositoryError> {
        let game = Game::waiting(GameIdFactory::generate(), creator);
        let mut games = self.games.lock().await;
        games.push(game.clone());
        Ok(game)
    }

    async fn join_game(
        &self,
        game_id: &GameId,
        joiner: Player,
    ) -> Result<JoinOutcome, RepositoryError> {
        let mut games = self.games.lock().await;
        let Some(slot) = games.iter_mut().find(|g| &g.id() == game_id) else {
            return Ok(JoinOutcome::NotJoined);
        };

        // state = waiting AND second seat empty AND joiner is not the creator
        if slot.state() != GameState::WaitingForPlayer
            || slot.second_player().is_some()
            || slot.first_player().id == joiner.id
        {
            return Ok(JoinOutcome::NotJoined);
        }

        let joined = rebuild(slot, Some(joiner), [None, None], GameState::Ongoing)?;
        *slot = joined.clone();
        Ok(JoinOutcome::Joined(joined))
    }

    async fn play_move(
        &self,
        game_id: &GameId,
        player_id: &ClientId,
        mv: Move,
    ) -> Result<PlayOutcome, RepositoryError> {
        let mut games = self.games.lock().await;
        let Some(slot) = games.iter_mut().find(|g| &g.id() == game_id) else {
            return Ok(PlayOutcome::NotPlayed);
        };

        // state = ongoing AND <seat>_player_id = player AND <seat>_move IS NULL
        let Some(seat) = slot.seat_of(player_id) else {
            return Ok(PlayOutcome::NotPlayed);
        };
        if slot.state() != GameState::Ongoing || slot.move_of(seat).is_some() {
            return Ok(PlayOutcome::NotPlayed);
        }

        let mut moves = slot.moves();
        moves[seat.index()] = Some(mv);
        let state = if slot.move_of(seat.other()).is_some() {
            GameState::Done
        } else {
            GameState::Ongoing
        };

        let played = rebuild(slot, slot.second_player().cloned(), moves, state)?;
        *slot = played.clone();
        Ok(PlayOutcome::Played(played))
    }

    async fn game_state(&self, game_id: &GameId) -> Result<Option<GameState>, RepositoryError> {
        Ok(self.find_game(game_id).await.map(|game| game.state()))
    }

    async fn timeout_game(&self, game_id: &GameId) -> Result<TimeoutOutcome, RepositoryError> {
        let mut games = self.games.lock().await;
        match games
            .iter_mut()
            .find(|g| &g.id() == game_id && !g.is_done())
        {
            Some(slot) => {
                let timed = force_done(slot)?;
                *slot = timed.clone();
                Ok(TimeoutOutcome::Timed(timed))
            }
            None => Ok(TimeoutOutcome::AlreadyDone),
        }
    }

    async fn timeout_player_games(
        &self,
        player_id: &ClientId,
    ) -> Result<Vec<Game>, RepositoryError> {
        let mut games = self.games.lock().await;
        let mut timed = Vec::new();
        for slot in games
            .iter_mut()
            .filter(|g| !g.is_done() && g.seat_of(player_id).is_some())
        {
            *slot = force_done(slot)?;
            timed.push(slot.clone());
        }
        Ok(timed)
    }

    async fn list_available_games(
        &self,
        excluding: &ClientId,
    ) -> Result<Vec<Game>, RepositoryError> {
        let games = self.games.lock().await;
        Ok(games
            .iter()
            .filter(|g| {
                g.state() == GameState::WaitingForPlayer && &g.first_player().id != excluding
            })
            .cloned()
            .collect())
    }

    async fn sweep_unfinished_games(&self) -> Result<u64, RepositoryError> {
        let mut games = self.games.lock().await;
        let mut swept = 0;
        for slot in games.iter_mut().filter(|g| !g.is_done()) {
            *slot = force_done(slot)?;
            swept += 1;
        }
        Ok(swept)
    }
}
