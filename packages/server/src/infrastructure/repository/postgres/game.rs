//! PostgreSQL game repository.
//!
//! Each transition is one conditional `UPDATE ... WHERE <precondition> RETURNING ...`.
//! Zero returned rows means the precondition did not hold, which is reported as the
//! negative outcome of the operation. Under READ COMMITTED a statement blocked by a
//! concurrent writer re-evaluates its WHERE clause and SET expressions against the newly
//! committed row, so the two seats' move writes cannot both miss the other move.

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::domain::{
    ClientId, Game, GameId, GameIdFactory, GameRepository, GameState, JoinOutcome, Move,
    PlayOutcome, Player, RepositoryError, Seat, TimeoutOutcome,
};

use super::row::{GameRow, GameStateColumn, MoveColumn};

macro_rules! game_columns {
    () => {
        "id, first_player_id, first_player_name, first_player_move, \
         second_player_id, second_player_name, second_player_move, state"
    };
}

const CREATE_GAME: &str = concat!(
    "INSERT INTO games (id, first_player_id, first_player_name, state) \
     VALUES ($1, $2, $3, 'waiting_for_player') \
     RETURNING ",
    game_columns!()
);

const JOIN_GAME: &str = concat!(
    "UPDATE games \
     SET second_player_id = $2, second_player_name = $3, state = 'ongoing' \
     WHERE id = $1 \
       AND state = 'waiting_for_player' \
       AND second_player_id IS NULL \
       AND first_player_id <> $2 \
     RETURNING ",
    game_columns!()
);

const PLAY_FIRST_SEAT: &str = concat!(
    "UPDATE games \
     SET first_player_move = $3, \
         state = CASE WHEN second_player_move IS NOT NULL THEN 'done'::game_state ELSE state END \
     WHERE id = $1 \
       AND state = 'ongoing' \
       AND first_player_id = $2 \
       AND first_player_move IS NULL \
     RETURNING ",
    game_columns!()
);

const PLAY_SECOND_SEAT: &str = concat!(
    "UPDATE games \
     SET second_player_move = $3, \
         state = CASE WHEN first_player_move IS NOT NULL THEN 'done'::game_state ELSE state END \
     WHERE id = $1 \
       AND state = 'ongoing' \
       AND second_player_id = $2 \
       AND second_player_move IS NULL \
     RETURNING ",
    game_columns!()
);

const GAME_STATE: &str = "SELECT state FROM games WHERE id = $1";

const TIMEOUT_GAME: &str = concat!(
    "UPDATE games SET state = 'done' \
     WHERE id = $1 AND state <> 'done' \
     RETURNING ",
    game_columns!()
);

const TIMEOUT_PLAYER_GAMES: &str = concat!(
    "UPDATE games SET state = 'done' \
     WHERE state <> 'done' AND (first_player_id = $1 OR second_player_id = $1) \
     RETURNING ",
    game_columns!()
);

const LIST_AVAILABLE_GAMES: &str = concat!(
    "SELECT ",
    game_columns!(),
    " FROM games \
     WHERE state = 'waiting_for_player' AND first_player_id <> $1 \
     ORDER BY created_at, id"
);

const SWEEP_UNFINISHED_GAMES: &str = "UPDATE games SET state = 'done' WHERE state <> 'done'";

fn play_statement(seat: Seat) -> &'static str {
    match seat {
        Seat::First => PLAY_FIRST_SEAT,
        Seat::Second => PLAY_SECOND_SEAT,
    }
}

/// Open a connection pool.
pub async fn connect_pool(
    database_url: &str,
    max_connections: u32,
) -> Result<PgPool, RepositoryError> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
        .map_err(|e| RepositoryError::query("connect to database", e))
}

/// PostgreSQL-backed game storage.
#[derive(Clone)]
pub struct PostgresGameRepository {
    pool: PgPool,
}

impl PostgresGameRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Make sure the database answers queries correctly.
    pub async fn verify_connection(&self) -> Result<(), RepositoryError> {
        let count: i32 = sqlx::query_scalar("SELECT 1 + 2 AS count")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| RepositoryError::query("sanity check", e))?;
        if count != 3 {
            return Err(RepositoryError::Query {
                reason: format!("sanity check returned {count}, expected 3"),
                source: None,
            });
        }
        Ok(())
    }

    /// Run embedded schema migrations.
    pub async fn migrate(&self) -> Result<(), RepositoryError> {
        sqlx::migrate!()
            .run(&self.pool)
            .await
            .map_err(|e| RepositoryError::query("run migrations", e))
    }

    async fn fetch_games(
        &self,
        query: sqlx::query::QueryAs<'_, sqlx::Postgres, GameRow, sqlx::postgres::PgArguments>,
        what: &str,
    ) -> Result<Vec<Game>, RepositoryError> {
        query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepositoryError::query(what, e))?
            .into_iter()
            .map(Game::try_from)
            .collect()
    }
}

#[async_trait]
impl GameRepository for PostgresGameRepository {
    async fn create_game(&self, creator: Player) -> Result<Game, RepositoryError> {
        let row: GameRow = sqlx::query_as(CREATE_GAME)
            .bind(GameIdFactory::generate().as_uuid())
            .bind(creator.id.as_uuid())
            .bind(creator.name.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| RepositoryError::query("create game", e))?;

        Game::try_from(row)
    }

    async fn join_game(
        &self,
        game_id: &GameId,
        joiner: Player,
    ) -> Result<JoinOutcome, RepositoryError> {
        let row: Option<GameRow> = sqlx::query_as(JOIN_GAME)
            .bind(game_id.as_uuid())
            .bind(joiner.id.as_uuid())
            .bind(joiner.name.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepositoryError::query("join game", e))?;

        match row {
            Some(row) => Ok(JoinOutcome::Joined(Game::try_from(row)?)),
            None => Ok(JoinOutcome::NotJoined),
        }
    }

    async fn play_move(
        &self,
        game_id: &GameId,
        player_id: &ClientId,
        mv: Move,
    ) -> Result<PlayOutcome, RepositoryError> {
        // A player holds at most one seat, so at most one of these statements can match.
        for seat in Seat::BOTH {
            let row: Option<GameRow> = sqlx::query_as(play_statement(seat))
                .bind(game_id.as_uuid())
                .bind(player_id.as_uuid())
                .bind(MoveColumn::from(mv))
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| RepositoryError::query("play move", e))?;

            if let Some(row) = row {
                return Ok(PlayOutcome::Played(Game::try_from(row)?));
            }
        }

        Ok(PlayOutcome::NotPlayed)
    }

    async fn game_state(&self, game_id: &GameId) -> Result<Option<GameState>, RepositoryError> {
        let state: Option<GameStateColumn> = sqlx::query_scalar(GAME_STATE)
            .bind(game_id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepositoryError::query("read game state", e))?;

        Ok(state.map(GameState::from))
    }

    async fn timeout_game(&self, game_id: &GameId) -> Result<TimeoutOutcome, RepositoryError> {
        let row: Option<GameRow> = sqlx::query_as(TIMEOUT_GAME)
            .bind(game_id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepositoryError::query("timeout game", e))?;

        match row {
            Some(row) => Ok(TimeoutOutcome::Timed(Game::try_from(row)?)),
            None => Ok(TimeoutOutcome::AlreadyDone),
        }
    }

    async fn timeout_player_games(
        &self,
        player_id: &ClientId,
    ) -> Result<Vec<Game>, RepositoryError> {
        self.fetch_games(
            sqlx::query_as(TIMEOUT_PLAYER_GAMES).bind(player_id.as_uuid()),
            "timeout player games",
        )
        .await
    }

    async fn list_available_games(
        &self,
        excluding: &ClientId,
    ) -> Result<Vec<Game>, RepositoryError> {
        self.fetch_games(
            sqlx::query_as(LIST_AVAILABLE_GAMES).bind(excluding.as_uuid()),
            "list available games",
        )
        .await
    }

    async fn sweep_unfinished_games(&self) -> Result<u64, RepositoryError> {
        let result = sqlx::query(SWEEP_UNFINISHED_GAMES)
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::query("sweep unfinished games", e))?;

        Ok(result.rows_affected())
    }
}
