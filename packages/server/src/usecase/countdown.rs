//! Per-game countdown before a game is forced to its end.
//!
//! After a join, every locally connected participant receives `countdown` ticks
//! (3, 2, 1 by default), and one interval after the last tick the game is timed out. All
//! countdowns of a game share one cancellation token, which is cancelled as soon as this
//! process learns the game is done. Nothing is sent for a game after that.

use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
    time::Duration,
};

use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::domain::{ClientId, ConnectionRegistry, GameId, OutboundMessage, TimeoutOutcome};

use super::timeout_game::TimeoutGameUseCase;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountdownConfig {
    /// Spacing between ticks, and between the last tick and the timeout.
    pub interval: Duration,
    /// First value sent; counts down to 1.
    pub start_value: u8,
}

impl Default for CountdownConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            start_value: 3,
        }
    }
}

struct CountdownEntry {
    token: CancellationToken,
    players: HashSet<ClientId>,
}

type Countdowns = Arc<Mutex<HashMap<GameId, CountdownEntry>>>;

pub struct CountdownScheduler {
    registry: Arc<dyn ConnectionRegistry>,
    timeout_game: Arc<TimeoutGameUseCase>,
    config: CountdownConfig,
    countdowns: Countdowns,
}

impl CountdownScheduler {
    pub fn new(
        registry: Arc<dyn ConnectionRegistry>,
        timeout_game: Arc<TimeoutGameUseCase>,
        config: CountdownConfig,
    ) -> Self {
        Self {
            registry,
            timeout_game,
            config,
            countdowns: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Start counting down `game_id` for `player_id`.
    ///
    /// A countdown already running for the same pair is left alone. Callers must not start
    /// a countdown for a game they know to be done.
    pub async fn start(&self, game_id: GameId, player_id: ClientId) {
        let token = {
            let mut countdowns = self.countdowns.lock().await;
            let entry = countdowns.entry(game_id).or_insert_with(|| CountdownEntry {
                token: CancellationToken::new(),
                players: HashSet::new(),
            });
            if !entry.players.insert(player_id) {
                tracing::debug!(
                    "Countdown of game '{}' already running for '{}'",
                    game_id,
                    player_id
                );
                return;
            }
            entry.token.clone()
        };

        tracing::debug!("Countdown of game '{}' started for '{}'", game_id, player_id);
        let registry = self.registry.clone();
        let timeout_game = self.timeout_game.clone();
        let countdowns = self.countdowns.clone();
        let config = self.config;
        tokio::spawn(async move {
            run_countdown(registry, timeout_game, config, game_id, player_id, &token).await;
            release(&countdowns, &game_id, &player_id, &token).await;
        });
    }

    /// Stop every countdown of `game_id`. Unknown games are ignored.
    pub async fn cancel(&self, game_id: &GameId) {
        if let Some(entry) = self.countdowns.lock().await.remove(game_id) {
            entry.token.cancel();
            tracing::debug!("Countdown of game '{}' cancelled", game_id);
        }
    }

    /// Whether a countdown of `game_id` is still tracked.
    pub async fn is_running(&self, game_id: &GameId) -> bool {
        self.countdowns.lock().await.contains_key(game_id)
    }
}

/// Sleep for `interval`, or return `false` if cancelled first.
async fn wait(token: &CancellationToken, interval: Duration) -> bool {
    tokio::select! {
        _ = token.cancelled() => false,
        _ = tokio::time::sleep(interval) => true,
    }
}

async fn run_countdown(
    registry: Arc<dyn ConnectionRegistry>,
    timeout_game: Arc<TimeoutGameUseCase>,
    config: CountdownConfig,
    game_id: GameId,
    player_id: ClientId,
    token: &CancellationToken,
) {
    for value in (1..=config.start_value).rev() {
        if value != config.start_value && !wait(token, config.interval).await {
            return;
        }
        // Cancellation can land between the wake-up and the push.
        if token.is_cancelled() {
            return;
        }
        registry
            .push_to(&player_id, &OutboundMessage::Countdown { value })
            .await;
    }

    if !wait(token, config.interval).await {
        return;
    }

    match timeout_game.execute(&game_id).await {
        Ok(TimeoutOutcome::Timed(_)) => {}
        Ok(TimeoutOutcome::AlreadyDone) => {
            tracing::debug!("Game '{}' already done at countdown end", game_id);
        }
        Err(e) => tracing::warn!("Failed to time out game '{}': {}", game_id, e),
    }
}

/// Drop `player_id` from the game's entry once its countdown has ended, and the entry
/// itself once no countdown of the game is left.
async fn release(
    countdowns: &Mutex<HashMap<GameId, CountdownEntry>>,
    game_id: &GameId,
    player_id: &ClientId,
    token: &CancellationToken,
) {
    let mut countdowns = countdowns.lock().await;
    // A cancelled token means `cancel` already removed the entry. An uncancelled one means
    // the entry under `game_id` is still the one this countdown joined.
    if token.is_cancelled() {
        return;
    }
    if let Some(entry) = countdowns.get_mut(game_id) {
        entry.players.remove(player_id);
        if entry.players.is_empty() {
            countdowns.remove(game_id);
        }
    }
}
