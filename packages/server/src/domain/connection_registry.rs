//! Connection registry port.
//!
//! The registry is process-local: it only knows the sockets this process accepted.
//! Messages for a client connected elsewhere are silently skipped; that process receives
//! the same notification and delivers them itself.

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{
    entity::{Game, Move, Player},
    value_object::{ClientId, GameId},
};

/// Sending half of a client's outbound frame queue.
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// Server → client messages, in domain terms. Encoding to the wire format is the
/// registry implementation's job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundMessage {
    Registered { id: ClientId },
    Available { games: Vec<Game> },
    Created { id: GameId },
    Joined { game_id: GameId, player: Player },
    Played {
        game_id: GameId,
        player_id: ClientId,
        mv: Move,
    },
    Countdown { value: u8 },
    Done { game: Game },
}

impl OutboundMessage {
    /// Short name used in log lines.
    pub fn event(&self) -> &'static str {
        match self {
            OutboundMessage::Registered { .. } => "registered",
            OutboundMessage::Available { .. } => "available",
            OutboundMessage::Created { .. } => "created",
            OutboundMessage::Joined { .. } => "joined",
            OutboundMessage::Played { .. } => "played",
            OutboundMessage::Countdown { .. } => "countdown",
            OutboundMessage::Done { .. } => "done",
        }
    }
}

/// Live client connections of this process.
#[async_trait]
pub trait ConnectionRegistry: Send + Sync {
    /// Store `sender` under an identifier not currently in use and return it.
    async fn register_client(&self, sender: PusherChannel) -> ClientId;

    /// Forget the connection. Unknown ids are ignored.
    async fn unregister_client(&self, client_id: &ClientId);

    /// Whether `client_id` is connected to this process.
    async fn is_connected(&self, client_id: &ClientId) -> bool;

    /// Send to one client. Returns `false` without error when the client is not connected
    /// here.
    async fn push_to(&self, client_id: &ClientId, message: &OutboundMessage) -> bool;

    /// Send to every local client except `excluded`.
    async fn broadcast_except(&self, excluded: &ClientId, message: &OutboundMessage);

    /// Send to every local client.
    async fn broadcast_all(&self, message: &OutboundMessage);
}
