//! Cross-process notification port.
//!
//! State changes committed by one process reach every other process only through these
//! notifications. Delivery is at-least-once, so handlers must tolerate duplicates.

use std::fmt;

use async_trait::async_trait;

use super::{
    entity::{Game, Move},
    error::NotificationError,
    value_object::ClientId,
};

/// Named notification channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    GamesCreated,
    GamesJoined,
    GamesPlayed,
    GamesTimeout,
}

impl Channel {
    pub const ALL: [Channel; 4] = [
        Channel::GamesCreated,
        Channel::GamesJoined,
        Channel::GamesPlayed,
        Channel::GamesTimeout,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::GamesCreated => "games:created",
            Channel::GamesJoined => "games:joined",
            Channel::GamesPlayed => "games:played",
            Channel::GamesTimeout => "games:timeout",
        }
    }

    pub fn parse(name: &str) -> Option<Channel> {
        Channel::ALL.into_iter().find(|c| c.as_str() == name)
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A committed state change, decoded and validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Created(Game),
    Joined(Game),
    Played {
        game: Game,
        player_id: ClientId,
        mv: Move,
    },
    Timeout(Game),
}

impl Notification {
    pub fn channel(&self) -> Channel {
        match self {
            Notification::Created(_) => Channel::GamesCreated,
            Notification::Joined(_) => Channel::GamesJoined,
            Notification::Played { .. } => Channel::GamesPlayed,
            Notification::Timeout(_) => Channel::GamesTimeout,
        }
    }

    pub fn game(&self) -> &Game {
        match self {
            Notification::Created(game)
            | Notification::Joined(game)
            | Notification::Timeout(game)
            | Notification::Played { game, .. } => game,
        }
    }
}

/// A notification as delivered by the bus, before decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawNotification {
    pub channel: String,
    pub payload: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationPublisher: Send + Sync {
    async fn publish(&self, notification: &Notification) -> Result<(), NotificationError>;
}

/// Receiving end of the bus, owned by the process's single subscription loop.
///
/// An `Err` means the subscription itself is broken, which is fatal for the process.
#[async_trait]
pub trait NotificationSubscriber: Send {
    async fn recv(&mut self) -> Result<RawNotification, NotificationError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_names_round_trip() {
        for channel in Channel::ALL {
            assert_eq!(Channel::parse(channel.as_str()), Some(channel));
        }
        assert_eq!(Channel::parse("games:deleted"), None);
    }
}
