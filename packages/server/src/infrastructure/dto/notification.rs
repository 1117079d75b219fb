//! Notification payloads carried between processes.
//!
//! `games:created`, `games:joined` and `games:timeout` carry the full game projection;
//! `games:played` wraps it together with the move that was just recorded, so receivers
//! read the authoritative Done/move state from the payload instead of assuming an order.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{
    Channel, ClientId, Game, Notification, NotificationError, RawNotification, ValueObjectError,
};

use super::websocket::{MoveDto, PlayerDto};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotificationDecodeError {
    #[error("unknown channel '{0}'")]
    UnknownChannel(String),
    #[error("payload on {channel} is not valid: {reason}")]
    InvalidPayload { channel: Channel, reason: String },
    #[error("payload on {channel} describes an impossible game: {reason}")]
    InvalidGame { channel: Channel, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GameStateDto {
    WaitingForPlayer,
    Ongoing,
    Done,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameNotificationDto {
    pub id: String,
    pub players: (PlayerDto, Option<PlayerDto>),
    pub moves: (Option<MoveDto>, Option<MoveDto>),
    pub state: GameStateDto,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovePlayedNotificationDto {
    pub game: GameNotificationDto,
    pub player_id: String,
    #[serde(rename = "move")]
    pub mv: MoveDto,
}

/// Encode a notification into its channel and JSON payload.
pub fn encode_notification(
    notification: &Notification,
) -> Result<(Channel, String), NotificationError> {
    let channel = notification.channel();
    let payload = match notification {
        Notification::Created(game) | Notification::Joined(game) | Notification::Timeout(game) => {
            serde_json::to_string(&GameNotificationDto::from(game))
        }
        Notification::Played {
            game,
            player_id,
            mv,
        } => serde_json::to_string(&MovePlayedNotificationDto {
            game: GameNotificationDto::from(game),
            player_id: player_id.to_string(),
            mv: MoveDto::from(*mv),
        }),
    }
    .map_err(|e| NotificationError::Encode(e.to_string()))?;

    Ok((channel, payload))
}

/// Decode and validate a delivered notification.
pub fn decode_notification(raw: &RawNotification) -> Result<Notification, NotificationDecodeError> {
    let channel = Channel::parse(&raw.channel)
        .ok_or_else(|| NotificationDecodeError::UnknownChannel(raw.channel.clone()))?;
    let invalid_payload = |e: serde_json::Error| NotificationDecodeError::InvalidPayload {
        channel,
        reason: e.to_string(),
    };
    let invalid_game = |reason: String| NotificationDecodeError::InvalidGame { channel, reason };

    let game_from = |dto: GameNotificationDto| Game::try_from(dto).map_err(invalid_game);

    match channel {
        Channel::GamesCreated => {
            let dto: GameNotificationDto =
                serde_json::from_str(&raw.payload).map_err(invalid_payload)?;
            Ok(Notification::Created(game_from(dto)?))
        }
        Channel::GamesJoined => {
            let dto: GameNotificationDto =
                serde_json::from_str(&raw.payload).map_err(invalid_payload)?;
            Ok(Notification::Joined(game_from(dto)?))
        }
        Channel::GamesTimeout => {
            let dto: GameNotificationDto =
                serde_json::from_str(&raw.payload).map_err(invalid_payload)?;
            Ok(Notification::Timeout(game_from(dto)?))
        }
        Channel::GamesPlayed => {
            let dto: MovePlayedNotificationDto =
                serde_json::from_str(&raw.payload).map_err(invalid_payload)?;
            let player_id = dto
                .player_id
                .parse::<ClientId>()
                .map_err(|e: ValueObjectError| invalid_game(e.to_string()))?;
            let game = game_from(dto.game)?;
            if game.seat_of(&player_id).is_none() {
                return Err(invalid_game(format!(
                    "player {player_id} does not hold a seat"
                )));
            }
            Ok(Notification::Played {
                game,
                player_id,
                mv: dto.mv.into(),
            })
        }
    }
}
