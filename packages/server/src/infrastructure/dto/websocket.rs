//! WebSocket wire protocol.
//!
//! Every frame in either direction is a JSON envelope `{topic, event, payload}`. The
//! `(topic, event)` pair selects the payload schema. Unknown pairs and payloads that do not
//! match their schema decode to a [`CodecError`], never a panic.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// `(topic, event)` pairs the protocol knows about.
pub const KNOWN_EVENTS: &[(&str, &str)] = &[
    ("players", "registered"),
    ("games", "available"),
    ("games", "create"),
    ("games", "created"),
    ("games", "join"),
    ("games", "joined"),
    ("games", "play"),
    ("games", "played"),
    ("games", "countdown"),
    ("games", "done"),
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("malformed frame: {0}")]
    Malformed(String),
    #[error("unknown message {topic}.{event}")]
    UnknownMessage { topic: String, event: String },
    #[error("invalid payload for {topic}.{event}: {reason}")]
    InvalidPayload {
        topic: String,
        event: String,
        reason: String,
    },
    #[error("failed to encode message: {0}")]
    Encode(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveDto {
    Rock,
    Paper,
    Scissors,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerDto {
    pub id: String,
    pub name: String,
}

/// A game as listed in `games.available`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameDto {
    pub id: String,
    pub players: (PlayerDto, Option<PlayerDto>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRegisteredPayload {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGamePayload {
    pub player_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameCreatedPayload {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinGamePayload {
    pub id: String,
    pub player_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameJoinedPayload {
    pub id: String,
    pub player_id: String,
    pub player_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayMovePayload {
    pub id: String,
    #[serde(rename = "move")]
    pub mv: MoveDto,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovePlayedPayload {
    pub id: String,
    pub player_id: String,
    #[serde(rename = "move")]
    pub mv: MoveDto,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountdownPayload {
    pub value: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameDonePayload {
    pub id: String,
    pub moves: (Option<MoveDto>, Option<MoveDto>),
    pub players: (PlayerDto, Option<PlayerDto>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "payload", rename_all = "lowercase")]
pub enum PlayerEvent {
    Registered(PlayerRegisteredPayload),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "payload", rename_all = "lowercase")]
pub enum GameEvent {
    Available(Vec<GameDto>),
    Create(CreateGamePayload),
    Created(GameCreatedPayload),
    Join(JoinGamePayload),
    Joined(GameJoinedPayload),
    Play(PlayMovePayload),
    Played(MovePlayedPayload),
    Countdown(CountdownPayload),
    Done(GameDonePayload),
}

/// A WebSocket frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "topic", rename_all = "lowercase")]
pub enum WsMessage {
    Players(PlayerEvent),
    Games(GameEvent),
}

/// Envelope header, read before the payload is checked against its schema.
#[derive(Debug, Deserialize)]
struct RawEnvelope {
    topic: String,
    event: String,
}

impl WsMessage {
    pub fn encode(&self) -> Result<String, CodecError> {
        serde_json::to_string(self).map_err(|e| CodecError::Encode(e.to_string()))
    }

    pub fn decode(text: &str) -> Result<WsMessage, CodecError> {
        let value: serde_json::Value =
            serde_json::from_str(text).map_err(|e| CodecError::Malformed(e.to_string()))?;
        let envelope =
            RawEnvelope::deserialize(&value).map_err(|e| CodecError::Malformed(e.to_string()))?;

        if !KNOWN_EVENTS
            .iter()
            .any(|(topic, event)| *topic == envelope.topic && *event == envelope.event)
        {
            return Err(CodecError::UnknownMessage {
                topic: envelope.topic,
                event: envelope.event,
            });
        }

        serde_json::from_value(value).map_err(|e| CodecError::InvalidPayload {
            topic: envelope.topic,
            event: envelope.event,
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn alice() -> PlayerDto {
        PlayerDto {
            id: "67e55044-10b1-426f-9247-bb680e5fe0c8".to_string(),
            name: "Alice".to_string(),
        }
    }

    #[test]
    fn test_encode_available_matches_wire_shape() {
        // given:
        let message = WsMessage::Games(GameEvent::Available(vec![GameDto {
            id: "g1".to_string(),
            players: (alice(), None),
        }]));

        // when:
        let encoded: serde_json::Value =
            serde_json::from_str(&message.encode().unwrap()).unwrap();

        // then:
        assert_eq!(
            encoded,
            json!({
                "topic": "games",
                "event": "available",
                "payload": [{
                    "id": "g1",
                    "players": [{"id": "67e55044-10b1-426f-9247-bb680e5fe0c8", "name": "Alice"}, null]
                }]
            })
        );
    }

    #[test]
    fn test_encode_done_with_missing_move() {
        let message = WsMessage::Games(GameEvent::Done(GameDonePayload {
            id: "g1".to_string(),
            moves: (Some(MoveDto::Rock), None),
            players: (alice(), None),
        }));

        let encoded: serde_json::Value =
            serde_json::from_str(&message.encode().unwrap()).unwrap();

        assert_eq!(encoded["payload"]["moves"], json!(["rock", null]));
        assert_eq!(encoded["payload"]["players"][1], json!(null));
    }

    #[test]
    fn test_decode_client_requests() {
        // given:
        let create = r#"{"topic":"games","event":"create","payload":{"playerName":"Alice"}}"#;
        let join = r#"{"topic":"games","event":"join","payload":{"id":"g1","playerName":"Bob"}}"#;
        let play = r#"{"payload":{"id":"g1","move":"paper"},"event":"play","topic":"games"}"#;

        // then:
        assert_eq!(
            WsMessage::decode(create),
            Ok(WsMessage::Games(GameEvent::Create(CreateGamePayload {
                player_name: "Alice".to_string()
            })))
        );
        assert_eq!(
            WsMessage::decode(join),
            Ok(WsMessage::Games(GameEvent::Join(JoinGamePayload {
                id: "g1".to_string(),
                player_name: "Bob".to_string()
            })))
        );
        assert_eq!(
            WsMessage::decode(play),
            Ok(WsMessage::Games(GameEvent::Play(PlayMovePayload {
                id: "g1".to_string(),
                mv: MoveDto::Paper
            })))
        );
    }

    #[test]
    fn test_encoded_messages_decode_to_equal_values() {
        let messages = vec![
            WsMessage::Players(PlayerEvent::Registered(PlayerRegisteredPayload {
                id: "c1".to_string(),
            })),
            WsMessage::Games(GameEvent::Joined(GameJoinedPayload {
                id: "g1".to_string(),
                player_id: "c2".to_string(),
                player_name: "Bob".to_string(),
            })),
            WsMessage::Games(GameEvent::Countdown(CountdownPayload { value: 3 })),
            WsMessage::Games(GameEvent::Done(GameDonePayload {
                id: "g1".to_string(),
                moves: (Some(MoveDto::Rock), Some(MoveDto::Scissors)),
                players: (
                    alice(),
                    Some(PlayerDto {
                        id: "c2".to_string(),
                        name: "Bob".to_string(),
                    }),
                ),
            })),
        ];

        for message in messages {
            let encoded = message.encode().unwrap();
            assert_eq!(WsMessage::decode(&encoded), Ok(message));
        }
    }

    #[test]
    fn test_decode_not_json_is_malformed() {
        assert!(matches!(
            WsMessage::decode("hello"),
            Err(CodecError::Malformed(_))
        ));
    }

    #[test]
    fn test_decode_missing_envelope_fields_is_malformed() {
        assert!(matches!(
            WsMessage::decode(r#"{"topic":"games"}"#),
            Err(CodecError::Malformed(_))
        ));
    }

    #[test]
    fn test_decode_unknown_event() {
        assert_eq!(
            WsMessage::decode(r#"{"topic":"games","event":"delete","payload":{}}"#),
            Err(CodecError::UnknownMessage {
                topic: "games".to_string(),
                event: "delete".to_string()
            })
        );
    }

    #[test]
    fn test_decode_invalid_move_is_invalid_payload() {
        let result =
            WsMessage::decode(r#"{"topic":"games","event":"play","payload":{"id":"g1","move":"lizard"}}"#);
        assert!(matches!(
            result,
            Err(CodecError::InvalidPayload { ref event, .. }) if event == "play"
        ));
    }

    #[test]
    fn test_decode_missing_payload_field_is_invalid_payload() {
        let result = WsMessage::decode(r#"{"topic":"games","event":"join","payload":{"id":"g1"}}"#);
        assert!(matches!(result, Err(CodecError::InvalidPayload { .. })));
    }
}
