//! Identifier factories.

use uuid::Uuid;

use super::value_object::{ClientId, GameId};

/// Generates fresh client identifiers.
pub struct ClientIdFactory;

impl ClientIdFactory {
    pub fn generate() -> ClientId {
        ClientId::new(Uuid::new_v4())
    }
}

/// Generates fresh game identifiers.
pub struct GameIdFactory;

impl GameIdFactory {
    pub fn generate() -> GameId {
        GameId::new(Uuid::new_v4())
    }
}
