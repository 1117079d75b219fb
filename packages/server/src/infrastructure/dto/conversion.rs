//! Conversion logic between DTOs and domain entities.

use crate::domain::{
    ClientId, Game, GameId, GameState, Move, OutboundMessage, Player, PlayerName,
};
use crate::infrastructure::dto::{
    notification::{GameNotificationDto, GameStateDto},
    websocket::{
        CountdownPayload, GameCreatedPayload, GameDonePayload, GameDto, GameEvent,
        GameJoinedPayload, MoveDto, MovePlayedPayload, PlayerDto, PlayerEvent,
        PlayerRegisteredPayload, WsMessage,
    },
};

// ========================================
// Domain Entity → DTO
// ========================================

impl From<Move> for MoveDto {
    fn from(model: Move) -> Self {
        match model {
            Move::Rock => MoveDto::Rock,
            Move::Paper => MoveDto::Paper,
            Move::Scissors => MoveDto::Scissors,
        }
    }
}

impl From<GameState> for GameStateDto {
    fn from(model: GameState) -> Self {
        match model {
            GameState::WaitingForPlayer => GameStateDto::WaitingForPlayer,
            GameState::Ongoing => GameStateDto::Ongoing,
            GameState::Done => GameStateDto::Done,
        }
    }
}

impl From<&Player> for PlayerDto {
    fn from(model: &Player) -> Self {
        Self {
            id: model.id.to_string(),
            name: model.name.as_str().to_string(),
        }
    }
}

fn players_dto(game: &Game) -> (PlayerDto, Option<PlayerDto>) {
    (
        PlayerDto::from(game.first_player()),
        game.second_player().map(PlayerDto::from),
    )
}

fn moves_dto(game: &Game) -> (Option<MoveDto>, Option<MoveDto>) {
    let [first, second] = game.moves();
    (first.map(MoveDto::from), second.map(MoveDto::from))
}

impl From<&Game> for GameDto {
    fn from(model: &Game) -> Self {
        Self {
            id: model.id().to_string(),
            players: players_dto(model),
        }
    }
}

impl From<&Game> for GameNotificationDto {
    fn from(model: &Game) -> Self {
        Self {
            id: model.id().to_string(),
            players: players_dto(model),
            moves: moves_dto(model),
            state: model.state().into(),
        }
    }
}

impl From<&OutboundMessage> for WsMessage {
    fn from(model: &OutboundMessage) -> Self {
        match model {
            OutboundMessage::Registered { id } => {
                WsMessage::Players(PlayerEvent::Registered(PlayerRegisteredPayload {
                    id: id.to_string(),
                }))
            }
            OutboundMessage::Available { games } => WsMessage::Games(GameEvent::Available(
                games.iter().map(GameDto::from).collect(),
            )),
            OutboundMessage::Created { id } => {
                WsMessage::Games(GameEvent::Created(GameCreatedPayload { id: id.to_string() }))
            }
            OutboundMessage::Joined { game_id, player } => {
                WsMessage::Games(GameEvent::Joined(GameJoinedPayload {
                    id: game_id.to_string(),
                    player_id: player.id.to_string(),
                    player_name: player.name.as_str().to_string(),
                }))
            }
            OutboundMessage::Played {
                game_id,
                player_id,
                mv,
            } => WsMessage::Games(GameEvent::Played(MovePlayedPayload {
                id: game_id.to_string(),
                player_id: player_id.to_string(),
                mv: (*mv).into(),
            })),
            OutboundMessage::Countdown { value } => {
                WsMessage::Games(GameEvent::Countdown(CountdownPayload { value: *value }))
            }
            OutboundMessage::Done { game } => WsMessage::Games(GameEvent::Done(GameDonePayload {
                id: game.id().to_string(),
                moves: moves_dto(game),
                players: players_dto(game),
            })),
        }
    }
}

// ========================================
// DTO → Domain Entity
// ========================================

impl From<MoveDto> for Move {
    fn from(dto: MoveDto) -> Self {
        match dto {
            MoveDto::Rock => Move::Rock,
            MoveDto::Paper => Move::Paper,
            MoveDto::Scissors => Move::Scissors,
        }
    }
}

impl From<GameStateDto> for GameState {
    fn from(dto: GameStateDto) -> Self {
        match dto {
            GameStateDto::WaitingForPlayer => GameState::WaitingForPlayer,
            GameStateDto::Ongoing => GameState::Ongoing,
            GameStateDto::Done => GameState::Done,
        }
    }
}

impl TryFrom<PlayerDto> for Player {
    type Error = String;

    fn try_from(dto: PlayerDto) -> Result<Self, Self::Error> {
        let id = ClientId::try_from(dto.id).map_err(|e| e.to_string())?;
        let name = PlayerName::new(dto.name).map_err(|e| e.to_string())?;
        Ok(Player::new(id, name))
    }
}

impl TryFrom<GameNotificationDto> for Game {
    type Error = String;

    fn try_from(dto: GameNotificationDto) -> Result<Self, Self::Error> {
        let id = GameId::try_from(dto.id).map_err(|e| e.to_string())?;
        let (first, second) = dto.players;
        let first = Player::try_from(first)?;
        let second = second.map(Player::try_from).transpose()?;
        let moves = [dto.moves.0.map(Move::from), dto.moves.1.map(Move::from)];

        Game::from_parts(id, first, second, moves, dto.state.into()).map_err(|e| e.to_string())
    }
}
