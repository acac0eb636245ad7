//! WebSocket message DTOs.
//!
//! Every WebSocket frame is one JSON envelope. Inbound frames carry
//! `{action, payload}`; outbound frames carry `{action, payload}` plus
//! `success`/`error` when the frame acknowledges a request. Action names
//! are SCREAMING_SNAKE_CASE and payload fields are camelCase on the wire.

use serde::{Deserialize, Serialize};

use crate::domain::{MeldType, Tile};

/// Wire name of a message kind, shared by requests, acks and pushes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionName {
    // handshake (outbound only)
    Connected,
    // lobby
    SetUsername,
    GetAllUsers,
    CreateGame,
    GetAllGames,
    JoinGame,
    LeaveGame,
    StartGame,
    GameUpdate,
    GameDeleted,
    // in-game
    GamePageLoad,
    GameStart,
    GameReset,
    SendMessage,
    InGameMessage,
    InGameUpdate,
    DrawTile,
    PlayTile,
    PlayedTile,
    PlayedTileInteraction,
    SelfPlayTile,
    WinningTiles,
    DrawRound,
    NewRound,
}

/// Inbound frame: a client request.
#[derive(Debug, Clone, Deserialize)]
pub struct ActionEnvelope {
    pub action: ActionName,
    /// Raw payload, decoded per action by the handler
    #[serde(default)]
    pub payload: serde_json::Value,
}

/// Outbound frame: an ack or a server push.
#[derive(Debug, Clone, Serialize)]
pub struct ResponseEnvelope {
    pub action: ActionName,
    pub payload: serde_json::Value,
    /// Present only on acks
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    /// Present only on failed acks
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ResponseEnvelope {
    /// Successful ack for a client request.
    pub fn ok(action: ActionName, payload: impl Serialize) -> Self {
        Self {
            action,
            payload: serde_json::to_value(payload).expect("payload should serialize"),
            success: Some(true),
            error: None,
        }
    }

    /// Failed ack for a client request. No mutation happened.
    pub fn failure(action: ActionName, error: impl Into<String>) -> Self {
        Self {
            action,
            payload: serde_json::Value::Null,
            success: Some(false),
            error: Some(error.into()),
        }
    }

    /// Server-initiated push (no success flag).
    pub fn push(action: ActionName, payload: impl Serialize) -> Self {
        Self {
            action,
            payload: serde_json::to_value(payload).expect("payload should serialize"),
            success: None,
            error: None,
        }
    }

    /// Serialize the frame for the socket.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("response envelope should serialize")
    }
}

// ========================================
// Inbound payloads (client -> server)
// ========================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetUsernamePayload {
    pub username: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGamePayload {
    pub game_name: String,
    pub game_type: String,
    pub game_version: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinGamePayload {
    pub game_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessagePayload {
    pub message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayTilePayload {
    pub tile: Tile,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelfPlayTilePayload {
    pub tile: Tile,
}

/// Reaction to the latest discard: a claim, or an explicit skip.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileInteractionPayload {
    pub meld_type: MeldType,
    #[serde(default)]
    pub played_tiles: Vec<Tile>,
    pub skip_interaction: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeclareWinPayload {
    pub tiles: Vec<Tile>,
}

// ========================================
// Outbound payloads (server -> client)
// ========================================

/// CONNECTED handshake: tells the client its server-assigned id.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectedPayload {
    pub connection_id: String,
}

/// One connection in the GET_ALL_USERS list.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionDto {
    pub connection_id: String,
    pub username: Option<String>,
    pub game_id: Option<String>,
    pub connected_at: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserListPayload {
    pub users: Vec<ConnectionDto>,
}

/// Lobby lifecycle of a game, as serialized on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameStatusDto {
    Created,
    Started,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameUserDto {
    pub connection_id: String,
    pub username: String,
}

/// One lobby game record, used by CREATE_GAME acks, GET_ALL_GAMES and
/// GAME_UPDATE broadcasts.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameDto {
    pub game_id: String,
    pub game_name: String,
    pub game_type: String,
    pub game_version: String,
    pub creator: String,
    pub users: Vec<GameUserDto>,
    pub status: GameStatusDto,
    pub created_at: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameListPayload {
    pub games: Vec<GameDto>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameDeletedPayload {
    pub game_id: String,
}

/// GAME_PAGE_LOAD ack: how many members have loaded the game page so far.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameLoadedPayload {
    pub loaded_count: usize,
}

/// In-game chat relay.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InGameMessagePayload {
    pub connection_id: String,
    pub username: String,
    pub message: String,
    pub timestamp: i64,
}

/// One player's public discard pile, as seen by every recipient.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerPileDto {
    pub connection_id: String,
    pub played_tiles: Vec<Tile>,
}

/// Personalized hand sync, used by GAME_START and GAME_RESET.
///
/// `tiles` is the recipient's own concealed hand; other players' hands
/// never appear here.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HandSyncPayload {
    pub tiles: Vec<Tile>,
    pub self_played_tiles: Vec<PlayerPileDto>,
    pub current_index: usize,
}

/// DRAW_TILE ack. `tile` is `None` when the wall is exhausted.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawnTilePayload {
    pub tile: Option<Tile>,
    pub current_index: usize,
}

/// NEW_ROUND push: the dealer/wind stage of a round restart.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRoundPayload {
    pub dealer: usize,
    pub current_wind: usize,
}

/// PLAYED_TILE push: somebody discarded, the claim window is open.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayedTilePayload {
    pub connection_id: String,
    pub tile: Tile,
}

/// PLAYED_TILE_INTERACTION ack while the claim window is still open.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionCountPayload {
    pub interaction_count: usize,
}

/// IN_GAME_UPDATE push: outcome of a closed claim window.
///
/// `connection_id`/`meld_type` are `None` when every player skipped.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InGameUpdatePayload {
    pub connection_id: Option<String>,
    pub meld_type: Option<MeldType>,
    pub played_tiles: Vec<Tile>,
    pub current_turn: usize,
}

/// WINNING_TILES push: a player declared a win with these tiles.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WinDeclaredPayload {
    pub connection_id: String,
    pub tiles: Vec<Tile>,
}

/// SELF_PLAY_TILE push: a player exposed a bonus tile.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TileExposedPayload {
    pub connection_id: String,
    pub tile: Tile,
}
