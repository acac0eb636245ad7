//! HTTP API response DTOs.
//!
//! The HTTP surface is a read-only projection of the lobby: timestamps are
//! RFC 3339 strings (JST) rather than the millisecond values used on the
//! WebSocket wire.

use serde::Serialize;

use super::websocket::{GameStatusDto, GameUserDto};

/// One game in the `GET /api/games` list.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSummaryDto {
    pub game_id: String,
    pub game_name: String,
    pub game_type: String,
    pub game_version: String,
    /// Usernames in seat order
    pub users: Vec<String>,
    pub status: GameStatusDto,
    pub created_at: String,
}

/// Full game record for `GET /api/games/{game_id}`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameDetailDto {
    pub game_id: String,
    pub game_name: String,
    pub game_type: String,
    pub game_version: String,
    pub creator: String,
    pub users: Vec<GameUserDto>,
    pub status: GameStatusDto,
    pub loaded_count: usize,
    pub created_at: String,
}
