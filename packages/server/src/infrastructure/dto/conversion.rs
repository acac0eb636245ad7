//! Conversion logic between DTOs and domain entities.

use jansou_shared::time::timestamp_to_jst_rfc3339;

use crate::domain::{Connection, Game, GameStatus, GameUser, PlayerHand};
use crate::infrastructure::dto::{http, websocket as dto};

// ========================================
// Domain Entity → DTO
// ========================================

impl From<GameStatus> for dto::GameStatusDto {
    fn from(status: GameStatus) -> Self {
        match status {
            GameStatus::Created => dto::GameStatusDto::Created,
            GameStatus::Started => dto::GameStatusDto::Started,
        }
    }
}

impl From<Connection> for dto::ConnectionDto {
    fn from(model: Connection) -> Self {
        Self {
            connection_id: model.id.into_string(),
            username: model.username.map(|name| name.into_string()),
            game_id: model.game_id.map(|id| id.into_string()),
            connected_at: model.connected_at.value(),
        }
    }
}

impl From<GameUser> for dto::GameUserDto {
    fn from(model: GameUser) -> Self {
        Self {
            connection_id: model.connection_id.into_string(),
            username: model.username.into_string(),
        }
    }
}

impl From<Game> for dto::GameDto {
    fn from(model: Game) -> Self {
        Self {
            game_id: model.id.into_string(),
            game_name: model.name.into_string(),
            game_type: model.game_type,
            game_version: model.game_version,
            creator: model.creator.into_string(),
            users: model.users.into_iter().map(Into::into).collect(),
            status: model.status.into(),
            created_at: model.created_at.value(),
        }
    }
}

impl From<&PlayerHand> for dto::PlayerPileDto {
    fn from(model: &PlayerHand) -> Self {
        Self {
            connection_id: model.connection_id.as_str().to_string(),
            played_tiles: model.played_tiles.clone(),
        }
    }
}

impl From<Game> for http::GameSummaryDto {
    fn from(model: Game) -> Self {
        Self {
            game_id: model.id.into_string(),
            game_name: model.name.into_string(),
            game_type: model.game_type,
            game_version: model.game_version,
            users: model
                .users
                .into_iter()
                .map(|user| user.username.into_string())
                .collect(),
            status: model.status.into(),
            created_at: timestamp_to_jst_rfc3339(model.created_at.value()),
        }
    }
}

impl From<Game> for http::GameDetailDto {
    fn from(model: Game) -> Self {
        Self {
            game_id: model.id.into_string(),
            game_name: model.name.into_string(),
            game_type: model.game_type,
            game_version: model.game_version,
            creator: model.creator.into_string(),
            users: model.users.into_iter().map(Into::into).collect(),
            status: model.status.into(),
            loaded_count: model.loaded_count,
            created_at: timestamp_to_jst_rfc3339(model.created_at.value()),
        }
    }
}
