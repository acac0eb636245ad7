//! Connection entity: one live WebSocket session.

use serde::{Deserialize, Serialize};

use super::{
    error::ConnectionError,
    value_object::{ConnectionId, GameId, Timestamp, Username},
};

/// Represents a connected client session.
///
/// A connection exists from transport connect to disconnect. It carries at
/// most one username and at most one active game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connection {
    /// Server-assigned session identifier
    pub id: ConnectionId,
    /// Display name, unset until SET_USERNAME
    pub username: Option<Username>,
    /// The game this connection is seated in, if any
    pub game_id: Option<GameId>,
    /// Timestamp when the client connected
    pub connected_at: Timestamp,
}

impl Connection {
    /// Create a new connection with no username and no game.
    pub fn new(id: ConnectionId, connected_at: Timestamp) -> Self {
        Self {
            id,
            username: None,
            game_id: None,
            connected_at,
        }
    }

    /// Set (or overwrite) the display name.
    pub fn set_username(&mut self, username: Username) {
        self.username = Some(username);
    }

    /// Seat this connection in a game.
    ///
    /// # Errors
    ///
    /// Returns `ConnectionError::AlreadyInGame` if a game is already set;
    /// a connection has at most one active game.
    pub fn assign_game(&mut self, game_id: GameId) -> Result<(), ConnectionError> {
        if let Some(current) = &self.game_id {
            return Err(ConnectionError::AlreadyInGame {
                game_id: current.as_str().to_string(),
            });
        }
        self.game_id = Some(game_id);
        Ok(())
    }

    /// Clear the active game, returning which game was left.
    ///
    /// # Errors
    ///
    /// Returns `ConnectionError::NotInGame` if no game is set.
    pub fn clear_game(&mut self) -> Result<GameId, ConnectionError> {
        self.game_id.take().ok_or(ConnectionError::NotInGame)
    }

    /// The username, or an error for operations that require one.
    pub fn require_username(&self) -> Result<&Username, ConnectionError> {
        self.username.as_ref().ok_or(ConnectionError::UsernameNotSet)
    }
}
