//! Game entity: one lobby game record.
//!
//! The Game record is the lobby-side view of a table: who is seated, whether
//! play has started, and how many clients have finished loading the game
//! page. The live round itself is the separate GameState record.

use serde::{Deserialize, Serialize};

use super::{
    error::GameError,
    value_object::{ConnectionId, GameId, GameName, Timestamp, Username},
};

/// Maximum number of users seated in one game
pub const DEFAULT_MAX_USERS_IN_GAME: usize = 4;

/// Lobby lifecycle of a game record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameStatus {
    /// Accepting joins
    Created,
    /// Play has started, no more joins
    Started,
}

/// One seated user: the connection and the name it plays under
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameUser {
    pub connection_id: ConnectionId,
    pub username: Username,
}

impl GameUser {
    pub fn new(connection_id: ConnectionId, username: Username) -> Self {
        Self {
            connection_id,
            username,
        }
    }
}

/// Represents a lobby game with up to four seated users.
///
/// Seat order is join order; the user at seat 0 is the host. The host is the
/// creator initially and the record is deleted when the host leaves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Game {
    /// Game identifier
    pub id: GameId,
    /// Display name shown in the lobby list
    pub name: GameName,
    /// Rule variant label chosen by the creator
    pub game_type: String,
    /// Rule version label chosen by the creator
    pub game_version: String,
    /// The connection that created the game
    pub creator: ConnectionId,
    /// Seated users in join order (seat 0 is the host)
    pub users: Vec<GameUser>,
    /// Lobby lifecycle state
    pub status: GameStatus,
    /// How many seated clients have loaded the game page
    pub loaded_count: usize,
    /// Timestamp when the game was created
    pub created_at: Timestamp,
}

impl Game {
    /// Create a new game with the creator already seated at seat 0.
    pub fn new(
        id: GameId,
        name: GameName,
        game_type: String,
        game_version: String,
        creator: GameUser,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            name,
            game_type,
            game_version,
            creator: creator.connection_id.clone(),
            users: vec![creator],
            status: GameStatus::Created,
            loaded_count: 0,
            created_at,
        }
    }

    /// The host seat, if anyone is seated.
    pub fn host(&self) -> Option<&GameUser> {
        self.users.first()
    }

    /// Whether the given connection currently holds the host seat.
    pub fn is_host(&self, connection_id: &ConnectionId) -> bool {
        self.host()
            .is_some_and(|user| &user.connection_id == connection_id)
    }

    /// Whether the given connection is seated in this game.
    pub fn contains_user(&self, connection_id: &ConnectionId) -> bool {
        self.user_index(connection_id).is_some()
    }

    /// Seat index of the given connection.
    pub fn user_index(&self, connection_id: &ConnectionId) -> Option<usize> {
        self.users
            .iter()
            .position(|user| &user.connection_id == connection_id)
    }

    /// Whether all seats are taken.
    pub fn is_full(&self) -> bool {
        self.users.len() >= DEFAULT_MAX_USERS_IN_GAME
    }

    /// Whether no seats are taken.
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Connection ids of all seated users, in seat order.
    pub fn connection_ids(&self) -> Vec<ConnectionId> {
        self.users
            .iter()
            .map(|user| user.connection_id.clone())
            .collect()
    }

    /// Seat a user.
    ///
    /// # Errors
    ///
    /// Rejects joins once the game has started, duplicate joins, and joins
    /// past the four-seat capacity. The record is unchanged on error.
    pub fn add_user(&mut self, user: GameUser) -> Result<(), GameError> {
        if self.status != GameStatus::Created {
            return Err(GameError::AlreadyStarted);
        }
        if self.contains_user(&user.connection_id) {
            return Err(GameError::UserAlreadyJoined {
                connection_id: user.connection_id.as_str().to_string(),
            });
        }
        if self.is_full() {
            return Err(GameError::CapacityExceeded {
                capacity: DEFAULT_MAX_USERS_IN_GAME,
                current: self.users.len(),
            });
        }
        self.users.push(user);
        Ok(())
    }

    /// Unseat a user, returning the removed seat.
    ///
    /// # Errors
    ///
    /// Returns `GameError::UserNotInGame` if the connection is not seated.
    pub fn remove_user(&mut self, connection_id: &ConnectionId) -> Result<GameUser, GameError> {
        let index = self
            .user_index(connection_id)
            .ok_or_else(|| GameError::UserNotInGame {
                connection_id: connection_id.as_str().to_string(),
            })?;
        Ok(self.users.remove(index))
    }

    /// Transition CREATED -> STARTED.
    ///
    /// # Errors
    ///
    /// Only the host may start, only once, and only with a full table.
    pub fn start(&mut self, by: &ConnectionId) -> Result<(), GameError> {
        if !self.is_host(by) {
            return Err(GameError::NotHost);
        }
        if self.status != GameStatus::Created {
            return Err(GameError::AlreadyStarted);
        }
        if self.users.len() != DEFAULT_MAX_USERS_IN_GAME {
            return Err(GameError::NotEnoughPlayers {
                required: DEFAULT_MAX_USERS_IN_GAME,
                current: self.users.len(),
            });
        }
        self.status = GameStatus::Started;
        Ok(())
    }

    /// Count one game-page load, returning the new count.
    ///
    /// # Errors
    ///
    /// Requires a started game, and the counter never exceeds the seat
    /// count, so the count-of-4 transition fires exactly once.
    pub fn increment_loaded_count(&mut self) -> Result<usize, GameError> {
        if self.status != GameStatus::Started {
            return Err(GameError::NotStarted);
        }
        if self.loaded_count >= DEFAULT_MAX_USERS_IN_GAME {
            return Err(GameError::LoadedCountExceeded {
                limit: DEFAULT_MAX_USERS_IN_GAME,
            });
        }
        self.loaded_count += 1;
        Ok(self.loaded_count)
    }
}
