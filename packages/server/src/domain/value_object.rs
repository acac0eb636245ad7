//! Value Objects for domain models.
//!
//! Value Objects are immutable objects that represent values in the domain.
//! They are compared by their value, not by identity.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::ValueObjectError;

/// Maximum length of a username
pub const MAX_USERNAME_LENGTH: usize = 30;

/// Maximum length of a game name
pub const MAX_GAME_NAME_LENGTH: usize = 50;

/// Connection identifier value object.
///
/// Opaque session handle assigned by the server when a WebSocket client
/// connects. Always a UUID v4 in canonical string form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnectionId(String);

impl ConnectionId {
    /// Create a new ConnectionId from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is empty or not a valid UUID.
    pub fn new(id: String) -> Result<Self, ValueObjectError> {
        if id.is_empty() {
            return Err(ValueObjectError::ConnectionIdEmpty);
        }
        if uuid::Uuid::parse_str(&id).is_err() {
            return Err(ValueObjectError::ConnectionIdInvalidFormat(id));
        }
        Ok(Self(id))
    }

    /// Create a ConnectionId from a UUID.
    pub fn from_uuid(uuid: uuid::Uuid) -> Result<Self, ValueObjectError> {
        Self::new(uuid.to_string())
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to owned String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Game identifier value object.
///
/// Identifies one lobby game record and its live round record. Always a
/// UUID v4 in canonical string form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameId(String);

impl GameId {
    /// Create a new GameId from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is empty or not a valid UUID.
    pub fn new(id: String) -> Result<Self, ValueObjectError> {
        if id.is_empty() {
            return Err(ValueObjectError::GameIdEmpty);
        }
        if uuid::Uuid::parse_str(&id).is_err() {
            return Err(ValueObjectError::GameIdInvalidFormat(id));
        }
        Ok(Self(id))
    }

    /// Create a GameId from a UUID.
    pub fn from_uuid(uuid: uuid::Uuid) -> Result<Self, ValueObjectError> {
        Self::new(uuid.to_string())
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to owned String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Username value object.
///
/// Display name a player picks before creating or joining a game.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Username(String);

impl Username {
    /// Create a new Username.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty or too long.
    pub fn new(name: String) -> Result<Self, ValueObjectError> {
        if name.is_empty() {
            return Err(ValueObjectError::UsernameEmpty);
        }
        let len = name.chars().count();
        if len > MAX_USERNAME_LENGTH {
            return Err(ValueObjectError::UsernameTooLong {
                max: MAX_USERNAME_LENGTH,
                actual: len,
            });
        }
        Ok(Self(name))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to owned String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Game name value object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameName(String);

impl GameName {
    /// Create a new GameName.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty or too long.
    pub fn new(name: String) -> Result<Self, ValueObjectError> {
        if name.is_empty() {
            return Err(ValueObjectError::GameNameEmpty);
        }
        let len = name.chars().count();
        if len > MAX_GAME_NAME_LENGTH {
            return Err(ValueObjectError::GameNameTooLong {
                max: MAX_GAME_NAME_LENGTH,
                actual: len,
            });
        }
        Ok(Self(name))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to owned String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for GameName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Timestamp value object.
///
/// Represents a Unix timestamp in milliseconds (JST).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Create a new Timestamp from a Unix timestamp in milliseconds.
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Get the inner i64 value.
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
