//! Domain factories for generating identifiers.

use super::{
    error::ValueObjectError,
    value_object::{ConnectionId, GameId},
};

/// Factory for generating ConnectionId instances.
///
/// Connection ids are assigned by the server at transport connect, never
/// supplied by clients.
pub struct ConnectionIdFactory;

impl ConnectionIdFactory {
    /// Generate a new ConnectionId with a random UUID v4.
    ///
    /// # Errors
    ///
    /// Should not fail in practice; returns Result for consistency with the
    /// domain error handling pattern.
    pub fn generate() -> Result<ConnectionId, ValueObjectError> {
        let uuid = uuid::Uuid::new_v4();
        ConnectionId::from_uuid(uuid)
    }
}

/// Factory for generating GameId instances.
pub struct GameIdFactory;

impl GameIdFactory {
    /// Generate a new GameId with a random UUID v4.
    ///
    /// # Errors
    ///
    /// Should not fail in practice; returns Result for consistency with the
    /// domain error handling pattern.
    pub fn generate() -> Result<GameId, ValueObjectError> {
        let uuid = uuid::Uuid::new_v4();
        GameId::from_uuid(uuid)
    }
}
