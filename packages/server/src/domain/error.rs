//! Domain layer error definitions.

use thiserror::Error;

/// Errors related to Value Objects validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueObjectError {
    /// ConnectionId validation error
    #[error("ConnectionId cannot be empty")]
    ConnectionIdEmpty,

    /// ConnectionId invalid format error (not a valid UUID format)
    #[error("ConnectionId must be a valid UUID format (got: {0})")]
    ConnectionIdInvalidFormat(String),

    /// GameId validation error
    #[error("GameId cannot be empty")]
    GameIdEmpty,

    /// GameId invalid format error (not a valid UUID format)
    #[error("GameId must be a valid UUID format (got: {0})")]
    GameIdInvalidFormat(String),

    /// Username validation error
    #[error("Username cannot be empty")]
    UsernameEmpty,

    /// Username too long error
    #[error("Username cannot exceed {max} characters (got {actual})")]
    UsernameTooLong { max: usize, actual: usize },

    /// GameName validation error
    #[error("GameName cannot be empty")]
    GameNameEmpty,

    /// GameName too long error
    #[error("GameName cannot exceed {max} characters (got {actual})")]
    GameNameTooLong { max: usize, actual: usize },

    /// Suited tile rank outside 1-9
    #[error("Tile rank must be between 1 and 9 (got {0})")]
    TileRankOutOfRange(u8),

    /// Tile copy index outside the duplicate count of its kind
    #[error("Tile copy index must be below {max} for this tile kind (got {actual})")]
    TileCopyOutOfRange { max: u8, actual: u8 },
}

/// Errors related to connection records
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConnectionError {
    /// The connection is already seated in a game
    #[error("Connection is already in game {game_id}")]
    AlreadyInGame { game_id: String },

    /// The connection has no game to leave
    #[error("Connection is not in a game")]
    NotInGame,

    /// Operations that need a username before the connection has one
    #[error("Connection has no username set")]
    UsernameNotSet,
}

/// Errors related to Game (lobby record) domain logic
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    /// Game capacity exceeded error
    #[error("Game capacity exceeded: maximum {capacity} users allowed (current: {current})")]
    CapacityExceeded { capacity: usize, current: usize },

    /// The connection is already seated in this game
    #[error("User {connection_id} is already in this game")]
    UserAlreadyJoined { connection_id: String },

    /// The connection is not seated in this game
    #[error("User {connection_id} is not in this game")]
    UserNotInGame { connection_id: String },

    /// Joining or starting requires the game to still be in the CREATED state
    #[error("Game has already been started")]
    AlreadyStarted,

    /// Load counting requires the game to be in the STARTED state
    #[error("Game has not been started")]
    NotStarted,

    /// Only the host (seat 0) may perform this operation
    #[error("Only the host can perform this operation")]
    NotHost,

    /// Starting requires a full table
    #[error("Game requires {required} seated users to start (current: {current})")]
    NotEnoughPlayers { required: usize, current: usize },

    /// Page-load counter would exceed the seat count
    #[error("Game loaded count cannot exceed {limit}")]
    LoadedCountExceeded { limit: usize },
}

/// Errors related to GameState (live round record) domain logic
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameStateError {
    /// The round lifecycle gate rejected the operation
    #[error("Round is not in progress")]
    RoundNotInProgress,

    /// Starting a new round requires the previous round to have ended
    #[error("Round has not ended")]
    RoundNotEnded,

    /// The connection has no seat in this round
    #[error("Connection {connection_id} has no seat in this game")]
    UnknownPlayer { connection_id: String },

    /// Dealing requires between 1 and 4 players
    #[error("Cannot deal hands for {count} players")]
    InvalidPlayerCount { count: usize },

    /// Dealing requires the full wall
    #[error("Wall must contain {expected} tiles to deal (got {actual})")]
    ShortWall { expected: usize, actual: usize },

    /// Defensive bound on dealer advancement; never triggers for a
    /// correctly-counted 4-player game
    #[error("Dealer index {next} would exceed the seat bound {max}")]
    DealerOutOfRange { next: usize, max: usize },

    /// Defensive bound on round-wind advancement
    #[error("Wind index {next} would exceed the wind bound {max}")]
    WindOutOfRange { next: usize, max: usize },

    /// Seat index outside the seated players
    #[error("Seat index {seat} is out of range (players: {players})")]
    SeatOutOfRange { seat: usize, players: usize },

    /// The tile is not in the acting player's concealed hand
    #[error("Tile is not in the player's hand")]
    TileNotInHand,

    /// Only bonus tiles (flowers and seasons) can be exposed in place
    #[error("Tile is not a bonus tile")]
    NotABonusTile,

    /// Discarding is only legal on the player's own turn
    #[error("It is not the player's turn (current turn: {current_turn})")]
    NotYourTurn { current_turn: usize },

    /// Interaction window is bounded by the seat count
    #[error("Interaction limit reached: maximum {limit} interactions per discard")]
    InteractionLimitReached { limit: usize },

    /// Each player gets one interaction per discard window
    #[error("Connection {connection_id} already submitted an interaction")]
    DuplicateInteraction { connection_id: String },
}

/// Errors returned by repository implementations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// No connection record for the given id
    #[error("Connection not found: {0}")]
    ConnectionNotFound(String),

    /// A connection record already exists for the given id
    #[error("Connection already registered: {0}")]
    ConnectionAlreadyRegistered(String),

    /// No game record for the given id
    #[error("Game not found: {0}")]
    GameNotFound(String),

    /// A game record already exists for the given id
    #[error("Game already exists: {0}")]
    GameAlreadyExists(String),

    /// No game state record for the given game id
    #[error("Game state not found for game: {0}")]
    GameStateNotFound(String),

    /// Connection record precondition violation
    #[error(transparent)]
    Connection(#[from] ConnectionError),

    /// Game record precondition violation
    #[error(transparent)]
    Game(#[from] GameError),

    /// Game state record precondition violation
    #[error(transparent)]
    GameState(#[from] GameStateError),
}

/// Errors returned when pushing messages to clients
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MessagePushError {
    /// No registered channel for the given connection
    #[error("Client not found: {0}")]
    ClientNotFound(String),

    /// The client channel is closed (receiver dropped)
    #[error("Client channel closed: {0}")]
    ChannelClosed(String),
}
