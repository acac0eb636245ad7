//! Domain 層
//!
//! 麻雀サーバのビジネスロジックを表現する層。DTO や
//! Infrastructure（WebSocket、リポジトリ実装）には依存しない。
//!
//! - Entity: `Connection` / `Game` / `GameState`
//! - Value Object: `ConnectionId` / `GameId` / `Username` / `GameName` / `Timestamp`
//! - 牌とドメインルール: `tile` / `wall`
//! - 抽象化（DIP）: `repository` / `message_pusher`

pub mod connection;
pub mod error;
pub mod factory;
pub mod game;
pub mod game_state;
pub mod message_pusher;
pub mod repository;
pub mod tile;
pub mod value_object;
pub mod wall;

pub use connection::Connection;
pub use error::{
    ConnectionError, GameError, GameStateError, MessagePushError, RepositoryError,
    ValueObjectError,
};
pub use factory::{ConnectionIdFactory, GameIdFactory};
pub use game::{DEFAULT_MAX_USERS_IN_GAME, Game, GameStatus, GameUser};
pub use game_state::{GameState, MeldType, PlayerHand, RoundPhase, TileInteraction, WallDraw};
pub use message_pusher::{MessagePusher, PusherChannel};
pub use repository::{ConnectionRepository, GameRepository, GameStateRepository};
pub use tile::{
    COPIES_PER_TILE, DEFAULT_WALL_LENGTH, Dragon, Flower, Season, Suit, Tile, TileKind, Wind,
    build_wall_tiles,
};
pub use value_object::{
    ConnectionId, GameId, GameName, MAX_GAME_NAME_LENGTH, MAX_USERNAME_LENGTH, Timestamp, Username,
};
pub use wall::{DEALER_HAND_LENGTH, DealResult, HAND_LENGTH, deal_hands, shuffle_wall};
