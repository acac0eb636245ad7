//! HTTP and WebSocket request handlers.

mod http;
mod websocket;

pub use http::{get_game_detail, get_games, health_check};
pub use websocket::websocket_handler;
