//! WebSocket mahjong server implementation.

mod handler;
mod server;
mod signal;
pub mod state; // バイナリと統合テストが DI で使うため public

pub use server::Server;
