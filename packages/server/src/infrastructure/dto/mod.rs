//! Data Transfer Objects (DTOs) for the mahjong server.
//!
//! DTOs are organized by protocol:
//! - `websocket`: WebSocket envelope and payload DTOs
//! - `http`: HTTP API response DTOs

pub mod conversion;
pub mod http;
pub mod websocket;
