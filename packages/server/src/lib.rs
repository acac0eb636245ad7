//! Mahjong game server library.
//!
//! This library provides the WebSocket backend for four-player mahjong:
//! lobby management, the per-round game state machine, and in-game fan-out.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
