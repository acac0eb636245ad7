//! Infrastructure 層
//!
//! ドメイン層が定義する抽象（Repository、MessagePusher）の具体的な実装と、
//! プロトコル境界の DTO を提供する層。
//!
//! - `repository`: インメモリのレコードストア
//! - `message_pusher`: WebSocket 経由のメッセージ送信
//! - `dto`: WebSocket / HTTP の Data Transfer Object

pub mod dto;
pub mod message_pusher;
pub mod repository;
