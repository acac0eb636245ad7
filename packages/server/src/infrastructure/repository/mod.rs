//! Repository 実装
//!
//! ## 概要
//!
//! このモジュールはドメイン層の Repository trait の具体的な実装を提供します。
//!
//! ## 実装
//!
//! - `inmemory`: HashMap を使ったインメモリ実装
//! - 将来的に: `postgres` など

pub mod inmemory;

pub use inmemory::{
    InMemoryConnectionRepository, InMemoryGameRepository, InMemoryGameStateRepository,
};
