//! インメモリ実装
//!
//! HashMap をインメモリ DB として使用する Repository 実装群。
//! プロセスを落とすと全てのレコードが失われます。

pub mod connection;
pub mod game;
pub mod game_state;

pub use connection::InMemoryConnectionRepository;
pub use game::InMemoryGameRepository;
pub use game_state::InMemoryGameStateRepository;
