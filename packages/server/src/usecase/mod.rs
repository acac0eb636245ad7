//! UseCase 層
//!
//! WebSocket で届く 1 アクション = 1 ユースケース。各ユースケースは
//! Repository trait 越しに条件付き更新を発行し、状態遷移の結果として
//! 必要な配信を `GameBroadcaster` 経由で行います。
//!
//! トランスポート層 (ui) はエンベロープの解釈と要求者への ack だけを
//! 担当し、他の席へのファンアウトはこの層の責務です。
//!
//! ## ロビー
//!
//! - `connect_session` / `disconnect_session`: セッションの登録と破棄
//! - `set_username` / `get_connections`: 参加者の名前と一覧
//! - `create_game` / `get_games` / `join_game` / `leave_game`: 卓の CRUD
//! - `start_game` / `mark_game_loaded`: 開始とロード完了の同期
//!
//! ## ゲーム内
//!
//! - `send_message`: 卓内チャット
//! - `draw_tile` / `play_tile`: ツモと打牌
//! - `submit_interaction`: 打牌へのリアクション (鳴き・スキップ) の決着
//! - `declare_win` / `self_play_tile`: 和了宣言とボーナス牌の公開
//! - `resync_game`: 局状態の再同期
//! - `broadcast`: 配信エンジン (個別配牌・次局開始の遅延配信)

pub mod broadcast;
pub mod connect_session;
pub mod create_game;
pub mod declare_win;
pub mod disconnect_session;
pub mod draw_tile;
pub mod error;
pub mod get_connections;
pub mod get_games;
pub mod join_game;
pub mod leave_game;
pub mod mark_game_loaded;
pub mod play_tile;
pub mod resync_game;
pub mod self_play_tile;
pub mod send_message;
pub mod set_username;
pub mod start_game;
pub mod submit_interaction;

pub use broadcast::{GameBroadcaster, NEW_ROUND_DEAL_DELAY};
pub use connect_session::ConnectSessionUseCase;
pub use create_game::CreateGameUseCase;
pub use declare_win::DeclareWinUseCase;
pub use disconnect_session::DisconnectSessionUseCase;
pub use draw_tile::{DrawTileOutcome, DrawTileUseCase};
pub use error::{
    ConnectSessionError, CreateGameError, DeclareWinError, DisconnectSessionError, DrawTileError,
    JoinGameError, LeaveGameError, MarkGameLoadedError, PlayTileError, ResyncGameError,
    SelfPlayTileError, SendMessageError, SetUsernameError, StartGameError, SubmitInteractionError,
};
pub use get_connections::GetConnectionsUseCase;
pub use get_games::GetGamesUseCase;
pub use join_game::JoinGameUseCase;
pub use leave_game::{LeaveGameUseCase, LeaveOutcome};
pub use mark_game_loaded::MarkGameLoadedUseCase;
pub use play_tile::PlayTileUseCase;
pub use resync_game::ResyncGameUseCase;
pub use self_play_tile::SelfPlayTileUseCase;
pub use send_message::SendMessageUseCase;
pub use set_username::SetUsernameUseCase;
pub use start_game::StartGameUseCase;
pub use submit_interaction::{InteractionOutcome, SubmitInteractionUseCase};
