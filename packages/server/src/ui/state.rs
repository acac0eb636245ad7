//! Server state shared across handlers.

use std::sync::Arc;

use crate::domain::MessagePusher;
use crate::usecase::{
    ConnectSessionUseCase, CreateGameUseCase, DeclareWinUseCase, DisconnectSessionUseCase,
    DrawTileUseCase, GetConnectionsUseCase, GetGamesUseCase, JoinGameUseCase, LeaveGameUseCase,
    MarkGameLoadedUseCase, PlayTileUseCase, ResyncGameUseCase, SelfPlayTileUseCase,
    SendMessageUseCase, SetUsernameUseCase, StartGameUseCase, SubmitInteractionUseCase,
};

/// Shared application state
pub struct AppState {
    /// ConnectSessionUseCase（セッション確立のユースケース）
    pub connect_session_usecase: Arc<ConnectSessionUseCase>,
    /// DisconnectSessionUseCase（セッション破棄のユースケース）
    pub disconnect_session_usecase: Arc<DisconnectSessionUseCase>,
    /// SetUsernameUseCase（ユーザー名設定のユースケース）
    pub set_username_usecase: Arc<SetUsernameUseCase>,
    /// GetConnectionsUseCase（接続一覧取得のユースケース）
    pub get_connections_usecase: Arc<GetConnectionsUseCase>,
    /// CreateGameUseCase（ゲーム作成のユースケース）
    pub create_game_usecase: Arc<CreateGameUseCase>,
    /// GetGamesUseCase（ゲーム一覧取得のユースケース）
    pub get_games_usecase: Arc<GetGamesUseCase>,
    /// JoinGameUseCase（ゲーム参加のユースケース）
    pub join_game_usecase: Arc<JoinGameUseCase>,
    /// LeaveGameUseCase（ゲーム退出のユースケース）
    pub leave_game_usecase: Arc<LeaveGameUseCase>,
    /// StartGameUseCase（ゲーム開始のユースケース）
    pub start_game_usecase: Arc<StartGameUseCase>,
    /// MarkGameLoadedUseCase（ゲーム画面ロード完了通知のユースケース）
    pub mark_game_loaded_usecase: Arc<MarkGameLoadedUseCase>,
    /// SendMessageUseCase（ゲーム内チャットのユースケース）
    pub send_message_usecase: Arc<SendMessageUseCase>,
    /// DrawTileUseCase（ツモのユースケース）
    pub draw_tile_usecase: Arc<DrawTileUseCase>,
    /// PlayTileUseCase（打牌のユースケース）
    pub play_tile_usecase: Arc<PlayTileUseCase>,
    /// SubmitInteractionUseCase（鳴き申告のユースケース）
    pub submit_interaction_usecase: Arc<SubmitInteractionUseCase>,
    /// DeclareWinUseCase（和了宣言のユースケース）
    pub declare_win_usecase: Arc<DeclareWinUseCase>,
    /// SelfPlayTileUseCase（ボーナス牌晒しのユースケース）
    pub self_play_tile_usecase: Arc<SelfPlayTileUseCase>,
    /// ResyncGameUseCase（手牌再同期のユースケース）
    pub resync_game_usecase: Arc<ResyncGameUseCase>,
    /// MessagePusher（応答をクライアントへ届けるための抽象化）
    pub message_pusher: Arc<dyn MessagePusher>,
}
