//! UseCase: ゲームページロード通知処理
//!
//! 4人全員のロードがそろった瞬間に局を初期化して配牌する。ロード数の
//! 加算は条件付き更新なので、4を観測する呼び出しはちょうど1つになり、
//! 配牌が二重に走ることはない。
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - MarkGameLoadedUseCase::execute() メソッド
//! - ロード数の加算と、4人目を観測した呼び出しによる局初期化・GAME_START 配信
//!
//! ### なぜこのテストが必要か
//! - 局の初期化が一度だけ起きることを保証（二重配牌の防止）
//! - GAME_START が受信者ごとの手牌を正しく載せることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：1〜3人目のロード（配牌なし）、4人目のロード（配牌あり）
//! - 異常系：開始前のゲーム、5回目のロード、ゲーム未参加

use std::sync::Arc;

use crate::domain::{
    ConnectionId, ConnectionRepository, DEFAULT_MAX_USERS_IN_GAME, GameRepository, GameState,
    GameStateRepository, shuffle_wall,
};
use crate::infrastructure::dto::websocket::ActionName;

use super::broadcast::GameBroadcaster;
use super::error::MarkGameLoadedError;

/// ゲームページロード通知のユースケース
pub struct MarkGameLoadedUseCase {
    /// 接続 Repository（データアクセス層の抽象化）
    connection_repository: Arc<dyn ConnectionRepository>,
    /// ゲーム Repository（データアクセス層の抽象化）
    game_repository: Arc<dyn GameRepository>,
    /// 局状態 Repository（データアクセス層の抽象化）
    game_state_repository: Arc<dyn GameStateRepository>,
    /// ゲーム内配信エンジン
    broadcaster: Arc<GameBroadcaster>,
}

impl MarkGameLoadedUseCase {
    /// 新しい MarkGameLoadedUseCase を作成
    pub fn new(
        connection_repository: Arc<dyn ConnectionRepository>,
        game_repository: Arc<dyn GameRepository>,
        game_state_repository: Arc<dyn GameStateRepository>,
        broadcaster: Arc<GameBroadcaster>,
    ) -> Self {
        Self {
            connection_repository,
            game_repository,
            game_state_repository,
            broadcaster,
        }
    }

    /// ロード通知を実行
    ///
    /// # Arguments
    ///
    /// * `connection_id` - ゲームページを開いた接続の ID（Domain Model）
    ///
    /// # Returns
    ///
    /// * `Ok(usize)` - 加算後のロード数（1〜4）
    /// * `Err(MarkGameLoadedError)` - 前提条件の不成立または配牌失敗
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
    ) -> Result<usize, MarkGameLoadedError> {
        // 1. 接続と参加中のゲームを確認
        let connection = self
            .connection_repository
            .get(connection_id)
            .await?
            .ok_or_else(|| {
                MarkGameLoadedError::NotConnected(connection_id.as_str().to_string())
            })?;
        let game_id = connection
            .game_id
            .clone()
            .ok_or(MarkGameLoadedError::NotInGame)?;

        // 2. ロード数を加算（開始前・5回目以降はストア側で弾かれる）
        let (game, loaded_count) = self
            .game_repository
            .increment_loaded_count(&game_id)
            .await?;

        // 3. 4人目を観測した呼び出しが局を初期化して配牌する
        if loaded_count == DEFAULT_MAX_USERS_IN_GAME {
            let wall = shuffle_wall();
            let state = GameState::new(game_id.clone(), &game.connection_ids(), wall)?;
            self.game_state_repository.put(state.clone()).await?;
            self.broadcaster
                .broadcast_hand_sync(ActionName::GameStart, &state)
                .await;
        }

        Ok(loaded_count)
    }
}
