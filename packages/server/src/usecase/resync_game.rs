//! UseCase: 局状態の再同期
//!
//! リロードや描画乱れからの復帰用。ストアの局レコードを正として、
//! 全席へ個別の配牌 (自分の手牌 + 全員の公開列) を配り直す。
//! 状態は一切変更しない読み取り専用の操作。
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ResyncGameUseCase::execute() メソッド
//! - GAME_RESET による全席への個別再配信
//!
//! ### なぜこのテストが必要か
//! - 再同期が他人の手牌を漏らさないことを保証
//! - 局レコードがない状態の再同期要求が拒否されることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系: 進行中の局での再同期要求
//! - 異常系: 局が始まっていないゲームでの要求

use std::sync::Arc;

use crate::domain::{ConnectionId, ConnectionRepository, GameStateRepository};
use crate::infrastructure::dto::websocket::ActionName;

use super::broadcast::GameBroadcaster;
use super::error::ResyncGameError;

/// 再同期のユースケース
pub struct ResyncGameUseCase {
    /// 接続 Repository（データアクセス層の抽象化）
    connection_repository: Arc<dyn ConnectionRepository>,
    /// 局状態 Repository（データアクセス層の抽象化）
    game_state_repository: Arc<dyn GameStateRepository>,
    /// ゲーム内配信エンジン
    broadcaster: Arc<GameBroadcaster>,
}

impl ResyncGameUseCase {
    /// 新しい ResyncGameUseCase を作成
    pub fn new(
        connection_repository: Arc<dyn ConnectionRepository>,
        game_state_repository: Arc<dyn GameStateRepository>,
        broadcaster: Arc<GameBroadcaster>,
    ) -> Self {
        Self {
            connection_repository,
            game_state_repository,
            broadcaster,
        }
    }

    /// 再同期を実行
    ///
    /// # Arguments
    ///
    /// * `connection_id` - 再同期を要求した接続の ID（Domain Model）
    ///
    /// # Returns
    ///
    /// * `Ok(())` - 全席へ配り直した
    /// * `Err(ResyncGameError)` - 局が存在しないなど前提条件の不成立
    pub async fn execute(&self, connection_id: &ConnectionId) -> Result<(), ResyncGameError> {
        // 1. 接続と参加中のゲームを確認
        let connection = self
            .connection_repository
            .get(connection_id)
            .await?
            .ok_or_else(|| ResyncGameError::NotConnected(connection_id.as_str().to_string()))?;
        let game_id = connection
            .game_id
            .clone()
            .ok_or(ResyncGameError::NotInGame)?;

        // 2. 局レコードを正として全席へ配り直す
        let state = self
            .game_state_repository
            .get(&game_id)
            .await?
            .ok_or_else(|| ResyncGameError::NoActiveRound(game_id.as_str().to_string()))?;
        self.broadcaster
            .broadcast_hand_sync(ActionName::GameReset, &state)
            .await;

        Ok(())
    }
}
