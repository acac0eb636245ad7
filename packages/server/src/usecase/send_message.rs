//! UseCase: ゲーム内チャット送信処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendMessageUseCase::execute() メソッド
//! - 中継対象の選定（送信者以外の同卓メンバー）とペイロードの組み立て
//!
//! ### なぜこのテストが必要か
//! - メッセージが同卓の他メンバーだけに届くこと（卓をまたがない）を保証
//! - 空メッセージが中継前に弾かれることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：4人卓でのチャット中継
//! - 異常系：空メッセージ、ゲーム未参加、名前未設定

use std::sync::Arc;

use crate::domain::{ConnectionId, ConnectionRepository, GameRepository};
use crate::infrastructure::dto::websocket::{
    ActionName, InGameMessagePayload, ResponseEnvelope,
};

use super::broadcast::GameBroadcaster;
use super::error::SendMessageError;

/// ゲーム内チャット送信のユースケース
pub struct SendMessageUseCase {
    /// 接続 Repository（データアクセス層の抽象化）
    connection_repository: Arc<dyn ConnectionRepository>,
    /// ゲーム Repository（データアクセス層の抽象化）
    game_repository: Arc<dyn GameRepository>,
    /// ゲーム内配信エンジン
    broadcaster: Arc<GameBroadcaster>,
}

impl SendMessageUseCase {
    /// 新しい SendMessageUseCase を作成
    pub fn new(
        connection_repository: Arc<dyn ConnectionRepository>,
        game_repository: Arc<dyn GameRepository>,
        broadcaster: Arc<GameBroadcaster>,
    ) -> Self {
        Self {
            connection_repository,
            game_repository,
            broadcaster,
        }
    }

    /// チャット送信を実行
    ///
    /// # Arguments
    ///
    /// * `connection_id` - 送信者の接続 ID（Domain Model）
    /// * `message` - メッセージ本文
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<ConnectionId>)` - 中継した宛先の一覧（送信者を除く同卓メンバー）
    /// * `Err(SendMessageError)` - 前提条件の不成立
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        message: String,
    ) -> Result<Vec<ConnectionId>, SendMessageError> {
        use jansou_shared::time::get_jst_timestamp;

        // 1. 接続と参加中のゲームを確認
        let connection = self
            .connection_repository
            .get(connection_id)
            .await?
            .ok_or_else(|| SendMessageError::NotConnected(connection_id.as_str().to_string()))?;
        let username = connection
            .require_username()
            .map_err(|_| SendMessageError::UsernameNotSet)?
            .clone();
        let game_id = connection
            .game_id
            .clone()
            .ok_or(SendMessageError::NotInGame)?;

        // 2. 空メッセージは中継しない
        if message.trim().is_empty() {
            return Err(SendMessageError::EmptyMessage);
        }

        // 3. 同卓の他メンバーへ中継
        let game = self
            .game_repository
            .get(&game_id)
            .await?
            .ok_or_else(|| SendMessageError::GameNotFound(game_id.as_str().to_string()))?;
        let targets: Vec<ConnectionId> = game
            .connection_ids()
            .into_iter()
            .filter(|id| id != connection_id)
            .collect();

        let payload = InGameMessagePayload {
            connection_id: connection_id.as_str().to_string(),
            username: username.as_str().to_string(),
            message,
            timestamp: get_jst_timestamp(),
        };
        self.broadcaster
            .broadcast_to(
                targets.clone(),
                &ResponseEnvelope::push(ActionName::InGameMessage, payload),
            )
            .await;

        Ok(targets)
    }
}
