//! UseCase: セッション切断処理
//!
//! 切断時のゲーム退出は LeaveGameUseCase が先に処理する。ここでは
//! プッシュ経路と接続レコードの後始末だけを行う。
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectSessionUseCase::execute() メソッド
//! - プッシュ経路の解除と接続レコードの削除
//!
//! ### なぜこのテストが必要か
//! - 切断後の接続へプッシュが届かないことを保証
//! - 未登録 ID での切断が冪等に成功することを確認（二重切断の許容）
//!
//! ### どのような状況を想定しているか
//! - 正常系：接続済みセッションの切断
//! - エッジケース：同じセッションの二重切断

use std::sync::Arc;

use crate::domain::{ConnectionId, ConnectionRepository, MessagePusher};

use super::error::DisconnectSessionError;

/// セッション切断のユースケース
pub struct DisconnectSessionUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn ConnectionRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl DisconnectSessionUseCase {
    /// 新しい DisconnectSessionUseCase を作成
    pub fn new(
        repository: Arc<dyn ConnectionRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// セッション切断を実行
    ///
    /// # Arguments
    ///
    /// * `connection_id` - 切断する接続の ID（Domain Model）
    ///
    /// # Returns
    ///
    /// * `Ok(())` - 切断成功（未登録でも成功扱い）
    /// * `Err(DisconnectSessionError)` - 後始末に失敗
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
    ) -> Result<(), DisconnectSessionError> {
        // 1. MessagePusher から登録解除（以後このセッションへのプッシュは失敗する）
        self.message_pusher.unregister_client(connection_id).await;

        // 2. Repository から接続レコードを削除（冪等）
        self.repository.unregister(connection_id).await?;

        Ok(())
    }
}
