//! UseCase: セッション接続処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ConnectSessionUseCase::execute() メソッド
//! - 接続 ID の採番、接続レコードの登録、プッシュ経路の確立
//!
//! ### なぜこのテストが必要か
//! - 採番した接続 ID がレコードとプッシュ経路の両方に同じ値で渡ることを保証
//! - 新しい接続がユーザー名もゲームも持たない初期状態であることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規接続の確立、複数接続の同時登録
//! - 異常系：レコード登録に失敗した接続にプッシュ経路が残らないこと
//! - エッジケース：採番された ID が衝突しないこと

use std::sync::Arc;

use crate::domain::{
    Connection, ConnectionIdFactory, ConnectionRepository, MessagePusher, PusherChannel, Timestamp,
};

use super::error::ConnectSessionError;

/// セッション接続のユースケース
pub struct ConnectSessionUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn ConnectionRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl ConnectSessionUseCase {
    /// 新しい ConnectSessionUseCase を作成
    pub fn new(
        repository: Arc<dyn ConnectionRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// セッション接続を実行
    ///
    /// # Arguments
    ///
    /// * `sender` - クライアントへのメッセージ送信用チャンネル
    ///
    /// # Returns
    ///
    /// * `Ok(Connection)` - 接続成功（採番済みの接続レコードを返す）
    /// * `Err(ConnectSessionError)` - 接続失敗
    pub async fn execute(&self, sender: PusherChannel) -> Result<Connection, ConnectSessionError> {
        use jansou_shared::time::get_jst_timestamp;

        // 1. 接続 ID をサーバー側で採番する
        let connection_id = ConnectionIdFactory::generate()?;

        // 2. Repository に接続レコードを登録
        let connection = Connection::new(connection_id.clone(), Timestamp::new(get_jst_timestamp()));
        self.repository.register(connection.clone()).await?;

        // 3. MessagePusher にクライアントを登録
        self.message_pusher
            .register_client(connection_id, sender)
            .await;

        Ok(connection)
    }
}
