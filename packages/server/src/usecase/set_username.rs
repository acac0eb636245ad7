//! UseCase: ユーザー名設定処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SetUsernameUseCase::execute() メソッド
//! - 生文字列のバリデーションと接続レコードへの反映
//!
//! ### なぜこのテストが必要か
//! - バリデーション失敗時にレコードが変化しないことを保証
//! - 再設定（上書き）が許されることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：初回設定、上書き設定
//! - 異常系：空文字列、未登録の接続

use std::sync::Arc;

use crate::domain::{Connection, ConnectionId, ConnectionRepository, Username};

use super::error::SetUsernameError;

/// ユーザー名設定のユースケース
pub struct SetUsernameUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn ConnectionRepository>,
}

impl SetUsernameUseCase {
    /// 新しい SetUsernameUseCase を作成
    pub fn new(repository: Arc<dyn ConnectionRepository>) -> Self {
        Self { repository }
    }

    /// ユーザー名設定を実行
    ///
    /// # Arguments
    ///
    /// * `connection_id` - 設定対象の接続 ID（Domain Model）
    /// * `raw_username` - クライアントから届いた生のユーザー名
    ///
    /// # Returns
    ///
    /// * `Ok(Connection)` - 設定後の接続レコード
    /// * `Err(SetUsernameError)` - バリデーション失敗または未登録の接続
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        raw_username: String,
    ) -> Result<Connection, SetUsernameError> {
        // 1. バリデーション（空・長過ぎる名前を弾く）
        let username = Username::new(raw_username)?;

        // 2. 接続レコードに反映
        let connection = self.repository.set_username(connection_id, username).await?;

        Ok(connection)
    }
}
