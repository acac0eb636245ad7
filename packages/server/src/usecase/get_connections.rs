//! UseCase: ユーザー一覧取得処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - GetConnectionsUseCase::execute() メソッド
//! - 名前を設定済みの接続だけを接続時刻順に返すこと
//!
//! ### なぜこのテストが必要か
//! - 名前未設定の接続（ロビーに現れる前のセッション）が一覧に混ざらないことを保証
//! - 並び順が接続時刻で安定していることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：名前あり・なしの接続が混在する一覧
//! - エッジケース：接続が1つもない場合

use std::sync::Arc;

use crate::domain::{Connection, ConnectionRepository};

/// ユーザー一覧取得のユースケース
pub struct GetConnectionsUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn ConnectionRepository>,
}

impl GetConnectionsUseCase {
    /// 新しい GetConnectionsUseCase を作成
    pub fn new(repository: Arc<dyn ConnectionRepository>) -> Self {
        Self { repository }
    }

    /// ユーザー一覧取得を実行
    ///
    /// # Returns
    ///
    /// 名前を設定済みの接続一覧（接続時刻の昇順）
    pub async fn execute(&self) -> Vec<Connection> {
        let mut connections: Vec<Connection> = self
            .repository
            .list()
            .await
            .into_iter()
            .filter(|connection| connection.username.is_some())
            .collect();

        connections.sort_by_key(|connection| connection.connected_at);

        connections
    }
}
