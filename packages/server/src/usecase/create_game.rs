//! UseCase: ゲーム作成処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - CreateGameUseCase::execute() メソッド
//! - 前提条件（登録済み接続、ユーザー名設定済み、未参加）の検証と、
//!   ゲームレコード作成・作成者の着席の一貫性
//!
//! ### なぜこのテストが必要か
//! - 作成者がホストとして席 0 に着くことを保証
//! - 前提条件を欠いた作成要求が何も残さないことを確認
//! - 着席に失敗したときに作りかけのゲームが残らないことを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：名前設定済みの接続によるゲーム作成
//! - 異常系：名前未設定、別ゲーム参加中、空のゲーム名

use std::sync::Arc;

use crate::domain::{
    ConnectionId, ConnectionRepository, Game, GameIdFactory, GameName, GameRepository, GameUser,
    Timestamp,
};

use super::error::CreateGameError;

/// ゲーム作成のユースケース
pub struct CreateGameUseCase {
    /// 接続 Repository（データアクセス層の抽象化）
    connection_repository: Arc<dyn ConnectionRepository>,
    /// ゲーム Repository（データアクセス層の抽象化）
    game_repository: Arc<dyn GameRepository>,
}

impl CreateGameUseCase {
    /// 新しい CreateGameUseCase を作成
    pub fn new(
        connection_repository: Arc<dyn ConnectionRepository>,
        game_repository: Arc<dyn GameRepository>,
    ) -> Self {
        Self {
            connection_repository,
            game_repository,
        }
    }

    /// ゲーム作成を実行
    ///
    /// # Arguments
    ///
    /// * `connection_id` - 作成者の接続 ID（Domain Model）
    /// * `game_name` - クライアントから届いた生のゲーム名
    /// * `game_type` - ゲーム種別（クライアント定義の自由文字列）
    /// * `game_version` - ルールバージョン（クライアント定義の自由文字列）
    ///
    /// # Returns
    ///
    /// * `Ok(Game)` - 作成されたゲーム（作成者がホストとして着席済み）
    /// * `Err(CreateGameError)` - 前提条件の不成立または保存失敗
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        game_name: String,
        game_type: String,
        game_version: String,
    ) -> Result<Game, CreateGameError> {
        use jansou_shared::time::get_jst_timestamp;

        // 1. 接続の前提条件を確認（ユーザー名設定済み、未参加）
        let connection = self
            .connection_repository
            .get(connection_id)
            .await?
            .ok_or_else(|| CreateGameError::NotConnected(connection_id.as_str().to_string()))?;
        let username = connection
            .require_username()
            .map_err(|_| CreateGameError::UsernameNotSet)?
            .clone();
        if let Some(game_id) = &connection.game_id {
            return Err(CreateGameError::AlreadyInGame(
                game_id.as_str().to_string(),
            ));
        }

        // 2. ゲームレコードを作成（作成者がホストとして席 0 に着く）
        let name = GameName::new(game_name).map_err(CreateGameError::InvalidGameName)?;
        let game_id = GameIdFactory::generate().map_err(CreateGameError::IdGeneration)?;
        let creator = GameUser::new(connection_id.clone(), username);
        let game = Game::new(
            game_id.clone(),
            name,
            game_type,
            game_version,
            creator,
            Timestamp::new(get_jst_timestamp()),
        );
        self.game_repository.insert(game.clone()).await?;

        // 3. 接続レコード側にも参加中のゲームを記録する
        //    失敗したら作ったばかりのゲームを取り消す
        if let Err(e) = self
            .connection_repository
            .set_game_id(connection_id, game_id.clone())
            .await
        {
            if let Err(delete_err) = self.game_repository.delete(&game_id).await {
                tracing::warn!(
                    "failed to roll back game '{}': {}",
                    game_id.as_str(),
                    delete_err
                );
            }
            return Err(e.into());
        }

        Ok(game)
    }
}
