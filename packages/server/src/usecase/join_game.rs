//! UseCase: ゲーム参加処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinGameUseCase::execute() メソッド
//! - 着席の前提条件検証、接続レコードとの二重記録、既存メンバーへの GAME_UPDATE
//!
//! ### なぜこのテストが必要か
//! - 参加者以外の既存メンバーだけに GAME_UPDATE が届くことを保証
//! - 満席・参加済みなどで弾かれた要求が席もレコードも変えないことを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：2人目の着席と既存メンバーへの通知
//! - 異常系：名前未設定、別ゲーム参加中、存在しないゲーム、満席

use std::sync::Arc;

use crate::domain::{
    ConnectionId, ConnectionRepository, Game, GameId, GameRepository, GameUser,
};
use crate::infrastructure::dto::websocket::{ActionName, GameDto, ResponseEnvelope};

use super::broadcast::GameBroadcaster;
use super::error::JoinGameError;

/// ゲーム参加のユースケース
pub struct JoinGameUseCase {
    /// 接続 Repository（データアクセス層の抽象化）
    connection_repository: Arc<dyn ConnectionRepository>,
    /// ゲーム Repository（データアクセス層の抽象化）
    game_repository: Arc<dyn GameRepository>,
    /// ゲーム内配信エンジン
    broadcaster: Arc<GameBroadcaster>,
}

impl JoinGameUseCase {
    /// 新しい JoinGameUseCase を作成
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

    /// ゲーム参加を実行
    ///
    /// # Arguments
    ///
    /// * `connection_id` - 参加者の接続 ID（Domain Model）
    /// * `raw_game_id` - クライアントから届いた生のゲーム ID
    ///
    /// # Returns
    ///
    /// * `Ok(Game)` - 着席後のゲーム
    /// * `Err(JoinGameError)` - 前提条件の不成立または着席失敗
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        raw_game_id: String,
    ) -> Result<Game, JoinGameError> {
        // 1. 接続の前提条件を確認（ユーザー名設定済み、未参加）
        let connection = self
            .connection_repository
            .get(connection_id)
            .await?
            .ok_or_else(|| JoinGameError::NotConnected(connection_id.as_str().to_string()))?;
        let username = connection
            .require_username()
            .map_err(|_| JoinGameError::UsernameNotSet)?
            .clone();
        if let Some(game_id) = &connection.game_id {
            return Err(JoinGameError::AlreadyInGame(game_id.as_str().to_string()));
        }

        // 2. 着席（満席・参加済み・開始済みはストア側で弾かれる）
        let game_id = GameId::new(raw_game_id)?;
        let game_user = GameUser::new(connection_id.clone(), username);
        let game = self.game_repository.add_user(&game_id, game_user).await?;

        // 3. 接続レコード側にも参加中のゲームを記録する
        //    失敗したら席を取り消す
        if let Err(e) = self
            .connection_repository
            .set_game_id(connection_id, game_id.clone())
            .await
        {
            if let Err(rollback_err) = self
                .game_repository
                .remove_user(&game_id, connection_id)
                .await
            {
                tracing::warn!(
                    "failed to roll back seat in game '{}': {}",
                    game_id.as_str(),
                    rollback_err
                );
            }
            return Err(e.into());
        }

        // 4. 既存メンバーへ新しい席順を知らせる
        let targets: Vec<ConnectionId> = game
            .connection_ids()
            .into_iter()
            .filter(|id| id != connection_id)
            .collect();
        self.broadcaster
            .broadcast_to(
                targets,
                &ResponseEnvelope::push(ActionName::GameUpdate, GameDto::from(game.clone())),
            )
            .await;

        Ok(game)
    }
}
