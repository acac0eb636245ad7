//! UseCase: 打牌処理
//!
//! 打牌が成立した時点で PLAYED_TILE を全席へ配信し、リアクションの窓を
//! 開く。窓の決着は PlayedTileInteraction 側で扱う。
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - PlayTileUseCase::execute() メソッド
//! - 打牌の成立と PLAYED_TILE の全席配信
//!
//! ### なぜこのテストが必要か
//! - 手番・所持のゲートに弾かれた打牌が誰にも配信されないことを保証
//! - 配信される牌と打牌者が全席で一致することを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系: 手番プレイヤーが持っている牌を切る
//! - 異常系: 手番外の打牌、持っていない牌の打牌

use std::sync::Arc;

use crate::domain::{ConnectionId, ConnectionRepository, GameState, GameStateRepository, Tile};
use crate::infrastructure::dto::websocket::{ActionName, PlayedTilePayload, ResponseEnvelope};

use super::broadcast::GameBroadcaster;
use super::error::PlayTileError;

/// 打牌のユースケース
pub struct PlayTileUseCase {
    /// 接続 Repository（データアクセス層の抽象化）
    connection_repository: Arc<dyn ConnectionRepository>,
    /// 局状態 Repository（データアクセス層の抽象化）
    game_state_repository: Arc<dyn GameStateRepository>,
    /// ゲーム内配信エンジン
    broadcaster: Arc<GameBroadcaster>,
}

impl PlayTileUseCase {
    /// 新しい PlayTileUseCase を作成
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

    /// 打牌を実行
    ///
    /// # Arguments
    ///
    /// * `connection_id` - 打牌した接続の ID（Domain Model）
    /// * `tile` - 切る牌
    ///
    /// # Returns
    ///
    /// * `Ok(GameState)` - 更新後の局状態
    /// * `Err(PlayTileError)` - 手番違反・所持していない牌など
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        tile: Tile,
    ) -> Result<GameState, PlayTileError> {
        // 1. 接続と参加中のゲームを確認
        let connection = self
            .connection_repository
            .get(connection_id)
            .await?
            .ok_or_else(|| PlayTileError::NotConnected(connection_id.as_str().to_string()))?;
        let game_id = connection.game_id.clone().ok_or(PlayTileError::NotInGame)?;

        // 2. 手牌から河へ移す（手番と所持はストア側のゲートで検証される）
        let state = self
            .game_state_repository
            .discard_tile(&game_id, connection_id, tile)
            .await?;

        // 3. 全席へ通知してリアクションの窓を開く
        let payload = PlayedTilePayload {
            connection_id: connection_id.as_str().to_string(),
            tile,
        };
        self.broadcaster
            .broadcast_to(
                state.connection_ids(),
                &ResponseEnvelope::push(ActionName::PlayedTile, payload),
            )
            .await;

        Ok(state)
    }
}
