//! UseCase: ツモ処理
//!
//! 山が尽きたときの流局処理もここで扱う。`mark_round_ended` は条件付き
//! 更新なので、同時に山切れを観測した複数の呼び出しのうち勝った1つだけが
//! DRAW_ROUND の通知と次局開始を担う。
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DrawTileUseCase::execute() メソッド
//! - 通常のツモ（牌が手に入りカーソルが進む）と山切れによる流局
//!
//! ### なぜこのテストが必要か
//! - ツモ牌が引いた本人の手牌にだけ入ることを保証
//! - 山切れの瞬間に DRAW_ROUND -> NEW_ROUND -> 配牌の順で全員へ届くことを確認
//! - 手番でないプレイヤーのツモが状態を変えないことを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：手番プレイヤーのツモ
//! - 異常系：手番外のツモ、終局後のツモ
//! - エッジケース：最後の牌の直後の山切れ

use std::sync::Arc;

use crate::domain::{
    ConnectionId, ConnectionRepository, GameStateRepository, Tile, WallDraw,
};
use crate::infrastructure::dto::websocket::{ActionName, DrawnTilePayload, ResponseEnvelope};

use super::broadcast::GameBroadcaster;
use super::error::DrawTileError;

/// ツモの結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawTileOutcome {
    /// 牌を引けた
    Drawn { tile: Tile, current_index: usize },
    /// 山が尽きていた（流局）
    Exhausted { current_index: usize },
}

/// ツモのユースケース
pub struct DrawTileUseCase {
    /// 接続 Repository（データアクセス層の抽象化）
    connection_repository: Arc<dyn ConnectionRepository>,
    /// 局状態 Repository（データアクセス層の抽象化）
    game_state_repository: Arc<dyn GameStateRepository>,
    /// ゲーム内配信エンジン
    broadcaster: Arc<GameBroadcaster>,
}

impl DrawTileUseCase {
    /// 新しい DrawTileUseCase を作成
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

    /// ツモを実行
    ///
    /// # Arguments
    ///
    /// * `connection_id` - ツモを要求した接続の ID（Domain Model）
    ///
    /// # Returns
    ///
    /// * `Ok(DrawTileOutcome)` - 引いた牌、または山切れ
    /// * `Err(DrawTileError)` - 手番違反などの前提条件の不成立
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
    ) -> Result<DrawTileOutcome, DrawTileError> {
        // 1. 接続と参加中のゲームを確認
        let connection = self
            .connection_repository
            .get(connection_id)
            .await?
            .ok_or_else(|| DrawTileError::NotConnected(connection_id.as_str().to_string()))?;
        let game_id = connection.game_id.clone().ok_or(DrawTileError::NotInGame)?;

        // 2. 山から1枚引く（カーソル前進と手牌への追加は1回の更新）
        let (draw, current_index) = self
            .game_state_repository
            .draw_tile(&game_id, connection_id)
            .await?;

        match draw {
            WallDraw::Drawn(tile) => Ok(DrawTileOutcome::Drawn {
                tile,
                current_index,
            }),
            WallDraw::Exhausted => {
                // 3. 流局の確定は早い者勝ち。勝った呼び出しだけが通知と次局を担う
                match self.game_state_repository.mark_round_ended(&game_id).await {
                    Ok(()) => {
                        if let Ok(Some(state)) = self.game_state_repository.get(&game_id).await {
                            let payload = DrawnTilePayload {
                                tile: None,
                                current_index,
                            };
                            self.broadcaster
                                .broadcast_to(
                                    state.connection_ids(),
                                    &ResponseEnvelope::push(ActionName::DrawRound, payload),
                                )
                                .await;
                        }

                        // 流局は親流れ
                        if let Err(e) = self
                            .broadcaster
                            .start_new_round_and_send_updates(&game_id, true)
                            .await
                        {
                            tracing::warn!(
                                "failed to start the next round of game '{}': {}",
                                game_id.as_str(),
                                e
                            );
                        }
                    }
                    Err(e) => {
                        tracing::debug!(
                            "round of game '{}' already ended: {}",
                            game_id.as_str(),
                            e
                        );
                    }
                }

                Ok(DrawTileOutcome::Exhausted { current_index })
            }
        }
    }
}
