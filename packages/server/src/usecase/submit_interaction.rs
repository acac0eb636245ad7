//! UseCase: 打牌へのリアクション受付
//!
//! 打牌者以外の3人のリアクション (鳴き・ロン宣言・スキップ) を集め、
//! 3件目が揃った呼び出しが窓を決着させる。決着では勝ち鳴きの席か、
//! 全員スキップなら打牌者の下家へ手番を移し、IN_GAME_UPDATE で
//! 本人以外へ結果を配信する。決着させた本人は ack で同じ結果を受け取る。
//!
//! 勝ち鳴きの優先順位はロン > カン > ポン > チー。同位なら打牌者から
//! 近い席が勝つ。
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SubmitInteractionUseCase::execute() メソッド
//! - リアクションの蓄積と、3件目での決着・手番移動・配信
//!
//! ### なぜこのテストが必要か
//! - 3件揃うまで何も配信されないことを保証
//! - 決着時の手番が勝ち鳴きの席 (全員スキップなら下家) になることを確認
//! - 決着後に窓がリセットされ、次の打牌を受け付けられることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系: スキップ2件 + 鳴き1件、全員スキップ
//! - 異常系: 同一接続の二重リアクション、ゲーム未参加

use std::sync::Arc;

use crate::domain::{
    ConnectionId, ConnectionRepository, GameStateRepository, MeldType, Tile, TileInteraction,
};
use crate::infrastructure::dto::websocket::{ActionName, InGameUpdatePayload, ResponseEnvelope};

use super::broadcast::GameBroadcaster;
use super::error::SubmitInteractionError;

/// リアクション受付の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InteractionOutcome {
    /// まだ全員分は揃っていない
    Pending { collected: usize },
    /// 窓が決着した。claimant が `None` なら全員スキップ
    Resolved {
        claimant: Option<ConnectionId>,
        meld_type: Option<MeldType>,
        played_tiles: Vec<Tile>,
        next_turn: usize,
    },
}

/// リアクション受付のユースケース
pub struct SubmitInteractionUseCase {
    /// 接続 Repository（データアクセス層の抽象化）
    connection_repository: Arc<dyn ConnectionRepository>,
    /// 局状態 Repository（データアクセス層の抽象化）
    game_state_repository: Arc<dyn GameStateRepository>,
    /// ゲーム内配信エンジン
    broadcaster: Arc<GameBroadcaster>,
}

impl SubmitInteractionUseCase {
    /// 新しい SubmitInteractionUseCase を作成
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

    /// リアクションを受け付ける
    ///
    /// # Arguments
    ///
    /// * `connection_id` - リアクションした接続の ID（Domain Model）
    /// * `meld_type` - 宣言した鳴きの種類 (スキップ時も形式上必要)
    /// * `played_tiles` - 鳴きに使う手牌 (スキップ時は空)
    /// * `skip_interaction` - スキップ宣言なら true
    ///
    /// # Returns
    ///
    /// * `Ok(InteractionOutcome)` - 蓄積中か、決着した結果
    /// * `Err(SubmitInteractionError)` - 二重リアクションなどの前提条件の不成立
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        meld_type: MeldType,
        played_tiles: Vec<Tile>,
        skip_interaction: bool,
    ) -> Result<InteractionOutcome, SubmitInteractionError> {
        // 1. 接続と参加中のゲームを確認
        let connection = self
            .connection_repository
            .get(connection_id)
            .await?
            .ok_or_else(|| {
                SubmitInteractionError::NotConnected(connection_id.as_str().to_string())
            })?;
        let game_id = connection
            .game_id
            .clone()
            .ok_or(SubmitInteractionError::NotInGame)?;

        // 2. リアクションを追記 (追記とカウント増分は1回の更新)
        let interaction = TileInteraction {
            connection_id: connection_id.clone(),
            played_tiles,
            meld_type,
            skip_interaction,
        };
        let state = self
            .game_state_repository
            .append_interaction(&game_id, interaction)
            .await?;

        // 3. 打牌者以外の全員分が揃うまでは蓄積のみ
        let required = state.hands.len() - 1;
        if state.interaction_count < required {
            return Ok(InteractionOutcome::Pending {
                collected: state.interaction_count,
            });
        }

        // 4. 揃った呼び出しが決着させる。打牌者はこの時点の手番の席
        let (payload, next_turn, claimant, winning_meld) = match state.winning_claim() {
            Some((claim, seat)) => (
                InGameUpdatePayload {
                    connection_id: Some(claim.connection_id.as_str().to_string()),
                    meld_type: Some(claim.meld_type),
                    played_tiles: claim.played_tiles.clone(),
                    current_turn: seat,
                },
                seat,
                Some(claim.connection_id),
                Some(claim.meld_type),
            ),
            None => {
                let next = state.next_seat_after(state.current_turn);
                (
                    InGameUpdatePayload {
                        connection_id: None,
                        meld_type: None,
                        played_tiles: Vec::new(),
                        current_turn: next,
                    },
                    next,
                    None,
                    None,
                )
            }
        };

        // 5. 手番を移し、窓をリセットしてから配信する
        self.game_state_repository
            .set_current_turn(&game_id, next_turn)
            .await?;
        self.game_state_repository
            .reset_interactions(&game_id)
            .await?;

        let outcome = InteractionOutcome::Resolved {
            claimant,
            meld_type: winning_meld,
            played_tiles: payload.played_tiles.clone(),
            next_turn,
        };

        // 決着させた本人以外へ配信 (本人は ack で受け取る)
        let targets: Vec<ConnectionId> = state
            .connection_ids()
            .into_iter()
            .filter(|id| id != connection_id)
            .collect();
        self.broadcaster
            .broadcast_to(
                targets,
                &ResponseEnvelope::push(ActionName::InGameUpdate, payload),
            )
            .await;

        Ok(outcome)
    }
}
