//! UseCase: ゲーム内配信エンジン
//!
//! 各ユースケースが確定させた状態遷移を、卓のメンバーへ配る部分を集約する。
//! 一様なペイロードは一度だけシリアライズして全宛先へ並行送信し、
//! 手牌同期(GAME_START / GAME_RESET)だけは受信者ごとにペイロードを組み立てる。
//! 他家の手牌が別の受信者のフレームに混ざることはない。
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - GameBroadcaster::broadcast_to() / broadcast_hand_sync() /
//!   start_new_round_and_send_updates()
//! - 受信者ごとの手牌同期ペイロードの個別化と、NEW_ROUND → 配牌プッシュの順序
//!
//! ### なぜこのテストが必要か
//! - 手牌は持ち主にしか配られないこと（情報漏洩の防止）を保証するため
//! - 次局開始が NEW_ROUND 通知と遅延配牌の二段階で届くことを保証するため
//! - 配牌前に卓が消えた場合に配信が黙って打ち切られることを確認するため
//!
//! ### どのような状況を想定しているか
//! - 正常系：全員への一斉配信、4 人分の個別手牌同期、次局のロールオーバー
//! - エッジケース：配牌プッシュ前にゲームが削除されている

use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;

use crate::domain::{
    ConnectionId, GameId, GameState, GameStateRepository, MessagePusher, RepositoryError,
    shuffle_wall,
};
use crate::infrastructure::dto::websocket::{
    ActionName, HandSyncPayload, NewRoundPayload, PlayerPileDto, ResponseEnvelope,
};

/// NEW_ROUND 通知から配牌プッシュまでの待ち時間
///
/// クライアントはこの間に結果表示から次局画面へ遷移する。
pub const NEW_ROUND_DEAL_DELAY: Duration = Duration::from_secs(5);

/// ゲーム内イベントを卓のメンバーへ配るブロードキャスター
pub struct GameBroadcaster {
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    /// GameStateRepository（局状態ストアの抽象化）
    game_state_repository: Arc<dyn GameStateRepository>,
    /// NEW_ROUND から配牌プッシュまでの待ち時間
    deal_delay: Duration,
}

impl GameBroadcaster {
    /// 新しい GameBroadcaster を作成
    pub fn new(
        message_pusher: Arc<dyn MessagePusher>,
        game_state_repository: Arc<dyn GameStateRepository>,
    ) -> Self {
        Self::with_deal_delay(message_pusher, game_state_repository, NEW_ROUND_DEAL_DELAY)
    }

    /// 配牌までの待ち時間を指定して作成
    ///
    /// テストでは `Duration::ZERO` を渡して待ち時間を省略する。
    pub fn with_deal_delay(
        message_pusher: Arc<dyn MessagePusher>,
        game_state_repository: Arc<dyn GameStateRepository>,
        deal_delay: Duration,
    ) -> Self {
        Self {
            message_pusher,
            game_state_repository,
            deal_delay,
        }
    }

    /// 同一フレームを全宛先へ並行送信する
    ///
    /// シリアライズは一度だけ行う。宛先ごとの失敗はログに残すだけで、
    /// 呼び出し元のユースケースへは伝播させない。
    pub async fn broadcast_to(&self, targets: Vec<ConnectionId>, envelope: &ResponseEnvelope) {
        if targets.is_empty() {
            return;
        }

        let frame = envelope.to_json();
        if let Err(e) = self.message_pusher.broadcast(targets, &frame).await {
            tracing::warn!("failed to broadcast {:?}: {}", envelope.action, e);
        }
    }

    /// 受信者ごとに個別化した手牌同期を全席へ送る
    ///
    /// `tiles` には受信者自身の手牌だけを載せ、全席の捨て牌は
    /// `selfPlayedTiles` として公開情報のまま共有する。
    pub async fn broadcast_hand_sync(&self, action: ActionName, state: &GameState) {
        push_hand_sync(self.message_pusher.as_ref(), action, state).await;
    }

    /// 次局をロールオーバーし、NEW_ROUND 通知と遅延配牌を送る
    ///
    /// 1. 新しい牌山で `start_new_round` を確定させる
    /// 2. NEW_ROUND {dealer, currentWind} を全席へ即時送信する
    /// 3. `deal_delay` 経過後に GAME_RESET の手牌同期を別タスクで配る
    ///
    /// 手順 3 は spawn したタスクに任せるため、呼び出し元は手順 2 の直後に
    /// 戻る。配牌時点で卓が削除済みならプッシュは行わない。
    ///
    /// # Arguments
    ///
    /// * `game_id` - ロールオーバーするゲームの ID
    /// * `is_dealer_changed` - 親流れかどうか（true なら親が次席へ移る）
    ///
    /// # Returns
    ///
    /// * `Ok(())` - 次局の状態が確定し、通知の送信が始まった
    /// * `Err(RepositoryError)` - ロールオーバーの前提条件を満たさなかった
    pub async fn start_new_round_and_send_updates(
        &self,
        game_id: &GameId,
        is_dealer_changed: bool,
    ) -> Result<(), RepositoryError> {
        // 1. 新しい牌山で次局を確定させる
        let wall = shuffle_wall();
        let state = self
            .game_state_repository
            .start_new_round(game_id, wall, is_dealer_changed)
            .await?;

        // 2. 親と場風を全席へ先に知らせる
        let payload = NewRoundPayload {
            dealer: state.dealer,
            current_wind: state.current_wind,
        };
        self.broadcast_to(
            state.connection_ids(),
            &ResponseEnvelope::push(ActionName::NewRound, payload),
        )
        .await;

        // 3. 配牌は遅延後に別タスクで配る
        let message_pusher = Arc::clone(&self.message_pusher);
        let game_state_repository = Arc::clone(&self.game_state_repository);
        let game_id = game_id.clone();
        let deal_delay = self.deal_delay;
        tokio::spawn(async move {
            tokio::time::sleep(deal_delay).await;

            match game_state_repository.get(&game_id).await {
                Ok(Some(state)) => {
                    push_hand_sync(message_pusher.as_ref(), ActionName::GameReset, &state).await;
                }
                Ok(None) => {
                    tracing::warn!(
                        "game '{}' was deleted before the re-deal push",
                        game_id.as_str()
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        "failed to load game '{}' for the re-deal push: {}",
                        game_id.as_str(),
                        e
                    );
                }
            }
        });

        Ok(())
    }
}

/// 全席へ個別の手牌同期フレームを並行送信する
///
/// spawn したタスクからも呼べるよう、ブロードキャスターのメソッドではなく
/// 自由関数にしてある。宛先ごとの失敗はログに残して続行する。
async fn push_hand_sync(message_pusher: &dyn MessagePusher, action: ActionName, state: &GameState) {
    let piles: Vec<PlayerPileDto> = state.hands.iter().map(PlayerPileDto::from).collect();

    let sends = state.hands.iter().map(|hand| {
        let payload = HandSyncPayload {
            tiles: hand.hand.clone(),
            self_played_tiles: piles.clone(),
            current_index: state.current_index,
        };
        let frame = ResponseEnvelope::push(action, payload).to_json();
        async move {
            (
                hand.connection_id.clone(),
                message_pusher.push_to(&hand.connection_id, &frame).await,
            )
        }
    });

    for (connection_id, result) in join_all(sends).await {
        if let Err(e) = result {
            tracing::warn!(
                "failed to push {:?} to '{}': {}",
                action,
                connection_id.as_str(),
                e
            );
        }
    }
}
