//! UseCase: 和了宣言
//!
//! 和了の成否判定 (役・点数計算) はサーバでは行わない。宣言を受けて
//! ラウンドを終了させ、勝者の手牌を全席へ公開し、次局を開始する。
//! 親が和了した場合は親が続投し、それ以外は親流れになる。
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DeclareWinUseCase::execute() メソッド
//! - 和了によるラウンド終了と WINNING_TILES -> NEW_ROUND -> 配牌の連鎖
//!
//! ### なぜこのテストが必要か
//! - 親の和了と子の和了で次局の親が変わることを確認
//! - 終了済みのラウンドへの二重宣言が拒否されることを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系: 子の和了 (親流れ)、親の和了 (連荘)
//! - 異常系: 終局後の宣言、局が存在しない宣言

use std::sync::Arc;

use crate::domain::{
    ConnectionId, ConnectionRepository, GameStateError, GameStateRepository, RepositoryError, Tile,
};
use crate::infrastructure::dto::websocket::{ActionName, ResponseEnvelope, WinDeclaredPayload};

use super::broadcast::GameBroadcaster;
use super::error::DeclareWinError;

/// 和了宣言のユースケース
pub struct DeclareWinUseCase {
    /// 接続 Repository（データアクセス層の抽象化）
    connection_repository: Arc<dyn ConnectionRepository>,
    /// 局状態 Repository（データアクセス層の抽象化）
    game_state_repository: Arc<dyn GameStateRepository>,
    /// ゲーム内配信エンジン
    broadcaster: Arc<GameBroadcaster>,
}

impl DeclareWinUseCase {
    /// 新しい DeclareWinUseCase を作成
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

    /// 和了を宣言する
    ///
    /// # Arguments
    ///
    /// * `connection_id` - 和了を宣言した接続の ID（Domain Model）
    /// * `tiles` - 公開する和了形の牌
    ///
    /// # Returns
    ///
    /// * `Ok(())` - ラウンドが終了し、次局の開始が予約された
    /// * `Err(DeclareWinError)` - 終了済みのラウンドなど前提条件の不成立
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        tiles: Vec<Tile>,
    ) -> Result<(), DeclareWinError> {
        // 1. 接続と参加中のゲームを確認
        let connection = self
            .connection_repository
            .get(connection_id)
            .await?
            .ok_or_else(|| DeclareWinError::NotConnected(connection_id.as_str().to_string()))?;
        let game_id = connection
            .game_id
            .clone()
            .ok_or(DeclareWinError::NotInGame)?;

        // 2. 局を取得し、親の続投かどうかを宣言者の席で決める
        let state = self
            .game_state_repository
            .get(&game_id)
            .await?
            .ok_or_else(|| DeclareWinError::NoActiveRound(game_id.as_str().to_string()))?;
        let winner_seat = state
            .seat_of(connection_id)
            .map_err(RepositoryError::from)?;
        let is_dealer_changed = winner_seat != state.dealer;

        // 3. ラウンドを終了させる。競合した宣言は最初の1件だけが通る
        self.game_state_repository
            .mark_round_ended(&game_id)
            .await
            .map_err(|e| match e {
                RepositoryError::GameState(GameStateError::RoundNotInProgress) => {
                    DeclareWinError::RoundAlreadyEnded
                }
                other => DeclareWinError::Repository(other),
            })?;

        // 4. 勝者の手牌を全席へ公開
        let payload = WinDeclaredPayload {
            connection_id: connection_id.as_str().to_string(),
            tiles,
        };
        self.broadcaster
            .broadcast_to(
                state.connection_ids(),
                &ResponseEnvelope::push(ActionName::WinningTiles, payload),
            )
            .await;

        // 5. 次局を開始 (配牌は遅延配信)。失敗しても宣言自体は成立している
        if let Err(e) = self
            .broadcaster
            .start_new_round_and_send_updates(&game_id, is_dealer_changed)
            .await
        {
            tracing::warn!(
                "failed to start the next round of game '{}': {}",
                game_id.as_str(),
                e
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{
            Connection, ConnectionIdFactory, GameId, GameIdFactory, GameState, MessagePusher,
            RoundPhase, Timestamp, Username, build_wall_tiles,
        },
        infrastructure::{
            message_pusher::WebSocketMessagePusher,
            repository::{InMemoryConnectionRepository, InMemoryGameStateRepository},
        },
    };
    use serde_json::Value;
    use std::time::Duration;
    use tokio::sync::mpsc;
    use tokio::time::timeout;

    const RECV_TIMEOUT: Duration = Duration::from_secs(1);

    struct Fixture {
        connection_repository: Arc<InMemoryConnectionRepository>,
        game_state_repository: Arc<InMemoryGameStateRepository>,
        message_pusher: Arc<WebSocketMessagePusher>,
        usecase: DeclareWinUseCase,
    }

    fn create_fixture() -> Fixture {
        let connection_repository = Arc::new(InMemoryConnectionRepository::new());
        let game_state_repository = Arc::new(InMemoryGameStateRepository::new());
        let message_pusher = Arc::new(WebSocketMessagePusher::new());
        let broadcaster = Arc::new(GameBroadcaster::with_deal_delay(
            message_pusher.clone(),
            game_state_repository.clone(),
            Duration::ZERO,
        ));
        let usecase = DeclareWinUseCase::new(
            connection_repository.clone(),
            game_state_repository.clone(),
            broadcaster,
        );
        Fixture {
            connection_repository,
            game_state_repository,
            message_pusher,
            usecase,
        }
    }

    impl Fixture {
        /// 4人分の接続と進行中の局を用意する
        async fn seat_round(&self) -> (Vec<ConnectionId>, GameId, GameState) {
            let game_id = GameIdFactory::generate().unwrap();
            let mut connection_ids = Vec::new();
            for name in ["alice", "bob", "carol", "dave"] {
                let mut connection = Connection::new(
                    ConnectionIdFactory::generate().unwrap(),
                    Timestamp::new(1000),
                );
                connection.set_username(Username::new(name.to_string()).unwrap());
                self.connection_repository
                    .register(connection.clone())
                    .await
                    .unwrap();
                self.connection_repository
                    .set_game_id(&connection.id, game_id.clone())
                    .await
                    .unwrap();
                connection_ids.push(connection.id);
            }
            let state =
                GameState::new(game_id.clone(), &connection_ids, build_wall_tiles()).unwrap();
            self.game_state_repository.put(state.clone()).await.unwrap();
            (connection_ids, game_id, state)
        }

        async fn register_channel(
            &self,
            connection_id: &ConnectionId,
        ) -> mpsc::UnboundedReceiver<String> {
            let (tx, rx) = mpsc::unbounded_channel();
            self.message_pusher
                .register_client(connection_id.clone(), tx)
                .await;
            rx
        }
    }

    #[tokio::test]
    async fn test_non_dealer_win_rotates_the_dealer() {
        // テスト項目: 子の和了で WINNING_TILES が全席へ届き、次局は親流れになる
        // given (前提条件): 親は席0、席2が和了を宣言
        let fixture = create_fixture();
        let (members, game_id, state) = fixture.seat_round().await;
        let winning_tiles = state.hands[2].hand.clone();
        let mut receivers = Vec::new();
        for member in &members {
            receivers.push(fixture.register_channel(member).await);
        }

        // when (操作):
        fixture
            .usecase
            .execute(&members[2], winning_tiles.clone())
            .await
            .unwrap();

        // then (期待する結果): 全席が和了の公開、次局の開始、配牌を受け取る
        let expected_tiles = serde_json::to_value(&winning_tiles).unwrap();
        for rx in &mut receivers {
            let first = timeout(RECV_TIMEOUT, rx.recv()).await.unwrap().unwrap();
            let parsed: Value = serde_json::from_str(&first).unwrap();
            assert_eq!(parsed["action"], "WINNING_TILES");
            assert_eq!(parsed["payload"]["connectionId"], members[2].as_str());
            assert_eq!(parsed["payload"]["tiles"], expected_tiles);

            let second = timeout(RECV_TIMEOUT, rx.recv()).await.unwrap().unwrap();
            let parsed: Value = serde_json::from_str(&second).unwrap();
            assert_eq!(parsed["action"], "NEW_ROUND");
            assert_eq!(parsed["payload"]["dealer"], 1);

            let third = timeout(RECV_TIMEOUT, rx.recv()).await.unwrap().unwrap();
            let parsed: Value = serde_json::from_str(&third).unwrap();
            assert_eq!(parsed["action"], "GAME_RESET");
        }

        let stored = fixture
            .game_state_repository
            .get(&game_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.phase, RoundPhase::RoundInProgress);
        assert_eq!(stored.dealer, 1);
        assert_eq!(stored.current_turn, 1);
    }

    #[tokio::test]
    async fn test_dealer_win_keeps_the_seat() {
        // テスト項目: 親の和了では親が続投する (連荘)
        // given (前提条件): 親は席0
        let fixture = create_fixture();
        let (members, game_id, state) = fixture.seat_round().await;
        let winning_tiles = state.hands[0].hand.clone();
        let mut rx = fixture.register_channel(&members[1]).await;

        // when (操作):
        fixture
            .usecase
            .execute(&members[0], winning_tiles)
            .await
            .unwrap();

        // then (期待する結果): 次局も親は席0
        let first = timeout(RECV_TIMEOUT, rx.recv()).await.unwrap().unwrap();
        let parsed: Value = serde_json::from_str(&first).unwrap();
        assert_eq!(parsed["action"], "WINNING_TILES");

        let second = timeout(RECV_TIMEOUT, rx.recv()).await.unwrap().unwrap();
        let parsed: Value = serde_json::from_str(&second).unwrap();
        assert_eq!(parsed["action"], "NEW_ROUND");
        assert_eq!(parsed["payload"]["dealer"], 0);

        let stored = fixture
            .game_state_repository
            .get(&game_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.dealer, 0);
        assert_eq!(stored.current_wind, 0);
    }

    #[tokio::test]
    async fn test_declare_win_after_round_ended_is_rejected() {
        // テスト項目: 終了済みのラウンドへの和了宣言は拒否され、何も配信されない
        // given (前提条件): 別の経路でラウンドが終了している
        let fixture = create_fixture();
        let (members, game_id, state) = fixture.seat_round().await;
        fixture
            .game_state_repository
            .mark_round_ended(&game_id)
            .await
            .unwrap();
        let mut rx = fixture.register_channel(&members[1]).await;

        // when (操作):
        let result = fixture
            .usecase
            .execute(&members[2], state.hands[2].hand.clone())
            .await;

        // then (期待する結果):
        assert_eq!(result.unwrap_err(), DeclareWinError::RoundAlreadyEnded);
        assert!(rx.try_recv().is_err());
        let stored = fixture
            .game_state_repository
            .get(&game_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.phase, RoundPhase::RoundEnded);
    }

    #[tokio::test]
    async fn test_declare_win_without_active_round_fails() {
        // テスト項目: 局が始まっていないゲームでは和了を宣言できない
        // given (前提条件): ゲームには参加しているが局レコードがない
        let fixture = create_fixture();
        let game_id = GameIdFactory::generate().unwrap();
        let connection = Connection::new(
            ConnectionIdFactory::generate().unwrap(),
            Timestamp::new(1000),
        );
        fixture
            .connection_repository
            .register(connection.clone())
            .await
            .unwrap();
        fixture
            .connection_repository
            .set_game_id(&connection.id, game_id.clone())
            .await
            .unwrap();

        // when (操作):
        let result = fixture.usecase.execute(&connection.id, Vec::new()).await;

        // then (期待する結果):
        assert_eq!(
            result.unwrap_err(),
            DeclareWinError::NoActiveRound(game_id.as_str().to_string())
        );
    }

    #[tokio::test]
    async fn test_declare_win_not_in_game_fails() {
        // テスト項目: ゲーム未参加の接続は和了を宣言できない
        // given (前提条件):
        let fixture = create_fixture();
        let connection = Connection::new(
            ConnectionIdFactory::generate().unwrap(),
            Timestamp::new(1000),
        );
        fixture
            .connection_repository
            .register(connection.clone())
            .await
            .unwrap();

        // when (操作):
        let result = fixture.usecase.execute(&connection.id, Vec::new()).await;

        // then (期待する結果):
        assert!(matches!(result, Err(DeclareWinError::NotInGame)));
    }
}
