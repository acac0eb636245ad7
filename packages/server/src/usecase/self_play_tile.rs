//! UseCase: ボーナス牌の公開
//!
//! 花牌・季節牌はツモった時点で手牌から公開へ移し、補充のツモは
//! クライアントが続けて DRAW_TILE で行う。公開は手番に縛られない。
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SelfPlayTileUseCase::execute() メソッド
//! - ボーナス牌の公開と SELF_PLAY_TILE の全席配信
//!
//! ### なぜこのテストが必要か
//! - ボーナス牌以外の公開が拒否され、誰にも配信されないことを保証
//! - 公開された牌が河 (公開列) に入ることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系: 手牌にある花牌の公開
//! - 異常系: 数牌の公開、ゲーム未参加

use std::sync::Arc;

use crate::domain::{ConnectionId, ConnectionRepository, GameState, GameStateRepository, Tile};
use crate::infrastructure::dto::websocket::{ActionName, ResponseEnvelope, TileExposedPayload};

use super::broadcast::GameBroadcaster;
use super::error::SelfPlayTileError;

/// ボーナス牌公開のユースケース
pub struct SelfPlayTileUseCase {
    /// 接続 Repository（データアクセス層の抽象化）
    connection_repository: Arc<dyn ConnectionRepository>,
    /// 局状態 Repository（データアクセス層の抽象化）
    game_state_repository: Arc<dyn GameStateRepository>,
    /// ゲーム内配信エンジン
    broadcaster: Arc<GameBroadcaster>,
}

impl SelfPlayTileUseCase {
    /// 新しい SelfPlayTileUseCase を作成
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

    /// ボーナス牌を公開する
    ///
    /// # Arguments
    ///
    /// * `connection_id` - 公開する接続の ID（Domain Model）
    /// * `tile` - 公開する牌 (花牌・季節牌のみ)
    ///
    /// # Returns
    ///
    /// * `Ok(GameState)` - 更新後の局状態
    /// * `Err(SelfPlayTileError)` - ボーナス牌以外・所持していない牌など
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        tile: Tile,
    ) -> Result<GameState, SelfPlayTileError> {
        // 1. 接続と参加中のゲームを確認
        let connection = self
            .connection_repository
            .get(connection_id)
            .await?
            .ok_or_else(|| SelfPlayTileError::NotConnected(connection_id.as_str().to_string()))?;
        let game_id = connection
            .game_id
            .clone()
            .ok_or(SelfPlayTileError::NotInGame)?;

        // 2. 手牌から公開列へ移す
        let state = self
            .game_state_repository
            .expose_tile(&game_id, connection_id, tile)
            .await?;

        // 3. 全席へ公開を通知
        let payload = TileExposedPayload {
            connection_id: connection_id.as_str().to_string(),
            tile,
        };
        self.broadcaster
            .broadcast_to(
                state.connection_ids(),
                &ResponseEnvelope::push(ActionName::SelfPlayTile, payload),
            )
            .await;

        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{
            Connection, ConnectionIdFactory, GameId, GameIdFactory, GameStateError,
            MessagePusher, RepositoryError, Timestamp, Username, build_wall_tiles,
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
        usecase: SelfPlayTileUseCase,
    }

    fn create_fixture() -> Fixture {
        let connection_repository = Arc::new(InMemoryConnectionRepository::new());
        let game_state_repository = Arc::new(InMemoryGameStateRepository::new());
        let message_pusher = Arc::new(WebSocketMessagePusher::new());
        let broadcaster = Arc::new(GameBroadcaster::new(
            message_pusher.clone(),
            game_state_repository.clone(),
        ));
        let usecase = SelfPlayTileUseCase::new(
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
        /// 4人分の接続と、席1の手牌にボーナス牌を仕込んだ局を用意する
        async fn seat_round_with_bonus(&self) -> (Vec<ConnectionId>, GameId, Tile) {
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
            let mut state =
                GameState::new(game_id.clone(), &connection_ids, build_wall_tiles()).unwrap();
            // 通常の並びではボーナス牌は山の末尾にあり配牌に入らないため仕込む
            let bonus = build_wall_tiles()
                .into_iter()
                .find(|t| t.is_bonus())
                .unwrap();
            state.hands[1].hand.push(bonus);
            self.game_state_repository.put(state).await.unwrap();
            (connection_ids, game_id, bonus)
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
    async fn test_expose_bonus_tile_broadcasts_to_every_seat() {
        // テスト項目: ボーナス牌の公開が全席へ届き、公開列に入る
        // given (前提条件): 席1の手牌に花牌がある (手番は席0)
        let fixture = create_fixture();
        let (members, game_id, bonus) = fixture.seat_round_with_bonus().await;
        let mut receivers = Vec::new();
        for member in &members {
            receivers.push(fixture.register_channel(member).await);
        }

        // when (操作): 手番外の席1が公開する
        let updated = fixture.usecase.execute(&members[1], bonus).await.unwrap();

        // then (期待する結果):
        assert_eq!(updated.hands[1].played_tiles, vec![bonus]);
        assert!(!updated.hands[1].hand.contains(&bonus));
        let stored = fixture
            .game_state_repository
            .get(&game_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.hands[1].played_tiles, vec![bonus]);

        let expected_tile = serde_json::to_value(bonus).unwrap();
        for rx in &mut receivers {
            let frame = timeout(RECV_TIMEOUT, rx.recv()).await.unwrap().unwrap();
            let parsed: Value = serde_json::from_str(&frame).unwrap();
            assert_eq!(parsed["action"], "SELF_PLAY_TILE");
            assert_eq!(parsed["payload"]["connectionId"], members[1].as_str());
            assert_eq!(parsed["payload"]["tile"], expected_tile);
        }
    }

    #[tokio::test]
    async fn test_expose_non_bonus_tile_is_rejected() {
        // テスト項目: 数牌は公開できず、誰にも配信されない
        // given (前提条件):
        let fixture = create_fixture();
        let (members, game_id, _) = fixture.seat_round_with_bonus().await;
        let suited = fixture
            .game_state_repository
            .get(&game_id)
            .await
            .unwrap()
            .unwrap()
            .hands[1]
            .hand[0];
        let mut host_rx = fixture.register_channel(&members[0]).await;

        // when (操作):
        let result = fixture.usecase.execute(&members[1], suited).await;

        // then (期待する結果):
        assert_eq!(
            result.unwrap_err(),
            SelfPlayTileError::Repository(RepositoryError::GameState(
                GameStateError::NotABonusTile
            ))
        );
        assert!(host_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_self_play_tile_not_in_game_fails() {
        // テスト項目: ゲーム未参加の接続は公開できない
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
        let bonus = build_wall_tiles()
            .into_iter()
            .find(|t| t.is_bonus())
            .unwrap();

        // when (操作):
        let result = fixture.usecase.execute(&connection.id, bonus).await;

        // then (期待する結果):
        assert!(matches!(result, Err(SelfPlayTileError::NotInGame)));
    }
}
