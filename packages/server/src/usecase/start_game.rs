//! UseCase: ゲーム開始処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - StartGameUseCase::execute() メソッド
//! - ホスト・満席の前提条件と、開始者を含む全員への GAME_UPDATE
//!
//! ### なぜこのテストが必要か
//! - CREATED -> STARTED の遷移が一度しか起きないことを保証
//! - 開始の合図が4席すべてに届くこと（ゲーム画面への遷移契機）を確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：ホストによる満席のゲームの開始
//! - 異常系：非ホストの開始要求、人数不足、二重開始

use std::sync::Arc;

use crate::domain::{ConnectionId, ConnectionRepository, Game, GameRepository};
use crate::infrastructure::dto::websocket::{ActionName, GameDto, ResponseEnvelope};

use super::broadcast::GameBroadcaster;
use super::error::StartGameError;

/// ゲーム開始のユースケース
pub struct StartGameUseCase {
    /// 接続 Repository（データアクセス層の抽象化）
    connection_repository: Arc<dyn ConnectionRepository>,
    /// ゲーム Repository（データアクセス層の抽象化）
    game_repository: Arc<dyn GameRepository>,
    /// ゲーム内配信エンジン
    broadcaster: Arc<GameBroadcaster>,
}

impl StartGameUseCase {
    /// 新しい StartGameUseCase を作成
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

    /// ゲーム開始を実行
    ///
    /// # Arguments
    ///
    /// * `connection_id` - 開始を要求した接続の ID（Domain Model）
    ///
    /// # Returns
    ///
    /// * `Ok(Game)` - 開始後のゲーム（status = STARTED）
    /// * `Err(StartGameError)` - 前提条件の不成立
    pub async fn execute(&self, connection_id: &ConnectionId) -> Result<Game, StartGameError> {
        // 1. 接続と参加中のゲームを確認
        let connection = self
            .connection_repository
            .get(connection_id)
            .await?
            .ok_or_else(|| StartGameError::NotConnected(connection_id.as_str().to_string()))?;
        let game_id = connection.game_id.clone().ok_or(StartGameError::NotInGame)?;

        // 2. 開始（ホスト以外・満席未満・二重開始はストア側で弾かれる）
        let game = self
            .game_repository
            .mark_started(&game_id, connection_id)
            .await?;

        // 3. 開始者を含む全員へ新しい状態を知らせる
        self.broadcaster
            .broadcast_to(
                game.connection_ids(),
                &ResponseEnvelope::push(ActionName::GameUpdate, GameDto::from(game.clone())),
            )
            .await;

        Ok(game)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{
            Connection, ConnectionIdFactory, GameError, GameId, GameIdFactory, GameName,
            GameStatus, GameUser, MessagePusher, RepositoryError, Timestamp, Username,
        },
        infrastructure::{
            message_pusher::WebSocketMessagePusher,
            repository::{
                InMemoryConnectionRepository, InMemoryGameRepository,
                InMemoryGameStateRepository,
            },
        },
    };
    use serde_json::Value;
    use tokio::sync::mpsc;

    struct Fixture {
        connection_repository: Arc<InMemoryConnectionRepository>,
        game_repository: Arc<InMemoryGameRepository>,
        message_pusher: Arc<WebSocketMessagePusher>,
        usecase: StartGameUseCase,
    }

    fn create_fixture() -> Fixture {
        let connection_repository = Arc::new(InMemoryConnectionRepository::new());
        let game_repository = Arc::new(InMemoryGameRepository::new());
        let message_pusher = Arc::new(WebSocketMessagePusher::new());
        let broadcaster = Arc::new(GameBroadcaster::new(
            message_pusher.clone(),
            Arc::new(InMemoryGameStateRepository::new()),
        ));
        let usecase = StartGameUseCase::new(
            connection_repository.clone(),
            game_repository.clone(),
            broadcaster,
        );
        Fixture {
            connection_repository,
            game_repository,
            message_pusher,
            usecase,
        }
    }

    impl Fixture {
        async fn seat_members(&self, names: &[&str]) -> (Vec<ConnectionId>, GameId) {
            let mut connection_ids = Vec::new();
            for name in names {
                let mut connection = Connection::new(
                    ConnectionIdFactory::generate().unwrap(),
                    Timestamp::new(1000),
                );
                connection.set_username(Username::new((*name).to_string()).unwrap());
                self.connection_repository
                    .register(connection.clone())
                    .await
                    .unwrap();
                connection_ids.push(connection.id);
            }

            let creator = GameUser::new(
                connection_ids[0].clone(),
                Username::new(names[0].to_string()).unwrap(),
            );
            let mut game = Game::new(
                GameIdFactory::generate().unwrap(),
                GameName::new("friday night".to_string()).unwrap(),
                "mahjong".to_string(),
                "hongkong".to_string(),
                creator,
                Timestamp::new(1000),
            );
            for (connection_id, name) in connection_ids.iter().zip(names).skip(1) {
                game.add_user(GameUser::new(
                    connection_id.clone(),
                    Username::new((*name).to_string()).unwrap(),
                ))
                .unwrap();
            }
            let game_id = game.id.clone();
            self.game_repository.insert(game).await.unwrap();
            for connection_id in &connection_ids {
                self.connection_repository
                    .set_game_id(connection_id, game_id.clone())
                    .await
                    .unwrap();
            }
            (connection_ids, game_id)
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
    async fn test_start_game_success_notifies_everyone() {
        // テスト項目: ホストの開始で STARTED になり、全員に GAME_UPDATE が届く
        // given (前提条件): 4人着席済みのゲーム
        let fixture = create_fixture();
        let (members, game_id) = fixture
            .seat_members(&["alice", "bob", "carol", "dave"])
            .await;
        let mut receivers = Vec::new();
        for member in &members {
            receivers.push(fixture.register_channel(member).await);
        }

        // when (操作): ホストが開始する
        let game = fixture.usecase.execute(&members[0]).await.unwrap();

        // then (期待する結果):
        assert_eq!(game.status, GameStatus::Started);
        let stored = fixture.game_repository.get(&game_id).await.unwrap().unwrap();
        assert_eq!(stored.status, GameStatus::Started);

        // 開始者を含む4人全員に届く
        for rx in &mut receivers {
            let frame = rx.recv().await.unwrap();
            let parsed: Value = serde_json::from_str(&frame).unwrap();
            assert_eq!(parsed["action"], "GAME_UPDATE");
            assert_eq!(parsed["payload"]["status"], "STARTED");
        }
    }

    #[tokio::test]
    async fn test_start_game_non_host_fails() {
        // テスト項目: ホスト以外は開始できない
        // given (前提条件): 4人着席済みのゲーム
        let fixture = create_fixture();
        let (members, game_id) = fixture
            .seat_members(&["alice", "bob", "carol", "dave"])
            .await;

        // when (操作): 2人目が開始を要求する
        let result = fixture.usecase.execute(&members[1]).await;

        // then (期待する結果): ステータスは CREATED のまま
        assert_eq!(
            result.unwrap_err(),
            StartGameError::Repository(RepositoryError::Game(GameError::NotHost))
        );
        let stored = fixture.game_repository.get(&game_id).await.unwrap().unwrap();
        assert_eq!(stored.status, GameStatus::Created);
    }

    #[tokio::test]
    async fn test_start_game_requires_full_table() {
        // テスト項目: 4人そろうまで開始できない
        // given (前提条件): 3人のゲーム
        let fixture = create_fixture();
        let (members, _) = fixture.seat_members(&["alice", "bob", "carol"]).await;

        // when (操作):
        let result = fixture.usecase.execute(&members[0]).await;

        // then (期待する結果):
        assert_eq!(
            result.unwrap_err(),
            StartGameError::Repository(RepositoryError::Game(GameError::NotEnoughPlayers {
                required: 4,
                current: 3,
            }))
        );
    }

    #[tokio::test]
    async fn test_start_game_twice_fails() {
        // テスト項目: 二重開始は弾かれる
        // given (前提条件): 開始済みのゲーム
        let fixture = create_fixture();
        let (members, _) = fixture
            .seat_members(&["alice", "bob", "carol", "dave"])
            .await;
        fixture.usecase.execute(&members[0]).await.unwrap();

        // when (操作):
        let result = fixture.usecase.execute(&members[0]).await;

        // then (期待する結果):
        assert_eq!(
            result.unwrap_err(),
            StartGameError::Repository(RepositoryError::Game(GameError::AlreadyStarted))
        );
    }

    #[tokio::test]
    async fn test_start_game_not_in_game_fails() {
        // テスト項目: ゲーム未参加の接続は開始を要求できない
        // given (前提条件):
        let fixture = create_fixture();
        let mut connection = Connection::new(
            ConnectionIdFactory::generate().unwrap(),
            Timestamp::new(1000),
        );
        connection.set_username(Username::new("alice".to_string()).unwrap());
        fixture
            .connection_repository
            .register(connection.clone())
            .await
            .unwrap();

        // when (操作):
        let result = fixture.usecase.execute(&connection.id).await;

        // then (期待する結果):
        assert!(matches!(result, Err(StartGameError::NotInGame)));
    }
}
