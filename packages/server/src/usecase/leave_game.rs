//! UseCase: ゲーム退出処理
//!
//! 明示的な LEAVE_GAME と切断時の後始末の両方から呼ばれる。退出者が
//! ホストのときは卓ごと畳み、そうでなければ席を詰めて残りへ知らせる。
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - LeaveGameUseCase::execute() メソッド
//! - ホスト退出によるゲーム・局状態・全メンバーの参加記録の連鎖削除
//! - 非ホスト退出による席詰めと GAME_UPDATE 通知
//!
//! ### なぜこのテストが必要か
//! - ホスト退出後にどのレコードも残らないこと（孤児レコードの防止）を保証
//! - GAME_DELETED が退出者以外の元メンバーだけに届くことを確認
//! - 退出後の残メンバーが改めてゲームを作成・参加できることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：非ホストの退出、ホストの退出、最後の1人の退出
//! - 異常系：ゲーム未参加の接続からの退出要求
//! - エッジケース：ゲームレコードが先に消えている接続の後始末

use std::sync::Arc;

use crate::domain::{
    ConnectionId, ConnectionRepository, Game, GameId, GameRepository, GameStateRepository,
};
use crate::infrastructure::dto::websocket::{
    ActionName, GameDeletedPayload, GameDto, ResponseEnvelope,
};

use super::broadcast::GameBroadcaster;
use super::error::LeaveGameError;

/// 退出の結果
#[derive(Debug, Clone)]
pub enum LeaveOutcome {
    /// 席を詰めてゲームは続く
    Left { game: Game },
    /// 卓ごと削除された（ホスト退出または最後の1人）
    Deleted { game_id: GameId },
}

/// ゲーム退出のユースケース
pub struct LeaveGameUseCase {
    /// 接続 Repository（データアクセス層の抽象化）
    connection_repository: Arc<dyn ConnectionRepository>,
    /// ゲーム Repository（データアクセス層の抽象化）
    game_repository: Arc<dyn GameRepository>,
    /// 局状態 Repository（データアクセス層の抽象化）
    game_state_repository: Arc<dyn GameStateRepository>,
    /// ゲーム内配信エンジン
    broadcaster: Arc<GameBroadcaster>,
}

impl LeaveGameUseCase {
    /// 新しい LeaveGameUseCase を作成
    pub fn new(
        connection_repository: Arc<dyn ConnectionRepository>,
        game_repository: Arc<dyn GameRepository>,
        game_state_repository: Arc<dyn GameStateRepository>,
        broadcaster: Arc<GameBroadcaster>,
    ) -> Self {
        Self {
            connection_repository,
            game_repository,
            game_state_repository,
            broadcaster,
        }
    }

    /// ゲーム退出を実行
    ///
    /// # Arguments
    ///
    /// * `connection_id` - 退出する接続の ID（Domain Model）
    ///
    /// # Returns
    ///
    /// * `Ok(LeaveOutcome)` - 退出成功（ゲームが続くか畳まれたか）
    /// * `Err(LeaveGameError)` - ゲーム未参加、または後始末の失敗
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
    ) -> Result<LeaveOutcome, LeaveGameError> {
        // 1. 接続と参加中のゲームを確認
        let connection = self
            .connection_repository
            .get(connection_id)
            .await?
            .ok_or_else(|| LeaveGameError::NotConnected(connection_id.as_str().to_string()))?;
        let game_id = connection.game_id.clone().ok_or(LeaveGameError::NotInGame)?;

        let Some(game) = self.game_repository.get(&game_id).await? else {
            // ゲームレコードが先に消えていても接続側の紐付けは解く
            self.connection_repository
                .clear_game_id(connection_id)
                .await?;
            return Ok(LeaveOutcome::Deleted { game_id });
        };

        if game.is_host(connection_id) || game.users.len() == 1 {
            self.delete_game(connection_id, &game_id, game).await
        } else {
            self.leave_seat(connection_id, &game_id).await
        }
    }

    /// 卓ごと畳む：全メンバーの参加記録を解き、ゲームと局状態を削除する
    async fn delete_game(
        &self,
        leaver: &ConnectionId,
        game_id: &GameId,
        game: Game,
    ) -> Result<LeaveOutcome, LeaveGameError> {
        // 2. 全メンバーの接続レコードから参加中のゲームを外す
        //    切断済みメンバーのレコードが無くても削除は続行する
        let members = game.connection_ids();
        for member in &members {
            if let Err(e) = self.connection_repository.clear_game_id(member).await {
                tracing::warn!(
                    "failed to clear game assignment of '{}': {}",
                    member.as_str(),
                    e
                );
            }
        }

        // 3. ゲームと局状態を削除
        self.game_repository.delete(game_id).await?;
        self.game_state_repository.delete(game_id).await?;

        // 4. 退出者以外の元メンバーへ GAME_DELETED
        let targets: Vec<ConnectionId> =
            members.into_iter().filter(|id| id != leaver).collect();
        let payload = GameDeletedPayload {
            game_id: game_id.as_str().to_string(),
        };
        self.broadcaster
            .broadcast_to(
                targets,
                &ResponseEnvelope::push(ActionName::GameDeleted, payload),
            )
            .await;

        Ok(LeaveOutcome::Deleted {
            game_id: game_id.clone(),
        })
    }

    /// 席を詰めてゲームを続け、残りのメンバーへ新しい席順を知らせる
    async fn leave_seat(
        &self,
        leaver: &ConnectionId,
        game_id: &GameId,
    ) -> Result<LeaveOutcome, LeaveGameError> {
        // 2. 席を外し、接続レコードの紐付けを解く
        let game = self.game_repository.remove_user(game_id, leaver).await?;
        self.connection_repository.clear_game_id(leaver).await?;

        // 3. 残りのメンバーへ GAME_UPDATE
        self.broadcaster
            .broadcast_to(
                game.connection_ids(),
                &ResponseEnvelope::push(ActionName::GameUpdate, GameDto::from(game.clone())),
            )
            .await;

        Ok(LeaveOutcome::Left { game })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{
            Connection, ConnectionIdFactory, GameIdFactory, GameName, GameState, GameUser,
            MessagePusher, Timestamp, Username, build_wall_tiles,
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
        game_state_repository: Arc<InMemoryGameStateRepository>,
        message_pusher: Arc<WebSocketMessagePusher>,
        usecase: LeaveGameUseCase,
    }

    fn create_fixture() -> Fixture {
        let connection_repository = Arc::new(InMemoryConnectionRepository::new());
        let game_repository = Arc::new(InMemoryGameRepository::new());
        let game_state_repository = Arc::new(InMemoryGameStateRepository::new());
        let message_pusher = Arc::new(WebSocketMessagePusher::new());
        let broadcaster = Arc::new(GameBroadcaster::new(
            message_pusher.clone(),
            game_state_repository.clone(),
        ));
        let usecase = LeaveGameUseCase::new(
            connection_repository.clone(),
            game_repository.clone(),
            game_state_repository.clone(),
            broadcaster,
        );
        Fixture {
            connection_repository,
            game_repository,
            game_state_repository,
            message_pusher,
            usecase,
        }
    }

    impl Fixture {
        async fn register_member(&self, name: &str) -> ConnectionId {
            let mut connection = Connection::new(
                ConnectionIdFactory::generate().unwrap(),
                Timestamp::new(1000),
            );
            connection.set_username(Username::new(name.to_string()).unwrap());
            self.connection_repository
                .register(connection.clone())
                .await
                .unwrap();
            connection.id
        }

        /// ホスト + メンバーが着席済みのゲームを作る
        async fn insert_game(&self, members: &[(&ConnectionId, &str)]) -> GameId {
            let (host, host_name) = members[0];
            let creator = GameUser::new(
                host.clone(),
                Username::new(host_name.to_string()).unwrap(),
            );
            let mut game = Game::new(
                GameIdFactory::generate().unwrap(),
                GameName::new("friday night".to_string()).unwrap(),
                "mahjong".to_string(),
                "hongkong".to_string(),
                creator,
                Timestamp::new(1000),
            );
            for (member, name) in &members[1..] {
                game.add_user(GameUser::new(
                    (*member).clone(),
                    Username::new(name.to_string()).unwrap(),
                ))
                .unwrap();
            }
            let game_id = game.id.clone();
            self.game_repository.insert(game).await.unwrap();
            for (member, _) in members {
                self.connection_repository
                    .set_game_id(member, game_id.clone())
                    .await
                    .unwrap();
            }
            game_id
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
    async fn test_leave_game_non_host_keeps_game_alive() {
        // テスト項目: 非ホストの退出で席が詰まり、残りに GAME_UPDATE が届く
        // given (前提条件): 3人のゲーム
        let fixture = create_fixture();
        let host = fixture.register_member("alice").await;
        let second = fixture.register_member("bob").await;
        let third = fixture.register_member("carol").await;
        let game_id = fixture
            .insert_game(&[(&host, "alice"), (&second, "bob"), (&third, "carol")])
            .await;
        let mut host_rx = fixture.register_channel(&host).await;
        let mut second_rx = fixture.register_channel(&second).await;

        // when (操作): bob が退出する
        let outcome = fixture.usecase.execute(&second).await.unwrap();

        // then (期待する結果): ゲームは2人で続く
        let LeaveOutcome::Left { game } = outcome else {
            panic!("expected the game to survive");
        };
        assert_eq!(game.users.len(), 2);
        assert!(!game.contains_user(&second));

        // 退出者の参加記録は解かれている
        let connection = fixture
            .connection_repository
            .get(&second)
            .await
            .unwrap()
            .unwrap();
        assert!(connection.game_id.is_none());

        // 残りのメンバーに GAME_UPDATE が届き、退出者には届かない
        let frame = host_rx.recv().await.unwrap();
        let parsed: Value = serde_json::from_str(&frame).unwrap();
        assert_eq!(parsed["action"], "GAME_UPDATE");
        assert_eq!(parsed["payload"]["users"].as_array().unwrap().len(), 2);
        assert!(second_rx.try_recv().is_err());

        let stored = fixture.game_repository.get(&game_id).await.unwrap();
        assert!(stored.is_some());
    }

    #[tokio::test]
    async fn test_leave_game_host_deletes_everything() {
        // テスト項目: ホスト退出で卓・局状態・全メンバーの参加記録が消える
        // given (前提条件): 4人のゲームと進行中の局
        let fixture = create_fixture();
        let host = fixture.register_member("alice").await;
        let second = fixture.register_member("bob").await;
        let third = fixture.register_member("carol").await;
        let fourth = fixture.register_member("dave").await;
        let members = [
            (&host, "alice"),
            (&second, "bob"),
            (&third, "carol"),
            (&fourth, "dave"),
        ];
        let game_id = fixture.insert_game(&members).await;
        let connection_ids: Vec<ConnectionId> =
            members.iter().map(|(id, _)| (*id).clone()).collect();
        let state =
            GameState::new(game_id.clone(), &connection_ids, build_wall_tiles()).unwrap();
        fixture.game_state_repository.put(state).await.unwrap();

        let mut host_rx = fixture.register_channel(&host).await;
        let mut second_rx = fixture.register_channel(&second).await;

        // when (操作): ホストが退出する
        let outcome = fixture.usecase.execute(&host).await.unwrap();

        // then (期待する結果): 卓ごと削除される
        let LeaveOutcome::Deleted {
            game_id: deleted_id,
        } = outcome
        else {
            panic!("expected the game to be deleted");
        };
        assert_eq!(deleted_id, game_id);
        assert!(fixture.game_repository.get(&game_id).await.unwrap().is_none());
        assert!(
            fixture
                .game_state_repository
                .get(&game_id)
                .await
                .unwrap()
                .is_none()
        );

        // 全メンバーの参加記録が解かれている
        for member in &connection_ids {
            let connection = fixture
                .connection_repository
                .get(member)
                .await
                .unwrap()
                .unwrap();
            assert!(connection.game_id.is_none());
        }

        // GAME_DELETED は退出者以外に届く
        let frame = second_rx.recv().await.unwrap();
        let parsed: Value = serde_json::from_str(&frame).unwrap();
        assert_eq!(parsed["action"], "GAME_DELETED");
        assert_eq!(parsed["payload"]["gameId"], game_id.as_str());
        assert!(host_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_leave_game_last_member_deletes_game() {
        // テスト項目: 最後の1人（ホスト）の退出で卓が消える
        // given (前提条件): ホストだけのゲーム
        let fixture = create_fixture();
        let host = fixture.register_member("alice").await;
        let game_id = fixture.insert_game(&[(&host, "alice")]).await;

        // when (操作):
        let outcome = fixture.usecase.execute(&host).await.unwrap();

        // then (期待する結果):
        assert!(matches!(outcome, LeaveOutcome::Deleted { .. }));
        assert!(fixture.game_repository.get(&game_id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_leave_game_not_in_game_fails() {
        // テスト項目: ゲーム未参加の接続からの退出要求はエラーになる
        // given (前提条件):
        let fixture = create_fixture();
        let loner = fixture.register_member("alice").await;

        // when (操作):
        let result = fixture.usecase.execute(&loner).await;

        // then (期待する結果):
        assert!(matches!(result, Err(LeaveGameError::NotInGame)));
    }

    #[tokio::test]
    async fn test_leave_game_with_stale_game_record() {
        // テスト項目: ゲームレコードが先に消えていても紐付けは解かれる
        // given (前提条件): 存在しないゲームを指す接続
        let fixture = create_fixture();
        let member = fixture.register_member("alice").await;
        let stale_game_id = GameIdFactory::generate().unwrap();
        fixture
            .connection_repository
            .set_game_id(&member, stale_game_id.clone())
            .await
            .unwrap();

        // when (操作):
        let outcome = fixture.usecase.execute(&member).await.unwrap();

        // then (期待する結果): 削除扱いになり、紐付けが解かれる
        assert!(matches!(outcome, LeaveOutcome::Deleted { .. }));
        let connection = fixture
            .connection_repository
            .get(&member)
            .await
            .unwrap()
            .unwrap();
        assert!(connection.game_id.is_none());

        // 解かれたので改めてゲームに参加できる
        let new_game_id = GameIdFactory::generate().unwrap();
        let result = fixture
            .connection_repository
            .set_game_id(&member, new_game_id)
            .await;
        assert!(result.is_ok());
    }
}
