//! InMemory Connection Repository 実装
//!
//! ドメイン層が定義する ConnectionRepository trait の具体的な実装。
//! HashMap をインメモリ DB として使用します。
//!
//! 条件付き更新（ユーザー名設定、ゲーム割り当てなど）は 1 メソッド
//! 1 ロックで行い、検証と書き込みを同じロック区間に収めることで
//! check-then-act の競合を避けています。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    Connection, ConnectionId, ConnectionRepository, GameId, RepositoryError, Username,
};

/// インメモリ Connection Repository 実装
///
/// 接続中の全セッションを `ConnectionId` をキーとして保持する。
pub struct InMemoryConnectionRepository {
    /// 接続レコードのテーブル
    connections: Mutex<HashMap<ConnectionId, Connection>>,
}

impl InMemoryConnectionRepository {
    /// 新しい InMemoryConnectionRepository を作成
    pub fn new() -> Self {
        Self {
            connections: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryConnectionRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConnectionRepository for InMemoryConnectionRepository {
    async fn register(&self, connection: Connection) -> Result<(), RepositoryError> {
        let mut connections = self.connections.lock().await;
        if connections.contains_key(&connection.id) {
            return Err(RepositoryError::ConnectionAlreadyRegistered(
                connection.id.as_str().to_string(),
            ));
        }
        connections.insert(connection.id.clone(), connection);
        Ok(())
    }

    async fn unregister(&self, connection_id: &ConnectionId) -> Result<(), RepositoryError> {
        let mut connections = self.connections.lock().await;
        connections.remove(connection_id);
        Ok(())
    }

    async fn get(
        &self,
        connection_id: &ConnectionId,
    ) -> Result<Option<Connection>, RepositoryError> {
        let connections = self.connections.lock().await;
        Ok(connections.get(connection_id).cloned())
    }

    async fn list(&self) -> Vec<Connection> {
        let connections = self.connections.lock().await;
        connections.values().cloned().collect()
    }

    async fn set_username(
        &self,
        connection_id: &ConnectionId,
        username: Username,
    ) -> Result<Connection, RepositoryError> {
        let mut connections = self.connections.lock().await;
        let connection = connections.get_mut(connection_id).ok_or_else(|| {
            RepositoryError::ConnectionNotFound(connection_id.as_str().to_string())
        })?;
        connection.set_username(username);
        Ok(connection.clone())
    }

    async fn set_game_id(
        &self,
        connection_id: &ConnectionId,
        game_id: GameId,
    ) -> Result<Connection, RepositoryError> {
        let mut connections = self.connections.lock().await;
        let connection = connections.get_mut(connection_id).ok_or_else(|| {
            RepositoryError::ConnectionNotFound(connection_id.as_str().to_string())
        })?;
        connection.assign_game(game_id)?;
        Ok(connection.clone())
    }

    async fn clear_game_id(
        &self,
        connection_id: &ConnectionId,
    ) -> Result<Connection, RepositoryError> {
        let mut connections = self.connections.lock().await;
        let connection = connections.get_mut(connection_id).ok_or_else(|| {
            RepositoryError::ConnectionNotFound(connection_id.as_str().to_string())
        })?;
        connection.clear_game()?;
        Ok(connection.clone())
    }
}
