//! InMemory Game Repository 実装
//!
//! ドメイン層が定義する GameRepository trait の具体的な実装。
//! HashMap をインメモリ DB として使用します。
//!
//! 着席・開始・ロードカウントの各メソッドは 1 回のロック区間内で
//! Game エンティティの検証付き更新を呼び、更新後のレコードを返します。
//! エンティティが拒否した場合、テーブルは変更されません。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ConnectionId, Game, GameId, GameRepository, GameUser, RepositoryError};

/// インメモリ Game Repository 実装
///
/// ロビーの全ゲームレコードを `GameId` をキーとして保持する。
pub struct InMemoryGameRepository {
    /// ゲームレコードのテーブル
    games: Mutex<HashMap<GameId, Game>>,
}

impl InMemoryGameRepository {
    /// 新しい InMemoryGameRepository を作成
    pub fn new() -> Self {
        Self {
            games: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryGameRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GameRepository for InMemoryGameRepository {
    async fn insert(&self, game: Game) -> Result<(), RepositoryError> {
        let mut games = self.games.lock().await;
        if games.contains_key(&game.id) {
            return Err(RepositoryError::GameAlreadyExists(
                game.id.as_str().to_string(),
            ));
        }
        games.insert(game.id.clone(), game);
        Ok(())
    }

    async fn get(&self, game_id: &GameId) -> Result<Option<Game>, RepositoryError> {
        let games = self.games.lock().await;
        Ok(games.get(game_id).cloned())
    }

    async fn list(&self) -> Vec<Game> {
        let games = self.games.lock().await;
        games.values().cloned().collect()
    }

    async fn add_user(&self, game_id: &GameId, user: GameUser) -> Result<Game, RepositoryError> {
        let mut games = self.games.lock().await;
        let game = games
            .get_mut(game_id)
            .ok_or_else(|| RepositoryError::GameNotFound(game_id.as_str().to_string()))?;
        game.add_user(user)?;
        Ok(game.clone())
    }

    async fn remove_user(
        &self,
        game_id: &GameId,
        connection_id: &ConnectionId,
    ) -> Result<Game, RepositoryError> {
        let mut games = self.games.lock().await;
        let game = games
            .get_mut(game_id)
            .ok_or_else(|| RepositoryError::GameNotFound(game_id.as_str().to_string()))?;
        game.remove_user(connection_id)?;
        Ok(game.clone())
    }

    async fn mark_started(
        &self,
        game_id: &GameId,
        by: &ConnectionId,
    ) -> Result<Game, RepositoryError> {
        let mut games = self.games.lock().await;
        let game = games
            .get_mut(game_id)
            .ok_or_else(|| RepositoryError::GameNotFound(game_id.as_str().to_string()))?;
        game.start(by)?;
        Ok(game.clone())
    }

    async fn increment_loaded_count(
        &self,
        game_id: &GameId,
    ) -> Result<(Game, usize), RepositoryError> {
        let mut games = self.games.lock().await;
        let game = games
            .get_mut(game_id)
            .ok_or_else(|| RepositoryError::GameNotFound(game_id.as_str().to_string()))?;
        let count = game.increment_loaded_count()?;
        Ok((game.clone(), count))
    }

    async fn delete(&self, game_id: &GameId) -> Result<(), RepositoryError> {
        let mut games = self.games.lock().await;
        games.remove(game_id);
        Ok(())
    }
}
