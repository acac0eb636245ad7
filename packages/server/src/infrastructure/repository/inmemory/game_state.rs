//! InMemory GameState Repository 実装
//!
//! ドメイン層が定義する GameStateRepository trait の具体的な実装。
//! HashMap をインメモリ DB として使用します。
//!
//! ツモ・打牌・リアクションなどラウンド進行の各操作は、1 回のロック
//! 区間内で GameState エンティティの検証付き更新を 1 つ呼ぶだけです。
//! 同じゲームへ同時に届いた操作はこのロックで直列化され、
//! エンティティが拒否した操作はレコードに痕跡を残しません。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    ConnectionId, GameId, GameState, GameStateRepository, RepositoryError, Tile, TileInteraction,
    WallDraw,
};

/// インメモリ GameState Repository 実装
///
/// 進行中ラウンドのレコードを `GameId` をキーとして保持する。
pub struct InMemoryGameStateRepository {
    /// ラウンドレコードのテーブル
    states: Mutex<HashMap<GameId, GameState>>,
}

impl InMemoryGameStateRepository {
    /// 新しい InMemoryGameStateRepository を作成
    pub fn new() -> Self {
        Self {
            states: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryGameStateRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GameStateRepository for InMemoryGameStateRepository {
    async fn put(&self, state: GameState) -> Result<(), RepositoryError> {
        let mut states = self.states.lock().await;
        states.insert(state.game_id.clone(), state);
        Ok(())
    }

    async fn get(&self, game_id: &GameId) -> Result<Option<GameState>, RepositoryError> {
        let states = self.states.lock().await;
        Ok(states.get(game_id).cloned())
    }

    async fn draw_tile(
        &self,
        game_id: &GameId,
        connection_id: &ConnectionId,
    ) -> Result<(WallDraw, usize), RepositoryError> {
        let mut states = self.states.lock().await;
        let state = states
            .get_mut(game_id)
            .ok_or_else(|| RepositoryError::GameStateNotFound(game_id.as_str().to_string()))?;
        let draw = state.draw_tile(connection_id)?;
        Ok((draw, state.current_index))
    }

    async fn discard_tile(
        &self,
        game_id: &GameId,
        connection_id: &ConnectionId,
        tile: Tile,
    ) -> Result<GameState, RepositoryError> {
        let mut states = self.states.lock().await;
        let state = states
            .get_mut(game_id)
            .ok_or_else(|| RepositoryError::GameStateNotFound(game_id.as_str().to_string()))?;
        state.discard_tile(connection_id, tile)?;
        Ok(state.clone())
    }

    async fn expose_tile(
        &self,
        game_id: &GameId,
        connection_id: &ConnectionId,
        tile: Tile,
    ) -> Result<GameState, RepositoryError> {
        let mut states = self.states.lock().await;
        let state = states
            .get_mut(game_id)
            .ok_or_else(|| RepositoryError::GameStateNotFound(game_id.as_str().to_string()))?;
        state.expose_tile(connection_id, tile)?;
        Ok(state.clone())
    }

    async fn append_interaction(
        &self,
        game_id: &GameId,
        interaction: TileInteraction,
    ) -> Result<GameState, RepositoryError> {
        let mut states = self.states.lock().await;
        let state = states
            .get_mut(game_id)
            .ok_or_else(|| RepositoryError::GameStateNotFound(game_id.as_str().to_string()))?;
        state.append_interaction(interaction)?;
        Ok(state.clone())
    }

    async fn reset_interactions(&self, game_id: &GameId) -> Result<(), RepositoryError> {
        let mut states = self.states.lock().await;
        let state = states
            .get_mut(game_id)
            .ok_or_else(|| RepositoryError::GameStateNotFound(game_id.as_str().to_string()))?;
        state.reset_interactions();
        Ok(())
    }

    async fn set_current_turn(
        &self,
        game_id: &GameId,
        seat: usize,
    ) -> Result<(), RepositoryError> {
        let mut states = self.states.lock().await;
        let state = states
            .get_mut(game_id)
            .ok_or_else(|| RepositoryError::GameStateNotFound(game_id.as_str().to_string()))?;
        state.set_current_turn(seat)?;
        Ok(())
    }

    async fn mark_round_ended(&self, game_id: &GameId) -> Result<(), RepositoryError> {
        let mut states = self.states.lock().await;
        let state = states
            .get_mut(game_id)
            .ok_or_else(|| RepositoryError::GameStateNotFound(game_id.as_str().to_string()))?;
        state.mark_round_ended()?;
        Ok(())
    }

    async fn start_new_round(
        &self,
        game_id: &GameId,
        wall: Vec<Tile>,
        is_dealer_changed: bool,
    ) -> Result<GameState, RepositoryError> {
        let mut states = self.states.lock().await;
        let state = states
            .get_mut(game_id)
            .ok_or_else(|| RepositoryError::GameStateNotFound(game_id.as_str().to_string()))?;
        state.start_new_round(wall, is_dealer_changed)?;
        Ok(state.clone())
    }

    async fn delete(&self, game_id: &GameId) -> Result<(), RepositoryError> {
        let mut states = self.states.lock().await;
        states.remove(game_id);
        Ok(())
    }
}
