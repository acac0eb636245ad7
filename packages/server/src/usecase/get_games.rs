//! UseCase: ゲーム一覧取得処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - GetGamesUseCase::execute() メソッド
//! - ロビーのゲーム一覧が作成時刻順で返ること
//!
//! ### なぜこのテストが必要か
//! - 一覧表示がクライアント間で同じ並びになることを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：複数ゲームの一覧
//! - エッジケース：ゲームが1つもない場合

use std::sync::Arc;

use crate::domain::{Game, GameRepository};

/// ゲーム一覧取得のユースケース
pub struct GetGamesUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn GameRepository>,
}

impl GetGamesUseCase {
    /// 新しい GetGamesUseCase を作成
    pub fn new(repository: Arc<dyn GameRepository>) -> Self {
        Self { repository }
    }

    /// ゲーム一覧取得を実行
    ///
    /// # Returns
    ///
    /// ロビーの全ゲーム（作成時刻の昇順）
    pub async fn execute(&self) -> Vec<Game> {
        let mut games = self.repository.list().await;
        games.sort_by_key(|game| game.created_at);
        games
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{
            ConnectionIdFactory, GameIdFactory, GameName, GameUser, Timestamp, Username,
        },
        infrastructure::repository::InMemoryGameRepository,
    };

    fn create_game(name: &str, created_at: i64) -> Game {
        let creator = GameUser::new(
            ConnectionIdFactory::generate().unwrap(),
            Username::new("host".to_string()).unwrap(),
        );
        Game::new(
            GameIdFactory::generate().unwrap(),
            GameName::new(name.to_string()).unwrap(),
            "mahjong".to_string(),
            "hongkong".to_string(),
            creator,
            Timestamp::new(created_at),
        )
    }

    #[tokio::test]
    async fn test_get_games_sorted_by_created_at() {
        // テスト項目: ゲーム一覧が作成時刻の昇順で返る
        // given (前提条件): 新しい方を先に登録
        let repository = Arc::new(InMemoryGameRepository::new());
        repository.insert(create_game("newer", 5000)).await.unwrap();
        repository.insert(create_game("older", 1000)).await.unwrap();
        let usecase = GetGamesUseCase::new(repository);

        // when (操作):
        let result = usecase.execute().await;

        // then (期待する結果):
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].name.as_str(), "older");
        assert_eq!(result[1].name.as_str(), "newer");
    }

    #[tokio::test]
    async fn test_get_games_empty() {
        // テスト項目: ゲームがなければ空の一覧
        // given (前提条件):
        let repository = Arc::new(InMemoryGameRepository::new());
        let usecase = GetGamesUseCase::new(repository);

        // when (操作):
        let result = usecase.execute().await;

        // then (期待する結果):
        assert!(result.is_empty());
    }
}
