//! Repository trait 定義
//!
//! ドメイン層が必要とするデータアクセスのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。
//!
//! ## 条件付き更新の規約
//!
//! 各メソッドは 1 回の条件付き更新です: 前提条件を現在のレコードに対して
//! 評価し、満たされれば差分全体を適用し、満たされなければ副作用なしで
//! 型付きエラーを返します。呼び出し側はリトライではなくエラーを伝搬します。

use async_trait::async_trait;

use super::{
    Connection, ConnectionId, Game, GameId, GameState, GameUser, RepositoryError, Tile,
    TileInteraction, Username, WallDraw,
};

/// Connection Repository trait
///
/// 接続レコード (セッション) のストア。UseCase 層はこの trait に依存し、
/// Infrastructure 層の具体的な実装には依存しない。
#[async_trait]
pub trait ConnectionRepository: Send + Sync {
    /// 新しい接続を登録。同じ ID が登録済みならエラー
    async fn register(&self, connection: Connection) -> Result<(), RepositoryError>;

    /// 接続を削除
    async fn unregister(&self, connection_id: &ConnectionId) -> Result<(), RepositoryError>;

    /// 接続を取得。存在しない場合はエラーではなく `Ok(None)`
    async fn get(&self, connection_id: &ConnectionId)
    -> Result<Option<Connection>, RepositoryError>;

    /// 全ての接続を取得
    async fn list(&self) -> Vec<Connection>;

    /// ユーザー名を設定 (上書き可)
    async fn set_username(
        &self,
        connection_id: &ConnectionId,
        username: Username,
    ) -> Result<Connection, RepositoryError>;

    /// 接続にゲームを割り当て。既に別のゲームに参加していればエラー
    async fn set_game_id(
        &self,
        connection_id: &ConnectionId,
        game_id: GameId,
    ) -> Result<Connection, RepositoryError>;

    /// 接続からゲームを外す。参加していなければエラー
    async fn clear_game_id(
        &self,
        connection_id: &ConnectionId,
    ) -> Result<Connection, RepositoryError>;
}

/// Game Repository trait
///
/// ロビーのゲームレコードのストア。
#[async_trait]
pub trait GameRepository: Send + Sync {
    /// 新しいゲームを登録。同じ ID が登録済みならエラー
    async fn insert(&self, game: Game) -> Result<(), RepositoryError>;

    /// ゲームを取得。存在しない場合はエラーではなく `Ok(None)`
    async fn get(&self, game_id: &GameId) -> Result<Option<Game>, RepositoryError>;

    /// 全てのゲームを取得
    async fn list(&self) -> Vec<Game>;

    /// ユーザーを着席させる (定員 4・開始前のみ)
    async fn add_user(&self, game_id: &GameId, user: GameUser) -> Result<Game, RepositoryError>;

    /// ユーザーを外す
    async fn remove_user(
        &self,
        game_id: &GameId,
        connection_id: &ConnectionId,
    ) -> Result<Game, RepositoryError>;

    /// CREATED -> STARTED へ遷移させる (ホストのみ・満席のみ)
    async fn mark_started(
        &self,
        game_id: &GameId,
        by: &ConnectionId,
    ) -> Result<Game, RepositoryError>;

    /// ページロード数を 1 増やし、更新後のレコードと新しいカウントを返す
    async fn increment_loaded_count(
        &self,
        game_id: &GameId,
    ) -> Result<(Game, usize), RepositoryError>;

    /// ゲームを削除
    async fn delete(&self, game_id: &GameId) -> Result<(), RepositoryError>;
}

/// GameState Repository trait
///
/// 進行中ラウンドのレコードのストア。各メソッドが 1 回の条件付き更新に
/// 対応するため、ラウンドの状態機械のゲートはこの層で強制される。
#[async_trait]
pub trait GameStateRepository: Send + Sync {
    /// レコードを作成または全置換 (初期配牌)
    async fn put(&self, state: GameState) -> Result<(), RepositoryError>;

    /// レコードを取得。存在しない場合はエラーではなく `Ok(None)`
    async fn get(&self, game_id: &GameId) -> Result<Option<GameState>, RepositoryError>;

    /// 山から 1 枚ツモる。山切れはエラーではなく `WallDraw::Exhausted`。
    /// 戻り値は (ツモ結果, 更新後のカーソル位置)
    async fn draw_tile(
        &self,
        game_id: &GameId,
        connection_id: &ConnectionId,
    ) -> Result<(WallDraw, usize), RepositoryError>;

    /// 打牌: 手牌から河へ移す。更新後のレコードを返す
    async fn discard_tile(
        &self,
        game_id: &GameId,
        connection_id: &ConnectionId,
        tile: Tile,
    ) -> Result<GameState, RepositoryError>;

    /// ボーナス牌を公開する。更新後のレコードを返す
    async fn expose_tile(
        &self,
        game_id: &GameId,
        connection_id: &ConnectionId,
        tile: Tile,
    ) -> Result<GameState, RepositoryError>;

    /// 打牌へのリアクションを追記する。更新後のレコードを返す
    async fn append_interaction(
        &self,
        game_id: &GameId,
        interaction: TileInteraction,
    ) -> Result<GameState, RepositoryError>;

    /// リアクションの窓をリセットする (カウント 0・リスト空)
    async fn reset_interactions(&self, game_id: &GameId) -> Result<(), RepositoryError>;

    /// 手番を指定の席へ移す
    async fn set_current_turn(&self, game_id: &GameId, seat: usize)
    -> Result<(), RepositoryError>;

    /// ラウンドを終了させる。最初の呼び出しだけが成功する
    async fn mark_round_ended(&self, game_id: &GameId) -> Result<(), RepositoryError>;

    /// 新しい山で次のラウンドを開始する。更新後のレコードを返す
    async fn start_new_round(
        &self,
        game_id: &GameId,
        wall: Vec<Tile>,
        is_dealer_changed: bool,
    ) -> Result<GameState, RepositoryError>;

    /// レコードを削除
    async fn delete(&self, game_id: &GameId) -> Result<(), RepositoryError>;
}
