//! UseCase 層のエラー定義
//!
//! 各ユースケースが返すエラーを定義します。ハンドラはこの Display 表現を
//! そのまま失敗 ack の `error` フィールドに載せるため、メッセージは
//! クライアントに見せられる文面にしてあります。

use thiserror::Error;

use crate::domain::{GameStateError, RepositoryError, ValueObjectError};

/// 接続確立時のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConnectSessionError {
    /// 接続 ID の生成に失敗
    #[error("failed to generate a connection id: {0}")]
    IdGeneration(#[from] ValueObjectError),

    /// ストアへの登録に失敗
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// 切断処理時のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DisconnectSessionError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// ユーザー名設定時のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SetUsernameError {
    /// ユーザー名のバリデーション失敗
    #[error(transparent)]
    InvalidUsername(#[from] ValueObjectError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// ゲーム作成時のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CreateGameError {
    #[error("connection '{0}' is not registered")]
    NotConnected(String),

    /// ユーザー名が未設定
    #[error("set a username before creating a game")]
    UsernameNotSet,

    /// 既に別のゲームに参加中
    #[error("already in game '{0}', leave it first")]
    AlreadyInGame(String),

    /// ゲーム名のバリデーション失敗
    #[error(transparent)]
    InvalidGameName(ValueObjectError),

    /// ゲーム ID の生成に失敗
    #[error("failed to generate a game id: {0}")]
    IdGeneration(ValueObjectError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// ゲーム参加時のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum JoinGameError {
    #[error("connection '{0}' is not registered")]
    NotConnected(String),

    /// ユーザー名が未設定
    #[error("set a username before joining a game")]
    UsernameNotSet,

    /// 既に別のゲームに参加中
    #[error("already in game '{0}', leave it first")]
    AlreadyInGame(String),

    /// ゲーム ID のバリデーション失敗
    #[error(transparent)]
    InvalidGameId(#[from] ValueObjectError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// ゲーム退出時のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LeaveGameError {
    #[error("connection '{0}' is not registered")]
    NotConnected(String),

    /// ゲームに参加していない
    #[error("not in a game")]
    NotInGame,

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// ゲーム開始時のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StartGameError {
    #[error("connection '{0}' is not registered")]
    NotConnected(String),

    #[error("not in a game")]
    NotInGame,

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// ゲームページロード通知時のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MarkGameLoadedError {
    #[error("connection '{0}' is not registered")]
    NotConnected(String),

    #[error("not in a game")]
    NotInGame,

    /// 配牌の構築に失敗
    #[error("failed to deal the opening hands: {0}")]
    Deal(#[from] GameStateError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// ゲーム内チャット送信時のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SendMessageError {
    #[error("connection '{0}' is not registered")]
    NotConnected(String),

    #[error("set a username before sending messages")]
    UsernameNotSet,

    #[error("not in a game")]
    NotInGame,

    /// 空メッセージは中継しない
    #[error("message is empty")]
    EmptyMessage,

    #[error("game '{0}' no longer exists")]
    GameNotFound(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// ツモ実行時のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DrawTileError {
    #[error("connection '{0}' is not registered")]
    NotConnected(String),

    #[error("not in a game")]
    NotInGame,

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// 打牌実行時のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlayTileError {
    #[error("connection '{0}' is not registered")]
    NotConnected(String),

    #[error("not in a game")]
    NotInGame,

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// 打牌リアクション受付時のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubmitInteractionError {
    #[error("connection '{0}' is not registered")]
    NotConnected(String),

    #[error("not in a game")]
    NotInGame,

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// 和了宣言時のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeclareWinError {
    #[error("connection '{0}' is not registered")]
    NotConnected(String),

    #[error("not in a game")]
    NotInGame,

    /// 進行中のラウンドが存在しない
    #[error("no active round for game '{0}'")]
    NoActiveRound(String),

    /// 別の終了事由が先に確定している
    #[error("the round has already ended")]
    RoundAlreadyEnded,

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// ボーナス牌公開時のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SelfPlayTileError {
    #[error("connection '{0}' is not registered")]
    NotConnected(String),

    #[error("not in a game")]
    NotInGame,

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// 再同期要求時のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResyncGameError {
    #[error("connection '{0}' is not registered")]
    NotConnected(String),

    #[error("not in a game")]
    NotInGame,

    /// 進行中のラウンドが存在しない
    #[error("no active round for game '{0}'")]
    NoActiveRound(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
