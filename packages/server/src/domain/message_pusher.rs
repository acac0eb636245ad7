//! MessagePusher trait 定義（DIP: Dependency Inversion Principle）
//!
//! WebSocket 接続中のクライアントへメッセージを届ける操作の抽象化。
//! UseCase 層はこの trait のみに依存し、具体的な送信手段
//! （WebSocket、テスト用チャネルなど）は Infrastructure 層が実装する。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{ConnectionId, MessagePushError};

/// クライアントへの送信チャネル
///
/// WebSocket ハンドラ側で `rx` を受信ループに渡し、`tx` を
/// MessagePusher に登録する。unbounded なので送信側は await しない。
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// 接続中クライアントへのメッセージ送信の抽象化
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// クライアントの送信チャネルを登録する
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel);

    /// クライアントの送信チャネルを登録解除する
    async fn unregister_client(&self, connection_id: &ConnectionId);

    /// 単一のクライアントへメッセージを送信する
    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        content: &str,
    ) -> Result<(), MessagePushError>;

    /// 複数のクライアントへ同一メッセージを送信する
    ///
    /// 各宛先への送信は並行に行い、全宛先の完了を待ってから返る。
    /// 一部の宛先への送信失敗は他の宛先への送信を妨げない。
    async fn broadcast(
        &self,
        targets: Vec<ConnectionId>,
        content: &str,
    ) -> Result<(), MessagePushError>;
}
